use property_core::{CoreError, Id};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientResult;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Payload for `POST /api/users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for creating an expense category.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    pub name: String,
    /// Text pre-filled into new transactions of this category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput("category name is required".to_string()));
        }
        Ok(())
    }
}

/// Strip the response envelope. Bodies may be bare, wrapped in `{"data": ...}`,
/// or keyed by entity name (`{"message": ..., "property": {...}}`).
pub fn unwrap_payload(mut value: Value, entity: Option<&str>) -> Value {
    if let Some(inner) = take_key(&mut value, "data") {
        value = inner;
    }
    if let Some(key) = entity {
        if let Some(inner) = take_key(&mut value, key) {
            value = inner;
        }
    }
    value
}

fn take_key(value: &mut Value, key: &str) -> Option<Value> {
    value
        .as_object_mut()
        .and_then(|object| object.remove(key))
        .filter(|inner| !inner.is_null())
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value, entity: Option<&str>) -> ClientResult<T> {
    Ok(serde_json::from_value(unwrap_payload(value, entity))?)
}
