use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// How the client obtains its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Token issued earlier, used as-is.
    Token(String),
    /// Log in with `POST /api/login` before the first request.
    Login { email: String, password: String },
    /// Anonymous; only `login` and `register_user` will succeed.
    None,
}

/// Collection paths. Deployments differ on the transaction and category routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    pub login: String,
    pub users: String,
    pub properties: String,
    pub transactions: String,
    pub categories: String,
    pub constructions: String,
    pub tasks: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            login: "/api/login".to_string(),
            users: "/api/users".to_string(),
            properties: "/api/properties".to_string(),
            transactions: "/api/transactions".to_string(),
            categories: "/api/categories".to_string(),
            constructions: "/api/constructions".to_string(),
            tasks: "/api/tasks".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub credentials: Credentials,
    pub routes: ApiRoutes,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            credentials: Credentials::None,
            routes: ApiRoutes::default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Credentials::Token(token.into());
        self
    }

    pub fn with_login(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::Login {
            email: email.into(),
            password: password.into(),
        };
        self
    }

    /// Create config from environment variables.
    /// PROPERTY_API_BASE_URL is required. A token in PROPERTY_API_TOKEN wins over
    /// PROPERTY_API_EMAIL / PROPERTY_API_PASSWORD.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = var("PROPERTY_API_BASE_URL")
            .ok_or_else(|| ClientError::Config("PROPERTY_API_BASE_URL not set".to_string()))?;
        let mut config = Self::new(base_url);

        if let Some(raw) = var("PROPERTY_API_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("PROPERTY_API_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        config.credentials = match (
            var("PROPERTY_API_TOKEN"),
            var("PROPERTY_API_EMAIL"),
            var("PROPERTY_API_PASSWORD"),
        ) {
            (Some(token), _, _) => Credentials::Token(token),
            (None, Some(email), Some(password)) => Credentials::Login { email, password },
            (None, Some(_), None) => {
                return Err(ClientError::Config(
                    "PROPERTY_API_PASSWORD not set for PROPERTY_API_EMAIL".to_string(),
                ))
            }
            _ => Credentials::None,
        };

        if let Some(path) = var("PROPERTY_API_TRANSACTIONS_PATH") {
            config.routes.transactions = path;
        }
        if let Some(path) = var("PROPERTY_API_CATEGORIES_PATH") {
            config.routes.categories = path;
        }

        Ok(config)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_base_url_required() {
        let err = ClientConfig::from_vars(lookup(&[])).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let config =
            ClientConfig::from_vars(lookup(&[("PROPERTY_API_BASE_URL", "http://localhost:3000/")]))
                .unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.credentials, Credentials::None);
        assert_eq!(config.url(&config.routes.transactions), "http://localhost:3000/api/transactions");
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_vars(lookup(&[
            ("PROPERTY_API_BASE_URL", "http://api"),
            ("PROPERTY_API_TIMEOUT_SECS", "5"),
            ("PROPERTY_API_EMAIL", "ana@example.com"),
            ("PROPERTY_API_PASSWORD", "secret"),
            ("PROPERTY_API_TRANSACTIONS_PATH", "/api/finances"),
            ("PROPERTY_API_CATEGORIES_PATH", "/api/expense-types"),
        ]))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.credentials,
            Credentials::Login {
                email: "ana@example.com".to_string(),
                password: "secret".to_string()
            }
        );
        assert_eq!(config.routes.transactions, "/api/finances");
        assert_eq!(config.routes.categories, "/api/expense-types");
    }

    #[test]
    fn test_token_wins_and_bad_timeout_rejected() {
        let config = ClientConfig::from_vars(lookup(&[
            ("PROPERTY_API_BASE_URL", "http://api"),
            ("PROPERTY_API_TOKEN", "abc"),
            ("PROPERTY_API_EMAIL", "ana@example.com"),
        ]))
        .unwrap();
        assert_eq!(config.credentials, Credentials::Token("abc".to_string()));

        let err = ClientConfig::from_vars(lookup(&[
            ("PROPERTY_API_BASE_URL", "http://api"),
            ("PROPERTY_API_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
