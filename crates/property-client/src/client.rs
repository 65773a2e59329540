use property_core::{
    Category, Construction, ConstructionDraft, Id, NewProperty, Property, Task, TaskDraft,
    TaskStatus, Transaction, TransactionDraft,
};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{ClientConfig, Credentials};
use crate::error::{ClientError, ClientResult};
use crate::models::{decode, LoginRequest, LoginResponse, NewCategory, NewUser, User};
use crate::session::{Session, SessionContext};

/// REST client for the property backend.
///
/// Every request except login and registration carries the bearer token held
/// in the [`SessionContext`]. With [`Credentials::Login`] the client logs in
/// on first use.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    session: SessionContext,
    /// Held while logging in so concurrent first requests share one login.
    login_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, session: SessionContext) -> ClientResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config,
            session,
            login_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Fresh session, seeded when the config carries a token.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let session = match &config.credentials {
            Credentials::Token(token) => SessionContext::with_token(token.clone()),
            _ => SessionContext::new(),
        };
        Self::new(config, session)
    }

    /// Create client from environment variables (see [`ClientConfig::from_env`]).
    pub fn from_env() -> ClientResult<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// `POST /api/login`; stores the token and user name in the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self
            .client
            .post(self.config.url(&self.config.routes.login))
            .headers(Self::json_headers())
            .json(&body);

        let response: LoginResponse = decode(self.execute(request).await?, None)?;
        let session = Session {
            token: response.token,
            user_name: response.user.and_then(|user| user.name),
        };
        self.session.set(session.clone()).await;

        tracing::info!(user = ?session.user_name, "Logged in to property API");
        Ok(session)
    }

    /// Clear the stored session. No request is made.
    pub async fn logout(&self) {
        if self.session.remove().await.is_some() {
            tracing::info!("Logged out of property API");
        }
    }

    /// `POST /api/users`
    pub async fn register_user(&self, user: &NewUser) -> ClientResult<User> {
        let request = self
            .client
            .post(self.config.url(&self.config.routes.users))
            .headers(Self::json_headers())
            .json(user);
        decode(self.execute(request).await?, Some("user"))
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    pub async fn list_properties(&self) -> ClientResult<Vec<Property>> {
        self.get(&self.config.routes.properties, Some("properties")).await
    }

    pub async fn get_property(&self, id: &Id) -> ClientResult<Property> {
        self.get(&Self::item(&self.config.routes.properties, id), Some("property"))
            .await
    }

    pub async fn create_property(&self, property: &NewProperty) -> ClientResult<Property> {
        tracing::info!(name = %property.name, "Registering property");
        self.send_json(Method::POST, &self.config.routes.properties, property, Some("property"))
            .await
    }

    pub async fn update_property(&self, id: &Id, property: &NewProperty) -> ClientResult<Property> {
        tracing::info!(%id, name = %property.name, "Updating property");
        self.send_json(
            Method::PUT,
            &Self::item(&self.config.routes.properties, id),
            property,
            Some("property"),
        )
        .await
    }

    pub async fn delete_property(&self, id: &Id) -> ClientResult<()> {
        self.delete(&Self::item(&self.config.routes.properties, id)).await
    }

    // -----------------------------------------------------------------------
    // Transactions and categories
    // -----------------------------------------------------------------------

    pub async fn list_transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.get(&self.config.routes.transactions, Some("transactions")).await
    }

    pub async fn create_transaction(&self, draft: &TransactionDraft) -> ClientResult<Transaction> {
        self.send_json(
            Method::POST,
            &self.config.routes.transactions,
            draft,
            Some("transaction"),
        )
        .await
    }

    pub async fn update_transaction(
        &self,
        id: &Id,
        draft: &TransactionDraft,
    ) -> ClientResult<Transaction> {
        self.send_json(
            Method::PUT,
            &Self::item(&self.config.routes.transactions, id),
            draft,
            Some("transaction"),
        )
        .await
    }

    pub async fn delete_transaction(&self, id: &Id) -> ClientResult<()> {
        self.delete(&Self::item(&self.config.routes.transactions, id)).await
    }

    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.get(&self.config.routes.categories, Some("categories")).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> ClientResult<Category> {
        category.validate()?;
        self.send_json(
            Method::POST,
            &self.config.routes.categories,
            category,
            Some("category"),
        )
        .await
    }

    pub async fn update_category(&self, id: &Id, category: &NewCategory) -> ClientResult<Category> {
        category.validate()?;
        self.send_json(
            Method::PUT,
            &Self::item(&self.config.routes.categories, id),
            category,
            Some("category"),
        )
        .await
    }

    pub async fn delete_category(&self, id: &Id) -> ClientResult<()> {
        self.delete(&Self::item(&self.config.routes.categories, id)).await
    }

    // -----------------------------------------------------------------------
    // Constructions (updated with PUT)
    // -----------------------------------------------------------------------

    pub async fn list_constructions(&self) -> ClientResult<Vec<Construction>> {
        self.get(&self.config.routes.constructions, Some("constructions")).await
    }

    pub async fn create_construction(&self, draft: &ConstructionDraft) -> ClientResult<Construction> {
        let payload = draft.payload()?;
        self.send_json(
            Method::POST,
            &self.config.routes.constructions,
            &payload,
            Some("construction"),
        )
        .await
    }

    pub async fn update_construction(
        &self,
        id: &Id,
        draft: &ConstructionDraft,
    ) -> ClientResult<Construction> {
        let payload = draft.payload()?;
        self.send_json(
            Method::PUT,
            &Self::item(&self.config.routes.constructions, id),
            &payload,
            Some("construction"),
        )
        .await
    }

    pub async fn delete_construction(&self, id: &Id) -> ClientResult<()> {
        self.delete(&Self::item(&self.config.routes.constructions, id)).await
    }

    // -----------------------------------------------------------------------
    // Tasks (updated with PATCH)
    // -----------------------------------------------------------------------

    pub async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        self.get(&self.config.routes.tasks, Some("tasks")).await
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> ClientResult<Task> {
        draft.validate()?;
        self.send_json(Method::POST, &self.config.routes.tasks, draft, Some("task"))
            .await
    }

    pub async fn update_task(&self, id: &Id, draft: &TaskDraft) -> ClientResult<Task> {
        draft.validate()?;
        self.send_json(
            Method::PATCH,
            &Self::item(&self.config.routes.tasks, id),
            draft,
            Some("task"),
        )
        .await
    }

    /// Move a task on the board without touching its other fields.
    pub async fn set_task_status(&self, id: &Id, status: TaskStatus) -> ClientResult<Task> {
        self.send_json(
            Method::PATCH,
            &Self::item(&self.config.routes.tasks, id),
            &json!({ "status": status }),
            Some("task"),
        )
        .await
    }

    pub async fn delete_task(&self, id: &Id) -> ClientResult<()> {
        self.delete(&Self::item(&self.config.routes.tasks, id)).await
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn item(collection: &str, id: &Id) -> String {
        format!("{}/{}", collection, id)
    }

    fn json_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    /// Content type plus `Authorization: Bearer <token>`.
    async fn auth_headers(&self) -> ClientResult<header::HeaderMap> {
        let token = match self.session.token().await {
            Some(token) => token,
            None => match &self.config.credentials {
                Credentials::Login { email, password } => {
                    let _guard = self.login_lock.lock().await;
                    // another request may have logged in while we waited
                    match self.session.token().await {
                        Some(token) => token,
                        None => self.login(email, password).await?.token,
                    }
                }
                _ => return Err(ClientError::NotAuthenticated),
            },
        };

        let mut headers = Self::json_headers();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        Ok(headers)
    }

    async fn authorized(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        Ok(self
            .client
            .request(method, self.config.url(path))
            .headers(self.auth_headers().await?))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, entity: Option<&str>) -> ClientResult<T> {
        let request = self.authorized(Method::GET, path).await?;
        decode(self.execute(request).await?, entity)
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        entity: Option<&str>,
    ) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.authorized(method, path).await?.json(body);
        decode(self.execute(request).await?, entity)
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorized(Method::DELETE, path).await?;
        self.execute(request).await?;
        Ok(())
    }

    /// Send and map the status. Empty bodies come back as `Value::Null`.
    async fn execute(&self, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!("Property API rejected the session token");
            return Err(ClientError::Unauthorized(body));
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Property API error: {}", body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}
