//! REST client for the property backend: session store, bearer-authenticated
//! CRUD over properties, transactions, categories, constructions and tasks.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use api::PropertyApi;
pub use client::ApiClient;
pub use config::{ApiRoutes, ClientConfig, Credentials};
pub use error::{ClientError, ClientResult};
pub use models::{unwrap_payload, LoginRequest, LoginResponse, NewCategory, NewUser, User};
pub use session::{Session, SessionContext};
