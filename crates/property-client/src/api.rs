use async_trait::async_trait;
use property_core::{Category, Construction, Property, Task, Transaction};

use crate::client::ApiClient;
use crate::error::ClientResult;

/// Read side of the property backend.
///
/// Consumers fetch collections through this trait so they can run against a
/// fixture as well as the live service.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    async fn properties(&self) -> ClientResult<Vec<Property>>;

    async fn transactions(&self) -> ClientResult<Vec<Transaction>>;

    async fn categories(&self) -> ClientResult<Vec<Category>>;

    async fn constructions(&self) -> ClientResult<Vec<Construction>>;

    async fn tasks(&self) -> ClientResult<Vec<Task>>;
}

#[async_trait]
impl PropertyApi for ApiClient {
    async fn properties(&self) -> ClientResult<Vec<Property>> {
        self.list_properties().await
    }

    async fn transactions(&self) -> ClientResult<Vec<Transaction>> {
        self.list_transactions().await
    }

    async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.list_categories().await
    }

    async fn constructions(&self) -> ClientResult<Vec<Construction>> {
        self.list_constructions().await
    }

    async fn tasks(&self) -> ClientResult<Vec<Task>> {
        self.list_tasks().await
    }
}
