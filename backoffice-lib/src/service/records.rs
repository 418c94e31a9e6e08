//! Record services for the backend resources

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::Resource;
use crate::FetchClient;
use crate::config::ClientConfig;
use crate::error::ErrorDescriptor;
use crate::fetch::RequestOptions;
use crate::model::Row;
use crate::model::TableData;

/// Payload for creating a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl NewCustomer {
    /// Creates an active customer.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            is_active: true,
        }
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Payload for creating a product. The price is sent as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// Read and create operations of one resource's table endpoint.
#[derive(Debug, Clone)]
pub struct RecordService {
    resource: Resource,
    client: FetchClient,
}

impl RecordService {
    /// Path of the table endpoint below the resource base URL.
    pub const TABLE_PATH: &'static str = "/table";

    /// Wraps a client whose base URL already points at `resource`.
    pub fn new(resource: Resource, client: FetchClient) -> Self {
        Self { resource, client }
    }

    /// Builds a client for `resource` on `origin` with `template`'s
    /// timeout and retry settings.
    pub fn connect(
        resource: Resource,
        origin: &str,
        template: &ClientConfig,
    ) -> Result<Self, url::ParseError> {
        let config = resource.client_config(origin, template)?;
        Ok(Self::new(resource, FetchClient::from_config(&config)))
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    /// Fetches column descriptors and rows.
    ///
    /// An empty response body yields an empty table.
    pub async fn get_all(&self, cancel: Option<CancellationToken>) -> Result<TableData, ErrorDescriptor> {
        let payload = self.client.get(Self::TABLE_PATH, options(cancel)).await?;
        if payload.is_null() {
            return Ok(TableData::default());
        }
        serde_json::from_value(payload).map_err(|e| {
            ErrorDescriptor::unknown(Self::TABLE_PATH, format!("Malformed {} table: {}", self.resource, e))
        })
    }

    /// Creates a record and returns it as stored by the server.
    pub async fn create<B: Serialize + ?Sized>(
        &self,
        record: &B,
        cancel: Option<CancellationToken>,
    ) -> Result<Row, ErrorDescriptor> {
        self.client
            .post_as(Self::TABLE_PATH, record, options(cancel))
            .await
    }
}

fn options(cancel: Option<CancellationToken>) -> RequestOptions {
    match cancel {
        Some(token) => RequestOptions::new().cancel_token(token),
        None => RequestOptions::new(),
    }
}
