//! Backend resources

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;

/// Error returned when parsing an unknown resource name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource '{0}' (expected customers or products)")]
pub struct UnknownResource(pub String);

/// A record collection served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Customers,
    Products,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::Customers, Resource::Products];

    /// Path of the resource below the API origin.
    pub fn base_path(self) -> &'static str {
        match self {
            Self::Customers => "/api/customers",
            Self::Products => "/api/products",
        }
    }

    /// Plural display name.
    pub fn title(self) -> &'static str {
        match self {
            Self::Customers => "Customers",
            Self::Products => "Products",
        }
    }

    /// Singular display name.
    pub fn record_name(self) -> &'static str {
        match self {
            Self::Customers => "Customer",
            Self::Products => "Product",
        }
    }

    /// Full base URL of the resource on `origin`.
    pub fn endpoint(self, origin: &str) -> Result<Url, url::ParseError> {
        Url::parse(origin)?.join(self.base_path())
    }

    /// Copies `template` with its base URL pointed at this resource.
    pub fn client_config(
        self,
        origin: &str,
        template: &ClientConfig,
    ) -> Result<ClientConfig, url::ParseError> {
        let mut config = template.clone();
        config.base_url = self.endpoint(origin)?.to_string();
        Ok(config)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customers => write!(f, "customers"),
            Self::Products => write!(f, "products"),
        }
    }
}

impl FromStr for Resource {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customers" | "customer" => Ok(Self::Customers),
            "products" | "product" => Ok(Self::Products),
            _ => Err(UnknownResource(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_origin() {
        let url = Resource::Customers.endpoint("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/customers");

        let url = Resource::Products.endpoint("http://api.local/ignored/").unwrap();
        assert_eq!(url.as_str(), "http://api.local/api/products");
    }

    #[test]
    fn test_endpoint_rejects_garbage() {
        assert!(Resource::Products.endpoint("not a url").is_err());
    }

    #[test]
    fn test_client_config_keeps_template_settings() {
        let template = ClientConfig::new("").with_retry_attempts(1);
        let config = Resource::Products
            .client_config("http://localhost:8001", &template)
            .unwrap();
        assert_eq!(config.base_url, "http://localhost:8001/api/products");
        assert_eq!(config.retry_attempts, 1);
    }

    #[test]
    fn test_parse() {
        assert_eq!("customers".parse(), Ok(Resource::Customers));
        assert_eq!("Product".parse(), Ok(Resource::Products));
        assert!("orders".parse::<Resource>().is_err());
        assert_eq!(Resource::Products.to_string(), "products");
    }
}
