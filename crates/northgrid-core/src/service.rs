// ── Customer API seam ──
//
// The controller's async drivers and the TUI only see `dyn CustomerApi`.
// `CustomersClient` is the production implementation; tests plug in mocks.

use async_trait::async_trait;
use northgrid_api::{BearerToken, CustomerRecord, CustomersClient, TlsMode, TransportConfig};
use tracing::debug;

use crate::config::{ClientConfig, TlsVerification};
use crate::error::CoreError;

/// The four calls the customer grid needs.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn list(&self) -> Result<Vec<CustomerRecord>, CoreError>;

    async fn create(&self, record: &CustomerRecord) -> Result<CustomerRecord, CoreError>;

    async fn update(&self, record: &CustomerRecord) -> Result<CustomerRecord, CoreError>;

    async fn delete(&self, customer_id: &str) -> Result<(), CoreError>;
}

#[async_trait]
impl CustomerApi for CustomersClient {
    async fn list(&self) -> Result<Vec<CustomerRecord>, CoreError> {
        Ok(CustomersClient::list(self).await?)
    }

    async fn create(&self, record: &CustomerRecord) -> Result<CustomerRecord, CoreError> {
        Ok(CustomersClient::create(self, record).await?)
    }

    async fn update(&self, record: &CustomerRecord) -> Result<CustomerRecord, CoreError> {
        Ok(CustomersClient::update(self, record).await?)
    }

    async fn delete(&self, customer_id: &str) -> Result<(), CoreError> {
        Ok(CustomersClient::delete(self, customer_id).await?)
    }
}

/// Build the HTTP client described by `config`.
pub fn connect(config: &ClientConfig) -> Result<CustomersClient, CoreError> {
    let transport = TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    };
    let token = BearerToken::from(config.token.clone());
    debug!(endpoint = %config.endpoint, timeout = ?config.timeout, "building customers client");
    Ok(CustomersClient::new(config.endpoint.as_str(), token, &transport)?)
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn connect_keeps_endpoint() {
        let config = ClientConfig::new("https://localhost:7244/customers/".parse().unwrap());
        let client = connect(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), "https://localhost:7244/customers");
    }

    #[test]
    fn missing_ca_file_is_a_connection_error() {
        let mut config = ClientConfig::new("https://localhost:7244/customers".parse().unwrap());
        config.tls = TlsVerification::CustomCa("/nonexistent/northgrid-ca.pem".into());
        let err = connect(&config).err().unwrap();
        assert!(matches!(err, CoreError::ConnectionFailed { .. }));
    }
}
