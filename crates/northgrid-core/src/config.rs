// ── Runtime client configuration ──
//
// Describes how to reach the customers endpoint. Carries credential data
// but never touches disk; `northgrid-config` builds it from profiles.

use secrecy::SecretString;
use url::Url;

/// Original placeholder endpoint of the Northwind sample API.
pub const DEFAULT_ENDPOINT: &str = "https://localhost:7244/customers";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (dev servers with self-signed certs).
    DangerAcceptInvalid,
}

/// What the grid does when the list request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFailurePolicy {
    /// Empty the grid and show nothing (the failure is only logged).
    #[default]
    Lenient,
    /// Empty the grid and show the error like a failed mutation.
    Strict,
}

/// Configuration for talking to one customers endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Collection URL, e.g. `https://localhost:7244/customers`.
    pub endpoint: Url,
    /// Bearer token for mutating calls. `None` sends an empty token.
    pub token: Option<SecretString>,
    pub tls: TlsVerification,
    pub timeout: std::time::Duration,
    pub list_failure: ListFailurePolicy,
}

impl ClientConfig {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            token: None,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
            list_failure: ListFailurePolicy::default(),
        }
    }
}
