// northgrid-api: Async Rust client for the Northwind customers resource

pub mod auth;
pub mod customers;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::BearerToken;
pub use customers::CustomersClient;
pub use error::{Error, FieldError};
pub use transport::{TlsMode, TransportConfig};
pub use types::{Address, CustomerRecord};
