//! Story Backend Adapters

mod fake_backend;
mod http_backend_client;
mod local_backend;

pub use fake_backend::FakeBackend;
pub use http_backend_client::{HttpBackendClient, HttpBackendClientConfig};
pub use local_backend::LocalBackend;
