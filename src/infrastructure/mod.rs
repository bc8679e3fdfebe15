pub mod config;
pub mod postgrest;
pub mod session_store;

pub use config::{BackendConfig, Config};
pub use postgrest::PostgrestGateway;
pub use session_store::SessionStore;
