//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the client core expects to interact with driven
//! adapters: the remote API and client-durable storage. Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants instead of returning `anyhow::Result`.

mod api_gateway;
mod credential_store;
mod key_value_store;
mod macros;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use api_gateway::MockApiGateway;
pub use api_gateway::{ApiGateway, ApiRequest, HttpMethod};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, StoredCredential};
#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
