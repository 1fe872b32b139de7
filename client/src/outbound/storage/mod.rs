//! Client-durable storage adapters.
//!
//! Key/value adapters implement the `KeyValueStore` port; the credential
//! store layers the token-and-user contract on top of any of them.

mod atomic_io;
mod credential_store;
mod directory;
mod memory;

pub use credential_store::{KeyValueCredentialStore, TOKEN_KEY, USER_KEY};
pub use directory::DirKeyValueStore;
pub use memory::MemoryKeyValueStore;
