//! Port for client-durable string storage.
//!
//! String keys and string values; removing an absent key succeeds.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key/value storage adapters.
    pub enum KeyValueStoreError {
        /// The key is not acceptable to the backing store.
        InvalidKey { key: String } => Storage: "invalid storage key: {key}",
        /// Reading a value failed.
        Read { key: String, message: String } =>
            Storage: "failed to read {key}: {message}",
        /// Writing or removing a value failed.
        Write { key: String, message: String } =>
            Storage: "failed to write {key}: {message}",
    }
}

/// Durable string key/value storage.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
