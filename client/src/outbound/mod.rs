//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed `ApiGateway` talking to the remote API
//! - **storage**: key/value stores and the credential store built on them
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod http;
pub mod storage;
