//! HTTP outbound adapter.
//!
//! This module provides the reqwest implementation of the `ApiGateway`
//! port.

mod gateway;

pub use gateway::{HttpApiGateway, HttpGatewayConfig};
