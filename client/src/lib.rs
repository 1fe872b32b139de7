//! Client library: session, catalog and watchlist synchronisation against
//! the remote streaming API.

pub mod cli;
pub mod config;
pub mod domain;
pub mod outbound;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;
