//! Shared liveness flag for an application context.
//!
//! Services check the flag before applying a response that arrived after
//! an await. Once disposed, late responses are dropped instead of mutating
//! state nobody observes any more.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle on one context's liveness.
///
/// # Examples
/// ```
/// use client::domain::Liveness;
///
/// let liveness = Liveness::new();
/// let observer = liveness.clone();
/// liveness.dispose();
/// assert!(!observer.is_alive());
/// ```
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    /// Create a live flag.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether the owning context is still live.
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the owning context disposed. Idempotent.
    pub fn dispose(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
