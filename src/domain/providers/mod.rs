//! Upstream reputation provider abstraction.
//!
//! Concrete HTTP adapters live in `crate::infrastructure::providers`.

pub mod reputation_provider;

pub use reputation_provider::ReputationProvider;

#[cfg(test)]
pub use reputation_provider::MockReputationProvider;
