//! Cross-crate integration tests for Mirage.
//!
//! This suite validates:
//! - profile persistence and reset through the session
//! - agreement of identity values across query surfaces and rewritten requests
//! - policy tier precedence on the built-in lists
//! - hardware template stability under per-call jitter

pub mod test_utils;

#[cfg(test)]
mod identity_lifecycle_tests;

#[cfg(test)]
mod cross_surface_tests;

#[cfg(test)]
mod policy_precedence_tests;

#[cfg(test)]
mod hardware_stability_tests;
