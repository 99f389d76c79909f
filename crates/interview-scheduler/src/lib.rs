//! Interview slot publication, atomic slot booking, and OTP-gated signup.
//!
//! The `scheduling` module owns the per-interview slot grid and the claim
//! protocol that guarantees at most one occupant per slot. The `signup`
//! module owns the TTL-bounded staging area and the one-time-code gate that
//! together guarantee at most one promotion of a staged account into the
//! durable store.

pub mod config;
pub mod error;
pub mod scheduling;
pub mod signup;
pub mod telemetry;
