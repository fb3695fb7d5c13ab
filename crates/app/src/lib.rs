//! # voxhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement or inject:
//!   - `EventPublisher`: fan out state-change and scheduling events
//!   - `Clock`: the wall clock the scheduler and time parser read
//! - Own the in-memory **device store**, the single source of device status
//! - Run the **action scheduler**: immediate mutations, deferred one-shot
//!   timers, cancellation
//! - Provide the **chat service** use-case: utterance in, acknowledgment out
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `voxhub-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod scheduler;
pub mod services;
pub mod store;
