//! # voxhub-domain
//!
//! Pure domain model for the voxhub conversational device controller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (simulated on/off devices keyed by a stable name)
//! - Define **Scheduled actions** (deferred device mutations and their lifecycle)
//! - Define **Events** (state-change and scheduling notifications)
//! - Interpret free-text **commands** into a device, an action and a time phrase
//! - Resolve **time expressions** ("6:10 pm") into the next matching instant
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod device;
pub mod event;
pub mod schedule;
pub mod time_expression;
