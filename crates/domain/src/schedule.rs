//! Scheduled action: a device mutation deferred to a future instant.
//!
//! Lifecycle:
//!
//! ```text
//! Pending ──[timer fires]──▶ Fired
//!    │
//!    └──────[cancel]───────▶ Cancelled
//! ```
//!
//! Both transitions leave `Pending` for good; neither terminal state can be
//! left again.

use chrono::{DateTime, Duration, TimeZone};
use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, DeviceStatus};
use crate::error::ValidationError;
use crate::id::ScheduledActionId;
use crate::time::Timestamp;

/// Longest wall-clock distance between creating and firing an action.
pub const MAX_SCHEDULE_AHEAD: Duration = Duration::hours(24);

/// Check that `fire_at` is strictly after `created_at` and at most
/// [`MAX_SCHEDULE_AHEAD`] ahead on the local wall clock.
///
/// The window is measured between local times, not elapsed time: a rollover
/// to the same wall-clock time tomorrow fits even across a 25-hour
/// fall-back day.
///
/// # Errors
///
/// Returns [`ValidationError::FireAtNotInFuture`] or
/// [`ValidationError::FireAtBeyondWindow`].
pub fn check_fire_at<Tz: TimeZone>(
    fire_at: &DateTime<Tz>,
    created_at: &DateTime<Tz>,
) -> Result<(), ValidationError> {
    if fire_at <= created_at {
        return Err(ValidationError::FireAtNotInFuture);
    }
    if fire_at.naive_local() - created_at.naive_local() > MAX_SCHEDULE_AHEAD {
        return Err(ValidationError::FireAtBeyondWindow);
    }
    Ok(())
}

/// Lifecycle state of a [`ScheduledAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionState {
    Pending,
    Fired,
    Cancelled,
}

/// One deferred device mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub id: ScheduledActionId,
    pub device_id: DeviceId,
    pub target_status: DeviceStatus,
    pub fire_at: Timestamp,
    pub created_at: Timestamp,
    pub state: ActionState,
}

impl ScheduledAction {
    /// Create a pending action.
    ///
    /// # Errors
    ///
    /// See [`check_fire_at`].
    pub fn new(
        device_id: DeviceId,
        target_status: DeviceStatus,
        fire_at: Timestamp,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        check_fire_at(&fire_at, &created_at)?;
        Ok(Self {
            id: ScheduledActionId::new(),
            device_id,
            target_status,
            fire_at,
            created_at,
            state: ActionState::Pending,
        })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state == ActionState::Pending
    }

    /// Time left between `now` and `fire_at`, clamped at zero.
    #[must_use]
    pub fn delay_from(&self, now: Timestamp) -> std::time::Duration {
        (self.fire_at - now).to_std().unwrap_or_default()
    }

    /// Pending → Fired. Returns `false` (and changes nothing) from any other state.
    #[must_use]
    pub fn mark_fired(&mut self) -> bool {
        self.leave_pending(ActionState::Fired)
    }

    /// Pending → Cancelled. Returns `false` (and changes nothing) from any other state.
    #[must_use]
    pub fn mark_cancelled(&mut self) -> bool {
        self.leave_pending(ActionState::Cancelled)
    }

    fn leave_pending(&mut self, next: ActionState) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = next;
        true
    }
}
