//! Event: an immutable record of something that happened.
//!
//! Events are published on every device mutation (immediate or scheduled)
//! and whenever an action is scheduled, fires or is cancelled. Observers
//! such as the SSE stream subscribe to them instead of polling the store.

use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, DeviceStatus};
use crate::id::{EventId, ScheduledActionId};
use crate::schedule::ScheduledAction;
use crate::time::{Timestamp, now};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A device status was committed to the store.
    StateChanged {
        device_id: DeviceId,
        status: DeviceStatus,
        /// `true` when the mutation came from a fired [`ScheduledAction`].
        was_scheduled: bool,
    },
    /// A deferred action was registered and its timer armed.
    ActionScheduled { action: ScheduledAction },
    /// A pending action fired; its mutation is committed and `action.state`
    /// is [`Fired`](crate::schedule::ActionState::Fired).
    ActionFired { action: ScheduledAction },
    /// A pending action was cancelled before it fired.
    ActionCancelled {
        action_id: ScheduledActionId,
        device_id: DeviceId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: now(),
            kind,
        }
    }

    #[must_use]
    pub fn state_changed(device_id: DeviceId, status: DeviceStatus, was_scheduled: bool) -> Self {
        Self::new(EventKind::StateChanged {
            device_id,
            status,
            was_scheduled,
        })
    }
}
