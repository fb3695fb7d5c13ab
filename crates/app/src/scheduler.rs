//! Action scheduler: the only writer of device state.
//!
//! Mutations arrive either immediately ([`ActionScheduler::apply_now`]) or as
//! deferred actions ([`ActionScheduler::schedule`]). Deferred actions are
//! kept in a registry keyed by id plus a queue ordered by
//! `(deadline, sequence)`. A single dispatcher task sleeps until the head of
//! the queue is due and fires due actions one after another, so an action
//! with an earlier `fire_at` is always committed before a later one starts.
//! Actions sharing a deadline fire in the order they were scheduled.
//!
//! Firing and cancelling both claim an action by removing it from the
//! registry under the same lock; whichever gets there first wins and the
//! other becomes a no-op.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use voxhub_domain::device::{DeviceId, DeviceState, DeviceStatus};
use voxhub_domain::event::{Event, EventKind};
use voxhub_domain::id::ScheduledActionId;
use voxhub_domain::schedule::ScheduledAction;
use voxhub_domain::time::{Timestamp, format_clock_time};
use voxhub_domain::time_expression;

use crate::ports::{Clock, EventPublisher};
use crate::store::DeviceStore;

/// Human-readable reply to a command, returned without waiting for any
/// deferred effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub message: String,
    /// Id of the action armed by this command, if any.
    pub scheduled: Option<ScheduledActionId>,
}

impl Acknowledgment {
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            scheduled: None,
        }
    }

    fn armed(message: String, id: ScheduledActionId) -> Self {
        Self {
            message,
            scheduled: Some(id),
        }
    }
}

impl fmt::Display for Acknowledgment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type QueueKey = (Instant, u64);

#[derive(Default)]
struct Registry {
    pending: HashMap<ScheduledActionId, (ScheduledAction, QueueKey)>,
    queue: BTreeMap<QueueKey, ScheduledActionId>,
    next_seq: u64,
}

impl Registry {
    fn insert(&mut self, action: ScheduledAction, deadline: Instant) {
        let key = (deadline, self.next_seq);
        self.next_seq += 1;
        self.queue.insert(key, action.id);
        self.pending.insert(action.id, (action, key));
    }

    fn remove(&mut self, id: ScheduledActionId) -> Option<ScheduledAction> {
        let (action, key) = self.pending.remove(&id)?;
        self.queue.remove(&key);
        Some(action)
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    fn pop_due(&mut self, now: Instant) -> Option<ScheduledAction> {
        let (&key, &id) = self.queue.first_key_value()?;
        if key.0 > now {
            return None;
        }
        self.queue.remove(&key);
        self.pending.remove(&id).map(|(action, _)| action)
    }

    fn ordered(&self) -> Vec<ScheduledAction> {
        self.queue
            .values()
            .filter_map(|id| self.pending.get(id).map(|(action, _)| action.clone()))
            .collect()
    }
}

struct Inner<P, C> {
    store: DeviceStore,
    registry: Mutex<Registry>,
    wake: Notify,
    publisher: P,
    clock: C,
}

impl<P, C> Inner<P, C>
where
    P: EventPublisher + Send + Sync,
    C: Clock,
{
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn commit(
        &self,
        device_id: &DeviceId,
        status: DeviceStatus,
        was_scheduled: bool,
    ) -> DeviceState {
        let state = self.store.apply(device_id, status, self.clock.now());
        self.publish(Event::state_changed(
            state.id.clone(),
            state.status,
            was_scheduled,
        ))
        .await;
        state
    }

    async fn publish(&self, event: Event) {
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(error = %err, "failed to publish event");
        }
    }

    async fn fire_due(&self) {
        loop {
            let due = self.registry().pop_due(Instant::now());
            let Some(mut action) = due else {
                break;
            };
            if !action.mark_fired() {
                tracing::warn!(
                    action_id = %action.id,
                    state = ?action.state,
                    "registry held a settled action"
                );
                continue;
            }
            let state = self
                .commit(&action.device_id, action.target_status, true)
                .await;
            tracing::info!(
                action_id = %action.id,
                "{} turned {} (scheduled)",
                state.id,
                state.status
            );
            self.publish(Event::new(EventKind::ActionFired { action }))
                .await;
        }
    }
}

async fn dispatch<P, C>(inner: Arc<Inner<P, C>>)
where
    P: EventPublisher + Send + Sync,
    C: Clock,
{
    loop {
        let next = inner.registry().next_deadline();
        match next {
            Some(deadline) => {
                tokio::select! {
                    () = tokio::time::sleep_until(deadline) => inner.fire_due().await,
                    () = inner.wake.notified() => {}
                }
            }
            None => inner.wake.notified().await,
        }
    }
}

/// Owns the device store and the pending-action registry.
///
/// Dropping the scheduler stops its dispatcher; pending actions are discarded.
pub struct ActionScheduler<P, C> {
    inner: Arc<Inner<P, C>>,
    dispatcher: JoinHandle<()>,
}

impl<P, C> ActionScheduler<P, C>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    /// Take ownership of `store` and start the timer dispatcher.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(store: DeviceStore, publisher: P, clock: C) -> Self {
        let inner = Arc::new(Inner {
            store,
            registry: Mutex::new(Registry::default()),
            wake: Notify::new(),
            publisher,
            clock,
        });
        let dispatcher = tokio::spawn(dispatch(Arc::clone(&inner)));
        Self { inner, dispatcher }
    }

    /// Snapshot of every device, ordered by id.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceState> {
        self.inner.store.snapshot()
    }

    #[must_use]
    pub fn device(&self, id: &DeviceId) -> Option<DeviceState> {
        self.inner.store.get(id)
    }

    /// Pending actions, earliest `fire_at` first.
    #[must_use]
    pub fn pending(&self) -> Vec<ScheduledAction> {
        self.inner.registry().ordered()
    }

    /// Set a device's status right away. Unknown devices are registered.
    pub async fn apply_now(&self, device_id: &DeviceId, action: DeviceStatus) -> Acknowledgment {
        let state = self.inner.commit(device_id, action, false).await;
        tracing::info!(device = %state.id, status = %state.status, "device updated");
        Acknowledgment::text(format!("{} turned {}", state.id, state.status))
    }

    /// Arm a one-shot timer that applies `action` to `device_id` at `fire_at`.
    ///
    /// `fire_at` is `None` when the time phrase could not be parsed; the reply
    /// then echoes `fragment` back and nothing is armed. Duplicate schedules
    /// for the same device and action are kept and fire independently.
    pub async fn schedule(
        &self,
        device_id: DeviceId,
        action: DeviceStatus,
        fire_at: Option<Timestamp>,
        fragment: &str,
    ) -> Acknowledgment {
        let now = self.inner.clock.now();
        self.arm(device_id, action, fire_at, fragment, now).await
    }

    /// Resolve the time phrase `fragment` and [`schedule`](Self::schedule) the
    /// result. The clock is read once, so the parsed instant and the
    /// validation that follows agree on "now".
    pub async fn schedule_phrase(
        &self,
        device_id: DeviceId,
        action: DeviceStatus,
        fragment: &str,
    ) -> Acknowledgment {
        let now = self.inner.clock.now();
        let fire_at = time_expression::parse(fragment, &now)
            .inspect_err(|err| {
                tracing::debug!(error = %err, fragment, "time not parsed");
            })
            .ok();
        self.arm(device_id, action, fire_at, fragment, now).await
    }

    async fn arm(
        &self,
        device_id: DeviceId,
        action: DeviceStatus,
        fire_at: Option<Timestamp>,
        fragment: &str,
        now: Timestamp,
    ) -> Acknowledgment {
        let Some(fire_at) = fire_at else {
            tracing::debug!(device = %device_id, fragment, "unparsable time, nothing scheduled");
            return Acknowledgment::text(format!("Could not understand time: \"{fragment}\""));
        };

        let scheduled = match ScheduledAction::new(device_id.clone(), action, fire_at, now) {
            Ok(scheduled) => scheduled,
            Err(err) => {
                tracing::warn!(device = %device_id, %fire_at, error = %err, "rejected schedule");
                return Acknowledgment::text(format!(
                    "Cannot turn {action} {device_id} at {}: {err}",
                    format_clock_time(&fire_at)
                ));
            }
        };

        let deadline = Instant::now() + scheduled.delay_from(now);
        let message = format!(
            "Okay, I will turn {} {} at {}",
            scheduled.target_status,
            scheduled.device_id,
            format_clock_time(&scheduled.fire_at)
        );
        let id = scheduled.id;

        self.inner.registry().insert(scheduled.clone(), deadline);
        self.inner.wake.notify_one();

        tracing::info!(
            action_id = %id,
            device = %scheduled.device_id,
            status = %scheduled.target_status,
            fire_at = %scheduled.fire_at,
            "action scheduled"
        );
        self.inner
            .publish(Event::new(EventKind::ActionScheduled { action: scheduled }))
            .await;

        Acknowledgment::armed(message, id)
    }

    /// Cancel a pending action so it never applies.
    ///
    /// Returns `false` when the action is unknown, already fired or already
    /// cancelled.
    pub async fn cancel(&self, id: ScheduledActionId) -> bool {
        let removed = self.inner.registry().remove(id);
        let Some(mut action) = removed else {
            tracing::debug!(action_id = %id, "cancellation ignored, action is not pending");
            return false;
        };
        if !action.mark_cancelled() {
            tracing::warn!(
                action_id = %id,
                state = ?action.state,
                "registry held a settled action"
            );
            return false;
        }
        self.inner.wake.notify_one();

        tracing::info!(action_id = %id, device = %action.device_id, "action cancelled");
        self.inner
            .publish(Event::new(EventKind::ActionCancelled {
                action_id: id,
                device_id: action.device_id,
            }))
            .await;
        true
    }
}

impl<P, C> Drop for ActionScheduler<P, C> {
    fn drop(&mut self) {
        self.dispatcher.abort();
    }
}
