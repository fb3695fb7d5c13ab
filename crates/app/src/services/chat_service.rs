//! Chat service: turns one utterance into one acknowledgment.
//!
//! utterance → [`CommandInterpreter`] → (device, action, time phrase?)
//! → time phrase present: [`ActionScheduler::schedule_phrase`]
//! → otherwise: [`ActionScheduler::apply_now`]

use std::sync::Arc;

use voxhub_domain::command::CommandInterpreter;

use crate::ports::{Clock, EventPublisher};
use crate::scheduler::{Acknowledgment, ActionScheduler};

/// Reply used when no device or no action could be identified.
pub const NOT_UNDERSTOOD: &str = "I didn't understand that.";

pub struct ChatService<P, C> {
    interpreter: CommandInterpreter,
    scheduler: Arc<ActionScheduler<P, C>>,
}

impl<P, C> ChatService<P, C>
where
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    pub fn new(interpreter: CommandInterpreter, scheduler: Arc<ActionScheduler<P, C>>) -> Self {
        Self {
            interpreter,
            scheduler,
        }
    }

    /// Handle one free-text command. Always returns a non-empty reply and
    /// never waits for a deferred mutation.
    #[tracing::instrument(skip(self))]
    pub async fn handle(&self, utterance: &str) -> Acknowledgment {
        let interpretation = self.interpreter.interpret(utterance);
        tracing::debug!(?interpretation, "interpreted utterance");

        let Some((device, action)) = interpretation.intent() else {
            return Acknowledgment::text(NOT_UNDERSTOOD);
        };

        match interpretation.time_fragment.as_deref() {
            Some(fragment) => {
                self.scheduler
                    .schedule_phrase(device.clone(), action, fragment)
                    .await
            }
            None => self.scheduler.apply_now(device, action).await,
        }
    }
}
