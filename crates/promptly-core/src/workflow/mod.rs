//! Session workflow as a pure state machine.
//!
//! The workflow never touches the terminal or the network. Each call to
//! [`Workflow::handle`] mutates the session record and returns the effects
//! the caller must execute, then the caller feeds the outcome back as the
//! next [`Event`].

mod session;
mod state;
mod transition;

pub use session::{ReanalysisPolicy, Session};
pub use state::State;
pub use transition::{Effect, Event, Step, transition};

use crate::entities::OptionSet;
use crate::errors::CoreError;

/// A session record paired with its current state.
#[derive(Debug, Clone)]
pub struct Workflow {
    state: State,
    session: Session,
    policy: ReanalysisPolicy,
}

impl Workflow {
    #[must_use]
    pub fn new(defaults: OptionSet, policy: ReanalysisPolicy) -> Self {
        Self {
            state: State::CollectingPrompt,
            session: Session::new(defaults),
            policy,
        }
    }

    /// Effects that open a fresh session.
    #[must_use]
    pub fn start(&self) -> Vec<Effect> {
        vec![Effect::PromptForPrompt]
    }

    /// Feed one event. The state only advances when the event is accepted.
    ///
    /// # Errors
    ///
    /// Propagates [`CoreError`] from [`transition`].
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, CoreError> {
        let from = self.state;
        let step = transition(&mut self.session, from, event, self.policy)?;
        self.state = step.next;
        Ok(step.effects)
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn policy(&self) -> ReanalysisPolicy {
        self.policy
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}
