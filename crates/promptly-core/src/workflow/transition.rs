use crate::entities::{Analysis, OptimizedResult, OptionSet};
use crate::errors::CoreError;
use crate::templates::system_message_for;

use super::session::{ReanalysisPolicy, Session};
use super::state::State;

/// Input fed to the workflow by the terminal adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PromptEntered(String),
    Analyzed(Analysis),
    ClarifyChosen(bool),
    /// Result of the clarification rewrite. `None` when it failed or was skipped.
    Clarified(Option<String>),
    OptionsChosen(OptionSet),
    Optimized(OptimizedResult),
    OptimizationFailed,
    RetryOptimization,
    Accept,
    AdjustOptions,
    RefineRequested(String),
    /// Result of a manual refinement. `None` when the rewrite failed.
    Refined(Option<String>),
    Restart,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PromptEntered(_) => "prompt_entered",
            Self::Analyzed(_) => "analyzed",
            Self::ClarifyChosen(_) => "clarify_chosen",
            Self::Clarified(_) => "clarified",
            Self::OptionsChosen(_) => "options_chosen",
            Self::Optimized(_) => "optimized",
            Self::OptimizationFailed => "optimization_failed",
            Self::RetryOptimization => "retry_optimization",
            Self::Accept => "accept",
            Self::AdjustOptions => "adjust_options",
            Self::RefineRequested(_) => "refine_requested",
            Self::Refined(_) => "refined",
            Self::Restart => "restart",
        }
    }
}

/// Work the adapter must perform after a transition.
///
/// Each effect that waits on the user or the network is answered by exactly
/// one [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask for a raw prompt. Answered by [`Event::PromptEntered`].
    PromptForPrompt,
    /// Run the remote analyzer. Answered by [`Event::Analyzed`].
    Analyze { prompt: String },
    ShowAnalysis(Analysis),
    /// Ask whether to clarify. Answered by [`Event::ClarifyChosen`].
    AskToClarify { ambiguities: Vec<String> },
    /// Generate questions, collect answers, rewrite. Answered by [`Event::Clarified`].
    RequestClarifications {
        prompt: String,
        ambiguities: Vec<String>,
    },
    /// Run the options wizard. Answered by [`Event::OptionsChosen`].
    PromptForOptions { defaults: OptionSet },
    /// Run the remote optimizer. Answered by [`Event::Optimized`] or
    /// [`Event::OptimizationFailed`].
    Optimize { system_message: String },
    ShowResult(OptimizedResult),
    /// Offer accept / adjust / refine / restart.
    PromptForRefinement,
    /// Offer retry / adjust / restart after a failed optimization.
    RecoverFromFailure,
    /// Run a manual refinement. Answered by [`Event::Refined`].
    Refine { prompt: String, instructions: String },
    Finish(OptimizedResult),
}

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: State,
    pub effects: Vec<Effect>,
}

impl Step {
    fn to(next: State, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

fn invalid(state: State, event: &Event) -> CoreError {
    CoreError::InvalidTransition {
        from: state.to_string(),
        event: event.name().to_string(),
    }
}

fn configure(session: &Session) -> Step {
    Step::to(
        State::ConfiguringOptions,
        vec![Effect::PromptForOptions {
            defaults: session.options.clone(),
        }],
    )
}

fn optimize(session: &Session) -> Step {
    Step::to(
        State::Optimizing,
        vec![Effect::Optimize {
            system_message: system_message_for(&session.options, session.task_type()),
        }],
    )
}

fn restart(session: &mut Session) -> Step {
    session.restart();
    Step::to(State::CollectingPrompt, vec![Effect::PromptForPrompt])
}

fn current_result(session: &mut Session) -> Result<&mut OptimizedResult, CoreError> {
    session
        .optimized
        .as_mut()
        .ok_or_else(|| CoreError::Validation("refining without an optimized result".into()))
}

/// Apply `event` to a session in `state`.
///
/// Mutates only the session record. All I/O is described by the returned
/// effects. Events the state does not accept yield
/// [`CoreError::InvalidTransition`] and leave the session untouched.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTransition`] for unexpected events and
/// [`CoreError::Validation`] when refining without a result.
pub fn transition(
    session: &mut Session,
    state: State,
    event: Event,
    policy: ReanalysisPolicy,
) -> Result<Step, CoreError> {
    let step = match (state, event) {
        (State::CollectingPrompt, Event::PromptEntered(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Step::to(State::CollectingPrompt, vec![Effect::PromptForPrompt])
            } else {
                session.raw_prompt = text.to_string();
                Step::to(
                    State::Analyzing,
                    vec![Effect::Analyze {
                        prompt: session.raw_prompt.clone(),
                    }],
                )
            }
        }

        (State::Analyzing, Event::Analyzed(analysis)) => {
            let ambiguities = analysis.ambiguities.clone();
            session.analysis = Some(analysis.clone());
            if ambiguities.is_empty() {
                let mut step = configure(session);
                step.effects.insert(0, Effect::ShowAnalysis(analysis));
                step
            } else {
                Step::to(
                    State::AwaitingClarificationChoice,
                    vec![
                        Effect::ShowAnalysis(analysis),
                        Effect::AskToClarify { ambiguities },
                    ],
                )
            }
        }

        (State::AwaitingClarificationChoice, Event::ClarifyChosen(true)) => Step::to(
            State::ClarifyingAmbiguities,
            vec![Effect::RequestClarifications {
                prompt: session.raw_prompt.clone(),
                ambiguities: session
                    .analysis
                    .as_ref()
                    .map(|analysis| analysis.ambiguities.clone())
                    .unwrap_or_default(),
            }],
        ),
        (State::AwaitingClarificationChoice, Event::ClarifyChosen(false)) => configure(session),

        (State::ClarifyingAmbiguities, Event::Clarified(rewritten)) => {
            match rewritten.as_deref().map(str::trim).filter(|text| !text.is_empty()) {
                Some(text) => {
                    session.raw_prompt = text.to_string();
                    match policy {
                        // The pre-clarification analysis stays in place.
                        ReanalysisPolicy::KeepAnalysis => configure(session),
                        ReanalysisPolicy::Reanalyze => Step::to(
                            State::Reanalyzing,
                            vec![Effect::Analyze {
                                prompt: session.raw_prompt.clone(),
                            }],
                        ),
                    }
                }
                None => configure(session),
            }
        }

        (State::Reanalyzing, Event::Analyzed(analysis)) => {
            session.analysis = Some(analysis.clone());
            let mut step = configure(session);
            step.effects.insert(0, Effect::ShowAnalysis(analysis));
            step
        }

        (State::ConfiguringOptions, Event::OptionsChosen(options)) => {
            session.options = options;
            optimize(session)
        }

        (State::Optimizing, Event::Optimized(result)) => {
            session.optimized = Some(result.clone());
            Step::to(
                State::Refining,
                vec![Effect::ShowResult(result), Effect::PromptForRefinement],
            )
        }
        (State::Optimizing, Event::OptimizationFailed) => {
            Step::to(State::Optimizing, vec![Effect::RecoverFromFailure])
        }
        (State::Optimizing, Event::RetryOptimization) => optimize(session),

        (State::Refining, Event::Accept) => {
            let result = current_result(session)?.clone();
            Step::to(State::Accepted, vec![Effect::Finish(result)])
        }
        (State::Refining, Event::RefineRequested(instructions)) => {
            let instructions = instructions.trim();
            if instructions.is_empty() {
                Step::to(State::Refining, vec![Effect::PromptForRefinement])
            } else {
                let prompt = current_result(session)?.prompt.clone();
                Step::to(
                    State::Refining,
                    vec![Effect::Refine {
                        prompt,
                        instructions: instructions.to_string(),
                    }],
                )
            }
        }
        (State::Refining, Event::Refined(Some(refined))) => {
            let result = current_result(session)?;
            result.apply_refinement(refined.trim().to_string());
            let shown = result.clone();
            Step::to(
                State::Refining,
                vec![Effect::ShowResult(shown), Effect::PromptForRefinement],
            )
        }
        (State::Refining, Event::Refined(None)) => {
            Step::to(State::Refining, vec![Effect::PromptForRefinement])
        }

        (State::Optimizing | State::Refining, Event::AdjustOptions) => configure(session),
        (State::Optimizing | State::Refining, Event::Restart) => restart(session),

        (state, event) => return Err(invalid(state, &event)),
    };

    debug_assert!(
        state.can_transition_to(step.next),
        "{state} -> {} is not an allowed transition",
        step.next
    );
    Ok(step)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::enums::TaskType;

    fn analysis(ambiguities: &[&str]) -> Analysis {
        Analysis {
            task_type: TaskType::Creative,
            intent: "write a story".into(),
            key_concepts: vec!["story".into()],
            tone: "neutral".into(),
            clarity: 7,
            ambiguities: ambiguities.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn empty_prompt_stays_collecting() {
        let mut session = Session::default();
        let step = transition(
            &mut session,
            State::CollectingPrompt,
            Event::PromptEntered("   \n".into()),
            ReanalysisPolicy::default(),
        )
        .unwrap();
        assert_eq!(step.next, State::CollectingPrompt);
        assert_eq!(step.effects, vec![Effect::PromptForPrompt]);
        assert!(session.raw_prompt.is_empty());
    }

    #[test]
    fn prompt_is_trimmed_and_analyzed() {
        let mut session = Session::default();
        let step = transition(
            &mut session,
            State::CollectingPrompt,
            Event::PromptEntered("  write a poem \n".into()),
            ReanalysisPolicy::default(),
        )
        .unwrap();
        assert_eq!(step.next, State::Analyzing);
        assert_eq!(
            step.effects,
            vec![Effect::Analyze {
                prompt: "write a poem".into()
            }]
        );
    }

    #[test]
    fn no_ambiguities_skips_clarification() {
        let mut session = Session::default();
        let step = transition(
            &mut session,
            State::Analyzing,
            Event::Analyzed(analysis(&[])),
            ReanalysisPolicy::default(),
        )
        .unwrap();
        assert_eq!(step.next, State::ConfiguringOptions);
        assert!(matches!(step.effects[0], Effect::ShowAnalysis(_)));
        assert!(matches!(step.effects[1], Effect::PromptForOptions { .. }));
    }

    #[test]
    fn ambiguities_ask_before_clarifying() {
        let mut session = Session::default();
        let step = transition(
            &mut session,
            State::Analyzing,
            Event::Analyzed(analysis(&["which planet?"])),
            ReanalysisPolicy::default(),
        )
        .unwrap();
        assert_eq!(step.next, State::AwaitingClarificationChoice);
        assert_eq!(
            step.effects[1],
            Effect::AskToClarify {
                ambiguities: vec!["which planet?".into()]
            }
        );
    }

    #[test]
    fn failed_clarification_keeps_prompt() {
        let mut session = Session {
            raw_prompt: "original".into(),
            ..Session::default()
        };
        let step = transition(
            &mut session,
            State::ClarifyingAmbiguities,
            Event::Clarified(None),
            ReanalysisPolicy::Reanalyze,
        )
        .unwrap();
        assert_eq!(step.next, State::ConfiguringOptions);
        assert_eq!(session.raw_prompt, "original");
    }

    #[test]
    fn optimization_failure_does_not_advance() {
        let mut session = Session::default();
        let step = transition(
            &mut session,
            State::Optimizing,
            Event::OptimizationFailed,
            ReanalysisPolicy::default(),
        )
        .unwrap();
        assert_eq!(step.next, State::Optimizing);
        assert_eq!(step.effects, vec![Effect::RecoverFromFailure]);
        assert!(session.optimized.is_none());
    }

    #[test]
    fn accept_is_rejected_while_optimizing() {
        let mut session = Session::default();
        let err = transition(
            &mut session,
            State::Optimizing,
            Event::Accept,
            ReanalysisPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: "optimizing".into(),
                event: "accept".into(),
            }
        );
    }

    #[test]
    fn blank_refinement_instructions_reprompt() {
        let mut session = Session {
            optimized: Some(OptimizedResult {
                prompt: "p".into(),
                improvements: Vec::new(),
            }),
            ..Session::default()
        };
        let step = transition(
            &mut session,
            State::Refining,
            Event::RefineRequested("  ".into()),
            ReanalysisPolicy::default(),
        )
        .unwrap();
        assert_eq!(step.effects, vec![Effect::PromptForRefinement]);
    }

    #[test]
    fn refining_without_result_is_a_validation_error() {
        let mut session = Session::default();
        let err = transition(
            &mut session,
            State::Refining,
            Event::Accept,
            ReanalysisPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
