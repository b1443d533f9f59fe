use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Context;
use promptly_core::entities::{CustomOptions, OptimizedResult, OptionSet};
use promptly_core::enums::{Complexity, Format, Length, Template, Tone};
use promptly_core::workflow::{Effect, Event, Session, Workflow};
use promptly_llm::{Analyzer, CompletionBackend, Optimizer};

use super::{Notice, Prompter, choose};
use crate::progress::Progress;
use crate::save;

const REFINE_CHOICES: [&str; 4] = [
    "Accept and finish",
    "Adjust optimization options",
    "Add specific refinement instructions",
    "Start over with a new prompt",
];

const RECOVER_CHOICES: [&str; 3] = [
    "Retry the optimization",
    "Adjust optimization options",
    "Start over with a new prompt",
];

const CONFIG_KIND_CHOICES: [&str; 2] = ["Use a preset template", "Custom configuration"];

/// Runs one interactive session to completion.
///
/// Effects are executed in order. Each effect that produces an [`Event`] is
/// fed back into the workflow and the resulting effects are queued.
pub struct Driver<'a, B, P> {
    analyzer: Analyzer<'a, B>,
    optimizer: Optimizer<'a, B>,
    prompter: &'a mut P,
    custom_defaults: CustomOptions,
    output_dir: PathBuf,
    filename: Option<String>,
}

impl<'a, B: CompletionBackend, P: Prompter> Driver<'a, B, P> {
    /// `custom_defaults` seed the custom options wizard whenever the session
    /// currently uses a template.
    pub const fn new(
        backend: &'a B,
        prompter: &'a mut P,
        custom_defaults: CustomOptions,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            analyzer: Analyzer::new(backend),
            optimizer: Optimizer::new(backend),
            prompter,
            custom_defaults,
            output_dir,
            filename: None,
        }
    }

    /// Filename offered when saving instead of the dated default.
    #[must_use]
    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    /// Drive `workflow` until the user accepts a result, then offer to save it.
    pub async fn run(&mut self, mut workflow: Workflow) -> anyhow::Result<OptimizedResult> {
        let mut pending: VecDeque<Effect> = workflow.start().into();
        let mut accepted = None;

        while let Some(effect) = pending.pop_front() {
            if let Effect::Finish(result) = effect {
                accepted = Some(result);
                continue;
            }
            if let Some(event) = self.execute(effect, workflow.session()).await? {
                tracing::debug!(state = %workflow.state(), event = event.name(), "session event");
                pending.extend(workflow.handle(event)?);
            }
        }

        let result = accepted.context("session ended without an accepted prompt")?;
        self.prompter
            .show(Notice::Success("Optimization complete!".into()));
        self.offer_save(&result)?;
        Ok(result)
    }

    async fn execute(&mut self, effect: Effect, session: &Session) -> anyhow::Result<Option<Event>> {
        let event = match effect {
            Effect::PromptForPrompt => {
                Event::PromptEntered(self.prompter.text("Enter your raw prompt:")?)
            }
            Effect::Analyze { prompt } => {
                let progress = Progress::spinner("Analyzing your prompt...");
                let analysis = self.analyzer.analyze(&prompt).await;
                progress.finish_clear();
                Event::Analyzed(analysis)
            }
            Effect::ShowAnalysis(analysis) => {
                self.prompter.show(Notice::Analysis(analysis));
                return Ok(None);
            }
            Effect::AskToClarify { ambiguities } => {
                let listed = ambiguities
                    .iter()
                    .map(|ambiguity| format!("- {ambiguity}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                self.prompter.show(Notice::Warning(format!(
                    "Your prompt contains potential ambiguities:\n{listed}"
                )));
                Event::ClarifyChosen(
                    self.prompter
                        .confirm("Would you like to clarify these ambiguities?", true)?,
                )
            }
            Effect::RequestClarifications {
                prompt,
                ambiguities,
            } => Event::Clarified(self.clarify(&prompt, &ambiguities).await?),
            Effect::PromptForOptions { defaults } => {
                Event::OptionsChosen(self.choose_options(&defaults)?)
            }
            Effect::Optimize { system_message } => {
                let analysis = session
                    .analysis
                    .as_ref()
                    .context("optimizing before the prompt was analyzed")?;
                let progress = Progress::spinner("Optimizing...");
                match self
                    .optimizer
                    .optimize(&session.raw_prompt, analysis, &session.options, &system_message)
                    .await
                {
                    Ok(result) => {
                        progress.finish_clear();
                        Event::Optimized(result)
                    }
                    Err(error) => {
                        progress.finish_err("Optimization failed");
                        tracing::warn!(%error, "optimization failed");
                        self.prompter.show(Notice::Warning(format!("Error: {error}")));
                        Event::OptimizationFailed
                    }
                }
            }
            Effect::ShowResult(result) => {
                self.prompter.show(Notice::Result(result));
                return Ok(None);
            }
            Effect::PromptForRefinement => {
                let choice = self.prompter.select(
                    "Would you like to refine this prompt further?",
                    &REFINE_CHOICES,
                    0,
                )?;
                match choice {
                    0 => Event::Accept,
                    1 => Event::AdjustOptions,
                    2 => Event::RefineRequested(
                        self.prompter.text("Enter specific refinement instructions:")?,
                    ),
                    _ => Event::Restart,
                }
            }
            Effect::RecoverFromFailure => {
                let choice = self.prompter.select(
                    "The optimization did not complete. What would you like to do?",
                    &RECOVER_CHOICES,
                    0,
                )?;
                match choice {
                    0 => Event::RetryOptimization,
                    1 => Event::AdjustOptions,
                    _ => Event::Restart,
                }
            }
            Effect::Refine {
                prompt,
                instructions,
            } => {
                let progress = Progress::spinner("Applying refinements...");
                match self.optimizer.refine(&prompt, &instructions).await {
                    Ok(refined) => {
                        progress.finish_clear();
                        Event::Refined(Some(refined))
                    }
                    Err(error) => {
                        progress.finish_err("Refinement failed");
                        self.prompter
                            .show(Notice::Warning(format!("Refinement failed: {error}")));
                        Event::Refined(None)
                    }
                }
            }
            Effect::Finish(_) => return Ok(None),
        };
        Ok(Some(event))
    }

    /// Ask the generated questions and fold the answers into the prompt.
    /// `None` keeps the prompt as it is.
    async fn clarify(
        &mut self,
        prompt: &str,
        ambiguities: &[String],
    ) -> anyhow::Result<Option<String>> {
        let progress = Progress::spinner("Generating clarification questions...");
        let clarifications = self.optimizer.clarify_ambiguities(prompt, ambiguities).await;
        progress.finish_clear();

        if clarifications.is_empty() {
            self.prompter.show(Notice::Warning(
                "No clarification questions could be generated, keeping the original prompt."
                    .into(),
            ));
            return Ok(None);
        }

        let mut answers = Vec::with_capacity(clarifications.len());
        for item in clarifications {
            self.prompter
                .show(Notice::Info(format!("Ambiguity: {}", item.ambiguity)));
            let mut replies = Vec::with_capacity(item.questions.len());
            for question in &item.questions {
                let reply = self.prompter.line(question, None)?;
                let reply = reply.trim();
                if !reply.is_empty() {
                    replies.push(reply.to_string());
                }
            }
            if !replies.is_empty() {
                answers.push((item.ambiguity, replies));
            }
        }

        if answers.is_empty() {
            self.prompter.show(Notice::Info(
                "No answers given, keeping the original prompt.".into(),
            ));
            return Ok(None);
        }

        let progress = Progress::spinner("Enhancing your prompt with clarifications...");
        match self.optimizer.apply_clarifications(prompt, &answers).await {
            Ok(enhanced) => {
                progress.finish_clear();
                self.prompter.show(Notice::Prompt {
                    title: "Enhanced Prompt".into(),
                    text: enhanced.clone(),
                });
                Ok(Some(enhanced))
            }
            Err(error) => {
                progress.finish_err("Failed to enhance prompt");
                self.prompter
                    .show(Notice::Warning(format!("Failed to enhance prompt: {error}")));
                Ok(None)
            }
        }
    }

    fn choose_options(&mut self, current: &OptionSet) -> anyhow::Result<OptionSet> {
        let kind = self.prompter.select(
            "How would you like to configure your prompt optimization?",
            &CONFIG_KIND_CHOICES,
            usize::from(!current.is_template()),
        )?;

        if kind == 0 {
            let template = self.pick(
                "Select a template:",
                &Template::ALL,
                Template::label,
                current.template().unwrap_or_default(),
            )?;
            return Ok(OptionSet::Template { template });
        }

        let defaults = current
            .custom()
            .cloned()
            .unwrap_or_else(|| self.custom_defaults.clone());
        let tone = self.pick(
            "What tone should the prompt have?",
            &Tone::ALL,
            Tone::label,
            defaults.tone,
        )?;
        let length = self.pick(
            "How detailed should the optimized prompt be?",
            &Length::ALL,
            Length::label,
            defaults.length,
        )?;
        let complexity = self.pick(
            "What complexity level should the prompt target?",
            &Complexity::ALL,
            Complexity::label,
            defaults.complexity,
        )?;
        let format = self.pick(
            "What format should the optimized prompt use?",
            &Format::ALL,
            Format::label,
            defaults.format,
        )?;
        let instructions = self.prompter.line(
            "Any additional optimization instructions (optional):",
            defaults.instructions(),
        )?;
        let instructions = instructions.trim();

        Ok(OptionSet::Custom(CustomOptions {
            tone,
            length,
            complexity,
            format,
            additional_instructions: (!instructions.is_empty()).then(|| instructions.to_string()),
        }))
    }

    fn pick<T: Copy + PartialEq>(
        &mut self,
        message: &str,
        choices: &[T],
        label: fn(T) -> &'static str,
        current: T,
    ) -> anyhow::Result<T> {
        choose(&mut *self.prompter, message, choices, label, current)
    }

    /// Offer to write the accepted prompt to a file. Failed writes are
    /// reported and the offer repeats.
    fn offer_save(&mut self, result: &OptimizedResult) -> anyhow::Result<()> {
        loop {
            if !self
                .prompter
                .confirm("Save the optimized prompt to a file?", true)?
            {
                return Ok(());
            }
            let suggested = self.filename.clone().unwrap_or_else(save::default_filename);
            let filename = self.prompter.line("Filename:", Some(&suggested))?;
            match save::save_prompt(&self.output_dir, &filename, &result.prompt) {
                Ok(path) => {
                    self.prompter
                        .show(Notice::Success(format!("Saved to {}", path.display())));
                    return Ok(());
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to save prompt");
                    self.prompter
                        .show(Notice::Warning(format!("Could not save the prompt: {error}")));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use promptly_core::entities::MANUAL_REFINEMENT_NOTE;
    use promptly_core::enums::TaskType;
    use promptly_core::templates::{build_system_message, preset};
    use promptly_core::workflow::ReanalysisPolicy;
    use promptly_llm::{LlmError, ScriptedBackend};

    use super::*;
    use crate::interactive::scripted::{Answer, ScriptedPrompter};

    const CLEAR_ANALYSIS: &str = r#"{"taskType":"creative","intent":"a story","keyConcepts":["story"],"tone":"neutral","clarity":7,"ambiguities":[]}"#;
    const VAGUE_ANALYSIS: &str = r#"{"taskType":"creative","intent":"a story","keyConcepts":["story"],"tone":"neutral","clarity":4,"ambiguities":["genre"]}"#;
    const OPTIMIZED: &str =
        r#"{"optimizedPrompt":"Write a 500-word sci-fi story.","improvements":["Added length"]}"#;

    fn workflow(policy: ReanalysisPolicy) -> Workflow {
        Workflow::new(OptionSet::default(), policy)
    }

    /// Custom options with every field left at its default.
    fn default_custom_answers() -> Vec<Answer> {
        vec![
            Answer::Pick(1),
            Answer::Enter,
            Answer::Enter,
            Answer::Enter,
            Answer::Enter,
            Answer::Enter,
        ]
    }

    #[tokio::test]
    async fn accepts_first_result_with_custom_options() {
        let backend = ScriptedBackend::new().reply(CLEAR_ANALYSIS).reply(OPTIMIZED);
        let mut answers = vec![Answer::text("write a story"), Answer::Pick(1), Answer::Pick(0)];
        answers.extend([Answer::Enter, Answer::Enter, Answer::Enter, Answer::Enter]);
        answers.extend([Answer::Pick(0), Answer::No]);
        let mut prompter = ScriptedPrompter::new(answers);

        let result = Driver::new(
            &backend,
            &mut prompter,
            CustomOptions::default(),
            PathBuf::from("unused"),
        )
        .run(workflow(ReanalysisPolicy::KeepAnalysis))
        .await
        .unwrap();

        assert_eq!(result.prompt, "Write a 500-word sci-fi story.");
        assert_eq!(result.improvements, vec!["Added length"]);
        assert_eq!(prompter.remaining(), 0);

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        let expected_system = build_system_message(
            TaskType::Creative,
            &CustomOptions {
                tone: Tone::Formal,
                ..CustomOptions::default()
            },
        );
        assert_eq!(requests[1][0].content, expected_system);
        assert!(matches!(prompter.shown[0], Notice::Analysis(_)));
    }

    #[tokio::test]
    async fn clarifies_refines_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend::new()
            .reply(VAGUE_ANALYSIS)
            .reply(r#"[{"ambiguity":"genre","questions":["Which genre?"]}]"#)
            .reply("Write a sci-fi story.")
            .reply(OPTIMIZED)
            .reply("Write a 300-word sci-fi story.");
        let mut prompter = ScriptedPrompter::new([
            Answer::text("write a story"),
            Answer::Yes,
            Answer::text("Sci-fi"),
            Answer::Pick(0),
            Answer::Pick(2),
            Answer::Pick(2),
            Answer::text("make it 300 words"),
            Answer::Pick(0),
            Answer::Yes,
            Answer::text("story.txt"),
        ]);

        let result = Driver::new(
            &backend,
            &mut prompter,
            CustomOptions::default(),
            dir.path().join("out"),
        )
        .run(workflow(ReanalysisPolicy::KeepAnalysis))
        .await
        .unwrap();

        assert_eq!(result.prompt, "Write a 300-word sci-fi story.");
        assert_eq!(
            result.improvements,
            vec!["Added length".to_string(), MANUAL_REFINEMENT_NOTE.to_string()]
        );

        let requests = backend.requests();
        assert_eq!(requests.len(), 5);
        assert!(requests[2][0].content.contains("For \"genre\": Sci-fi"));
        assert_eq!(
            requests[3][0].content,
            preset(Template::CreativeWriting)
        );
        assert!(requests[3][1].content.contains("Write a sci-fi story."));

        let saved = fs::read_to_string(dir.path().join("out").join("story.txt")).unwrap();
        assert_eq!(saved, result.prompt);
        assert!(prompter.shown.iter().any(|notice| matches!(
            notice,
            Notice::Prompt { text, .. } if text == "Write a sci-fi story."
        )));
    }

    #[tokio::test]
    async fn reanalyze_policy_analyzes_the_clarified_prompt() {
        let backend = ScriptedBackend::new()
            .reply(VAGUE_ANALYSIS)
            .reply(r#"[{"ambiguity":"genre","questions":["Which genre?"]}]"#)
            .reply("Write a sci-fi story.")
            .reply(CLEAR_ANALYSIS)
            .reply(OPTIMIZED);
        let mut answers = vec![Answer::text("write a story"), Answer::Yes, Answer::text("Sci-fi")];
        answers.extend(default_custom_answers());
        answers.extend([Answer::Pick(0), Answer::No]);
        let mut prompter = ScriptedPrompter::new(answers);

        Driver::new(
            &backend,
            &mut prompter,
            CustomOptions::default(),
            PathBuf::from("unused"),
        )
        .run(workflow(ReanalysisPolicy::Reanalyze))
        .await
        .unwrap();

        let requests = backend.requests();
        assert_eq!(requests.len(), 5);
        assert!(requests[3][0].content.contains("Text to analyze: \"Write a sci-fi story.\""));
    }

    #[tokio::test]
    async fn failed_optimization_can_be_retried() {
        let backend = ScriptedBackend::new()
            .reply(CLEAR_ANALYSIS)
            .fail(LlmError::Api {
                status: 500,
                message: "upstream overloaded".into(),
            })
            .reply(OPTIMIZED);
        let mut answers = vec![Answer::text("   "), Answer::text("write a story")];
        answers.extend(default_custom_answers());
        answers.extend([Answer::Pick(0), Answer::Pick(0), Answer::No]);
        let mut prompter = ScriptedPrompter::new(answers);

        let result = Driver::new(
            &backend,
            &mut prompter,
            CustomOptions::default(),
            PathBuf::from("unused"),
        )
        .run(workflow(ReanalysisPolicy::KeepAnalysis))
        .await
        .unwrap();

        assert_eq!(result.prompt, "Write a 500-word sci-fi story.");
        assert_eq!(backend.requests().len(), 3);
        let warnings = prompter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("upstream overloaded"));
    }

    #[tokio::test]
    async fn failed_refinement_keeps_the_result() {
        let backend = ScriptedBackend::new()
            .reply(CLEAR_ANALYSIS)
            .reply(OPTIMIZED)
            .reply("   ");
        let mut answers = vec![Answer::text("write a story")];
        answers.extend(default_custom_answers());
        answers.extend([
            Answer::Pick(2),
            Answer::text("shorter"),
            Answer::Pick(0),
            Answer::No,
        ]);
        let mut prompter = ScriptedPrompter::new(answers);

        let result = Driver::new(
            &backend,
            &mut prompter,
            CustomOptions::default(),
            PathBuf::from("unused"),
        )
        .run(workflow(ReanalysisPolicy::KeepAnalysis))
        .await
        .unwrap();

        assert_eq!(result.prompt, "Write a 500-word sci-fi story.");
        assert_eq!(result.improvements, vec!["Added length"]);
        assert!(prompter.warnings()[0].starts_with("Refinement failed"));
    }

    #[tokio::test]
    async fn restart_keeps_chosen_options_as_defaults() {
        let backend = ScriptedBackend::new()
            .reply(CLEAR_ANALYSIS)
            .reply(OPTIMIZED)
            .reply(CLEAR_ANALYSIS)
            .reply(OPTIMIZED);
        let mut prompter = ScriptedPrompter::new([
            Answer::text("write a story"),
            Answer::Pick(0),
            Answer::Pick(3),
            Answer::Pick(3),
            Answer::text("write a poem"),
            // Enter twice: the template chosen before the restart is the default.
            Answer::Enter,
            Answer::Enter,
            Answer::Pick(0),
            Answer::No,
        ]);

        Driver::new(
            &backend,
            &mut prompter,
            CustomOptions::default(),
            PathBuf::from("unused"),
        )
        .run(workflow(ReanalysisPolicy::KeepAnalysis))
        .await
        .unwrap();

        let requests = backend.requests();
        assert_eq!(requests[3][0].content, preset(Template::Academic));
        assert!(requests[3][1].content.contains("write a poem"));
    }

    #[tokio::test]
    async fn invalid_filename_is_reported_and_offer_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let backend = ScriptedBackend::new().reply(CLEAR_ANALYSIS).reply(OPTIMIZED);
        let mut answers = vec![Answer::text("write a story")];
        answers.extend(default_custom_answers());
        answers.extend([
            Answer::Pick(0),
            Answer::Yes,
            Answer::text("../escape.txt"),
            Answer::Yes,
            Answer::Enter,
        ]);
        let mut prompter = ScriptedPrompter::new(answers);

        Driver::new(&backend, &mut prompter, CustomOptions::default(), dir.path().to_path_buf())
            .with_filename(Some("mine.txt".into()))
            .run(workflow(ReanalysisPolicy::KeepAnalysis))
            .await
            .unwrap();

        assert!(prompter.warnings()[0].starts_with("Could not save the prompt"));
        assert!(!dir.path().join("..").join("escape.txt").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("mine.txt")).unwrap(),
            "Write a 500-word sci-fi story."
        );
    }
}
