use anyhow::Context;
use promptly_config::PromptlyConfig;
use promptly_core::entities::{Analysis, CustomOptions, OptionSet};
use promptly_core::templates::system_message_for;
use promptly_llm::{Analyzer, Optimizer};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::OptimizeArgs;
use crate::commands::input::read_prompt;
use crate::context::AppContext;
use crate::interactive;
use crate::output::output;
use crate::progress::Progress;
use crate::save;

#[derive(Serialize)]
struct OptimizeResponse {
    prompt: String,
    improvements: Vec<String>,
    analysis: Analysis,
}

/// Options for this run: a template when `--template` is given, otherwise
/// the configured defaults with any per-field flags applied on top.
pub fn option_set(args: &OptimizeArgs, config: &PromptlyConfig) -> OptionSet {
    if let Some(template) = args.template {
        return OptionSet::Template { template };
    }
    let defaults = config.custom_options();
    OptionSet::Custom(CustomOptions {
        tone: args.tone.unwrap_or(defaults.tone),
        length: args.length.unwrap_or(defaults.length),
        complexity: args.complexity.unwrap_or(defaults.complexity),
        format: args.output_format.unwrap_or(defaults.format),
        additional_instructions: args
            .instructions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string),
    })
}

/// Handle `promptly optimize`.
pub async fn handle(args: &OptimizeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.interactive {
        return interactive::run(args, ctx, flags).await;
    }

    let prompt = read_prompt(&args.source)?;

    let progress = Progress::spinner("Analyzing your prompt...");
    let analysis = Analyzer::new(&ctx.client).analyze(&prompt).await;
    progress.finish_clear();

    let options = option_set(args, &ctx.config);
    let system_message = system_message_for(&options, analysis.task_type);

    let progress = Progress::spinner("Optimizing...");
    let result = match Optimizer::new(&ctx.client)
        .optimize(&prompt, &analysis, &options, &system_message)
        .await
    {
        Ok(result) => {
            progress.finish_clear();
            result
        }
        Err(error) => {
            progress.finish_err("Optimization failed");
            return Err(error).context("could not optimize the prompt");
        }
    };

    if let Some(filename) = &args.save {
        let path = save::save_prompt(&ctx.config.output_dir, filename, &result.prompt)?;
        if !flags.quiet {
            eprintln!("Saved to {}", path.display());
        }
    }

    output(
        &OptimizeResponse {
            prompt: result.prompt,
            improvements: result.improvements,
            analysis,
        },
        flags.format,
    )
}
