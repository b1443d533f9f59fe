use promptly_llm::Analyzer;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnalyzeArgs;
use crate::commands::input::read_prompt;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `promptly analyze`.
pub async fn handle(args: &AnalyzeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let prompt = read_prompt(&args.source)?;

    let progress = Progress::spinner("Analyzing your prompt...");
    let analysis = Analyzer::new(&ctx.client).analyze(&prompt).await;
    progress.finish_clear();

    output(&analysis, flags.format)
}
