use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Optimize(args) => commands::optimize::handle(&args, ctx, flags).await,
        Commands::Analyze(args) => commands::analyze::handle(&args, ctx, flags).await,
        Commands::Config { .. } | Commands::Templates => {
            unreachable!("config/templates are pre-dispatched in main")
        }
    }
}
