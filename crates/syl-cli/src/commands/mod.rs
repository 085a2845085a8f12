use syl_config::SylConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod check;
pub mod infer;
pub mod schema;
pub mod view;

/// Dispatch a parsed command to its handler module.
pub async fn dispatch(
    command: Commands,
    config: SylConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::View(args) => view::handle(&args, config, flags).await,
        Commands::Infer(args) => infer::handle(&args, config, flags).await,
        Commands::Check(args) => check::handle(&args, flags),
        Commands::Schema(args) => schema::handle(&args),
    }
}
