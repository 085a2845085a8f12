use syl_engine::EntityStore;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::CheckArgs;
use crate::output::output;

/// Handle `syl check`. Prints every broken reference and fails when there is one.
pub fn handle(args: &CheckArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = EntityStore::new(bootstrap::read_snapshot(&args.snapshot)?);
    let problems = store.check_consistency();
    output(&problems, flags)?;

    if problems.is_empty() {
        return Ok(());
    }
    tracing::warn!(count = problems.len(), "snapshot has inconsistent references");
    anyhow::bail!(
        "{} inconsistent reference(s) in {}",
        problems.len(),
        args.snapshot.display()
    )
}
