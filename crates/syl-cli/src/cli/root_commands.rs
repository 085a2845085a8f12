use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use syl_core::entities::Id;
use syl_core::enums::EntityKind;

/// Top-level commands.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Show filtered and paged records from a snapshot.
    View(ViewArgs),
    /// Open an add form, apply ancestor choices and show what gets inferred.
    Infer(InferArgs),
    /// Report references that do not resolve.
    Check(CheckArgs),
    /// Print the JSON Schema of an entity kind.
    Schema(SchemaArgs),
}

impl Commands {
    /// The snapshot file the command reads, if any.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Path> {
        match self {
            Self::View(args) => Some(&args.snapshot),
            Self::Infer(args) => Some(&args.snapshot),
            Self::Check(args) => Some(&args.snapshot),
            Self::Schema(_) => None,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct ViewArgs {
    /// Snapshot JSON file
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Only show this kind (years, terms, lessons, ...)
    #[arg(long)]
    pub kind: Option<EntityKind>,

    /// Free-text search over names and titles
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub year: Option<Id>,

    #[arg(long)]
    pub category: Option<Id>,

    #[arg(long)]
    pub subject: Option<Id>,

    #[arg(long)]
    pub term: Option<Id>,

    #[arg(long)]
    pub week: Option<Id>,

    /// Page number (1-based) for `--kind`
    #[arg(long, default_value_t = 1, requires = "kind")]
    pub page: usize,
}

#[derive(Clone, Debug, Args)]
pub struct InferArgs {
    /// Snapshot JSON file
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Kind of record the add form is for
    #[arg(long)]
    pub kind: EntityKind,

    #[arg(long)]
    pub year: Option<Id>,

    #[arg(long)]
    pub category: Option<Id>,

    #[arg(long)]
    pub subject_name: Option<Id>,

    #[arg(long)]
    pub subject: Option<Id>,

    #[arg(long)]
    pub term: Option<Id>,

    #[arg(long)]
    pub week: Option<Id>,
}

#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    /// Snapshot JSON file
    #[arg(long)]
    pub snapshot: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity kind, or `snapshot` for the whole file
    pub type_name: String,
}
