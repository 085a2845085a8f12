use clap::{Parser, ValueEnum};
use syl_config::SylConfig;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `syl` binary.
#[derive(Debug, Parser)]
#[command(name = "syl", version, about = "Syllabus - browse and edit a school content hierarchy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to `general.default_format`)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract global flags, falling back to the configured output format.
    pub fn global_flags(&self, config: &SylConfig) -> anyhow::Result<GlobalFlags> {
        let format = match self.format {
            Some(format) => format,
            None => OutputFormat::from_str(&config.general.default_format, true).map_err(|_| {
                anyhow::anyhow!(
                    "invalid general.default_format '{}': expected json, table or raw",
                    config.general.default_format
                )
            })?,
        };
        Ok(GlobalFlags {
            format,
            quiet: self.quiet,
            verbose: self.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::{CommandFactory, Parser};
    use syl_config::SylConfig;
    use syl_core::enums::EntityKind;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "syl",
            "--format",
            "table",
            "--verbose",
            "check",
            "--snapshot",
            "school.json",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Table));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "syl",
            "check",
            "--snapshot",
            "school.json",
            "--format",
            "raw",
            "--quiet",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        assert!(cli.quiet);
        assert_eq!(
            cli.command.snapshot_path(),
            Some(Path::new("school.json"))
        );
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["syl", "--format", "xml", "schema", "term"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_accepts_all_supported_values() {
        for value in ["json", "table", "raw"] {
            let cli = Cli::try_parse_from(["syl", "--format", value, "schema", "term"])
                .expect("cli should parse");
            assert!(matches!(cli.command, Commands::Schema(_)));
        }
    }

    #[test]
    fn missing_format_falls_back_to_config() {
        let cli = Cli::try_parse_from(["syl", "schema", "term"]).expect("cli should parse");
        let mut config = SylConfig::default();
        config.general.default_format = "Table".into();
        let flags = cli.global_flags(&config).expect("format should resolve");
        assert_eq!(flags.format, OutputFormat::Table);

        config.general.default_format = "yaml".into();
        assert!(cli.global_flags(&config).is_err());
    }

    #[test]
    fn kinds_parse_singular_and_plural() {
        let cli = Cli::try_parse_from([
            "syl",
            "view",
            "--snapshot",
            "s.json",
            "--kind",
            "subject_names",
            "--page",
            "2",
        ])
        .expect("cli should parse");
        let Commands::View(args) = cli.command else {
            panic!("expected view");
        };
        assert_eq!(args.kind, Some(EntityKind::SubjectName));
        assert_eq!(args.page, 2);

        let cli = Cli::try_parse_from(["syl", "infer", "--snapshot", "s.json", "--kind", "week"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Infer(ref args) if args.kind == EntityKind::Week
        ));
    }

    #[test]
    fn page_needs_a_kind() {
        let parsed = Cli::try_parse_from(["syl", "view", "--snapshot", "s.json", "--page", "2"]);
        assert!(parsed.is_err());
    }
}
