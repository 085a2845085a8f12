use schemars::schema_for;
use syl_core::entities::{Category, Lesson, Subject, SubjectName, Term, Week, Year};
use syl_core::enums::EntityKind;
use syl_core::snapshot::Snapshot;

use crate::cli::root_commands::SchemaArgs;

/// Handle `syl schema`. Always prints pretty JSON.
pub fn handle(args: &SchemaArgs) -> anyhow::Result<()> {
    let schema = schema_json(&args.type_name)?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

pub fn schema_json(type_name: &str) -> anyhow::Result<serde_json::Value> {
    if type_name.eq_ignore_ascii_case("snapshot") {
        return Ok(serde_json::to_value(schema_for!(Snapshot))?);
    }
    let kind: EntityKind = type_name.parse()?;
    let schema = match kind {
        EntityKind::Year => schema_for!(Year),
        EntityKind::Category => schema_for!(Category),
        EntityKind::SubjectName => schema_for!(SubjectName),
        EntityKind::Subject => schema_for!(Subject),
        EntityKind::Term => schema_for!(Term),
        EntityKind::Week => schema_for!(Week),
        EntityKind::Lesson => schema_for!(Lesson),
    };
    Ok(serde_json::to_value(schema)?)
}
