use std::collections::BTreeMap;

use serde::Serialize;
use syl_config::SylConfig;
use syl_core::drafts::EntityDraft;
use syl_core::entities::Id;
use syl_core::enums::EntityKind;
use syl_core::fields::{Field, FieldValue};
use syl_engine::WorkbenchError;

use crate::bootstrap::{self, CliWorkbench};
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InferArgs;
use crate::output::output;

const ANCESTOR_FIELDS: [Field; 6] = [
    Field::YearId,
    Field::CategoryId,
    Field::SubjectNameId,
    Field::SubjectId,
    Field::TermId,
    Field::WeekId,
];

/// What the add form looks like after inference.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferReport {
    pub kind: EntityKind,
    pub draft: EntityDraft,
    /// Fields the cascade filled in.
    pub auto_filled: Vec<Field>,
    /// Remaining choices per ancestor field of the form.
    pub candidates: BTreeMap<Field, usize>,
    /// Every field that would block a submit.
    pub errors: BTreeMap<Field, String>,
    pub ready: bool,
}

/// Handle `syl infer`.
pub async fn handle(args: &InferArgs, config: SylConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut workbench = bootstrap::open_workbench(&args.snapshot, config).await?;
    let report = infer(&mut workbench, args.kind, &chosen(args))?;
    output(&report, flags)
}

fn chosen(args: &InferArgs) -> Vec<(Field, Id)> {
    [
        (Field::YearId, args.year),
        (Field::CategoryId, args.category),
        (Field::SubjectNameId, args.subject_name),
        (Field::SubjectId, args.subject),
        (Field::TermId, args.term),
        (Field::WeekId, args.week),
    ]
    .into_iter()
    .filter_map(|(field, id)| id.map(|id| (field, id)))
    .collect()
}

/// Open an add form for `kind`, apply the chosen ancestors top-down and
/// sweep the result.
pub fn infer(
    workbench: &mut CliWorkbench,
    kind: EntityKind,
    chosen: &[(Field, Id)],
) -> anyhow::Result<InferReport> {
    workbench.open_add_form(kind);

    for &(field, id) in chosen {
        let has_field = workbench
            .form()
            .is_some_and(|form| form.draft.has_field(field));
        if !has_field {
            anyhow::bail!("a {kind} form has no {field} field");
        }
        workbench.edit_draft(field, FieldValue::Id(id))?;
    }

    let errors = match workbench.validate_form() {
        Ok(()) => BTreeMap::new(),
        Err(WorkbenchError::Validation(errors)) => errors
            .fields()
            .filter_map(|field| errors.get(field).map(|message| (field, message.to_string())))
            .collect(),
        Err(other) => return Err(other.into()),
    };

    let form = workbench.form().ok_or(WorkbenchError::NoOpenForm)?;
    let candidates = workbench.candidates().unwrap_or_default();
    let report = InferReport {
        kind,
        draft: form.draft.clone(),
        auto_filled: form.auto_filled.iter().copied().collect(),
        candidates: ANCESTOR_FIELDS
            .into_iter()
            .filter(|field| form.draft.has_field(*field))
            .map(|field| (field, candidates.get(field).len()))
            .collect(),
        ready: errors.is_empty(),
        errors,
    };
    tracing::debug!(%kind, auto_filled = report.auto_filled.len(), ready = report.ready, "inference done");
    Ok(report)
}
