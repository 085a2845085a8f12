use serde::Serialize;
use syl_config::SylConfig;
use syl_core::enums::EntityKind;
use syl_engine::SelectorField;

use crate::bootstrap::{self, CliWorkbench};
use crate::cli::root_commands::ViewArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;

/// One row of the all-kinds overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KindSummary {
    kind: EntityKind,
    visible: usize,
    stored: usize,
    pages: usize,
}

/// Handle `syl view`.
pub async fn handle(args: &ViewArgs, config: SylConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let mut workbench = bootstrap::open_workbench(&args.snapshot, config).await?;
    apply_filters(&mut workbench, args);

    let Some(kind) = args.kind else {
        return output(&summarize(&workbench), flags);
    };

    let total_pages = workbench.page(kind).total_pages;
    if args.page == 0 || args.page > total_pages {
        anyhow::bail!(
            "page {} of {kind} is out of range (1..={total_pages})",
            args.page
        );
    }
    workbench.goto_page(kind, args.page);

    let page = workbench.page(kind);
    tracing::debug!(%kind, page = page.page, items = page.items.len(), "page rendered");
    match flags.format {
        OutputFormat::Table => output(&page.items, flags),
        OutputFormat::Json | OutputFormat::Raw => output(&page, flags),
    }
}

fn apply_filters(workbench: &mut CliWorkbench, args: &ViewArgs) {
    if let Some(search) = &args.search {
        workbench.set_search_term(search.as_str());
    }
    let selectors = [
        (SelectorField::Year, args.year),
        (SelectorField::Category, args.category),
        (SelectorField::Subject, args.subject),
        (SelectorField::Term, args.term),
        (SelectorField::Week, args.week),
    ];
    for (field, id) in selectors {
        if id.is_some() {
            workbench.set_selector(field, id);
        }
    }
}

fn summarize(workbench: &CliWorkbench) -> Vec<KindSummary> {
    let state = workbench.state();
    EntityKind::ALL
        .into_iter()
        .map(|kind| KindSummary {
            kind,
            visible: state.views.len(kind),
            stored: state.store.len(kind),
            pages: state.total_pages(kind),
        })
        .collect()
}
