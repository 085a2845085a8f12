use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use syl_config::SylConfig;
use syl_core::snapshot::Snapshot;
use syl_engine::Workbench;
use syl_repo::{InMemoryRepository, TracingSink};

pub type CliWorkbench = Workbench<InMemoryRepository, TracingSink>;

/// Load `.env` next to the snapshot (or in the working directory), then the
/// layered config.
pub fn load_config(snapshot: Option<&Path>) -> anyhow::Result<SylConfig> {
    load_dotenv(snapshot)?;
    SylConfig::load().context("failed to load syllabus config")
}

fn load_dotenv(snapshot: Option<&Path>) -> anyhow::Result<()> {
    let beside_snapshot = snapshot
        .and_then(Path::parent)
        .map(|dir| dir.join(".env"))
        .filter(|path| path.exists());

    if let Some(env_path) = beside_snapshot {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(anyhow::anyhow!("failed to load .env: {error}")),
    }
}

/// Read a snapshot file written as `{"years": [...], "categories": [...], ...}`.
pub fn read_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    tracing::debug!(path = %path.display(), records = snapshot.total(), "snapshot read");
    Ok(snapshot)
}

/// Seed the in-memory repository from a snapshot file and load everything
/// into a fresh workbench.
pub async fn open_workbench(path: &Path, config: SylConfig) -> anyhow::Result<CliWorkbench> {
    let snapshot = read_snapshot(path)?;
    let mut workbench = Workbench::new(
        InMemoryRepository::seeded(snapshot),
        TracingSink,
        Arc::new(config),
    );
    workbench
        .load_all()
        .await
        .context("failed to load the snapshot into the workbench")?;
    Ok(workbench)
}

#[cfg(test)]
pub mod fixtures {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Two years, one subject each; the Algebra term already has two weeks.
    pub const SCHOOL: &str = r#"{
        "years": [{"id": 1, "yearNumber": 7}, {"id": 2, "yearNumber": 8}],
        "categories": [{"id": 1, "name": "Mathematics"}, {"id": 2, "name": "Science"}],
        "subjectNames": [
            {"id": 1, "name": "Algebra", "categoryId": 1},
            {"id": 2, "name": "Physics", "categoryId": 2}
        ],
        "subjects": [
            {"id": 10, "yearId": 1, "subjectNameId": 1, "price": 30.0},
            {"id": 11, "yearId": 2, "subjectNameId": 2, "price": 20.0}
        ],
        "terms": [
            {"id": 20, "subjectId": 10, "termNumber": 1},
            {"id": 21, "subjectId": 11, "termNumber": 1}
        ],
        "weeks": [
            {"id": 30, "termId": 20, "weekNumber": 1},
            {"id": 31, "termId": 20, "weekNumber": 2}
        ],
        "lessons": [{"id": 40, "weekId": 30, "subjectId": 10, "title": "Variables"}]
    }"#;

    pub fn snapshot_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write snapshot");
        file
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use syl_config::SylConfig;
    use syl_core::enums::EntityKind;

    use super::fixtures::{SCHOOL, snapshot_file};
    use super::{open_workbench, read_snapshot};

    #[test]
    fn snapshot_file_is_read() {
        let file = snapshot_file(SCHOOL);
        let snapshot = read_snapshot(file.path()).expect("snapshot should parse");
        assert_eq!(snapshot.count(EntityKind::Week), 2);
        assert_eq!(snapshot.total(), 13);
    }

    #[test]
    fn missing_and_malformed_snapshots_are_reported() {
        let missing = read_snapshot(Path::new("/nonexistent/school.json")).unwrap_err();
        assert!(format!("{missing:#}").contains("failed to read snapshot"));

        let file = snapshot_file("{\"years\": [{\"id\": \"one\"}]}");
        let malformed = read_snapshot(file.path()).unwrap_err();
        assert!(format!("{malformed:#}").contains("failed to parse snapshot"));
    }

    #[tokio::test]
    async fn workbench_opens_with_every_record_visible() {
        let file = snapshot_file(SCHOOL);
        let workbench = open_workbench(file.path(), SylConfig::default())
            .await
            .expect("workbench should load");
        assert_eq!(workbench.state().views.len(EntityKind::Lesson), 1);
        assert_eq!(workbench.state().store.len(EntityKind::Subject), 2);
    }
}
