//! Persistence for the resume record.
//!
//! The JSON-file repository never writes the target in place: the record is
//! written to a temp file in the same directory, fsynced, then renamed over
//! the target, so a crash leaves either the old or the new record on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::resume::models::ResumeRecord;
use crate::resume::store::ResumeStore;

/// Storage backend for the resume record.
///
/// Carried in `AppState` as `Arc<dyn ResumeRepository>`.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Returns the stored record, or `None` when nothing usable is stored yet.
    async fn load(&self) -> Result<Option<ResumeRecord>>;

    async fn save(&self, record: &ResumeRecord) -> Result<()>;

    /// Moves aside a stored record that could not be turned into a store.
    async fn quarantine(&self) -> Result<()>;
}

/// Loads the store at startup. A record that violates the aggregate's
/// invariants is quarantined and the service starts from an empty resume.
pub async fn load_store(repo: &dyn ResumeRepository) -> Result<ResumeStore> {
    let Some(record) = repo.load().await? else {
        info!("No stored resume found, starting empty");
        return Ok(ResumeStore::new());
    };

    match ResumeStore::from_record(record) {
        Ok(store) => {
            info!("Stored resume loaded");
            Ok(store)
        }
        Err(e) => {
            warn!("Stored resume rejected ({e}); starting empty");
            repo.quarantine().await?;
            Ok(ResumeStore::new())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// JSON file
// ────────────────────────────────────────────────────────────────────────────

pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[async_trait]
impl ResumeRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<ResumeRecord>> {
        let path = self.path.clone();
        let dir = self.dir();
        tokio::task::spawn_blocking(move || -> Result<Option<ResumeRecord>> {
            let raw = match std::fs::read(&path) {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to read {}", path.display()))
                }
            };
            match serde_json::from_slice::<ResumeRecord>(&raw) {
                Ok(record) => Ok(Some(record)),
                Err(e) => {
                    warn!("Corrupt resume JSON at {}: {e}", path.display());
                    backup_corrupt(&path, &dir)?;
                    Ok(None)
                }
            }
        })
        .await
        .context("spawn_blocking failed while loading resume")?
    }

    async fn save(&self, record: &ResumeRecord) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(record).context("Failed to serialize resume")?;
        let path = self.path.clone();
        let dir = self.dir();
        tokio::task::spawn_blocking(move || atomic_write(&path, &dir, &bytes))
            .await
            .context("spawn_blocking failed while saving resume")?
    }

    async fn quarantine(&self) -> Result<()> {
        let path = self.path.clone();
        let dir = self.dir();
        tokio::task::spawn_blocking(move || backup_corrupt(&path, &dir).map(|_| ()))
            .await
            .context("spawn_blocking failed while quarantining resume")?
    }
}

fn atomic_write(path: &Path, dir: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix("tmp_resume_")
        .suffix(".json")
        .tempfile_in(dir)
        .context("Failed to create temp file for resume")?;
    tmp.write_all(bytes).context("Failed to write resume temp file")?;
    tmp.as_file()
        .sync_all()
        .context("Failed to fsync resume temp file")?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Copies the file aside as `corrupt_backup_<timestamp>.json` in the same directory.
fn backup_corrupt(path: &Path, dir: &Path) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let backup = dir.join(format!("corrupt_backup_{stamp}.json"));
    std::fs::copy(path, &backup)
        .with_context(|| format!("Failed to back up {}", path.display()))?;
    info!("Backed up corrupt resume to {}", backup.display());
    Ok(backup)
}

// ────────────────────────────────────────────────────────────────────────────
// In memory
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the record for the life of the process only.
#[derive(Default)]
pub struct InMemoryRepository {
    record: Mutex<Option<ResumeRecord>>,
}

#[async_trait]
impl ResumeRepository for InMemoryRepository {
    async fn load(&self) -> Result<Option<ResumeRecord>> {
        Ok(self.record.lock().await.clone())
    }

    async fn save(&self, record: &ResumeRecord) -> Result<()> {
        *self.record.lock().await = Some(record.clone());
        Ok(())
    }

    async fn quarantine(&self) -> Result<()> {
        self.record.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::{NewEntry, SettingsInput};

    fn sample_store() -> ResumeStore {
        let mut store = ResumeStore::new();
        let cat = store.add_category("Projects").unwrap();
        store
            .add_entry(
                cat,
                NewEntry {
                    name: "Resume Manager".into(),
                    link: Some("https://github.com/johndoe/resume-manager".into()),
                    date: Some("2025".into()),
                },
            )
            .unwrap();
        store.add_skill("Python", 4).unwrap();
        store
            .update_settings(SettingsInput {
                columns: Some(1),
                separator: None,
            })
            .unwrap();
        store
    }

    fn backups_in(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("corrupt_backup_")
            })
            .count()
    }

    #[tokio::test]
    async fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("resume_data.json"));
        let store = sample_store();

        repo.save(&store.to_record()).await.unwrap();
        let loaded = repo.load().await.unwrap().expect("record should exist");
        assert_eq!(loaded, store.to_record());

        let restored = load_store(&repo).await.unwrap();
        assert_eq!(restored.snapshot(), store.snapshot());
    }

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/resume_data.json"));
        assert!(repo.load().await.unwrap().is_none());

        let store = load_store(&repo).await.unwrap();
        assert!(store.snapshot().categories.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_missing_directory_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("data/resume_data.json");
        let repo = JsonFileRepository::new(&target);

        repo.save(&sample_store().to_record()).await.unwrap();
        repo.save(&ResumeStore::new().to_record()).await.unwrap();

        assert!(target.exists());
        let leftovers = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("tmp_resume_"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_corrupt_json_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resume_data.json");
        std::fs::write(&target, b"{ not json").unwrap();

        let repo = JsonFileRepository::new(&target);
        assert!(repo.load().await.unwrap().is_none());
        assert_eq!(backups_in(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_invariant_violation_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resume_data.json");
        let mut record = sample_store().to_record();
        record.resume.skills[0].level = 10;
        std::fs::write(&target, serde_json::to_vec(&record).unwrap()).unwrap();

        let repo = JsonFileRepository::new(&target);
        let store = load_store(&repo).await.unwrap();
        assert!(store.snapshot().skills.is_empty());
        assert_eq!(backups_in(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_id_is_quarantined() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("resume_data.json");
        std::fs::write(
            &target,
            br#"{"categories":[{"id":18446744073709551615,"name":"Projects","entries":[]}]}"#,
        )
        .unwrap();

        let repo = JsonFileRepository::new(&target);
        let store = load_store(&repo).await.unwrap();
        assert!(store.snapshot().categories.is_empty());
        assert_eq!(backups_in(dir.path()), 1);
    }

    #[tokio::test]
    async fn test_in_memory_repository() {
        let repo = InMemoryRepository::default();
        assert!(repo.load().await.unwrap().is_none());

        let record = sample_store().to_record();
        repo.save(&record).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), Some(record));

        repo.quarantine().await.unwrap();
        assert!(repo.load().await.unwrap().is_none());
    }
}
