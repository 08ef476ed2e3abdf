use std::{io, path::PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::repo_types::{Entry, EntryDocument, EntryDocumentRef, NewEntry};

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Every stored entry; empty when the backing data is missing or unreadable.
    async fn load_all(&self) -> Vec<Entry>;
    /// Replaces the whole stored list.
    async fn save_all(&self, entries: &[Entry]) -> anyhow::Result<()>;
    /// Assigns ids to `new_entries`, stores them after the existing ones and
    /// returns them. Concurrent calls are serialized.
    async fn append(&self, new_entries: Vec<NewEntry>) -> anyhow::Result<Vec<Entry>>;
}

/// Next free id: one past both the highest id and the entry count, so ids stay
/// unique even when the file holds gaps or duplicates from manual edits.
pub fn next_id(entries: &[Entry]) -> u64 {
    let max_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
    max_id.max(entries.len() as u64) + 1
}

/// `{ "entries": [...] }` document on disk, rewritten in full on every save.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `Ok(None)` when the file does not exist.
    async fn read_document(&self) -> anyhow::Result<Option<Vec<Entry>>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let doc: EntryDocument = serde_json::from_slice(&raw)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(doc.entries))
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data.json".into());
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
    }
}

#[async_trait]
impl EntryStore for JsonFileStore {
    async fn load_all(&self) -> Vec<Entry> {
        match self.read_document().await {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                warn!(error = ?e, "data file unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    async fn save_all(&self, entries: &[Entry]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(&EntryDocumentRef { entries })
            .context("serialize entries")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create {}", parent.display()))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &json)
            .await
            .with_context(|| format!("write {}", temp.display()))?;
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e).with_context(|| format!("replace {}", self.path.display()));
        }

        debug!(count = entries.len(), path = %self.path.display(), "data file written");
        Ok(())
    }

    async fn append(&self, new_entries: Vec<NewEntry>) -> anyhow::Result<Vec<Entry>> {
        let _guard = self.write_lock.lock().await;

        // A corrupt file is refused here rather than overwritten with only the new records.
        let mut entries = self.read_document().await?.unwrap_or_default();
        if new_entries.is_empty() {
            return Ok(Vec::new());
        }

        let first_id = next_id(&entries);
        let created: Vec<Entry> = new_entries
            .into_iter()
            .zip(first_id..)
            .map(|(entry, id)| entry.with_id(id))
            .collect();

        entries.extend(created.iter().cloned());
        self.save_all(&entries).await?;

        info!(added = created.len(), total = entries.len(), "entries appended");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn new_entry(code: &str) -> NewEntry {
        NewEntry {
            code: code.into(),
            nickname: "Nick".into(),
            status: "ok".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load_all().await.is_empty());
    }

    #[tokio::test]
    async fn append_refuses_to_overwrite_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(store.append(vec![new_entry("A")]).await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn save_then_load_uses_entries_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let store = JsonFileStore::new(&path);

        let entries = vec![new_entry("A").with_id(1), new_entry("B").with_id(2)];
        store.save_all(&entries).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["entries"].as_array().unwrap().len(), 2);
        assert_eq!(store.load_all().await, entries);

        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file should be renamed away");
    }

    #[tokio::test]
    async fn append_assigns_sequential_ids_after_existing() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));

        let first = store.append(vec![new_entry("A")]).await.unwrap();
        assert_eq!(first[0].id, 1);

        let batch = store
            .append(vec![new_entry("B"), new_entry("C")])
            .await
            .unwrap();
        assert_eq!(batch.iter().map(|e| e.id).collect::<Vec<_>>(), vec![2, 3]);

        let all = store.load_all().await;
        assert_eq!(
            all.iter().map(|e| e.code.as_str()).collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
    }

    #[tokio::test]
    async fn append_nothing_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileStore::new(&path);
        assert!(store.append(Vec::new()).await.unwrap().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_never_lose_records_or_share_ids() {
        let dir = tempdir().unwrap();
        let store = Arc::new(JsonFileStore::new(dir.path().join("data.json")));

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.append(vec![new_entry(&format!("E{i}"))]).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = store.load_all().await;
        assert_eq!(all.len(), 16);
        let mut ids: Vec<u64> = all.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }

    #[test]
    fn next_id_stays_ahead_of_gaps_and_duplicates() {
        assert_eq!(next_id(&[]), 1);
        let dupes = vec![
            new_entry("A").with_id(1),
            new_entry("B").with_id(2),
            new_entry("C").with_id(2),
        ];
        assert_eq!(next_id(&dupes), 4);
        let gap = vec![new_entry("A").with_id(10)];
        assert_eq!(next_id(&gap), 11);
    }
}
