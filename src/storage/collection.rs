//! Generic JSONL document collection.
//!
//! Each line is one stored document: a server-assigned id and timestamp
//! wrapping the domain payload. Inserts append; updates and deletes
//! rewrite the file. Corrupt lines are skipped with a warning so one bad
//! edit never blocks reads of the rest.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::StorageError;

/// A document as it sits on disk: envelope fields plus the flattened
/// domain payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: String,
    pub stored_at: DateTime<Utc>,
    #[serde(flatten)]
    pub item: T,
}

/// Handle on one JSONL collection file. Cheap to construct; opens the
/// file per operation.
pub struct Collection<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> Collection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a document, assigning a fresh id and timestamp.
    pub fn insert(&self, item: T) -> Result<Stored<T>, StorageError> {
        let stored = Stored {
            id: Uuid::new_v4().to_string(),
            stored_at: Utc::now(),
            item,
        };
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", serde_json::to_string(&stored)?)?;
        writer.flush()?;

        debug!(id = %stored.id, path = ?self.path, "inserted document");
        Ok(stored)
    }

    /// Read every document, skipping lines that fail to parse.
    pub fn get_all(&self) -> Result<Vec<Stored<T>>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut documents = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(document) => documents.push(document),
                Err(e) => {
                    warn!(
                        line = line_num + 1,
                        path = ?self.path,
                        error = %e,
                        "skipping unparsable line"
                    );
                }
            }
        }

        debug!(count = documents.len(), path = ?self.path, "read collection");
        Ok(documents)
    }

    pub fn get(&self, id: &str) -> Result<Option<Stored<T>>, StorageError> {
        Ok(self.get_all()?.into_iter().find(|d| d.id == id))
    }

    /// Replace the payload of an existing document in place, keeping its
    /// id and timestamp. Returns false when the id is unknown.
    pub fn update(&self, id: &str, item: T) -> Result<bool, StorageError> {
        let mut documents = self.get_all()?;
        let Some(slot) = documents.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        slot.item = item;
        self.write_all(&documents)?;
        Ok(true)
    }

    /// Remove a document by id. Returns false when the id is unknown.
    pub fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut documents = self.get_all()?;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        if documents.len() == before {
            return Ok(false);
        }
        self.write_all(&documents)?;
        Ok(true)
    }

    fn write_all(&self, documents: &[Stored<T>]) -> Result<(), StorageError> {
        self.ensure_dir()?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        for document in documents {
            writeln!(writer, "{}", serde_json::to_string(document)?)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        text: String,
        priority: u32,
    }

    fn collection(dir: &TempDir) -> Collection<Note> {
        Collection::new(dir.path().join("notes.jsonl"))
    }

    fn note(text: &str, priority: u32) -> Note {
        Note {
            text: text.to_string(),
            priority,
        }
    }

    #[test]
    fn test_insert_assigns_id_and_persists() {
        let dir = TempDir::new().unwrap();
        let notes = collection(&dir);

        let stored = notes.insert(note("hola", 1)).unwrap();
        assert!(!stored.id.is_empty());

        let all = notes.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, stored.id);
        assert_eq!(all[0].item, note("hola", 1));
    }

    #[test]
    fn test_get_all_empty_when_missing() {
        let dir = TempDir::new().unwrap();
        assert!(collection(&dir).get_all().unwrap().is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let dir = TempDir::new().unwrap();
        let notes = collection(&dir);
        let a = notes.insert(note("a", 1)).unwrap();
        notes.insert(note("b", 2)).unwrap();

        let found = notes.get(&a.id).unwrap().unwrap();
        assert_eq!(found.item.text, "a");
        assert!(notes.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_update_keeps_envelope() {
        let dir = TempDir::new().unwrap();
        let notes = collection(&dir);
        let stored = notes.insert(note("old", 1)).unwrap();

        assert!(notes.update(&stored.id, note("new", 9)).unwrap());
        let reloaded = notes.get(&stored.id).unwrap().unwrap();
        assert_eq!(reloaded.item.text, "new");
        assert_eq!(reloaded.stored_at, stored.stored_at);

        assert!(!notes.update("missing", note("x", 0)).unwrap());
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let notes = collection(&dir);
        let a = notes.insert(note("a", 1)).unwrap();
        notes.insert(note("b", 2)).unwrap();

        assert!(notes.delete(&a.id).unwrap());
        assert!(!notes.delete(&a.id).unwrap());

        let all = notes.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].item.text, "b");
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.jsonl");
        std::fs::write(
            &path,
            "{\"id\":\"1\",\"stored_at\":\"2026-01-20T10:00:00Z\",\"text\":\"ok\",\"priority\":1}\n\
             not-json\n\
             \n\
             {\"id\":\"2\",\"stored_at\":\"2026-01-20T10:01:00Z\",\"text\":\"also ok\",\"priority\":2}\n",
        )
        .unwrap();

        let notes: Collection<Note> = Collection::new(path);
        let all = notes.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].item.text, "also ok");
    }

    #[test]
    fn test_flattened_envelope_shape() {
        let dir = TempDir::new().unwrap();
        let notes = collection(&dir);
        notes.insert(note("plano", 3)).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("notes.jsonl")).unwrap();
        let value: serde_json::Value = serde_json::from_str(raw.trim()).unwrap();
        // Envelope and payload share one flat object.
        assert!(value.get("id").is_some());
        assert!(value.get("stored_at").is_some());
        assert_eq!(value["text"], "plano");
    }
}
