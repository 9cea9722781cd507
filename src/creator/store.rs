use super::upload::extension_for;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One shared game, as persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord
{
    pub theme: String,
    pub pass: String,
    pub game: String,
    pub img: Option<String>,
}

pub trait BlobStore
{
    /// Stores `bytes` under a fresh unique path and returns that path.
    fn upload(&mut self, bytes: &[u8], content_type: &str) -> Result<String, StoreError>;
}

pub trait RecordStore
{
    /// Persists `record` and returns its identifier.
    fn insert(&mut self, record: &GameRecord) -> Result<String, StoreError>;

    fn find(&self, pass: &str) -> Result<Option<GameRecord>, StoreError>;
}

pub struct FsBlobStore
{
    root: PathBuf,
}

impl FsBlobStore
{
    pub fn new(root: impl Into<PathBuf>) -> Self
    {
        Self { root: root.into() }
    }
}

impl BlobStore for FsBlobStore
{
    fn upload(&mut self, bytes: &[u8], content_type: &str) -> Result<String, StoreError>
    {
        let dir = self.root.join("images");
        fs::create_dir_all(&dir)?;
        let relative = format!("images/{}.{}", Uuid::new_v4(), extension_for(content_type));
        fs::write(self.root.join(&relative), bytes)?;
        tracing::debug!(path = %relative, size = bytes.len(), "image stored");
        Ok(relative)
    }
}

/// Records appended as JSON lines to `<root>/games.jsonl`.
pub struct JsonlRecordStore
{
    path: PathBuf,
}

impl JsonlRecordStore
{
    pub fn new(root: &Path) -> Self
    {
        Self {
            path: root.join("games.jsonl"),
        }
    }
}

impl RecordStore for JsonlRecordStore
{
    fn insert(&mut self, record: &GameRecord) -> Result<String, StoreError>
    {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(record.pass.clone())
    }

    fn find(&self, pass: &str) -> Result<Option<GameRecord>, StoreError>
    {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: GameRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(line = number + 1, error = %err, "skipping malformed game record");
                    continue;
                }
            };
            if record.pass == pass {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn record(pass: &str) -> GameRecord
    {
        GameRecord {
            theme: "Retro".to_string(),
            pass: pass.to_string(),
            game: "Snake".to_string(),
            img: None,
        }
    }

    #[test]
    fn records_round_trip_by_pass()
    {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = JsonlRecordStore::new(dir.path());
        assert_eq!(store.find("abc").expect("read"), None);

        store.insert(&record("abc")).expect("insert");
        store.insert(&record("def")).expect("insert");
        let found = store.find("def").expect("read").expect("present");
        assert_eq!(found, record("def"));
        assert_eq!(store.find("zzz").expect("read"), None);
    }

    #[test]
    fn malformed_lines_do_not_hide_later_records()
    {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("games.jsonl"), "{\"theme\":\"Ret\n\n").expect("seed");
        let mut store = JsonlRecordStore::new(dir.path());
        store.insert(&record("abc")).expect("insert");
        assert_eq!(store.find("abc").expect("read"), Some(record("abc")));
        assert_eq!(store.find("zzz").expect("read"), None);
    }

    #[test]
    fn record_lines_use_short_field_names()
    {
        let json = serde_json::to_string(&record("p")).expect("json");
        assert_eq!(json, r#"{"theme":"Retro","pass":"p","game":"Snake","img":null}"#);
    }

    #[test]
    fn blobs_get_unique_paths()
    {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FsBlobStore::new(dir.path());
        let a = store.upload(b"one", "image/png").expect("upload");
        let b = store.upload(b"two", "image/png").expect("upload");
        assert_ne!(a, b);
        assert!(a.starts_with("images/") && a.ends_with(".png"));
        assert_eq!(fs::read(dir.path().join(&b)).expect("read"), b"two");
    }
}
