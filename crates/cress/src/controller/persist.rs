//! Durable stores for scenario summaries.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};

use super::Summary;
use crate::error::PersistError;

/// Store for the per-scenario summary of the previous run.
///
/// Both calls may fail; the controller hands failures to its caller
/// unchanged.
pub trait Persister {
    /// Load the summary written by the previous run, if there is one.
    ///
    /// # Errors
    /// Returns a [`PersistError`] when the store exists but cannot be read.
    fn read_previous(&self) -> Result<Option<Summary>, PersistError>;

    /// Replace the stored summary wholesale.
    ///
    /// # Errors
    /// Returns a [`PersistError`] when the store cannot be written.
    fn write_results(&mut self, summary: &Summary) -> Result<(), PersistError>;
}

/// Keeps the summary in a JSON file mapping scenario ids to statuses.
///
/// # Examples
/// ```
/// use cress::{JsonFilePersister, Persister, ScenarioId, ScenarioStatus, Summary};
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("ids.json"))
///     .expect("utf-8 temp path");
/// let mut persister = JsonFilePersister::new(path);
/// assert_eq!(persister.read_previous().expect("readable"), None);
///
/// let summary = Summary::from([(ScenarioId::new(1), ScenarioStatus::Failed)]);
/// persister.write_results(&summary).expect("writable");
/// assert_eq!(persister.read_previous().expect("readable"), Some(summary));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFilePersister {
    path: Utf8PathBuf,
}

impl JsonFilePersister {
    /// Persist to `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn encoding_error(&self, source: serde_json::Error) -> PersistError {
        PersistError::Encoding {
            path: self.path.clone(),
            source,
        }
    }
}

impl Persister for JsonFilePersister {
    fn read_previous(&self) -> Result<Option<Summary>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("no previous summary at {}", self.path);
                return Ok(None);
            }
            Err(err) => return Err(self.io_error(err)),
        };
        let summary: Summary =
            serde_json::from_str(&text).map_err(|err| self.encoding_error(err))?;
        log::debug!("read {} scenario statuses from {}", summary.len(), self.path);
        Ok(Some(summary))
    }

    fn write_results(&mut self, summary: &Summary) -> Result<(), PersistError> {
        let text = serde_json::to_string_pretty(summary).map_err(|err| self.encoding_error(err))?;
        fs::write(&self.path, text).map_err(|err| self.io_error(err))?;
        log::debug!("wrote {} scenario statuses to {}", summary.len(), self.path);
        Ok(())
    }
}

/// In-process store, shared between clones.
///
/// Handy for running the same documents twice in one process, such as a
/// failed-only rerun straight after a full run.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersister {
    stored: Rc<RefCell<Option<Summary>>>,
}

impl MemoryPersister {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `summary`.
    #[must_use]
    pub fn with_summary(summary: Summary) -> Self {
        Self {
            stored: Rc::new(RefCell::new(Some(summary))),
        }
    }

    /// Copy of the stored summary.
    #[must_use]
    pub fn stored(&self) -> Option<Summary> {
        self.stored.borrow().clone()
    }
}

impl Persister for MemoryPersister {
    fn read_previous(&self) -> Result<Option<Summary>, PersistError> {
        Ok(self.stored())
    }

    fn write_results(&mut self, summary: &Summary) -> Result<(), PersistError> {
        *self.stored.borrow_mut() = Some(summary.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::controller::{ScenarioId, ScenarioStatus};

    fn persister_in(dir: &tempfile::TempDir) -> JsonFilePersister {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(".cressids"))
            .unwrap_or_else(|path| panic!("non UTF-8 temp path: {}", path.display()));
        JsonFilePersister::new(path)
    }

    fn temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap_or_else(|err| panic!("temp dir: {err}"))
    }

    #[test]
    fn missing_file_reads_as_absent() {
        let dir = temp_dir();
        let persister = persister_in(&dir);
        assert!(matches!(persister.read_previous(), Ok(None)));
    }

    #[test]
    fn writes_statuses_as_snake_case_json() {
        let dir = temp_dir();
        let mut persister = persister_in(&dir);
        let summary = Summary::from([
            (ScenarioId::new(1), ScenarioStatus::Passed),
            (ScenarioId::new(2), ScenarioStatus::NotRun),
        ]);
        persister
            .write_results(&summary)
            .unwrap_or_else(|err| panic!("write: {err}"));
        let text = fs::read_to_string(persister.path())
            .unwrap_or_else(|err| panic!("read back: {err}"));
        let value: serde_json::Value =
            serde_json::from_str(&text).unwrap_or_else(|err| panic!("json: {err}"));
        assert_eq!(value, serde_json::json!({"1": "passed", "2": "not_run"}));
    }

    #[test]
    fn corrupt_file_is_an_encoding_error() {
        let dir = temp_dir();
        let persister = persister_in(&dir);
        fs::write(persister.path(), "not json").unwrap_or_else(|err| panic!("seed: {err}"));
        assert!(matches!(
            persister.read_previous(),
            Err(PersistError::Encoding { .. })
        ));
    }

    #[test]
    fn memory_store_is_shared_between_clones() {
        let store = MemoryPersister::new();
        let mut writer = store.clone();
        let summary = Summary::from([(ScenarioId::new(4), ScenarioStatus::Failed)]);
        writer
            .write_results(&summary)
            .unwrap_or_else(|err| panic!("write: {err}"));
        assert_eq!(store.stored(), Some(summary));
    }
}
