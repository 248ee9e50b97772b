//! Finding and loading feature files.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::FeatureError;
use crate::model::Feature;
use crate::parser::parse_feature;

fn is_feature_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("feature"))
}

fn feature_path(entry: DirEntry) -> Option<Result<Utf8PathBuf, FeatureError>> {
    if !entry.file_type().is_file() {
        return None;
    }
    match Utf8PathBuf::from_path_buf(entry.into_path()) {
        Ok(path) if is_feature_file(&path) => Some(Ok(path)),
        Ok(_) => None,
        Err(path) => Some(Err(FeatureError::NonUtf8Path(path))),
    }
}

/// Collect every `*.feature` file under `base`, sorted by path.
///
/// A `base` that is itself a feature file yields just that file. The
/// extension is compared case-insensitively.
///
/// # Errors
/// Returns [`FeatureError::Walk`] when the directory cannot be walked and
/// [`FeatureError::NonUtf8Path`] for a feature path that is not UTF-8.
pub fn find_feature_files(base: &Utf8Path) -> Result<Vec<Utf8PathBuf>, FeatureError> {
    let mut files = Vec::new();
    for next in WalkDir::new(base).follow_links(true) {
        let entry = next.map_err(|source| FeatureError::Walk {
            path: base.to_path_buf(),
            source,
        })?;
        if let Some(path) = feature_path(entry) {
            files.push(path?);
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse one feature file.
///
/// # Errors
/// Returns [`FeatureError::Read`] when the file cannot be read, or the
/// parser's error.
pub fn load_feature_file(path: &Utf8Path) -> Result<Feature, FeatureError> {
    let text = fs::read_to_string(path).map_err(|source| FeatureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feature(&text, Some(path), None)
}

/// Parse every feature file under `base`, in path order.
///
/// The first file that fails to load aborts the whole load.
///
/// # Errors
/// As for [`find_feature_files`] and [`load_feature_file`].
pub fn load_features(base: &Utf8Path) -> Result<Vec<Feature>, FeatureError> {
    let files = find_feature_files(base)?;
    log::debug!("found {} feature files under {base}", files.len());
    files.iter().map(|path| load_feature_file(path)).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("temp dir: {err}"));
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("non UTF-8 temp path: {}", path.display()));
        (dir, root)
    }

    fn write(path: &Utf8Path, text: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|err| panic!("mkdir: {err}"));
        }
        fs::write(path, text).unwrap_or_else(|err| panic!("write {path}: {err}"));
    }

    #[test]
    fn finds_feature_files_recursively_in_order() {
        let (_dir, root) = temp_root();
        write(&root.join("b.feature"), "Feature: B\n");
        write(&root.join("nested/a.FEATURE"), "Feature: A\n");
        write(&root.join("notes.txt"), "not a feature");
        let files = find_feature_files(&root).unwrap_or_else(|err| panic!("{err}"));
        let names: Vec<&str> = files.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, ["b.feature", "a.FEATURE"]);
    }

    #[test]
    fn loads_features_with_their_paths() {
        let (_dir, root) = temp_root();
        let path = root.join("cart.feature");
        write(&path, "Feature: Cart\n  Scenario: Empty\n    Given an empty cart\n");
        let features = load_features(&root).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(features.len(), 1);
        let Some(feature) = features.first() else {
            panic!("expected a feature");
        };
        assert_eq!(feature.location().path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn first_syntax_error_aborts_loading() {
        let (_dir, root) = temp_root();
        write(&root.join("a.feature"), "Feature: A\n");
        write(&root.join("b.feature"), "Feature: B\nFeature: C\n");
        let Err(err) = load_features(&root) else {
            panic!("loading should fail");
        };
        assert!(err.to_string().contains("b.feature:2"));
    }

    #[test]
    fn missing_root_is_a_walk_error() {
        let (_dir, root) = temp_root();
        let result = find_feature_files(&root.join("absent"));
        assert!(matches!(result, Err(FeatureError::Walk { .. })));
    }
}
