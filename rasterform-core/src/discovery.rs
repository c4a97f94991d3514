//! Directory listing helpers used during scene discovery.
//!
//! Listings are always top-level only and sorted by file name, so the same
//! input tree yields the same tiles and band candidates on every run.

use crate::error::{CoreError, CoreResult};

use regex::Regex;
use std::path::{Path, PathBuf};

fn sorted_entries<F>(dir: &Path, keep: F) -> CoreResult<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let read_dir = std::fs::read_dir(dir).map_err(|e| {
        CoreError::InvalidInput(format!("Cannot list directory {}: {}", dir.display(), e))
    })?;

    let mut entries: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            keep(&path).then_some(path)
        })
        .collect();
    entries.sort();
    Ok(entries)
}

/// Regular files directly inside `dir`, sorted.
pub fn list_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    sorted_entries(dir, Path::is_file)
}

/// Sub-directories directly inside `dir`, sorted.
pub fn list_subdirectories(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    sorted_entries(dir, Path::is_dir)
}

/// First file in `dir` (by name) whose file name matches `pattern`.
pub fn find_file_matching(dir: &Path, pattern: &Regex) -> CoreResult<Option<PathBuf>> {
    Ok(list_files(dir)?.into_iter().find(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| pattern.is_match(name))
    }))
}

/// Whether the file name of `path` ends with `extension` (case-insensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_ascii_lowercase().ends_with(&extension.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn test_list_files_is_sorted_and_flat() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        File::create(dir.path().join("b.TIF"))?;
        File::create(dir.path().join("a.tif"))?;
        fs::create_dir(dir.path().join("sub"))?;
        File::create(dir.path().join("sub").join("nested.tif"))?;

        let files = list_files(dir.path())?;
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, vec!["a.tif", "b.TIF"]);

        let dirs = list_subdirectories(dir.path())?;
        assert_eq!(dirs, vec![dir.path().join("sub")]);
        Ok(())
    }

    #[test]
    fn test_find_file_matching() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        File::create(dir.path().join("manifest.safe"))?;
        File::create(dir.path().join("S2A_OPER_MTD_SAFL1C_PDMC_20160101.xml"))?;

        let pattern = Regex::new(r"2A_OPER_MTD_SAFL1C_(.*)\.xml")?;
        let found = find_file_matching(dir.path(), &pattern)?;
        assert_eq!(
            found,
            Some(dir.path().join("S2A_OPER_MTD_SAFL1C_PDMC_20160101.xml"))
        );
        Ok(())
    }

    #[test]
    fn test_missing_directory() {
        let result = list_files(Path::new("surely_this_does_not_exist_42"));
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("x/LC8_B1.TIF"), ".tif"));
        assert!(has_extension(Path::new("x/T_B01.jp2"), ".JP2"));
        assert!(!has_extension(Path::new("x/LC8_MTL.TXT"), ".tif"));
    }
}
