//! Writing optimized prompts to the output directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid filename '{0}': use a plain file name without directories")]
    InvalidFilename(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `optimized-prompt-YYYY-MM-DD.txt` for `date`.
#[must_use]
pub fn filename_for(date: NaiveDate) -> String {
    format!("optimized-prompt-{}.txt", date.format("%Y-%m-%d"))
}

/// Default filename for today's local date.
#[must_use]
pub fn default_filename() -> String {
    filename_for(Local::now().date_naive())
}

fn validate_filename(filename: &str) -> Result<&str, SaveError> {
    let name = filename.trim();
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || Path::new(name).components().count() != 1;
    if invalid {
        Err(SaveError::InvalidFilename(filename.to_string()))
    } else {
        Ok(name)
    }
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> SaveError {
    let path = path.to_path_buf();
    move |source| SaveError::Io { path, source }
}

/// Write `content` verbatim to `<output_dir>/<filename>`.
///
/// The directory is created on demand. Relative directories resolve against
/// the working directory. Returns the absolute path written.
///
/// # Errors
///
/// Returns [`SaveError::InvalidFilename`] for names with path separators and
/// [`SaveError::Io`] when the directory or file cannot be written.
pub fn save_prompt(output_dir: &Path, filename: &str, content: &str) -> Result<PathBuf, SaveError> {
    let name = validate_filename(filename)?;
    let dir = std::path::absolute(output_dir).map_err(io_at(output_dir))?;
    fs::create_dir_all(&dir).map_err(io_at(&dir))?;
    let path = dir.join(name);
    fs::write(&path, content).map_err(io_at(&path))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "saved prompt");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn default_filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(filename_for(date), "optimized-prompt-2024-03-09.txt");
        assert!(default_filename().starts_with("optimized-prompt-"));
    }

    #[test]
    fn saved_prompt_reads_back_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let content = "Line one\n  indented \"quoted\" line\n\nunicode: café ✓\n";

        let path = save_prompt(&dir.path().join("nested").join("out"), "prompt.txt", content)
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(path, dir.path().join("nested").join("out").join("prompt.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn saving_twice_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        save_prompt(dir.path(), "p.txt", "a much longer first version").unwrap();
        let path = save_prompt(dir.path(), "p.txt", "short").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "short");
    }

    #[rstest]
    #[case("../escape.txt")]
    #[case("nested/file.txt")]
    #[case("nested\\file.txt")]
    #[case("")]
    #[case("   ")]
    #[case("..")]
    fn rejects_names_with_directories(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let error = save_prompt(dir.path(), name, "x").unwrap_err();
        assert!(matches!(error, SaveError::InvalidFilename(_)));
    }

    #[test]
    fn unwritable_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let error = save_prompt(&blocker, "p.txt", "x").unwrap_err();
        assert!(matches!(error, SaveError::Io { .. }));
    }
}
