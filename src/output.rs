//! JSON output: `<site>_books.json`, written once at the end of a run.
//!
//! The file is created before crawling starts so an unwritable location fails fast.

use crate::model::BookRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from the output writer.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Cannot create file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<dir>/<site>_books.json`.
pub fn output_path(dir: &Path, site: &str) -> PathBuf {
    dir.join(format!("{}_books.json", site))
}

/// Output file opened up front and filled once by [OutputWriter::finish].
#[derive(Debug)]
pub struct OutputWriter {
    path: PathBuf,
    file: File,
}

impl OutputWriter {
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        let file = File::create(path).map_err(|e| OutputError::CreateFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Write all records as a JSON array, two-space indented, with a trailing newline.
    pub fn finish(self, records: &[BookRecord]) -> Result<(), OutputError> {
        let mut w = BufWriter::new(self.file);
        serde_json::to_writer_pretty(&mut w, records).map_err(|e| OutputError::Serialize {
            path: self.path.clone(),
            source: e,
        })?;
        w.write_all(b"\n")
            .and_then(|()| w.flush())
            .map_err(|e| OutputError::Io {
                path: self.path.clone(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn record(title: &str, price: i64) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            url: format!("https://nxbkimdong.com.vn/products/{}", title),
            author: "Tô Hoài".to_string(),
            isbn: "978-604-2-12345-6".to_string(),
            price,
            page_count: 120,
            category: "Văn học".to_string(),
            name: title.to_string(),
            group: "Kệ 1".to_string(),
            description: String::new(),
            rating: -1.0,
        }
    }

    #[test]
    fn output_path_uses_site() {
        assert_eq!(
            output_path(Path::new("out"), "nxbkimdong.com.vn"),
            PathBuf::from("out/nxbkimdong.com.vn_books.json")
        );
    }

    #[test]
    fn writes_indented_array() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = output_path(dir.path(), "nxbkimdong.com.vn");
        let records = vec![record("a", 1000), record("b", -1)];
        OutputWriter::create(&path)?.finish(&records)?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.starts_with("[\n  {\n    \"title\": \"a\""));
        assert!(text.ends_with("]\n"));
        let parsed: Vec<BookRecord> = serde_json::from_str(&text)?;
        assert_eq!(parsed, records);
        Ok(())
    }

    #[test]
    fn empty_run_writes_empty_array() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("x_books.json");
        OutputWriter::create(&path)?.finish(&[])?;
        assert_eq!(std::fs::read_to_string(&path)?, "[]\n");
        Ok(())
    }

    #[test]
    fn create_fails_in_missing_directory() {
        let path = Path::new("/nonexistent_dir_bookscrape_xyz/site_books.json");
        assert!(matches!(
            OutputWriter::create(path),
            Err(OutputError::CreateFile { .. })
        ));
    }
}
