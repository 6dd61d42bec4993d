//! On-disk response cache keyed by request URL. Survives restarts, so an interrupted crawl
//! can be rerun without refetching pages it already saw.

use sha2::{Digest, Sha256};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<first two hex chars>/<sha256 hex of url>`.
    pub fn path_for(&self, url: &str) -> PathBuf {
        let key = hex::encode(Sha256::digest(url.as_bytes()));
        self.dir.join(&key[..2]).join(key)
    }

    /// Cached body, or `None` when the URL has not been stored.
    pub fn load(&self, url: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(url)) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Written to a `.tmp` sibling, then renamed into place.
    pub fn store(&self, url: &str, body: &str) -> io::Result<()> {
        let path = self.path_for(url);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, body)?;
        std::fs::rename(&tmp, &path)
    }
}
