// crates/worldmap-core/src/dataset/disk.rs
#![cfg(feature = "disk-cache")]

use super::store::ResponseCache;
use crate::error::{MapError, Result};
use crate::model::CachedDataset;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

#[cfg(feature = "compact")]
pub const CACHE_SUFFIX: &str = "bin.gz";
#[cfg(not(feature = "compact"))]
pub const CACHE_SUFFIX: &str = "bin";

/// Structured cache for native hosts: one file per URL under `dir`.
///
/// Each entry is a bincode-encoded [`CachedDataset`] (gzip-wrapped with the
/// `compact` feature). The stored key is checked on read, so two URLs that
/// sanitize to the same file name never serve each other's payload.
#[derive(Debug, Clone)]
pub struct DiskResponseCache {
    dir: PathBuf,
}

impl DiskResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, url: &str) -> PathBuf {
        let stem: String = url
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.{CACHE_SUFFIX}"))
    }

    /// `None` when no entry was ever written for this path.
    fn read_entry(path: &Path) -> Result<Option<CachedDataset>> {
        let Some(reader) = entry_reader(path)? else {
            return Ok(None);
        };
        let entry = bincode::deserialize_from(reader).map_err(|e| {
            MapError::Cache(format!("unreadable cache entry {}: {e}", path.display()))
        })?;
        Ok(Some(entry))
    }

    fn write_entry(path: &Path, entry: &CachedDataset) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        #[cfg(feature = "compact")]
        let mut encoder: Box<dyn Write> = Box::new(GzEncoder::new(writer, Compression::default()));
        #[cfg(not(feature = "compact"))]
        let mut encoder: Box<dyn Write> = Box::new(writer);

        bincode::serialize_into(&mut encoder, entry)?;
        encoder.flush()?;
        Ok(())
    }
}

fn entry_reader(path: &Path) -> Result<Option<Box<dyn Read>>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(MapError::Cache(format!(
                "cannot open cache entry {}: {e}",
                path.display()
            )))
        }
    };
    let buffered = BufReader::new(file);

    #[cfg(feature = "compact")]
    let reader: Box<dyn Read> = Box::new(GzDecoder::new(buffered));
    #[cfg(not(feature = "compact"))]
    let reader: Box<dyn Read> = Box::new(buffered);

    Ok(Some(reader))
}

impl ResponseCache for DiskResponseCache {
    async fn lookup(&self, url: &str) -> Result<Option<String>> {
        let path = self.entry_path(url);
        match Self::read_entry(&path)? {
            Some(entry) if entry.key == url => Ok(Some(entry.payload)),
            Some(entry) => {
                log::debug!("cache entry {} belongs to {}", path.display(), entry.key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn store(&self, url: &str, payload: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let entry = CachedDataset {
            key: url.to_string(),
            payload: payload.to_string(),
        };
        Self::write_entry(&self.entry_path(url), &entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskResponseCache::new(dir.path().join("nested"));
        let url = "https://example.test/countries.geojson";

        assert_eq!(cache.lookup(url).await.unwrap(), None);
        cache.store(url, "{\"type\":\"FeatureCollection\"}").await.unwrap();
        assert_eq!(
            cache.lookup(url).await.unwrap().as_deref(),
            Some("{\"type\":\"FeatureCollection\"}")
        );
    }

    #[tokio::test]
    async fn colliding_file_names_are_misses() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskResponseCache::new(dir.path());
        cache.store("https://a.test/x?y", "one").await.unwrap();
        // Sanitizes to the same stem.
        assert_eq!(cache.entry_path("https://a.test/x?y"), cache.entry_path("https://a.test/x_y"));
        assert_eq!(cache.lookup("https://a.test/x_y").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_directory_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskResponseCache::new(dir.path().join("never-created"));
        assert_eq!(cache.lookup("https://a.test/none").await.unwrap(), None);
        assert!(!cache.dir().exists());
    }

    #[tokio::test]
    async fn corrupt_entries_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskResponseCache::new(dir.path());
        let url = "https://a.test/broken";
        fs::write(cache.entry_path(url), b"definitely not bincode").unwrap();
        assert!(matches!(
            cache.lookup(url).await,
            Err(MapError::Cache(_))
        ));
    }
}
