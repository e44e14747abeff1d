/// Shared bridge configuration
///
/// A single Settings record governs which universe the sampler reports and
/// where the channel window starts. It is read by the sampler on every poll
/// and replaced wholesale by any connected client, so all access goes
/// through SharedSettings which guarantees readers never observe a
/// half-updated record.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Bridge configuration, persisted as JSON with short wire keys
/// matching the client protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Art-Net universe to report
    #[serde(rename = "uni")]
    pub universe: u16,

    /// First channel to report, 1-based
    #[serde(rename = "ch")]
    pub channel_from: i64,

    /// Client-side filter expression (stored, not interpreted)
    #[serde(rename = "filter")]
    pub filter: String,

    /// Document the client currently displays (stored, not interpreted)
    #[serde(rename = "file")]
    pub file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            universe: 0,
            channel_from: 1,
            filter: String::new(),
            file: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(settings)
    }

    /// Persist settings to a JSON file, rewriting it in full
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }
}

/// Handle to the process-wide Settings instance
///
/// Constructed once at startup and passed explicitly to every component
/// that needs it. Replacement swaps the whole record under the write lock,
/// reads clone a complete snapshot under the read lock.
#[derive(Clone)]
pub struct SharedSettings {
    path: Arc<PathBuf>,
    inner: Arc<RwLock<Settings>>,
}

impl SharedSettings {
    /// Create a shared handle around an initial record
    pub fn new(path: PathBuf, initial: Settings) -> Self {
        Self {
            path: Arc::new(path),
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Clone the current record
    pub async fn snapshot(&self) -> Settings {
        self.inner.read().await.clone()
    }

    /// Replace the record wholesale and persist it
    ///
    /// The in-memory value is swapped first; persistence happens after the
    /// lock is released so a slow disk never blocks readers. A persist
    /// failure leaves the new value in effect.
    pub async fn replace(&self, next: Settings) -> Result<()> {
        {
            let mut current = self.inner.write().await;
            *current = next.clone();
        }
        next.save(&self.path)
    }

    /// Path of the backing settings file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Settings {
        Settings {
            universe: 4,
            channel_from: 17,
            filter: "dim > 0".to_string(),
            file: "plan.pdf".to_string(),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.universe, 0);
        assert_eq!(settings.channel_from, 1);
        assert!(settings.filter.is_empty());
        assert!(settings.file.is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let original = sample();
        original.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"uni": 2}"#).unwrap();
        assert_eq!(settings.universe, 2);
        assert_eq!(settings.channel_from, 1);
    }

    #[tokio::test]
    async fn test_replace_persists_and_updates_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let shared = SharedSettings::new(path.clone(), Settings::default());
        shared.replace(sample()).await.unwrap();

        assert_eq!(shared.snapshot().await, sample());
        assert_eq!(Settings::load(&path).unwrap(), sample());
    }

    #[tokio::test]
    async fn test_replacement_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let a = Settings {
            universe: 1,
            channel_from: 10,
            filter: "a".to_string(),
            file: "a.pdf".to_string(),
        };
        let b = Settings {
            universe: 2,
            channel_from: 20,
            filter: "b".to_string(),
            file: "b.pdf".to_string(),
        };

        let shared = SharedSettings::new(path, a.clone());

        let writer = {
            let shared = shared.clone();
            let (a, b) = (a.clone(), b.clone());
            tokio::spawn(async move {
                for i in 0..200 {
                    let next = if i % 2 == 0 { b.clone() } else { a.clone() };
                    shared.replace(next).await.unwrap();
                }
            })
        };

        // A reader must only ever see one of the two complete records,
        // never a mix of fields from both.
        for _ in 0..200 {
            let seen = shared.snapshot().await;
            assert!(seen == a || seen == b, "observed torn settings: {:?}", seen);
            tokio::task::yield_now().await;
        }

        writer.await.unwrap();
    }
}
