//! Persisted user preferences: the theme flag and the run counter. Storage is
//! injected so the app never touches a global.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{error, info, warn};

/// String key-value storage that survives restarts
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()>;
}

/// In-memory store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// A JSON object on disk. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Load the store at `path`. A missing or unreadable file starts empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let helper = |path: &Path| -> anyhow::Result<BTreeMap<String, String>> {
            let contents = fs::read(path)?;
            Ok(serde_json::from_slice(&contents)?)
        };
        let values = if path.exists() {
            match helper(&path) {
                Ok(values) => values,
                Err(err) => {
                    error!("Error loading preferences from {}: {err}", path.display());
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        Self { path, values }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Error creating preferences directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Error saving preferences to {}", self.path.display()))?;
        Ok(())
    }
}

/// Typed access to the two persisted preferences
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    const THEME: &'static str = "theme";
    const RUN_COUNT: &'static str = "run_count";
    const ENABLED: &'static str = "enabled";
    const DISABLED: &'static str = "disabled";

    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the alternate (light) theme is on. Anything but `enabled`
    /// counts as off.
    pub fn theme_enabled(&self) -> bool {
        self.store.get(Self::THEME).as_deref() == Some(Self::ENABLED)
    }

    pub fn set_theme_enabled(&mut self, enabled: bool) -> anyhow::Result<()> {
        let value = if enabled { Self::ENABLED } else { Self::DISABLED };
        info!(theme = value, "Saving theme");
        self.store.set(Self::THEME, value.to_string())
    }

    pub fn run_count(&self) -> u64 {
        match self.store.get(Self::RUN_COUNT) {
            None => 0,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Ignoring unparsable run count {raw:?}");
                0
            }),
        }
    }

    /// Count this launch and return the new total
    pub fn bump_run_count(&mut self) -> anyhow::Result<u64> {
        let count = self.run_count().saturating_add(1);
        self.store.set(Self::RUN_COUNT, count.to_string())?;
        Ok(count)
    }
}
