//! Observable user preference store.
//!
//! Holds string preferences, persists them as a TOML table with an atomic
//! write, and notifies subscribers after every successful `set`.

use crate::{CoreError, CoreResult};

use std::{
    collections::BTreeMap,
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Preference key holding the selected tray icon.
pub const ICON_KEY: &str = "icon";

/// Tray icon used when none has been selected.
pub const DEFAULT_ICON: &str = "icon3";

/// Tray icons the user can choose from.
pub const SELECTABLE_ICONS: [&str; 3] = ["icon", "icon2", "icon3"];

/// Snapshot of every stored preference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    values: BTreeMap<String, String>,
}

impl PreferenceSet {
    /// Stored value for `key`, or `default` when absent or empty.
    pub fn get(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_string(),
        }
    }

    /// Store `value` under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of stored preferences.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

type Listener = Arc<dyn Fn(&PreferenceSet) + Send + Sync>;

struct Inner {
    values: PreferenceSet,
    listeners: Vec<(Uuid, Listener)>,
}

/// Preference store with explicit subscription handles.
pub struct Preferences {
    path: Option<PathBuf>,
    inner: Arc<Mutex<Inner>>,
}

impl Preferences {
    /// Open the store backed by `path`.
    ///
    /// A missing or unreadable file starts with no preferences; the file
    /// is (re)written on the next `set`.
    #[instrument]
    pub fn open(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PreferenceSet>(&contents) {
                Ok(values) => {
                    info!(path = ?path, count = values.len(), "Preferences loaded");
                    values
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "Preferences file unparsable, starting empty");
                    PreferenceSet::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = ?path, "No preferences file yet");
                PreferenceSet::default()
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Preferences file unreadable, starting empty");
                PreferenceSet::default()
            }
        };

        Self::with_values(Some(path.to_path_buf()), values)
    }

    /// Store that is never persisted.
    pub fn in_memory() -> Self {
        Self::with_values(None, PreferenceSet::default())
    }

    fn with_values(path: Option<PathBuf>, values: PreferenceSet) -> Self {
        Self {
            path,
            inner: Arc::new(Mutex::new(Inner {
                values,
                listeners: Vec::new(),
            })),
        }
    }

    /// Stored value for `key`, or `default` when absent or empty.
    pub fn get(&self, key: &str, default: &str) -> String {
        lock(&self.inner).values.get(key, default)
    }

    /// Copy of every stored preference.
    pub fn snapshot(&self) -> PreferenceSet {
        lock(&self.inner).values.clone()
    }

    /// Store `value` under `key`, persist, then notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Preferences`] if the file cannot be written.
    /// The stored value is left unchanged and nobody is notified.
    #[instrument(skip(self))]
    pub fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let (snapshot, listeners) = {
            let mut inner = lock(&self.inner);

            let mut updated = inner.values.clone();
            updated.insert(key, value);

            if let Some(path) = &self.path {
                persist(path, &updated)?;
            }

            inner.values = updated.clone();
            let listeners: Vec<Listener> = inner
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            (updated, listeners)
        };

        debug!(key, listener_count = listeners.len(), "Preference updated");

        // Listeners run outside the lock so they may read the store.
        for listener in listeners {
            listener(&snapshot);
        }

        Ok(())
    }

    /// Register `listener` to receive the full preference set after every
    /// successful `set`.
    ///
    /// The listener stays registered until the returned handle is dropped
    /// or [`Subscription::unsubscribe`] is called.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PreferenceSet) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        lock(&self.inner).listeners.push((id, Arc::new(listener)));

        debug!(subscription_id = %id, "Preference subscription added");

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    /// Backing file, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Handle keeping a preference listener registered.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: Uuid,
    inner: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Identifier of this subscription.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Release the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
            debug!(subscription_id = %self.id, "Preference subscription released");
        }
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write `values` to `path` via a temp file and rename.
fn persist(path: &Path, values: &PreferenceSet) -> CoreResult<()> {
    let error = |reason: String| CoreError::Preferences {
        reason,
        location: ErrorLocation::from(Location::caller()),
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| error(format!("Failed to create preferences directory: {}", e)))?;
        }
    }

    let contents = toml::to_string_pretty(values)
        .map_err(|e| error(format!("Failed to serialize preferences: {}", e)))?;

    let temp_path = path.with_extension("toml.tmp");

    let mut temp_file = fs::File::create(&temp_path)
        .map_err(|e| error(format!("Failed to create temp preferences file: {}", e)))?;

    temp_file
        .write_all(contents.as_bytes())
        .map_err(|e| error(format!("Failed to write temp preferences file: {}", e)))?;

    temp_file
        .sync_all()
        .map_err(|e| error(format!("Failed to sync temp preferences file: {}", e)))?;

    fs::rename(&temp_path, path)
        .map_err(|e| error(format!("Failed to rename temp preferences file: {}", e)))?;

    debug!(path = ?path, "Preferences saved (atomic write)");

    Ok(())
}
