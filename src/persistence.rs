use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::app_dirs::AppDirs;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// The one persisted record per installation: `{"name": .., "bestScore": ..}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<u32>,
}

impl Profile {
    /// Read the record field by field so that one bad field does not discard
    /// the other. Anything unreadable comes back as an empty profile.
    pub fn from_json(bytes: &[u8]) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) else {
            return Self::default();
        };

        let name = map
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let best_score = map
            .get("bestScore")
            .and_then(Value::as_u64)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

        Self { name, best_score }
    }
}

/// Key-value persistence for the player's name and best score
pub trait ProfileStore {
    /// Never fails: missing or malformed data yields `Profile::default()`.
    fn load(&self) -> Profile;
    fn save(&self, profile: &Profile) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::profile_path().unwrap_or_else(|| PathBuf::from("keyrush_profile.json")),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> Profile {
        match fs::read(&self.path) {
            Ok(bytes) => Profile::from_json(&bytes),
            Err(_) => Profile::default(),
        }
    }

    fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(profile)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a test can keep one clone
/// to inspect what the session saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    slot: Rc<RefCell<Option<Profile>>>,
    saves: Rc<RefCell<usize>>,
    fail_saves: bool,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        let store = Self::default();
        *store.slot.borrow_mut() = Some(profile);
        store
    }

    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<Profile> {
        self.slot.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Profile {
        self.stored().unwrap_or_default()
    }

    fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only store",
            )));
        }
        *self.slot.borrow_mut() = Some(profile.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}
