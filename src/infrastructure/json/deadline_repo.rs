use crate::domain::entities::deadline::Deadline;
use crate::domain::error::DomainError;
use crate::domain::ports::deadline_repository::DeadlineRepository;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Deadlines kept as one pretty-printed JSON object keyed by roadmap id.
pub struct JsonDeadlineRepo {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

type DeadlineMap = BTreeMap<String, Deadline>;

impl JsonDeadlineRepo {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DomainError::Store(format!("Cannot create {}: {e}", parent.display())))?;
            }
            std::fs::write(&path, "{}")
                .map_err(|e| DomainError::Store(format!("Cannot create {}: {e}", path.display())))?;
        }
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    fn load(&self) -> Result<DeadlineMap, DomainError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| DomainError::Store(format!("Failed to load deadlines: {e}")))?;
        if raw.trim().is_empty() {
            return Ok(DeadlineMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| DomainError::Parse(format!("Corrupt deadline file {}: {e}", self.path.display())))
    }

    fn store(&self, data: &DeadlineMap) -> Result<(), DomainError> {
        let json = serde_json::to_string_pretty(data).map_err(|e| DomainError::Parse(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| DomainError::Store(format!("Failed to save deadlines: {e}")))
    }
}

impl DeadlineRepository for JsonDeadlineRepo {
    fn save(&self, deadline: &Deadline) -> Result<(), DomainError> {
        let _guard = self.guard.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        let mut data = self.load()?;
        data.insert(deadline.roadmap_id.clone(), deadline.clone());
        self.store(&data)
    }

    fn get(&self, roadmap_id: &str) -> Result<Option<Deadline>, DomainError> {
        let _guard = self.guard.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(self.load()?.remove(roadmap_id))
    }

    fn delete(&self, roadmap_id: &str) -> Result<bool, DomainError> {
        let _guard = self.guard.lock().map_err(|e| DomainError::Store(e.to_string()))?;
        let mut data = self.load()?;
        if data.remove(roadmap_id).is_none() {
            return Ok(false);
        }
        self.store(&data)?;
        Ok(true)
    }
}
