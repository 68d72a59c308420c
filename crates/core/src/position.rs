use std::sync::Arc;

use perch_storage::{KeyValueStore, StorageError, StorageResult};

use crate::geometry::{Coordinate, Viewport};

pub use crate::geometry::clamp;

/// Slot the launcher placement lives under.
pub const POSITION_KEY: &str = "chatIconPos";

/// Persists the launcher's last released coordinate in a single slot.
#[derive(Clone)]
pub struct PositionStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl PositionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: POSITION_KEY.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the persisted coordinate clamped to `viewport`, or the default
    /// bottom-right anchor when nothing usable is stored.
    pub fn load(&self, viewport: &Viewport) -> Coordinate {
        match self.read_persisted() {
            Some(coordinate) => viewport.clamp(coordinate),
            None => viewport.default_anchor(),
        }
    }

    /// Writes `coordinate` verbatim; callers clamp before saving.
    pub fn save(&self, coordinate: Coordinate) -> StorageResult<()> {
        let value = serde_json::to_string(&coordinate).map_err(|source| {
            StorageError::SerializeStore {
                stage: "serialize-launcher-position",
                source,
            }
        })?;
        self.store.set(&self.key, value)
    }

    fn read_persisted(&self) -> Option<Coordinate> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::debug!(key = %self.key, error = %error, "launcher position unreadable");
                return None;
            }
        };

        match serde_json::from_str::<Coordinate>(&raw) {
            Ok(coordinate) if coordinate.x.is_finite() && coordinate.y.is_finite() => {
                Some(coordinate)
            }
            Ok(_) => {
                tracing::debug!(key = %self.key, "launcher position is not finite");
                None
            }
            Err(error) => {
                tracing::debug!(key = %self.key, error = %error, "launcher position malformed");
                None
            }
        }
    }
}
