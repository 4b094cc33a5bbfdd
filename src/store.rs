use crate::errors::{MapError, StoreResult};
use crate::history::{with_map, History, MapSet};
use crate::model::{Document, NodeKey};
use crate::persist::{decode_session, encode_session, MemoryStorage, StorageBackend};
use crate::theme::{FontFamily, LayoutStyle, Theme};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Settings applied when the store creates maps or history.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub max_undo_steps: Option<usize>,
    pub auto_save: bool,
    pub default_theme: Theme,
    pub default_font: FontFamily,
    pub default_layout: LayoutStyle,
    /// Ignore whatever the backend holds and start from a fresh map.
    pub fresh: bool,
}

/// Owns every map of the session, the undo history, the active map index and
/// the storage backend. All edits go through [`DocumentStore::mutate`].
pub struct DocumentStore {
    history: History,
    active_map: usize,
    storage: Box<dyn StorageBackend>,
    options: StoreOptions,
}

impl DocumentStore {
    /// Loads the stored session, or starts a fresh one when nothing valid is stored.
    pub fn open(storage: Box<dyn StorageBackend>, options: StoreOptions) -> Self {
        let restored = if options.fresh {
            None
        } else {
            match storage.load() {
                Ok(Some(record)) => match decode_session(&record) {
                    Ok(session) => Some(session),
                    Err(e) => {
                        warn!(backend = storage.name(), error = %e, "discarding stored state");
                        None
                    }
                },
                Ok(None) => None,
                Err(e) => {
                    warn!(backend = storage.name(), error = %e, "failed to read stored state");
                    None
                }
            }
        };

        let (history, active_map) = match restored.and_then(|s| {
            let active = s.active_map_index;
            History::from_parts(s.snapshots, s.history_index, options.max_undo_steps)
                .map(|h| (h, active))
        }) {
            Some((history, active)) => {
                info!(
                    snapshots = history.len(),
                    cursor = history.cursor(),
                    "restored session"
                );
                (history, active)
            }
            None => {
                info!("starting with a fresh map");
                let initial = vec![Arc::new(Self::new_map_with(&options))];
                (History::new(initial, options.max_undo_steps), 0)
            }
        };

        Self {
            history,
            active_map,
            storage,
            options,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(
            Box::new(MemoryStorage::new()),
            StoreOptions {
                auto_save: true,
                ..StoreOptions::default()
            },
        )
    }

    /// Final save, then drops the backend.
    pub fn close(self) {
        if let Err(e) = self.save() {
            warn!(backend = self.storage.name(), error = %e, "final save failed");
        }
        debug!(backend = self.storage.name(), "store closed");
    }

    /// Writes the whole session to the backend regardless of `auto_save`.
    pub fn save(&self) -> StoreResult<()> {
        let state = encode_session(
            self.history.snapshots(),
            self.history.cursor(),
            self.active_map,
        );
        let record = serde_json::to_string(&state)?;
        self.storage.save(&record)
    }

    pub fn backend_name(&self) -> &str {
        self.storage.name()
    }

    fn new_map_with(options: &StoreOptions) -> Document {
        Document::default_map().with_settings(
            options.default_theme,
            options.default_font,
            options.default_layout,
        )
    }

    pub fn maps(&self) -> &MapSet {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn active_index(&self) -> usize {
        self.active_map
    }

    pub fn active(&self) -> &Document {
        let maps = self.maps();
        &maps[self.active_map.min(maps.len() - 1)]
    }

    pub fn map_count(&self) -> usize {
        self.maps().len()
    }

    pub fn set_active_map(&mut self, index: usize) -> Result<(), MapError> {
        if index >= self.map_count() {
            return Err(MapError::MapIndexOutOfRange(index));
        }
        if index != self.active_map {
            self.active_map = index;
            self.persist();
        }
        Ok(())
    }

    /// See [`History::mutate`]. Persists when something changed.
    pub fn mutate<F>(&mut self, updater: F, add_to_history: bool) -> bool
    where
        F: FnOnce(&mut MapSet),
    {
        let changed = self.history.mutate(updater, add_to_history);
        if changed {
            debug!(
                cursor = self.history.cursor(),
                snapshots = self.history.len(),
                add_to_history,
                "state mutated"
            );
            self.clamp_active();
            self.persist();
        }
        changed
    }

    /// Mutates the active map only.
    pub fn mutate_active<R>(&mut self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        self.mutate_map(self.active_map, f)
    }

    pub fn mutate_map<R>(&mut self, index: usize, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        let mut out = None;
        self.mutate(
            |set| {
                out = with_map(set, index, f);
            },
            true,
        );
        out
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        if moved {
            debug!(cursor = self.history.cursor(), "undo");
            self.clamp_active();
            self.persist();
        }
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        if moved {
            debug!(cursor = self.history.cursor(), "redo");
            self.clamp_active();
            self.persist();
        }
        moved
    }

    /// Appends a fresh map and makes it active. Returns its index.
    pub fn add_map(&mut self) -> usize {
        let doc = Arc::new(Self::new_map_with(&self.options));
        self.mutate(|set| set.push(doc), true);
        self.active_map = self.map_count() - 1;
        self.persist();
        self.active_map
    }

    pub fn add_child(&mut self, parent: NodeKey, name: &str) -> Option<NodeKey> {
        self.mutate_active(|doc| doc.add_child(parent, name)).flatten()
    }

    /// Adds several children in a single undoable step.
    pub fn add_children(&mut self, map: usize, parent: NodeKey, names: &[String]) -> Option<Vec<NodeKey>> {
        self.mutate_map(map, |doc| {
            doc.find_by_id(parent)?;
            Some(
                names
                    .iter()
                    .filter_map(|name| doc.add_child(parent, name.as_str()))
                    .collect::<Vec<_>>(),
            )
        })
        .flatten()
    }

    pub fn insert_sibling_after(&mut self, sibling: NodeKey, name: &str) -> Option<NodeKey> {
        self.mutate_active(|doc| doc.insert_sibling_after(sibling, name))
            .flatten()
    }

    /// Root deletion is rejected before any state is touched.
    pub fn delete_node(&mut self, key: NodeKey) -> Result<bool, MapError> {
        if self.active().is_root(key) {
            return Err(MapError::CannotDeleteRoot);
        }
        Ok(self
            .mutate_active(|doc| doc.delete(key))
            .transpose()?
            .unwrap_or(false))
    }

    pub fn rename_node(&mut self, key: NodeKey, name: &str) -> bool {
        self.mutate_active(|doc| doc.rename(key, name))
            .unwrap_or(false)
    }

    pub fn set_card_content(&mut self, key: NodeKey, content: Option<String>) -> bool {
        self.mutate_active(|doc| doc.set_card_content(key, content))
            .unwrap_or(false)
    }

    pub fn toggle_collapsed(&mut self, key: NodeKey) -> bool {
        self.mutate_active(|doc| doc.toggle_collapsed(key))
            .unwrap_or(false)
    }

    pub fn set_theme(&mut self, theme: Theme) -> bool {
        self.mutate_active(|doc| doc.theme = theme).is_some()
    }

    pub fn set_font(&mut self, font: FontFamily) -> bool {
        self.mutate_active(|doc| doc.font = font).is_some()
    }

    pub fn set_layout(&mut self, layout: LayoutStyle) -> bool {
        self.mutate_active(|doc| doc.layout = layout).is_some()
    }

    fn clamp_active(&mut self) {
        let count = self.map_count();
        if self.active_map >= count {
            self.active_map = count.saturating_sub(1);
        }
    }

    /// Write failures are logged and dropped; the in-memory state stays authoritative.
    fn persist(&self) {
        if !self.options.auto_save {
            return;
        }
        if let Err(e) = self.save() {
            warn!(backend = self.storage.name(), error = %e, "failed to save state");
        }
    }
}
