//! Durable storage of the editing session.
//!
//! The whole history is saved as one JSON record:
//! `{ "history": Document[][], "historyIndex": n, "activeMapIndex": n }`.
//! Documents are stored as nested nodes; arena slots and layout data are
//! never written. Anything that fails to parse or validate is reported as
//! an error so the caller can fall back to a fresh map.

use crate::errors::{StoreError, StoreResult};
use crate::history::MapSet;
use crate::model::{Document, Node, NodeKey};
use crate::theme::{FontFamily, LayoutStyle, Theme};
use indextree::{Arena, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Pluggable backend holding a single serialized record.
pub trait StorageBackend {
    fn name(&self) -> &str;

    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> StoreResult<Option<String>>;

    fn save(&self, record: &str) -> StoreResult<()>;

    fn clear(&self) -> StoreResult<()>;
}

/// In-memory backend. Clones share the same slot, so a test can keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(record.into()))),
        }
    }

    pub fn record(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.record())
    }

    fn save(&self, record: &str) -> StoreResult<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(record.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// JSON file backend. Writes go to a sibling temp file which is then renamed
/// over the target, so a crash mid-write never leaves a truncated record.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self) -> StoreResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn save(&self, record: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.temp_path();
        fs::write(&tmp, record)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNode {
    pub id: NodeKey,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_content: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
    #[serde(default)]
    pub children: Vec<StoredNode>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font: FontFamily,
    #[serde(default)]
    pub layout: LayoutStyle,
    pub root: StoredNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub history: Vec<Vec<StoredDocument>>,
    pub history_index: usize,
    pub active_map_index: usize,
}

/// Decoded, validated session.
#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub snapshots: Vec<MapSet>,
    pub history_index: usize,
    pub active_map_index: usize,
}

pub fn encode_document(doc: &Document) -> StoredDocument {
    fn encode(doc: &Document, id: NodeId) -> Option<StoredNode> {
        let node = doc.node(id)?;
        Some(StoredNode {
            id: node.key,
            name: node.name.clone(),
            card_content: node.card_content.clone(),
            collapsed: node.is_collapsed,
            children: doc
                .children(id)
                .into_iter()
                .filter_map(|c| encode(doc, c))
                .collect(),
        })
    }

    StoredDocument {
        theme: doc.theme,
        font: doc.font,
        layout: doc.layout,
        root: encode(doc, doc.root).unwrap_or_else(|| StoredNode {
            id: NodeKey::new_v4(),
            name: String::new(),
            card_content: None,
            collapsed: false,
            children: Vec::new(),
        }),
    }
}

pub fn decode_document(stored: &StoredDocument) -> StoreResult<Document> {
    fn build(
        tree: &mut Arena<Node>,
        stored: &StoredNode,
        seen: &mut HashSet<NodeKey>,
    ) -> StoreResult<NodeId> {
        if !seen.insert(stored.id) {
            return Err(StoreError::Invalid(format!("duplicate node id {}", stored.id)));
        }
        let mut node = Node::with_key(stored.id, stored.name.clone());
        node.card_content = stored.card_content.clone();
        node.is_collapsed = stored.collapsed;
        let id = tree.new_node(node);
        for child in &stored.children {
            let child_id = build(tree, child, seen)?;
            id.append(child_id, tree);
        }
        Ok(id)
    }

    let mut tree = Arena::new();
    let mut seen = HashSet::new();
    let root = build(&mut tree, &stored.root, &mut seen)?;
    Ok(Document {
        tree,
        root,
        theme: stored.theme,
        font: stored.font,
        layout: stored.layout,
    })
}

pub fn encode_session(snapshots: &[MapSet], history_index: usize, active_map_index: usize) -> PersistedState {
    PersistedState {
        history: snapshots
            .iter()
            .map(|set| set.iter().map(|doc| encode_document(doc)).collect())
            .collect(),
        history_index,
        active_map_index,
    }
}

/// Parses and shape-validates a stored record.
pub fn decode_session(record: &str) -> StoreResult<RestoredSession> {
    let state: PersistedState = serde_json::from_str(record)?;

    if state.history.is_empty() {
        return Err(StoreError::Invalid("history is empty".to_string()));
    }
    if state.history_index >= state.history.len() {
        return Err(StoreError::Invalid(format!(
            "history index {} out of range ({} snapshots)",
            state.history_index,
            state.history.len()
        )));
    }

    let mut snapshots = Vec::with_capacity(state.history.len());
    for stored_set in &state.history {
        if stored_set.is_empty() {
            return Err(StoreError::Invalid("snapshot without maps".to_string()));
        }
        let set = stored_set
            .iter()
            .map(|d| decode_document(d).map(Arc::new))
            .collect::<StoreResult<MapSet>>()?;
        snapshots.push(set);
    }

    let maps_at_cursor = snapshots[state.history_index].len();
    if state.active_map_index >= maps_at_cursor {
        return Err(StoreError::Invalid(format!(
            "active map index {} out of range ({} maps)",
            state.active_map_index, maps_at_cursor
        )));
    }

    Ok(RestoredSession {
        snapshots,
        history_index: state.history_index,
        active_map_index: state.active_map_index,
    })
}
