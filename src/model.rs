use crate::errors::MapError;
use crate::theme::{FontFamily, LayoutStyle, Theme};
use indextree::{Arena, NodeId};
use uuid::Uuid;

/// Stable identity of a node. Survives history snapshots and persistence,
/// unlike the arena slot it currently lives in.
pub type NodeKey = Uuid;

pub const DEFAULT_ROOT_NAME: &str = "New Mindmap";
pub const DEFAULT_CHILD_NAMES: [&str; 2] = ["Main Topic 1", "Main Topic 2"];
pub const NEW_NODE_NAME: &str = "New Node";

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: NodeKey,
    pub name: String,
    pub card_content: Option<String>,
    pub is_collapsed: bool,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_key(NodeKey::new_v4(), name)
    }

    pub fn with_key(key: NodeKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            card_content: None,
            is_collapsed: false,
        }
    }

    pub fn has_card(&self) -> bool {
        self.card_content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// Where a node sits in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLocation {
    pub node: NodeId,
    pub parent: Option<NodeId>,
    pub index: usize,
}

/// One mind map: a single root plus its presentation settings.
#[derive(Debug, Clone)]
pub struct Document {
    pub tree: Arena<Node>,
    pub root: NodeId,
    pub theme: Theme,
    pub font: FontFamily,
    pub layout: LayoutStyle,
}

impl Document {
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut tree = Arena::new();
        let root = tree.new_node(Node::new(root_name));
        Self {
            tree,
            root,
            theme: Theme::default(),
            font: FontFamily::default(),
            layout: LayoutStyle::default(),
        }
    }

    /// The map created on first launch or by "new map".
    pub fn default_map() -> Self {
        let mut doc = Self::new(DEFAULT_ROOT_NAME);
        for name in DEFAULT_CHILD_NAMES {
            let child = doc.tree.new_node(Node::new(name));
            doc.root.append(child, &mut doc.tree);
        }
        doc
    }

    pub fn with_settings(mut self, theme: Theme, font: FontFamily, layout: LayoutStyle) -> Self {
        self.theme = theme;
        self.font = font;
        self.layout = layout;
        self
    }

    pub fn root_key(&self) -> NodeKey {
        self.node(self.root).map(|n| n.key).unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.tree
            .get(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.tree
            .get_mut(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get_mut())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.tree).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(|n| n.parent())
    }

    /// Depth-first search from the root. Ids are unique so at most one node matches.
    pub fn find_by_id(&self, key: NodeKey) -> Option<NodeId> {
        self.root
            .descendants(&self.tree)
            .find(|id| self.node(*id).is_some_and(|n| n.key == key))
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.find_by_id(key).and_then(|id| self.node(id))
    }

    pub fn find_with_parent(&self, key: NodeKey) -> Option<NodeLocation> {
        let node = self.find_by_id(key)?;
        let parent = self.parent(node);
        let index = match parent {
            Some(p) => p.children(&self.tree).position(|c| c == node)?,
            None => 0,
        };
        Some(NodeLocation {
            node,
            parent,
            index,
        })
    }

    /// Names from the root down to `key`, inclusive.
    pub fn compute_path(&self, key: NodeKey) -> Vec<String> {
        let Some(id) = self.find_by_id(key) else {
            return Vec::new();
        };
        let mut path: Vec<String> = id
            .ancestors(&self.tree)
            .filter_map(|a| self.node(a).map(|n| n.name.clone()))
            .collect();
        path.reverse();
        path
    }

    pub fn depth(&self, id: NodeId) -> usize {
        id.ancestors(&self.tree).count().saturating_sub(1)
    }

    pub fn node_count(&self) -> usize {
        self.root.descendants(&self.tree).count()
    }

    pub fn is_root(&self, key: NodeKey) -> bool {
        self.root_key() == key
    }

    pub fn add_child(&mut self, parent: NodeKey, name: impl Into<String>) -> Option<NodeKey> {
        let parent_id = self.find_by_id(parent)?;
        let node = Node::new(name);
        let key = node.key;
        let child = self.tree.new_node(node);
        parent_id.append(child, &mut self.tree);
        if let Some(p) = self.node_mut(parent_id) {
            p.is_collapsed = false;
        }
        Some(key)
    }

    /// Inserts right after `sibling`. The root has no siblings, so this is a no-op there.
    pub fn insert_sibling_after(
        &mut self,
        sibling: NodeKey,
        name: impl Into<String>,
    ) -> Option<NodeKey> {
        let location = self.find_with_parent(sibling)?;
        location.parent?;
        let node = Node::new(name);
        let key = node.key;
        let new_id = self.tree.new_node(node);
        location.node.insert_after(new_id, &mut self.tree);
        Some(key)
    }

    /// Removes `key` and its whole subtree. Returns `Ok(false)` if the node is gone already.
    pub fn delete(&mut self, key: NodeKey) -> Result<bool, MapError> {
        if self.is_root(key) {
            return Err(MapError::CannotDeleteRoot);
        }
        match self.find_by_id(key) {
            Some(id) => {
                id.remove_subtree(&mut self.tree);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn rename(&mut self, key: NodeKey, name: impl Into<String>) -> bool {
        self.update(key, |n| n.name = name.into())
    }

    pub fn set_card_content(&mut self, key: NodeKey, content: Option<String>) -> bool {
        let content = content.filter(|c| !c.trim().is_empty());
        self.update(key, |n| n.card_content = content)
    }

    pub fn toggle_collapsed(&mut self, key: NodeKey) -> bool {
        self.update(key, |n| n.is_collapsed = !n.is_collapsed)
    }

    fn update(&mut self, key: NodeKey, f: impl FnOnce(&mut Node)) -> bool {
        match self.find_by_id(key).and_then(|id| self.node_mut(id)) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    /// Compares node content and child order recursively, ignoring arena layout.
    pub fn structurally_eq(&self, other: &Document) -> bool {
        fn same(a: &Document, a_id: NodeId, b: &Document, b_id: NodeId) -> bool {
            match (a.node(a_id), b.node(b_id)) {
                (Some(x), Some(y)) if x == y => {}
                _ => return false,
            }
            let left = a.children(a_id);
            let right = b.children(b_id);
            left.len() == right.len()
                && left
                    .iter()
                    .zip(right.iter())
                    .all(|(l, r)| same(a, *l, b, *r))
        }

        self.theme == other.theme
            && self.font == other.font
            && self.layout == other.layout
            && same(self, self.root, other, other.root)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::default_map()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(doc: &Document, id: NodeId) -> Vec<String> {
        doc.children(id)
            .into_iter()
            .filter_map(|c| doc.node(c).map(|n| n.name.clone()))
            .collect()
    }

    #[test]
    fn test_default_map() {
        let doc = Document::default_map();
        assert_eq!(doc.node(doc.root).unwrap().name, DEFAULT_ROOT_NAME);
        assert_eq!(names(&doc, doc.root), vec!["Main Topic 1", "Main Topic 2"]);
        assert_eq!(doc.node_count(), 3);
    }

    #[test]
    fn test_find_by_id_and_parent() {
        let mut doc = Document::default_map();
        let first = doc.children(doc.root)[0];
        let first_key = doc.node(first).unwrap().key;
        let grandchild = doc.add_child(first_key, "Leaf").unwrap();

        let loc = doc.find_with_parent(grandchild).unwrap();
        assert_eq!(loc.parent, Some(first));
        assert_eq!(loc.index, 0);

        let second_key = doc.node(doc.children(doc.root)[1]).unwrap().key;
        let loc = doc.find_with_parent(second_key).unwrap();
        assert_eq!(loc.parent, Some(doc.root));
        assert_eq!(loc.index, 1);

        let root_loc = doc.find_with_parent(doc.root_key()).unwrap();
        assert_eq!(root_loc.parent, None);

        assert!(doc.find_by_id(NodeKey::new_v4()).is_none());
    }

    #[test]
    fn test_compute_path() {
        let mut doc = Document::default_map();
        let first_key = doc.node(doc.children(doc.root)[0]).unwrap().key;
        let leaf = doc.add_child(first_key, "Polity").unwrap();
        assert_eq!(
            doc.compute_path(leaf),
            vec!["New Mindmap", "Main Topic 1", "Polity"]
        );
        assert!(doc.compute_path(NodeKey::new_v4()).is_empty());
    }

    #[test]
    fn test_insert_sibling_after() {
        let mut doc = Document::default_map();
        let first_key = doc.node(doc.children(doc.root)[0]).unwrap().key;
        doc.insert_sibling_after(first_key, NEW_NODE_NAME).unwrap();
        assert_eq!(
            names(&doc, doc.root),
            vec!["Main Topic 1", "New Node", "Main Topic 2"]
        );

        let root_key = doc.root_key();
        assert!(doc.insert_sibling_after(root_key, "Nope").is_none());
    }

    #[test]
    fn test_delete_root_rejected() {
        let mut doc = Document::default_map();
        let before = doc.clone();
        let root_key = doc.root_key();
        assert_eq!(doc.delete(root_key), Err(MapError::CannotDeleteRoot));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_delete_removes_subtree() {
        let mut doc = Document::default_map();
        let first_key = doc.node(doc.children(doc.root)[0]).unwrap().key;
        let leaf = doc.add_child(first_key, "Leaf").unwrap();

        assert_eq!(doc.delete(first_key), Ok(true));
        assert!(doc.find_by_id(leaf).is_none());
        assert_eq!(names(&doc, doc.root), vec!["Main Topic 2"]);
        assert_eq!(doc.delete(first_key), Ok(false));
    }

    #[test]
    fn test_add_child_expands_parent() {
        let mut doc = Document::default_map();
        let first_key = doc.node(doc.children(doc.root)[0]).unwrap().key;
        doc.toggle_collapsed(first_key);
        assert!(doc.get(first_key).unwrap().is_collapsed);
        doc.add_child(first_key, "Leaf");
        assert!(!doc.get(first_key).unwrap().is_collapsed);
    }

    #[test]
    fn test_card_content_blank_clears() {
        let mut doc = Document::default_map();
        let key = doc.root_key();
        doc.set_card_content(key, Some("Notes".to_string()));
        assert!(doc.get(key).unwrap().has_card());
        doc.set_card_content(key, Some("   ".to_string()));
        assert_eq!(doc.get(key).unwrap().card_content, None);
    }

    #[test]
    fn test_structural_equality_ignores_arena_slots() {
        let doc = Document::default_map();
        let mut other = doc.clone();
        let key = other.node(other.children(other.root)[0]).unwrap().key;
        let tmp = other.add_child(key, "Temp").unwrap();
        other.delete(tmp).unwrap();
        assert_eq!(doc, other);

        other.rename(key, "Changed");
        assert_ne!(doc, other);
    }
}
