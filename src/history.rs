use crate::model::Document;
use std::sync::Arc;

/// Every map of the session, in order. Documents are shared between
/// snapshots until a mutation touches them (`Arc::make_mut`).
pub type MapSet = Vec<Arc<Document>>;

/// Undo/redo stack over whole map-set snapshots.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<MapSet>,
    cursor: usize,
    limit: Option<usize>,
}

impl History {
    pub fn new(initial: MapSet, limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            limit,
        }
    }

    /// Rebuilds a history from stored parts; `None` when the parts are inconsistent.
    ///
    /// A history saved under a larger `limit` is cut down right away: oldest
    /// snapshots go first, then the far end of the redo tail. The snapshot at
    /// the cursor is always kept.
    pub fn from_parts(mut snapshots: Vec<MapSet>, mut cursor: usize, limit: Option<usize>) -> Option<Self> {
        if snapshots.is_empty() || cursor >= snapshots.len() {
            return None;
        }
        if snapshots.iter().any(|s| s.is_empty()) {
            return None;
        }
        if let Some(limit) = limit {
            let keep = limit + 1;
            let excess = snapshots.len().saturating_sub(keep);
            let dropped = excess.min(cursor);
            snapshots.drain(..dropped);
            cursor -= dropped;
            snapshots.truncate(keep.max(cursor + 1));
        }
        Some(Self {
            snapshots,
            cursor,
            limit,
        })
    }

    pub fn current(&self) -> &MapSet {
        &self.snapshots[self.cursor]
    }

    pub fn snapshots(&self) -> &[MapSet] {
        &self.snapshots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Applies `updater` to a copy of the current map set.
    ///
    /// Returns `false` without touching history when the result is structurally
    /// identical. With `add_to_history` the redo tail is discarded and the new
    /// state appended; otherwise the current snapshot is replaced in place.
    pub fn mutate<F>(&mut self, updater: F, add_to_history: bool) -> bool
    where
        F: FnOnce(&mut MapSet),
    {
        let mut next = self.current().clone();
        updater(&mut next);

        if sets_equal(self.current(), &next) {
            return false;
        }

        if add_to_history {
            self.snapshots.truncate(self.cursor + 1);
            self.snapshots.push(next);
            self.cursor = self.snapshots.len() - 1;

            if let Some(limit) = self.limit {
                while self.snapshots.len() > limit + 1 {
                    self.snapshots.remove(0);
                    self.cursor -= 1;
                }
            }
        } else {
            self.snapshots[self.cursor] = next;
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }
}

fn sets_equal(a: &MapSet, b: &MapSet) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .all(|(x, y)| Arc::ptr_eq(x, y) || **x == **y)
}

/// Runs `f` on map `index` of `set`, cloning that document only if it is shared.
pub fn with_map<R>(set: &mut MapSet, index: usize, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
    set.get_mut(index).map(|doc| f(Arc::make_mut(doc)))
}
