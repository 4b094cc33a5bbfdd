use crate::canvas::CanvasSurface;
use crate::config::AppConfig;
use crate::geometry::Point;
use crate::layout::{ApproxMeasure, Layout, TextMeasure};
use crate::model::{Document, Node, NodeKey};
use crate::store::DocumentStore;
use crate::suggest::{CommandSuggester, ExpansionTask, TopicSuggester};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    /// Inline editor placed over the node's box.
    Renaming {
        node: NodeKey,
        buffer: String,
        cursor_pos: usize,
    },
    CardEditing {
        node: NodeKey,
        buffer: String,
    },
    /// `anchor` is where the card indicator was clicked, in view coordinates.
    CardViewer {
        node: NodeKey,
        anchor: Point,
    },
    Alert {
        message: String,
    },
    Help,
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub store: DocumentStore,
    pub canvas: CanvasSurface,
    pub config: AppConfig,

    // Message for status line
    pub message: Option<String>,

    pub suggester: Option<Arc<dyn TopicSuggester>>,
    pub expansion: Option<ExpansionTask>,

    /// Whether the terminal reports key releases; otherwise they are synthesized.
    pub key_release_supported: bool,

    measure: Box<dyn TextMeasure>,
    layout: Layout,
    started: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, store: DocumentStore) -> Self {
        let suggester = config
            .suggest_command
            .clone()
            .map(|cmd| Arc::new(CommandSuggester::new(cmd)) as Arc<dyn TopicSuggester>);

        let mut app = Self {
            running: true,
            mode: AppMode::Normal,
            store,
            canvas: CanvasSurface::new(config.canvas_settings()),
            config,
            message: None,
            suggester,
            expansion: None,
            key_release_supported: false,
            measure: Box::new(ApproxMeasure),
            layout: Layout::default(),
            started: Instant::now(),
        };
        app.refresh_layout();
        let root = app.store.active().root_key();
        app.canvas.select(Some(root));
        app
    }

    pub fn with_suggester(mut self, suggester: Arc<dyn TopicSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Hands the store back for the final save on exit.
    pub fn into_store(self) -> DocumentStore {
        self.store
    }

    pub fn document(&self) -> &Document {
        self.store.active()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Split borrow for feeding input to the canvas against the current layout.
    pub fn canvas_and_layout(&mut self) -> (&mut CanvasSurface, &Layout) {
        (&mut self.canvas, &self.layout)
    }

    /// Recomputes the layout of the active map and drops a stale selection.
    pub fn refresh_layout(&mut self) {
        self.layout = Layout::compute(self.store.active(), self.measure.as_ref());
        self.canvas.prune_selection(&self.layout);
    }

    pub fn selection(&self) -> Option<NodeKey> {
        self.canvas.selection()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection().and_then(|k| self.document().get(k))
    }

    /// Milliseconds since start-up, the clock used for double-click detection.
    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn is_editing(&self) -> bool {
        matches!(
            self.mode,
            AppMode::Renaming { .. } | AppMode::CardEditing { .. }
        )
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Modal warning, dismissed with any key.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.canvas.cancel_chord();
        self.mode = AppMode::Alert {
            message: message.into(),
        };
    }
}
