//! AI-assisted sub-topic expansion.
//!
//! The suggester runs on a worker thread so the event loop never blocks on
//! it. At most one request is in flight; its result is polled from the loop
//! and applied by looking the target node up again by id.

use crate::errors::SuggestError;
use crate::model::NodeKey;
use crate::store::DocumentStore;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

pub type SuggestResult = Result<Vec<String>, SuggestError>;

/// Source of child-topic names for a node.
pub trait TopicSuggester: Send + Sync {
    /// `path` runs from the root name down to the node being expanded.
    fn suggest(&self, path: &[String], card_content: Option<&str>) -> SuggestResult;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    pub node: NodeKey,
    pub path: Vec<String>,
    pub card_content: Option<String>,
}

impl ExpansionRequest {
    /// Builds a request from the active map; `None` if the node is gone.
    pub fn for_node(store: &DocumentStore, node: NodeKey) -> Option<Self> {
        let doc = store.active();
        let card_content = doc.get(node)?.card_content.clone();
        Some(Self {
            node,
            path: doc.compute_path(node),
            card_content,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CommandPayload<'a> {
    path: &'a [String],
    card_content: Option<&'a str>,
}

/// Runs a shell command per request. The command receives
/// `{"path": [...], "cardContent": ...}` on stdin and prints one topic per line.
#[derive(Debug, Clone)]
pub struct CommandSuggester {
    command: String,
}

impl CommandSuggester {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl TopicSuggester for CommandSuggester {
    fn suggest(&self, path: &[String], card_content: Option<&str>) -> SuggestResult {
        let payload = serde_json::to_string(&CommandPayload { path, card_content })
            .map_err(|e| SuggestError::Failed(e.to_string()))?;

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SuggestError::Spawn(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Commands that ignore their input may exit before we finish writing
            match stdin.write_all(payload.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(SuggestError::Failed(e.to_string()));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SuggestError::Failed(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().next().unwrap_or("").trim().to_string();
            return Err(SuggestError::Failed(if detail.is_empty() {
                format!("command exited with {}", output.status)
            } else {
                detail
            }));
        }

        let topics = parse_topics(&String::from_utf8_lossy(&output.stdout));
        if topics.is_empty() {
            return Err(SuggestError::Empty);
        }
        Ok(topics)
    }
}

/// One topic per non-blank line; list markers such as `-`, `*` or `3.` are dropped.
pub fn parse_topics(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.trim_start_matches(['-', '*', '•']).trim_start();
            let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            let line = match line[digits..].strip_prefix(['.', ')']) {
                Some(rest) if digits > 0 => rest,
                _ => line,
            };
            line.trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// A request running on a worker thread.
pub struct ExpansionTask {
    request: ExpansionRequest,
    receiver: Receiver<SuggestResult>,
}

impl ExpansionTask {
    pub fn spawn(suggester: Arc<dyn TopicSuggester>, request: ExpansionRequest) -> Self {
        let (sender, receiver) = mpsc::channel();
        let path = request.path.clone();
        let card = request.card_content.clone();
        thread::spawn(move || {
            let result = suggester.suggest(&path, card.as_deref());
            // The receiver is gone if the app quit meanwhile
            let _ = sender.send(result);
        });
        info!(node = %request.node, path = ?request.path, "expansion started");
        Self { request, receiver }
    }

    pub fn request(&self) -> &ExpansionRequest {
        &self.request
    }

    /// `None` while the worker is still running.
    pub fn poll(&self) -> Option<SuggestResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(SuggestError::Failed("suggestion worker stopped".to_string())))
            }
        }
    }

    /// Blocks until the worker answers. Used by tests and non-interactive runs.
    pub fn wait(self) -> (ExpansionRequest, SuggestResult) {
        let result = self
            .receiver
            .recv()
            .unwrap_or_else(|_| Err(SuggestError::Failed("suggestion worker stopped".to_string())));
        (self.request, result)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionOutcome {
    Added(Vec<NodeKey>),
    /// The node was deleted while the request was running.
    NodeGone,
    Failed(SuggestError),
}

/// Applies a finished expansion. The target is searched for by id in every
/// map, and all names are inserted as one undoable step.
pub fn complete_expansion(
    store: &mut DocumentStore,
    request: &ExpansionRequest,
    result: SuggestResult,
) -> ExpansionOutcome {
    let names = match result {
        Ok(names) if names.is_empty() => {
            warn!(node = %request.node, "expansion returned no topics");
            return ExpansionOutcome::Failed(SuggestError::Empty);
        }
        Ok(names) => names,
        Err(e) => {
            warn!(node = %request.node, error = %e, "expansion failed");
            return ExpansionOutcome::Failed(e);
        }
    };

    let Some(map) = store
        .maps()
        .iter()
        .position(|doc| doc.find_by_id(request.node).is_some())
    else {
        info!(node = %request.node, "expansion target vanished, dropping result");
        return ExpansionOutcome::NodeGone;
    };

    match store.add_children(map, request.node, &names) {
        Some(keys) => {
            info!(node = %request.node, added = keys.len(), "expansion applied");
            ExpansionOutcome::Added(keys)
        }
        None => ExpansionOutcome::NodeGone,
    }
}
