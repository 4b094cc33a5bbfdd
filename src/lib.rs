pub mod app;
pub mod canvas;
pub mod config;
pub mod errors;
pub mod export;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod model;
pub mod persist;
pub mod store;
pub mod suggest;
pub mod theme;
pub mod ui;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use model::{Document, Node, NodeKey};
pub use store::DocumentStore;
