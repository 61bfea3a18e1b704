//! Server state and configuration.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::{FixedLayoutAnalyzer, LayoutAnalyzer};
use crate::handoff::HandoffSlot;
use crate::library::TemplateLibrary;
use crate::template::TemplateDocument;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Base URL share links are built from (e.g., "https://lab.example.com")
    pub public_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub library: RwLock<TemplateLibrary>,
    /// Document waiting for the editor to pick it up.
    pub handoff: HandoffSlot<TemplateDocument>,
    pub analyzer: Arc<dyn LayoutAnalyzer>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_parts(config, TemplateLibrary::with_builtins(), Arc::new(FixedLayoutAnalyzer))
    }

    pub fn with_parts(config: ServerConfig, library: TemplateLibrary, analyzer: Arc<dyn LayoutAnalyzer>) -> Self {
        Self {
            config,
            library: RwLock::new(library),
            handoff: HandoffSlot::new(),
            analyzer,
        }
    }
}
