//! Built-in tools for the Mindloop agent.
//!
//! Tools are registered into a [`mindloop_core::ToolRegistry`] and invoked
//! by the executor when a planned task names one.

/// Web search tool over the DuckDuckGo instant-answer API.
pub mod web_search;

pub use web_search::WebSearchTool;

use mindloop_core::ToolRegistry;
use std::sync::Arc;

/// Register the standard set of built-in tools.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(Arc::new(WebSearchTool::new()));
}
