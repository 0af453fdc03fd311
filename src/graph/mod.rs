//! Graph core: engines, renderer adapters, highlighting and the manager that
//! owns the live instance.

pub mod adapter;
pub mod container;
/// Canvas drawing of every engine.
pub mod draw;
pub mod engine;
pub mod highlight;
pub mod instance;
pub mod manager;
/// Data and configuration types shared across the graph core.
pub mod types;
pub mod viewport;

use thiserror::Error;

use crate::api::ApiError;

pub use container::{Container, DomContainer};
pub use highlight::{highlight_neighborhood, neighbor_ids, reset_highlight};
pub use instance::{Capability, GraphInstance, NodeClick, Teardown};
pub use manager::{ConfigChange, GraphManager, Phase};
pub use types::{GraphConfig, GraphData, GraphLink, GraphNode, LayoutName, NodeRef, RenderStyle, RendererKind};

/// Failures of graph manager operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
	/// The backend request failed.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// The operation needs an attached container.
	#[error("no container is attached")]
	NotAttached,
	/// The drawing surface could not be created.
	#[error("cannot prepare drawing surface: {0}")]
	Surface(String),
}
