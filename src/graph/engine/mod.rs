//! The three visualization engines behind the renderer adapters.

mod elements;
mod force2d;
mod force3d;
mod force_data;
pub mod layout;

use std::rc::Rc;

pub use elements::{EdgeElement, ElementGraph, ElementStyle, Neighborhood, NodeElement, BASE_FONT_SIZE};
pub use force2d::ForceGraph2D;
pub use force3d::{ForceGraph3D, Projected};
pub use force_data::{ColorAccessor, ForceCore, ForceStyle};

/// Callback receiving the id of a clicked node.
pub type ClickHandler = Rc<dyn Fn(&str)>;
