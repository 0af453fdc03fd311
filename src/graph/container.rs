//! The host element a graph instance draws into.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use super::GraphError;

/// Fallback surface size when the host has not been laid out yet.
pub const DEFAULT_SIZE: (f64, f64) = (800.0, 600.0);

/// Mount point for one graph instance.
pub trait Container {
	/// Current size in CSS pixels.
	fn size(&self) -> (f64, f64);

	/// Create the drawing surface a freshly constructed engine renders to.
	fn mount_surface(&mut self) -> Result<(), GraphError>;

	/// Remove every child element.
	fn clear_children(&mut self);

	/// Number of child elements.
	fn child_count(&self) -> usize;

	/// Bring the surface up to date with the host size and return it.
	fn sync_size(&mut self) -> (f64, f64) {
		self.size()
	}

	/// 2D context of the mounted surface, if there is one to draw on.
	fn context(&self) -> Option<CanvasRenderingContext2d> {
		None
	}
}

/// A DOM element hosting a `<canvas>` surface.
pub struct DomContainer {
	host: HtmlElement,
	canvas: Option<HtmlCanvasElement>,
	ctx: Option<CanvasRenderingContext2d>,
}

impl DomContainer {
	/// Wrap `host`; no canvas exists until the first mount.
	pub fn new(host: HtmlElement) -> Self {
		Self {
			host,
			canvas: None,
			ctx: None,
		}
	}

	/// The mounted canvas, if any.
	pub fn canvas(&self) -> Option<&HtmlCanvasElement> {
		self.canvas.as_ref()
	}
}

impl Container for DomContainer {
	fn size(&self) -> (f64, f64) {
		let (w, h) = (self.host.client_width(), self.host.client_height());
		if w <= 0 || h <= 0 {
			DEFAULT_SIZE
		} else {
			(w as f64, h as f64)
		}
	}

	fn mount_surface(&mut self) -> Result<(), GraphError> {
		let surface = |what: &str| GraphError::Surface(what.to_string());
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| surface("no document"))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(|_| surface("cannot create canvas"))?
			.dyn_into()
			.map_err(|_| surface("canvas element has the wrong type"))?;
		canvas.set_class_name("graph-canvas");
		self.host
			.append_child(&canvas)
			.map_err(|_| surface("cannot attach canvas"))?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.ok_or_else(|| surface("2d context unavailable"))?
			.dyn_into()
			.map_err(|_| surface("2d context has the wrong type"))?;
		self.canvas = Some(canvas);
		self.ctx = Some(ctx);
		self.sync_size();
		Ok(())
	}

	fn clear_children(&mut self) {
		self.host.set_inner_html("");
		self.canvas = None;
		self.ctx = None;
	}

	fn child_count(&self) -> usize {
		self.host.child_element_count() as usize
	}

	/// Match the canvas backing store to the host size.
	fn sync_size(&mut self) -> (f64, f64) {
		let (w, h) = self.size();
		if let Some(canvas) = &self.canvas {
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
		}
		(w, h)
	}

	fn context(&self) -> Option<CanvasRenderingContext2d> {
		self.ctx.clone()
	}
}
