//! Owns the live graph instance of one container and drives its lifecycle.
//!
//! All mutable state sits in a single [`GraphSession`]. Borrows of it never
//! span an `.await`: async operations take a [`RefreshTicket`] before
//! suspending and re-check it afterwards, so a refresh that finishes after
//! the container detached (or after a newer refresh started) is dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use futures::future::{FutureExt, LocalBoxFuture};
use log::{debug, error, info};

use super::GraphError;
use super::adapter::{StylePatch, adapter_for, patch_style};
use super::container::Container;
use super::draw;
use super::engine::ClickHandler;
use super::highlight::{highlight_neighborhood, reset_highlight};
use super::instance::{GraphInstance, Teardown};
use super::types::{GraphConfig, GraphData, LayoutName, RenderStyle, RendererKind};
use crate::api::GraphSource;
use crate::content::BodyRenderer;
use crate::state::NodeDetail;
use crate::style::{CssVars, Palette, Theme};

/// Lifecycle of the managed container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	/// Created, not yet attached.
	#[default]
	Uninitialized,
	/// A graph fetch is in flight.
	Rendering,
	/// Rendered and waiting for input.
	Idle,
	/// Detached; the container is empty.
	Destroyed,
}

/// How a configuration change was carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigChange {
	/// Applied to the live instance in place.
	Patched,
	/// Graph data was re-fetched and re-rendered.
	Refreshed,
	/// Stored only; nothing is attached yet.
	Deferred,
}

/// The manager's exclusively owned state.
#[derive(Default)]
pub struct GraphSession {
	config: GraphConfig,
	theme: Theme,
	phase: Phase,
	container: Option<Box<dyn Container>>,
	instance: Option<GraphInstance>,
	/// Bumped on every detach.
	generation: u64,
	/// Bumped on every refresh start.
	refresh_seq: u64,
}

#[derive(Clone, Copy, Debug)]
struct RefreshTicket {
	generation: u64,
	seq: u64,
}

impl RefreshTicket {
	fn is_current(&self, session: &GraphSession) -> bool {
		session.generation == self.generation && session.refresh_seq == self.seq && session.container.is_some()
	}
}

type DetailSink = Rc<dyn Fn(NodeDetail)>;

struct Inner<S> {
	source: S,
	body: Box<dyn BodyRenderer>,
	css: Box<dyn CssVars>,
	session: RefCell<GraphSession>,
	on_select: RefCell<Option<DetailSink>>,
	on_click: RefCell<Option<ClickHandler>>,
}

/// Handle to the graph manager; clones share the same session.
pub struct GraphManager<S> {
	inner: Rc<Inner<S>>,
}

impl<S> Clone for GraphManager<S> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<S: GraphSource + 'static> GraphManager<S> {
	/// Manager reading from `source` with the given starting view.
	pub fn new(
		source: S,
		body: impl BodyRenderer + 'static,
		css: impl CssVars + 'static,
		config: GraphConfig,
		theme: Theme,
	) -> Self {
		Self {
			inner: Rc::new(Inner {
				source,
				body: Box::new(body),
				css: Box::new(css),
				session: RefCell::new(GraphSession {
					config,
					theme,
					..GraphSession::default()
				}),
				on_select: RefCell::new(None),
				on_click: RefCell::new(None),
			}),
		}
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.inner.session.borrow().phase
	}

	/// The active view configuration.
	pub fn config(&self) -> GraphConfig {
		self.inner.session.borrow().config.clone()
	}

	/// The active theme.
	pub fn theme(&self) -> Theme {
		self.inner.session.borrow().theme
	}

	/// Read-only access to the live instance.
	pub fn with_instance<R>(&self, f: impl FnOnce(&GraphInstance) -> R) -> Option<R> {
		self.inner.session.borrow().instance.as_ref().map(f)
	}

	/// Called with every node opened through [`open_node`](Self::open_node).
	pub fn on_select(&self, sink: impl Fn(NodeDetail) + 'static) {
		*self.inner.on_select.borrow_mut() = Some(Rc::new(sink));
	}

	/// Called with the id of every clicked node.
	pub fn on_node_click(&self, handler: impl Fn(&str) + 'static) {
		*self.inner.on_click.borrow_mut() = Some(Rc::new(handler));
	}

	/// Open clicked nodes, running each open on `spawn`.
	pub fn open_on_click(&self, spawn: impl Fn(LocalBoxFuture<'static, ()>) + 'static) {
		let weak = Rc::downgrade(&self.inner);
		self.on_node_click(move |id: &str| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			let manager = GraphManager { inner };
			let id = id.to_string();
			spawn(
				async move {
					if let Err(e) = manager.open_node(&id).await {
						error!("cannot open node {}: {}", id, e);
					}
				}
				.boxed_local(),
			);
		});
	}

	/// Handler bound to every instance; forwards to the current click sink.
	fn click_dispatcher(&self) -> ClickHandler {
		let weak: Weak<Inner<S>> = Rc::downgrade(&self.inner);
		Rc::new(move |id: &str| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			let handler = inner.on_click.borrow().clone();
			match handler {
				Some(handler) => handler(id),
				None => debug!("node {} clicked with no handler", id),
			}
		})
	}

	/// Take ownership of `container` and render into it.
	pub async fn attach(&self, container: Box<dyn Container>) -> Result<(), GraphError> {
		{
			let mut session = self.inner.session.borrow_mut();
			if session.container.is_some() {
				drop(session);
				self.detach();
				session = self.inner.session.borrow_mut();
			}
			session.container = Some(container);
		}
		self.refresh().await
	}

	/// Tear down the instance and empty the container.
	///
	/// Returns which teardown path ran, if there was an instance.
	pub fn detach(&self) -> Option<Teardown> {
		let mut session = self.inner.session.borrow_mut();
		let teardown = session.instance.take().map(|mut instance| instance.teardown());
		if let Some(container) = session.container.as_mut() {
			container.clear_children();
		}
		session.container = None;
		session.phase = Phase::Destroyed;
		session.generation += 1;
		debug!("graph detached, teardown {:?}", teardown);
		teardown
	}

	/// Fetch the graph and render it with the current configuration.
	///
	/// On failure the previous instance stays on screen.
	pub async fn refresh(&self) -> Result<(), GraphError> {
		let ticket = {
			let mut session = self.inner.session.borrow_mut();
			if session.container.is_none() {
				return Err(GraphError::NotAttached);
			}
			session.refresh_seq += 1;
			session.phase = Phase::Rendering;
			RefreshTicket {
				generation: session.generation,
				seq: session.refresh_seq,
			}
		};

		let fetched = self.inner.source.fetch_graph().await;

		let mut session = self.inner.session.borrow_mut();
		if !ticket.is_current(&session) {
			debug!("discarding stale graph refresh");
			return Ok(());
		}
		let response = match fetched {
			Ok(response) => response,
			Err(e) => {
				error!("graph fetch failed: {}", e);
				session.phase = Phase::Idle;
				return Err(e.into());
			}
		};

		let palette = Palette::resolve(session.theme, &*self.inner.css);
		let data = GraphData::from_response(&response, &palette);
		let style = RenderStyle::new(&session.config, session.theme, palette);
		let session = &mut *session;
		let Some(container) = session.container.as_deref_mut() else {
			return Err(GraphError::NotAttached);
		};
		let existing = session.instance.take();
		let adapter = adapter_for(session.config.renderer);
		match adapter.render(&data, session.config.layout, container, existing, &style) {
			Ok(mut instance) => {
				instance.bind_node_click(self.click_dispatcher());
				session.instance = Some(instance);
				session.phase = Phase::Idle;
				debug!(
					"rendered {} nodes, {} links with {}",
					data.nodes.len(),
					data.links.len(),
					adapter.kind()
				);
				Ok(())
			}
			Err(e) => {
				error!("{} render failed: {}", adapter.kind(), e);
				session.phase = Phase::Idle;
				Err(e)
			}
		}
	}

	/// Store a config change; refresh unless the live instance can patch it.
	async fn update(&self, patch: Option<StylePatch>, apply: impl FnOnce(&mut GraphSession)) -> Result<ConfigChange, GraphError> {
		{
			let mut session = self.inner.session.borrow_mut();
			apply(&mut *session);
			if session.container.is_none() {
				return Ok(ConfigChange::Deferred);
			}
			let renderer = session.config.renderer;
			// a handle left over from a failed renderer swap is never patched
			let live = session.instance.as_mut().filter(|i| i.kind() == renderer);
			if let (Some(patch), Some(instance)) = (patch, live) {
				if patch_style(instance, patch) {
					debug!("patched {:?} in place", patch);
					return Ok(ConfigChange::Patched);
				}
			}
		}
		self.refresh().await?;
		Ok(ConfigChange::Refreshed)
	}

	/// Switch renderer family. The old instance stays on screen until the
	/// graph has been fetched, then the adapter replaces it.
	pub async fn set_renderer(&self, renderer: RendererKind) -> Result<ConfigChange, GraphError> {
		{
			let session = self.inner.session.borrow();
			if session.config.renderer != renderer {
				info!("switching renderer {} -> {}", session.config.renderer, renderer);
			}
		}
		self.update(None, |s| s.config.renderer = renderer).await
	}

	/// Change the constraint-layout layout; always re-renders.
	pub async fn set_layout(&self, layout: LayoutName) -> Result<ConfigChange, GraphError> {
		self.update(None, |s| s.config.layout = layout).await
	}

	/// Nodes are patched in place where the engine allows it.
	pub async fn set_node_size(&self, size: f64) -> Result<ConfigChange, GraphError> {
		self.update(Some(StylePatch::NodeSize(size)), |s| s.config.node_size = size)
			.await
	}

	/// Labels are patched in place where the engine allows it.
	pub async fn set_label_scale(&self, scale: f64) -> Result<ConfigChange, GraphError> {
		self.update(Some(StylePatch::LabelScale(scale)), |s| s.config.label_scale = scale)
			.await
	}

	/// Toggle labels; always re-renders.
	pub async fn set_show_labels(&self, show: bool) -> Result<ConfigChange, GraphError> {
		self.update(None, |s| s.config.show_labels = show).await
	}

	/// Re-render with the palette of `theme`.
	pub async fn set_theme(&self, theme: Theme) -> Result<ConfigChange, GraphError> {
		self.update(None, |s| s.theme = theme).await
	}

	/// Bring the view in line with `config` and `theme`, doing the least work:
	/// nothing when unchanged, in-place patches when the instance supports
	/// every changed property, otherwise a single refresh.
	pub async fn apply_preferences(&self, config: GraphConfig, theme: Theme) -> Result<Option<ConfigChange>, GraphError> {
		let patches = {
			let mut session = self.inner.session.borrow_mut();
			let old = session.config.clone();
			if old == config && session.theme == theme {
				return Ok(None);
			}
			if old.renderer != config.renderer {
				info!("switching renderer {} -> {}", old.renderer, config.renderer);
			}
			let style_only = old.renderer == config.renderer
				&& old.layout == config.layout
				&& old.show_labels == config.show_labels
				&& session.theme == theme;
			session.config = config.clone();
			session.theme = theme;
			if session.container.is_none() {
				return Ok(Some(ConfigChange::Deferred));
			}
			let mut patches = Vec::new();
			if old.node_size != config.node_size {
				patches.push(StylePatch::NodeSize(config.node_size));
			}
			if old.label_scale != config.label_scale {
				patches.push(StylePatch::LabelScale(config.label_scale));
			}
			let patchable = session
				.instance
				.as_ref()
				.is_some_and(|i| i.kind() == config.renderer && i.supports_style_patch());
			if style_only && patchable {
				if let Some(instance) = session.instance.as_mut() {
					for patch in &patches {
						patch_style(instance, *patch);
					}
				}
				return Ok(Some(ConfigChange::Patched));
			}
			patches
		};
		debug!("preferences changed; refreshing ({} style changes)", patches.len());
		self.refresh().await?;
		Ok(Some(ConfigChange::Refreshed))
	}

	/// Fetch a node, render its body with the theme current when the fetch
	/// completes, publish it, then highlight its neighbourhood.
	pub async fn open_node(&self, id: &str) -> Result<NodeDetail, GraphError> {
		let node = self.inner.source.fetch_node(id).await?;
		let theme = self.inner.session.borrow().theme;
		let detail = NodeDetail {
			body: self.inner.body.render_body(theme, &node),
			id: node.id,
			title: node.title,
			raw: node.raw,
			backlinks: node.backlinks,
		};
		let sink = self.inner.on_select.borrow().clone();
		if let Some(sink) = sink {
			sink(detail.clone());
		}
		self.highlight(id);
		Ok(detail)
	}

	/// Dim everything outside the neighbourhood of `id`.
	pub fn highlight(&self, id: &str) {
		if let Some(instance) = self.inner.session.borrow_mut().instance.as_mut() {
			highlight_neighborhood(instance, id);
		}
	}

	/// Restore full opacity.
	pub fn clear_highlight(&self) {
		if let Some(instance) = self.inner.session.borrow_mut().instance.as_mut() {
			reset_highlight(instance);
		}
	}

	/// Advance the simulation by `dt` seconds and paint the frame.
	pub fn frame(&self, dt: f32) {
		let mut session = self.inner.session.borrow_mut();
		let session = &mut *session;
		let (Some(instance), Some(container)) = (session.instance.as_mut(), session.container.as_ref()) else {
			return;
		};
		instance.tick(dt);
		if let Some(ctx) = container.context() {
			draw::draw(instance, &ctx);
		}
	}

	/// Follow a change in the container's size.
	pub fn resize(&self) {
		let mut session = self.inner.session.borrow_mut();
		let session = &mut *session;
		let Some(container) = session.container.as_mut() else {
			return;
		};
		let (width, height) = container.sync_size();
		if let Some(instance) = session.instance.as_mut() {
			instance.resize(width, height);
		}
	}

	/// Press at screen point `(x, y)`.
	pub fn pointer_down(&self, x: f64, y: f64) {
		if let Some(instance) = self.inner.session.borrow_mut().instance.as_mut() {
			instance.pointer_down(x, y);
		}
	}

	/// Pointer moved to `(x, y)`.
	pub fn pointer_move(&self, x: f64, y: f64) {
		if let Some(instance) = self.inner.session.borrow_mut().instance.as_mut() {
			instance.pointer_move(x, y);
		}
	}

	/// End a gesture; a click on a node is delivered after the session is
	/// released so handlers may call back into the manager.
	pub fn pointer_up(&self, x: f64, y: f64) {
		let click = self
			.inner
			.session
			.borrow_mut()
			.instance
			.as_mut()
			.and_then(|instance| instance.pointer_up(x, y));
		if let Some(click) = click {
			click.fire();
		}
	}

	/// Pointer left the surface.
	pub fn pointer_leave(&self) {
		if let Some(instance) = self.inner.session.borrow_mut().instance.as_mut() {
			instance.pointer_leave();
		}
	}

	/// Zoom around the pointer.
	pub fn wheel(&self, x: f64, y: f64, delta_y: f64) {
		if let Some(instance) = self.inner.session.borrow_mut().instance.as_mut() {
			instance.wheel(x, y, delta_y);
		}
	}
}
