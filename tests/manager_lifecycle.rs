//! Graph manager lifecycle driven through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use org_graph_canvas::api::{
	ApiError, Backlink, EdgeRecord, GraphResponse, GraphSource, NodeResponse, NodeSummary, retain_well_formed_edges,
};
use org_graph_canvas::content::PreformattedBody;
use org_graph_canvas::graph::{
	ConfigChange, Container, GraphConfig, GraphError, GraphManager, LayoutName, Phase, RendererKind, Teardown,
};
use org_graph_canvas::style::{NoCss, Theme};

const A: &str = "2f1c5a0e-7d41-4b8e-9a53-0c6a1d9e4b21";
const B: &str = "8b3d2e7f-1a64-4c09-b2f5-6e7a9c0d1f38";
const C: &str = "c4e9f0a1-5b72-4d36-8e1a-3f2b7c6d5e94";

#[derive(Default)]
struct Backend {
	graph_fetches: Cell<usize>,
	fail_graph: Cell<bool>,
	graph_gate: RefCell<Option<oneshot::Receiver<()>>>,
	node_gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl Backend {
	fn gate_graph(&self) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		*self.graph_gate.borrow_mut() = Some(rx);
		tx
	}

	fn gate_node(&self) -> oneshot::Sender<()> {
		let (tx, rx) = oneshot::channel();
		*self.node_gate.borrow_mut() = Some(rx);
		tx
	}
}

#[derive(Clone, Default)]
struct Api(Rc<Backend>);

#[async_trait(?Send)]
impl GraphSource for Api {
	async fn fetch_graph(&self) -> Result<GraphResponse, ApiError> {
		self.0.graph_fetches.set(self.0.graph_fetches.get() + 1);
		let gate = self.0.graph_gate.borrow_mut().take();
		if let Some(gate) = gate {
			let _ = gate.await;
		}
		if self.0.fail_graph.get() {
			return Err(ApiError::Status(503));
		}
		let node = |id: &str, title: &str| NodeSummary {
			id: id.into(),
			title: title.into(),
		};
		let edge = |source: &str, dest: &str| EdgeRecord {
			source: source.into(),
			dest: dest.into(),
		};
		let mut response = GraphResponse {
			nodes: vec![node(A, "Alpha"), node(B, "Beta"), node(C, "Gamma")],
			edges: vec![edge(A, B), edge(A, "not-a-uuid")],
		};
		retain_well_formed_edges(&mut response);
		Ok(response)
	}

	async fn fetch_node(&self, id: &str) -> Result<NodeResponse, ApiError> {
		let gate = self.0.node_gate.borrow_mut().take();
		if let Some(gate) = gate {
			let _ = gate.await;
		}
		if id != A && id != B && id != C {
			return Err(ApiError::NotFound(id.to_string()));
		}
		Ok(NodeResponse {
			id: id.into(),
			title: "Alpha".into(),
			raw: "* Heading".into(),
			backlinks: vec![Backlink {
				source: B.into(),
				title: "Beta".into(),
			}],
		})
	}
}

#[derive(Clone, Default)]
struct Host(Rc<Cell<usize>>);

impl Container for Host {
	fn size(&self) -> (f64, f64) {
		(640.0, 480.0)
	}

	fn mount_surface(&mut self) -> Result<(), GraphError> {
		self.0.set(self.0.get() + 1);
		Ok(())
	}

	fn clear_children(&mut self) {
		self.0.set(0);
	}

	fn child_count(&self) -> usize {
		self.0.get()
	}
}

fn new_manager(renderer: RendererKind) -> (GraphManager<Api>, Api, Host) {
	let api = Api::default();
	let config = GraphConfig {
		renderer,
		..GraphConfig::default()
	};
	let manager = GraphManager::new(api.clone(), PreformattedBody::default(), NoCss, config, Theme::Light);
	(manager, api, Host::default())
}

fn attached(renderer: RendererKind) -> (GraphManager<Api>, Api, Host) {
	let (manager, api, host) = new_manager(renderer);
	block_on(manager.attach(Box::new(host.clone()))).unwrap();
	(manager, api, host)
}

#[test]
fn only_well_formed_edges_are_rendered() {
	let (manager, _, _) = attached(RendererKind::Force2D);
	let links = manager.with_instance(|i| i.graph_data().map(|core| core.links.len()));
	assert_eq!(links.flatten(), Some(1));
}

#[test]
fn node_size_patches_constraint_layout_without_fetching() {
	let (manager, api, _) = attached(RendererKind::ConstraintLayout);
	assert_eq!(block_on(manager.set_node_size(24.0)), Ok(ConfigChange::Patched));
	assert_eq!(api.0.graph_fetches.get(), 1);
	let width = manager.with_instance(|i| i.elements().map(|g| g.style().width));
	assert_eq!(width.flatten(), Some(24.0));
}

#[test]
fn node_size_refetches_on_force_renderers() {
	for kind in [RendererKind::Force2D, RendererKind::Force3D] {
		let (manager, api, _) = attached(kind);
		assert_eq!(block_on(manager.set_node_size(24.0)), Ok(ConfigChange::Refreshed));
		assert_eq!(api.0.graph_fetches.get(), 2, "{}", kind);
	}
}

#[test]
fn detach_always_empties_the_container() {
	let expected = [
		(RendererKind::ConstraintLayout, Teardown::Destroyed),
		(RendererKind::Force2D, Teardown::Paused),
		(RendererKind::Force3D, Teardown::Destroyed),
	];
	for (kind, path) in expected {
		let (manager, _, host) = attached(kind);
		assert_eq!(host.child_count(), 1);
		assert_eq!(manager.detach(), Some(path));
		assert_eq!(host.child_count(), 0);
		assert_eq!(manager.phase(), Phase::Destroyed);
		assert!(manager.with_instance(|_| ()).is_none());
	}
}

#[test]
fn refresh_finishing_after_detach_is_discarded() {
	let (manager, api, host) = new_manager(RendererKind::ConstraintLayout);
	let release = api.0.gate_graph();
	let outcome = Rc::new(RefCell::new(None));

	let mut pool = LocalPool::new();
	let (m, out, h) = (manager.clone(), outcome.clone(), host.clone());
	pool.spawner()
		.spawn_local(async move {
			*out.borrow_mut() = Some(m.attach(Box::new(h)).await);
		})
		.unwrap();
	pool.run_until_stalled();
	assert_eq!(manager.phase(), Phase::Rendering);

	assert_eq!(manager.detach(), None);
	release.send(()).unwrap();
	pool.run();

	assert_eq!(*outcome.borrow(), Some(Ok(())));
	assert_eq!(host.child_count(), 0);
	assert_eq!(manager.phase(), Phase::Destroyed);
	assert!(manager.with_instance(|_| ()).is_none());
}

#[test]
fn newer_refresh_wins_over_an_older_one() {
	let (manager, api, _) = attached(RendererKind::ConstraintLayout);
	let release = api.0.gate_graph();

	let mut pool = LocalPool::new();
	let older = manager.clone();
	pool.spawner()
		.spawn_local(async move {
			let _ = older.set_layout(LayoutName::Grid).await;
		})
		.unwrap();
	pool.run_until_stalled();
	block_on(manager.set_layout(LayoutName::Circle)).unwrap();
	release.send(()).unwrap();
	pool.run();

	let layout = manager.with_instance(|i| i.elements().and_then(|g| g.last_layout()));
	assert_eq!(layout.flatten(), Some(LayoutName::Circle));
	assert_eq!(manager.phase(), Phase::Idle);
}

#[test]
fn failed_refresh_keeps_the_rendered_graph() {
	let (manager, api, host) = attached(RendererKind::ConstraintLayout);
	api.0.fail_graph.set(true);
	assert_eq!(
		block_on(manager.set_layout(LayoutName::Grid)),
		Err(GraphError::Api(ApiError::Status(503)))
	);
	assert_eq!(manager.phase(), Phase::Idle);
	assert_eq!(host.child_count(), 1);
	let nodes = manager.with_instance(|i| i.elements().map(|g| g.nodes().len()));
	assert_eq!(nodes.flatten(), Some(3));
}

#[test]
fn failed_renderer_swap_leaves_the_old_graph_on_screen() {
	let (manager, api, host) = attached(RendererKind::ConstraintLayout);
	api.0.fail_graph.set(true);
	assert_eq!(
		block_on(manager.set_renderer(RendererKind::Force2D)),
		Err(GraphError::Api(ApiError::Status(503)))
	);
	assert_eq!(host.child_count(), 1);
	assert_eq!(manager.phase(), Phase::Idle);
	assert_eq!(manager.config().renderer, RendererKind::Force2D);
	assert_eq!(manager.with_instance(|i| i.kind()), Some(RendererKind::ConstraintLayout));

	let dark = GraphConfig {
		renderer: RendererKind::Force3D,
		..GraphConfig::default()
	};
	assert!(block_on(manager.apply_preferences(dark, Theme::Dark)).is_err());
	assert_eq!(host.child_count(), 1);
	assert_eq!(manager.with_instance(|i| i.kind()), Some(RendererKind::ConstraintLayout));
}

#[test]
fn renderer_swap_keeps_one_surface() {
	let (manager, _, host) = attached(RendererKind::ConstraintLayout);
	for kind in [RendererKind::Force3D, RendererKind::Force2D, RendererKind::ConstraintLayout] {
		block_on(manager.set_renderer(kind)).unwrap();
		assert_eq!(host.child_count(), 1);
		assert_eq!(manager.with_instance(|i| i.kind()), Some(kind));
	}
}

#[test]
fn fcose_layout_matches_cose() {
	let positions = |layout: LayoutName| {
		let (manager, _, _) = attached(RendererKind::ConstraintLayout);
		block_on(manager.set_layout(layout)).unwrap();
		manager
			.with_instance(|i| {
				i.elements()
					.map(|g| g.nodes().iter().map(|n| (n.x, n.y)).collect::<Vec<_>>())
			})
			.flatten()
	};
	assert_eq!(positions(LayoutName::Fcose), positions(LayoutName::Cose));
}

#[test]
fn open_node_renders_with_the_theme_current_at_completion() {
	let (manager, api, _) = attached(RendererKind::ConstraintLayout);
	let events = Rc::new(RefCell::new(Vec::new()));

	let (log, probe) = (events.clone(), manager.clone());
	manager.on_select(move |detail| {
		// selection is published before the highlight is applied
		let dimmed = probe
			.with_instance(|i| i.elements().and_then(|g| g.node(C)).map(|n| n.opacity))
			.flatten();
		log.borrow_mut().push(format!("select {} {:?}", detail.title, dimmed));
	});

	let release = api.0.gate_node();
	let mut pool = LocalPool::new();
	let (m, out) = (manager.clone(), events.clone());
	pool.spawner()
		.spawn_local(async move {
			let detail = m.open_node(A).await.unwrap();
			out.borrow_mut().push(detail.body);
		})
		.unwrap();
	pool.run_until_stalled();

	block_on(manager.set_theme(Theme::Dark)).unwrap();
	release.send(()).unwrap();
	pool.run();

	let events = events.borrow();
	assert_eq!(events[0], "select Alpha Some(1.0)");
	assert!(events[1].contains("data-theme=\"dark\""));
	let dimmed = manager.with_instance(|i| i.elements().and_then(|g| g.node(C)).map(|n| n.opacity));
	assert_eq!(dimmed.flatten(), Some(0.15));
}

#[test]
fn clicking_a_node_opens_it() {
	let (manager, _, _) = attached(RendererKind::Force2D);
	let opened = Rc::new(RefCell::new(Vec::new()));
	let sink = opened.clone();
	manager.on_select(move |detail| sink.borrow_mut().push(detail.id));

	let mut pool = LocalPool::new();
	let spawner = pool.spawner();
	manager.open_on_click(move |task| {
		let _ = spawner.spawn_local(task);
	});

	let click = manager.with_instance(|i| i.node_click(0)).flatten();
	click.expect("node 0 has a click listener").fire();
	pool.run();
	assert_eq!(*opened.borrow(), vec![A.to_string()]);
}

#[test]
fn missing_node_is_reported() {
	let (manager, _, _) = attached(RendererKind::ConstraintLayout);
	assert_eq!(
		block_on(manager.open_node("nope")),
		Err(GraphError::Api(ApiError::NotFound("nope".into())))
	);
}
