//! Browser entry point: logging, then the app.

use leptos::prelude::*;
use org_graph_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
