use std::time::Duration;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::network_map::types::{
	GraphLink, GraphNode, LinkType, NetworkGraph, NodeRole, Relationship,
};
use crate::components::network_map::{MapConfig, NetworkMap, SnapshotError};

/// `<script type="application/json">` holding the bridge's network-map reply.
const GRAPH_ELEMENT: &str = "network-graph";
const CONFIG_ELEMENT: &str = "map-config";

fn script_text(id: &'static str) -> Result<String, SnapshotError> {
	let element = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(id))
		.ok_or(SnapshotError::MissingElement(id))?;
	let script: HtmlScriptElement = element
		.dyn_into()
		.map_err(|_| SnapshotError::Unreadable(id))?;
	script.text().map_err(|_| SnapshotError::Unreadable(id))
}

fn load_snapshot() -> Result<NetworkGraph, SnapshotError> {
	NetworkGraph::from_json(&script_text(GRAPH_ELEMENT)?)
}

fn load_config() -> MapConfig {
	match script_text(CONFIG_ELEMENT).and_then(|json| MapConfig::from_json(&json)) {
		Ok(config) => config,
		Err(SnapshotError::MissingElement(_)) => MapConfig::default(),
		Err(e) => {
			warn!("ignoring map config: {}", e);
			MapConfig::default()
		}
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn device(addr: String, name: String, role: NodeRole) -> GraphNode {
	GraphNode {
		ieee_addr: addr,
		friendly_name: Some(name),
		role,
	}
}

fn edge(src: &str, dst: &str, link_type: LinkType, rel: Relationship, lqi: u32) -> GraphLink {
	GraphLink {
		source_ieee_addr: src.into(),
		target_ieee_addr: dst.into(),
		link_type,
		relationship: rel,
		relationships: vec![rel],
		linkquality: Some(lqi),
	}
}

/// Random tree of routers under a coordinator with end devices hanging off
/// the routers, used when the page carries no snapshot.
fn sample_mesh(routers: usize, end_devices: usize) -> NetworkGraph {
	let coordinator = "0x0000".to_string();
	let mut nodes = vec![device(coordinator.clone(), "Coordinator".into(), NodeRole::Coordinator)];
	let mut links = Vec::new();
	let router_addr = |i: usize| format!("0x1{:03x}", i);

	for i in 0..routers {
		let addr = router_addr(i);
		nodes.push(device(addr.clone(), format!("Router {}", i), NodeRole::Router));
		let lqi = 60 + (rand_simple(i) * 195.0) as u32;
		let parent = (rand_simple(i + 7) * i as f64) as usize;
		if i == 0 || (parent == 0 && rand_simple(i + 3) < 0.5) {
			links.push(edge(&addr, &coordinator, LinkType::Coordinator2Router, Relationship::Parent, lqi));
			links.push(edge(&coordinator, &addr, LinkType::Coordinator2Router, Relationship::Child, lqi));
		} else {
			let parent = router_addr(parent);
			links.push(edge(&addr, &parent, LinkType::Router2Router, Relationship::Parent, lqi));
			links.push(edge(&parent, &addr, LinkType::Router2Router, Relationship::Child, lqi));
		}
	}

	for i in 0..end_devices {
		let addr = format!("0x2{:03x}", i);
		nodes.push(device(addr.clone(), format!("Sensor {}", i), NodeRole::EndDevice));
		let parent = router_addr((rand_simple(i + 11) * routers as f64) as usize);
		let lqi = 20 + (rand_simple(i + 5) * 200.0) as u32;
		links.push(edge(&addr, &parent, LinkType::EndDevice2Router, Relationship::Parent, lqi));
	}

	if routers > 2 {
		links.push(edge(&router_addr(1), &router_addr(routers - 1), LinkType::BrokenLink, Relationship::Parent, 0));
	}

	NetworkGraph { nodes, links }
}

/// Network map page. Stands in for the bridge: a scan request shows the
/// spinner, then delivers the snapshot embedded in the page.
#[component]
pub fn MapPage() -> impl IntoView {
	let graph = RwSignal::new(NetworkGraph::default());
	let is_loading = RwSignal::new(false);
	let config = load_config();

	let on_request = Callback::new(move |()| {
		is_loading.set(true);
		set_timeout(
			move || {
				let snapshot = load_snapshot().unwrap_or_else(|e| {
					warn!("no bridge snapshot ({}), showing a sample mesh", e);
					sample_mesh(12, 30)
				});
				info!("network scan finished: {} devices", snapshot.nodes.len());
				graph.set(snapshot);
				is_loading.set(false);
			},
			Duration::from_millis(600),
		);
	});

	view! {
		<div class="fullscreen-graph">
			<NetworkMap graph=graph is_loading=is_loading on_request=on_request config=config />
		</div>
	}
}
