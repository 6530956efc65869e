//! Visual encodings: out-degree to node size and color, category to hue.

use crate::influence::{Dashboard, Link};

use super::state::NODE_RADIUS;
use super::types::{GraphData, GraphLink, GraphNode};

/// Degrees between consecutive category hues.
const GOLDEN_ANGLE: f64 = 137.508;
/// Layout space units per canvas world unit.
const LAYOUT_SCALE: f64 = 0.1;

fn ratio(value: f64, max: f64) -> f64 {
	if max > 0.0 && max.is_finite() {
		(value / max).clamp(0.0, 1.0)
	} else {
		0.0
	}
}

/// Saturation grows with influence reach, lightness fades with it.
pub fn node_color(out_degree: usize, max_out_degree: usize, hue: f64) -> String {
	let saturation = (ratio(out_degree as f64, max_out_degree as f64) * 100.0).round() + 20.0;
	let lightness = 100.0 - saturation / 2.0;
	format!("hsl({hue:.0}, {saturation:.0}%, {lightness:.0}%)")
}

pub fn node_radius(out_degree: usize, max_out_degree: usize) -> f64 {
	NODE_RADIUS * (0.6 + 2.4 * ratio(out_degree as f64, max_out_degree as f64).sqrt())
}

/// Hue for the `index`-th category, spread around the wheel from `base`.
pub fn category_hue(index: usize, base: f64) -> f64 {
	(base + index as f64 * GOLDEN_ANGLE) % 360.0
}

/// Category hue when directed; red for negative and green for positive otherwise.
pub fn link_color(link: &Link, hue: f64, max_influence: f64, directed: bool) -> String {
	let hue = match (directed, link.influence_value < 0.0) {
		(true, _) => hue,
		(false, true) => 0.0,
		(false, false) => 100.0,
	};
	let saturation = (ratio(link.influence_value.abs(), max_influence) * 100.0).round();
	let lightness = 100.0 - saturation / 2.0;
	format!("hsla({hue:.0}, {saturation:.0}%, {lightness:.0}%, 0.8)")
}

pub fn link_width(link: &Link) -> f64 {
	link.influence_value.abs().clamp(0.1, 3.0)
}

/// Canvas model of the dashboard's visible graph.
pub fn graph_data(dashboard: &Dashboard, hue: f64) -> GraphData {
	let view = dashboard.view();
	let registry = dashboard.registry();
	let max_influence = view
		.visible_edges
		.iter()
		.map(|l| l.influence_value.abs())
		.fold(0.0, f64::max);

	let nodes = view
		.nodes
		.iter()
		.map(|n| GraphNode {
			id: n.id.clone(),
			label: Some(format!("@{}", n.id)),
			color: node_color(n.out_degree, view.max_out_degree, hue),
			radius: node_radius(n.out_degree, view.max_out_degree),
			position: n.position.map(|p| {
				let half = dashboard_half_space(dashboard);
				((p.x - half) * LAYOUT_SCALE, (p.y - half) * LAYOUT_SCALE)
			}),
		})
		.collect();

	let links = view
		.visible_edges
		.iter()
		.map(|l| {
			let index = registry.color_index(&l.category).unwrap_or(0);
			GraphLink {
				source: l.source.clone(),
				target: l.target.clone(),
				color: link_color(l, category_hue(index, hue), max_influence, view.directed),
				width: link_width(l),
			}
		})
		.collect();

	GraphData {
		nodes,
		links,
		directed: view.directed,
		focused: dashboard.focused_node().map(|n| n.id.clone()),
		pair: dashboard
			.focused_pair()
			.map(|(s, t)| (s.to_string(), t.to_string())),
	}
}

fn dashboard_half_space(dashboard: &Dashboard) -> f64 {
	dashboard.layout().size / 2.0
}
