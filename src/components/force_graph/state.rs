use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, GraphLink};

pub const NODE_RADIUS: f64 = 5.0;
pub const HIT_RADIUS: f64 = 12.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub radius: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Canvas state of the influence graph. Rebuilt whenever the visible
/// graph changes; node positions are carried over by id.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub focus: Option<DefaultNodeIdx>,
	pub focus_neighbors: HashSet<DefaultNodeIdx>,
	pub pair: Option<(DefaultNodeIdx, DefaultNodeIdx)>,
	pub width: f64,
	pub height: f64,
	pub directed: bool,
	pub animation_running: bool,
	pub flow_time: f64,
	pub edges: Vec<(DefaultNodeIdx, DefaultNodeIdx, GraphLink)>,
	ids: HashMap<String, DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		params: SimulationParameters,
		carried: &HashMap<String, (f32, f32)>,
		width: f64,
		height: f64,
	) -> Self {
		let mut graph = ForceGraph::new(params);
		let mut ids = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in data.nodes.iter().enumerate() {
			let (x, y) = carried.get(&node.id).copied().unwrap_or_else(|| {
				node.position
					.map(|(x, y)| (x as f32, y as f32))
					.unwrap_or_else(|| {
						let angle = (i as f64) * 2.0 * PI / data.nodes.len().max(1) as f64;
						((100.0 * angle.cos()) as f32, (100.0 * angle.sin()) as f32)
					})
			});

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					radius: node.radius,
				},
			});
			ids.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) = (ids.get(&link.source), ids.get(&link.target)) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt, link.clone()));
			}
		}

		let mut state = Self {
			graph,
			edges,
			ids,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			focus: None,
			focus_neighbors: HashSet::new(),
			pair: None,
			width,
			height,
			directed: data.directed,
			animation_running: true,
			flow_time: 0.0,
		};
		state.set_focus(data.focused.as_deref());
		state.set_pair(data.pair.as_ref());
		state
	}

	/// Swap in a new graph, keeping the camera and where nodes have drifted to.
	/// A newly highlighted pair is brought to the middle of the canvas.
	pub fn rebuild(&mut self, data: &GraphData, params: SimulationParameters) {
		let previous = self.pair.and_then(|(s, t)| Some((self.id_of(s)?, self.id_of(t)?)));
		let mut next = Self::new(data, params, &self.positions(), self.width, self.height);
		next.transform = self.transform.clone();
		if next.pair.is_some() && data.pair != previous {
			next.center_on_pair();
		}
		*self = next;
	}

	fn set_pair(&mut self, pair: Option<&(String, String)>) {
		self.pair = pair.and_then(|(s, t)| Some((*self.ids.get(s)?, *self.ids.get(t)?)));
	}

	fn center_on_pair(&mut self) {
		let Some((src, tgt)) = self.pair else {
			return;
		};
		let (mut sum_x, mut sum_y) = (0.0, 0.0);
		self.graph.visit_nodes(|node| {
			if node.index() == src || node.index() == tgt {
				sum_x += node.x() as f64;
				sum_y += node.y() as f64;
			}
		});
		let (mx, my) = (sum_x / 2.0, sum_y / 2.0);
		self.transform.x = self.width / 2.0 - mx * self.transform.k;
		self.transform.y = self.height / 2.0 - my * self.transform.k;
	}

	pub fn positions(&self) -> HashMap<String, (f32, f32)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.data.user_data.id.clone(), (node.x(), node.y()));
		});
		out
	}

	pub fn id_of(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	fn neighbors_of(&self, idx: DefaultNodeIdx) -> HashSet<DefaultNodeIdx> {
		self.edges
			.iter()
			.filter_map(|&(src, tgt, _)| {
				if src == idx {
					Some(tgt)
				} else if tgt == idx {
					Some(src)
				} else {
					None
				}
			})
			.collect()
	}

	pub fn set_focus(&mut self, id: Option<&str>) {
		self.focus = id.and_then(|id| self.ids.get(id).copied());
		self.focus_neighbors = self
			.focus
			.map(|idx| self.neighbors_of(idx))
			.unwrap_or_default();
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let reach = HIT_RADIUS.max(node.data.user_data.radius);
			if (dx * dx + dy * dy).sqrt() < reach {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old set around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.neighbors = self.neighbors_of(idx);
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
			|| self.focus == Some(idx)
			|| self.focus_neighbors.contains(&idx)
			|| self.in_pair(idx)
	}

	fn in_pair(&self, idx: DefaultNodeIdx) -> bool {
		self.pair.is_some_and(|(s, t)| s == idx || t == idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.prev_node == Some(idx)
			|| self.focus == Some(idx)
			|| self.in_pair(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some()
			|| self.hover.prev_node.is_some()
			|| self.focus.is_some()
			|| self.pair.is_some()
	}

	/// Highlight strength; a focused node keeps its neighbourhood fully lit.
	pub fn highlight(&self) -> f64 {
		if self.focus.is_some() || self.pair.is_some() {
			1.0
		} else {
			self.hover.highlight_t
		}
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
