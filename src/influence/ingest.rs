use std::collections::HashMap;

use log::debug;

use super::model::{Link, Node, Position};
use super::registry::CategoryRegistry;

/// Square region that fresh nodes are scattered over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpace {
	/// Side length in layout units.
	pub size: f64,
}

impl Default for LayoutSpace {
	fn default() -> Self {
		Self { size: 4096.0 }
	}
}

impl LayoutSpace {
	/// Pseudo-random but reproducible position for `id`.
	pub fn position_for(&self, id: &str) -> Position {
		let h = fnv1a(id.as_bytes());
		let (hx, hy) = ((h >> 32) as u32, h as u32);
		Position {
			x: unit(hx) * self.size,
			y: unit(hy) * self.size,
		}
	}
}

fn fnv1a(bytes: &[u8]) -> u64 {
	bytes.iter().fold(0xcbf29ce484222325, |hash, &b| {
		(hash ^ b as u64).wrapping_mul(0x100000001b3)
	})
}

fn unit(v: u32) -> f64 {
	v as f64 / (u32::MAX as f64 + 1.0)
}

/// Result of ingesting one heuristic's full edge list.
#[derive(Clone, Debug)]
pub struct Ingested {
	/// Normalized edges, arrival order.
	pub edges: Vec<Link>,
	/// Node set with recounted out-degrees and positions filled in.
	pub nodes: Vec<Node>,
	/// Out-degree per node id; every node of `nodes` has an entry.
	pub out_degree_by_node: HashMap<String, usize>,
	/// Largest out-degree, at least 1.
	pub max_out_degree: usize,
	/// Fresh registry, every category active.
	pub registry: CategoryRegistry,
}

/// Rebuild node statistics and the category registry from `edges`.
///
/// `existing` is not modified; the returned node list keeps its order and
/// appends endpoints it did not know about. Existing positions are kept.
pub fn ingest(edges: &[Link], existing: &[Node], layout: &LayoutSpace) -> Ingested {
	let mut nodes: Vec<Node> = existing.to_vec();
	let mut index: HashMap<String, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.clone(), i))
		.collect();
	let mut out_degree_by_node: HashMap<String, usize> =
		nodes.iter().map(|n| (n.id.clone(), 0)).collect();
	let mut max_out_degree = 0;

	for link in edges {
		for id in [&link.source, &link.target] {
			if !index.contains_key(id) {
				index.insert(id.clone(), nodes.len());
				nodes.push(Node::new(id.clone()));
				out_degree_by_node.insert(id.clone(), 0);
			}
		}
		let counter = out_degree_by_node.entry(link.source.clone()).or_default();
		*counter += 1;
		max_out_degree = max_out_degree.max(*counter);
	}

	for node in &mut nodes {
		node.out_degree = out_degree_by_node.get(&node.id).copied().unwrap_or(0);
		if node.position.is_none() {
			node.position = Some(layout.position_for(&node.id));
		}
	}

	let registry = CategoryRegistry::from_names(edges.iter().map(|l| l.category.as_str()));
	debug!(
		"ingested {} edges over {} nodes ({} categories, max out-degree {})",
		edges.len(),
		nodes.len(),
		registry.len(),
		max_out_degree
	);

	Ingested {
		edges: edges.to_vec(),
		nodes,
		out_degree_by_node,
		max_out_degree: max_out_degree.max(1),
		registry,
	}
}
