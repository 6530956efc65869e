use std::collections::HashMap;

use log::debug;

use super::model::{Link, Node};
use super::registry::ActiveCategories;

/// The filtered, on-screen projection of one heuristic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveView {
	/// Edges whose category is active, in full-list order.
	pub visible_edges: Vec<Link>,
	/// Same nodes as the input, out-degrees relative to `visible_edges`.
	pub nodes: Vec<Node>,
	/// Largest recomputed out-degree, at least 1.
	pub max_out_degree: usize,
	/// False when arrows should be suppressed.
	pub directed: bool,
}

/// Project `full` onto `active` and recount out-degrees.
pub fn recompute_view(full: &[Link], active: &ActiveCategories, nodes: &[Node]) -> ActiveView {
	let visible_edges: Vec<Link> = full
		.iter()
		.filter(|l| active.contains(&l.category))
		.cloned()
		.collect();

	let mut counts: HashMap<&str, usize> = HashMap::new();
	for link in &visible_edges {
		*counts.entry(link.source.as_str()).or_default() += 1;
	}

	let nodes: Vec<Node> = nodes
		.iter()
		.map(|n| Node {
			out_degree: counts.get(n.id.as_str()).copied().unwrap_or(0),
			..n.clone()
		})
		.collect();
	let max_out_degree = nodes.iter().map(|n| n.out_degree).max().unwrap_or(0).max(1);
	let directed = !active.is_undirected();

	debug!(
		"view: {}/{} edges visible across {} categories, directed={}",
		visible_edges.len(),
		full.len(),
		active.len(),
		directed
	);

	ActiveView {
		visible_edges,
		nodes,
		max_out_degree,
		directed,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::influence::ingest::{LayoutSpace, ingest};
	use crate::influence::registry::CategoryRegistry;

	fn edges() -> Vec<Link> {
		vec![
			Link::new("a", "b", "Retweets", 0.9),
			Link::new("a", "c", "Menciones", 0.2),
			Link::new("b", "c", "Retweets", 0.7),
			Link::new("c", "a", "Acuerdo/Desacuerdo", -0.3),
			Link::new("a", "c", "Acuerdo/Desacuerdo", 0.5),
		]
	}

	fn setup() -> (Vec<Link>, Vec<Node>, CategoryRegistry) {
		let edges = edges();
		let ingested = ingest(&edges, &[], &LayoutSpace::default());
		(ingested.edges, ingested.nodes, ingested.registry)
	}

	fn degree(view: &ActiveView, id: &str) -> usize {
		view.nodes.iter().find(|n| n.id == id).unwrap().out_degree
	}

	#[test]
	fn filters_by_category_preserving_order() {
		let (edges, nodes, reg) = setup();
		let reg = reg.toggle("Retweets", false).unwrap();
		let view = recompute_view(&edges, &reg.active_categories(), &nodes);
		let pairs: Vec<_> = view
			.visible_edges
			.iter()
			.map(|l| (l.source.as_str(), l.target.as_str()))
			.collect();
		assert_eq!(pairs, [("a", "c"), ("c", "a"), ("a", "c")]);
		assert_eq!(degree(&view, "a"), 2);
		assert_eq!(degree(&view, "b"), 0);
		assert_eq!(view.nodes.len(), nodes.len());
	}

	#[test]
	fn idempotent() {
		let (edges, nodes, reg) = setup();
		let active = reg.toggle("Menciones", false).unwrap().active_categories();
		let first = recompute_view(&edges, &active, &nodes);
		let second = recompute_view(&edges, &active, &nodes);
		assert_eq!(first, second);
		let third = recompute_view(&edges, &active, &first.nodes);
		assert_eq!(first, third);
	}

	#[test]
	fn out_degrees_sum_to_visible_edges() {
		let (edges, nodes, reg) = setup();
		for name in ["Retweets", "Menciones", "Acuerdo/Desacuerdo"] {
			let active = reg.toggle(name, false).unwrap().active_categories();
			let view = recompute_view(&edges, &active, &nodes);
			let total: usize = view.nodes.iter().map(|n| n.out_degree).sum();
			assert_eq!(total, view.visible_edges.len());
		}
	}

	#[test]
	fn deactivating_never_increases_out_degree() {
		let (edges, nodes, reg) = setup();
		let all = recompute_view(&edges, &reg.active_categories(), &nodes);
		for name in ["Retweets", "Menciones", "Acuerdo/Desacuerdo"] {
			let fewer = recompute_view(
				&edges,
				&reg.toggle(name, false).unwrap().active_categories(),
				&all.nodes,
			);
			for (before, after) in all.nodes.iter().zip(&fewer.nodes) {
				assert!(after.out_degree <= before.out_degree);
			}
		}
	}

	#[test]
	fn agreement_alone_is_undirected() {
		let (edges, nodes, reg) = setup();
		let only_agreement = reg
			.toggle("Retweets", false)
			.and_then(|r| r.toggle("Menciones", false))
			.unwrap();
		let view = recompute_view(&edges, &only_agreement.active_categories(), &nodes);
		assert!(!view.directed);

		let mixed = recompute_view(&edges, &reg.active_categories(), &nodes);
		assert!(mixed.directed);

		let only_mentions = reg
			.toggle("Retweets", false)
			.and_then(|r| r.toggle("Acuerdo/Desacuerdo", false))
			.unwrap();
		assert!(recompute_view(&edges, &only_mentions.active_categories(), &nodes).directed);
	}

	#[test]
	fn nothing_active_keeps_nodes_and_guard() {
		let (edges, nodes, _) = setup();
		let view = recompute_view(&edges, &ActiveCategories::default(), &nodes);
		assert!(view.visible_edges.is_empty());
		assert_eq!(view.max_out_degree, 1);
		assert_eq!(view.nodes.len(), nodes.len());
		assert!(view.directed);
	}
}
