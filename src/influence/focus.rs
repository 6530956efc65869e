use std::collections::{BTreeMap, HashMap};

use super::model::{Link, Node};

/// Outgoing influence of the focused node toward one target.
#[derive(Clone, Debug, PartialEq)]
pub struct InfluenceEntry {
	/// The focused node.
	pub source: String,
	/// The influenced node.
	pub target: String,
	/// Influence value per category between the pair.
	pub category_values: BTreeMap<String, f64>,
	/// Observation dates of the last merged edge that carried any.
	pub date: Option<Vec<String>>,
}

/// Group the focused node's visible outgoing edges by target.
///
/// Targets are sorted lexicographically. A repeated `(source, target,
/// category)` keeps the value of its last occurrence.
pub fn focused_influence_list(focused_id: &str, visible_edges: &[Link]) -> Vec<InfluenceEntry> {
	let mut groups: BTreeMap<&str, InfluenceEntry> = BTreeMap::new();
	for link in visible_edges.iter().filter(|l| l.source == focused_id) {
		let entry = groups
			.entry(link.target.as_str())
			.or_insert_with(|| InfluenceEntry {
				source: link.source.clone(),
				target: link.target.clone(),
				category_values: BTreeMap::new(),
				date: None,
			});
		entry
			.category_values
			.insert(link.category.clone(), link.influence_value);
		if link.date.is_some() {
			entry.date = link.date.clone();
		}
	}
	groups.into_values().collect()
}

/// Node lookup over the current node set.
#[derive(Clone, Debug, Default)]
pub struct NodeIndex {
	positions: HashMap<String, usize>,
}

impl NodeIndex {
	/// Index `nodes` by id.
	pub fn build(nodes: &[Node]) -> Self {
		Self {
			positions: nodes
				.iter()
				.enumerate()
				.map(|(i, n)| (n.id.clone(), i))
				.collect(),
		}
	}

	/// The node with `id`, if `nodes` is the slice this index was built from.
	pub fn get<'a>(&self, nodes: &'a [Node], id: &str) -> Option<&'a Node> {
		self.positions.get(id).and_then(|&i| nodes.get(i))
	}

	/// Whether `id` is part of the node set.
	pub fn contains(&self, id: &str) -> bool {
		self.positions.contains_key(id)
	}

	/// Resolve both endpoints of an entry so the caller can refocus on them.
	pub fn resolve_endpoints<'a>(
		&self,
		nodes: &'a [Node],
		entry: &InfluenceEntry,
	) -> Option<(&'a Node, &'a Node)> {
		Some((
			self.get(nodes, &entry.source)?,
			self.get(nodes, &entry.target)?,
		))
	}
}

/// Which node, if any, the side panel is showing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusState {
	focused: Option<String>,
}

impl FocusState {
	/// Focus `id`; unknown ids clear the focus instead.
	pub fn focus(&mut self, id: &str, index: &NodeIndex) {
		self.focused = index.contains(id).then(|| id.to_string());
	}

	/// Drop the focus.
	pub fn clear(&mut self) {
		self.focused = None;
	}

	/// Clear the focus if its node left the node set.
	pub fn reconcile(&mut self, index: &NodeIndex) {
		if self.focused.as_deref().is_some_and(|id| !index.contains(id)) {
			self.focused = None;
		}
	}

	/// Currently focused id.
	pub fn id(&self) -> Option<&str> {
		self.focused.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::influence::model::initialize_nodes;

	#[test]
	fn merges_categories_per_target() {
		let edges = vec![
			Link::new("A", "B", "X", 0.5),
			Link::new("A", "B", "Y", 0.3),
		];
		let list = focused_influence_list("A", &edges);
		assert_eq!(list.len(), 1);
		assert_eq!(list[0].target, "B");
		assert_eq!(
			list[0].category_values,
			BTreeMap::from([("X".to_string(), 0.5), ("Y".to_string(), 0.3)])
		);
	}

	#[test]
	fn sorted_by_target_and_filtered_by_source() {
		let edges = vec![
			Link::new("A", "d", "X", 0.1),
			Link::new("B", "a", "X", 0.2),
			Link::new("A", "b", "X", 0.3),
			Link::new("A", "c", "Y", 0.4),
		];
		let targets: Vec<_> = focused_influence_list("A", &edges)
			.into_iter()
			.map(|e| e.target)
			.collect();
		assert_eq!(targets, ["b", "c", "d"]);
		assert!(focused_influence_list("zzz", &edges).is_empty());
	}

	#[test]
	fn duplicate_category_keeps_last_value() {
		let mut dated = Link::new("A", "B", "X", 0.9);
		dated.date = Some(vec!["2024-05-01".into()]);
		let edges = vec![Link::new("A", "B", "X", 0.1), dated];
		let list = focused_influence_list("A", &edges);
		assert_eq!(list[0].category_values["X"], 0.9);
		assert_eq!(list[0].date.as_deref().map(<[String]>::len), Some(1));
	}

	#[test]
	fn focus_clears_when_node_disappears() {
		let nodes = initialize_nodes(["a", "b"]);
		let index = NodeIndex::build(&nodes);
		let mut focus = FocusState::default();
		focus.focus("a", &index);
		assert_eq!(focus.id(), Some("a"));

		focus.reconcile(&NodeIndex::build(&initialize_nodes(["b"])));
		assert_eq!(focus.id(), None);

		focus.focus("ghost", &index);
		assert_eq!(focus.id(), None);
	}

	#[test]
	fn resolves_entry_endpoints() {
		let nodes = initialize_nodes(["a", "b"]);
		let index = NodeIndex::build(&nodes);
		let entry = focused_influence_list("a", &[Link::new("a", "b", "X", 1.0)]).remove(0);
		let (s, t) = index.resolve_endpoints(&nodes, &entry).unwrap();
		assert_eq!((s.id.as_str(), t.id.as_str()), ("a", "b"));

		let orphan = focused_influence_list("a", &[Link::new("a", "zz", "X", 1.0)]).remove(0);
		assert!(index.resolve_endpoints(&nodes, &orphan).is_none());
	}
}
