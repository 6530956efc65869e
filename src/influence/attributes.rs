use std::collections::HashMap;

use super::model::Node;

/// Per-node scalars streamed in batches by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarAttribute {
	/// Stance score.
	Belief,
	/// Certainty of the stance score.
	Confidence,
}

impl ScalarAttribute {
	fn slot(self, node: &mut Node) -> &mut Option<f64> {
		match self {
			Self::Belief => &mut node.belief,
			Self::Confidence => &mut node.confidence,
		}
	}
}

/// Merge one batch into `nodes`. Ids not in the batch keep their value;
/// ids not in `nodes` are ignored.
pub fn merge_scalar_attribute(
	attribute: ScalarAttribute,
	values: &HashMap<String, f64>,
	nodes: &[Node],
) -> Vec<Node> {
	nodes
		.iter()
		.map(|node| {
			let mut node = node.clone();
			if let Some(&value) = values.get(&node.id) {
				*attribute.slot(&mut node) = Some(value);
			}
			node
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::influence::model::initialize_nodes;

	fn batch(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
		pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
	}

	#[test]
	fn partial_batches_accumulate() {
		let nodes = initialize_nodes(["n1", "n2", "n3"]);
		let nodes = merge_scalar_attribute(ScalarAttribute::Belief, &batch(&[("n1", 0.2)]), &nodes);
		let nodes = merge_scalar_attribute(ScalarAttribute::Belief, &batch(&[("n2", 0.4)]), &nodes);
		assert_eq!(nodes[0].belief, Some(0.2));
		assert_eq!(nodes[1].belief, Some(0.4));
		assert_eq!(nodes[2].belief, None);
	}

	#[test]
	fn attributes_are_independent() {
		let nodes = initialize_nodes(["n1"]);
		let nodes = merge_scalar_attribute(ScalarAttribute::Belief, &batch(&[("n1", -0.5)]), &nodes);
		let nodes =
			merge_scalar_attribute(ScalarAttribute::Confidence, &batch(&[("n1", 0.8)]), &nodes);
		assert_eq!(nodes[0].belief, Some(-0.5));
		assert_eq!(nodes[0].confidence, Some(0.8));
	}

	#[test]
	fn unknown_ids_create_nothing() {
		let nodes = initialize_nodes(["n1"]);
		let merged =
			merge_scalar_attribute(ScalarAttribute::Belief, &batch(&[("ghost", 1.0)]), &nodes);
		assert_eq!(merged, nodes);
	}

	#[test]
	fn overlapping_batches_overwrite() {
		let nodes = initialize_nodes(["n1", "n2"]);
		let nodes = merge_scalar_attribute(
			ScalarAttribute::Belief,
			&batch(&[("n1", 0.1), ("n2", 0.2)]),
			&nodes,
		);
		let nodes = merge_scalar_attribute(ScalarAttribute::Belief, &batch(&[("n2", 0.9)]), &nodes);
		assert_eq!(nodes[0].belief, Some(0.1));
		assert_eq!(nodes[1].belief, Some(0.9));
	}
}
