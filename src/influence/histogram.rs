use super::model::Node;

/// Node attribute shown by the distribution chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeAttribute {
	/// Visible out-degree.
	#[default]
	OutDegree,
	/// Stance score, scaled to percent.
	Belief,
	/// Stance certainty, scaled to percent.
	Confidence,
}

impl NodeAttribute {
	/// All attributes in selector order.
	pub const ALL: [Self; 3] = [Self::Confidence, Self::Belief, Self::OutDegree];

	/// Selector label.
	pub fn label(self) -> &'static str {
		match self {
			Self::OutDegree => "Nodos Influenciados",
			Self::Belief => "Creencia",
			Self::Confidence => "Confianza",
		}
	}

	/// Stable key for form values.
	pub fn key(self) -> &'static str {
		match self {
			Self::OutDegree => "outDegree",
			Self::Belief => "belief",
			Self::Confidence => "confidence",
		}
	}

	/// Inverse of [`NodeAttribute::key`].
	pub fn from_key(key: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|a| a.key() == key)
	}

	/// Value placed in the histogram; `None` until the backend has sent it.
	fn value(self, node: &Node) -> Option<i64> {
		let scaled = |v: Option<f64>| v.map(|v| (v * 100.0).round() as i64);
		match self {
			Self::OutDegree => Some(node.out_degree as i64),
			Self::Belief => scaled(node.belief),
			Self::Confidence => scaled(node.confidence),
		}
	}

	/// Inclusive value domain.
	fn domain(self, max_out_degree: usize) -> (i64, i64) {
		match self {
			Self::OutDegree => (0, max_out_degree.max(1) as i64),
			Self::Belief => (-100, 100),
			Self::Confidence => (0, 100),
		}
	}
}

/// One unit-width bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bin {
	/// Lower edge of the bucket.
	pub start: i64,
	/// Nodes falling in the bucket.
	pub count: usize,
}

impl Bin {
	/// Axis label.
	pub fn label(&self) -> String {
		self.start.to_string()
	}
}

/// Distribution of one attribute over the node set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Histogram {
	/// Contiguous buckets covering the domain.
	pub bins: Vec<Bin>,
	/// Tallest bucket, at least 1.
	pub max_count: usize,
	/// Nodes without a value for the attribute.
	pub missing: usize,
}

/// Bin `attribute` over `nodes`. Values outside the domain clamp to its ends.
pub fn histogram(nodes: &[Node], attribute: NodeAttribute, max_out_degree: usize) -> Histogram {
	let (lo, hi) = attribute.domain(max_out_degree);
	let mut bins: Vec<Bin> = (lo..=hi).map(|start| Bin { start, count: 0 }).collect();
	let mut missing = 0;
	for node in nodes {
		match attribute.value(node) {
			Some(v) => bins[(v.clamp(lo, hi) - lo) as usize].count += 1,
			None => missing += 1,
		}
	}
	let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
	Histogram {
		bins,
		max_count,
		missing,
	}
}

/// Whether any node carries `attribute` yet.
pub fn attribute_available(nodes: &[Node], attribute: NodeAttribute) -> bool {
	match attribute {
		NodeAttribute::OutDegree => !nodes.is_empty(),
		NodeAttribute::Belief => nodes.iter().any(|n| n.belief.is_some()),
		NodeAttribute::Confidence => nodes.iter().any(|n| n.confidence.is_some()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::influence::model::initialize_nodes;

	#[test]
	fn out_degree_bins() {
		let mut nodes = initialize_nodes(["a", "b", "c", "d"]);
		nodes[0].out_degree = 2;
		nodes[1].out_degree = 2;
		nodes[2].out_degree = 1;
		let h = histogram(&nodes, NodeAttribute::OutDegree, 2);
		let counts: Vec<_> = h.bins.iter().map(|b| (b.start, b.count)).collect();
		assert_eq!(counts, [(0, 1), (1, 1), (2, 2)]);
		assert_eq!(h.max_count, 2);
	}

	#[test]
	fn missing_beliefs_are_counted_apart() {
		let mut nodes = initialize_nodes(["a", "b", "c"]);
		nodes[0].belief = Some(0.25);
		nodes[1].belief = Some(1.0);
		let h = histogram(&nodes, NodeAttribute::Belief, 1);
		assert_eq!(h.bins.len(), 201);
		assert_eq!(h.missing, 1);
		assert_eq!(h.bins[125].count, 1);
		assert_eq!(h.bins[200].count, 1);
		assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 2);
	}

	#[test]
	fn negative_stance_keeps_its_own_bin() {
		let mut nodes = initialize_nodes(["a", "b"]);
		nodes[0].belief = Some(-0.7);
		let h = histogram(&nodes, NodeAttribute::Belief, 1);
		let bin = h.bins.iter().find(|b| b.start == -70).unwrap();
		assert_eq!(bin.count, 1);
		assert_eq!(bin.label(), "-70");
		assert_eq!(h.missing, 1);
		assert_eq!(h.bins[0].count, 0);
	}

	#[test]
	fn confidence_spans_zero_to_hundred() {
		let mut nodes = initialize_nodes(["a"]);
		nodes[0].confidence = Some(0.42);
		let h = histogram(&nodes, NodeAttribute::Confidence, 1);
		assert_eq!(h.bins.len(), 101);
		assert_eq!(h.bins[42].count, 1);
		assert_eq!(h.missing, 0);
	}

	#[test]
	fn out_of_range_values_clamp_to_the_ends() {
		let mut nodes = initialize_nodes(["a"]);
		nodes[0].belief = Some(-3.0);
		let h = histogram(&nodes, NodeAttribute::Belief, 1);
		assert_eq!(h.bins[0].count, 1);
	}

	#[test]
	fn availability_tracks_arrived_batches() {
		let mut nodes = initialize_nodes(["a"]);
		assert!(attribute_available(&nodes, NodeAttribute::OutDegree));
		assert!(!attribute_available(&nodes, NodeAttribute::Confidence));
		nodes[0].confidence = Some(0.5);
		assert!(attribute_available(&nodes, NodeAttribute::Confidence));
		assert_eq!(NodeAttribute::from_key("belief"), Some(NodeAttribute::Belief));
	}
}
