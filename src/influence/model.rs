use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GraphStateError;

/// Layout coordinates. Owned by the force simulation once assigned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
	/// Horizontal coordinate in layout space.
	pub x: f64,
	/// Vertical coordinate in layout space.
	pub y: f64,
}

/// A participant of the loaded dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable identifier for the life of a dataset.
	pub id: String,
	/// Outgoing edges in the currently visible edge set.
	pub out_degree: usize,
	/// Stance score, once the backend has computed it.
	pub belief: Option<f64>,
	/// Certainty of the stance score.
	pub confidence: Option<f64>,
	/// First-assignment-wins layout position.
	pub position: Option<Position>,
}

impl Node {
	/// A fresh node with no statistics, attributes or position.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			out_degree: 0,
			belief: None,
			confidence: None,
			position: None,
		}
	}
}

/// A directed influence relation: `source` influences `target`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// Influencing node id.
	pub source: String,
	/// Influenced node id.
	pub target: String,
	/// Opaque magnitude, passed through for display.
	#[serde(rename = "influenceValue", default)]
	pub influence_value: f64,
	/// Influence relation tag ("link name").
	#[serde(rename = "link_name", alias = "linkName", default)]
	pub category: String,
	/// Timestamps at which the relation was observed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<Vec<String>>,
}

impl Link {
	/// Convenience constructor for a link without observation dates.
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		category: impl Into<String>,
		influence_value: f64,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			influence_value,
			category: category.into(),
			date: None,
		}
	}

	/// The same relation seen from the target's side.
	pub fn reversed(&self) -> Self {
		Self {
			source: self.target.clone(),
			target: self.source.clone(),
			..self.clone()
		}
	}
}

/// Edge derivation methods computed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Heuristic {
	/// Interactions between users (mentions, retweets).
	Mentions,
	/// Popularity measured over the whole network.
	GlobalPopularity,
	/// Popularity relative to each user's neighbourhood.
	LocalPopularity,
	/// Similarity of opinions.
	Affinity,
	/// Agreement and disagreement between users.
	Agreement,
}

impl Heuristic {
	/// Every heuristic, in selector order.
	pub const ALL: [Self; 5] = [
		Self::Mentions,
		Self::GlobalPopularity,
		Self::LocalPopularity,
		Self::Affinity,
		Self::Agreement,
	];

	/// Key used by the backend payloads.
	pub fn key(self) -> &'static str {
		match self {
			Self::Mentions => "mentions_links",
			Self::GlobalPopularity => "global_influence_links",
			Self::LocalPopularity => "local_influence_links",
			Self::Affinity => "affinities_links",
			Self::Agreement => "agreement_links",
		}
	}

	/// Human-facing label. Also used as the category of untagged edges.
	pub fn label(self) -> &'static str {
		match self {
			Self::Mentions => "Interacciones",
			Self::GlobalPopularity => "Popularidad",
			Self::LocalPopularity => "Popularidad Relativa",
			Self::Affinity => "Afinidad",
			Self::Agreement => "Acuerdo/Desacuerdo",
		}
	}

	/// Short explanation of what the heuristic's edges mean.
	pub fn description(self) -> &'static str {
		match self {
			Self::Mentions => "Redes basadas en interacciones entre usuarios",
			Self::GlobalPopularity => "Redes de interacciones basada en popularidad",
			Self::LocalPopularity => "Redes de popularidad relativa a cada vecindario",
			Self::Affinity => "Redes de similitud de opiniones",
			Self::Agreement => "Redes de acuerdo y desacuerdo entre usuarios",
		}
	}

	/// Parse a backend payload key.
	pub fn from_key(key: &str) -> Result<Self, GraphStateError> {
		Self::ALL
			.into_iter()
			.find(|h| h.key() == key)
			.ok_or_else(|| GraphStateError::UnknownHeuristic(key.to_string()))
	}
}

impl fmt::Display for Heuristic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Build the node set announced by the identifier list message.
///
/// Repeated ids collapse into the first occurrence.
pub fn initialize_nodes<I, S>(ids: I) -> Vec<Node>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut seen = HashSet::new();
	ids.into_iter()
		.map(Into::into)
		.filter(|id| seen.insert(id.clone()))
		.map(Node::new)
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn heuristic_keys_round_trip() {
		for h in Heuristic::ALL {
			assert_eq!(Heuristic::from_key(h.key()).unwrap(), h);
		}
		assert!(matches!(
			Heuristic::from_key("bogus_links"),
			Err(GraphStateError::UnknownHeuristic(k)) if k == "bogus_links"
		));
	}

	#[test]
	fn initialize_nodes_dedups_in_order() {
		let nodes = initialize_nodes(["b", "a", "b", "c"]);
		let ids: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["b", "a", "c"]);
		assert!(nodes.iter().all(|n| n.out_degree == 0 && n.belief.is_none()));
	}

	#[test]
	fn link_accepts_both_category_spellings() {
		let snake: Link = serde_json::from_str(
			r#"{"source":"a","target":"b","influenceValue":0.5,"link_name":"Retweets"}"#,
		)
		.unwrap();
		let camel: Link = serde_json::from_str(
			r#"{"source":"a","target":"b","influenceValue":0.5,"linkName":"Retweets","date":["2024-01-01"]}"#,
		)
		.unwrap();
		assert_eq!(snake.category, "Retweets");
		assert_eq!(camel.category, "Retweets");
		assert_eq!(camel.date.as_deref(), Some(&["2024-01-01".to_string()][..]));
	}

	#[test]
	fn reversed_swaps_endpoints_only() {
		let link = Link::new("a", "b", "Acuerdo/Desacuerdo", -0.4);
		let back = link.reversed();
		assert_eq!((back.source.as_str(), back.target.as_str()), ("b", "a"));
		assert_eq!(back.influence_value, -0.4);
		assert_eq!(back.category, link.category);
	}
}
