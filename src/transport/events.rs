use std::collections::HashMap;

use log::warn;
use serde::Serialize;
use serde_json::Value;

use super::error::{TransportError, UploadError};
use crate::influence::{Heuristic, Link, StanceTime};

/// Event name of the outbound dataset upload.
pub const UPLOAD_EVENT: &str = "influenceGraph";

/// A push message from the compute backend.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
	/// Identifiers of every participant.
	Users(Vec<String>),
	/// Full edge lists, one per heuristic in the payload.
	Heuristics(Vec<(Heuristic, Vec<Link>)>),
	/// The upload could not be preprocessed.
	PreprocessError(String),
	/// A batch of stance scores.
	Belief(HashMap<String, f64>),
	/// A batch of stance certainties.
	Confidence(HashMap<String, f64>),
	/// Stance computation started.
	StanceTime(StanceTime),
	/// Affinity computation started over this many users.
	AffinityWorkInfo(u64),
	/// Affinity computation progress, 0–1.
	AffinityWork(f64),
}

impl ServerEvent {
	/// Decode a named Socket.IO event. Names the dashboard does not use
	/// decode to `Ok(None)`.
	pub fn decode(name: &str, payload: Value) -> Result<Option<Self>, TransportError> {
		let event = match name {
			"users" => Self::Users(serde_json::from_value(payload)?),
			"influence_heuristic" => Self::Heuristics(heuristic_lists(payload)?),
			"preprocess_error" => Self::PreprocessError(match payload {
				Value::String(message) => message,
				other => other.to_string(),
			}),
			"belief_heuristic" | "stance_heuristic" => Self::Belief(scalars(payload)?),
			"confidence_heuristic" => Self::Confidence(scalars(payload)?),
			"stance_time" => Self::StanceTime(serde_json::from_value(payload)?),
			"affinity_work_info" => Self::AffinityWorkInfo(serde_json::from_value(payload)?),
			"affinity_work" => Self::AffinityWork(serde_json::from_value(payload)?),
			_ => return Ok(None),
		};
		Ok(Some(event))
	}
}

fn heuristic_lists(payload: Value) -> Result<Vec<(Heuristic, Vec<Link>)>, TransportError> {
	let map: serde_json::Map<String, Value> = serde_json::from_value(payload)?;
	let mut lists = Vec::with_capacity(map.len());
	for (key, value) in map {
		let Ok(heuristic) = Heuristic::from_key(&key) else {
			warn!("ignoring edge list for unknown heuristic {key}");
			continue;
		};
		let mut links: Vec<Link> = match serde_json::from_value(value) {
			Ok(links) => links,
			Err(e) => {
				warn!("skipping malformed edge list for {key}: {e}");
				continue;
			}
		};
		for link in links.iter_mut().filter(|l| l.category.is_empty()) {
			link.category = heuristic.label().to_string();
		}
		lists.push((heuristic, links));
	}
	// object keys carry no order on the wire; keep selector order
	lists.sort_by_key(|(heuristic, _)| *heuristic);
	Ok(lists)
}

fn scalars(payload: Value) -> Result<HashMap<String, f64>, TransportError> {
	let raw: HashMap<String, Option<f64>> = serde_json::from_value(payload)?;
	Ok(raw
		.into_iter()
		.filter_map(|(id, value)| value.map(|v| (id, v)))
		.collect())
}

/// What the analysis is about; length-capped free text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TopicInfo {
	/// Main subject.
	pub topic: String,
	/// Neutral framing of the subject.
	pub topic_context: String,
}

impl TopicInfo {
	/// Trim both fields and cap them at the given character counts.
	pub fn new(
		topic: &str,
		context: &str,
		topic_max: usize,
		context_max: usize,
	) -> Result<Self, UploadError> {
		let topic = topic.trim();
		let context = context.trim();
		if topic.is_empty() {
			return Err(UploadError::EmptyTopic);
		}
		if context.is_empty() {
			return Err(UploadError::EmptyContext);
		}
		Ok(Self {
			topic: topic.chars().take(topic_max).collect(),
			topic_context: context.chars().take(context_max).collect(),
		})
	}
}

/// Payload of the [`UPLOAD_EVENT`] message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
	/// Base64 file content.
	pub csv_data: String,
	/// Analysis metadata.
	pub topic_info: TopicInfo,
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn decodes_heuristic_batch_and_fills_categories() {
		let payload = json!({
			"mentions_links": [
				{"source": "a", "target": "b", "influenceValue": 0.5, "link_name": "Retweets"},
				{"source": "b", "target": "c", "influenceValue": 0.1}
			],
			"mystery_links": []
		});
		let Some(ServerEvent::Heuristics(lists)) =
			ServerEvent::decode("influence_heuristic", payload).unwrap()
		else {
			panic!("expected heuristics");
		};
		assert_eq!(lists.len(), 1);
		let (heuristic, links) = &lists[0];
		assert_eq!(*heuristic, Heuristic::Mentions);
		assert_eq!(links[0].category, "Retweets");
		assert_eq!(links[1].category, "Interacciones");
	}

	#[test]
	fn malformed_list_does_not_drop_its_neighbours() {
		let payload = json!({
			"mentions_links": [{"source": "a", "target": "b", "influenceValue": 0.5}],
			"agreement_links": [{"source": 7}]
		});
		let Some(ServerEvent::Heuristics(lists)) =
			ServerEvent::decode("influence_heuristic", payload).unwrap()
		else {
			panic!("expected heuristics");
		};
		assert_eq!(lists.len(), 1);
		assert_eq!(lists[0].0, Heuristic::Mentions);
		assert_eq!(lists[0].1.len(), 1);
	}

	#[test]
	fn batch_lists_follow_selector_order() {
		let payload = json!({
			"agreement_links": [],
			"affinities_links": [],
			"mentions_links": []
		});
		let Some(ServerEvent::Heuristics(lists)) =
			ServerEvent::decode("influence_heuristic", payload).unwrap()
		else {
			panic!("expected heuristics");
		};
		let order: Vec<_> = lists.iter().map(|(h, _)| *h).collect();
		assert_eq!(
			order,
			[Heuristic::Mentions, Heuristic::Affinity, Heuristic::Agreement]
		);
	}

	#[test]
	fn scalar_batches_skip_nulls() {
		let event = ServerEvent::decode("belief_heuristic", json!({"a": 0.2, "b": null}))
			.unwrap()
			.unwrap();
		let ServerEvent::Belief(values) = event else {
			panic!("expected belief");
		};
		assert_eq!(values.len(), 1);
		assert_eq!(values["a"], 0.2);
	}

	#[test]
	fn legacy_stance_name_is_belief() {
		let event = ServerEvent::decode("stance_heuristic", json!({"a": 1.0})).unwrap();
		assert!(matches!(event, Some(ServerEvent::Belief(_))));
	}

	#[test]
	fn progress_and_error_events() {
		let time = ServerEvent::decode(
			"stance_time",
			json!({"n_users": 10, "null_stances": 2, "estimated_time": 60.0, "n_batch": 3}),
		)
		.unwrap();
		assert!(matches!(time, Some(ServerEvent::StanceTime(t)) if t.n_users == 10));
		assert_eq!(
			ServerEvent::decode("preprocess_error", json!("bad csv")).unwrap(),
			Some(ServerEvent::PreprocessError("bad csv".into()))
		);
		assert_eq!(
			ServerEvent::decode("affinity_work", json!(0.5)).unwrap(),
			Some(ServerEvent::AffinityWork(0.5))
		);
	}

	#[test]
	fn unknown_events_are_ignored_and_bad_payloads_fail() {
		assert_eq!(ServerEvent::decode("heartbeat", json!({})).unwrap(), None);
		assert!(ServerEvent::decode("users", json!({"not": "a list"})).is_err());
	}

	#[test]
	fn topic_is_trimmed_and_capped() {
		let topic = TopicInfo::new("  reforma pensional  ", "contexto neutral", 6, 200).unwrap();
		assert_eq!(topic.topic, "reform");
		assert!(matches!(
			TopicInfo::new(" ", "x", 60, 200),
			Err(UploadError::EmptyTopic)
		));
	}

	#[test]
	fn upload_request_wire_shape() {
		let request = UploadRequest {
			csv_data: "YQ==".into(),
			topic_info: TopicInfo::new("t", "c", 60, 200).unwrap(),
		};
		assert_eq!(
			serde_json::to_value(&request).unwrap(),
			json!({"csv_data": "YQ==", "topic_info": {"topic": "t", "topic_context": "c"}})
		);
	}
}
