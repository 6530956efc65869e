//! The dashboard's single authoritative state and the events that move it.

use std::collections::{BTreeMap, HashMap};

use log::{debug, error, info};

use super::attributes::{ScalarAttribute, merge_scalar_attribute};
use super::error::GraphStateError;
use super::export::{ExportArchive, export_archive};
use super::focus::{FocusState, InfluenceEntry, NodeIndex, focused_influence_list};
use super::ingest::{LayoutSpace, ingest};
use super::model::{Heuristic, Link, Node, initialize_nodes};
use super::progress::{AffinityProgress, StanceProgress};
use super::registry::CategoryRegistry;
use super::view::{ActiveView, recompute_view};
use crate::transport::{ServerEvent, TopicInfo};

/// Identifies one dataset load. Events tagged with an older generation are dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Outcome of [`Dashboard::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
	/// The event changed state.
	Updated,
	/// The event belonged to a previous dataset.
	Stale,
}

/// State of one loaded dataset plus the UI selections over it.
#[derive(Clone, Debug, Default)]
pub struct Dashboard {
	generation: Generation,
	layout: LayoutSpace,
	topic: Option<TopicInfo>,
	nodes: Vec<Node>,
	index: NodeIndex,
	heuristic_links: BTreeMap<Heuristic, Vec<Link>>,
	current: Option<Heuristic>,
	full_edges: Vec<Link>,
	registry: CategoryRegistry,
	view: ActiveView,
	focus: FocusState,
	pair: Option<(String, String)>,
	alert: Option<String>,
	stance: StanceProgress,
	affinity: AffinityProgress,
}

impl Dashboard {
	/// Empty dashboard scattering fresh nodes over `layout`.
	pub fn new(layout: LayoutSpace) -> Self {
		Self {
			layout,
			view: ActiveView {
				max_out_degree: 1,
				directed: true,
				..ActiveView::default()
			},
			..Self::default()
		}
	}

	/// Forget the current dataset and start a new load.
	pub fn begin_upload(&mut self, topic: TopicInfo) -> Generation {
		let generation = Generation(self.generation.0 + 1);
		info!("starting dataset load {} on topic {:?}", generation.0, topic.topic);
		*self = Self {
			generation,
			topic: Some(topic),
			..Self::new(self.layout)
		};
		generation
	}

	/// Fold one backend event into the state.
	pub fn apply(&mut self, generation: Generation, event: ServerEvent) -> Applied {
		if generation != self.generation {
			debug!(
				"dropping event from load {} (current {})",
				generation.0, self.generation.0
			);
			return Applied::Stale;
		}
		match event {
			ServerEvent::Users(ids) => self.receive_users(ids),
			ServerEvent::Heuristics(lists) => {
				for (heuristic, links) in lists {
					self.receive_heuristic(heuristic, links);
				}
			}
			ServerEvent::PreprocessError(message) => {
				error!("preprocessing failed: {message}");
				self.alert = Some(message);
			}
			ServerEvent::Belief(values) => {
				self.merge(ScalarAttribute::Belief, &values);
				self.stance.open = false;
			}
			ServerEvent::Confidence(values) => self.merge(ScalarAttribute::Confidence, &values),
			ServerEvent::StanceTime(time) => self.stance = StanceProgress::start(time),
			ServerEvent::AffinityWorkInfo(users) => {
				self.affinity.users = users;
				self.affinity.open = true;
			}
			ServerEvent::AffinityWork(progress) => self.affinity.progress = progress,
		}
		Applied::Updated
	}

	fn receive_users(&mut self, ids: Vec<String>) {
		let mut nodes = initialize_nodes(ids);
		// edges may have arrived first; keep the endpoints they introduced
		let known = NodeIndex::build(&nodes);
		let extra: Vec<Node> = self
			.nodes
			.iter()
			.filter(|n| !known.contains(&n.id))
			.cloned()
			.collect();
		nodes.extend(extra);
		for node in &mut nodes {
			if let Some(prev) = self.index.get(&self.nodes, &node.id) {
				*node = prev.clone();
			}
			if node.position.is_none() {
				node.position = Some(self.layout.position_for(&node.id));
			}
		}
		self.set_nodes(nodes);
		// recount against the edges already held; the registry and its toggles stay
		self.refresh_view();
	}

	fn receive_heuristic(&mut self, heuristic: Heuristic, links: Vec<Link>) {
		debug!("received {} edges for {}", links.len(), heuristic.key());
		if heuristic == Heuristic::Affinity {
			self.affinity.open = false;
		}
		let empty = links.is_empty();
		self.heuristic_links.insert(heuristic, links);
		if self.current.is_none() && !empty {
			self.current = Some(heuristic);
			self.rebuild_current();
		} else if self.current == Some(heuristic) {
			self.rebuild_current();
		}
	}

	fn rebuild_current(&mut self) {
		let Some(heuristic) = self.current else {
			return;
		};
		let links = self.heuristic_links.get(&heuristic).map_or(&[][..], Vec::as_slice);
		let ingested = ingest(links, &self.nodes, &self.layout);
		self.full_edges = ingested.edges;
		self.registry = ingested.registry;
		self.set_nodes(ingested.nodes);
		self.refresh_view();
	}

	fn refresh_view(&mut self) {
		let view = recompute_view(
			&self.full_edges,
			&self.registry.active_categories(),
			&self.nodes,
		);
		self.set_nodes(view.nodes.clone());
		self.view = view;
	}

	fn set_nodes(&mut self, nodes: Vec<Node>) {
		self.index = NodeIndex::build(&nodes);
		self.nodes = nodes;
		self.focus.reconcile(&self.index);
		let index = &self.index;
		self.pair = self
			.pair
			.take()
			.filter(|(s, t)| index.contains(s) && index.contains(t));
	}

	fn merge(&mut self, attribute: ScalarAttribute, values: &HashMap<String, f64>) {
		let nodes = merge_scalar_attribute(attribute, values, &self.nodes);
		self.set_nodes(nodes);
		self.view.nodes = self.nodes.clone();
	}

	/// Switch to another heuristic; rebuilds the registry from scratch.
	pub fn select_heuristic(&mut self, heuristic: Heuristic) -> Result<(), GraphStateError> {
		if self
			.heuristic_links
			.get(&heuristic)
			.is_none_or(|links| links.is_empty())
		{
			return Err(GraphStateError::EmptyHeuristic(heuristic));
		}
		self.current = Some(heuristic);
		self.rebuild_current();
		Ok(())
	}

	/// Show or hide one category of the current heuristic.
	pub fn toggle_category(&mut self, name: &str, active: bool) -> Result<(), GraphStateError> {
		self.registry = self.registry.toggle(name, active)?;
		self.refresh_view();
		Ok(())
	}

	/// Focus `id`; unknown ids leave nothing focused.
	pub fn focus_node(&mut self, id: &str) {
		self.pair = None;
		self.focus.focus(id, &self.index);
	}

	/// Leave nothing focused.
	pub fn clear_focus(&mut self) {
		self.pair = None;
		self.focus.clear();
	}

	/// Highlight both endpoints of an influence entry, keeping the focused node.
	/// Returns false when either endpoint is unknown.
	pub fn focus_entry(&mut self, entry: &InfluenceEntry) -> bool {
		let pair = self
			.resolve_entry(entry)
			.map(|(s, t)| (s.id.clone(), t.id.clone()));
		let found = pair.is_some();
		self.pair = pair;
		found
	}

	/// Endpoints highlighted by [`Dashboard::focus_entry`].
	pub fn focused_pair(&self) -> Option<(&str, &str)> {
		self.pair.as_ref().map(|(s, t)| (s.as_str(), t.as_str()))
	}

	/// The focused node record.
	pub fn focused_node(&self) -> Option<&Node> {
		self.focus.id().and_then(|id| self.node(id))
	}

	/// The focused node's visible influence, grouped by target.
	pub fn influence_list(&self) -> Vec<InfluenceEntry> {
		self.focus
			.id()
			.map(|id| focused_influence_list(id, &self.view.visible_edges))
			.unwrap_or_default()
	}

	/// Node lookup by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(&self.nodes, id)
	}

	/// Up to `limit` node ids containing `query`, case-insensitive.
	/// Prefix matches come first, then dataset order.
	pub fn search_nodes(&self, query: &str, limit: usize) -> Vec<&str> {
		let query = query.trim().trim_start_matches('@').to_lowercase();
		if query.is_empty() {
			return Vec::new();
		}
		let mut hits: Vec<(bool, &str)> = self
			.nodes
			.iter()
			.filter_map(|n| {
				let id = n.id.to_lowercase();
				id.contains(&query)
					.then(|| (!id.starts_with(&query), n.id.as_str()))
			})
			.collect();
		hits.sort_by_key(|(later, _)| *later);
		hits.into_iter().take(limit).map(|(_, id)| id).collect()
	}

	/// Both endpoints of an influence entry.
	pub fn resolve_entry(&self, entry: &InfluenceEntry) -> Option<(&Node, &Node)> {
		self.index.resolve_endpoints(&self.nodes, entry)
	}

	/// Heuristics with a non-empty edge list, selector order.
	pub fn available_heuristics(&self) -> Vec<Heuristic> {
		Heuristic::ALL
			.into_iter()
			.filter(|h| self.heuristic_links.get(h).is_some_and(|l| !l.is_empty()))
			.collect()
	}

	/// Hide the preprocessing alert.
	pub fn dismiss_alert(&mut self) {
		self.alert = None;
	}

	/// Archive of the nodes and visible edges.
	pub fn export(&self) -> Result<ExportArchive, GraphStateError> {
		let label = self.current.map_or("grafo", Heuristic::label);
		Ok(export_archive(
			label,
			&self.nodes,
			&self.view.visible_edges,
			&self.registry,
		)?)
	}

	/// Current load.
	pub fn generation(&self) -> Generation {
		self.generation
	}

	/// Space fresh nodes are scattered over.
	pub fn layout(&self) -> LayoutSpace {
		self.layout
	}

	/// Selected heuristic.
	pub fn current_heuristic(&self) -> Option<Heuristic> {
		self.current
	}

	/// Every node of the dataset.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// The filtered view.
	pub fn view(&self) -> &ActiveView {
		&self.view
	}

	/// Categories of the current heuristic.
	pub fn registry(&self) -> &CategoryRegistry {
		&self.registry
	}

	/// Pending preprocessing error.
	pub fn alert(&self) -> Option<&str> {
		self.alert.as_deref()
	}

	/// Stance progress indicator.
	pub fn stance_progress(&self) -> &StanceProgress {
		&self.stance
	}

	/// Affinity progress indicator.
	pub fn affinity_progress(&self) -> &AffinityProgress {
		&self.affinity
	}

	/// Topic of the current load.
	pub fn topic(&self) -> Option<&TopicInfo> {
		self.topic.as_ref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn topic() -> TopicInfo {
		TopicInfo::new("reforma", "contexto", 60, 200).unwrap()
	}

	fn mentions() -> Vec<Link> {
		vec![
			Link::new("u1", "u2", "Retweets", 0.9),
			Link::new("u1", "u3", "Retweets", 0.2),
			Link::new("u2", "u3", "Menciones", 0.7),
		]
	}

	fn agreement() -> Vec<Link> {
		vec![Link::new("u3", "u1", "Acuerdo/Desacuerdo", -0.6)]
	}

	fn loaded() -> (Dashboard, Generation) {
		let mut d = Dashboard::new(LayoutSpace::default());
		let g = d.begin_upload(topic());
		d.apply(g, ServerEvent::Users(vec!["u1".into(), "u2".into(), "u3".into()]));
		d.apply(
			g,
			ServerEvent::Heuristics(vec![
				(Heuristic::Mentions, mentions()),
				(Heuristic::Agreement, agreement()),
			]),
		);
		(d, g)
	}

	fn degree(d: &Dashboard, id: &str) -> usize {
		d.node(id).unwrap().out_degree
	}

	#[test]
	fn first_non_empty_heuristic_becomes_current() {
		let mut d = Dashboard::new(LayoutSpace::default());
		let g = d.begin_upload(topic());
		d.apply(
			g,
			ServerEvent::Heuristics(vec![
				(Heuristic::Affinity, vec![]),
				(Heuristic::Mentions, mentions()),
				(Heuristic::Agreement, agreement()),
			]),
		);
		assert_eq!(d.current_heuristic(), Some(Heuristic::Mentions));
		assert_eq!(
			d.available_heuristics(),
			[Heuristic::Mentions, Heuristic::Agreement]
		);
	}

	#[test]
	fn edges_before_users_keep_statistics() {
		let mut d = Dashboard::new(LayoutSpace::default());
		let g = d.begin_upload(topic());
		d.apply(g, ServerEvent::Heuristics(vec![(Heuristic::Mentions, mentions())]));
		let pos = d.node("u1").unwrap().position;
		d.apply(g, ServerEvent::Users(vec!["u0".into(), "u1".into()]));

		assert_eq!(d.nodes().len(), 4);
		assert_eq!(degree(&d, "u1"), 2);
		assert_eq!(degree(&d, "u0"), 0);
		assert_eq!(d.node("u1").unwrap().position, pos);
		assert_eq!(d.view().visible_edges.len(), 3);
	}

	#[test]
	fn late_users_keep_category_toggles() {
		let mut d = Dashboard::new(LayoutSpace::default());
		let g = d.begin_upload(topic());
		d.apply(g, ServerEvent::Heuristics(vec![(Heuristic::Mentions, mentions())]));
		d.toggle_category("Retweets", false).unwrap();
		d.apply(
			g,
			ServerEvent::Users(vec!["u1".into(), "u2".into(), "u3".into(), "u4".into()]),
		);

		assert!(!d.registry().get("Retweets").unwrap().active);
		assert_eq!(d.view().visible_edges.len(), 1);
		assert_eq!(degree(&d, "u1"), 0);
		assert_eq!(degree(&d, "u2"), 1);
		assert_eq!(degree(&d, "u4"), 0);
		assert!(d.node("u4").unwrap().position.is_some());
		assert_eq!(d.view().nodes, d.nodes());
	}

	#[test]
	fn users_alone_fill_the_view() {
		let mut d = Dashboard::new(LayoutSpace::default());
		let g = d.begin_upload(topic());
		d.apply(g, ServerEvent::Users(vec!["a".into(), "b".into()]));
		assert_eq!(d.view().nodes.len(), 2);
		assert_eq!(d.view().nodes, d.nodes());
		assert!(d.view().visible_edges.is_empty());
		assert_eq!(d.view().max_out_degree, 1);

		d.apply(g, ServerEvent::Confidence(HashMap::from([("a".into(), 0.3)])));
		assert_eq!(d.view().nodes, d.nodes());
	}

	#[test]
	fn switching_heuristic_rebuilds_registry() {
		let (mut d, _) = loaded();
		assert_eq!(degree(&d, "u1"), 2);
		d.select_heuristic(Heuristic::Agreement).unwrap();
		assert_eq!(d.registry().len(), 1);
		assert_eq!(degree(&d, "u1"), 0);
		assert_eq!(degree(&d, "u3"), 1);
		assert!(!d.view().directed);

		assert!(matches!(
			d.select_heuristic(Heuristic::Affinity),
			Err(GraphStateError::EmptyHeuristic(Heuristic::Affinity))
		));
		assert_eq!(d.current_heuristic(), Some(Heuristic::Agreement));
	}

	#[test]
	fn toggling_filters_and_keeps_focus_list_in_sync() {
		let (mut d, _) = loaded();
		d.focus_node("u1");
		assert_eq!(d.influence_list().len(), 2);

		d.toggle_category("Retweets", false).unwrap();
		assert_eq!(degree(&d, "u1"), 0);
		assert_eq!(d.view().max_out_degree, 1);
		assert!(d.influence_list().is_empty());
		assert_eq!(d.focused_node().map(|n| n.id.as_str()), Some("u1"));

		assert!(d.toggle_category("Afinidad", true).is_err());
	}

	#[test]
	fn entry_focus_highlights_both_endpoints() {
		let (mut d, _) = loaded();
		d.focus_node("u1");
		let entry = d.influence_list().remove(0);
		assert!(d.focus_entry(&entry));
		assert_eq!(d.focused_pair(), Some(("u1", "u2")));
		assert_eq!(d.focused_node().map(|n| n.id.as_str()), Some("u1"));

		d.focus_node("u3");
		assert_eq!(d.focused_pair(), None);

		let ghost = InfluenceEntry {
			target: "ghost".into(),
			..entry
		};
		assert!(!d.focus_entry(&ghost));
		assert_eq!(d.focused_pair(), None);
	}

	#[test]
	fn search_ranks_prefix_matches_first() {
		let mut d = Dashboard::new(LayoutSpace::default());
		let g = d.begin_upload(topic());
		d.apply(
			g,
			ServerEvent::Users(vec!["maria".into(), "Ana".into(), "anabel".into(), "juan".into()]),
		);
		assert_eq!(d.search_nodes("an", 10), ["Ana", "anabel", "juan"]);
		assert_eq!(d.search_nodes("@AN", 1), ["Ana"]);
		assert!(d.search_nodes("  ", 10).is_empty());
		assert!(d.search_nodes("zz", 10).is_empty());
	}

	#[test]
	fn stale_events_are_dropped() {
		let (mut d, old) = loaded();
		let new = d.begin_upload(topic());
		assert!(d.nodes().is_empty());
		assert_eq!(
			d.apply(old, ServerEvent::Users(vec!["late".into()])),
			Applied::Stale
		);
		assert!(d.nodes().is_empty());
		assert_eq!(
			d.apply(new, ServerEvent::Users(vec!["fresh".into()])),
			Applied::Updated
		);
		assert!(d.node("fresh").is_some());
	}

	#[test]
	fn reset_clears_focus() {
		let (mut d, _) = loaded();
		d.focus_node("u2");
		d.begin_upload(topic());
		assert!(d.focused_node().is_none());
	}

	#[test]
	fn preprocess_error_is_dismissible_and_keeps_state() {
		let (mut d, g) = loaded();
		d.apply(g, ServerEvent::PreprocessError("columna faltante".into()));
		assert_eq!(d.alert(), Some("columna faltante"));
		assert_eq!(d.nodes().len(), 3);
		d.dismiss_alert();
		assert_eq!(d.alert(), None);
	}

	#[test]
	fn belief_batches_merge_and_survive_filtering() {
		let (mut d, g) = loaded();
		d.apply(
			g,
			ServerEvent::Belief(HashMap::from([("u1".into(), 0.2), ("ghost".into(), 0.5)])),
		);
		d.apply(g, ServerEvent::Belief(HashMap::from([("u2".into(), 0.4)])));
		d.toggle_category("Menciones", false).unwrap();

		assert_eq!(d.node("u1").unwrap().belief, Some(0.2));
		assert_eq!(d.node("u2").unwrap().belief, Some(0.4));
		assert_eq!(d.node("u3").unwrap().belief, None);
		assert!(d.node("ghost").is_none());
		assert_eq!(d.view().nodes, d.nodes());
	}

	#[test]
	fn export_uses_visible_edges() {
		let (mut d, _) = loaded();
		d.toggle_category("Menciones", false).unwrap();
		let archive = d.export().unwrap();
		assert_eq!(archive.file_name, "Interacciones.tar.gz");
		assert!(!archive.bytes.is_empty());
	}
}
