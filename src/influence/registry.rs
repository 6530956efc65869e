use std::sync::Arc;

use super::error::GraphStateError;

/// Categories whose relation is mutual; rendered undirected when shown alone.
pub const SYMMETRIC_CATEGORIES: &[&str] = &["Acuerdo/Desacuerdo"];

/// One edge category of the current heuristic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEntry {
	/// The category ("link name").
	pub name: String,
	/// Edges of this category in the full, unfiltered edge list.
	pub count: usize,
	/// Whether edges of this category are visible.
	pub active: bool,
	/// Mutual relation, flagged at ingestion.
	pub symmetric: bool,
}

/// Edge categories in first-seen order.
///
/// Snapshots are immutable: [`CategoryRegistry::toggle`] returns a new
/// registry and leaves the receiver untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
	entries: Arc<[CategoryEntry]>,
}

impl CategoryRegistry {
	/// Count categories over `names`, all starting active.
	pub fn from_names<'a, I>(names: I) -> Self
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut entries: Vec<CategoryEntry> = Vec::new();
		for name in names {
			match entries.iter_mut().find(|e| e.name == name) {
				Some(entry) => entry.count += 1,
				None => entries.push(CategoryEntry {
					name: name.to_string(),
					count: 1,
					active: true,
					symmetric: SYMMETRIC_CATEGORIES.contains(&name),
				}),
			}
		}
		Self {
			entries: entries.into(),
		}
	}

	/// Set one category's flag, producing a new snapshot.
	pub fn toggle(&self, name: &str, active: bool) -> Result<Self, GraphStateError> {
		if self.get(name).is_none() {
			return Err(GraphStateError::CategoryNotFound(name.to_string()));
		}
		let entries: Vec<CategoryEntry> = self
			.entries
			.iter()
			.map(|e| {
				if e.name == name {
					CategoryEntry {
						active,
						..e.clone()
					}
				} else {
					e.clone()
				}
			})
			.collect();
		Ok(Self {
			entries: entries.into(),
		})
	}

	/// Names of the active categories, first-seen order.
	pub fn active_categories(&self) -> ActiveCategories {
		ActiveCategories(
			self.entries
				.iter()
				.filter(|e| e.active)
				.map(|e| ActiveCategory {
					name: e.name.clone(),
					symmetric: e.symmetric,
				})
				.collect(),
		)
	}

	/// Lookup by name.
	pub fn get(&self, name: &str) -> Option<&CategoryEntry> {
		self.entries.iter().find(|e| e.name == name)
	}

	/// Stable position of a category, used for color assignment.
	pub fn color_index(&self, name: &str) -> Option<usize> {
		self.entries.iter().position(|e| e.name == name)
	}

	/// Whether a category is flagged as a mutual relation.
	pub fn is_symmetric(&self, name: &str) -> bool {
		self.get(name).is_some_and(|e| e.symmetric)
	}

	/// Entries in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = &CategoryEntry> {
		self.entries.iter()
	}

	/// Number of distinct categories.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True before any edge has been ingested.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ActiveCategory {
	name: String,
	symmetric: bool,
}

/// The set of visible categories, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveCategories(Vec<ActiveCategory>);

impl ActiveCategories {
	/// Membership test.
	pub fn contains(&self, name: &str) -> bool {
		self.0.iter().any(|c| c.name == name)
	}

	/// Category names.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|c| c.name.as_str())
	}

	/// Number of active categories.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// No category is visible.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The view is undirected only when a single symmetric category is shown.
	pub fn is_undirected(&self) -> bool {
		matches!(self.0.as_slice(), [only] if only.symmetric)
	}
}
