//! Edge counts over time, keyed on each edge's latest observation.

use std::collections::BTreeMap;

use super::model::Link;

/// Edges whose latest observation falls on one calendar day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayCount {
	/// `YYYY-MM-DD`, or the raw stamp when it carries no time part.
	pub day: String,
	/// Edges last seen that day.
	pub count: usize,
}

/// Daily distribution of a set of edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
	/// Days in chronological order; days without edges are omitted.
	pub days: Vec<DayCount>,
	/// Edges with no observation date.
	pub undated: usize,
	/// Busiest day, at least 1.
	pub max_count: usize,
}

/// Latest observation of `link`. ISO-8601 stamps order correctly as strings.
pub fn latest_date(link: &Link) -> Option<&str> {
	link.date
		.as_ref()?
		.iter()
		.map(String::as_str)
		.filter(|d| !d.is_empty())
		.max()
}

fn day_of(stamp: &str) -> &str {
	stamp.split(['T', ' ']).next().unwrap_or(stamp)
}

/// Bucket `links` by the day of their latest observation.
pub fn timeline(links: &[Link]) -> Timeline {
	let mut days: BTreeMap<&str, usize> = BTreeMap::new();
	let mut undated = 0;
	for link in links {
		match latest_date(link) {
			Some(stamp) => *days.entry(day_of(stamp)).or_default() += 1,
			None => undated += 1,
		}
	}
	let max_count = days.values().copied().max().unwrap_or(0).max(1);
	Timeline {
		days: days
			.into_iter()
			.map(|(day, count)| DayCount {
				day: day.to_string(),
				count,
			})
			.collect(),
		undated,
		max_count,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dated(dates: &[&str]) -> Link {
		Link {
			date: Some(dates.iter().map(|d| d.to_string()).collect()),
			..Link::new("a", "b", "Retweets", 1.0)
		}
	}

	#[test]
	fn latest_observation_wins() {
		let link = dated(&["2023-04-02T10:00:00", "2023-05-01T08:00:00", "2023-04-30"]);
		assert_eq!(latest_date(&link), Some("2023-05-01T08:00:00"));
		assert_eq!(latest_date(&dated(&[])), None);
		assert_eq!(latest_date(&Link::new("a", "b", "X", 1.0)), None);
	}

	#[test]
	fn days_are_chronological_and_undated_counted_apart() {
		let links = [
			dated(&["2023-05-02T09:00:00"]),
			dated(&["2023-05-01T23:59:59"]),
			dated(&["2023-05-02 12:00:00", "2023-04-01"]),
			Link::new("c", "d", "Menciones", 0.3),
		];
		let t = timeline(&links);
		let days: Vec<_> = t.days.iter().map(|d| (d.day.as_str(), d.count)).collect();
		assert_eq!(days, [("2023-05-01", 1), ("2023-05-02", 2)]);
		assert_eq!(t.undated, 1);
		assert_eq!(t.max_count, 2);
	}

	#[test]
	fn empty_input_keeps_a_positive_scale() {
		let t = timeline(&[]);
		assert!(t.days.is_empty());
		assert_eq!(t.max_count, 1);
	}
}
