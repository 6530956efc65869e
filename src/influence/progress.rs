use serde::Deserialize;

/// Backend estimate announced when stance computation starts.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct StanceTime {
	/// Users whose stance is being computed.
	pub n_users: u64,
	/// Users that already had no stance to compute.
	pub null_stances: u64,
	/// Expected duration in seconds.
	pub estimated_time: f64,
	/// Batches the work is split into.
	pub n_batch: u64,
}

/// Client-side estimate of stance progress; the backend only reports start and end.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StanceProgress {
	/// Total users.
	pub users: u64,
	/// Estimated users done.
	pub progress: u64,
	/// Users already settled when the estimate started.
	pub processing: u64,
	/// Expected duration in seconds.
	pub estimated_time: f64,
	/// Batch count.
	pub batches: u64,
	/// Optimistic look-ahead shown as the buffer bar.
	pub buffer: u64,
	/// Indicator visible.
	pub open: bool,
}

impl StanceProgress {
	/// Start tracking from a backend estimate.
	pub fn start(time: StanceTime) -> Self {
		Self {
			users: time.n_users,
			progress: time.null_stances,
			processing: time.null_stances,
			estimated_time: time.estimated_time,
			batches: time.n_batch,
			buffer: time.null_stances,
			open: true,
		}
	}

	/// Advance the estimate by one second of wall time.
	pub fn tick(&mut self) {
		if !self.open || self.progress >= self.users {
			return;
		}
		let remaining = self.users.saturating_sub(self.processing) as f64;
		let step = (remaining / self.estimated_time.max(1.0)).ceil() as u64;
		self.progress = (self.progress + step).min(self.users);
		let ahead = self.progress as f64 * 1.25;
		self.buffer = if ahead <= self.users as f64 {
			(self.progress as f64 * 1.5) as u64
		} else {
			self.users
		};
	}

	/// Estimated completion, 0–100.
	pub fn percent(&self) -> f64 {
		percent(self.progress, self.users)
	}

	/// Look-ahead completion, 0–100.
	pub fn buffer_percent(&self) -> f64 {
		percent(self.buffer.min(self.users), self.users)
	}
}

fn percent(part: u64, whole: u64) -> f64 {
	if whole == 0 {
		0.0
	} else {
		(100.0 * part as f64 / whole as f64).round()
	}
}

/// Affinity computation progress as reported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AffinityProgress {
	/// Users being compared.
	pub users: u64,
	/// Fraction done, 0–1.
	pub progress: f64,
	/// Indicator visible.
	pub open: bool,
}

impl AffinityProgress {
	/// Completion, 0–100 with one decimal.
	pub fn percent(&self) -> f64 {
		(1000.0 * self.progress.clamp(0.0, 1.0)).round() / 10.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stance_estimate_advances_and_saturates() {
		let mut p = StanceProgress::start(StanceTime {
			n_users: 100,
			null_stances: 10,
			estimated_time: 30.0,
			n_batch: 4,
		});
		p.tick();
		assert_eq!(p.progress, 13);
		assert_eq!(p.buffer, 19);
		for _ in 0..100 {
			p.tick();
		}
		assert_eq!(p.progress, 100);
		assert_eq!(p.percent(), 100.0);
		assert!(p.buffer_percent() <= 100.0);
	}

	#[test]
	fn zero_users_do_not_divide_by_zero() {
		let mut p = StanceProgress::start(StanceTime {
			n_users: 0,
			null_stances: 0,
			estimated_time: 0.0,
			n_batch: 0,
		});
		p.tick();
		assert_eq!(p.percent(), 0.0);
	}

	#[test]
	fn affinity_percent_rounds_to_tenths() {
		let p = AffinityProgress {
			users: 5,
			progress: 0.1234,
			open: true,
		};
		assert_eq!(p.percent(), 12.3);
	}
}
