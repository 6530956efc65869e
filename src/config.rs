//! Build-time configuration of the dashboard.

use force_graph::SimulationParameters;

use crate::influence::LayoutSpace;

const DEFAULT_BACKEND_URL: &str = "ws://localhost:5000/socket.io/?EIO=4&transport=websocket";

/// Everything the dashboard needs to know about its environment.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardConfig {
	/// Socket.IO endpoint of the compute backend, websocket transport.
	pub backend_url: String,
	/// Longest accepted analysis topic, in characters.
	pub topic_max_chars: usize,
	/// Longest accepted neutral context, in characters.
	pub context_max_chars: usize,
	/// Region fresh nodes are scattered over.
	pub layout: LayoutSpace,
	/// Seconds a preprocessing alert stays up.
	pub alert_seconds: u32,
}

impl Default for DashboardConfig {
	fn default() -> Self {
		Self {
			backend_url: option_env!("INFLUENCE_BACKEND_URL")
				.unwrap_or(DEFAULT_BACKEND_URL)
				.to_string(),
			topic_max_chars: 60,
			context_max_chars: 200,
			layout: LayoutSpace::default(),
			alert_seconds: 30,
		}
	}
}

impl DashboardConfig {
	/// Physics of the canvas layout.
	pub fn simulation(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: 200.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.5,
		}
	}
}
