#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub radius: f64,
	/// Layout position to start from when the node is new to the canvas.
	pub position: Option<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub color: String,
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub directed: bool,
	pub focused: Option<String>,
	/// Both endpoints of one influence edge, lit together.
	pub pair: Option<(String, String)>,
}

impl Default for GraphData {
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			links: Vec::new(),
			directed: true,
			focused: None,
			pair: None,
		}
	}
}
