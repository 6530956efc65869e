mod alert;
pub mod force_graph;
mod heuristic_panel;
mod node_search;
mod progress;
mod selected_node;
mod timeline;
mod top_bar;
mod topic_dialog;

pub use alert::ErrorAlert;
pub use heuristic_panel::HeuristicPanel;
pub use progress::ProgressFeedback;
pub use selected_node::SelectedNodePanel;
pub use timeline::TimelineChart;
pub use top_bar::TopBar;
