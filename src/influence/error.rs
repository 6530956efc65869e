use thiserror::Error;

use super::model::Heuristic;

/// Failures of the graph-state reconciliation core.
#[derive(Debug, Error)]
pub enum GraphStateError {
	/// A toggle referenced a category the registry has never seen.
	#[error("category not found in registry: {0}")]
	CategoryNotFound(String),

	/// The selected heuristic has not delivered any edges yet.
	#[error("heuristic {} has no edges to display", .0.label())]
	EmptyHeuristic(Heuristic),

	/// A payload key did not name any known heuristic.
	#[error("unknown heuristic key: {0}")]
	UnknownHeuristic(String),

	/// Building the download archive failed.
	#[error(transparent)]
	Export(#[from] ExportError),
}

/// Failures while serializing the current graph for download.
#[derive(Debug, Error)]
pub enum ExportError {
	/// Writing a CSV row failed.
	#[error("csv write failed: {0}")]
	Csv(#[from] csv::Error),

	/// Flushing the CSV writer or writing the archive failed.
	#[error("archive write failed: {0}")]
	Io(#[from] std::io::Error),

	/// The CSV writer could not hand back its buffer.
	#[error("csv buffer could not be recovered: {0}")]
	Buffer(String),

	/// There is nothing on screen to export.
	#[error("nothing to export: the graph has no nodes or no visible edges")]
	Empty,
}
