//! Graph-state reconciliation: heuristic edge lists in, filtered view out.
//!
//! Every transform here is pure; [`Dashboard`] owns the one mutable
//! snapshot and replaces its parts after each event.

mod attributes;
mod error;
mod export;
mod focus;
mod histogram;
mod ingest;
mod model;
mod progress;
mod registry;
mod session;
mod timeline;
mod view;

pub use attributes::{ScalarAttribute, merge_scalar_attribute};
pub use error::{ExportError, GraphStateError};
pub use export::{ExportArchive, export_archive, links_csv, nodes_csv};
pub use focus::{FocusState, InfluenceEntry, NodeIndex, focused_influence_list};
pub use histogram::{Bin, Histogram, NodeAttribute, attribute_available, histogram};
pub use ingest::{Ingested, LayoutSpace, ingest};
pub use model::{Heuristic, Link, Node, Position, initialize_nodes};
pub use progress::{AffinityProgress, StanceProgress, StanceTime};
pub use registry::{ActiveCategories, CategoryEntry, CategoryRegistry, SYMMETRIC_CATEGORIES};
pub use session::{Applied, Dashboard, Generation};
pub use timeline::{DayCount, Timeline, latest_date, timeline};
pub use view::{ActiveView, recompute_view};
