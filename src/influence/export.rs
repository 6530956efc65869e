//! Download of the graph currently on screen.
//!
//! Two CSV tables (nodes and visible edges) packed into a gzipped tarball.
//! Edges of symmetric categories are stored once per pair in memory and
//! written in both directions here.

use csv::{QuoteStyle, WriterBuilder};
use flate2::Compression;
use flate2::write::GzEncoder;
use log::info;

use super::error::ExportError;
use super::model::{Link, Node};
use super::registry::CategoryRegistry;

const LIST_SEPARATOR: &str = ";";

/// A ready-to-save archive.
#[derive(Clone, Debug)]
pub struct ExportArchive {
	/// Suggested download name.
	pub file_name: String,
	/// Gzipped tar bytes.
	pub bytes: Vec<u8>,
}

fn optional(value: Option<f64>) -> String {
	value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
	writer
		.into_inner()
		.map_err(|e| ExportError::Buffer(e.to_string()))
}

fn writer() -> csv::Writer<Vec<u8>> {
	WriterBuilder::new()
		.quote_style(QuoteStyle::NonNumeric)
		.from_writer(Vec::new())
}

/// Node table: `id,outDegree,x,y,belief,confidence`.
pub fn nodes_csv(nodes: &[Node]) -> Result<Vec<u8>, ExportError> {
	let mut w = writer();
	w.write_record(["id", "outDegree", "x", "y", "belief", "confidence"])?;
	for node in nodes {
		let (x, y) = node
			.position
			.map(|p| (Some(p.x), Some(p.y)))
			.unwrap_or_default();
		w.write_record([
			node.id.clone(),
			node.out_degree.to_string(),
			optional(x),
			optional(y),
			optional(node.belief),
			optional(node.confidence),
		])?;
	}
	finish(w)
}

/// Edge table: `source,target,influenceValue,link_name,date`.
///
/// Dates are joined with `;` into a single quoted field.
pub fn links_csv(links: &[Link], registry: &CategoryRegistry) -> Result<Vec<u8>, ExportError> {
	let mut w = writer();
	w.write_record(["source", "target", "influenceValue", "link_name", "date"])?;
	for link in links {
		let both = registry.is_symmetric(&link.category);
		let reversed = both.then(|| link.reversed());
		for l in std::iter::once(link).chain(reversed.as_ref()) {
			w.write_record([
				l.source.clone(),
				l.target.clone(),
				l.influence_value.to_string(),
				l.category.clone(),
				l.date
					.as_deref()
					.map(|d| d.join(LIST_SEPARATOR))
					.unwrap_or_default(),
			])?;
		}
	}
	finish(w)
}

/// Pack `<label>-nodos.csv` and `<label>-aristas.csv` into `<label>.tar.gz`.
pub fn export_archive(
	label: &str,
	nodes: &[Node],
	links: &[Link],
	registry: &CategoryRegistry,
) -> Result<ExportArchive, ExportError> {
	if nodes.is_empty() || links.is_empty() {
		return Err(ExportError::Empty);
	}
	let files = [
		(format!("{label}-nodos.csv"), nodes_csv(nodes)?),
		(format!("{label}-aristas.csv"), links_csv(links, registry)?),
	];

	let mut tar = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
	for (name, data) in &files {
		let mut header = tar::Header::new_gnu();
		header.set_size(data.len() as u64);
		header.set_mode(0o644);
		header.set_mtime(0);
		header.set_cksum();
		tar.append_data(&mut header, name, data.as_slice())?;
	}
	let bytes = tar.into_inner()?.finish()?;
	info!("exported {} nodes and {} edges ({} bytes)", nodes.len(), links.len(), bytes.len());

	Ok(ExportArchive {
		file_name: format!("{label}.tar.gz"),
		bytes,
	})
}

#[cfg(test)]
mod tests {
	use std::io::Read;

	use flate2::read::GzDecoder;

	use super::*;
	use crate::influence::model::{Position, initialize_nodes};

	fn text(bytes: Vec<u8>) -> String {
		String::from_utf8(bytes).unwrap()
	}

	#[test]
	fn nodes_table_has_header_and_blank_optionals() {
		let mut nodes = initialize_nodes(["u1", "u2"]);
		nodes[0].out_degree = 3;
		nodes[0].belief = Some(0.5);
		nodes[0].position = Some(Position { x: 1.0, y: 2.0 });
		let csv = text(nodes_csv(&nodes).unwrap());
		let lines: Vec<_> = csv.lines().collect();
		assert_eq!(lines[0], r#""id","outDegree","x","y","belief","confidence""#);
		assert!(lines[1].starts_with(r#""u1",3,1,2,0.5,"#));
		assert_eq!(lines.len(), 3);
	}

	#[test]
	fn dates_are_semicolon_joined() {
		let mut link = Link::new("a", "b", "Retweets", 0.25);
		link.date = Some(vec!["2024-01-01".into(), "2024-02-01".into()]);
		let registry = CategoryRegistry::from_names(["Retweets"]);
		let csv = text(links_csv(&[link], &registry).unwrap());
		assert!(csv.contains(r#""a","b",0.25,"Retweets","2024-01-01;2024-02-01""#));
	}

	#[test]
	fn symmetric_edges_written_both_ways() {
		let links = vec![
			Link::new("a", "b", "Acuerdo/Desacuerdo", -0.5),
			Link::new("a", "c", "Retweets", 0.5),
		];
		let registry = CategoryRegistry::from_names(links.iter().map(|l| l.category.as_str()));
		let csv = text(links_csv(&links, &registry).unwrap());
		let rows: Vec<_> = csv.lines().skip(1).collect();
		assert_eq!(rows.len(), 3);
		assert!(rows[0].starts_with(r#""a","b""#));
		assert!(rows[1].starts_with(r#""b","a""#));
		assert!(rows[2].starts_with(r#""a","c""#));
	}

	#[test]
	fn archive_contains_both_tables() {
		let nodes = initialize_nodes(["a", "b"]);
		let links = vec![Link::new("a", "b", "Retweets", 1.0)];
		let registry = CategoryRegistry::from_names(["Retweets"]);
		let archive = export_archive("Interacciones", &nodes, &links, &registry).unwrap();
		assert_eq!(archive.file_name, "Interacciones.tar.gz");

		let mut tar = tar::Archive::new(GzDecoder::new(archive.bytes.as_slice()));
		let mut names = Vec::new();
		for entry in tar.entries().unwrap() {
			let mut entry = entry.unwrap();
			let mut body = String::new();
			entry.read_to_string(&mut body).unwrap();
			assert!(body.lines().count() >= 2);
			names.push(entry.path().unwrap().to_string_lossy().into_owned());
		}
		assert_eq!(names, ["Interacciones-nodos.csv", "Interacciones-aristas.csv"]);
	}

	#[test]
	fn refuses_empty_graph() {
		let registry = CategoryRegistry::default();
		assert!(matches!(
			export_archive("x", &[], &[], &registry),
			Err(ExportError::Empty)
		));
	}
}
