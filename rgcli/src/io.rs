//! Reading point tables and labeled ids, writing edge lists.
//!
//! ## Input
//!
//! - Point table: one object per line, numeric cells. The delimiter is sniffed
//!   on the first data line (`,` `\t` `;` `|`, otherwise whitespace) unless it
//!   is fixed in [`TableOptions`]. A trailing class column can be dropped.
//! - Labeled ids: one 0-based object id per line.
//!
//! ## Output
//!
//! - `ncol`: `<u> <v> <weight>` per edge, 0-based ids.
//! - `pajek`: `*Vertices N`, one `<i+1> "<i>"` line per object, `*Edges`,
//!   then `<u+1> <v+1> <weight>` per edge.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::config::OutputFormat;
use crate::dataset::{Dataset, ObjectId};
use crate::edge::EdgeList;
use crate::error::{GraphError, Result};

/// Delimiters tried, in order, when sniffing a table.
const SNIFF_CANDIDATES: [char; 4] = [',', '\t', ';', '|'];

/// How to read a point table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOptions {
    /// Fixed delimiter; `None` sniffs it, falling back to whitespace
    pub delimiter: Option<char>,
    /// Drop the last column of every row (e.g. a class label)
    pub skip_last_column: bool,
    /// Leading lines to ignore (headers)
    pub skip_rows: usize,
}

/// Delimiter of a table line, `None` meaning runs of whitespace.
pub fn sniff_delimiter(line: &str) -> Option<char> {
    SNIFF_CANDIDATES.iter().copied().find(|&c| line.contains(c))
}

fn split_cells<'a>(line: &'a str, delimiter: Option<char>) -> Vec<&'a str> {
    match delimiter {
        Some(c) if !c.is_whitespace() => line.split(c).map(str::trim).collect(),
        Some(c) => line.split(c).filter(|s| !s.is_empty()).collect(),
        None => line.split_whitespace().collect(),
    }
}

/// Parses a point table from any reader.
pub fn parse_table<R: BufRead>(reader: R, options: &TableOptions) -> Result<Dataset> {
    let mut delimiter = options.delimiter;
    let mut sniffed = options.delimiter.is_some();
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(options.skip_rows) {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        if !sniffed {
            delimiter = sniff_delimiter(&line);
            sniffed = true;
        }

        let mut cells = split_cells(&line, delimiter);
        if options.skip_last_column {
            cells.pop();
        }

        let mut row = Vec::with_capacity(cells.len());
        for cell in cells {
            let value: f64 = cell.parse().map_err(|_| GraphError::Parse {
                line: line_no,
                message: format!("invalid number '{cell}'"),
            })?;
            if !value.is_finite() {
                return Err(GraphError::Parse {
                    line: line_no,
                    message: format!("non-finite value '{cell}'"),
                });
            }
            row.push(value);
        }
        rows.push(row);
    }

    Dataset::from_rows(rows)
}

/// Reads a point table from a file.
pub fn read_table(path: impl AsRef<Path>, options: &TableOptions) -> Result<Dataset> {
    let file = File::open(path)?;
    parse_table(BufReader::new(file), options)
}

/// Parses one object id per non-blank line.
pub fn parse_labeled_ids<R: BufRead>(reader: R) -> Result<Vec<ObjectId>> {
    let mut ids = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let id = trimmed.parse::<ObjectId>().map_err(|_| GraphError::Parse {
            line: idx + 1,
            message: format!("invalid object id '{trimmed}'"),
        })?;
        ids.push(id);
    }
    Ok(ids)
}

/// Reads a labeled-id file.
pub fn read_labeled_ids(path: impl AsRef<Path>) -> Result<Vec<ObjectId>> {
    let file = File::open(path)?;
    parse_labeled_ids(BufReader::new(file))
}

/// Writes edges as `<u> <v> <weight>` lines.
pub fn write_ncol<W: Write>(writer: &mut W, edges: &EdgeList) -> Result<()> {
    for e in edges {
        writeln!(writer, "{} {} {}", e.source, e.target, e.weight)?;
    }
    Ok(())
}

/// Writes a Pajek network with `object_count` vertices and 1-based edge ids.
pub fn write_pajek<W: Write>(writer: &mut W, object_count: usize, edges: &EdgeList) -> Result<()> {
    writeln!(writer, "*Vertices {object_count}")?;
    for i in 0..object_count {
        writeln!(writer, "{} \"{}\"", i + 1, i)?;
    }
    writeln!(writer, "*Edges")?;
    for e in edges {
        writeln!(writer, "{} {} {}", e.source as u64 + 1, e.target as u64 + 1, e.weight)?;
    }
    Ok(())
}

/// Writes an edge list file in the requested format.
pub fn write_edges(
    path: impl AsRef<Path>,
    format: OutputFormat,
    object_count: usize,
    edges: &EdgeList,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Ncol => write_ncol(&mut writer, edges)?,
        OutputFormat::Pajek => write_pajek(&mut writer, object_count, edges)?,
    }
    writer.flush()?;
    Ok(())
}
