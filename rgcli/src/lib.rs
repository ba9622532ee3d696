//! # Similarity Graph Construction Library
//!
//! This library builds sparse weighted graphs from tabular point data for
//! graph-based semi-supervised learning. Every row of a table is an object;
//! each object is connected to a few relevant neighbors and the result is an
//! edge list with similarity weights `1 / (1 + distance)`.
//!
//! ## Variants
//!
//! - **kNN**: every object linked to its k nearest neighbors
//! - **Mutual kNN**: only pairs that are in each other's k nearest neighbors
//! - **GBILI / RGCLI**: mutual neighbors ranked by how close they are to a
//!   labeled object, keeping the `ki` best per object
//!
//! ## Features
//!
//! - **Exact**: neighbors come from an exact K-D tree, ties broken by row order
//! - **Parallel**: two fork-join phases over contiguous partitions of the ids
//! - **Deterministic**: the edge set does not depend on the thread count
//!
//! ```no_run
//! use rgcli::{build_graph, GraphConfig, Variant};
//! use rgcli::io::{read_labeled_ids, read_table, TableOptions};
//!
//! let data = read_table("points.txt", &TableOptions::default())?;
//! let labeled = read_labeled_ids("labels.txt")?;
//! let edges = build_graph(data, &labeled, &GraphConfig::new(Variant::Rgcli, 20, 2, 4))?;
//! println!("{} edges", edges.len());
//! # Ok::<(), rgcli::GraphError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod edge;
pub mod error;
pub mod index;
pub mod io;
pub mod mutual;
pub mod neighbors;
pub mod partition;
pub mod pipeline;
pub mod points_generator;
pub mod proximity;

pub use config::{GraphConfig, OutputFormat, Variant};
pub use dataset::{Dataset, ObjectId};
pub use edge::{weight, Edge, EdgeList};
pub use error::{GraphError, Result};
pub use index::{KdTree, Neighbor};
pub use pipeline::{build_graph, GraphBuilder, NeighborData};
