//! Graph construction parameters.
//!
//! Parameters can come from a JSON parameter file (see
//! [`GraphConfig::from_json_file`]) and are overridden by explicit command-line
//! values in the `rgcli` binary.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Default neighbor count (`ke`).
pub const DEFAULT_K: usize = 20;
/// Default semi-supervised retention count.
pub const DEFAULT_KI: usize = 2;
/// Default number of worker threads.
pub const DEFAULT_THREADS: usize = 4;

/// Graph construction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Every object linked to its k nearest neighbors
    Knn,
    /// Only symmetric k-nearest-neighbor relations
    MutualKnn,
    /// Graph Based on Informativeness of Labeled Instances
    Gbili,
    /// Robust Graph that Considers Labeled Instances
    Rgcli,
}

impl Variant {
    /// Whether the variant ranks mutual neighbors by proximity to labeled objects.
    pub fn uses_labels(self) -> bool {
        matches!(self, Variant::Gbili | Variant::Rgcli)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Knn => "knn",
            Variant::MutualKnn => "mutual-knn",
            Variant::Gbili => "gbili",
            Variant::Rgcli => "rgcli",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "knn" => Ok(Variant::Knn),
            "mutual-knn" | "mutual_knn" | "mutual" | "mknn" => Ok(Variant::MutualKnn),
            "gbili" => Ok(Variant::Gbili),
            "rgcli" => Ok(Variant::Rgcli),
            _ => Err(GraphError::UnknownVariant(s.to_string())),
        }
    }
}

/// Edge list output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<u> <v> <weight>` per line, 0-based ids
    Ncol,
    /// Pajek `*Vertices` / `*Edges` sections, 1-based ids
    Pajek,
}

impl OutputFormat {
    /// File extension, also used as the format name.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Ncol => "ncol",
            OutputFormat::Pajek => "pajek",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ncol" => Ok(OutputFormat::Ncol),
            "pajek" => Ok(OutputFormat::Pajek),
            _ => Err(GraphError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Parameters of one graph construction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Construction strategy
    pub variant: Variant,
    /// Neighbor count of the initial kNN query (`ke`)
    #[serde(alias = "ke")]
    pub k: usize,
    /// Mutual neighbors retained per object by GBILI/RGCLI
    pub ki: usize,
    /// Number of partitions, and of worker threads processing them
    pub threads: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            variant: Variant::Rgcli,
            k: DEFAULT_K,
            ki: DEFAULT_KI,
            threads: DEFAULT_THREADS,
        }
    }
}

impl GraphConfig {
    pub fn new(variant: Variant, k: usize, ki: usize, threads: usize) -> Self {
        GraphConfig {
            variant,
            k,
            ki,
            threads,
        }
    }

    /// Loads parameters from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Rejects parameter combinations the builder cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(GraphError::InvalidParameter("k must be at least 1".to_string()));
        }
        if self.threads == 0 {
            return Err(GraphError::InvalidParameter(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.variant.uses_labels() && self.ki == 0 {
            return Err(GraphError::InvalidParameter(format!(
                "ki must be at least 1 for {}",
                self.variant
            )));
        }
        Ok(())
    }
}
