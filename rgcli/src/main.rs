//! # Graph Construction CLI
//!
//! Builds a kNN, mutual kNN, GBILI or RGCLI graph from a point table and
//! writes it as an `ncol` or `pajek` edge list.
//!
//! ## Usage
//!
//! ```bash
//! rgcli -f points.txt -l labels.txt --ke 20 --ki 2 -t 4 -e pajek
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use rgcli::io::{read_labeled_ids, read_table, write_edges, TableOptions};
use rgcli::{GraphBuilder, GraphConfig, GraphError, OutputFormat, Result, Variant};

/// Graph Based on Informativeness of Labeled Instances
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Point table to load
    #[arg(short = 'f', long, value_name = "FILE")]
    filename: PathBuf,

    /// Labeled object ids, one per line (required by gbili and rgcli)
    #[arg(short = 'l', long, value_name = "FILE")]
    label: Option<PathBuf>,

    /// Output directory (default: directory of the input file)
    #[arg(short = 'd', long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Output file name, without extension
    #[arg(short = 'o', long, value_name = "NAME")]
    output: Option<String>,

    /// Output format: ncol or pajek
    #[arg(short = 'e', long, default_value = "ncol")]
    format: String,

    /// Construction variant: knn, mutual-knn, gbili or rgcli
    #[arg(short = 'a', long)]
    variant: Option<String>,

    /// Neighbors per object in the initial kNN query
    #[arg(short = 'k', long = "ke", visible_alias = "k")]
    ke: Option<usize>,

    /// Mutual neighbors kept per object by gbili and rgcli
    #[arg(short = 'i', long)]
    ki: Option<usize>,

    /// Number of worker threads
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Drop the last column of the table (e.g. a class label)
    #[arg(short = 'c', long)]
    skip_last_column: bool,

    /// Leading rows of the table to ignore
    #[arg(short = 'r', long, default_value = "0")]
    skip_rows: usize,

    /// Column delimiter (default: sniffed from the first line)
    #[arg(long)]
    delimiter: Option<char>,

    /// JSON parameter file; explicit flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep one undirected edge per pair
    #[arg(long)]
    simplify: bool,

    /// Print a JSON run summary to stdout
    #[arg(long)]
    report: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn resolve_config(args: &Args) -> Result<GraphConfig> {
    let mut config = match &args.config {
        Some(path) => GraphConfig::from_json_file(path)?,
        None => GraphConfig::default(),
    };
    if let Some(variant) = &args.variant {
        config.variant = variant.parse()?;
    }
    if let Some(ke) = args.ke {
        config.k = ke;
    }
    if let Some(ki) = args.ki {
        config.ki = ki;
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }
    Ok(config)
}

/// `<dir>/<stem>-<variant>_<ki>_<ke>.<ext>`, or `<dir>/<output>.<ext>` when a name is given.
fn output_path(args: &Args, config: &GraphConfig, format: OutputFormat) -> Result<PathBuf> {
    let directory = match &args.directory {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => args
            .filename
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let ext = format.extension();
    let name = match &args.output {
        Some(name) => format!("{name}.{ext}"),
        None => {
            let stem = args
                .filename
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("graph");
            if config.variant.uses_labels() {
                format!("{stem}-{}_{}_{}.{ext}", config.variant, config.ki, config.k)
            } else {
                format!("{stem}-{}_{}.{ext}", config.variant, config.k)
            }
        }
    };

    Ok(directory.join(name))
}

fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    // Configuration errors fail before touching the data
    let format: OutputFormat = args.format.parse()?;
    let config = resolve_config(&args)?;
    let builder = GraphBuilder::new(config.clone())?;
    let variant: Variant = config.variant;
    if variant.uses_labels() && args.label.is_none() {
        return Err(GraphError::InvalidParameter(format!(
            "variant {variant} requires a label file (-l)"
        )));
    }
    let output = output_path(&args, &config, format)?;

    let start_load = Instant::now();
    let options = TableOptions {
        delimiter: args.delimiter,
        skip_last_column: args.skip_last_column,
        skip_rows: args.skip_rows,
    };
    let data = Arc::new(read_table(&args.filename, &options)?);
    let labeled = match &args.label {
        Some(path) => read_labeled_ids(path)?,
        None => Vec::new(),
    };
    let load_duration = start_load.elapsed();
    info!(
        "loaded {} objects x {} attributes and {} labeled ids from {}",
        data.len(),
        data.dimensions(),
        labeled.len(),
        args.filename.display()
    );

    let start_build = Instant::now();
    let mut edges = builder.build(Arc::clone(&data), &labeled)?;
    if args.simplify {
        edges = edges.simplified();
    }
    let build_duration = start_build.elapsed();

    let start_write = Instant::now();
    write_edges(&output, format, data.len(), &edges)?;
    let write_duration = start_write.elapsed();
    info!("wrote {} edges to {}", edges.len(), output.display());

    if args.report {
        let report = serde_json::json!({
            "objects": data.len(),
            "dimensions": data.dimensions(),
            "labeled": labeled.len(),
            "variant": variant.as_str(),
            "k": config.k,
            "ki": config.ki,
            "threads": config.threads,
            "edges": edges.len(),
            "load_time_ms": load_duration.as_millis(),
            "build_time_ms": build_duration.as_millis(),
            "write_time_ms": write_duration.as_millis(),
            "total_time_ms": start_time.elapsed().as_millis(),
            "output": output.display().to_string(),
        });
        println!("{report}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rgcli").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "variant": "gbili", "ke": 7, "ki": 3, "threads": 2 }}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let config = resolve_config(&args(&["-f", "points.txt", "--config", path, "-i", "5"])).unwrap();
        assert_eq!(config, GraphConfig::new(Variant::Gbili, 7, 5, 2));

        let config = resolve_config(&args(&["-f", "points.txt", "--config", path, "-a", "knn", "--ke", "9", "-t", "6"])).unwrap();
        assert_eq!(config, GraphConfig::new(Variant::Knn, 9, 3, 6));
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = resolve_config(&args(&["-f", "points.txt"])).unwrap();
        assert_eq!(config, GraphConfig::default());

        let config = resolve_config(&args(&["-f", "points.txt", "--k", "4"])).unwrap();
        assert_eq!(config.k, 4);
    }

    #[test]
    fn test_default_output_names() {
        let a = args(&["-f", "data/iris.csv", "-a", "rgcli", "-k", "10", "-i", "3"]);
        let config = resolve_config(&a).unwrap();
        assert_eq!(
            output_path(&a, &config, OutputFormat::Ncol).unwrap(),
            PathBuf::from("data/iris-rgcli_3_10.ncol")
        );

        let a = args(&["-f", "iris.csv", "-a", "mutual", "-k", "10", "-i", "3"]);
        let config = resolve_config(&a).unwrap();
        assert_eq!(
            output_path(&a, &config, OutputFormat::Pajek).unwrap(),
            PathBuf::from("./iris-mutual-knn_10.pajek")
        );
    }

    #[test]
    fn test_explicit_output_in_created_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("graphs").join("run1");
        let a = args(&["-f", "iris.csv", "-d", dir.to_str().unwrap(), "-o", "mygraph"]);
        let config = resolve_config(&a).unwrap();

        let path = output_path(&a, &config, OutputFormat::Pajek).unwrap();
        assert_eq!(path, dir.join("mygraph.pajek"));
        assert!(dir.is_dir(), "output directory must be created");
    }

    #[test]
    fn test_unsupported_format_fails_before_loading() {
        let result = run(args(&["-f", "missing.txt", "-e", "graphml"]));
        assert!(matches!(result, Err(GraphError::UnsupportedFormat(f)) if f == "graphml"));
    }

    #[test]
    fn test_informative_variant_requires_label_file() {
        let result = run(args(&["-f", "missing.txt", "-a", "gbili"]));
        assert!(matches!(result, Err(GraphError::InvalidParameter(_))));
    }

    #[test]
    fn test_run_writes_graph() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("line.txt");
        let labels = dir.path().join("labels.txt");
        fs::write(&table, "0 9\n1 9\n2 9\n10 9\n").unwrap();
        fs::write(&labels, "0\n").unwrap();

        run(args(&[
            "-f",
            table.to_str().unwrap(),
            "-l",
            labels.to_str().unwrap(),
            "-c",
            "-a",
            "mutual-knn",
            "-k",
            "1",
            "-t",
            "2",
        ]))
        .unwrap();

        let written = fs::read_to_string(dir.path().join("line-mutual-knn_1.ncol")).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
