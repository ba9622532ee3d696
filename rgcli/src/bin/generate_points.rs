//! # Points Generator CLI
//!
//! Command-line tool for generating synthetic point tables and labeled sets
//! to feed the graph construction CLI.
//!
//! ## Usage
//!
//! ```bash
//! generate_points <layout> <num_points> <dimensions> <num_classes> <labeled_fraction> <table_file> <labels_file>
//! ```
//!
//! ## Layouts
//!
//! - `uniform`: uniform hypercube, classes by slab
//! - `blobs`: one cluster per class
//! - `rings`: concentric rings, one per class

use std::env;
use std::time::Instant;

use rgcli::points_generator::{save_points, PointLayout, PointsGenerator};

/// Prints usage information for the command-line interface
fn print_usage() {
    println!("Usage: generate_points <layout> <num_points> <dimensions> <num_classes> <labeled_fraction> <table_file> <labels_file>");
    println!("\nLayouts:");
    println!("  uniform  - Uniform points, classes by slab of the first attribute");
    println!("  blobs    - One dense cluster per class");
    println!("  rings    - Concentric noisy rings (2+ dimensions)");
    println!("\nArguments:");
    println!("  num_points        - Number of points");
    println!("  dimensions        - Attributes per point");
    println!("  num_classes       - Number of classes");
    println!("  labeled_fraction  - Fraction of points to label (0.0-1.0)");
    println!("  table_file        - Output table (class in the last column)");
    println!("  labels_file       - Output labeled ids, one per line");
    println!("\nExample:");
    println!("  generate_points blobs 1000 2 3 0.05 points.txt labels.txt");
}

fn parse_arg<T: std::str::FromStr>(value: &str, name: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Error: invalid {name} '{value}'");
            std::process::exit(1);
        }
    }
}

fn main() {
    let start_time = Instant::now();
    let args: Vec<String> = env::args().collect();

    if args.len() != 8 {
        print_usage();
        std::process::exit(1);
    }

    let layout: PointLayout = match args[1].parse() {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Error: {e}");
            print_usage();
            std::process::exit(1);
        }
    };
    let num_points: usize = parse_arg(&args[2], "number of points");
    let dimensions: usize = parse_arg(&args[3], "dimensions");
    let num_classes: usize = parse_arg(&args[4], "number of classes");
    let labeled_fraction: f64 = parse_arg(&args[5], "labeled fraction");
    let table_file = &args[6];
    let labels_file = &args[7];

    println!("Generating {} points ({:?}, {} dimensions, {} classes)...", num_points, layout, dimensions, num_classes);

    let generator = PointsGenerator::new(num_points, dimensions, layout);
    let data = match generator.generate(num_classes, labeled_fraction) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Dataset statistics:");
    println!("  Points: {}", data.rows.len());
    println!("  Labeled points: {}", data.labeled.len());
    println!("  Classes: {}", num_classes);

    match save_points(&data, table_file, labels_file) {
        Ok(()) => println!("\nTable saved to {}, labels saved to {}", table_file, labels_file),
        Err(e) => {
            eprintln!("Error saving points: {}", e);
            std::process::exit(1);
        }
    }

    let elapsed = start_time.elapsed();
    println!("\nTotal execution time: {:.3}s ({:.2}ms)", elapsed.as_secs_f64(), elapsed.as_micros() as f64 / 1000.0);
}
