//! # Points Generator Module
//!
//! Synthetic point tables and labeled sets for testing and benchmarking graph
//! construction.
//!
//! ## Supported Layouts
//!
//! - **Uniform**: points spread uniformly over a hypercube, classes by slab
//! - **Blobs**: one dense cluster per class
//! - **Rings**: concentric noisy rings, one per class (needs 2+ dimensions)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::dataset::ObjectId;
use crate::error::{GraphError, Result};

/// Side length of the region points are generated in.
const EXTENT: f64 = 10.0;

/// Generated table together with the class of every point and a labeled subset.
#[derive(Debug, Clone)]
pub struct PointsData {
    /// Attribute vectors, one per point
    pub rows: Vec<Vec<f64>>,
    /// Ground-truth class of every point
    pub classes: Vec<usize>,
    /// Ids chosen as labeled, ascending
    pub labeled: Vec<ObjectId>,
}

/// Supported point layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLayout {
    Uniform,
    Blobs,
    Rings,
}

impl FromStr for PointLayout {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" => Ok(PointLayout::Uniform),
            "blobs" => Ok(PointLayout::Blobs),
            "rings" => Ok(PointLayout::Rings),
            _ => Err(GraphError::InvalidParameter(format!("unknown layout '{s}'"))),
        }
    }
}

/// Generator for point clouds with different layouts
pub struct PointsGenerator {
    num_points: usize,
    dimensions: usize,
    layout: PointLayout,
}

impl PointsGenerator {
    /// Creates a new points generator
    ///
    /// # Arguments
    ///
    /// * `num_points` - Number of points
    /// * `dimensions` - Attributes per point
    /// * `layout` - Spatial layout of the classes
    pub fn new(num_points: usize, dimensions: usize, layout: PointLayout) -> Self {
        PointsGenerator {
            num_points,
            dimensions,
            layout,
        }
    }

    /// Generates points with the thread-local RNG.
    pub fn generate(&self, num_classes: usize, labeled_fraction: f64) -> Result<PointsData> {
        self.generate_with_rng(&mut rand::thread_rng(), num_classes, labeled_fraction)
    }

    /// Generates points and a labeled subset
    ///
    /// # Arguments
    ///
    /// * `num_classes` - Number of classes (clusters, rings or slabs)
    /// * `labeled_fraction` - Fraction of points to label (0.0 to 1.0)
    pub fn generate_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        num_classes: usize,
        labeled_fraction: f64,
    ) -> Result<PointsData> {
        if self.num_points == 0 || self.dimensions == 0 || num_classes == 0 {
            return Err(GraphError::InvalidParameter(
                "points, dimensions and classes must all be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&labeled_fraction) {
            return Err(GraphError::InvalidParameter(format!(
                "labeled fraction must be between 0.0 and 1.0, got {labeled_fraction}"
            )));
        }

        let (rows, classes) = match self.layout {
            PointLayout::Uniform => self.generate_uniform(rng, num_classes),
            PointLayout::Blobs => self.generate_blobs(rng, num_classes, 1.0),
            PointLayout::Rings => self.generate_rings(rng, num_classes, 0.15)?,
        };
        let labeled = generate_labeled(rng, &classes, num_classes, labeled_fraction);

        Ok(PointsData {
            rows,
            classes,
            labeled,
        })
    }

    /// Uniform points; the class is the slab of the first coordinate.
    fn generate_uniform<R: Rng>(&self, rng: &mut R, num_classes: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
        let mut rows = Vec::with_capacity(self.num_points);
        let mut classes = Vec::with_capacity(self.num_points);

        for _ in 0..self.num_points {
            let row: Vec<f64> = (0..self.dimensions).map(|_| rng.gen_range(0.0..EXTENT)).collect();
            let class = ((row[0] / EXTENT) * num_classes as f64) as usize;
            classes.push(class.min(num_classes - 1));
            rows.push(row);
        }

        (rows, classes)
    }

    /// One cluster per class around a random center.
    ///
    /// * `spread` - Half-width of the box points are drawn from around their center
    fn generate_blobs<R: Rng>(
        &self,
        rng: &mut R,
        num_classes: usize,
        spread: f64,
    ) -> (Vec<Vec<f64>>, Vec<usize>) {
        let side = EXTENT * num_classes as f64;
        let centers: Vec<Vec<f64>> = (0..num_classes)
            .map(|_| (0..self.dimensions).map(|_| rng.gen_range(0.0..side)).collect())
            .collect();

        let mut rows = Vec::with_capacity(self.num_points);
        let mut classes = Vec::with_capacity(self.num_points);

        // Round-robin over classes keeps them balanced
        for i in 0..self.num_points {
            let class = i % num_classes;
            let row = centers[class]
                .iter()
                .map(|&c| c + rng.gen_range(-spread..spread))
                .collect();
            rows.push(row);
            classes.push(class);
        }

        (rows, classes)
    }

    /// Concentric rings in the first two dimensions, noise in the others.
    fn generate_rings<R: Rng>(
        &self,
        rng: &mut R,
        num_classes: usize,
        noise: f64,
    ) -> Result<(Vec<Vec<f64>>, Vec<usize>)> {
        if self.dimensions < 2 {
            return Err(GraphError::InvalidParameter(
                "rings layout needs at least 2 dimensions".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(self.num_points);
        let mut classes = Vec::with_capacity(self.num_points);

        for i in 0..self.num_points {
            let class = i % num_classes;
            let radius = 2.0 * (class + 1) as f64;
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);

            let mut row = Vec::with_capacity(self.dimensions);
            row.push(radius * angle.cos() + rng.gen_range(-noise..noise));
            row.push(radius * angle.sin() + rng.gen_range(-noise..noise));
            row.extend((2..self.dimensions).map(|_| rng.gen_range(-noise..noise)));

            rows.push(row);
            classes.push(class);
        }

        Ok((rows, classes))
    }
}

/// Picks `ceil(n * fraction)` labeled points spread evenly over the classes.
///
/// The last class takes the remainder; a class with too few members gives
/// what it has.
fn generate_labeled<R: Rng>(
    rng: &mut R,
    classes: &[usize],
    num_classes: usize,
    fraction: f64,
) -> Vec<ObjectId> {
    let num_to_label = (classes.len() as f64 * fraction).ceil() as usize;
    let per_class = num_to_label / num_classes;

    let mut members: Vec<Vec<ObjectId>> = vec![Vec::new(); num_classes];
    for (id, &class) in classes.iter().enumerate() {
        members[class].push(id as ObjectId);
    }

    let mut labeled = Vec::with_capacity(num_to_label);
    for (class, pool) in members.iter_mut().enumerate() {
        let count = if class == num_classes - 1 {
            num_to_label - per_class * (num_classes - 1)
        } else {
            per_class
        };
        pool.shuffle(rng);
        labeled.extend(pool.iter().take(count));
    }

    labeled.sort_unstable();
    labeled
}

/// Saves the table (class as last column) and the labeled ids
///
/// # Arguments
///
/// * `data` - Generated points
/// * `table_path` - Space-separated table, one point per line
/// * `labels_path` - One labeled id per line
pub fn save_points(data: &PointsData, table_path: impl AsRef<Path>, labels_path: impl AsRef<Path>) -> Result<()> {
    let mut table = BufWriter::new(File::create(table_path)?);
    for (row, class) in data.rows.iter().zip(&data.classes) {
        for value in row {
            write!(table, "{value} ")?;
        }
        writeln!(table, "{class}")?;
    }
    table.flush()?;

    let mut labels = BufWriter::new(File::create(labels_path)?);
    for id in &data.labeled {
        writeln!(labels, "{id}")?;
    }
    labels.flush()?;
    Ok(())
}
