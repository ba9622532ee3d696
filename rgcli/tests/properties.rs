//! Property-based tests for graph construction.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Neighbor records are bounded, ascending and never contain the object
//! - The K-D tree agrees with a brute-force scan, ties included
//! - Mutual kNN edges are exactly the symmetric neighbor pairs
//! - Informative variants keep nested edge sets as `ki` grows
//! - The edge multiset does not depend on the thread count
//! - Pajek ids are ncol ids shifted by one

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use rgcli::io::{write_ncol, write_pajek};
use rgcli::neighbors::neighbor_records;
use rgcli::{weight, Dataset, EdgeList, GraphBuilder, GraphConfig, KdTree, ObjectId, Variant};

prop_compose! {
    /// Small integer grids produce plenty of equidistant pairs.
    fn arb_points(max_len: usize)(
        rows in prop::collection::vec(prop::collection::vec((-6i32..6).prop_map(f64::from), 2), 2..max_len)
    ) -> Vec<Vec<f64>> {
        rows
    }
}

prop_compose! {
    fn arb_case()(rows in arb_points(40))(
        labeled in prop::collection::vec(0..rows.len() as ObjectId, 1..4),
        k in 1..6usize,
        threads in 1..9usize,
        rows in Just(rows),
    ) -> (Vec<Vec<f64>>, Vec<ObjectId>, usize, usize) {
        (rows, labeled, k, threads)
    }
}

fn dataset(rows: Vec<Vec<f64>>) -> Arc<Dataset> {
    Arc::new(Dataset::from_rows(rows).unwrap())
}

fn build(data: &Arc<Dataset>, labeled: &[ObjectId], variant: Variant, k: usize, ki: usize, threads: usize) -> EdgeList {
    GraphBuilder::new(GraphConfig::new(variant, k, ki, threads))
        .unwrap()
        .build(Arc::clone(data), labeled)
        .unwrap()
}

fn sorted_triples(edges: &EdgeList) -> Vec<(ObjectId, ObjectId, u64)> {
    let mut triples: Vec<_> = edges
        .iter()
        .map(|e| (e.source, e.target, e.weight.to_bits()))
        .collect();
    triples.sort_unstable();
    triples
}

fn pairs(edges: &EdgeList) -> HashSet<(ObjectId, ObjectId)> {
    edges.iter().map(|e| (e.source, e.target)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn records_bounded_ascending_without_self((rows, _, k, _) in arb_case()) {
        let data = dataset(rows);
        let index = KdTree::build(Arc::clone(&data));
        let records = neighbor_records(&index, k, 0..data.len() as ObjectId);

        for (&object, record) in &records {
            prop_assert!(record.len() <= k);
            prop_assert_eq!(record.len(), k.min(data.len() - 1));
            prop_assert!(record.iter().all(|n| n.id != object), "object {} is its own neighbor", object);
            prop_assert!(record.windows(2).all(|w| w[0].distance <= w[1].distance));
        }
    }

    #[test]
    fn index_matches_brute_force(rows in arb_points(60), m in 1..10usize, qx in -7i32..7, qy in -7i32..7) {
        let data = dataset(rows);
        let index = KdTree::build(Arc::clone(&data));
        let query = [f64::from(qx), f64::from(qy)];

        let mut expected: Vec<(ObjectId, f64)> = (0..data.len() as ObjectId)
            .map(|id| (id, rgcli::dataset::euclidean(&query, data.point(id))))
            .collect();
        expected.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        expected.truncate(m);

        let found: Vec<(ObjectId, f64)> = index.nearest(&query, m).into_iter().map(|n| (n.id, n.distance)).collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn mutual_edges_are_symmetric_pairs((rows, labeled, k, threads) in arb_case()) {
        let data = dataset(rows);
        let edges = build(&data, &labeled, Variant::MutualKnn, k, 1, threads);

        let index = KdTree::build(Arc::clone(&data));
        let records = neighbor_records(&index, k, 0..data.len() as ObjectId);
        let listed = |u: ObjectId, v: ObjectId| records[&u].iter().any(|n| n.id == v);

        let mut expected = HashSet::new();
        for u in 0..data.len() as ObjectId {
            for n in &records[&u] {
                if listed(n.id, u) {
                    expected.insert((u, n.id));
                }
            }
        }

        prop_assert_eq!(pairs(&edges), expected);
        for e in &edges {
            prop_assert!(pairs(&edges).contains(&(e.target, e.source)));
            prop_assert_eq!(e.weight, weight(data.distance(e.source, e.target)));
        }
    }

    #[test]
    fn informative_edges_grow_with_ki((rows, labeled, k, threads) in arb_case(), ki in 1..5usize) {
        let data = dataset(rows);
        for variant in [Variant::Gbili, Variant::Rgcli] {
            let smaller = pairs(&build(&data, &labeled, variant, k, ki, threads));
            let larger = pairs(&build(&data, &labeled, variant, k, ki + 1, threads));
            prop_assert!(smaller.is_subset(&larger), "{} edges at ki={} not contained in ki={}", variant, ki, ki + 1);

            let mutual = pairs(&build(&data, &labeled, Variant::MutualKnn, k, ki, threads));
            prop_assert!(larger.is_subset(&mutual), "{} kept a non-mutual edge", variant);
        }
    }

    #[test]
    fn edge_set_independent_of_threads((rows, labeled, k, threads) in arb_case()) {
        let data = dataset(rows);
        for variant in [Variant::Knn, Variant::MutualKnn, Variant::Gbili, Variant::Rgcli] {
            let single = build(&data, &labeled, variant, k, 2, 1);
            let parallel = build(&data, &labeled, variant, k, 2, threads);
            prop_assert_eq!(sorted_triples(&single), sorted_triples(&parallel));
        }
    }

    #[test]
    fn pajek_ids_are_ncol_ids_plus_one((rows, labeled, k, threads) in arb_case()) {
        let data = dataset(rows);
        let edges = build(&data, &labeled, Variant::Rgcli, k, 2, threads);

        let mut ncol = Vec::new();
        write_ncol(&mut ncol, &edges).unwrap();
        let mut pajek = Vec::new();
        write_pajek(&mut pajek, data.len(), &edges).unwrap();
        let ncol = String::from_utf8(ncol).unwrap();
        let pajek = String::from_utf8(pajek).unwrap();

        let mut lines = pajek.lines();
        let header = format!("*Vertices {}", data.len());
        prop_assert_eq!(lines.next(), Some(header.as_str()));
        let lines: Vec<&str> = lines.skip(data.len()).collect();
        prop_assert_eq!(lines[0], "*Edges");

        let ncol_lines: Vec<&str> = ncol.lines().collect();
        prop_assert_eq!(ncol_lines.len(), lines.len() - 1);
        for (n, p) in ncol_lines.iter().zip(&lines[1..]) {
            let n: Vec<&str> = n.split(' ').collect();
            let p: Vec<&str> = p.split(' ').collect();
            prop_assert_eq!(p[0].parse::<u64>().unwrap(), n[0].parse::<u64>().unwrap() + 1);
            prop_assert_eq!(p[1].parse::<u64>().unwrap(), n[1].parse::<u64>().unwrap() + 1);
            prop_assert_eq!(p[2], n[2]);
        }
    }
}
