use proptest::prelude::*;
use tagnet::graph::{CoOccurrenceGraph, DistanceType, GraphError, IdSpace, NodeConnectStat, DISTANCE_EPSILON};
use tagnet::MatrixError;

const TOLERANCE: f32 = 0.01;

fn approx(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < TOLERANCE
}

fn graph_from(n: usize, lists: &[&[usize]]) -> CoOccurrenceGraph {
    let mut graph = CoOccurrenceGraph::new(n, 0);
    for list in lists {
        graph.add(list.iter().copied()).unwrap();
    }
    graph
}

const FIVE_NODES: &[&[usize]] = &[&[0, 2], &[0, 1, 3], &[2, 3], &[3, 4]];
const EIGHT_NODES: &[&[usize]] = &[&[0, 2], &[0, 1, 3], &[2, 3], &[3, 4], &[5, 6], &[4, 6], &[5, 7]];
const SIXTEEN_NODES: &[&[usize]] = &[
    &[0, 1, 2, 3, 4],
    &[5, 6, 7, 8],
    &[9, 10, 11],
    &[12, 13],
    &[13, 14],
    &[0, 1],
    &[2, 3],
    &[4, 5],
    &[6, 7],
    &[8],
    &[9],
    &[15],
];

#[test]
fn test_degrees_and_participation() {
    let graph = graph_from(5, FIVE_NODES);
    let degrees: Vec<usize> = (0..5).map(|id| graph.co_occurring_count(id).unwrap()).collect();
    let participation: Vec<usize> = (0..5).map(|id| graph.participation(id).unwrap()).collect();
    assert_eq!(degrees, vec![3, 2, 2, 4, 1]);
    assert_eq!(participation, vec![2, 1, 2, 3, 1]);
    assert_eq!(graph.lists_added(), 4);
    assert_eq!(graph.unique_lists(), 4);
}

#[test]
fn test_path_stats_with_inactive_nodes() {
    let graph = graph_from(7, FIVE_NODES);
    let stats = graph.distance_stats(DistanceType::PathLength);
    // Nodes 5 and 6 never appear
    assert_eq!(stats.count, 10);
    assert_eq!(stats.low_bound, 1.0);
    assert_eq!(stats.high_bound, 2.0);
}

#[test]
fn test_eight_node_distances() {
    let graph = graph_from(8, EIGHT_NODES);
    assert_eq!(graph.distance(DistanceType::PathLength, 0, 7).unwrap(), 5.0);
    assert!(approx(graph.distance(DistanceType::TagsetJaccard, 0, 4).unwrap(), 0.867));
    assert!(approx(graph.distance(DistanceType::ItemsetJaccard, 0, 4).unwrap(), 1.5));
    assert!(approx(graph.distance(DistanceType::TagsetJaccard, 1, 5).unwrap(), 2.07));
    assert_eq!(graph.distance_stats(DistanceType::PathLength).count, 28);
}

#[test]
fn test_distance_is_symmetric() {
    let graph = graph_from(8, EIGHT_NODES);
    for typ in DistanceType::ALL {
        for a in 0..8 {
            for b in 0..8 {
                assert_eq!(graph.distance(typ, a, b).unwrap(), graph.distance(typ, b, a).unwrap());
            }
        }
    }
}

#[test]
fn test_sixteen_node_islands() {
    let graph = graph_from(16, SIXTEEN_NODES);
    let islands = graph.island_stats();
    let members: Vec<Vec<usize>> = islands.iter().map(|i| i.nodes.iter().copied().collect()).collect();
    assert_eq!(
        members,
        vec![(0..9).collect::<Vec<_>>(), vec![9, 10, 11], vec![12, 13, 14], vec![15]]
    );

    let big = &islands[0];
    assert_eq!(big.max_adjacent, 5);
    assert_eq!(big.min_adjacent, 3);
    assert!(approx(big.avg_adjacent, 3.78));
    assert_eq!(big.num_with_3_adj, 3);
    assert_eq!(big.num_with_4_adj, 5);
    assert_eq!(big.num_with_many, 1);
    assert_eq!(big.num_with_max, 1);

    assert_eq!(graph.islands_from_distance_matrix(IdSpace::Original), islands);
}

/// Connectivity stats with the tie-sensitive below-average count cleared
fn without_below_avg(stats: &[NodeConnectStat]) -> Vec<NodeConnectStat> {
    stats
        .iter()
        .cloned()
        .map(|mut stat| {
            stat.num_below_avg = 0;
            stat
        })
        .collect()
}

fn assert_same_connectivity(matrix: &[NodeConnectStat], raw: &[NodeConnectStat]) {
    assert_eq!(without_below_avg(matrix), without_below_avg(raw));
    for (m, r) in matrix.iter().zip(raw) {
        assert!(m.num_below_avg >= r.num_below_avg, "node {}", m.id);
    }
}

#[test]
fn test_sixteen_node_connect_stats() {
    let graph = graph_from(16, SIXTEEN_NODES);
    let stats = graph.node_connect_stats();

    let node1 = &stats[1];
    assert_eq!(node1.num_no_connect, 7);
    assert_eq!(node1.num_adjacent, 4);
    assert_eq!(node1.num_indirect, 4);
    assert_eq!(node1.min_adj_tagset, DISTANCE_EPSILON);
    assert!(approx(node1.max_adj_tagset, 0.17));
    assert!(approx(node1.avg_adj_tagset, 0.04));
    assert_eq!(node1.num_below_avg, 3);
    assert_eq!(node1.adj_nodes, [0, 2, 3, 4].into_iter().collect());
    assert_eq!(node1.adj_num_common[&4], 5);

    let node4 = &stats[4];
    assert_eq!(node4.num_adjacent, 5);
    assert!(approx(node4.min_adj_tagset, 0.17));
    assert!(approx(node4.max_adj_tagset, 0.78));
    assert!(approx(node4.avg_adj_tagset, 0.29));
    assert_eq!(node4.num_below_avg, 4);
    assert_eq!(node4.adj_num_common[&5], 2);

    let node5 = &stats[5];
    assert_eq!(node5.num_adjacent, 4);
    assert!(approx(node5.min_adj_tagset, 0.20));
    assert!(approx(node5.max_adj_tagset, 0.78));
    assert!(approx(node5.avg_adj_tagset, 0.34));
    assert_eq!(node5.num_below_avg, 3);
    assert_eq!(node5.adj_nodes, [4, 6, 7, 8].into_iter().collect());
    assert_eq!(node5.adj_num_common[&6], 4);

    assert_same_connectivity(&graph.connect_stats_from_distance_matrix(IdSpace::Original), &stats);
    assert!(graph.validate_distance_matrix(DistanceType::PathLength).is_empty());
}

#[test]
fn test_histogram_bins() {
    let graph = graph_from(8, EIGHT_NODES);
    let stats = graph.distance_stats(DistanceType::PathLength);
    let bins = graph.histogram(DistanceType::PathLength, 5);
    assert_eq!(bins.len(), 5);
    assert_eq!(bins.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    assert_eq!(bins[0].low_bound, stats.low_bound);
    assert_eq!(bins[4].high_bound, stats.high_bound);
    assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), stats.count);
    assert!(graph.histogram(DistanceType::PathLength, 0).is_empty());
}

#[test]
fn test_zero_node_graph() {
    let graph = CoOccurrenceGraph::new(0, 0);
    for typ in DistanceType::ALL {
        assert_eq!(graph.distance_stats(typ).count, 0);
        let bins = graph.histogram(typ, 4);
        assert_eq!(bins.len(), 4);
        assert!(bins.iter().all(|b| b.count == 0 && b.low_bound == 0.0 && b.high_bound == 0.0));
    }
    assert!(graph.island_stats().is_empty());
    assert!(graph.validate_distance_matrix(DistanceType::PathLength).is_empty());
}

#[test]
fn test_rejected_list_leaves_graph_untouched() {
    let mut graph = graph_from(5, FIVE_NODES);
    let version = graph.version();
    let err = graph.add([1, 9]).unwrap_err();
    assert_eq!(err, GraphError::NodeOutOfRange { id: 9, node_count: 5 });
    assert_eq!(graph.version(), version);
    assert_eq!(graph.participation(1).unwrap(), 1);
    assert_eq!(graph.lists_added(), 4);
}

#[test]
fn test_offset_ids() {
    let mut graph = CoOccurrenceGraph::new(4, -1);
    graph.add([1, 2]).unwrap();
    graph.add([2, 3, 4]).unwrap();
    graph.add([4, 3, 2]).unwrap();
    assert_eq!(graph.to_rc(1).unwrap(), 0);
    assert_eq!(graph.to_id(3), 4);
    assert!(graph.to_rc(0).is_err());
    assert_eq!(graph.pair_occurrences(3, 4).unwrap(), 2);
    assert_eq!(graph.list_occurrences([2, 3, 4]).unwrap(), 2);
    assert_eq!(graph.lists(), vec![(vec![1, 2], 1), (vec![2, 3, 4], 2)]);
    assert_eq!(graph.components(), vec![vec![1, 2, 3, 4]]);
    assert_eq!(graph.distance(DistanceType::PathLength, 1, 4).unwrap(), 2.0);
}

#[test]
fn test_add_invalidates_derived_state() {
    let mut graph = graph_from(4, &[&[0, 1], &[2, 3]]);
    assert_eq!(graph.distance(DistanceType::PathLength, 0, 3).unwrap(), f32::INFINITY);
    graph.add([1, 2]).unwrap();
    assert_eq!(graph.distance(DistanceType::PathLength, 0, 3).unwrap(), 3.0);
    assert_eq!(graph.island_stats().len(), 1);
}

#[test]
fn test_merge_matches_sequential_adds() {
    let mut left = graph_from(8, &EIGHT_NODES[..4]);
    let right = graph_from(8, &EIGHT_NODES[4..]);
    left.merge(&right).unwrap();
    let whole = graph_from(8, EIGHT_NODES);

    assert_eq!(left.lists_added(), whole.lists_added());
    assert_eq!(left.lists(), whole.lists());
    assert_eq!(left.components(), whole.components());
    for a in 0..8 {
        assert_eq!(left.participation(a).unwrap(), whole.participation(a).unwrap());
        for b in 0..8 {
            assert_eq!(left.pair_occurrences(a, b).unwrap(), whole.pair_occurrences(a, b).unwrap());
        }
    }
    for typ in DistanceType::ALL {
        assert_eq!(left.distance_stats(typ), whole.distance_stats(typ));
    }
}

#[test]
fn test_merge_rejects_mismatched_graphs() {
    let mut graph = CoOccurrenceGraph::new(4, 0);
    assert_eq!(
        graph.merge(&CoOccurrenceGraph::new(4, -1)),
        Err(GraphError::OffsetMismatch { left: 0, right: -1 })
    );
    assert_eq!(
        graph.merge(&CoOccurrenceGraph::new(5, 0)),
        Err(GraphError::Matrix(MatrixError::DimensionMismatch { left: 4, right: 5 }))
    );
}

fn lists_strategy() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
    (2usize..12).prop_flat_map(|n| {
        let list = prop::collection::vec(0..n, 1..4);
        (Just(n), prop::collection::vec(list, 0..14))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pair_counts_are_symmetric((n, lists) in lists_strategy()) {
        let mut graph = CoOccurrenceGraph::new(n, 0);
        for list in &lists {
            graph.add(list.iter().copied()).unwrap();
        }
        for a in 0..n {
            for b in 0..n {
                let expected = if a == b {
                    0
                } else {
                    lists.iter().filter(|l| l.contains(&a) && l.contains(&b)).count()
                };
                prop_assert_eq!(graph.pair_occurrences(a, b).unwrap(), expected);
            }
        }
    }

    #[test]
    fn prop_path_relaxation_is_valid((n, lists) in lists_strategy()) {
        let mut graph = CoOccurrenceGraph::new(n, 0);
        for list in &lists {
            graph.add(list.iter().copied()).unwrap();
        }
        prop_assert!(graph.validate_distance_matrix(DistanceType::PathLength).is_empty());
    }

    #[test]
    fn prop_histogram_conserves_pairs((n, lists) in lists_strategy(), bins in 1usize..12) {
        let mut graph = CoOccurrenceGraph::new(n, 0);
        for list in &lists {
            graph.add(list.iter().copied()).unwrap();
        }
        for typ in DistanceType::ALL {
            let total: usize = graph.histogram(typ, bins).iter().map(|b| b.count).sum();
            prop_assert_eq!(total, graph.distance_stats(typ).count);
        }
    }

    #[test]
    fn prop_connectivity_implementations_agree((n, lists) in lists_strategy()) {
        let mut graph = CoOccurrenceGraph::new(n, 0);
        for list in &lists {
            graph.add(list.iter().copied()).unwrap();
        }
        // Pair off every node not yet in a list of two or more
        for node in 0..n {
            let paired = lists.iter().any(|l| l.contains(&node) && l.iter().any(|&m| m != node));
            if !paired {
                let partner = if node + 1 < n { node + 1 } else { 0 };
                graph.add([node, partner]).unwrap();
            }
        }
        prop_assert_eq!(graph.islands_from_distance_matrix(IdSpace::Original), graph.island_stats());
        let matrix = graph.connect_stats_from_distance_matrix(IdSpace::Original);
        let raw = graph.node_connect_stats();
        prop_assert_eq!(without_below_avg(&matrix), without_below_avg(&raw));
        for (m, r) in matrix.iter().zip(&raw) {
            prop_assert!(m.num_below_avg >= r.num_below_avg);
        }
    }
}
