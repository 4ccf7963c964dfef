//! Bounded min-plus relaxation over symmetric distance matrices
//!
//! Direct edges are seeded by the caller. Each pass extends every still
//! unknown pair (a, b) through one intermediate node m whose distances to
//! both endpoints are already known, taking the minimum of
//! `d(a, m) + d(b, m)` independently for every metric. Zero is the
//! "no path" sentinel.

use crate::matrix::SymmetricMatrix;

/// Pending update for one pair, applied at the end of a pass
struct Update {
    a: usize,
    b: usize,
    values: Vec<f32>,
}

/// Relax the pairs of one connected component.
///
/// `metrics[0]` decides reachability: a pair is unknown while its entry
/// there is zero, and an intermediate is usable only when both of its
/// entries there are non-zero. Every pass reads the state left by the
/// previous pass and writes its updates together once the scan is done.
///
/// Stops after `max_passes` passes or at the first pass that finds nothing
/// to update. Returns the number of passes that changed the matrices.
pub fn relax_component(
    component: &[usize],
    metrics: &mut [SymmetricMatrix<f32>],
    max_passes: usize,
) -> usize {
    if metrics.is_empty() || component.len() < 3 {
        return 0;
    }

    let mut applied = 0;
    for _ in 0..max_passes {
        let updates = scan_pass(component, metrics);
        if updates.is_empty() {
            break;
        }
        for update in updates {
            for (matrix, value) in metrics.iter_mut().zip(update.values) {
                matrix[(update.a, update.b)] = value;
            }
        }
        applied += 1;
    }
    applied
}

fn scan_pass(component: &[usize], metrics: &[SymmetricMatrix<f32>]) -> Vec<Update> {
    let reach = &metrics[0];
    let mut updates = Vec::new();

    for (i, &a) in component.iter().enumerate() {
        for &b in &component[i + 1..] {
            if reach[(a, b)] != 0.0 {
                continue;
            }

            let mut best: Option<Vec<f32>> = None;
            for &m in component {
                if m == a || m == b || reach[(a, m)] == 0.0 || reach[(b, m)] == 0.0 {
                    continue;
                }
                let best = best.get_or_insert_with(|| vec![f32::INFINITY; metrics.len()]);
                for (slot, matrix) in best.iter_mut().zip(metrics) {
                    let via = matrix[(a, m)] + matrix[(b, m)];
                    if via < *slot {
                        *slot = via;
                    }
                }
            }

            if let Some(values) = best {
                updates.push(Update { a, b, values });
            }
        }
    }
    updates
}
