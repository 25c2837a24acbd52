//! Critical path calculation using a forward pass over the topological order.
//!
//! With unlimited resources every task starts as soon as its last dependency
//! finishes, so the critical path length is a lower bound on the makespan.

use crate::catalog::Catalog;
use crate::interner::IdIndex;
use crate::ordering::TopologicalOrder;

/// Longest duration chain through the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CriticalPath {
    /// Sum of durations along the chain, in minutes.
    pub length: u32,
    /// Task ids on the chain, first to last.
    pub tasks: Vec<String>,
}

/// Compute the critical path.
///
/// Equal-length alternatives resolve to the higher-priority task.
pub fn critical_path(catalog: &Catalog, topo: &TopologicalOrder) -> CriticalPath {
    let n = catalog.len();
    let mut earliest_finish = vec![0u32; n];
    let mut predecessor: Vec<Option<IdIndex>> = vec![None; n];

    for &idx in &topo.order {
        let mut best: Option<IdIndex> = None;
        for &dep in &catalog.dependencies[idx] {
            let better = match best {
                None => true,
                Some(b) => {
                    earliest_finish[dep] > earliest_finish[b]
                        || (earliest_finish[dep] == earliest_finish[b]
                            && topo.priority[dep] < topo.priority[b])
                }
            };
            if better {
                best = Some(dep);
            }
        }
        let ready_at = best.map_or(0, |b| earliest_finish[b]);
        earliest_finish[idx] = ready_at.saturating_add(catalog.durations[idx]);
        predecessor[idx] = best;
    }

    // Walking the order keeps the first (highest-priority) of equal ends
    let mut last: Option<IdIndex> = None;
    for &idx in &topo.order {
        if last.map_or(true, |l| earliest_finish[idx] > earliest_finish[l]) {
            last = Some(idx);
        }
    }

    let Some(end) = last else {
        return CriticalPath::default();
    };

    let mut chain = Vec::new();
    let mut cursor = Some(end);
    while let Some(idx) = cursor {
        chain.push(catalog.task_id(idx).to_string());
        cursor = predecessor[idx];
    }
    chain.reverse();

    CriticalPath {
        length: earliest_finish[end],
        tasks: chain,
    }
}
