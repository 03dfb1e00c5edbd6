// Cycle detector - finds dead files that only import each other
//
// A group of files importing one another in a loop keeps every member
// "imported" even when no entry point reaches the group. Such closed cycles
// can be deleted together.

use crate::graph::{FileId, Graph};
use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashSet;
use tracing::debug;

/// One closed import cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// Files in the cycle, sorted by path
    pub members: Vec<FileId>,
    /// Whether no file outside the cycle imports any member
    pub is_dead_cycle: bool,
    pub size: usize,
}

/// Detector for dead import cycles
pub struct CycleDetector;

impl CycleDetector {
    pub fn new() -> Self {
        Self
    }

    /// Strongly connected components of unreachable files with no importer
    /// outside the component, largest first
    pub fn find_dead_cycles(
        &self,
        graph: &Graph,
        reachable: &HashSet<FileId>,
    ) -> Vec<CycleInfo> {
        let inner = graph.inner();
        let sccs = tarjan_scc(inner);

        let mut dead_cycles = Vec::new();

        for scc in sccs {
            let self_loop = scc.len() == 1 && inner.contains_edge(scc[0], scc[0]);
            if scc.len() < 2 && !self_loop {
                continue;
            }

            let mut members: Vec<FileId> = scc
                .iter()
                .filter_map(|&idx| inner.node_weight(idx).cloned())
                .collect();

            if members.iter().any(|id| reachable.contains(id)) {
                continue;
            }

            let member_set: HashSet<_> = scc.iter().copied().collect();
            let has_external_importer = scc.iter().any(|&idx| {
                inner
                    .edges_directed(idx, Direction::Incoming)
                    .any(|edge| !member_set.contains(&edge.source()))
            });
            if has_external_importer {
                continue;
            }

            members.sort();
            debug!("Found dead cycle with {} files: {:?}", members.len(), members);

            dead_cycles.push(CycleInfo {
                size: members.len(),
                members,
                is_dead_cycle: true,
            });
        }

        dead_cycles.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.members.cmp(&b.members)));
        dead_cycles
    }

    /// Get statistics about dead cycles
    pub fn get_cycle_stats(&self, graph: &Graph, reachable: &HashSet<FileId>) -> CycleStats {
        let dead_cycles = self.find_dead_cycles(graph, reachable);

        CycleStats {
            num_dead_cycles: dead_cycles.len(),
            largest_cycle_size: dead_cycles.first().map(|c| c.size).unwrap_or(0),
            total_files_in_cycles: dead_cycles.iter().map(|c| c.size).sum(),
        }
    }
}

impl Default for CycleDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about cycles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub num_dead_cycles: usize,
    pub largest_cycle_size: usize,
    pub total_files_in_cycles: usize,
}

impl CycleStats {
    pub fn has_cycles(&self) -> bool {
        self.num_dead_cycles > 0
    }
}
