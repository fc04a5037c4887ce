//! Cycle-safe longest-path leveling.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;

use crate::layout::Topology;

/// Assigns each node the length of the longest path from any root, indexed
/// by [`NodeIndex::index`].
///
/// Roots sit at level 0 and are never raised. A node's level only ever
/// increases, a node is re-queued only when its level strictly increases,
/// and no level exceeds `n - 1`. The traversal therefore terminates on any
/// graph, cyclic or not, and is exact on acyclic graphs.
///
/// Nodes not reachable from a root get `None`.
pub(crate) fn longest_path_levels(topology: &Topology, roots: &[NodeIndex]) -> Vec<Option<usize>> {
    let n = topology.node_count();
    let cap = n.saturating_sub(1);
    let mut levels: Vec<Option<usize>> = vec![None; n];
    let mut is_root = vec![false; n];
    let mut queue = VecDeque::new();

    for &root in roots {
        if root.index() < n && !is_root[root.index()] {
            is_root[root.index()] = true;
            levels[root.index()] = Some(0);
            queue.push_back(root);
        }
    }

    while let Some(node) = queue.pop_front() {
        let Some(level) = levels[node.index()] else {
            continue;
        };
        let candidate = (level + 1).min(cap);

        for next in topology.neighbors(node) {
            if is_root[next.index()] {
                continue;
            }
            match levels[next.index()] {
                Some(current) if current >= candidate => {}
                _ => {
                    levels[next.index()] = Some(candidate);
                    queue.push_back(next);
                }
            }
        }
    }

    levels
}
