//! Generic best-first search in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! with a floating point heuristic and a deterministic tie-break on insertion order.

use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, trace};
use num_traits::{ToPrimitive, Zero};

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index of the start node, which has none.
const NO_PARENT: usize = usize::MAX;

struct SmallestCostHolder<K> {
    estimated_cost: f64,
    cost: K,
    sequence: u64,
    index: usize,
}

impl<K> Eq for SmallestCostHolder<K> {}

impl<K> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: smallest estimate wins, and among equal estimates
        // the entry pushed first wins.
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

/// Result of a single [astar] run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SearchOutcome<N, C> {
    Found {
        path: Vec<N>,
        cost: C,
        expanded: usize,
    },
    Exhausted {
        expanded: usize,
    },
    Interrupted {
        expanded: usize,
    },
}

fn reverse_path<N, V, F>(parents: &FxIndexMap<N, V>, mut parent: F, start: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
    F: FnMut(&V) -> usize,
{
    let mut path = Vec::new();
    let mut i = start;
    while let Some((node, value)) = parents.get_index(i) {
        path.push(node.clone());
        i = parent(value);
    }
    path.reverse();
    path
}

/// Runs A* from `start` until `success` accepts a dequeued node or the frontier runs dry.
///
/// `interrupt` is polled before every expansion with the number of nodes expanded so far;
/// returning `true` abandons the search.
pub(crate) fn astar<N, C, FN, IN, FH, FS, FI>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
    mut interrupt: FI,
) -> SearchOutcome<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + ToPrimitive,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> f64,
    FS: FnMut(&N) -> bool,
    FI: FnMut(usize) -> bool,
{
    let mut sequence: u64 = 0;
    let mut expanded = 0;
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: heuristic(start),
        cost: C::zero(),
        sequence,
        index: 0,
    });
    // Both the best known cost and the predecessor of every discovered node.
    let mut parents: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    parents.insert(start.clone(), (NO_PARENT, C::zero()));

    while let Some(SmallestCostHolder { cost, index, .. }) = to_see.pop() {
        let successors = {
            let Some((node, &(_, best))) = parents.get_index(index) else {
                continue;
            };
            // A node is pushed again whenever a cheaper way to it turns up; only the entry
            // carrying the best cost is worth expanding.
            if cost > best {
                trace!("Skipping stale heap entry");
                continue;
            }
            if success(node) {
                let path = reverse_path(&parents, |&(p, _)| p, index);
                return SearchOutcome::Found {
                    path,
                    cost,
                    expanded,
                };
            }
            if interrupt(expanded) {
                debug!("Search interrupted after {} expansions", expanded);
                return SearchOutcome::Interrupted { expanded };
            }
            expanded += 1;
            successors(node)
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let h;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    h = heuristic(e.key());
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if new_cost < e.get().1 {
                        h = heuristic(e.key());
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            sequence += 1;
            to_see.push(SmallestCostHolder {
                estimated_cost: new_cost.to_f64().unwrap_or(f64::INFINITY) + h,
                cost: new_cost,
                sequence,
                index: n,
            });
        }
    }
    SearchOutcome::Exhausted { expanded }
}
