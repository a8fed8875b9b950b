//! # Pathfinder
//!
//! Bounded 4-directional A* over absolute tiles, plus greedy line-of-sight
//! smoothing.
//!
//! ## Determinism
//!
//! Open nodes are ordered by `(f, h, insertion)`, so equal-cost frontiers
//! always expand in the same order and the same query on the same world
//! returns the same path.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use isoworld_procedural::{ChunkCoord, ChunkStore, Path, TilePos};

use crate::config::PathfinderConfig;

/// Answers whether a mob may stand on a tile.
pub trait Walkability {
    /// Returns true if `tile` is free.
    fn is_walkable(&self, tile: TilePos) -> bool;
}

impl<F> Walkability for F
where
    F: Fn(TilePos) -> bool,
{
    fn is_walkable(&self, tile: TilePos) -> bool {
        self(tile)
    }
}

/// Walkability frozen per chunk on first query.
///
/// Used during a tick's think phase so every mob plans against the same
/// frame-start world, whatever order mobs are visited in.
pub struct FrameWalkability<'a> {
    store: &'a ChunkStore,
    blocked: RefCell<HashMap<ChunkCoord, HashSet<TilePos>>>,
}

impl<'a> FrameWalkability<'a> {
    /// Empty snapshot over `store`.
    #[must_use]
    pub fn new(store: &'a ChunkStore) -> Self {
        Self {
            store,
            blocked: RefCell::new(HashMap::new()),
        }
    }
}

impl Walkability for FrameWalkability<'_> {
    fn is_walkable(&self, tile: TilePos) -> bool {
        let (_, coord) = tile.to_local();
        let mut blocked = self.blocked.borrow_mut();
        let solid = blocked
            .entry(coord)
            .or_insert_with(|| self.store.solid_tiles(coord));
        !solid.contains(&tile)
    }
}

/// Result of a raw search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Tiles from start to goal inclusive; empty if no path was found.
    pub path: Vec<TilePos>,
    /// Nodes finalized by the search.
    pub explored: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    f: u32,
    h: u32,
    g: u32,
    seq: u32,
    tile: TilePos,
}

// Reversed for a min-heap on (f, h, seq).
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search with a node budget.
#[derive(Clone, Debug)]
pub struct Pathfinder {
    max_explored_nodes: usize,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(&PathfinderConfig::default())
    }
}

impl Pathfinder {
    /// Creates a pathfinder with the configured budget.
    #[must_use]
    pub fn new(config: &PathfinderConfig) -> Self {
        Self {
            max_explored_nodes: config.max_explored_nodes.max(1),
        }
    }

    /// Node budget per search.
    #[must_use]
    pub fn max_explored_nodes(&self) -> usize {
        self.max_explored_nodes
    }

    /// Runs A* from `start` to `goal`.
    ///
    /// The start tile itself is never tested for walkability. The search gives
    /// up once the budget is spent.
    pub fn search<W>(&self, walk: &W, start: TilePos, goal: TilePos) -> SearchOutcome
    where
        W: Walkability + ?Sized,
    {
        if start == goal {
            return SearchOutcome::default();
        }

        let mut open = BinaryHeap::new();
        let mut best_g: HashMap<TilePos, u32> = HashMap::new();
        let mut parent: HashMap<TilePos, TilePos> = HashMap::new();
        let mut closed: HashSet<TilePos> = HashSet::new();
        let mut seq = 0u32;
        let mut explored = 0usize;

        let h = start.manhattan(goal);
        best_g.insert(start, 0);
        open.push(OpenNode { f: h, h, g: 0, seq, tile: start });

        while let Some(node) = open.pop() {
            if !closed.insert(node.tile) {
                continue;
            }
            explored += 1;

            if node.tile == goal {
                return SearchOutcome {
                    path: reconstruct(&parent, start, goal),
                    explored,
                };
            }
            if explored >= self.max_explored_nodes {
                break;
            }

            for next in node.tile.neighbors() {
                if closed.contains(&next) || !walk.is_walkable(next) {
                    continue;
                }
                let g = node.g + 1;
                if best_g.get(&next).is_some_and(|&known| known <= g) {
                    continue;
                }
                best_g.insert(next, g);
                parent.insert(next, node.tile);
                seq += 1;
                let h = next.manhattan(goal);
                open.push(OpenNode { f: g + h, h, g, seq, tile: next });
            }
        }

        tracing::trace!(
            "no path from ({}, {}) to ({}, {}) after {} nodes",
            start.x, start.y, goal.x, goal.y, explored
        );
        SearchOutcome {
            path: Vec::new(),
            explored,
        }
    }

    /// Unsmoothed tile path from `start` to `goal`, both included.
    ///
    /// Empty if the goal is unreachable within budget or equals the start.
    pub fn find_raw_path<W>(&self, walk: &W, start: TilePos, goal: TilePos) -> Vec<TilePos>
    where
        W: Walkability + ?Sized,
    {
        self.search(walk, start, goal).path
    }

    /// Smoothed path from `start` to `goal`.
    pub fn find_path<W>(&self, walk: &W, start: TilePos, goal: TilePos) -> Path
    where
        W: Walkability + ?Sized,
    {
        smooth(walk, &self.find_raw_path(walk, start, goal)).into()
    }
}

fn reconstruct(parent: &HashMap<TilePos, TilePos>, start: TilePos, goal: TilePos) -> Vec<TilePos> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parent.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Drops waypoints that a straight walk can skip.
///
/// From each kept waypoint, jumps to the farthest later waypoint in line of
/// sight, or to the next one when none is. The first and last waypoints are
/// always kept.
pub fn smooth<W>(walk: &W, raw: &[TilePos]) -> Vec<TilePos>
where
    W: Walkability + ?Sized,
{
    let Some(&first) = raw.first() else {
        return Vec::new();
    };
    let mut smoothed = vec![first];
    let mut i = 0;
    while i + 1 < raw.len() {
        let next = (i + 2..raw.len())
            .rev()
            .find(|&j| line_of_sight(walk, raw[i], raw[j]))
            .unwrap_or(i + 1);
        smoothed.push(raw[next]);
        i = next;
    }
    smoothed
}

/// Returns true if every tile on the Bresenham line from `from` to `to`,
/// excluding `from`, is walkable.
pub fn line_of_sight<W>(walk: &W, from: TilePos, to: TilePos) -> bool
where
    W: Walkability + ?Sized,
{
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    while x != to.x || y != to.y {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        if !walk.is_walkable(TilePos::new(x, y)) {
            return false;
        }
    }
    true
}
