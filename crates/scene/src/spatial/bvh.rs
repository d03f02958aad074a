use foundation::bounds::Aabb3;
use foundation::math::precision::cmp_f64;

use crate::ray::Ray;

/// Bounding volume hierarchy over indexed boxes, built once per terrain tile.
///
/// Nodes are stored depth-first: a branch's left child directly follows it.
/// Leaves reference contiguous runs of the reordered item list.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<Node>,
    items: Vec<Item>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Item {
    pub index: u32,
    pub bounds: Aabb3,
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb3,
    kind: NodeKind,
}

#[derive(Debug, Copy, Clone)]
enum NodeKind {
    Leaf { first: usize, count: usize },
    Branch { right: usize },
}

const LEAF_SIZE: usize = 8;

impl Bvh {
    pub fn build(mut items: Vec<Item>) -> Self {
        let mut nodes = Vec::with_capacity(2 * items.len().div_ceil(LEAF_SIZE));
        if !items.is_empty() {
            subdivide(&mut nodes, &mut items, 0);
        }
        Self { nodes, items }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Indices of items whose box the ray enters within `max_distance`,
    /// ascending.
    pub fn candidates(&self, ray: &Ray, max_distance: f64) -> Vec<u32> {
        let mut out = Vec::new();
        if self.nodes.is_empty() {
            return out;
        }

        let mut pending = vec![0usize];
        while let Some(at) = pending.pop() {
            let node = &self.nodes[at];
            if !enters(ray, &node.bounds, max_distance) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { first, count } => out.extend(
                    self.items[first..first + count]
                        .iter()
                        .filter(|item| enters(ray, &item.bounds, max_distance))
                        .map(|item| item.index),
                ),
                NodeKind::Branch { right } => {
                    pending.push(right);
                    pending.push(at + 1);
                }
            }
        }

        out.sort_unstable();
        out.dedup();
        out
    }
}

/// Appends the subtree for `items` (which start at `offset` in the final
/// item list) and returns its node index.
fn subdivide(nodes: &mut Vec<Node>, items: &mut [Item], offset: usize) -> usize {
    let bounds = items
        .iter()
        .skip(1)
        .fold(items[0].bounds, |acc, item| acc.union(&item.bounds));
    let at = nodes.len();

    if items.len() <= LEAF_SIZE {
        nodes.push(Node {
            bounds,
            kind: NodeKind::Leaf {
                first: offset,
                count: items.len(),
            },
        });
        return at;
    }

    // Median split along the longest axis; index breaks centroid ties.
    let axis = (0..3)
        .max_by(|&a, &b| cmp_f64(bounds.extent(a), bounds.extent(b)).then(b.cmp(&a)))
        .unwrap_or(0);
    items.sort_by(|a, b| {
        cmp_f64(a.bounds.centroid(axis), b.bounds.centroid(axis))
            .then_with(|| a.index.cmp(&b.index))
    });

    nodes.push(Node {
        bounds,
        kind: NodeKind::Branch { right: 0 },
    });
    let half = items.len() / 2;
    let (lo, hi) = items.split_at_mut(half);
    subdivide(nodes, lo, offset);
    let right = subdivide(nodes, hi, offset + half);
    nodes[at].kind = NodeKind::Branch { right };
    at
}

/// Slab test: does the ray pass through `b` at a distance in `[0, max_distance]`?
fn enters(ray: &Ray, b: &Aabb3, max_distance: f64) -> bool {
    let origin = ray.origin.as_array();
    let dir = ray.dir.as_array();
    let (mut near, mut far) = (0.0_f64, max_distance);

    for axis in 0..3 {
        let (lo, hi) = (b.min[axis], b.max[axis]);
        if dir[axis].abs() < 1e-12 {
            if origin[axis] < lo || origin[axis] > hi {
                return false;
            }
            continue;
        }
        let inv = dir[axis].recip();
        let t0 = (lo - origin[axis]) * inv;
        let t1 = (hi - origin[axis]) * inv;
        near = near.max(t0.min(t1));
        far = far.min(t0.max(t1));
        if far < near {
            return false;
        }
    }
    true
}
