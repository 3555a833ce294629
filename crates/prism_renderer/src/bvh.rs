//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree of bounding boxes stored in a flat arena and addressed by
//! integer handles. Each subtree is split along a randomly chosen axis after
//! sorting its items by bounding-box minimum, which sidesteps degenerate
//! splits without a surface-area cost model.

use crate::{
    hittable::{Hit, Hittable},
    random::RandomSource,
    Aabb, BuildError, BuildResult, Interval, Ray,
};

/// Index of a node in the arena.
type NodeId = usize;

/// BVH node - either a branch with two children or a leaf with one item.
#[derive(Debug, Clone)]
enum BvhNode {
    /// Internal node; its box is the union of its children's boxes.
    Branch {
        left: NodeId,
        right: NodeId,
        bbox: Aabb,
    },
    /// Leaf referencing one item by index.
    Leaf { item: usize, bbox: Aabb },
}

impl BvhNode {
    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }
}

/// BVH over any hittable item type.
///
/// Used both for the scene's objects and for the triangles of a mesh.
pub struct Bvh<T> {
    items: Vec<T>,
    nodes: Vec<BvhNode>,
    root: NodeId,
}

impl<T: Hittable> Bvh<T> {
    /// Build a BVH that takes ownership of `items`.
    ///
    /// Split axes are drawn from `rng`, so a seeded source gives a
    /// reproducible tree. An empty item list is a scene construction bug and
    /// is reported as [`BuildError::EmptyPrimitiveList`].
    pub fn build(items: Vec<T>, rng: &mut dyn RandomSource) -> BuildResult<Self> {
        if items.is_empty() {
            return Err(BuildError::EmptyPrimitiveList);
        }

        let boxes: Vec<Aabb> = items.iter().map(|item| item.bounding_box()).collect();
        let mut order: Vec<usize> = (0..items.len()).collect();
        let mut nodes = Vec::with_capacity(2 * items.len() - 1);

        let root = build_node(&mut nodes, &boxes, &mut order, rng);

        log::debug!(
            "Built BVH: {} items, {} nodes, depth {}",
            items.len(),
            nodes.len(),
            depth_of(&nodes, root)
        );

        Ok(Self { items, nodes, root })
    }

    /// Nearest hit together with the item that produced it.
    pub fn closest_hit(&self, ray: &Ray, interval: Interval) -> Option<(&T, Hit)> {
        self.closest_in(self.root, ray, interval)
            .map(|(item, hit)| (&self.items[item], hit))
    }

    fn closest_in(&self, node: NodeId, ray: &Ray, interval: Interval) -> Option<(usize, Hit)> {
        match &self.nodes[node] {
            BvhNode::Leaf { item, bbox } => {
                if !bbox.hit(ray, interval) {
                    return None;
                }
                self.items[*item]
                    .test_ray(ray, interval)
                    .map(|hit| (*item, hit))
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, interval) {
                    return None;
                }

                let near = self.closest_in(*left, ray, interval);

                // Only check right up to closest hit
                let window = match &near {
                    Some((_, hit)) => interval.with_max(hit.t),
                    None => interval,
                };
                let far = self.closest_in(*right, ray, window);

                far.or(near)
            }
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; a BVH cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of arena nodes (2n - 1 for n items).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, counting the root.
    pub fn depth(&self) -> usize {
        depth_of(&self.nodes, self.root)
    }
}

impl<T: Hittable> Hittable for Bvh<T> {
    fn test_ray(&self, ray: &Ray, interval: Interval) -> Option<Hit> {
        self.closest_hit(ray, interval).map(|(_, hit)| hit)
    }

    fn bounding_box(&self) -> Aabb {
        self.nodes[self.root].bbox()
    }
}

/// Recursive construction over a slice of item indices.
///
/// Children are pushed before their parent so boxes are unioned bottom-up.
fn build_node(
    nodes: &mut Vec<BvhNode>,
    boxes: &[Aabb],
    order: &mut [usize],
    rng: &mut dyn RandomSource,
) -> NodeId {
    if let [item] = order {
        nodes.push(BvhNode::Leaf {
            item: *item,
            bbox: boxes[*item],
        });
        return nodes.len() - 1;
    }

    let axis = rng.axis();
    order.sort_by(|&a, &b| {
        let a_min = boxes[a].axis_interval(axis).min;
        let b_min = boxes[b].axis_interval(axis).min;
        a_min.total_cmp(&b_min)
    });

    let mid = order.len() / 2;
    let (left_items, right_items) = order.split_at_mut(mid);
    let left = build_node(nodes, boxes, left_items, rng);
    let right = build_node(nodes, boxes, right_items, rng);

    let bbox = Aabb::surrounding(&nodes[left].bbox(), &nodes[right].bbox());
    nodes.push(BvhNode::Branch { left, right, bbox });
    nodes.len() - 1
}

fn depth_of(nodes: &[BvhNode], node: NodeId) -> usize {
    match &nodes[node] {
        BvhNode::Leaf { .. } => 1,
        BvhNode::Branch { left, right, .. } => 1 + depth_of(nodes, *left).max(depth_of(nodes, *right)),
    }
}
