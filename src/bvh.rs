use crate::aabb::{calculate_aabb, Aabb};
use crate::geometry::Triangle;

pub const NO_CHILD: usize = usize::MAX;

#[derive(Clone, Debug, PartialEq)]
pub struct BvhNode {
    pub aabb: Aabb,
    pub left_child_index: usize,
    pub right_child_index: usize,
    /// Range into [`Bvh::triangle_indices`].
    pub content_start: usize,
    pub content_length: usize,
}

impl BvhNode {
    pub fn is_leaf(&self) -> bool {
        self.left_child_index == NO_CHILD
    }
}

/// Bounding-volume hierarchy over a triangle buffer. The buffer itself is
/// left in place; leaves point into `triangle_indices` instead.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bvh {
    pub nodes: Vec<BvhNode>,
    pub triangle_indices: Vec<usize>,
    pub root: Option<usize>,
}

impl Bvh {
    pub fn build(triangles: &[Triangle]) -> Bvh {
        let mut bvh = Bvh {
            nodes: Vec::new(),
            triangle_indices: (0..triangles.len()).collect(),
            root: None,
        };
        if !triangles.is_empty() {
            let root = create_bvh_node(
                &mut bvh.nodes,
                triangles,
                &mut bvh.triangle_indices,
                0,
                triangles.len(),
            );
            bvh.root = Some(root);
        }
        bvh
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Triangle indices stored in a leaf.
    pub fn leaf_triangles(&self, node: &BvhNode) -> &[usize] {
        &self.triangle_indices[node.content_start..node.content_start + node.content_length]
    }
}

// children are pushed before their parent, so the returned index of the
// outermost call is the root
fn create_bvh_node(
    result: &mut Vec<BvhNode>,
    triangles: &[Triangle],
    indices: &mut [usize],
    start: usize,
    length: usize,
) -> usize {
    let aabb = calculate_aabb(triangles, &indices[start..start + length]);
    match try_split(&aabb, triangles, &mut indices[start..start + length]) {
        Some(first_part_len) => {
            let left_child = create_bvh_node(result, triangles, indices, start, first_part_len);
            let right_child = create_bvh_node(
                result,
                triangles,
                indices,
                start + first_part_len,
                length - first_part_len,
            );
            result.push(BvhNode {
                aabb,
                left_child_index: left_child,
                right_child_index: right_child,
                content_start: start,
                content_length: length,
            });
            result.len() - 1
        }
        None => {
            result.push(BvhNode {
                aabb,
                left_child_index: NO_CHILD,
                right_child_index: NO_CHILD,
                content_start: start,
                content_length: length,
            });
            result.len() - 1
        }
    }
}

// returns the length of the first part, if the split was successful
fn try_split(aabb: &Aabb, triangles: &[Triangle], indices: &mut [usize]) -> Option<usize> {
    if indices.len() < 2 {
        return None;
    }
    let axis = aabb.longest_axis();
    let middle = (aabb.min[axis] + aabb.max[axis]) * 0.5;
    let first_part = partition_in_place(indices, |&i| triangles[i].centroid()[axis] <= middle);
    if 0usize < first_part && first_part < indices.len() {
        Some(first_part)
    } else {
        None
    }
}

fn partition_in_place<T>(items: &mut [T], mut predicate: impl FnMut(&T) -> bool) -> usize {
    let mut first_false = 0;
    for i in 0..items.len() {
        if predicate(&items[i]) {
            items.swap(first_false, i);
            first_false += 1;
        }
    }
    first_false
}
