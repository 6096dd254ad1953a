use crate::geometry::{Triangle, Vec3f, EPS, FP_INF, FP_NEG_INF};

#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl Default for Aabb {
    fn default() -> Self {
        Aabb {
            min: Vec3f::new(FP_INF, FP_INF, FP_INF),
            max: Vec3f::new(FP_NEG_INF, FP_NEG_INF, FP_NEG_INF),
        }
    }
}

impl Aabb {
    pub fn extend_aabb(&self, aabb: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&aabb.min),
            max: self.max.sup(&aabb.max),
        }
    }

    pub fn contains(&self, aabb: &Aabb) -> bool {
        for coord in 0..3 {
            if aabb.min[coord] < self.min[coord] {
                return false;
            }
            if aabb.max[coord] > self.max[coord] {
                return false;
            }
        }
        true
    }

    /// Index of the longest axis, 0 for x, 1 for y, 2 for z.
    pub fn longest_axis(&self) -> usize {
        let diff = self.max - self.min;
        if diff.x >= diff.y && diff.x >= diff.z {
            0
        } else if diff.y >= diff.z {
            1
        } else {
            2
        }
    }
}

// padded so that axis-aligned triangles still get a non-flat box
pub fn calculate_aabb_for_triangle(triangle: &Triangle) -> Aabb {
    let eps_vec = Vec3f::new(EPS, EPS, EPS);
    let (a, b, c) = (&triangle.v0, &triangle.v1, &triangle.v2);
    Aabb {
        min: a.inf(b).inf(c) - eps_vec,
        max: a.sup(b).sup(c) + eps_vec,
    }
}

pub fn calculate_aabb(triangles: &[Triangle], indices: &[usize]) -> Aabb {
    let mut result = <Aabb as Default>::default();
    for &i in indices {
        result = result.extend_aabb(&calculate_aabb_for_triangle(&triangles[i]));
    }
    result
}
