use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

pub type Fp = f32;
pub type Vec2f = Vector2<Fp>;
pub type Vec3f = Vector3<Fp>;
pub type Vec4f = Vector4<Fp>;
pub type Mat4f = Matrix4<Fp>;

pub static EPS: Fp = 0.00001;
pub static FP_INF: Fp = Fp::INFINITY;
pub static FP_NEG_INF: Fp = Fp::NEG_INFINITY;

/// One mesh triangle as handed to the renderer.
///
/// Positions and normals are in model space straight out of the importer and
/// in world space once the owning object's transform has been baked in.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3f,
    pub v1: Vec3f,
    pub v2: Vec3f,
    pub n0: Vec3f,
    pub n1: Vec3f,
    pub n2: Vec3f,
    pub uv0: Vec2f,
    pub uv1: Vec2f,
    pub uv2: Vec2f,
    /// Index into the scene image list, if the triangle is textured.
    pub texture_index: Option<usize>,
    pub base_color: Vec4f,
}

impl Triangle {
    /// A flat-shaded, untextured triangle.
    pub fn new(v0: Vec3f, v1: Vec3f, v2: Vec3f) -> Triangle {
        let normal = face_normal(&v0, &v1, &v2);
        Triangle {
            v0,
            v1,
            v2,
            n0: normal,
            n1: normal,
            n2: normal,
            uv0: Vec2f::zeros(),
            uv1: Vec2f::zeros(),
            uv2: Vec2f::zeros(),
            texture_index: None,
            base_color: Vec4f::new(1.0, 1.0, 1.0, 1.0),
        }
    }

    pub fn vertices(&self) -> [Vec3f; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn centroid(&self) -> Vec3f {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}

pub fn face_normal(a: &Vec3f, b: &Vec3f, c: &Vec3f) -> Vec3f {
    let n = (b - a).cross(&(c - a));
    if n.norm() > EPS {
        n.normalize()
    } else {
        Vec3f::zeros()
    }
}

/// Inverse matrices kept on implicit shapes so the renderer can move rays
/// into object space and normals back out.
#[derive(Clone, Debug, PartialEq)]
pub struct InverseTransforms {
    pub inverse_transform: Mat4f,
    pub inverse_transpose_transform: Mat4f,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GeomKind {
    Cube(InverseTransforms),
    Sphere(InverseTransforms),
    /// A single triangle of the shared scene buffer. Its transform is
    /// already baked into the vertex data.
    Triangle { triangle_index: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geom {
    pub kind: GeomKind,
    pub material_index: usize,
    pub translation: Vec3f,
    pub rotation: Vec3f,
    pub scale: Vec3f,
    pub transform: Mat4f,
}

impl Geom {
    pub fn triangle_index(&self) -> Option<usize> {
        match self.kind {
            GeomKind::Triangle { triangle_index } => Some(triangle_index),
            _ => None,
        }
    }

    pub fn inverse_transforms(&self) -> Option<&InverseTransforms> {
        match &self.kind {
            GeomKind::Cube(inverse) | GeomKind::Sphere(inverse) => Some(inverse),
            GeomKind::Triangle { .. } => None,
        }
    }
}
