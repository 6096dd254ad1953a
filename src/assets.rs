use crate::bvh::Bvh;
use crate::geometry::Triangle;
use crate::importer::TextureImage;

/// Mesh-derived buffers of a loaded scene. Triangles are in world space and
/// the BVH was built over exactly this buffer.
#[derive(Clone, Debug, Default)]
pub struct MeshAssets {
    pub images: Vec<TextureImage>,
    pub triangles: Vec<Triangle>,
    pub bvh: Bvh,
}
