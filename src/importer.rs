use std::path::Path;

use gltf::image::Format;
use gltf::mesh::Mode;
use image::{DynamicImage, ImageBuffer, RgbaImage};
use log::{debug, info, warn};

use crate::bvh::Bvh;
use crate::error::ImportError;
use crate::geometry::{face_normal, Fp, Mat4f, Triangle, Vec2f, Vec3f, Vec4f};
use crate::transform::{inverse_transforms, transform_normal, transform_point};

/// A decoded texture, always widened to 8-bit RGBA.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub pixels: RgbaImage,
}

impl TextureImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// What a model file turns into. Returned by value: the caller becomes the
/// sole owner of both buffers.
#[derive(Clone, Debug, Default)]
pub struct ImportedModel {
    pub images: Vec<TextureImage>,
    pub triangles: Vec<Triangle>,
}

pub trait MeshImporter {
    fn load_model(&mut self, path: &Path) -> Result<ImportedModel, ImportError>;

    /// Called once the triangles are in world space.
    fn build_bvh(&self, triangles: &[Triangle]) -> Bvh {
        Bvh::build(triangles)
    }
}

#[derive(Debug, Default)]
pub struct GltfImporter;

impl MeshImporter for GltfImporter {
    fn load_model(&mut self, path: &Path) -> Result<ImportedModel, ImportError> {
        let (document, buffers, images) = gltf::import(path)?;
        let mut triangles = Vec::new();
        let scene = document.default_scene().or_else(|| document.scenes().next());
        if let Some(scene) = scene {
            for node in scene.nodes() {
                read_triangles(&mut triangles, &buffers, &node, &Mat4f::identity())?;
            }
        }
        let images = images
            .into_iter()
            .enumerate()
            .map(|(index, data)| convert_image(index, data))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            "Imported {} triangles and {} images from {}",
            triangles.len(),
            images.len(),
            path.display()
        );
        Ok(ImportedModel { images, triangles })
    }
}

fn read_triangles(
    triangles: &mut Vec<Triangle>,
    buffers: &[gltf::buffer::Data],
    node: &gltf::Node,
    transformation: &Mat4f,
) -> Result<(), ImportError> {
    let local_transformation_slice = node.transform().matrix();
    let local_transformation = Mat4f::from_fn(|y, x| local_transformation_slice[x][y] as Fp);
    let m_transformation = transformation * local_transformation;
    let normal_matrix = inverse_transforms(&m_transformation)
        .map(|(_, inverse_transpose)| inverse_transpose)
        .unwrap_or_else(Mat4f::identity);

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("<unnamed>").to_string();
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                warn!(
                    "Skipping primitive #{} of mesh `{}`: mode {:?} is not supported",
                    primitive.index(),
                    mesh_name,
                    primitive.mode()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let positions = reader
                .read_positions()
                .ok_or_else(|| ImportError::MissingPositions {
                    mesh: mesh_name.clone(),
                })?
                .map(|p| transform_point(&m_transformation, &Vec3f::from(p)))
                .collect::<Vec<_>>();
            let normals = reader.read_normals().map(|normals| {
                normals
                    .map(|n| transform_normal(&normal_matrix, &Vec3f::from(n)))
                    .collect::<Vec<_>>()
            });
            let uvs = reader
                .read_tex_coords(0)
                .map(|uvs| uvs.into_f32().map(Vec2f::from).collect::<Vec<_>>());
            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize).collect::<Vec<_>>(),
                None => (0..positions.len()).collect(),
            };

            let pbr = primitive.material().pbr_metallic_roughness();
            let texture_index = pbr
                .base_color_texture()
                .map(|info| info.texture().source().index());
            let base_color = Vec4f::from(pbr.base_color_factor());

            let before = triangles.len();
            for triangle in indices.chunks_exact(3) {
                let [a, b, c] = [triangle[0], triangle[1], triangle[2]];
                if a >= positions.len() || b >= positions.len() || c >= positions.len() {
                    warn!("Mesh `{}` has an out-of-range index, triangle dropped", mesh_name);
                    continue;
                }
                let mut tri = Triangle::new(positions[a], positions[b], positions[c]);
                if let Some(normals) = &normals {
                    let flat = face_normal(&tri.v0, &tri.v1, &tri.v2);
                    let normal_at = |i: usize| normals.get(i).copied().unwrap_or(flat);
                    tri.n0 = normal_at(a);
                    tri.n1 = normal_at(b);
                    tri.n2 = normal_at(c);
                }
                if let Some(uvs) = &uvs {
                    let uv_at = |i: usize| uvs.get(i).copied().unwrap_or_else(Vec2f::zeros);
                    tri.uv0 = uv_at(a);
                    tri.uv1 = uv_at(b);
                    tri.uv2 = uv_at(c);
                }
                tri.texture_index = texture_index;
                tri.base_color = base_color;
                triangles.push(tri);
            }
            debug!(
                "Mesh `{}` primitive #{}: {} triangles",
                mesh_name,
                primitive.index(),
                triangles.len() - before
            );
        }
    }
    for child in node.children() {
        read_triangles(triangles, buffers, &child, &m_transformation)?;
    }
    Ok(())
}

pub(crate) fn convert_image(
    index: usize,
    data: gltf::image::Data,
) -> Result<TextureImage, ImportError> {
    let (width, height) = (data.width, data.height);
    let invalid = || ImportError::InvalidImage {
        image: index,
        width,
        height,
    };
    let dynamic = match data.format {
        Format::R8 => DynamicImage::ImageLuma8(
            ImageBuffer::from_raw(width, height, data.pixels).ok_or_else(invalid)?,
        ),
        Format::R8G8 => DynamicImage::ImageLumaA8(
            ImageBuffer::from_raw(width, height, data.pixels).ok_or_else(invalid)?,
        ),
        Format::R8G8B8 => DynamicImage::ImageRgb8(
            ImageBuffer::from_raw(width, height, data.pixels).ok_or_else(invalid)?,
        ),
        Format::R8G8B8A8 => DynamicImage::ImageRgba8(
            ImageBuffer::from_raw(width, height, data.pixels).ok_or_else(invalid)?,
        ),
        Format::R16G16B16 => DynamicImage::ImageRgb16(
            ImageBuffer::from_raw(width, height, widen_u16(&data.pixels)).ok_or_else(invalid)?,
        ),
        Format::R16G16B16A16 => DynamicImage::ImageRgba16(
            ImageBuffer::from_raw(width, height, widen_u16(&data.pixels)).ok_or_else(invalid)?,
        ),
        other => {
            return Err(ImportError::UnsupportedImageFormat {
                image: index,
                format: format!("{:?}", other),
            })
        }
    };
    Ok(TextureImage {
        pixels: dynamic.to_rgba8(),
    })
}

fn widen_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}
