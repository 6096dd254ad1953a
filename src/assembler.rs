use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::assets::MeshAssets;
use crate::error::SceneError;
use crate::geometry::{Fp, Geom, GeomKind, InverseTransforms, Triangle, Vec3f};
use crate::importer::{ImportedModel, MeshImporter, TextureImage};
use crate::material::MaterialTable;
use crate::transform::{bake_triangle, build_transformation_matrix, inverse_transforms};

/// One entry of the `Objects` list.
#[derive(Clone, Debug, Deserialize)]
pub struct ObjectDef {
    #[serde(rename = "TYPE")]
    pub kind: String,
    #[serde(rename = "MATERIAL")]
    pub material: String,
    #[serde(rename = "TRANS")]
    pub translation: [Fp; 3],
    #[serde(rename = "ROTAT")]
    pub rotation: [Fp; 3],
    #[serde(rename = "SCALE")]
    pub scale: [Fp; 3],
    #[serde(rename = "FILEPATH")]
    pub file_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectTag {
    Mesh,
    Cube,
    Sphere,
}

impl ObjectTag {
    pub fn parse(tag: &str) -> Option<ObjectTag> {
        match tag {
            "mesh" => Some(ObjectTag::Mesh),
            "cube" => Some(ObjectTag::Cube),
            "sphere" => Some(ObjectTag::Sphere),
            _ => None,
        }
    }
}

/// Output of geometry assembly: primitives in object order, plus the shared
/// mesh buffers when at least one mesh object was present.
#[derive(Debug, Default)]
pub struct Geometry {
    pub geoms: Vec<Geom>,
    pub mesh_assets: Option<MeshAssets>,
}

// model-space triangles; the images already live in the shared list
struct CachedModel {
    triangles: Vec<Triangle>,
    image_offset: usize,
}

/// Turns object entries into render primitives. Mesh files go through
/// `importer`; each file is parsed at most once per assembly even when
/// several objects reference it.
pub struct GeometryAssembler<'a, I: MeshImporter> {
    materials: &'a MaterialTable,
    importer: &'a mut I,
    base_dir: &'a Path,
    cache: HashMap<PathBuf, CachedModel>,
    geoms: Vec<Geom>,
    triangles: Vec<Triangle>,
    images: Vec<TextureImage>,
    has_mesh: bool,
}

impl<'a, I: MeshImporter> GeometryAssembler<'a, I> {
    pub fn new(materials: &'a MaterialTable, importer: &'a mut I, base_dir: &'a Path) -> Self {
        GeometryAssembler {
            materials,
            importer,
            base_dir,
            cache: HashMap::new(),
            geoms: Vec::new(),
            triangles: Vec::new(),
            images: Vec::new(),
            has_mesh: false,
        }
    }

    pub fn assemble(mut self, objects: &[ObjectDef]) -> Result<Geometry, SceneError> {
        for (index, object) in objects.iter().enumerate() {
            let tag = ObjectTag::parse(&object.kind).ok_or_else(|| {
                SceneError::UnknownObjectType {
                    object: index,
                    tag: object.kind.clone(),
                }
            })?;
            let material_index = self.materials.index_of(&object.material).ok_or_else(|| {
                SceneError::UnresolvedMaterialReference {
                    object: index,
                    material: object.material.clone(),
                }
            })?;
            match tag {
                ObjectTag::Mesh => self.add_mesh(index, object, material_index)?,
                ObjectTag::Cube | ObjectTag::Sphere => {
                    self.add_implicit(index, tag, object, material_index)?
                }
            }
        }

        let mesh_assets = if self.has_mesh {
            let bvh = self.importer.build_bvh(&self.triangles);
            info!(
                "Built BVH with {} nodes over {} triangles",
                bvh.nodes.len(),
                self.triangles.len()
            );
            Some(MeshAssets {
                images: self.images,
                triangles: self.triangles,
                bvh,
            })
        } else {
            None
        };
        Ok(Geometry {
            geoms: self.geoms,
            mesh_assets,
        })
    }

    fn add_implicit(
        &mut self,
        index: usize,
        tag: ObjectTag,
        object: &ObjectDef,
        material_index: usize,
    ) -> Result<(), SceneError> {
        let (translation, rotation, scale) = trs(object);
        let transform = build_transformation_matrix(&translation, &rotation, &scale);
        let (inverse_transform, inverse_transpose_transform) =
            inverse_transforms(&transform).ok_or(SceneError::SingularTransform { object: index })?;
        let inverse = InverseTransforms {
            inverse_transform,
            inverse_transpose_transform,
        };
        let kind = match tag {
            ObjectTag::Sphere => GeomKind::Sphere(inverse),
            _ => GeomKind::Cube(inverse),
        };
        debug!("object #{}: {:?} with material {}", index, tag, material_index);
        self.geoms.push(Geom {
            kind,
            material_index,
            translation,
            rotation,
            scale,
            transform,
        });
        Ok(())
    }

    fn add_mesh(
        &mut self,
        index: usize,
        object: &ObjectDef,
        material_index: usize,
    ) -> Result<(), SceneError> {
        let file_path = object
            .file_path
            .as_deref()
            .ok_or_else(|| SceneError::MissingField {
                entry: format!("object #{}", index),
                field: "FILEPATH",
            })?;
        let path = resolve_model_path(self.base_dir, file_path);
        self.has_mesh = true;

        let cached = match self.cache.entry(path.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let ImportedModel { images, triangles } = self
                    .importer
                    .load_model(&path)
                    .map_err(|source| SceneError::ImportFailure {
                        path: path.clone(),
                        source,
                    })?;
                let image_offset = self.images.len();
                self.images.extend(images);
                entry.insert(CachedModel {
                    triangles,
                    image_offset,
                })
            }
        };

        let (translation, rotation, scale) = trs(object);
        let transform = build_transformation_matrix(&translation, &rotation, &scale);
        let normal_matrix =
            inverse_transforms(&transform).map(|(_, inverse_transpose)| inverse_transpose);
        if normal_matrix.is_none() {
            warn!(
                "object #{} has a non-invertible transform, normals are left untouched",
                index
            );
        }

        let first = self.triangles.len();
        for source in &cached.triangles {
            let mut triangle = source.clone();
            triangle.texture_index = triangle.texture_index.map(|t| t + cached.image_offset);
            bake_triangle(&mut triangle, &transform, normal_matrix.as_ref());
            self.geoms.push(Geom {
                kind: GeomKind::Triangle {
                    triangle_index: self.triangles.len(),
                },
                material_index,
                translation,
                rotation,
                scale,
                transform,
            });
            self.triangles.push(triangle);
        }
        debug!(
            "object #{}: mesh {} baked into triangles {}..{}",
            index,
            path.display(),
            first,
            self.triangles.len()
        );
        Ok(())
    }
}

fn trs(object: &ObjectDef) -> (Vec3f, Vec3f, Vec3f) {
    (
        Vec3f::from(object.translation),
        Vec3f::from(object.rotation),
        Vec3f::from(object.scale),
    )
}

/// Paths are tried as written first, then relative to the scene file.
pub fn resolve_model_path(base_dir: &Path, file_path: &Path) -> PathBuf {
    if file_path.is_absolute() || file_path.exists() {
        file_path.to_path_buf()
    } else {
        base_dir.join(file_path)
    }
}
