use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::assembler::{GeometryAssembler, ObjectDef};
use crate::assets::MeshAssets;
use crate::bvh::{Bvh, BvhNode};
use crate::camera::{Camera, CameraDef, RenderState};
use crate::error::SceneError;
use crate::geometry::{Geom, Triangle};
use crate::importer::{GltfImporter, MeshImporter, TextureImage};
use crate::material::{Material, MaterialTable};

/// Top level of a scene file.
#[derive(Clone, Debug, Deserialize)]
pub struct SceneFile {
    #[serde(rename = "Materials")]
    pub materials: Map<String, Value>,
    #[serde(rename = "Objects", default)]
    pub objects: Vec<ObjectDef>,
    #[serde(rename = "Camera")]
    pub camera: CameraDef,
}

/// A fully loaded scene. Every derived buffer is built once in [`Scene::load`]
/// and only read afterwards, so a `&Scene` can be shared freely.
#[derive(Debug)]
pub struct Scene {
    pub source: PathBuf,
    pub materials: MaterialTable,
    pub geoms: Vec<Geom>,
    pub state: RenderState,
    mesh_assets: Option<MeshAssets>,
}

impl Scene {
    /// Loads a `.json` scene, importing meshes as glTF.
    pub fn load(path: impl AsRef<Path>) -> Result<Scene, SceneError> {
        Scene::load_with(path, &mut GltfImporter)
    }

    pub fn load_with<I: MeshImporter>(
        path: impl AsRef<Path>,
        importer: &mut I,
    ) -> Result<Scene, SceneError> {
        let path = path.as_ref();
        info!("Reading scene from {} ...", path.display());
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            return Err(SceneError::UnsupportedFormat(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut scene = Scene::from_json_str(&content, base_dir, importer)?;
        scene.source = path.to_path_buf();
        Ok(scene)
    }

    /// Builds a scene from scene-file text. Relative model paths that don't
    /// exist as written are looked up under `base_dir`.
    pub fn from_json_str<I: MeshImporter>(
        content: &str,
        base_dir: &Path,
        importer: &mut I,
    ) -> Result<Scene, SceneError> {
        let file: SceneFile = serde_json::from_str(content)?;

        let materials = MaterialTable::build(&file.materials)?;
        let geometry =
            GeometryAssembler::new(&materials, importer, base_dir).assemble(&file.objects)?;
        let state = RenderState::from_def(&file.camera)?;

        info!(
            "Loaded {} materials, {} primitives, {}x{} camera",
            materials.len(),
            geometry.geoms.len(),
            state.camera.width,
            state.camera.height
        );
        Ok(Scene {
            source: PathBuf::new(),
            materials,
            geoms: geometry.geoms,
            state,
            mesh_assets: geometry.mesh_assets,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.state.camera
    }

    pub fn material(&self, geom: &Geom) -> &Material {
        &self.materials.materials[geom.material_index]
    }

    /// `None` when the scene has no mesh object.
    pub fn mesh_assets(&self) -> Option<&MeshAssets> {
        self.mesh_assets.as_ref()
    }

    pub fn bvh(&self) -> Option<&Bvh> {
        self.mesh_assets.as_ref().map(|assets| &assets.bvh)
    }

    pub fn bvh_nodes(&self) -> &[BvhNode] {
        self.bvh().map(|bvh| bvh.nodes.as_slice()).unwrap_or(&[])
    }

    pub fn images(&self) -> &[TextureImage] {
        self.mesh_assets
            .as_ref()
            .map(|assets| assets.images.as_slice())
            .unwrap_or(&[])
    }

    pub fn triangle_buffer(&self) -> Option<&[Triangle]> {
        self.mesh_assets
            .as_ref()
            .map(|assets| assets.triangles.as_slice())
    }

    /// Hands the mesh buffers over to the caller, e.g. for upload.
    pub fn take_mesh_assets(&mut self) -> Option<MeshAssets> {
        self.mesh_assets.take()
    }
}
