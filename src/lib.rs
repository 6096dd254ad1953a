pub mod aabb;
pub mod assembler;
pub mod assets;
pub mod bvh;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod importer;
pub mod material;
pub mod scene;
pub mod transform;


pub use error::{ImportError, SceneError};
pub use scene::Scene;
