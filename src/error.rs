use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("couldn't read scene from {0}: only .json scene files are supported")]
    UnsupportedFormat(PathBuf),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scene description")]
    Parse(#[from] serde_json::Error),

    #[error("material `{material}` has unknown type `{tag}`")]
    UnknownMaterialType { material: String, tag: String },

    #[error("`{entry}` is missing required field `{field}`")]
    MissingField { entry: String, field: &'static str },

    #[error("object #{object} has unknown type `{tag}`")]
    UnknownObjectType { object: usize, tag: String },

    #[error("object #{object} references undefined material `{material}`")]
    UnresolvedMaterialReference { object: usize, material: String },

    #[error("object #{object} has a non-invertible transform")]
    SingularTransform { object: usize },

    #[error("invalid camera: {0}")]
    InvalidCamera(&'static str),

    #[error("failed to import model {path}")]
    ImportFailure {
        path: PathBuf,
        #[source]
        source: ImportError,
    },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Gltf(#[from] gltf::Error),

    #[error("mesh `{mesh}` has a primitive without positions")]
    MissingPositions { mesh: String },

    #[error("image #{image} uses unsupported pixel format {format}")]
    UnsupportedImageFormat { image: usize, format: String },

    #[error("image #{image} pixel data does not match its {width}x{height} size")]
    InvalidImage { image: usize, width: u32, height: u32 },
}
