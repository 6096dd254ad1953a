use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SceneError;
use crate::geometry::{Fp, Vec3f};

/// Raw material entry as written in the scene file. Every field is optional
/// here; which ones are required depends on `TYPE` and is checked by
/// [`Material::from_def`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MaterialDef {
    #[serde(rename = "RGB")]
    pub rgb: Option<[Fp; 3]>,
    #[serde(rename = "TYPE")]
    pub kind: Option<String>,
    #[serde(rename = "EMITTANCE")]
    pub emittance: Option<Fp>,
    #[serde(rename = "ROUGHNESS")]
    pub roughness: Option<Fp>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialTag {
    Light,
    DiffuseReflective,
    SpecularReflective,
    SpecularTransmissive,
    SpecularGlass,
    MicrofacetReflective,
    Diamond,
    Ceramic,
}

impl MaterialTag {
    pub fn parse(tag: &str) -> Option<MaterialTag> {
        let tag = match tag {
            "light" => MaterialTag::Light,
            "diffuse_reflective" | "diffuse" => MaterialTag::DiffuseReflective,
            "specular_reflective" | "specular" => MaterialTag::SpecularReflective,
            "specular_transmissive" | "transmissive" => MaterialTag::SpecularTransmissive,
            "specular_glass" | "glass" => MaterialTag::SpecularGlass,
            "microfacet_reflective" | "microfacet" => MaterialTag::MicrofacetReflective,
            "diamond" => MaterialTag::Diamond,
            "ceramic" => MaterialTag::Ceramic,
            _ => return None,
        };
        Some(tag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaterialKind {
    Light { emittance: Fp },
    DiffuseReflective,
    SpecularReflective { roughness: Fp },
    SpecularTransmissive { roughness: Fp },
    SpecularGlass { roughness: Fp },
    MicrofacetReflective { roughness: Fp },
    Diamond { roughness: Fp },
    Ceramic { roughness: Fp },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Vec3f,
}

impl Material {
    /// Validates one scene-file entry and turns it into a material.
    pub fn from_def(name: &str, def: &MaterialDef) -> Result<Material, SceneError> {
        let missing = |field| SceneError::MissingField {
            entry: format!("material `{}`", name),
            field,
        };
        let rgb = def.rgb.ok_or_else(|| missing("RGB"))?;
        let tag_name = def.kind.as_deref().ok_or_else(|| missing("TYPE"))?;
        let tag = MaterialTag::parse(tag_name).ok_or_else(|| SceneError::UnknownMaterialType {
            material: name.to_string(),
            tag: tag_name.to_string(),
        })?;
        let roughness = || def.roughness.ok_or_else(|| missing("ROUGHNESS"));
        let kind = match tag {
            MaterialTag::Light => MaterialKind::Light {
                emittance: def.emittance.ok_or_else(|| missing("EMITTANCE"))?,
            },
            MaterialTag::DiffuseReflective => MaterialKind::DiffuseReflective,
            MaterialTag::SpecularReflective => MaterialKind::SpecularReflective {
                roughness: roughness()?,
            },
            MaterialTag::SpecularTransmissive => MaterialKind::SpecularTransmissive {
                roughness: roughness()?,
            },
            MaterialTag::SpecularGlass => MaterialKind::SpecularGlass {
                roughness: roughness()?,
            },
            MaterialTag::MicrofacetReflective => MaterialKind::MicrofacetReflective {
                roughness: roughness()?,
            },
            MaterialTag::Diamond => MaterialKind::Diamond {
                roughness: roughness()?,
            },
            MaterialTag::Ceramic => MaterialKind::Ceramic {
                roughness: roughness()?,
            },
        };
        Ok(Material {
            kind,
            color: Vec3f::new(rgb[0], rgb[1], rgb[2]),
        })
    }

    pub fn tag(&self) -> MaterialTag {
        match self.kind {
            MaterialKind::Light { .. } => MaterialTag::Light,
            MaterialKind::DiffuseReflective => MaterialTag::DiffuseReflective,
            MaterialKind::SpecularReflective { .. } => MaterialTag::SpecularReflective,
            MaterialKind::SpecularTransmissive { .. } => MaterialTag::SpecularTransmissive,
            MaterialKind::SpecularGlass { .. } => MaterialTag::SpecularGlass,
            MaterialKind::MicrofacetReflective { .. } => MaterialTag::MicrofacetReflective,
            MaterialKind::Diamond { .. } => MaterialTag::Diamond,
            MaterialKind::Ceramic { .. } => MaterialTag::Ceramic,
        }
    }

    /// Zero for everything but lights.
    pub fn emittance(&self) -> Fp {
        match self.kind {
            MaterialKind::Light { emittance } => emittance,
            _ => 0.0,
        }
    }

    pub fn roughness(&self) -> Option<Fp> {
        match self.kind {
            MaterialKind::Light { .. } | MaterialKind::DiffuseReflective => None,
            MaterialKind::SpecularReflective { roughness }
            | MaterialKind::SpecularTransmissive { roughness }
            | MaterialKind::SpecularGlass { roughness }
            | MaterialKind::MicrofacetReflective { roughness }
            | MaterialKind::Diamond { roughness }
            | MaterialKind::Ceramic { roughness } => Some(roughness),
        }
    }
}

/// Materials in scene-file order plus the name lookup objects resolve against.
#[derive(Clone, Debug, Default)]
pub struct MaterialTable {
    pub materials: Vec<Material>,
    pub ids: HashMap<String, usize>,
}

impl MaterialTable {
    /// `section` must preserve document order; a key repeated inside the JSON
    /// object has already been collapsed to its last value by the parser.
    pub fn build(section: &Map<String, Value>) -> Result<MaterialTable, SceneError> {
        let mut table = MaterialTable {
            materials: Vec::with_capacity(section.len()),
            ids: HashMap::with_capacity(section.len()),
        };
        for (name, value) in section {
            debug!("mat name: {}", name);
            let def = MaterialDef::deserialize(value)?;
            let material = Material::from_def(name, &def)?;
            table.ids.insert(name.clone(), table.materials.len());
            table.materials.push(material);
        }
        Ok(table)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
