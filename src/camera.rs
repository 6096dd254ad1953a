use serde::Deserialize;

use crate::error::SceneError;
use crate::geometry::{Fp, Vec2f, Vec3f, EPS};

/// The `Camera` section of a scene file.
#[derive(Clone, Debug, Deserialize)]
pub struct CameraDef {
    #[serde(rename = "RES")]
    pub resolution: [u32; 2],
    #[serde(rename = "FOVY")]
    pub fovy: Fp,
    #[serde(rename = "ITERATIONS")]
    pub iterations: u32,
    #[serde(rename = "DEPTH")]
    pub depth: u32,
    #[serde(rename = "FILE")]
    pub file: String,
    #[serde(rename = "EYE")]
    pub eye: [Fp; 3],
    #[serde(rename = "LOOKAT")]
    pub look_at: [Fp; 3],
    #[serde(rename = "UP")]
    pub up: [Fp; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub width: u32,
    pub height: u32,
    pub position: Vec3f,
    pub look_at: Vec3f,
    pub view: Vec3f,
    pub up: Vec3f,
    pub right: Vec3f,
    /// `(fovx, fovy)` in degrees.
    pub fov: Vec2f,
    pub pixel_length: Vec2f,
}

impl Camera {
    pub fn new(
        width: u32,
        height: u32,
        fovy: Fp,
        position: Vec3f,
        look_at: Vec3f,
        up: Vec3f,
    ) -> Result<Camera, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidCamera("resolution must be non-zero"));
        }
        // tan(fovy) is taken over the full angle, so 90 degrees and up flip or blow up
        if !(fovy > 0.0 && fovy < 90.0) {
            return Err(SceneError::InvalidCamera("FOVY must be in (0, 90) degrees"));
        }
        let w = width as Fp;
        let h = height as Fp;

        let yscaled = (fovy * (std::f32::consts::PI / 180.0)).tan();
        let xscaled = (yscaled * w) / h;
        let fovx = (xscaled.atan() * 180.0) / std::f32::consts::PI;

        let to_target = look_at - position;
        if to_target.norm() < EPS {
            return Err(SceneError::InvalidCamera("EYE and LOOKAT coincide"));
        }
        let view = to_target.normalize();
        let right = view.cross(&up);
        if right.norm() < EPS {
            return Err(SceneError::InvalidCamera("UP is parallel to the view direction"));
        }
        let right = right.normalize();

        Ok(Camera {
            width,
            height,
            position,
            look_at,
            view,
            up,
            right,
            fov: Vec2f::new(fovx, fovy),
            pixel_length: Vec2f::new(2.0 * xscaled / w, 2.0 * yscaled / h),
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Direction of the primary ray through pixel `(x, y)`,
    /// with `(0, 0)` at the top left of the image.
    pub fn ray_direction(&self, x: Fp, y: Fp) -> Vec3f {
        let half_w = self.width as Fp * 0.5;
        let half_h = self.height as Fp * 0.5;
        (self.view
            - self.right * self.pixel_length.x * (x - half_w)
            - self.up * self.pixel_length.y * (y - half_h))
            .normalize()
    }
}

/// Everything the renderer needs besides geometry: camera, sample budget and
/// the accumulation buffer it writes into.
#[derive(Clone, Debug)]
pub struct RenderState {
    pub camera: Camera,
    pub iterations: u32,
    pub trace_depth: u32,
    pub image_name: String,
    pub image: Vec<Vec3f>,
}

impl RenderState {
    pub fn from_def(def: &CameraDef) -> Result<RenderState, SceneError> {
        let [eye, look_at, up] = [def.eye, def.look_at, def.up].map(Vec3f::from);
        let camera = Camera::new(
            def.resolution[0],
            def.resolution[1],
            def.fovy,
            eye,
            look_at,
            up,
        )?;
        let image = vec![Vec3f::zeros(); camera.pixel_count()];
        Ok(RenderState {
            camera,
            iterations: def.iterations,
            trace_depth: def.depth,
            image_name: def.file.clone(),
            image,
        })
    }
}
