//! Camera: quaternion orientation plus a left-handed perspective frustum
//!
//! Camera space looks down +Z with +Y up and +X to the right.

use super::error::{RenderError, RenderResult};
use super::math::{Mat4, Quat, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    orientation: Quat,
    near: f32,
    far: f32,
    /// Vertical field of view in degrees
    fov: f32,
    aspect: f32,
    /// Pose restored by `reset`
    home: (Vec3, Quat),
}

impl Camera {
    pub fn new(
        position: Vec3,
        orientation: Quat,
        near: f32,
        far: f32,
        fov: f32,
        aspect: f32,
    ) -> RenderResult<Self> {
        let finite = [near, far, fov, aspect, position.x, position.y, position.z]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(RenderError::InvalidCameraConfig(
                "non-finite camera parameter".to_string(),
            ));
        }
        if near >= far {
            return Err(RenderError::InvalidCameraConfig(format!(
                "near ({}) must be less than far ({})",
                near, far
            )));
        }
        if fov <= 0.0 || fov >= 180.0 {
            return Err(RenderError::InvalidCameraConfig(format!(
                "fov {} outside (0, 180)",
                fov
            )));
        }
        if aspect <= 0.0 {
            return Err(RenderError::InvalidCameraConfig(format!(
                "aspect {} must be positive",
                aspect
            )));
        }

        let orientation = orientation.normalize();
        Ok(Self {
            position,
            orientation,
            home: (position, orientation),
            near,
            far,
            fov,
            aspect,
        })
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation.normalize();
    }

    /// Back to the pose the camera was created with
    pub fn reset(&mut self) {
        (self.position, self.orientation) = self.home;
    }

    /// Far plane distance used for clipping. Only a proper depth range
    /// (`0 < near < far`) defines one.
    pub fn far_clip(&self) -> Option<f32> {
        (self.near > 0.0).then_some(self.far)
    }

    /// tan(fov/2): half-height of the frustum at unit depth
    pub fn half_extent_y(&self) -> f32 {
        (self.fov.to_radians() * 0.5).tan()
    }

    /// Half-width of the frustum at unit depth
    pub fn half_extent_x(&self) -> f32 {
        self.half_extent_y() * self.aspect
    }

    /// World to camera space: translate by -position, then undo the orientation
    pub fn model_view_matrix(&self) -> Mat4 {
        let p = self.position;
        Mat4::translation(-p.x, -p.y, -p.z) * Mat4::from_mat3(&self.orientation.conjugate().to_mat3())
    }

    pub fn perspective_matrix(&self) -> Mat4 {
        Mat4::perspective_lh(self.near, self.far, self.fov.to_radians(), self.aspect)
    }

    /// Incremental rotation in degrees: heading around world Y, pitch around camera X
    pub fn rotate(&mut self, heading: f32, pitch: f32) {
        let yaw = Quat::rotation_y(heading);
        let tilt = Quat::rotation_x(pitch);
        self.orientation = (yaw * self.orientation * tilt).normalize();
    }

    /// Translate by an offset expressed in camera space
    pub fn move_by(&mut self, v: Vec3) {
        self.position = self.position + self.orientation.rotate(v);
    }
}
