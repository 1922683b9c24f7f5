//! Orbit camera for the showcase scene.

use cgmath::{perspective, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

use crate::viewer::bounds::Aabb;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// How far back the camera sits relative to the framed volume's diagonal.
const FRAMING_DISTANCE_FACTOR: f32 = 1.5;
const MIN_DISTANCE: f32 = 0.05;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    eye: Vector3<f32>,
    up: Vector3<f32>,
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            target,
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            eye: Vector3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
        };
        camera.update();
        camera
    }

    pub fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj = OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    /// Frames a bounding volume: orbit target at its center, camera pulled
    /// back along +Z to 1.5x the diagonal, looking at the center.
    pub fn frame(&mut self, bounds: &Aabb) {
        self.target = bounds.center();
        self.distance = (bounds.diagonal() * FRAMING_DISTANCE_FACTOR).max(MIN_DISTANCE);
        self.pitch = 0.0;
        self.yaw = 0.0;
        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.max(MIN_DISTANCE);
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        self.set_distance(self.distance + delta * self.distance.max(MIN_DISTANCE) * 0.1);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw += delta;
        self.update();
    }

    /// Pans the focus point in the camera's view plane.
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        let pan_scale = self.distance * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.eye += movement;
        self.target += movement;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: [self.eye.x, self.eye.y, self.eye.z, 1.0],
            view_proj: self.build_view_projection_matrix().into(),
        }
    }

    /// Recomputes the eye position from `distance`, `pitch` and `yaw`.
    fn update(&mut self) {
        self.eye = Vector3::new(
            self.target.x + self.distance * self.pitch.cos() * self.yaw.sin(),
            self.target.y + self.distance * self.pitch.sin(),
            self.target.z + self.distance * self.pitch.cos() * self.yaw.cos(),
        );
    }
}

/// Camera data as laid out for the shader; homogenous eye position keeps
/// the 16-byte alignment requirement.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_distance_is_1_5x_diagonal() {
        let bounds = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.7, Vector3::new(9.0, 9.0, 9.0), 1.0);
        camera.frame(&bounds);

        assert_eq!(camera.target, bounds.center());
        assert!((camera.distance - bounds.diagonal() * 1.5).abs() < 1e-6);
        // Offset along a single axis, looking at the center.
        let eye = camera.eye();
        assert!((eye.x - bounds.center().x).abs() < 1e-6);
        assert!((eye.y - bounds.center().y).abs() < 1e-6);
        assert!((eye.z - (bounds.center().z + camera.distance)).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        camera.resize_projection(1600, 800);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        // Degenerate sizes are ignored.
        camera.resize_projection(0, 800);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_zoom_never_reaches_target() {
        let mut camera = OrbitCamera::new(0.2, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0);
        for _ in 0..100 {
            camera.add_distance(-1.0);
        }
        assert!(camera.distance >= MIN_DISTANCE);
    }
}
