use glam::{Mat4, Vec3};

/// Orbit camera circling a target point.
///
/// Yaw 0 puts the eye on +Z of the target; positive pitch lifts it above.
/// Camera motion sits outside the terrain core and never affects it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    /// Eye at `(0, 0, 100)` looking at the character at `(0, -60, 0)`.
    fn default() -> Self {
        let offset = Vec3::new(0.0, 60.0, 100.0);
        Self {
            target: Vec3::new(0.0, -60.0, 0.0),
            distance: offset.length(),
            yaw: 0.0,
            pitch: offset.y.atan2(offset.z),
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 5000.0,
            sensitivity: 0.005,
            min_distance: 10.0,
            max_distance: 2000.0,
        }
    }
}

impl OrbitCamera {
    pub fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    /// Rotate around the target by a mouse delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Move toward (positive steps) or away from the target.
    pub fn zoom(&mut self, steps: f32) {
        self.distance =
            (self.distance * 0.9_f32.powf(steps)).clamp(self.min_distance, self.max_distance);
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_matches_framing() {
        let cam = OrbitCamera::default();
        let eye = cam.position();
        assert!((eye - Vec3::new(0.0, 0.0, 100.0)).length() < 1e-3);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut cam = OrbitCamera::default();
        cam.orbit(120.0, -40.0);
        let d = (cam.position() - cam.target).length();
        assert!((d - cam.distance).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 1.0e6);
        assert!(cam.pitch <= 89.0_f32.to_radians());
        cam.orbit(0.0, -1.0e7);
        assert!(cam.pitch >= -89.0_f32.to_radians());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1000.0);
        assert_eq!(cam.distance, cam.min_distance);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, cam.max_distance);
    }

    #[test]
    fn aspect_survives_zero_height() {
        let mut cam = OrbitCamera::default();
        cam.set_aspect(800, 0);
        assert_eq!(cam.aspect, 800.0);
    }
}
