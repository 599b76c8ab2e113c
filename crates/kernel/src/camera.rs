use glam::{Mat4, Quat, Vec3};

/// Initial (and reset) camera position.
pub const HOME_POSITION: Vec3 = Vec3::new(-380.0, 120.0, 375.0);

/// Frames per second the auto-rotate speed is expressed against.
const REFERENCE_FPS: f32 = 60.0;
/// Default auto-rotate speed: one revolution per 30 seconds at 60 fps.
const DEFAULT_AUTO_ROTATE_SPEED: f32 = 2.0;
/// Elevation limit, keeps the camera off the poles.
const MAX_ELEVATION: f32 = 1.5;

/// Perspective camera orbiting a target point.
///
/// Auto-rotation spins the camera around the vertical axis through the
/// target; drag and scroll input orbit and dolly it.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            position: HOME_POSITION,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            auto_rotate: false,
            auto_rotate_speed: DEFAULT_AUTO_ROTATE_SPEED,
            sensitivity: 0.005,
            min_distance: 10.0,
            max_distance: 900.0,
        }
    }
}

impl OrbitCamera {
    /// Put the camera back at its home position, looking at the target.
    pub fn reset(&mut self) {
        self.position = HOME_POSITION;
    }

    /// Update the aspect ratio for a new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    /// Per-frame update: applies auto-rotation when enabled.
    pub fn update(&mut self) {
        if self.auto_rotate {
            let angle =
                std::f32::consts::TAU / REFERENCE_FPS / REFERENCE_FPS * self.auto_rotate_speed;
            self.rotate_about_target(angle);
        }
    }

    fn rotate_about_target(&mut self, angle: f32) {
        let offset = self.position - self.target;
        self.position = self.target + Quat::from_rotation_y(angle) * offset;
    }

    /// Orbit from a pointer drag, in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) - dx * self.sensitivity;
        let elevation = ((offset.y / radius).asin() + dy * self.sensitivity)
            .clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.position = self.target
            + radius
                * Vec3::new(
                    elevation.cos() * azimuth.sin(),
                    elevation.sin(),
                    elevation.cos() * azimuth.cos(),
                );
    }

    /// Dolly toward (factor < 1) or away from (factor > 1) the target.
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let distance = (offset.length() * factor).clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset.normalize_or_zero() * distance;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
