use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier of a box in the scene registry.
///
/// Ids are handed out sequentially by the scene and never reused, even after
/// a full reset, so log lines from before and after a reset stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoxId(pub u64);

/// Displays as the box name, `cube-<n>`.
impl std::fmt::Display for BoxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cube-{}", self.0)
    }
}

/// Spatial transform: position and Euler rotation (radians, XYZ order).
///
/// Rotation is kept as raw Euler angles rather than a quaternion because the
/// animator adds to each axis independently every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Rotation as a quaternion, for building model matrices.
    pub fn rotation_quat(&self) -> glam::Quat {
        glam::Quat::from_euler(
            glam::EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_id_names() {
        assert_eq!(BoxId(7).to_string(), "cube-7");
        assert_eq!(format!("{}", BoxId(12)), "cube-12");
    }

    #[test]
    fn box_ids_order_by_value() {
        assert!(BoxId(1) < BoxId(2));
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.rotation_quat(), glam::Quat::IDENTITY);
    }

    #[test]
    fn transform_at_keeps_rotation_zero() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Vec3::ZERO);
    }
}
