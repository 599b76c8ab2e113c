use std::fmt::Write;

use cubefield_kernel::{OrbitCamera, SceneState};
use glam::Vec3;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::from(&OrbitCamera::default())
    }
}

impl From<&OrbitCamera> for RenderView {
    fn from(camera: &OrbitCamera) -> Self {
        Self {
            eye: camera.position,
            target: camera.target,
            fov_degrees: camera.fov.to_degrees(),
            aspect: camera.aspect,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &SceneState, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable listing of the scene.
#[derive(Debug)]
pub struct DebugTextRenderer {
    /// Maximum number of box rows to print; the rest are summarized.
    pub max_rows: usize,
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self { max_rows: 10 }
    }
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneState, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Cube Field (frame={}) ===", scene.frame());
        let _ = writeln!(out, "Boxes: {}", scene.box_count());
        let members: Vec<String> = scene.members().iter().map(|m| m.to_string()).collect();
        let _ = writeln!(out, "Members: {}", members.join(", "));
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );

        for b in scene.boxes().iter().take(self.max_rows) {
            let p = b.transform.position;
            let r = b.transform.rotation;
            let _ = writeln!(
                out,
                "  [{}] pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) color={}",
                b.id, p.x, p.y, p.z, r.x, r.y, r.z, b.color
            );
        }
        let hidden = scene.box_count().saturating_sub(self.max_rows);
        if hidden > 0 {
            let _ = writeln!(out, "  ... {hidden} more");
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_controls::ControlParams;
    use cubefield_kernel::{CubeField, FieldConfig, SpawnConfig};

    fn field(ceiling: usize) -> CubeField {
        CubeField::new(FieldConfig {
            seed: Some(3),
            spawn: SpawnConfig {
                ceiling,
                ..SpawnConfig::default()
            },
            controls: ControlParams::default(),
            ..FieldConfig::default()
        })
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let f = field(1000);
        let output = DebugTextRenderer::new().render(&f.scene, &RenderView::default());

        assert!(output.contains("frame=0"));
        assert!(output.contains("Boxes: 0"));
        assert!(output.contains("plane"));
        assert!(!output.contains("more"));
    }

    #[test]
    fn debug_renderer_truncates_rows() {
        let mut f = field(25);
        f.tick();
        let output = DebugTextRenderer::with_max_rows(5).render(&f.scene, &RenderView::from(&f.camera));

        assert!(output.contains("Boxes: 25"));
        assert!(output.contains("[cube-0]"));
        assert!(output.contains("[cube-4]"));
        assert!(!output.contains("[cube-5]"));
        assert!(output.contains("... 20 more"));
    }

    #[test]
    fn render_view_from_camera() {
        let view = RenderView::default();
        assert!((view.fov_degrees - 45.0).abs() < 1e-4);
        assert_eq!(view.target, Vec3::ZERO);
        assert_eq!(view.eye, Vec3::new(-380.0, 120.0, 375.0));
    }
}
