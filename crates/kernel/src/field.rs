use cubefield_controls::{ControlAction, ControlError, ControlParams};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animator::Animator;
use crate::camera::OrbitCamera;
use crate::config::FieldConfig;
use crate::scale::{ScaleAxis, ScaleController};
use crate::scene::{LightRig, SceneMember, SceneState};
use crate::spawner::Spawner;

/// Summary of one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub frame: u64,
    pub spawned: usize,
    pub exploded: bool,
    pub box_count: usize,
}

/// What an applied [`ControlAction`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionOutcome {
    Applied,
    Spawned(usize),
    Cleared(usize),
    /// Positions were multiplied by this factor on the action's axes.
    Rescaled(f32),
    /// The caller should list the scene objects.
    ObjectsRequested,
}

/// The whole application state: scene, parameters, camera and the
/// controllers that mutate them.
pub struct CubeField {
    pub scene: SceneState,
    pub controls: ControlParams,
    pub camera: OrbitCamera,
    spawner: Spawner,
    animator: Animator,
    width_scale: ScaleController,
    height_scale: ScaleController,
    batches_per_frame: usize,
    rng: StdRng,
}

impl CubeField {
    pub fn new(config: FieldConfig) -> Self {
        let plane = config.plane.size();
        let lights = LightRig::for_plane(
            plane,
            config.controls.ambient_color,
            config.controls.spot_light_color,
        );
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut field = Self {
            scene: SceneState::new(plane, lights),
            controls: config.controls.clone(),
            camera: OrbitCamera::default(),
            spawner: Spawner::new(plane, config.spawn.ceiling, config.spawn.batch_size),
            animator: Animator::new(),
            width_scale: ScaleController::new(
                ScaleAxis::Width,
                config.scale_mode,
                config.controls.expand_width,
            ),
            height_scale: ScaleController::new(
                ScaleAxis::Height,
                config.scale_mode,
                config.controls.expand_height,
            ),
            batches_per_frame: config.spawn.batches_per_frame.max(1),
            rng,
        };
        field.resolve_toggles();
        field
    }

    /// Run one frame: toggles, spawning, animation, camera.
    pub fn tick(&mut self) -> FrameReport {
        let _span = tracing::info_span!("frame_tick", frame = self.scene.frame()).entered();

        self.resolve_toggles();
        let spawned = self
            .spawner
            .fill(&mut self.scene, &mut self.rng, self.batches_per_frame);
        let exploded = self
            .animator
            .step(self.scene.boxes_mut(), &self.controls, &mut self.rng);
        self.camera.update();
        self.scene.advance_frame();

        let report = FrameReport {
            frame: self.scene.frame(),
            spawned,
            exploded,
            box_count: self.scene.box_count(),
        };
        tracing::trace!(?report, "frame complete");
        report
    }

    /// Bring optional scene members and camera auto-rotation in line with
    /// the current parameters. Idempotent.
    pub fn resolve_toggles(&mut self) {
        let c = &self.controls;
        let wanted = [
            (SceneMember::AmbientLight, c.ambient_light_on),
            (SceneMember::SpotLight, c.spot_light_on),
            (SceneMember::AxisMarker, c.show_axes),
            (SceneMember::Plane, c.show_plane),
            (SceneMember::SpotLightHelper, c.show_spot_light_helper),
        ];
        for (member, visible) in wanted {
            if self.scene.set_member(member, visible) {
                tracing::debug!(%member, visible, "toggled scene member");
            }
        }
        self.camera.auto_rotate = self.controls.rotate_camera;
    }

    /// Apply a one-shot panel action.
    pub fn apply(&mut self, action: ControlAction) -> Result<ActionOutcome, ControlError> {
        tracing::debug!(?action, "applying control action");
        let outcome = match action {
            ControlAction::AddCubes => {
                ActionOutcome::Spawned(self.spawner.spawn_batch(&mut self.scene, &mut self.rng))
            }
            ControlAction::OutputObjects => ActionOutcome::ObjectsRequested,
            ControlAction::ResetCamera => {
                self.reset_camera();
                ActionOutcome::Applied
            }
            ControlAction::ResetAll => ActionOutcome::Cleared(self.reset_all()),
            ControlAction::SetExpandWidth(factor) => {
                let m = self.width_scale.apply(self.scene.boxes_mut(), factor)?;
                self.controls.expand_width = factor;
                ActionOutcome::Rescaled(m)
            }
            ControlAction::SetExpandHeight(factor) => {
                let m = self.height_scale.apply(self.scene.boxes_mut(), factor)?;
                self.controls.expand_height = factor;
                ActionOutcome::Rescaled(m)
            }
            ControlAction::SetAmbientColor(color) => {
                self.controls.ambient_color = color;
                self.scene.set_ambient_color(color);
                ActionOutcome::Applied
            }
            ControlAction::SetSpotLightColor(color) => {
                self.controls.spot_light_color = color;
                self.scene.set_spot_color(color);
                ActionOutcome::Applied
            }
        };
        Ok(outcome)
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    /// Reset parameters and camera and destroy every box. Returns the number
    /// of boxes destroyed; the spawner refills on the next tick.
    pub fn reset_all(&mut self) -> usize {
        self.controls.reset();
        self.reset_camera();
        let cleared = self.scene.clear_boxes();
        tracing::info!(cleared, "reset all");
        cleared
    }

    /// Viewport size changed.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::HOME_POSITION;
    use crate::config::SpawnConfig;
    use crate::scene::SceneEvent;
    use cubefield_common::Rgb;
    use cubefield_controls::ScaleMode;
    use cubefield_controls::params::RESET_ROTATION_SPEED;
    use glam::Vec3;

    fn field_with(spawn: SpawnConfig, controls: ControlParams) -> CubeField {
        CubeField::new(FieldConfig {
            seed: Some(42),
            spawn,
            controls,
            ..FieldConfig::default()
        })
    }

    fn field() -> CubeField {
        field_with(SpawnConfig::default(), ControlParams::default())
    }

    fn gradual() -> SpawnConfig {
        SpawnConfig {
            batches_per_frame: 1,
            ..SpawnConfig::default()
        }
    }

    #[test]
    fn new_field_resolves_toggles() {
        let f = field();
        assert!(f.scene.contains(SceneMember::Plane));
        assert!(f.scene.contains(SceneMember::AmbientLight));
        assert!(!f.scene.contains(SceneMember::SpotLight));
        assert!(!f.scene.contains(SceneMember::AxisMarker));
        assert!(f.camera.auto_rotate);
        assert_eq!(f.scene.box_count(), 0);
    }

    #[test]
    fn first_tick_fills_to_ceiling() {
        let mut f = field();
        let report = f.tick();
        assert_eq!(report.spawned, 1000);
        assert_eq!(report.box_count, 1000);
        assert_eq!(report.frame, 1);
        assert_eq!(f.tick().spawned, 0);
    }

    #[test]
    fn gradual_spawn_grows_by_one_batch_per_frame() {
        let mut f = field_with(gradual(), ControlParams::default());
        let mut last = 0;
        for _ in 0..10 {
            let r = f.tick();
            assert_eq!(r.box_count, last + 100);
            last = r.box_count;
        }
        for _ in 0..5 {
            assert_eq!(f.tick().box_count, 1000);
        }
    }

    #[test]
    fn add_cubes_capped_at_ceiling() {
        let mut f = field();
        assert_eq!(f.apply(ControlAction::AddCubes).unwrap(), ActionOutcome::Spawned(100));
        f.tick();
        assert_eq!(f.apply(ControlAction::AddCubes).unwrap(), ActionOutcome::Spawned(0));
        assert_eq!(f.scene.box_count(), 1000);
    }

    #[test]
    fn reset_all_clears_and_resets_params() {
        let mut f = field();
        f.tick();
        f.controls.rotation_speed = 0.3;
        f.controls.show_axes = true;
        f.camera.orbit(50.0, 10.0);

        assert_eq!(f.apply(ControlAction::ResetAll).unwrap(), ActionOutcome::Cleared(1000));
        assert_eq!(f.scene.box_count(), 0);
        assert_eq!(f.controls.rotation_speed, RESET_ROTATION_SPEED);
        assert_eq!(f.controls.wave_frequency, 0.0);
        assert!(!f.controls.show_axes);
        assert!(!f.controls.show_plane);
        assert_eq!(f.camera.position, HOME_POSITION);

        // Plane removal happens on the next tick, which also refills.
        let r = f.tick();
        assert!(!f.scene.contains(SceneMember::Plane));
        assert_eq!(r.box_count, 1000);
    }

    #[test]
    fn reset_camera_leaves_scene_alone() {
        let mut f = field();
        f.tick();
        let hash = f.scene.state_hash();
        f.camera.zoom(0.5);
        f.apply(ControlAction::ResetCamera).unwrap();
        assert_eq!(f.camera.position, HOME_POSITION);
        assert_eq!(f.scene.state_hash(), hash);
    }

    #[test]
    fn toggling_to_current_value_is_noop() {
        let mut f = field();
        f.scene.drain_events();
        f.controls.show_plane = true;
        f.controls.ambient_light_on = true;
        f.resolve_toggles();
        f.resolve_toggles();
        assert!(f.scene.events().is_empty());

        f.controls.show_axes = true;
        f.resolve_toggles();
        f.resolve_toggles();
        assert_eq!(
            f.scene.drain_events(),
            vec![SceneEvent::MemberAdded(SceneMember::AxisMarker)]
        );
    }

    #[test]
    fn rotate_camera_mirrors_into_auto_rotate() {
        let mut f = field();
        f.controls.rotate_camera = false;
        f.tick();
        assert!(!f.camera.auto_rotate);
        assert_eq!(f.camera.position, HOME_POSITION);
    }

    #[test]
    fn explode_tick_through_field() {
        let mut f = field_with(
            SpawnConfig::default(),
            ControlParams {
                rotation_speed: 0.2,
                ..ControlParams::default()
            },
        );
        f.tick();
        let before: Vec<_> = f.scene.boxes().iter().map(|b| b.transform).collect();
        f.controls.exploding = true;
        assert!(f.tick().exploded);
        for (b, t) in f.scene.boxes().iter().zip(before) {
            let dp = b.transform.position - t.position * 1.01;
            let dr = b.transform.rotation - (t.rotation + Vec3::ONE);
            assert!(dp.abs().max_element() < 1e-3);
            assert!(dr.abs().max_element() < 1e-4);
        }
    }

    #[test]
    fn expand_width_updates_param_and_positions() {
        let mut f = field();
        f.tick();
        let x0 = f.scene.boxes()[0].transform.position.x;
        let out = f.apply(ControlAction::SetExpandWidth(2.0)).unwrap();
        assert_eq!(out, ActionOutcome::Rescaled(2.0));
        assert_eq!(f.controls.expand_width, 2.0);
        assert!((f.scene.boxes()[0].transform.position.x - 2.0 * x0).abs() < 1e-3);
    }

    #[test]
    fn expand_rejects_factor_below_one() {
        let mut f = field();
        f.tick();
        assert!(f.apply(ControlAction::SetExpandHeight(0.5)).is_err());
        assert_eq!(f.controls.expand_height, 1.0);
    }

    #[test]
    fn configured_expand_is_treated_as_applied() {
        let mut f = field_with(
            SpawnConfig::default(),
            ControlParams {
                expand_width: 2.0,
                ..ControlParams::default()
            },
        );
        f.tick();
        let x0 = f.scene.boxes()[0].transform.position.x;
        let out = f.apply(ControlAction::SetExpandWidth(2.0)).unwrap();
        assert_eq!(out, ActionOutcome::Rescaled(1.0));
        assert_eq!(f.scene.boxes()[0].transform.position.x, x0);

        let out = f.apply(ControlAction::SetExpandWidth(1.0)).unwrap();
        assert_eq!(out, ActionOutcome::Rescaled(0.5));
    }

    #[test]
    fn zero_batches_per_frame_still_spawns() {
        let mut f = field_with(
            SpawnConfig {
                batches_per_frame: 0,
                ..SpawnConfig::default()
            },
            ControlParams::default(),
        );
        f.tick();
        assert_eq!(f.scene.box_count(), 100);
    }

    #[test]
    fn relative_mode_selected_by_config() {
        let mut f = CubeField::new(FieldConfig {
            seed: Some(1),
            scale_mode: ScaleMode::Relative,
            ..FieldConfig::default()
        });
        f.tick();
        f.apply(ControlAction::SetExpandWidth(2.0)).unwrap();
        let out = f.apply(ControlAction::SetExpandWidth(1.5)).unwrap();
        assert_eq!(out, ActionOutcome::Rescaled(1.0 / 1.5));
    }

    #[test]
    fn light_colors_flow_into_scene() {
        let mut f = field();
        f.apply(ControlAction::SetAmbientColor(Rgb(0x202020))).unwrap();
        f.apply(ControlAction::SetSpotLightColor(Rgb(0xff8800))).unwrap();
        assert_eq!(f.scene.lights().ambient_color, Rgb(0x202020));
        assert_eq!(f.scene.lights().spot_color, Rgb(0xff8800));
        assert_eq!(f.controls.spot_light_color, Rgb(0xff8800));
    }

    #[test]
    fn output_objects_is_delegated() {
        let mut f = field();
        assert_eq!(
            f.apply(ControlAction::OutputObjects).unwrap(),
            ActionOutcome::ObjectsRequested
        );
    }

    #[test]
    fn same_seed_same_state() {
        let mut a = field();
        let mut b = field();
        for _ in 0..20 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.scene.state_hash(), b.scene.state_hash());
    }

    #[test]
    fn box_count_never_decreases_without_reset() {
        let mut f = field_with(
            gradual(),
            ControlParams {
                exploding: true,
                ..ControlParams::default()
            },
        );
        let mut last = 0;
        for _ in 0..30 {
            let n = f.tick().box_count;
            assert!(n >= last);
            assert!(n <= 1000);
            last = n;
        }
    }
}
