use std::collections::BTreeSet;

use cubefield_common::{BoxId, Rgb, Transform};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::spawner::Particle;

/// Largest absolute coordinate a box may reach. Explosion and expansion
/// compound multiplicatively, so positions are clamped here instead of
/// drifting to infinity.
pub const MAX_COORDINATE: f32 = 1.0e6;

pub const PLANE_COLOR: Rgb = Rgb(0x4b964b);
pub const CLEAR_COLOR: Rgb = Rgb(0x0a0a21);
pub const AXIS_MARKER_LENGTH: f32 = 300.0;
/// Undrained events kept before the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 1024;

const SPOT_LIGHT_POSITION: Vec3 = Vec3::new(-80.0, 120.0, -10.0);
const POINT_LIGHT_HEIGHT: f32 = 5.0;
const POINT_LIGHT_DISTANCE: f32 = 100.0;
const POINT_LIGHT_COLORS: [Rgb; 4] = [Rgb(0x0000ff), Rgb(0xff0000), Rgb(0xffff00), Rgb(0xff00ff)];
const QUADRANTS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

/// Singleton scene members. Everything that is not an animatable box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SceneMember {
    Plane,
    AmbientLight,
    SpotLight,
    /// One of the four quadrant lights, indexed 0..4.
    PointLight(u8),
    AxisMarker,
    /// Frustum marker for the spot light's shadow camera.
    SpotLightHelper,
}

impl std::fmt::Display for SceneMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plane => write!(f, "plane"),
            Self::AmbientLight => write!(f, "ambient-light"),
            Self::SpotLight => write!(f, "spot-light"),
            Self::PointLight(i) => write!(f, "point-light-{i}"),
            Self::AxisMarker => write!(f, "axis-marker"),
            Self::SpotLightHelper => write!(f, "spot-light-helper"),
        }
    }
}

/// A positioned, rotatable, colored box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubeBox {
    pub id: BoxId,
    /// Width, height, depth.
    pub size: Vec3,
    pub transform: Transform,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    /// Distance at which the light's contribution reaches zero.
    pub distance: f32,
}

/// Light parameters. Which lights are active is decided by scene membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightRig {
    pub ambient_color: Rgb,
    pub spot_color: Rgb,
    pub spot_position: Vec3,
    pub spot_target: Vec3,
    pub point_lights: [PointLight; 4],
}

impl LightRig {
    /// Default rig with one point light over the center of each plane quadrant.
    pub fn for_plane(plane: Vec2, ambient_color: Rgb, spot_color: Rgb) -> Self {
        let point_lights = std::array::from_fn(|i| {
            let (sx, sz) = QUADRANTS[i];
            PointLight {
                position: Vec3::new(
                    sx * plane.x / 4.0,
                    POINT_LIGHT_HEIGHT,
                    sz * plane.y / 4.0,
                ),
                color: POINT_LIGHT_COLORS[i],
                distance: POINT_LIGHT_DISTANCE,
            }
        });
        Self {
            ambient_color,
            spot_color,
            spot_position: SPOT_LIGHT_POSITION,
            spot_target: Vec3::ZERO,
            point_lights,
        }
    }
}

/// A record of every membership or registry change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    BoxesSpawned { first: BoxId, count: usize, total: usize },
    BoxesCleared { count: usize },
    MemberAdded(SceneMember),
    MemberRemoved(SceneMember),
    LightColorChanged { member: SceneMember, color: Rgb },
}

/// The full scene: the box registry, the singleton member set and the light
/// rig.
#[derive(Debug, Clone)]
pub struct SceneState {
    boxes: Vec<CubeBox>,
    members: BTreeSet<SceneMember>,
    lights: LightRig,
    plane_size: Vec2,
    frame: u64,
    next_id: u64,
    events: Vec<SceneEvent>,
}

impl SceneState {
    /// Empty scene with the four point lights present.
    pub fn new(plane_size: Vec2, lights: LightRig) -> Self {
        let members = (0..4).map(SceneMember::PointLight).collect();
        Self {
            boxes: Vec::new(),
            members,
            lights,
            plane_size,
            frame: 0,
            next_id: 0,
            events: Vec::new(),
        }
    }

    /// Frames completed since creation.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn plane_size(&self) -> Vec2 {
        self.plane_size
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn boxes(&self) -> &[CubeBox] {
        &self.boxes
    }

    pub fn boxes_mut(&mut self) -> &mut [CubeBox] {
        &mut self.boxes
    }

    pub fn get(&self, id: BoxId) -> Option<&CubeBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Append boxes built from particles at the given positions.
    /// Returns the number of boxes added.
    pub fn spawn_boxes<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = (Particle, Vec3)>,
    {
        let first = BoxId(self.next_id);
        let before = self.boxes.len();
        for (particle, position) in items {
            let id = BoxId(self.next_id);
            self.next_id += 1;
            self.boxes.push(CubeBox {
                id,
                size: particle.size(),
                transform: Transform::at(position),
                color: particle.color,
            });
        }
        let count = self.boxes.len() - before;
        if count > 0 {
            self.record(SceneEvent::BoxesSpawned {
                first,
                count,
                total: self.boxes.len(),
            });
        }
        count
    }

    /// Destroy every box. Returns how many were removed.
    pub fn clear_boxes(&mut self) -> usize {
        let count = self.boxes.len();
        self.boxes.clear();
        if count > 0 {
            self.record(SceneEvent::BoxesCleared { count });
        }
        count
    }

    pub fn members(&self) -> &BTreeSet<SceneMember> {
        &self.members
    }

    pub fn contains(&self, member: SceneMember) -> bool {
        self.members.contains(&member)
    }

    /// Add or remove a member to match `visible`. Returns true if membership
    /// changed.
    pub fn set_member(&mut self, member: SceneMember, visible: bool) -> bool {
        let changed = if visible {
            self.members.insert(member)
        } else {
            self.members.remove(&member)
        };
        if changed {
            self.record(if visible {
                SceneEvent::MemberAdded(member)
            } else {
                SceneEvent::MemberRemoved(member)
            });
        }
        changed
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn set_ambient_color(&mut self, color: Rgb) {
        if self.lights.ambient_color != color {
            self.lights.ambient_color = color;
            self.record(SceneEvent::LightColorChanged {
                member: SceneMember::AmbientLight,
                color,
            });
        }
    }

    pub fn set_spot_color(&mut self, color: Rgb) {
        if self.lights.spot_color != color {
            self.lights.spot_color = color;
            self.record(SceneEvent::LightColorChanged {
                member: SceneMember::SpotLight,
                color,
            });
        }
    }

    /// Append to the event log, dropping the oldest entries past
    /// [`MAX_PENDING_EVENTS`].
    fn record(&mut self, event: SceneEvent) {
        self.events.push(event);
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    /// Deterministic FNV-1a hash over frame, membership and box state.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        for member in &self.members {
            mix(&mut h, member.to_string().as_bytes());
        }
        for b in &self.boxes {
            mix(&mut h, &b.id.0.to_le_bytes());
            mix(&mut h, &b.color.0.to_le_bytes());
            for v in [b.size, b.transform.position, b.transform.rotation] {
                mix(&mut h, &v.x.to_le_bytes());
                mix(&mut h, &v.y.to_le_bytes());
                mix(&mut h, &v.z.to_le_bytes());
            }
        }
        h
    }
}

/// Clamp a position into `[-MAX_COORDINATE, MAX_COORDINATE]` on every axis.
pub fn clamp_position(p: Vec3) -> Vec3 {
    p.clamp(Vec3::splat(-MAX_COORDINATE), Vec3::splat(MAX_COORDINATE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> SceneState {
        let plane = Vec2::new(600.0, 400.0);
        SceneState::new(plane, LightRig::for_plane(plane, Rgb::BLACK, Rgb::WHITE))
    }

    fn particle() -> Particle {
        Particle {
            width: 2.0,
            height: 4.0,
            depth: 6.0,
            color: Rgb(0x123456),
        }
    }

    #[test]
    fn new_scene_has_point_lights_only() {
        let s = scene();
        assert_eq!(s.box_count(), 0);
        assert_eq!(s.members().len(), 4);
        for i in 0..4 {
            assert!(s.contains(SceneMember::PointLight(i)));
        }
        assert!(!s.contains(SceneMember::Plane));
    }

    #[test]
    fn point_lights_sit_over_quadrants() {
        let rig = LightRig::for_plane(Vec2::new(600.0, 400.0), Rgb::BLACK, Rgb::WHITE);
        assert_eq!(rig.point_lights[0].position, Vec3::new(-150.0, 5.0, -100.0));
        assert_eq!(rig.point_lights[3].position, Vec3::new(150.0, 5.0, 100.0));
        assert_eq!(rig.point_lights[1].color, Rgb(0xff0000));
    }

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut s = scene();
        let n = s.spawn_boxes([(particle(), Vec3::ZERO), (particle(), Vec3::X)]);
        assert_eq!(n, 2);
        assert_eq!(s.boxes()[0].id, BoxId(0));
        assert_eq!(s.boxes()[1].id, BoxId(1));
        assert_eq!(s.boxes()[1].size, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(
            s.events(),
            &[SceneEvent::BoxesSpawned {
                first: BoxId(0),
                count: 2,
                total: 2
            }]
        );
    }

    #[test]
    fn ids_not_reused_after_clear() {
        let mut s = scene();
        s.spawn_boxes([(particle(), Vec3::ZERO)]);
        assert_eq!(s.clear_boxes(), 1);
        s.spawn_boxes([(particle(), Vec3::ZERO)]);
        assert_eq!(s.boxes()[0].id, BoxId(1));
    }

    #[test]
    fn empty_spawn_and_clear_record_nothing() {
        let mut s = scene();
        assert_eq!(s.spawn_boxes(std::iter::empty()), 0);
        assert_eq!(s.clear_boxes(), 0);
        assert!(s.events().is_empty());
    }

    #[test]
    fn set_member_is_idempotent() {
        let mut s = scene();
        assert!(s.set_member(SceneMember::Plane, true));
        assert!(!s.set_member(SceneMember::Plane, true));
        assert!(s.set_member(SceneMember::Plane, false));
        assert!(!s.set_member(SceneMember::Plane, false));
        assert_eq!(s.drain_events().len(), 2);
    }

    #[test]
    fn undrained_log_keeps_newest_events() {
        let mut s = scene();
        for i in 0..2000 {
            s.set_member(SceneMember::Plane, i % 2 == 0);
        }
        assert_eq!(s.events().len(), MAX_PENDING_EVENTS);
        assert_eq!(
            s.events().last(),
            Some(&SceneEvent::MemberRemoved(SceneMember::Plane))
        );
    }

    #[test]
    fn light_color_change_recorded_once() {
        let mut s = scene();
        s.set_ambient_color(Rgb(0x101010));
        s.set_ambient_color(Rgb(0x101010));
        assert_eq!(s.lights().ambient_color, Rgb(0x101010));
        assert_eq!(s.events().len(), 1);
    }

    #[test]
    fn state_hash_tracks_box_changes() {
        let mut a = scene();
        let mut b = scene();
        a.spawn_boxes([(particle(), Vec3::ONE)]);
        b.spawn_boxes([(particle(), Vec3::ONE)]);
        assert_eq!(a.state_hash(), b.state_hash());
        b.boxes_mut()[0].transform.rotation.x += 0.1;
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn clamp_bounds_every_axis() {
        let p = clamp_position(Vec3::new(2.0e6, -3.0e6, 5.0));
        assert_eq!(p, Vec3::new(MAX_COORDINATE, -MAX_COORDINATE, 5.0));
    }
}
