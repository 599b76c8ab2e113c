use cubefield_common::{BoxId, Rgb};
use cubefield_kernel::{SceneMember, SceneState};
use glam::Vec3;
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene, used by the CLI and by the
/// "Output Objects" panel action.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &SceneState) -> SceneSummary {
        let bounds = scene.boxes().iter().fold(None, |acc: Option<(Vec3, Vec3)>, b| {
            let p = b.transform.position;
            Some(match acc {
                Some((lo, hi)) => (lo.min(p), hi.max(p)),
                None => (p, p),
            })
        });
        let max_extent = scene
            .boxes()
            .iter()
            .map(|b| b.size.max_element())
            .fold(0.0_f32, f32::max);

        SceneSummary {
            frame: scene.frame(),
            box_count: scene.box_count(),
            members: scene.members().iter().copied().collect(),
            bounds_min: bounds.map(|(lo, _)| lo.to_array()),
            bounds_max: bounds.map(|(_, hi)| hi.to_array()),
            max_extent,
            pending_events: scene.events().len(),
            state_hash: scene.state_hash(),
        }
    }

    /// Every object in the scene: singleton members first, then boxes in
    /// spawn order.
    pub fn list_objects(scene: &SceneState) -> Vec<ObjectInfo> {
        let members = scene.members().iter().map(|m| ObjectInfo::Member {
            member: *m,
            position: member_position(scene, *m).map(|p| p.to_array()),
        });
        let boxes = scene.boxes().iter().map(|b| ObjectInfo::Box {
            id: b.id,
            position: b.transform.position.to_array(),
            rotation: b.transform.rotation.to_array(),
            size: b.size.to_array(),
            color: b.color,
        });
        members.chain(boxes).collect()
    }

    /// Look up a single box.
    pub fn inspect_box(scene: &SceneState, id: BoxId) -> Option<ObjectInfo> {
        scene.get(id).map(|b| ObjectInfo::Box {
            id: b.id,
            position: b.transform.position.to_array(),
            rotation: b.transform.rotation.to_array(),
            size: b.size.to_array(),
            color: b.color,
        })
    }
}

fn member_position(scene: &SceneState, member: SceneMember) -> Option<Vec3> {
    let lights = scene.lights();
    match member {
        SceneMember::SpotLight | SceneMember::SpotLightHelper => Some(lights.spot_position),
        SceneMember::PointLight(i) => lights.point_lights.get(i as usize).map(|l| l.position),
        SceneMember::Plane | SceneMember::AxisMarker => Some(Vec3::ZERO),
        SceneMember::AmbientLight => None,
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub frame: u64,
    pub box_count: usize,
    pub members: Vec<SceneMember>,
    /// Component-wise minimum of box positions; `None` when there are no boxes.
    pub bounds_min: Option<[f32; 3]>,
    pub bounds_max: Option<[f32; 3]>,
    /// Largest single box dimension.
    pub max_extent: f32,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: frame={} boxes={} members={} pending_events={} hash={:016x}",
            self.frame,
            self.box_count,
            self.members.len(),
            self.pending_events,
            self.state_hash
        )?;
        if let (Some(lo), Some(hi)) = (self.bounds_min, self.bounds_max) {
            write!(
                f,
                " bounds=({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
                lo[0], lo[1], lo[2], hi[0], hi[1], hi[2]
            )?;
        }
        Ok(())
    }
}

/// One scene object as listed by [`SceneInspector::list_objects`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectInfo {
    Member {
        member: SceneMember,
        position: Option<[f32; 3]>,
    },
    Box {
        id: BoxId,
        position: [f32; 3],
        rotation: [f32; 3],
        size: [f32; 3],
        color: Rgb,
    },
}

impl std::fmt::Display for ObjectInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member {
                member,
                position: Some(p),
            } => write!(f, "{member} pos=({:.2}, {:.2}, {:.2})", p[0], p[1], p[2]),
            Self::Member {
                member,
                position: None,
            } => write!(f, "{member}"),
            Self::Box {
                id,
                position: p,
                rotation: r,
                size: s,
                color,
            } => write!(
                f,
                "{id} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2}) size=({:.2}, {:.2}, {:.2}) color={color}",
                p[0], p[1], p[2], r[0], r[1], r[2], s[0], s[1], s[2],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_controls::ControlParams;
    use cubefield_kernel::{CubeField, FieldConfig, SpawnConfig};

    fn field(ceiling: usize) -> CubeField {
        CubeField::new(FieldConfig {
            seed: Some(5),
            spawn: SpawnConfig {
                ceiling,
                ..SpawnConfig::default()
            },
            controls: ControlParams::default(),
            ..FieldConfig::default()
        })
    }

    #[test]
    fn summary_empty_scene() {
        let f = field(10);
        let summary = SceneInspector::summary(&f.scene);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.box_count, 0);
        assert!(summary.bounds_min.is_none());
        assert_eq!(summary.max_extent, 0.0);
        assert!(summary.members.contains(&SceneMember::Plane));
    }

    #[test]
    fn summary_after_tick() {
        let mut f = field(40);
        f.tick();
        let summary = SceneInspector::summary(&f.scene);
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.box_count, 40);
        assert!(summary.max_extent > 0.0 && summary.max_extent <= 10.0);

        let lo = summary.bounds_min.unwrap();
        let hi = summary.bounds_max.unwrap();
        assert!(lo[0] <= hi[0] && lo[2] <= hi[2]);
        assert!(lo[0] >= -300.0 && hi[0] <= 300.0);
    }

    #[test]
    fn summary_display() {
        let f = field(10);
        let s = SceneInspector::summary(&f.scene).to_string();
        assert!(s.contains("frame=0"));
        assert!(s.contains("boxes=0"));
        assert!(!s.contains("bounds"));
    }

    #[test]
    fn list_objects_members_then_boxes() {
        let mut f = field(3);
        f.tick();
        let objects = SceneInspector::list_objects(&f.scene);
        let members = f.scene.members().len();
        assert_eq!(objects.len(), members + 3);
        assert!(matches!(objects[0], ObjectInfo::Member { .. }));
        assert!(matches!(objects[members], ObjectInfo::Box { .. }));
        assert!(objects[members].to_string().starts_with("cube-0 pos="));
    }

    #[test]
    fn ambient_light_has_no_position() {
        let f = field(0);
        let ambient = SceneInspector::list_objects(&f.scene)
            .into_iter()
            .find(|o| matches!(o, ObjectInfo::Member { member: SceneMember::AmbientLight, .. }))
            .unwrap();
        assert_eq!(ambient.to_string(), "ambient-light");
    }

    #[test]
    fn inspect_box_lookup() {
        let mut f = field(2);
        f.tick();
        let id = f.scene.boxes()[1].id;
        assert!(matches!(
            SceneInspector::inspect_box(&f.scene, id),
            Some(ObjectInfo::Box { id: found, .. }) if found == id
        ));
        assert!(SceneInspector::inspect_box(&f.scene, BoxId(999)).is_none());
    }

    #[test]
    fn objects_serialize_with_kind_tag() {
        let mut f = field(1);
        f.tick();
        let objects = SceneInspector::list_objects(&f.scene);
        let json = serde_json::to_string(&objects).unwrap();
        assert!(json.contains(r#""kind":"member""#));
        assert!(json.contains(r#""kind":"box""#));
    }
}
