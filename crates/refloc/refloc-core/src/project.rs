use hashbrown::HashMap;
use serde::Deserialize;
use uuid::Uuid;

use crate::data::{
    AvatarMask, Clip, Curve, CurveBinding, KeyTangentModes, Keyframe, Material, Texture,
};
use crate::error::RelocError;
use crate::graph::{
    AnimatorState, Asset, AssetKind, BlendTree, ChildMotion, ChildState, ChildStateMachine,
    Controller, ControllerLayer, StateMachine,
};
use crate::ids::AssetHandle;
use crate::index::AssetIndex;
use crate::memory::MemoryIndex;

/// Public API: parse a JSON project description (see fixtures/projects/*.json) into a
/// [`MemoryIndex`].
///
/// Notes:
/// - Assets are listed once each under a unique project path; handles follow list order.
/// - Motion references (state motions, blend-tree children) and material texture slots
///   name the referenced asset by path and must resolve to an asset of a fitting kind.
/// - `tangentModes` is optional per curve; when present it must have one entry per key.
/// - An explicit `guid` is kept, otherwise a random one is assigned.
pub fn parse_project_json(s: &str) -> Result<MemoryIndex, RelocError> {
    let project: RawProject = serde_json::from_str(s)?;

    let mut slots: HashMap<String, (AssetHandle, AssetKind)> = HashMap::new();
    for (i, entry) in project.assets.iter().enumerate() {
        let slot = (AssetHandle(i as u32), entry.body.kind());
        if slots.insert(entry.path.clone(), slot).is_some() {
            return Err(RelocError::DuplicatePath {
                path: entry.path.clone(),
            });
        }
    }

    let resolver = Resolver { slots: &slots };
    let mut index = MemoryIndex::new();
    for entry in project.assets {
        let expected = index.assets().next_handle();
        let asset = resolver.convert(&entry.path, entry.body)?;
        let handle = match entry.guid {
            Some(guid) => index.insert_with_guid(entry.path, guid, asset),
            None => index.insert(entry.path, asset),
        };
        debug_assert_eq!(handle, expected);
    }
    Ok(index)
}

struct Resolver<'a> {
    slots: &'a HashMap<String, (AssetHandle, AssetKind)>,
}

impl Resolver<'_> {
    fn convert(&self, path: &str, body: RawBody) -> Result<Asset, RelocError> {
        match body {
            RawBody::Clip(c) => to_clip(path, c).map(Asset::Clip),
            RawBody::BlendTree(t) => Ok(Asset::BlendTree(BlendTree {
                name: t.name,
                blend_parameter: t.blend_parameter,
                children: t
                    .children
                    .into_iter()
                    .map(|c| self.child_motion(path, c))
                    .collect::<Result<_, _>>()?,
            })),
            RawBody::Controller(c) => {
                let layers = c
                    .layers
                    .into_iter()
                    .map(|l| {
                        Ok(ControllerLayer {
                            name: l.name,
                            state_machine: self.state_machine(path, l.state_machine)?,
                            avatar_mask: l.avatar_mask,
                            default_weight: l.default_weight,
                        })
                    })
                    .collect::<Result<_, RelocError>>()?;
                Ok(Asset::Controller(Controller {
                    name: c.name,
                    layers,
                }))
            }
            RawBody::Texture(t) => Ok(Asset::Texture(Texture {
                width: t.width,
                height: t.height,
                content_hash: t.content_hash,
            })),
            RawBody::Material(m) => {
                let mut material = Material::new(m.name);
                for slot in m.slots {
                    let texture = match slot.texture {
                        Some(p) => Some(self.resolve(path, &p, |k| k == AssetKind::Texture)?),
                        None => None,
                    };
                    material = material.with_slot(slot.property, texture);
                }
                Ok(Asset::Material(material))
            }
        }
    }

    fn resolve(
        &self,
        owner: &str,
        target: &str,
        accepts: impl Fn(AssetKind) -> bool,
    ) -> Result<AssetHandle, RelocError> {
        match self.slots.get(target) {
            Some(&(handle, kind)) if accepts(kind) => Ok(handle),
            Some(&(_, kind)) => Err(RelocError::InvalidAsset {
                path: owner.to_string(),
                reason: format!("'{target}' is a {kind:?} and cannot be referenced here"),
            }),
            None => Err(RelocError::UnresolvedReference {
                owner: owner.to_string(),
                path: target.to_string(),
            }),
        }
    }

    fn motion(
        &self,
        owner: &str,
        target: Option<String>,
    ) -> Result<Option<AssetHandle>, RelocError> {
        target
            .map(|t| self.resolve(owner, &t, AssetKind::is_motion))
            .transpose()
    }

    fn child_motion(&self, owner: &str, c: RawChildMotion) -> Result<ChildMotion, RelocError> {
        Ok(ChildMotion {
            motion: self.motion(owner, c.motion)?,
            threshold: c.threshold,
            position: c.position,
            time_scale: c.time_scale,
            cycle_offset: c.cycle_offset,
            mirror: c.mirror,
        })
    }

    fn state_machine(&self, owner: &str, m: RawStateMachine) -> Result<StateMachine, RelocError> {
        let states = m
            .states
            .into_iter()
            .map(|s| {
                Ok(ChildState {
                    state: AnimatorState {
                        name: s.name,
                        motion: self.motion(owner, s.motion)?,
                        speed: s.speed,
                    },
                    position: s.position,
                })
            })
            .collect::<Result<_, RelocError>>()?;
        let state_machines = m
            .state_machines
            .into_iter()
            .map(|sub| {
                let position = sub.position;
                Ok(ChildStateMachine {
                    state_machine: self.state_machine(owner, sub)?,
                    position,
                })
            })
            .collect::<Result<_, RelocError>>()?;
        Ok(StateMachine {
            name: m.name,
            states,
            state_machines,
        })
    }
}

fn to_clip(path: &str, raw: RawClip) -> Result<Clip, RelocError> {
    let invalid = |reason: String| RelocError::InvalidAsset {
        path: path.to_string(),
        reason,
    };
    if !raw.length.is_finite() || raw.length < 0.0 {
        return Err(invalid(format!(
            "length must be finite and >= 0, got {}",
            raw.length
        )));
    }
    if !raw.frame_rate.is_finite() || raw.frame_rate <= 0.0 {
        return Err(invalid(format!(
            "frameRate must be finite and > 0, got {}",
            raw.frame_rate
        )));
    }

    let mut clip = Clip::new(raw.name, raw.length, raw.frame_rate);
    for rc in raw.curves {
        let binding = CurveBinding::new(rc.path, rc.property_name);
        if rc
            .keys
            .iter()
            .any(|k| k.fields().iter().any(|v| !v.is_finite()))
        {
            return Err(invalid(format!(
                "non-finite keyframe value on '{}:{}'",
                binding.path, binding.property_name
            )));
        }
        let curve = match rc.tangent_modes {
            None => Curve::new(rc.keys),
            Some(modes) => {
                let (keys, n) = (rc.keys, modes.len());
                let key_count = keys.len();
                Curve::with_modes(keys, modes).ok_or_else(|| {
                    invalid(format!(
                        "'{}:{}' has {key_count} keys but {n} tangent modes",
                        binding.path, binding.property_name
                    ))
                })?
            }
        };
        clip = clip.with_curve(binding, curve);
    }
    Ok(clip)
}

fn one() -> f32 {
    1.0
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct RawProject {
    assets: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    path: String,
    #[serde(default)]
    guid: Option<Uuid>,
    #[serde(flatten)]
    body: RawBody,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum RawBody {
    Clip(RawClip),
    BlendTree(RawBlendTree),
    Controller(RawController),
    Texture(RawTexture),
    Material(RawMaterial),
}

impl RawBody {
    fn kind(&self) -> AssetKind {
        match self {
            RawBody::Clip(_) => AssetKind::Clip,
            RawBody::BlendTree(_) => AssetKind::BlendTree,
            RawBody::Controller(_) => AssetKind::Controller,
            RawBody::Texture(_) => AssetKind::Texture,
            RawBody::Material(_) => AssetKind::Material,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClip {
    #[serde(default)]
    name: String,
    length: f32,
    frame_rate: f32,
    #[serde(default)]
    curves: Vec<RawCurve>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCurve {
    #[serde(default)]
    path: String,
    property_name: String,
    keys: Vec<Keyframe>,
    #[serde(default)]
    tangent_modes: Option<Vec<KeyTangentModes>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBlendTree {
    #[serde(default)]
    name: String,
    #[serde(default)]
    blend_parameter: String,
    #[serde(default)]
    children: Vec<RawChildMotion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChildMotion {
    motion: Option<String>,
    #[serde(default)]
    threshold: f32,
    #[serde(default)]
    position: [f32; 2],
    #[serde(default = "one")]
    time_scale: f32,
    #[serde(default)]
    cycle_offset: f32,
    #[serde(default)]
    mirror: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawController {
    #[serde(default)]
    name: String,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayer {
    name: String,
    state_machine: RawStateMachine,
    #[serde(default)]
    avatar_mask: Option<AvatarMask>,
    #[serde(default = "one")]
    default_weight: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStateMachine {
    #[serde(default)]
    name: String,
    #[serde(default)]
    states: Vec<RawState>,
    #[serde(default)]
    state_machines: Vec<RawStateMachine>,
    /// Editor position when nested as a sub-machine.
    #[serde(default)]
    position: [f32; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawState {
    name: String,
    #[serde(default)]
    motion: Option<String>,
    #[serde(default = "one")]
    speed: f32,
    #[serde(default)]
    position: [f32; 2],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTexture {
    width: u32,
    height: u32,
    content_hash: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMaterial {
    #[serde(default)]
    name: String,
    #[serde(default)]
    slots: Vec<RawSlot>,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    property: String,
    #[serde(default)]
    texture: Option<String>,
}
