//! Asset content model: keyframes, curves, clips, textures and materials.
//! Graph containers (blend trees, state machines, controllers) live in graph.rs.

use serde::{Deserialize, Serialize};

use crate::ids::AssetHandle;

/// A single curve key. Plain value type; compared with a float tolerance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub in_tangent: f32,
    #[serde(default)]
    pub out_tangent: f32,
    #[serde(default)]
    pub in_weight: f32,
    #[serde(default)]
    pub out_weight: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            ..Default::default()
        }
    }

    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }

    pub fn with_weights(mut self, in_weight: f32, out_weight: f32) -> Self {
        self.in_weight = in_weight;
        self.out_weight = out_weight;
        self
    }

    pub(crate) fn fields(&self) -> [f32; 6] {
        [
            self.time,
            self.value,
            self.in_tangent,
            self.out_tangent,
            self.in_weight,
            self.out_weight,
        ]
    }
}

/// Editor tangent mode of one side of a key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TangentMode {
    #[default]
    Free,
    Auto,
    Linear,
    Constant,
    ClampedAuto,
}

/// Left/right tangent modes for one key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct KeyTangentModes {
    pub left: TangentMode,
    pub right: TangentMode,
}

impl KeyTangentModes {
    pub fn new(left: TangentMode, right: TangentMode) -> Self {
        Self { left, right }
    }
}

/// Ordered keys plus their tangent modes (one `KeyTangentModes` per key).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    keys: Vec<Keyframe>,
    modes: Vec<KeyTangentModes>,
}

impl Curve {
    /// Curve with every key in `Free` mode on both sides.
    pub fn new(keys: Vec<Keyframe>) -> Self {
        let modes = vec![KeyTangentModes::default(); keys.len()];
        Self { keys, modes }
    }

    /// Returns `None` when the mode list does not match the key count.
    pub fn with_modes(keys: Vec<Keyframe>, modes: Vec<KeyTangentModes>) -> Option<Self> {
        (keys.len() == modes.len()).then_some(Self { keys, modes })
    }

    pub fn push(&mut self, key: Keyframe, modes: KeyTangentModes) {
        self.keys.push(key);
        self.modes.push(modes);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn key(&self, i: usize) -> Option<&Keyframe> {
        self.keys.get(i)
    }

    pub fn left_tangent_mode(&self, i: usize) -> Option<TangentMode> {
        self.modes.get(i).map(|m| m.left)
    }

    pub fn right_tangent_mode(&self, i: usize) -> Option<TangentMode> {
        self.modes.get(i).map(|m| m.right)
    }

    pub fn modes(&self) -> &[KeyTangentModes] {
        &self.modes
    }
}

/// (path, propertyName) pair identifying what a curve animates.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveBinding {
    /// Transform path relative to the animated root ("" for the root itself).
    pub path: String,
    pub property_name: String,
}

impl CurveBinding {
    pub fn new(path: impl Into<String>, property_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            property_name: property_name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundCurve {
    pub binding: CurveBinding,
    pub curve: Curve,
}

/// Animation clip: ordered bindings to curves plus timing attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub name: String,
    /// Duration in seconds.
    pub length: f32,
    pub frame_rate: f32,
    #[serde(default)]
    pub curves: Vec<BoundCurve>,
}

impl Clip {
    pub fn new(name: impl Into<String>, length: f32, frame_rate: f32) -> Self {
        Self {
            name: name.into(),
            length,
            frame_rate,
            curves: Vec::new(),
        }
    }

    pub fn with_curve(mut self, binding: CurveBinding, curve: Curve) -> Self {
        self.curves.push(BoundCurve { binding, curve });
        self
    }

    /// A clip with no bound curves animates nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &CurveBinding> {
        self.curves.iter().map(|c| &c.binding)
    }

    pub fn curve(&self, binding: &CurveBinding) -> Option<&Curve> {
        self.curves
            .iter()
            .find(|c| &c.binding == binding)
            .map(|c| &c.curve)
    }
}

/// Texture metadata. `content_hash` identifies the decoded image contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub content_hash: String,
}

impl Texture {
    pub fn new(width: u32, height: u32, content_hash: impl Into<String>) -> Self {
        Self {
            width,
            height,
            content_hash: content_hash.into(),
        }
    }

    /// Strip-shaped textures (1 or 4 texels thick, at least 32 long) are almost
    /// always ramps/gradients.
    pub fn probably_is_gradient(&self) -> bool {
        let max_dim = self.width.max(self.height);
        let min_dim = self.width.min(self.height);
        (min_dim == 1 || min_dim == 4) && max_dim >= 32
    }
}

/// Named texture property on a material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSlot {
    pub property: String,
    pub texture: Option<AssetHandle>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub slots: Vec<TextureSlot>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
        }
    }

    pub fn with_slot(mut self, property: impl Into<String>, texture: Option<AssetHandle>) -> Self {
        self.slots.push(TextureSlot {
            property: property.into(),
            texture,
        });
        self
    }

    pub fn textures(&self) -> impl Iterator<Item = AssetHandle> + '_ {
        self.slots.iter().filter_map(|s| s.texture)
    }
}

/// Per-layer body mask. Opaque to traversal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarMask {
    pub name: String,
    #[serde(default)]
    pub transforms: Vec<MaskTransform>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskTransform {
    pub path: String,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_modes_must_match_key_count() {
        let keys = vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 1.0)];
        assert!(Curve::with_modes(keys.clone(), vec![KeyTangentModes::default()]).is_none());
        let curve = Curve::with_modes(
            keys,
            vec![
                KeyTangentModes::new(TangentMode::Linear, TangentMode::Linear),
                KeyTangentModes::default(),
            ],
        )
        .unwrap();
        assert_eq!(curve.left_tangent_mode(0), Some(TangentMode::Linear));
        assert_eq!(curve.right_tangent_mode(1), Some(TangentMode::Free));
        assert_eq!(curve.left_tangent_mode(2), None);
    }

    #[test]
    fn empty_clip_has_no_curves() {
        let clip = Clip::new("idle", 1.0, 30.0);
        assert!(clip.is_empty());
        let clip = clip.with_curve(
            CurveBinding::new("", "m_LocalPosition.x"),
            Curve::new(vec![Keyframe::new(0.0, 1.0)]),
        );
        assert!(!clip.is_empty());
        assert!(clip
            .curve(&CurveBinding::new("", "m_LocalPosition.x"))
            .is_some());
    }

    #[test]
    fn gradient_heuristic() {
        assert!(Texture::new(256, 1, "").probably_is_gradient());
        assert!(Texture::new(4, 32, "").probably_is_gradient());
        assert!(!Texture::new(4, 16, "").probably_is_gradient());
        assert!(!Texture::new(2, 256, "").probably_is_gradient());
    }

    #[test]
    fn keyframe_json_uses_camel_case() {
        let k: Keyframe =
            serde_json::from_str(r#"{ "time": 0.5, "value": 2.0, "inTangent": 1.0 }"#).unwrap();
        assert_eq!(k.in_tangent, 1.0);
        assert_eq!(k.out_weight, 0.0);
    }
}
