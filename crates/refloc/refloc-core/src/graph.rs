//! Animator graph model and the shared asset table.
//!
//! Containment is exclusive (a controller owns its layers, a layer owns its root
//! state machine, and so on) except for motions. Clips and blend trees live in the
//! [`AssetTable`] and every reference site (a state, a blend-tree child) stores an
//! [`AssetHandle`]. Rewriting a reference means swapping the handle at that site.

use serde::{Deserialize, Serialize};

use crate::data::{AvatarMask, Clip, Material, Texture};
use crate::ids::{AssetHandle, IdAllocator};

/// One entry of a blend tree. Blend parameters are carried but never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildMotion {
    pub motion: Option<AssetHandle>,
    #[serde(default)]
    pub threshold: f32,
    #[serde(default)]
    pub position: [f32; 2],
    #[serde(default = "one")]
    pub time_scale: f32,
    #[serde(default)]
    pub cycle_offset: f32,
    #[serde(default)]
    pub mirror: bool,
}

fn one() -> f32 {
    1.0
}

impl ChildMotion {
    pub fn new(motion: Option<AssetHandle>) -> Self {
        Self {
            motion,
            threshold: 0.0,
            position: [0.0, 0.0],
            time_scale: 1.0,
            cycle_offset: 0.0,
            mirror: false,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendTree {
    pub name: String,
    #[serde(default)]
    pub blend_parameter: String,
    #[serde(default)]
    pub children: Vec<ChildMotion>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimatorState {
    pub name: String,
    pub motion: Option<AssetHandle>,
    #[serde(default = "one")]
    pub speed: f32,
}

impl AnimatorState {
    pub fn new(name: impl Into<String>, motion: Option<AssetHandle>) -> Self {
        Self {
            name: name.into(),
            motion,
            speed: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildState {
    pub state: AnimatorState,
    #[serde(default)]
    pub position: [f32; 2],
}

impl From<AnimatorState> for ChildState {
    fn from(state: AnimatorState) -> Self {
        Self {
            state,
            position: [0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachine {
    pub name: String,
    #[serde(default)]
    pub states: Vec<ChildState>,
    #[serde(default)]
    pub state_machines: Vec<ChildStateMachine>,
}

impl StateMachine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: AnimatorState) -> Self {
        self.states.push(state.into());
        self
    }

    pub fn with_sub_machine(mut self, machine: StateMachine) -> Self {
        self.state_machines.push(machine.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildStateMachine {
    pub state_machine: StateMachine,
    #[serde(default)]
    pub position: [f32; 2],
}

impl From<StateMachine> for ChildStateMachine {
    fn from(state_machine: StateMachine) -> Self {
        Self {
            state_machine,
            position: [0.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerLayer {
    pub name: String,
    pub state_machine: StateMachine,
    #[serde(default)]
    pub avatar_mask: Option<AvatarMask>,
    #[serde(default = "one")]
    pub default_weight: f32,
}

impl ControllerLayer {
    pub fn new(name: impl Into<String>, state_machine: StateMachine) -> Self {
        Self {
            name: name.into(),
            state_machine,
            avatar_mask: None,
            default_weight: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub name: String,
    pub layers: Vec<ControllerLayer>,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layers: Vec::new(),
        }
    }

    pub fn with_layer(mut self, layer: ControllerLayer) -> Self {
        self.layers.push(layer);
        self
    }
}

/// Type discriminator for assets in the table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetKind {
    Clip,
    BlendTree,
    Controller,
    Texture,
    Material,
}

impl AssetKind {
    /// Motions are the assets a state or blend-tree child can reference.
    #[inline]
    pub fn is_motion(self) -> bool {
        matches!(self, AssetKind::Clip | AssetKind::BlendTree)
    }
}

/// Anything the table can hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Asset {
    Clip(Clip),
    BlendTree(BlendTree),
    Controller(Controller),
    Texture(Texture),
    Material(Material),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Clip(_) => AssetKind::Clip,
            Asset::BlendTree(_) => AssetKind::BlendTree,
            Asset::Controller(_) => AssetKind::Controller,
            Asset::Texture(_) => AssetKind::Texture,
            Asset::Material(_) => AssetKind::Material,
        }
    }
}

/// Handle-indexed storage shared by every reference site.
#[derive(Default, Debug, Clone)]
pub struct AssetTable {
    ids: IdAllocator,
    items: Vec<Asset>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: Asset) -> AssetHandle {
        let handle = self.ids.alloc_asset();
        debug_assert_eq!(handle.index(), self.items.len());
        self.items.push(asset);
        handle
    }

    /// Handle the next `insert` will return.
    pub fn next_handle(&self) -> AssetHandle {
        self.ids.peek()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, handle: AssetHandle) -> Option<&Asset> {
        self.items.get(handle.index())
    }

    pub fn kind(&self, handle: AssetHandle) -> Option<AssetKind> {
        self.get(handle).map(Asset::kind)
    }

    /// Overwrite the asset at `handle` wholesale. Returns the previous value.
    pub fn replace(&mut self, handle: AssetHandle, asset: Asset) -> Option<Asset> {
        self.items
            .get_mut(handle.index())
            .map(|slot| std::mem::replace(slot, asset))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AssetHandle, &Asset)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, a)| (AssetHandle(i as u32), a))
    }

    pub fn clip(&self, handle: AssetHandle) -> Option<&Clip> {
        match self.get(handle) {
            Some(Asset::Clip(c)) => Some(c),
            _ => None,
        }
    }

    pub fn blend_tree(&self, handle: AssetHandle) -> Option<&BlendTree> {
        match self.get(handle) {
            Some(Asset::BlendTree(b)) => Some(b),
            _ => None,
        }
    }

    pub fn blend_tree_mut(&mut self, handle: AssetHandle) -> Option<&mut BlendTree> {
        match self.items.get_mut(handle.index()) {
            Some(Asset::BlendTree(b)) => Some(b),
            _ => None,
        }
    }

    pub fn controller(&self, handle: AssetHandle) -> Option<&Controller> {
        match self.get(handle) {
            Some(Asset::Controller(c)) => Some(c),
            _ => None,
        }
    }

    pub fn texture(&self, handle: AssetHandle) -> Option<&Texture> {
        match self.get(handle) {
            Some(Asset::Texture(t)) => Some(t),
            _ => None,
        }
    }

    pub fn material(&self, handle: AssetHandle) -> Option<&Material> {
        match self.get(handle) {
            Some(Asset::Material(m)) => Some(m),
            _ => None,
        }
    }

    /// Every motion handle referenced from a controller, in traversal order
    /// (layers, then states before sub-machines, then blend-tree children).
    /// Shared blend trees are expanded once.
    pub fn referenced_motions(&self, controller: &Controller) -> Vec<AssetHandle> {
        let mut out = Vec::new();
        let mut seen = hashbrown::HashSet::new();
        for layer in &controller.layers {
            self.collect_machine(&layer.state_machine, &mut out, &mut seen);
        }
        out
    }

    fn collect_machine(
        &self,
        machine: &StateMachine,
        out: &mut Vec<AssetHandle>,
        seen: &mut hashbrown::HashSet<AssetHandle>,
    ) {
        for child in &machine.states {
            if let Some(m) = child.state.motion {
                self.collect_motion(m, out, seen);
            }
        }
        for sub in &machine.state_machines {
            self.collect_machine(&sub.state_machine, out, seen);
        }
    }

    fn collect_motion(
        &self,
        motion: AssetHandle,
        out: &mut Vec<AssetHandle>,
        seen: &mut hashbrown::HashSet<AssetHandle>,
    ) {
        out.push(motion);
        if let Some(tree) = self.blend_tree(motion) {
            if !seen.insert(motion) {
                return;
            }
            for child in &tree.children {
                if let Some(m) = child.motion {
                    self.collect_motion(m, out, seen);
                }
            }
        }
    }
}
