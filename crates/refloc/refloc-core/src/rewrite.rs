//! Type-directed graph rewriting over animator controllers.
//!
//! A [`Replacement`] carries one function bound to exactly one [`NodeKind`]. The
//! [`Rewriter`] walks a subgraph in declared order; at a node of the bound kind it
//! applies the function and does not descend further, everywhere else it recurses
//! into owned children and rebuilds each child collection element-wise before
//! assigning it back to its parent.
//!
//! Motion references are handles into the [`AssetTable`]. Replacing a motion swaps
//! the handle at the referencing site; descending into a blend tree rewrites the
//! shared tree in the table. A blend tree is descended into at most once per
//! rewrite, which also stops a tree that (directly or indirectly) contains itself.

use hashbrown::HashSet;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::data::AvatarMask;
use crate::error::RelocError;
use crate::graph::{
    AnimatorState, Asset, AssetKind, AssetTable, ChildMotion, ChildState, ChildStateMachine,
    Controller, ControllerLayer, StateMachine,
};
use crate::ids::AssetHandle;

/// Node variants a replacement can be bound to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Clip,
    BlendTree,
    /// Any motion reference, clip or blend tree.
    Motion,
    ChildMotion,
    AnimatorState,
    ChildState,
    StateMachine,
    ChildStateMachine,
    AvatarMask,
    ControllerLayer,
    Controller,
}

/// A root to rewrite. Motion-like variants are handles into the table; the rest
/// are owned values that are returned (possibly modified) by the rewrite.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Clip(AssetHandle),
    BlendTree(AssetHandle),
    Motion(AssetHandle),
    ChildMotion(ChildMotion),
    AnimatorState(AnimatorState),
    ChildState(ChildState),
    StateMachine(StateMachine),
    ChildStateMachine(ChildStateMachine),
    AvatarMask(AvatarMask),
    ControllerLayer(ControllerLayer),
    Controller(Controller),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Clip(_) => NodeKind::Clip,
            Node::BlendTree(_) => NodeKind::BlendTree,
            Node::Motion(_) => NodeKind::Motion,
            Node::ChildMotion(_) => NodeKind::ChildMotion,
            Node::AnimatorState(_) => NodeKind::AnimatorState,
            Node::ChildState(_) => NodeKind::ChildState,
            Node::StateMachine(_) => NodeKind::StateMachine,
            Node::ChildStateMachine(_) => NodeKind::ChildStateMachine,
            Node::AvatarMask(_) => NodeKind::AvatarMask,
            Node::ControllerLayer(_) => NodeKind::ControllerLayer,
            Node::Controller(_) => NodeKind::Controller,
        }
    }
}

pub type HandleFn<'p> = Box<dyn FnMut(&AssetTable, AssetHandle) -> AssetHandle + 'p>;
pub type ValueFn<'p, T> = Box<dyn FnMut(&AssetTable, T) -> T + 'p>;

/// Replacement function bound to a single node kind.
pub enum Replacement<'p> {
    Clip(HandleFn<'p>),
    BlendTree(HandleFn<'p>),
    Motion(HandleFn<'p>),
    ChildMotion(ValueFn<'p, ChildMotion>),
    AnimatorState(ValueFn<'p, AnimatorState>),
    ChildState(ValueFn<'p, ChildState>),
    StateMachine(ValueFn<'p, StateMachine>),
    ChildStateMachine(ValueFn<'p, ChildStateMachine>),
    AvatarMask(ValueFn<'p, AvatarMask>),
    ControllerLayer(ValueFn<'p, ControllerLayer>),
    Controller(ValueFn<'p, Controller>),
}

impl<'p> Replacement<'p> {
    pub fn clip(f: impl FnMut(&AssetTable, AssetHandle) -> AssetHandle + 'p) -> Self {
        Self::Clip(Box::new(f))
    }

    pub fn blend_tree(f: impl FnMut(&AssetTable, AssetHandle) -> AssetHandle + 'p) -> Self {
        Self::BlendTree(Box::new(f))
    }

    pub fn motion(f: impl FnMut(&AssetTable, AssetHandle) -> AssetHandle + 'p) -> Self {
        Self::Motion(Box::new(f))
    }

    pub fn child_motion(f: impl FnMut(&AssetTable, ChildMotion) -> ChildMotion + 'p) -> Self {
        Self::ChildMotion(Box::new(f))
    }

    pub fn animator_state(
        f: impl FnMut(&AssetTable, AnimatorState) -> AnimatorState + 'p,
    ) -> Self {
        Self::AnimatorState(Box::new(f))
    }

    pub fn child_state(f: impl FnMut(&AssetTable, ChildState) -> ChildState + 'p) -> Self {
        Self::ChildState(Box::new(f))
    }

    pub fn state_machine(f: impl FnMut(&AssetTable, StateMachine) -> StateMachine + 'p) -> Self {
        Self::StateMachine(Box::new(f))
    }

    pub fn child_state_machine(
        f: impl FnMut(&AssetTable, ChildStateMachine) -> ChildStateMachine + 'p,
    ) -> Self {
        Self::ChildStateMachine(Box::new(f))
    }

    pub fn avatar_mask(f: impl FnMut(&AssetTable, AvatarMask) -> AvatarMask + 'p) -> Self {
        Self::AvatarMask(Box::new(f))
    }

    pub fn controller_layer(
        f: impl FnMut(&AssetTable, ControllerLayer) -> ControllerLayer + 'p,
    ) -> Self {
        Self::ControllerLayer(Box::new(f))
    }

    pub fn controller(f: impl FnMut(&AssetTable, Controller) -> Controller + 'p) -> Self {
        Self::Controller(Box::new(f))
    }

    pub fn target(&self) -> NodeKind {
        match self {
            Replacement::Clip(_) => NodeKind::Clip,
            Replacement::BlendTree(_) => NodeKind::BlendTree,
            Replacement::Motion(_) => NodeKind::Motion,
            Replacement::ChildMotion(_) => NodeKind::ChildMotion,
            Replacement::AnimatorState(_) => NodeKind::AnimatorState,
            Replacement::ChildState(_) => NodeKind::ChildState,
            Replacement::StateMachine(_) => NodeKind::StateMachine,
            Replacement::ChildStateMachine(_) => NodeKind::ChildStateMachine,
            Replacement::AvatarMask(_) => NodeKind::AvatarMask,
            Replacement::ControllerLayer(_) => NodeKind::ControllerLayer,
            Replacement::Controller(_) => NodeKind::Controller,
        }
    }
}

impl std::fmt::Debug for Replacement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Replacement").field(&self.target()).finish()
    }
}

/// Applies a [`Replacement`] across animator graphs.
#[derive(Debug)]
pub struct Rewriter<'p> {
    policy: Replacement<'p>,
    visited: HashSet<AssetHandle>,
    applied: usize,
}

impl<'p> Rewriter<'p> {
    pub fn new(policy: Replacement<'p>) -> Self {
        Self {
            policy,
            visited: HashSet::new(),
            applied: 0,
        }
    }

    pub fn target(&self) -> NodeKind {
        self.policy.target()
    }

    /// Number of times the replacement function has been invoked.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Rewrite the subgraph rooted at `node`. A root of the bound kind is handed
    /// straight to the replacement function.
    pub fn rewrite(&mut self, table: &mut AssetTable, node: Node) -> Node {
        self.visited.clear();
        match node {
            Node::Clip(h) => Node::Clip(self.crawl_clip(table, h)),
            Node::BlendTree(h) => Node::BlendTree(self.crawl_blend_tree(table, h)),
            Node::Motion(h) => Node::Motion(self.crawl_motion(table, h)),
            Node::ChildMotion(c) => Node::ChildMotion(self.crawl_child_motion(table, c)),
            Node::AnimatorState(s) => Node::AnimatorState(self.crawl_state(table, s)),
            Node::ChildState(s) => Node::ChildState(self.crawl_child_state(table, s)),
            Node::StateMachine(m) => Node::StateMachine(self.crawl_state_machine(table, m)),
            Node::ChildStateMachine(m) => {
                Node::ChildStateMachine(self.crawl_child_state_machine(table, m))
            }
            Node::AvatarMask(m) => Node::AvatarMask(self.crawl_avatar_mask(table, m)),
            Node::ControllerLayer(l) => Node::ControllerLayer(self.crawl_layer(table, l)),
            Node::Controller(c) => Node::Controller(self.crawl_controller(table, c)),
        }
    }

    /// Rewrite the controller stored at `handle` and store the result back in place.
    pub fn rewrite_controller_asset(
        &mut self,
        table: &mut AssetTable,
        handle: AssetHandle,
    ) -> Result<(), RelocError> {
        let controller = match table.get(handle) {
            Some(Asset::Controller(c)) => c.clone(),
            Some(other) => {
                return Err(RelocError::KindMismatch {
                    handle,
                    expected: AssetKind::Controller,
                    actual: other.kind(),
                })
            }
            None => return Err(RelocError::UnknownAsset { handle }),
        };
        self.visited.clear();
        let controller = self.crawl_controller(table, controller);
        table.replace(handle, Asset::Controller(controller));
        Ok(())
    }

    fn apply_handle(
        &mut self,
        kind: NodeKind,
        table: &AssetTable,
        h: AssetHandle,
    ) -> Option<AssetHandle> {
        let f = match (&mut self.policy, kind) {
            (Replacement::Clip(f), NodeKind::Clip)
            | (Replacement::BlendTree(f), NodeKind::BlendTree)
            | (Replacement::Motion(f), NodeKind::Motion) => f,
            _ => return None,
        };
        self.applied += 1;
        Some(f(table, h))
    }

    fn crawl_clip(&mut self, table: &mut AssetTable, clip: AssetHandle) -> AssetHandle {
        self.apply_handle(NodeKind::Clip, table, clip).unwrap_or(clip)
    }

    fn crawl_blend_tree(&mut self, table: &mut AssetTable, tree: AssetHandle) -> AssetHandle {
        if let Some(out) = self.apply_handle(NodeKind::BlendTree, table, tree) {
            return out;
        }
        if !self.visited.insert(tree) {
            trace!("blend tree {tree} already rewritten");
            return tree;
        }
        let Some(children) = table.blend_tree(tree).map(|t| t.children.clone()) else {
            return tree;
        };
        let children: Vec<ChildMotion> = children
            .into_iter()
            .map(|c| self.crawl_child_motion(table, c))
            .collect();
        if let Some(t) = table.blend_tree_mut(tree) {
            t.children = children;
        }
        tree
    }

    fn crawl_motion(&mut self, table: &mut AssetTable, motion: AssetHandle) -> AssetHandle {
        if let Some(out) = self.apply_handle(NodeKind::Motion, table, motion) {
            return out;
        }
        match table.kind(motion) {
            Some(AssetKind::Clip) => self.crawl_clip(table, motion),
            Some(AssetKind::BlendTree) => self.crawl_blend_tree(table, motion),
            // dangling or non-motion handles pass through
            _ => motion,
        }
    }

    fn crawl_child_motion(
        &mut self,
        table: &mut AssetTable,
        mut child: ChildMotion,
    ) -> ChildMotion {
        if let Replacement::ChildMotion(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, child);
        }
        child.motion = child.motion.map(|m| self.crawl_motion(table, m));
        child
    }

    fn crawl_state(&mut self, table: &mut AssetTable, mut state: AnimatorState) -> AnimatorState {
        if let Replacement::AnimatorState(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, state);
        }
        state.motion = state.motion.map(|m| self.crawl_motion(table, m));
        state
    }

    fn crawl_child_state(&mut self, table: &mut AssetTable, mut child: ChildState) -> ChildState {
        if let Replacement::ChildState(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, child);
        }
        child.state = self.crawl_state(table, child.state);
        child
    }

    fn crawl_state_machine(
        &mut self,
        table: &mut AssetTable,
        mut machine: StateMachine,
    ) -> StateMachine {
        if let Replacement::StateMachine(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, machine);
        }
        let states = std::mem::take(&mut machine.states);
        machine.states = states
            .into_iter()
            .map(|s| self.crawl_child_state(table, s))
            .collect();

        let machines = std::mem::take(&mut machine.state_machines);
        machine.state_machines = machines
            .into_iter()
            .map(|m| self.crawl_child_state_machine(table, m))
            .collect();
        machine
    }

    fn crawl_child_state_machine(
        &mut self,
        table: &mut AssetTable,
        mut child: ChildStateMachine,
    ) -> ChildStateMachine {
        if let Replacement::ChildStateMachine(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, child);
        }
        child.state_machine = self.crawl_state_machine(table, child.state_machine);
        child
    }

    fn crawl_avatar_mask(&mut self, table: &mut AssetTable, mask: AvatarMask) -> AvatarMask {
        if let Replacement::AvatarMask(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, mask);
        }
        // masks have no traversable children
        mask
    }

    fn crawl_layer(
        &mut self,
        table: &mut AssetTable,
        mut layer: ControllerLayer,
    ) -> ControllerLayer {
        if let Replacement::ControllerLayer(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, layer);
        }
        layer.state_machine = self.crawl_state_machine(table, layer.state_machine);
        layer.avatar_mask = layer.avatar_mask.map(|m| self.crawl_avatar_mask(table, m));
        layer
    }

    fn crawl_controller(
        &mut self,
        table: &mut AssetTable,
        mut controller: Controller,
    ) -> Controller {
        if let Replacement::Controller(f) = &mut self.policy {
            self.applied += 1;
            return f(&*table, controller);
        }
        let layers = std::mem::take(&mut controller.layers);
        controller.layers = layers
            .into_iter()
            .map(|l| self.crawl_layer(table, l))
            .collect();
        controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Clip;
    use crate::graph::BlendTree;

    struct Fixture {
        table: AssetTable,
        idle: AssetHandle,
        walk: AssetHandle,
        run: AssetHandle,
        walk_copy: AssetHandle,
        tree: AssetHandle,
        controller: Controller,
    }

    fn fixture() -> Fixture {
        let mut table = AssetTable::new();
        let idle = table.insert(Asset::Clip(Clip::new("idle", 1.0, 30.0)));
        let walk = table.insert(Asset::Clip(Clip::new("walk", 1.0, 30.0)));
        let run = table.insert(Asset::Clip(Clip::new("run", 1.0, 30.0)));
        let walk_copy = table.insert(Asset::Clip(Clip::new("walk copy", 1.0, 30.0)));
        let tree = table.insert(Asset::BlendTree(BlendTree {
            name: "locomotion".into(),
            blend_parameter: "speed".into(),
            children: vec![
                ChildMotion::new(Some(walk_copy)).with_threshold(0.5),
                ChildMotion::new(Some(run)).with_threshold(1.0),
            ],
        }));
        let controller = Controller::new("player").with_layer(ControllerLayer::new(
            "base",
            StateMachine::new("root")
                .with_state(AnimatorState::new("idle", Some(idle)))
                .with_state(AnimatorState::new("walk", Some(walk_copy)))
                .with_sub_machine(
                    StateMachine::new("moving")
                        .with_state(AnimatorState::new("move", Some(tree))),
                ),
        ));
        Fixture {
            table,
            idle,
            walk,
            run,
            walk_copy,
            tree,
            controller,
        }
    }

    fn swap(
        from: AssetHandle,
        to: AssetHandle,
    ) -> impl FnMut(&AssetTable, AssetHandle) -> AssetHandle {
        move |_: &AssetTable, h: AssetHandle| if h == from { to } else { h }
    }

    #[test]
    fn clip_policy_rewrites_every_reference_site() {
        let mut fx = fixture();
        let mut rw = Rewriter::new(Replacement::clip(swap(fx.walk_copy, fx.walk)));
        let Node::Controller(out) =
            rw.rewrite(&mut fx.table, Node::Controller(fx.controller.clone()))
        else {
            panic!("controller root must stay a controller");
        };
        let root = &out.layers[0].state_machine;
        assert_eq!(root.states[0].state.motion, Some(fx.idle));
        assert_eq!(root.states[1].state.motion, Some(fx.walk));
        // the shared tree itself was rewritten, its handle at the site is unchanged
        assert_eq!(
            root.state_machines[0].state_machine.states[0].state.motion,
            Some(fx.tree)
        );
        let tree = fx.table.blend_tree(fx.tree).unwrap();
        assert_eq!(tree.children[0].motion, Some(fx.walk));
        assert_eq!(tree.children[0].threshold, 0.5);
        assert_eq!(tree.children[1].motion, Some(fx.run));
        // idle, walk copy, walk copy (in tree), run
        assert_eq!(rw.applied(), 4);
    }

    #[test]
    fn rewrite_is_idempotent() {
        let mut fx = fixture();
        let once = {
            let mut rw = Rewriter::new(Replacement::clip(swap(fx.walk_copy, fx.walk)));
            rw.rewrite(&mut fx.table, Node::Controller(fx.controller.clone()))
        };
        let table_once = fx.table.clone();
        let Node::Controller(c) = once.clone() else {
            unreachable!()
        };
        let twice = {
            let mut rw = Rewriter::new(Replacement::clip(swap(fx.walk_copy, fx.walk)));
            rw.rewrite(&mut fx.table, Node::Controller(c))
        };
        assert_eq!(once, twice);
        assert_eq!(
            table_once.blend_tree(fx.tree),
            fx.table.blend_tree(fx.tree)
        );
    }

    #[test]
    fn state_policy_never_sees_motions() {
        let mut fx = fixture();
        let mut names = Vec::new();
        {
            let mut rw = Rewriter::new(Replacement::animator_state(|_, mut s: AnimatorState| {
                names.push(s.name.clone());
                s.speed = 2.0;
                s
            }));
            rw.rewrite(&mut fx.table, Node::Controller(fx.controller.clone()));
        }
        assert_eq!(names, vec!["idle", "walk", "move"]);
        // motions untouched: tree children still point at the copy
        assert_eq!(
            fx.table.blend_tree(fx.tree).unwrap().children[0].motion,
            Some(fx.walk_copy)
        );
    }

    #[test]
    fn motion_policy_never_sees_states_and_stops_at_match() {
        let mut fx = fixture();
        let mut seen = Vec::new();
        {
            let mut rw = Rewriter::new(Replacement::motion(|_, h| {
                seen.push(h);
                h
            }));
            rw.rewrite(&mut fx.table, Node::Controller(fx.controller.clone()));
        }
        // the tree matches as a Motion, so its children are not visited
        assert_eq!(seen, vec![fx.idle, fx.walk_copy, fx.tree]);
    }

    #[test]
    fn matching_root_is_replaced_without_descent() {
        let mut fx = fixture();
        let mut calls = 0;
        let out = {
            let mut rw = Rewriter::new(Replacement::motion(|_, _| {
                calls += 1;
                fx.idle
            }));
            rw.rewrite(&mut fx.table, Node::Motion(fx.tree))
        };
        assert_eq!(out, Node::Motion(fx.idle));
        assert_eq!(calls, 1);

        let replacement = AnimatorState::new("replaced", None);
        let out = {
            let r = replacement.clone();
            let mut rw = Rewriter::new(Replacement::animator_state(move |_, _| r.clone()));
            rw.rewrite(
                &mut fx.table,
                Node::AnimatorState(AnimatorState::new("idle", Some(fx.idle))),
            )
        };
        assert_eq!(out, Node::AnimatorState(replacement));
    }

    #[test]
    fn self_containing_blend_tree_terminates() {
        let mut fx = fixture();
        if let Some(t) = fx.table.blend_tree_mut(fx.tree) {
            t.children.push(ChildMotion::new(Some(fx.tree)));
        }
        let mut rw = Rewriter::new(Replacement::clip(swap(fx.run, fx.idle)));
        rw.rewrite(&mut fx.table, Node::BlendTree(fx.tree));
        let tree = fx.table.blend_tree(fx.tree).unwrap();
        assert_eq!(tree.children[1].motion, Some(fx.idle));
        assert_eq!(tree.children[2].motion, Some(fx.tree));
    }

    #[test]
    fn avatar_mask_is_terminal_unless_targeted() {
        let mut fx = fixture();
        let mut layer = fx.controller.layers[0].clone();
        layer.avatar_mask = Some(AvatarMask {
            name: "upper body".into(),
            transforms: Vec::new(),
        });
        let out = {
            let mut rw = Rewriter::new(Replacement::avatar_mask(|_, mut m: AvatarMask| {
                m.name = "full body".into();
                m
            }));
            rw.rewrite(&mut fx.table, Node::ControllerLayer(layer))
        };
        let Node::ControllerLayer(out) = out else {
            panic!("layer root must stay a layer");
        };
        assert_eq!(out.avatar_mask.unwrap().name, "full body");
        assert_eq!(out.state_machine, fx.controller.layers[0].state_machine);
    }

    #[test]
    fn controller_asset_is_rewritten_in_place() {
        let mut fx = fixture();
        let handle = fx.table.insert(Asset::Controller(fx.controller.clone()));
        let mut rw = Rewriter::new(Replacement::clip(swap(fx.walk_copy, fx.walk)));
        rw.rewrite_controller_asset(&mut fx.table, handle).unwrap();
        let stored = fx.table.controller(handle).unwrap();
        assert_eq!(
            stored.layers[0].state_machine.states[1].state.motion,
            Some(fx.walk)
        );

        let err = rw.rewrite_controller_asset(&mut fx.table, fx.idle).unwrap_err();
        assert!(matches!(err, RelocError::KindMismatch { .. }));
        let err = rw
            .rewrite_controller_asset(&mut fx.table, AssetHandle(999))
            .unwrap_err();
        assert!(matches!(err, RelocError::UnknownAsset { .. }));
    }

    #[test]
    fn container_policies_apply_at_their_own_kind() {
        let mut fx = fixture();
        let root = Node::Controller(fx.controller.clone());

        let mut thresholds = Vec::new();
        let mut rw = Rewriter::new(Replacement::child_motion(|_, c: ChildMotion| {
            thresholds.push(c.threshold);
            c
        }));
        rw.rewrite(&mut fx.table, root.clone());
        assert_eq!(rw.target(), NodeKind::ChildMotion);
        drop(rw);
        assert_eq!(thresholds, vec![0.5, 1.0]);

        let mut rw = Rewriter::new(Replacement::child_state(|_, mut c: ChildState| {
            c.position = [1.0, 2.0];
            c
        }));
        let Node::Controller(out) = rw.rewrite(&mut fx.table, root.clone()) else {
            panic!("controller root must stay a controller");
        };
        // two root states plus the one in the sub-machine
        assert_eq!(rw.applied(), 3);
        assert_eq!(out.layers[0].state_machine.states[1].position, [1.0, 2.0]);

        let mut rw = Rewriter::new(Replacement::child_state_machine(
            |_, mut c: ChildStateMachine| {
                c.state_machine.name = "renamed".into();
                c
            },
        ));
        let Node::Controller(out) = rw.rewrite(&mut fx.table, root.clone()) else {
            panic!("controller root must stay a controller");
        };
        assert_eq!(
            out.layers[0].state_machine.state_machines[0].state_machine.name,
            "renamed"
        );

        let mut rw = Rewriter::new(Replacement::controller_layer(
            |_, mut l: ControllerLayer| {
                l.default_weight = 0.25;
                l
            },
        ));
        let Node::Controller(out) = rw.rewrite(&mut fx.table, root.clone()) else {
            panic!("controller root must stay a controller");
        };
        assert_eq!(out.layers[0].default_weight, 0.25);

        let mut rw = Rewriter::new(Replacement::controller(|_, mut c: Controller| {
            c.name = "npc".into();
            c
        }));
        assert_eq!(rw.target(), NodeKind::Controller);
        let Node::Controller(out) = rw.rewrite(&mut fx.table, root) else {
            panic!("controller root must stay a controller");
        };
        assert_eq!(out.name, "npc");
        assert_eq!(rw.applied(), 1);
    }

    #[test]
    fn node_kind_matches_policy_target() {
        assert_eq!(Node::Motion(AssetHandle(0)).kind(), NodeKind::Motion);
        assert_eq!(
            Replacement::state_machine(|_, m| m).target(),
            NodeKind::StateMachine
        );
    }
}
