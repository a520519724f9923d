//! Refloc core (engine-agnostic)
//!
//! Structural rewriting and deduplication of animation assets. Clips, blend trees
//! and controllers live in a handle-addressed [`AssetTable`]; a [`Rewriter`] walks a
//! controller graph applying one [`Replacement`] policy, and a [`Deduplicator`]
//! collapses content-equal clips onto one canonical instance, moving the rest to a
//! trash directory through an [`AssetIndex`].

pub mod config;
pub mod data;
pub mod dedup;
pub mod equality;
pub mod error;
pub mod finders;
pub mod graph;
pub mod ids;
pub mod index;
pub mod memory;
pub mod progress;
pub mod project;
pub mod rewrite;

// Re-exports for hosts
pub use config::{approximately, Config, Tolerance};
pub use data::{
    AvatarMask, BoundCurve, Clip, Curve, CurveBinding, KeyTangentModes, Keyframe, MaskTransform,
    Material, TangentMode, Texture, TextureSlot,
};
pub use dedup::{DedupReport, Deduplicator, Relocation};
pub use equality::{ClipMatcher, ContentEq};
pub use error::RelocError;
pub use finders::{
    find_duplicate_clips, find_duplicate_textures, find_linked_materials, find_linked_textures,
};
pub use graph::{
    AnimatorState, Asset, AssetKind, AssetTable, BlendTree, ChildMotion, ChildState,
    ChildStateMachine, Controller, ControllerLayer, StateMachine,
};
pub use ids::AssetHandle;
pub use index::AssetIndex;
pub use memory::MemoryIndex;
pub use progress::{
    with_cancellable_progress, with_progress, LogProgress, NoProgress, ProgressSink,
};
pub use project::parse_project_json;
pub use rewrite::{Node, NodeKind, Replacement, Rewriter};
