//! Asset index boundary.
//!
//! The host application owns asset discovery, file layout and moves. The core only
//! sees it through [`AssetIndex`]; [`crate::memory::MemoryIndex`] is the in-process
//! implementation used by the project loader and tests.

use crate::graph::{AssetKind, AssetTable};
use crate::ids::AssetHandle;

/// Trait for the host's asset database.
/// Adapters (editor integrations, on-disk project scanners) implement this and pass
/// it into [`crate::dedup::Deduplicator`].
pub trait AssetIndex {
    /// All assets of `kind`, in the index's stable enumeration order.
    fn find_assets_by_kind(&self, kind: AssetKind) -> Vec<AssetHandle>;

    /// Project-relative path of an asset, `None` for unknown handles.
    fn asset_path(&self, asset: AssetHandle) -> Option<String>;

    /// Loaded asset contents, shared by every reference site.
    fn assets(&self) -> &AssetTable;

    fn assets_mut(&mut self) -> &mut AssetTable;

    /// A path near `desired` that no asset currently occupies.
    fn generate_non_conflicting_path(&self, desired: &str) -> String;

    /// Attempt to relocate an asset file. Ordinary failure is reported as `false`.
    fn move_file(&mut self, src: &str, dst: &str) -> bool;

    /// Re-sync the index after files have moved.
    fn refresh_index(&mut self);
}

/// Last path component ("Assets/Anim/Walk.anim" -> "Walk.anim").
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a file name into stem and extension (without the dot).
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(i) => (&name[..i], Some(&name[i + 1..])),
    }
}

/// Is `path` inside directory prefix `dir`?
#[inline]
pub fn is_under(path: &str, dir: &str) -> bool {
    path.starts_with(dir)
}
