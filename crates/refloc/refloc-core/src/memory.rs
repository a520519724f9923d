//! In-memory asset index.

use hashbrown::{HashMap, HashSet};
use log::{debug, warn};
use uuid::Uuid;

use crate::graph::{Asset, AssetKind, AssetTable};
use crate::ids::AssetHandle;
use crate::index::{file_name, split_extension, AssetIndex};

#[derive(Clone, Debug)]
struct Entry {
    path: String,
    guid: Uuid,
}

/// [`AssetIndex`] backed by an [`AssetTable`] and a path registry.
///
/// Paths are the only "files": moving an asset rewrites its registered path and keeps
/// its GUID and handle, so references stay valid across moves.
#[derive(Clone, Debug, Default)]
pub struct MemoryIndex {
    assets: AssetTable,
    entries: Vec<Entry>,
    by_path: HashMap<String, AssetHandle>,
    by_guid: HashMap<Uuid, AssetHandle>,
    failing_moves: HashSet<String>,
    refreshes: u64,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset at `path` with a fresh GUID.
    /// A path that is already taken is replaced by a non-conflicting one.
    pub fn insert(&mut self, path: impl Into<String>, asset: Asset) -> AssetHandle {
        self.insert_with_guid(path, Uuid::new_v4(), asset)
    }

    pub fn insert_with_guid(
        &mut self,
        path: impl Into<String>,
        guid: Uuid,
        asset: Asset,
    ) -> AssetHandle {
        let mut path = path.into();
        if self.by_path.contains_key(&path) {
            let free = self.generate_non_conflicting_path(&path);
            warn!("asset path '{path}' already in use; registering at '{free}'");
            path = free;
        }
        let handle = self.assets.insert(asset);
        self.by_path.insert(path.clone(), handle);
        self.by_guid.insert(guid, handle);
        self.entries.push(Entry { path, guid });
        handle
    }

    pub fn find_by_path(&self, path: &str) -> Option<AssetHandle> {
        self.by_path.get(path).copied()
    }

    pub fn find_by_guid(&self, guid: Uuid) -> Option<AssetHandle> {
        self.by_guid.get(&guid).copied()
    }

    pub fn guid(&self, handle: AssetHandle) -> Option<Uuid> {
        self.entries.get(handle.index()).map(|e| e.guid)
    }

    /// Make every subsequent move of the asset currently at `src` fail.
    pub fn fail_moves_from(&mut self, src: impl Into<String>) {
        self.failing_moves.insert(src.into());
    }

    /// Number of `refresh_index` calls so far.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    pub fn paths(&self) -> impl Iterator<Item = (AssetHandle, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (AssetHandle(i as u32), e.path.as_str()))
    }
}

impl AssetIndex for MemoryIndex {
    fn find_assets_by_kind(&self, kind: AssetKind) -> Vec<AssetHandle> {
        self.assets
            .iter()
            .filter(|(_, a)| a.kind() == kind)
            .map(|(h, _)| h)
            .collect()
    }

    fn asset_path(&self, asset: AssetHandle) -> Option<String> {
        self.entries.get(asset.index()).map(|e| e.path.clone())
    }

    fn assets(&self) -> &AssetTable {
        &self.assets
    }

    fn assets_mut(&mut self) -> &mut AssetTable {
        &mut self.assets
    }

    fn generate_non_conflicting_path(&self, desired: &str) -> String {
        if !self.by_path.contains_key(desired) {
            return desired.to_string();
        }
        let name = file_name(desired);
        let dir = &desired[..desired.len() - name.len()];
        let (stem, ext) = split_extension(name);
        (1u32..)
            .map(|n| match ext {
                Some(ext) => format!("{dir}{stem} {n}.{ext}"),
                None => format!("{dir}{stem} {n}"),
            })
            .find(|candidate| !self.by_path.contains_key(candidate))
            .unwrap_or_else(|| desired.to_string())
    }

    fn move_file(&mut self, src: &str, dst: &str) -> bool {
        let Some(handle) = self.by_path.get(src).copied() else {
            debug!("move '{src}' -> '{dst}': no such asset");
            return false;
        };
        if src == dst || self.by_path.contains_key(dst) {
            debug!("move '{src}' -> '{dst}': destination occupied");
            return false;
        }
        if self.failing_moves.contains(src) {
            debug!("move '{src}' -> '{dst}': refused");
            return false;
        }
        self.by_path.remove(src);
        self.by_path.insert(dst.to_string(), handle);
        if let Some(entry) = self.entries.get_mut(handle.index()) {
            entry.path = dst.to_string();
        }
        true
    }

    fn refresh_index(&mut self) {
        self.refreshes += 1;
        debug!("asset index refreshed ({} assets)", self.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Clip, Texture};

    fn clip() -> Asset {
        Asset::Clip(Clip::new("c", 1.0, 30.0))
    }

    #[test]
    fn non_conflicting_paths_get_numeric_suffix() {
        let mut index = MemoryIndex::new();
        assert_eq!(
            index.generate_non_conflicting_path("Assets/Walk.anim"),
            "Assets/Walk.anim"
        );
        index.insert("Assets/Walk.anim", clip());
        index.insert("Assets/Walk 1.anim", clip());
        assert_eq!(
            index.generate_non_conflicting_path("Assets/Walk.anim"),
            "Assets/Walk 2.anim"
        );
        index.insert("Assets/Notes", clip());
        assert_eq!(
            index.generate_non_conflicting_path("Assets/Notes"),
            "Assets/Notes 1"
        );
    }

    #[test]
    fn insert_at_taken_path_is_renamed() {
        let mut index = MemoryIndex::new();
        let a = index.insert("Assets/Walk.anim", clip());
        let b = index.insert("Assets/Walk.anim", clip());
        assert_eq!(index.asset_path(a).as_deref(), Some("Assets/Walk.anim"));
        assert_eq!(index.asset_path(b).as_deref(), Some("Assets/Walk 1.anim"));
    }

    #[test]
    fn move_keeps_handle_and_guid() {
        let mut index = MemoryIndex::new();
        let h = index.insert("Assets/A/Walk.anim", clip());
        let guid = index.guid(h).unwrap();
        assert!(index.move_file("Assets/A/Walk.anim", "Assets/B/Walk.anim"));
        assert_eq!(index.find_by_path("Assets/B/Walk.anim"), Some(h));
        assert_eq!(index.find_by_path("Assets/A/Walk.anim"), None);
        assert_eq!(index.find_by_guid(guid), Some(h));
    }

    #[test]
    fn move_failures() {
        let mut index = MemoryIndex::new();
        index.insert("Assets/A.anim", clip());
        index.insert("Assets/B.anim", clip());
        assert!(!index.move_file("Assets/Missing.anim", "Assets/C.anim"));
        assert!(!index.move_file("Assets/A.anim", "Assets/B.anim"));
        index.fail_moves_from("Assets/A.anim");
        assert!(!index.move_file("Assets/A.anim", "Assets/C.anim"));
        assert!(index.move_file("Assets/B.anim", "Assets/C.anim"));
    }

    #[test]
    fn find_by_kind_in_insertion_order() {
        let mut index = MemoryIndex::new();
        let a = index.insert("Assets/A.anim", clip());
        index.insert("Assets/T.png", Asset::Texture(Texture::new(1, 1, "h")));
        let b = index.insert("Assets/B.anim", clip());
        assert_eq!(index.find_assets_by_kind(AssetKind::Clip), vec![a, b]);
        assert!(index.find_assets_by_kind(AssetKind::Controller).is_empty());
    }
}
