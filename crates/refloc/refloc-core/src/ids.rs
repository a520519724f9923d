//! Handles for assets stored in the shared node table.

use serde::{Deserialize, Serialize};

/// Indirect reference to an asset (clip, blend tree, controller, texture, material).
///
/// Two reference sites holding the same handle point at the same instance; that is
/// what "reference-identical" means throughout the crate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub u32);

impl AssetHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for AssetHandle.
/// Dense indices keep the table a plain Vec; handles are opaque externally.
#[derive(Default, Debug, Clone)]
pub struct IdAllocator {
    next_asset: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_asset(&mut self) -> AssetHandle {
        let id = AssetHandle(self.next_asset);
        self.next_asset = self.next_asset.wrapping_add(1);
        id
    }

    /// Handle the next call to `alloc_asset` will return.
    #[inline]
    pub fn peek(&self) -> AssetHandle {
        AssetHandle(self.next_asset)
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
