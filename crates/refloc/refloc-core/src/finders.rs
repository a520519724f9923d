//! Lookup queries over an asset index: duplicates and texture/material links.

use crate::config::Config;
use crate::equality::ClipMatcher;
use crate::graph::AssetKind;
use crate::ids::AssetHandle;
use crate::index::AssetIndex;

/// Clips content-equal to `clip`, excluding `clip` itself. Index order.
pub fn find_duplicate_clips<I: AssetIndex + ?Sized>(
    index: &I,
    config: &Config,
    clip: AssetHandle,
) -> Vec<AssetHandle> {
    let matcher = ClipMatcher::new(index, config);
    index
        .find_assets_by_kind(AssetKind::Clip)
        .into_iter()
        .filter(|&c| c != clip && matcher.matches(c, clip))
        .collect()
}

/// Textures with the same image content hash as `texture`, excluding it.
pub fn find_duplicate_textures<I: AssetIndex + ?Sized>(
    index: &I,
    texture: AssetHandle,
) -> Vec<AssetHandle> {
    let assets = index.assets();
    let Some(wanted) = assets.texture(texture) else {
        return Vec::new();
    };
    index
        .find_assets_by_kind(AssetKind::Texture)
        .into_iter()
        .filter(|&t| t != texture)
        .filter(|&t| {
            assets
                .texture(t)
                .is_some_and(|other| other.content_hash == wanted.content_hash)
        })
        .collect()
}

/// Materials with at least one slot referencing `texture`. Each material once.
pub fn find_linked_materials<I: AssetIndex + ?Sized>(
    index: &I,
    texture: AssetHandle,
) -> Vec<AssetHandle> {
    let assets = index.assets();
    index
        .find_assets_by_kind(AssetKind::Material)
        .into_iter()
        .filter(|&m| {
            assets
                .material(m)
                .is_some_and(|mat| mat.textures().any(|t| t == texture))
        })
        .collect()
}

/// Textures used by `material`, in slot order, each once. Slots pointing at
/// anything other than a texture are ignored.
pub fn find_linked_textures<I: AssetIndex + ?Sized>(
    index: &I,
    material: AssetHandle,
) -> Vec<AssetHandle> {
    let assets = index.assets();
    let Some(mat) = assets.material(material) else {
        return Vec::new();
    };
    let mut out: Vec<AssetHandle> = Vec::new();
    for t in mat.textures() {
        if assets.texture(t).is_some() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
