//! Structural content equality for keyframes, curves and clips.
//!
//! Assets are routinely re-serialized with small precision drift, so every scalar is
//! compared with [`Tolerance`] rather than bit equality. All functions here are pure.

use log::trace;

use crate::config::{Config, Tolerance};
use crate::data::{Clip, Curve, Keyframe};
use crate::ids::AssetHandle;
use crate::index::AssetIndex;

/// Content-equivalence under a float tolerance.
pub trait ContentEq {
    fn content_eq(&self, other: &Self, tol: &Tolerance) -> bool;
}

impl ContentEq for Keyframe {
    fn content_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        self.fields()
            .iter()
            .zip(other.fields().iter())
            .all(|(a, b)| tol.approx_eq(*a, *b))
    }
}

impl ContentEq for Curve {
    fn content_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        // Positional: same keys in the same order with the same tangent modes.
        self.keys()
            .iter()
            .zip(other.keys().iter())
            .enumerate()
            .all(|(i, (a, b))| {
                a.content_eq(b, tol)
                    && self.left_tangent_mode(i) == other.left_tangent_mode(i)
                    && self.right_tangent_mode(i) == other.right_tangent_mode(i)
            })
    }
}

impl ContentEq for Clip {
    fn content_eq(&self, other: &Self, tol: &Tolerance) -> bool {
        if std::ptr::eq(self, other) || (self.is_empty() && other.is_empty()) {
            return true;
        }
        if !tol.approx_eq(self.length, other.length)
            || !tol.approx_eq(self.frame_rate, other.frame_rate)
        {
            return false;
        }
        bindings_eq(self, other, tol)
    }
}

/// Full ordered binding comparison: same count, same (path, property) at every
/// position, content-equal curve for every pair.
fn bindings_eq(a: &Clip, b: &Clip, tol: &Tolerance) -> bool {
    if a.curves.len() != b.curves.len() {
        return false;
    }
    a.curves.iter().zip(b.curves.iter()).all(|(x, y)| {
        x.binding.path == y.binding.path
            && x.binding.property_name == y.binding.property_name
            && x.curve.content_eq(&y.curve, tol)
    })
}

/// Clip comparison over indexed assets.
///
/// Adds handle identity and the path-origin guard on top of [`ContentEq`]: a clip
/// whose path is outside the project root (generated or built-in clips) never
/// matches anything but itself.
pub struct ClipMatcher<'a, I: AssetIndex + ?Sized> {
    index: &'a I,
    config: &'a Config,
}

impl<'a, I: AssetIndex + ?Sized> ClipMatcher<'a, I> {
    pub fn new(index: &'a I, config: &'a Config) -> Self {
        Self { index, config }
    }

    /// Is the clip at `candidate` content-equal to the clip at `target`?
    ///
    /// The origin guard applies to `candidate`. Handles that are not clips never match.
    pub fn matches(&self, candidate: AssetHandle, target: AssetHandle) -> bool {
        if candidate == target {
            return true;
        }
        let assets = self.index.assets();
        let (Some(a), Some(b)) = (assets.clip(candidate), assets.clip(target)) else {
            return false;
        };
        if a.is_empty() && b.is_empty() {
            return true;
        }
        if !self.is_project_clip(candidate) {
            trace!("clip {candidate} rejected: not sourced from project root");
            return false;
        }
        a.content_eq(b, &self.config.tolerance)
    }

    fn is_project_clip(&self, handle: AssetHandle) -> bool {
        self.index
            .asset_path(handle)
            .is_some_and(|p| p.starts_with(self.config.project_root.as_str()))
    }
}
