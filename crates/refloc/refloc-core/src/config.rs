//! Core configuration for refloc-core.

use serde::{Deserialize, Serialize};

use crate::data::Texture;
use crate::error::RelocError;

/// Float tolerance used by every content comparison.
///
/// Two values are approximately equal when their difference is below
/// `relative * max(|a|, |b|)`, or below `absolute` for values near zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub relative: f32,
    pub absolute: f32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: 1e-5,
            absolute: f32::MIN_POSITIVE * 8.0,
        }
    }
}

impl Tolerance {
    #[inline]
    pub fn approx_eq(&self, a: f32, b: f32) -> bool {
        approximately(a, b, self)
    }
}

/// Approximate float equality. NaN never compares equal; equal infinities do.
#[inline]
pub fn approximately(a: f32, b: f32, tol: &Tolerance) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (b - a).abs() < (tol.relative * scale).max(tol.absolute)
}

/// Project layout and comparison settings.
///
/// Directories are project-relative prefixes ending with '/'. Defaults match the
/// conventional component layout (`Assets/Project/Components/...`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clips whose path does not start with this prefix never compare equal.
    pub project_root: String,
    /// Holding location for retired duplicates. Nothing is ever deleted.
    pub trash_dir: String,
    pub textures_dir: String,
    pub gradient_textures_dir: String,
    /// Canonical/shared location for animation clips.
    pub animations_dir: String,
    pub tolerance: Tolerance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: "Assets".to_string(),
            trash_dir: "Assets/Project/Components/Unused/".to_string(),
            textures_dir: "Assets/Project/Components/Textures/".to_string(),
            gradient_textures_dir: "Assets/Project/Components/Textures/Gradients/".to_string(),
            animations_dir: "Assets/Project/Components/Animations/".to_string(),
            tolerance: Tolerance::default(),
        }
    }
}

impl Config {
    /// Parse a JSON config. Missing fields fall back to the defaults.
    pub fn from_json(s: &str) -> Result<Self, RelocError> {
        let cfg: Config = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RelocError> {
        for (name, dir) in [
            ("trash_dir", &self.trash_dir),
            ("textures_dir", &self.textures_dir),
            ("gradient_textures_dir", &self.gradient_textures_dir),
            ("animations_dir", &self.animations_dir),
        ] {
            if !dir.ends_with('/') {
                return Err(RelocError::InvalidConfig {
                    reason: format!("{name} must end with '/', got '{dir}'"),
                });
            }
        }
        if !(self.tolerance.relative >= 0.0 && self.tolerance.absolute >= 0.0) {
            return Err(RelocError::InvalidConfig {
                reason: "tolerance must be non-negative".into(),
            });
        }
        Ok(())
    }

    /// Shared directory a texture belongs in: gradients get their own folder.
    pub fn texture_dir_for(&self, texture: &Texture) -> &str {
        if texture.probably_is_gradient() {
            &self.gradient_textures_dir
        } else {
            &self.textures_dir
        }
    }
}
