//! Deduplication of content-equal clips.
//!
//! One request runs four fixed steps: discover content-equal clips, select the
//! canonical instance, point every controller reference at it, and move the
//! remaining duplicates to the trash directory. Nothing is ever deleted and no
//! step is rolled back; per-asset move failures are recorded and skipped.

use hashbrown::HashSet;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::equality::ClipMatcher;
use crate::error::RelocError;
use crate::graph::AssetKind;
use crate::ids::AssetHandle;
use crate::index::{file_name, is_under, AssetIndex};
use crate::progress::{with_cancellable_progress, with_progress, ProgressSink};
use crate::rewrite::{Replacement, Rewriter};

/// One file move, attempted or committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relocation {
    pub asset: AssetHandle,
    pub from: String,
    pub to: String,
}

/// Outcome of a deduplication request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DedupReport {
    pub target: Option<AssetHandle>,
    /// Content-equal clips outside the trash directory, in discovery order.
    pub candidates: Vec<AssetHandle>,
    pub canonical: Option<AssetHandle>,
    /// Set when the target itself was moved into the shared animations directory.
    pub relocated_target: Option<Relocation>,
    /// Reference sites that now point at the canonical clip.
    pub replaced_references: usize,
    pub touched_controllers: Vec<AssetHandle>,
    /// Duplicates moved to the trash directory.
    pub retired: Vec<Relocation>,
    /// Moves that did not go through; the assets were left where they were.
    pub failures: Vec<Relocation>,
    pub cancelled: bool,
}

impl DedupReport {
    /// Candidates other than the canonical instance.
    pub fn duplicates(&self) -> impl Iterator<Item = AssetHandle> + '_ {
        self.candidates
            .iter()
            .copied()
            .filter(move |c| Some(*c) != self.canonical)
    }

    /// True when the request changed nothing.
    pub fn is_noop(&self) -> bool {
        self.relocated_target.is_none() && self.replaced_references == 0 && self.retired.is_empty()
    }
}

/// Runs deduplication requests against an [`AssetIndex`].
///
/// Assumes exclusive use of the index for the duration of a request.
pub struct Deduplicator<'a, I: AssetIndex + ?Sized, P: ProgressSink + ?Sized> {
    index: &'a mut I,
    progress: &'a mut P,
    config: &'a Config,
}

impl<'a, I: AssetIndex + ?Sized, P: ProgressSink + ?Sized> Deduplicator<'a, I, P> {
    pub fn new(index: &'a mut I, progress: &'a mut P, config: &'a Config) -> Self {
        Self {
            index,
            progress,
            config,
        }
    }

    /// Deduplicate the asset at `target`, dispatching on its kind.
    pub fn deduplicate(&mut self, target: AssetHandle) -> Result<DedupReport, RelocError> {
        match self.index.assets().kind(target) {
            None => Err(RelocError::UnknownAsset { handle: target }),
            Some(AssetKind::Clip) => self.deduplicate_clip(target),
            Some(AssetKind::Texture) => {
                warn!("texture {target}: deduplication by image content is not supported");
                Ok(DedupReport {
                    target: Some(target),
                    ..Default::default()
                })
            }
            Some(kind) => Err(RelocError::NotDeduplicable { kind }),
        }
    }

    pub fn deduplicate_clip(&mut self, target: AssetHandle) -> Result<DedupReport, RelocError> {
        match self.index.assets().kind(target) {
            Some(AssetKind::Clip) => {}
            Some(actual) => {
                return Err(RelocError::KindMismatch {
                    handle: target,
                    expected: AssetKind::Clip,
                    actual,
                })
            }
            None => return Err(RelocError::UnknownAsset { handle: target }),
        }

        let mut report = DedupReport {
            target: Some(target),
            ..Default::default()
        };

        let (candidates, cancelled) = self.discover(target);
        report.candidates = candidates;
        if cancelled {
            info!("clip {target}: discovery cancelled, nothing changed");
            report.cancelled = true;
            return Ok(report);
        }
        if report.candidates.iter().all(|&c| c == target) {
            info!("clip {target}: no duplicates found");
            return Ok(report);
        }

        let canonical = self.select_canonical(target, &mut report);
        report.canonical = Some(canonical);
        info!(
            "clip {target}: {} candidates, canonical {canonical}",
            report.candidates.len()
        );

        if self.rewrite_controllers(canonical, &mut report) {
            warn!(
                "clip {target}: rewrite cancelled after {} controllers; duplicates not retired",
                report.touched_controllers.len()
            );
            report.cancelled = true;
            return Ok(report);
        }

        self.retire(canonical, &mut report);
        Ok(report)
    }

    fn labelled_assets(&self, kind: AssetKind) -> Vec<(AssetHandle, String)> {
        self.index
            .find_assets_by_kind(kind)
            .into_iter()
            .map(|h| (h, self.index.asset_path(h).unwrap_or_default()))
            .collect()
    }

    fn discover(&mut self, target: AssetHandle) -> (Vec<AssetHandle>, bool) {
        let clips = self.labelled_assets(AssetKind::Clip);
        let matcher = ClipMatcher::new(&*self.index, self.config);
        let mut found = Vec::new();
        let mut it = with_cancellable_progress(
            clips,
            &mut *self.progress,
            "Finding duplicate clips",
            |(_, path)| path.clone(),
        );
        for (clip, path) in it.by_ref() {
            if is_under(&path, &self.config.trash_dir) {
                continue;
            }
            if matcher.matches(clip, target) {
                found.push(clip);
            }
        }
        (found, it.was_cancelled())
    }

    /// Prefer a target already in the animations directory, then an existing
    /// candidate there, then try to move the target there.
    fn select_canonical(&mut self, target: AssetHandle, report: &mut DedupReport) -> AssetHandle {
        let dir = &self.config.animations_dir;
        let Some(path) = self.index.asset_path(target) else {
            return target;
        };
        if is_under(&path, dir) {
            return target;
        }

        let index = &*self.index;
        let shared = report
            .candidates
            .iter()
            .copied()
            .find(|&c| c != target && index.asset_path(c).is_some_and(|p| is_under(&p, dir)));
        if let Some(shared) = shared {
            debug!("clip {target}: using shared copy {shared}");
            return shared;
        }

        let dst = self
            .index
            .generate_non_conflicting_path(&format!("{dir}{}", file_name(&path)));
        let relocation = Relocation {
            asset: target,
            from: path,
            to: dst,
        };
        if self.index.move_file(&relocation.from, &relocation.to) {
            self.index.refresh_index();
            info!("moved '{}' -> '{}'", relocation.from, relocation.to);
            report.relocated_target = Some(relocation);
        } else {
            warn!(
                "could not move '{}' -> '{}'; keeping it in place",
                relocation.from, relocation.to
            );
            report.failures.push(relocation);
        }
        target
    }

    /// Returns `true` if the walk was cancelled.
    fn rewrite_controllers(&mut self, canonical: AssetHandle, report: &mut DedupReport) -> bool {
        // every clip, trashed ones included, that references should converge from,
        // plus every candidate: those matched the target, not necessarily the canonical
        let replace: HashSet<AssetHandle> = {
            let matcher = ClipMatcher::new(&*self.index, self.config);
            self.index
                .find_assets_by_kind(AssetKind::Clip)
                .into_iter()
                .filter(|&c| c != canonical && matcher.matches(c, canonical))
                .chain(report.candidates.iter().copied().filter(|&c| c != canonical))
                .collect()
        };
        if replace.is_empty() {
            return false;
        }

        let controllers = self.labelled_assets(AssetKind::Controller);
        let mut it = with_cancellable_progress(
            controllers,
            &mut *self.progress,
            "Rewriting controllers",
            |(_, path)| path.clone(),
        );
        for (controller, path) in it.by_ref() {
            let mut replaced = 0usize;
            let result = {
                let mut rw = Rewriter::new(Replacement::clip(|_, clip| {
                    if replace.contains(&clip) {
                        replaced += 1;
                        canonical
                    } else {
                        clip
                    }
                }));
                rw.rewrite_controller_asset(self.index.assets_mut(), controller)
            };
            if let Err(err) = result {
                warn!("skipping controller '{path}': {err}");
                continue;
            }
            if replaced > 0 {
                debug!("controller '{path}': {replaced} references replaced");
                report.replaced_references += replaced;
                report.touched_controllers.push(controller);
            }
        }
        it.was_cancelled()
    }

    fn retire(&mut self, canonical: AssetHandle, report: &mut DedupReport) {
        let losers: Vec<AssetHandle> = report
            .candidates
            .iter()
            .copied()
            .filter(|&c| c != canonical)
            .collect();
        for loser in with_progress(losers, &mut *self.progress, "Retiring duplicates", |h| {
            h.to_string()
        }) {
            let Some(path) = self.index.asset_path(loser) else {
                continue;
            };
            let dst = self.index.generate_non_conflicting_path(&format!(
                "{}{}",
                self.config.trash_dir,
                file_name(&path)
            ));
            let relocation = Relocation {
                asset: loser,
                from: path,
                to: dst,
            };
            if self.index.move_file(&relocation.from, &relocation.to) {
                self.index.refresh_index();
                report.retired.push(relocation);
            } else {
                warn!(
                    "could not retire '{}' -> '{}'; skipping",
                    relocation.from, relocation.to
                );
                report.failures.push(relocation);
            }
        }
    }
}
