//! Progress reporting and cooperative cancellation for long enumerations.
//!
//! Hosts implement [`ProgressSink`] (a progress bar, a log, nothing). The iterator
//! adapters report `i / len` before yielding element `i` and poll for cancellation
//! once per element; nothing is preempted.

use log::debug;

pub trait ProgressSink {
    fn report(&mut self, label: &str, item: &str, fraction: f32);

    /// Same as [`report`](Self::report) but returns `true` when the user asked to stop.
    fn report_cancellable(&mut self, label: &str, item: &str, fraction: f32) -> bool;

    fn clear(&mut self);
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn report(&mut self, label: &str, item: &str, fraction: f32) {
        (**self).report(label, item, fraction)
    }

    fn report_cancellable(&mut self, label: &str, item: &str, fraction: f32) -> bool {
        (**self).report_cancellable(label, item, fraction)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// Discards every report and never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _label: &str, _item: &str, _fraction: f32) {}

    fn report_cancellable(&mut self, _label: &str, _item: &str, _fraction: f32) -> bool {
        false
    }

    fn clear(&mut self) {}
}

/// Forwards reports to `log::debug!`; never cancels.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, label: &str, item: &str, fraction: f32) {
        debug!("{label}: {item} ({:.0}%)", fraction * 100.0);
    }

    fn report_cancellable(&mut self, label: &str, item: &str, fraction: f32) -> bool {
        self.report(label, item, fraction);
        false
    }

    fn clear(&mut self) {}
}

/// Iterator adapter produced by [`with_progress`] and [`with_cancellable_progress`].
///
/// The sink is cleared exactly once: when the source is exhausted, when a
/// cancellation is observed, or when the adapter is dropped early.
pub struct Progress<'s, I, F, S: ?Sized + ProgressSink> {
    items: I,
    total: usize,
    index: usize,
    sink: &'s mut S,
    label: &'s str,
    describe: F,
    cancellable: bool,
    cancelled: bool,
    finished: bool,
}

impl<'s, I, F, S: ?Sized + ProgressSink> Progress<'s, I, F, S> {
    /// Did the sink request cancellation?
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Elements yielded so far.
    pub fn yielded(&self) -> usize {
        self.index
    }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            self.sink.clear();
        }
    }
}

impl<'s, T, I, F, S> Iterator for Progress<'s, I, F, S>
where
    I: Iterator<Item = T>,
    F: FnMut(&T) -> String,
    S: ?Sized + ProgressSink,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }
        let Some(item) = self.items.next() else {
            self.finish();
            return None;
        };
        let fraction = if self.total == 0 {
            0.0
        } else {
            self.index as f32 / self.total as f32
        };
        let text = (self.describe)(&item);
        if self.cancellable {
            if self.sink.report_cancellable(self.label, &text, fraction) {
                debug!(
                    "{}: cancelled after {} of {}",
                    self.label, self.index, self.total
                );
                self.cancelled = true;
                self.finish();
                return None;
            }
        } else {
            self.sink.report(self.label, &text, fraction);
        }
        self.index += 1;
        Some(item)
    }
}

impl<I, F, S: ?Sized + ProgressSink> Drop for Progress<'_, I, F, S> {
    fn drop(&mut self) {
        self.finish();
    }
}

fn progress<'s, I, F, S>(
    items: I,
    sink: &'s mut S,
    label: &'s str,
    describe: F,
    cancellable: bool,
) -> Progress<'s, I::IntoIter, F, S>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    S: ?Sized + ProgressSink,
{
    let items = items.into_iter();
    Progress {
        total: items.len(),
        items,
        index: 0,
        sink,
        label,
        describe,
        cancellable,
        cancelled: false,
        finished: false,
    }
}

/// Report progress for every element of `items`.
pub fn with_progress<'s, I, F, S>(
    items: I,
    sink: &'s mut S,
    label: &'s str,
    describe: F,
) -> Progress<'s, I::IntoIter, F, S>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    F: FnMut(&I::Item) -> String,
    S: ?Sized + ProgressSink,
{
    progress(items, sink, label, describe, false)
}

/// Report progress and stop yielding as soon as the sink requests cancellation.
/// Check [`Progress::was_cancelled`] afterwards (iterate with `by_ref()`).
pub fn with_cancellable_progress<'s, I, F, S>(
    items: I,
    sink: &'s mut S,
    label: &'s str,
    describe: F,
) -> Progress<'s, I::IntoIter, F, S>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    F: FnMut(&I::Item) -> String,
    S: ?Sized + ProgressSink,
{
    progress(items, sink, label, describe, true)
}
