//! Infinite-loop carousel index model.
//!
//! The catalog of `N` items is laid out `M` times back to back (`M` odd, at
//! least 3). Rendered position `i` aliases catalog item `i mod N`. The view
//! starts on the middle repetition and is silently rebased by whole
//! repetitions whenever it drifts within `2N` items of either end, so the list
//! never runs out.
//!
//! # Geometry
//!
//! All positions are in terminal columns. With viewport width `V`, items are
//! `0.75 V` wide and the strip starts after `0.125 V` of padding, which puts
//! the centre of rendered item `i` at `0.5 V + i * w - offset` in viewport
//! coordinates. An offset of `i * w` therefore centres item `i`.
//!
//! # Active index
//!
//! The active item is recomputed from the measured centres every time it is
//! asked for ([`closest_index`]), never tracked incrementally, so partial
//! scroll positions and in-flight animations cannot desynchronise it.

use std::time::Duration;

use innersight_types::ui::{EffectTimer, ease_out_cubic};

pub const DEFAULT_REPEAT: usize = 11;
pub const MIN_REPEAT: usize = 3;

const ITEM_WIDTH_RATIO: f32 = 0.75;

/// Frame time to wait after the first measurement before accepting input.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);
/// Duration of a one-item nudge.
pub const NUDGE_DURATION: Duration = Duration::from_millis(250);
/// Idle time after a fine scroll before snapping to the nearest centre.
pub const SNAP_IDLE: Duration = Duration::from_millis(150);

const SNAP_EPSILON: f32 = 0.01;

/// Index of the centre closest to `target`.
///
/// Ties go to the lowest index. Non-finite centres are skipped; `None` only
/// when no usable centre exists.
#[must_use]
pub fn closest_index(target: f32, centers: impl IntoIterator<Item = f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, center) in centers.into_iter().enumerate() {
        let distance = (center - target).abs();
        if !distance.is_finite() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index)
}

/// Clamp to at least [`MIN_REPEAT`] and round even values up to the next odd one.
#[must_use]
pub fn normalize_repeat(repeat: usize) -> usize {
    let repeat = repeat.max(MIN_REPEAT);
    if repeat % 2 == 0 { repeat + 1 } else { repeat }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Readiness {
    /// No usable width yet.
    Unmeasured,
    Settling { elapsed: Duration },
    Ready,
}

#[derive(Debug, Clone)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    timer: EffectTimer,
}

impl ScrollAnimation {
    fn current(&self) -> f32 {
        let t = ease_out_cubic(self.timer.progress());
        self.from + (self.to - self.from) * t
    }

    fn shift(&mut self, by: f32) {
        self.from += by;
        self.to += by;
    }

    fn scale(&mut self, factor: f32) {
        self.from *= factor;
        self.to *= factor;
    }
}

/// One rendered item that overlaps the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleItem {
    /// Position in the repeated strip.
    pub rendered: usize,
    /// Catalog index (`rendered mod N`).
    pub index: usize,
    /// Centre in viewport columns. May lie outside `[0, V)` for clipped items.
    pub center: f32,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Carousel<T> {
    items: Vec<T>,
    repeat: usize,
    viewport: Option<f32>,
    offset: f32,
    readiness: Readiness,
    animation: Option<ScrollAnimation>,
    /// Time since the last fine scroll, while a snap is pending.
    snap_idle: Option<Duration>,
    reduced_motion: bool,
}

impl<T> Carousel<T> {
    #[must_use]
    pub fn new(items: Vec<T>, repeat: usize) -> Self {
        Self {
            items,
            repeat: normalize_repeat(repeat),
            viewport: None,
            offset: 0.0,
            readiness: Readiness::Unmeasured,
            animation: None,
            snap_idle: None,
            reduced_motion: false,
        }
    }

    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.reduced_motion = reduced_motion;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn repeat(&self) -> usize {
        self.repeat
    }

    fn rendered_len(&self) -> usize {
        self.items.len() * self.repeat
    }

    /// True once measured and settled. Input and selection are ignored until then.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.snap_idle.is_some()
    }

    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[must_use]
    pub fn item_width(&self) -> Option<f32> {
        self.viewport.map(|v| v * ITEM_WIDTH_RATIO)
    }

    fn max_offset(&self, item_width: f32) -> f32 {
        self.rendered_len().saturating_sub(1) as f32 * item_width
    }

    /// Record the measured viewport width.
    ///
    /// The first usable measurement centres the middle repetition and starts
    /// the settling delay. Later changes rescale the offset so the same
    /// fractional item stays centred. Zero or non-finite widths are ignored.
    pub fn set_viewport_width(&mut self, width: f32) {
        if !width.is_finite() || width <= 0.0 || self.items.is_empty() {
            return;
        }

        match self.viewport {
            None => {
                self.viewport = Some(width);
                let start = (self.repeat / 2) * self.items.len();
                self.offset = start as f32 * width * ITEM_WIDTH_RATIO;
                self.readiness = Readiness::Settling {
                    elapsed: Duration::ZERO,
                };
                tracing::debug!(width, start, "Carousel measured");
            }
            Some(old) if (old - width).abs() > f32::EPSILON => {
                let factor = width / old;
                self.viewport = Some(width);
                self.offset *= factor;
                if let Some(animation) = &mut self.animation {
                    animation.scale(factor);
                }
            }
            Some(_) => {}
        }
    }

    /// Advance timers by one frame.
    pub fn advance(&mut self, delta: Duration) {
        if let Readiness::Settling { elapsed } = &mut self.readiness {
            *elapsed += delta;
            if *elapsed >= SETTLE_DELAY {
                self.readiness = Readiness::Ready;
                tracing::debug!("Carousel ready");
            }
        }

        if let Some(animation) = &mut self.animation {
            animation.timer.advance(delta);
            self.offset = animation.current();
            if animation.timer.is_finished() {
                self.offset = animation.to;
                self.animation = None;
            }
            self.rebase();
        }

        if let Some(idle) = &mut self.snap_idle {
            *idle += delta;
            if *idle >= SNAP_IDLE && self.animation.is_none() {
                self.snap_idle = None;
                self.snap_to_nearest();
            }
        }
    }

    /// Centre of rendered item `rendered` in viewport columns.
    #[must_use]
    pub fn item_center(&self, rendered: usize) -> Option<f32> {
        let viewport = self.viewport?;
        let width = viewport * ITEM_WIDTH_RATIO;
        Some(viewport / 2.0 + rendered as f32 * width - self.offset)
    }

    fn centers(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.rendered_len()).filter_map(|i| self.item_center(i))
    }

    /// Rendered position whose centre is nearest the viewport centre.
    fn closest_rendered(&self) -> Option<usize> {
        let viewport = self.viewport?;
        closest_index(viewport / 2.0, self.centers())
    }

    /// Catalog index of the item nearest the viewport centre.
    ///
    /// `None` until the carousel is ready. Always in `[0, N)` otherwise.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        if !self.is_ready() {
            return None;
        }
        self.closest_rendered().map(|r| r % self.items.len())
    }

    /// The catalog item currently under the centre line.
    #[must_use]
    pub fn select_active(&self) -> Option<&T> {
        self.active_index().and_then(|i| self.items.get(i))
    }

    /// Rendered items overlapping the viewport, left to right.
    #[must_use]
    pub fn visible_items(&self) -> Vec<VisibleItem> {
        let (Some(viewport), Some(width)) = (self.viewport, self.item_width()) else {
            return Vec::new();
        };
        let active = self.closest_rendered();
        (0..self.rendered_len())
            .filter_map(|rendered| {
                let center = self.item_center(rendered)?;
                let overlaps = center + width / 2.0 > 0.0 && center - width / 2.0 < viewport;
                overlaps.then(|| VisibleItem {
                    rendered,
                    index: rendered % self.items.len(),
                    center,
                    is_active: Some(rendered) == active,
                })
            })
            .collect()
    }

    /// Move one item left (`-1`) or right (`+1`), animated unless reduced motion is on.
    ///
    /// Repeated nudges during an animation accumulate from its target.
    /// Returns `false` when the carousel is not ready.
    pub fn scroll_by(&mut self, direction: isize) -> bool {
        if !self.is_ready() || direction == 0 {
            return false;
        }
        let (Some(width), Some(closest)) = (self.item_width(), self.closest_rendered()) else {
            return false;
        };

        let base = self
            .animation
            .as_ref()
            .map_or(closest as f32 * width, |animation| animation.to);
        let mut target = base + direction.signum() as f32 * width;

        // A burst of nudges can outrun the per-frame rebase; bring the target
        // back to the middle repetition before it reaches either end.
        if let Some(shift) = self.middle_shift((target / width).round() as isize, width) {
            self.offset += shift;
            if let Some(animation) = &mut self.animation {
                animation.shift(shift);
            }
            target += shift;
        }

        let target = target.clamp(0.0, self.max_offset(width));
        self.snap_idle = None;
        self.animate_to(target);
        true
    }

    /// Continuous scroll by `delta` columns; snaps to the nearest centre once idle.
    ///
    /// Returns `false` when the carousel is not ready.
    pub fn scroll_by_offset(&mut self, delta: f32) -> bool {
        if !self.is_ready() || !delta.is_finite() {
            return false;
        }
        let Some(width) = self.item_width() else {
            return false;
        };

        self.animation = None;
        self.offset = (self.offset + delta).clamp(0.0, self.max_offset(width));
        self.snap_idle = Some(Duration::ZERO);
        self.rebase();
        true
    }

    fn snap_to_nearest(&mut self) {
        let (Some(width), Some(closest)) = (self.item_width(), self.closest_rendered()) else {
            return;
        };
        let target = closest as f32 * width;
        if (target - self.offset).abs() < SNAP_EPSILON {
            self.offset = target;
            return;
        }
        self.animate_to(target);
    }

    fn animate_to(&mut self, target: f32) {
        if self.reduced_motion {
            self.animation = None;
            self.offset = target;
            self.rebase();
            return;
        }
        self.animation = Some(ScrollAnimation {
            from: self.offset,
            to: target,
            timer: EffectTimer::new(NUDGE_DURATION),
        });
    }

    /// Shift the offset by whole repetitions when inside the guard band.
    ///
    /// The closest rendered item moves to the same catalog item in the middle
    /// repetition. Relative position within the item is preserved, as is any
    /// in-flight animation. Returns whether a shift happened.
    fn rebase(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        let (Some(width), Some(closest)) = (self.item_width(), self.closest_rendered()) else {
            return false;
        };
        let Some(shift) = self.middle_shift(closest as isize, width) else {
            return false;
        };
        self.offset += shift;
        if let Some(animation) = &mut self.animation {
            animation.shift(shift);
        }
        tracing::trace!(from = closest, shift, "Carousel rebased");
        true
    }

    /// Column shift that moves rendered position `rendered` onto the same
    /// catalog item in the middle repetition.
    ///
    /// `None` while `rendered` is clear of the `2N` guard band at both ends.
    /// `rendered` may lie just outside the strip.
    fn middle_shift(&self, rendered: isize, width: f32) -> Option<f32> {
        let n = self.items.len() as isize;
        let total = self.rendered_len() as isize;
        let guard = 2 * n;
        if n == 0 || (rendered >= guard && rendered + guard < total) {
            return None;
        }

        let target = (self.repeat as isize / 2) * n + rendered.rem_euclid(n);
        (target != rendered).then(|| (target - rendered) as f32 * width)
    }
}
