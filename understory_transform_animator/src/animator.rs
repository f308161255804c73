// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Affine, Point};
use log::{debug, trace};
use understory_affine::{angle_degrees, post_rotate, post_scale, post_translate, scale_x, scale_y};

use crate::interpolator::{Interpolator, interpolate_channel};
use crate::listener::{AnimatorId, AnimatorListener};
use crate::surface::{AnimatorError, ContentMode, TransformSurface};

/// Duration used when none is given.
pub const DEFAULT_DURATION_MS: i64 = 200;

/// The five animated channels of a run.
///
/// `translate_x`/`translate_y` are the view position of the animation pivot,
/// not the matrix translation: an animation that only scales keeps the pivot
/// where it is on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationChannels {
    /// View x of the pivot.
    pub translate_x: f64,
    /// View y of the pivot.
    pub translate_y: f64,
    /// Horizontal scale.
    pub scale_x: f64,
    /// Vertical scale.
    pub scale_y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

/// Result of advancing an animator by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tick {
    /// Nothing is scheduled.
    Idle,
    /// A delayed start has not elapsed yet.
    Waiting,
    /// A frame was written and more follow.
    Running,
    /// The final frame was written this tick.
    Finished,
    /// The surface is gone; the run was dropped without notifications.
    Detached,
}

impl Tick {
    /// Whether the host should schedule another frame.
    #[must_use]
    pub fn needs_frame(self) -> bool {
        matches!(self, Self::Waiting | Self::Running)
    }
}

/// Handle returned by [`TransformAnimator::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(u32);

#[derive(Clone, Copy, Debug, Default)]
struct Interpolators {
    rotation: Interpolator,
    scale: Interpolator,
    translate_x: Interpolator,
    translate_y: Interpolator,
}

#[derive(Clone, Copy, Debug, Default)]
struct ExplicitTranslation {
    from_x: bool,
    from_y: bool,
    to_x: bool,
    to_y: bool,
}

/// Configures a [`TransformAnimator`] against a surface.
///
/// Every channel starts at the surface's current value, so a builder with no
/// `to_*` calls produces a run that holds the image still.
///
/// ```rust
/// use std::{cell::RefCell, rc::Rc};
/// use kurbo::{Affine, Size};
/// use understory_transform_animator::{Builder, ContentMode, Tick, TransformSurface};
///
/// struct Surface(Affine);
/// impl TransformSurface for Surface {
///     fn content_mode(&self) -> ContentMode { ContentMode::Matrix }
///     fn image_matrix(&self) -> Affine { self.0 }
///     fn set_image_matrix(&mut self, m: Affine) { self.0 = m; }
///     fn intrinsic_size(&self) -> Size { Size::new(200.0, 100.0) }
/// }
///
/// let surface = Rc::new(RefCell::new(Surface(Affine::IDENTITY)));
/// let mut anim = Builder::new(&surface).unwrap().to_scale(2.0).duration(100).build();
/// anim.start();
/// assert_eq!(anim.tick(0), Tick::Running);
/// assert_eq!(anim.tick(100), Tick::Finished);
/// // Scaled about the image center, which stayed at (100, 50).
/// assert!((surface.borrow().0 * kurbo::Point::new(100.0, 50.0) - kurbo::Point::new(100.0, 50.0)).hypot() < 1e-9);
/// ```
pub struct Builder<S> {
    surface: Weak<RefCell<S>>,
    current: Affine,
    pivot: Point,
    from: AnimationChannels,
    to: AnimationChannels,
    explicit: ExplicitTranslation,
    interpolators: Interpolators,
    duration_ms: i64,
    repeat: u32,
}

impl<S> fmt::Debug for Builder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("current", &self.current)
            .field("pivot", &self.pivot)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration_ms", &self.duration_ms)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

impl<S: TransformSurface> Builder<S> {
    /// Snapshots `surface` and starts a builder at its current transform.
    ///
    /// The default pivot is the center of the image's intrinsic bounds.
    ///
    /// # Errors
    ///
    /// [`AnimatorError::UnsupportedContentMode`] unless the surface is in
    /// [`ContentMode::Matrix`].
    pub fn new(surface: &Rc<RefCell<S>>) -> Result<Self, AnimatorError> {
        let (mode, current, size) = {
            let s = surface.borrow();
            (s.content_mode(), s.image_matrix(), s.intrinsic_size())
        };
        if mode != ContentMode::Matrix {
            return Err(AnimatorError::UnsupportedContentMode(mode));
        }
        let channels = AnimationChannels {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: scale_x(current),
            scale_y: scale_y(current),
            rotation: angle_degrees(current),
        };
        let mut builder = Self {
            surface: Rc::downgrade(surface),
            current,
            pivot: Point::new(size.width / 2.0, size.height / 2.0),
            from: channels,
            to: channels,
            explicit: ExplicitTranslation::default(),
            interpolators: Interpolators::default(),
            duration_ms: DEFAULT_DURATION_MS,
            repeat: 1,
        };
        builder.refresh_translation();
        Ok(builder)
    }
}

impl<S> Builder<S> {
    /// Starting rotation in degrees.
    #[must_use]
    pub fn from_rotate(mut self, degrees: f64) -> Self {
        self.from.rotation = degrees;
        self
    }

    /// Final rotation in degrees.
    #[must_use]
    pub fn to_rotate(mut self, degrees: f64) -> Self {
        self.to.rotation = degrees;
        self
    }

    /// Starting horizontal scale.
    #[must_use]
    pub fn from_scale_x(mut self, scale: f64) -> Self {
        self.from.scale_x = scale;
        self
    }

    /// Starting vertical scale.
    #[must_use]
    pub fn from_scale_y(mut self, scale: f64) -> Self {
        self.from.scale_y = scale;
        self
    }

    /// Starting scale on both axes.
    #[must_use]
    pub fn from_scale(self, scale: f64) -> Self {
        self.from_scale_x(scale).from_scale_y(scale)
    }

    /// Final horizontal scale.
    #[must_use]
    pub fn to_scale_x(mut self, scale: f64) -> Self {
        self.to.scale_x = scale;
        self
    }

    /// Final vertical scale.
    #[must_use]
    pub fn to_scale_y(mut self, scale: f64) -> Self {
        self.to.scale_y = scale;
        self
    }

    /// Final scale on both axes.
    #[must_use]
    pub fn to_scale(self, scale: f64) -> Self {
        self.to_scale_x(scale).to_scale_y(scale)
    }

    /// Starting view x of the pivot.
    #[must_use]
    pub fn from_translate_x(mut self, x: f64) -> Self {
        self.from.translate_x = x;
        self.explicit.from_x = true;
        self
    }

    /// Starting view y of the pivot.
    #[must_use]
    pub fn from_translate_y(mut self, y: f64) -> Self {
        self.from.translate_y = y;
        self.explicit.from_y = true;
        self
    }

    /// Final view x of the pivot.
    #[must_use]
    pub fn to_translate_x(mut self, x: f64) -> Self {
        self.to.translate_x = x;
        self.explicit.to_x = true;
        self
    }

    /// Final view y of the pivot.
    #[must_use]
    pub fn to_translate_y(mut self, y: f64) -> Self {
        self.to.translate_y = y;
        self.explicit.to_y = true;
        self
    }

    /// Moves the pivot to whatever image point currently sits at view `(x, y)`.
    ///
    /// The image point is found by undoing the current rotation about
    /// `(x, y)` and dividing by the current scale, so the result does not
    /// depend on earlier `from_*` calls. Translation channels that were not
    /// set explicitly are recomputed for the new pivot, so they keep meaning
    /// "stay where you are".
    #[must_use]
    pub fn anim_center(mut self, x: f64, y: f64) -> Self {
        let anchor = Point::new(x, y);
        let unrotated = post_rotate(self.current, -angle_degrees(self.current), anchor);
        let t = unrotated.translation();
        self.pivot = Point::new(
            (x - t.x) / nonzero(scale_x(self.current)),
            (y - t.y) / nonzero(scale_y(self.current)),
        );
        self.refresh_translation();
        self
    }

    /// Run length in milliseconds. Zero or negative jumps to the end on start.
    #[must_use]
    pub fn duration(mut self, ms: i64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Total number of passes, at least one.
    #[must_use]
    pub fn repeat(mut self, passes: u32) -> Self {
        self.repeat = passes.max(1);
        self
    }

    /// Interpolator for the rotation channel.
    #[must_use]
    pub fn angle_interpolator(mut self, i: Interpolator) -> Self {
        self.interpolators.rotation = i;
        self
    }

    /// Interpolator for both scale channels.
    #[must_use]
    pub fn scale_interpolator(mut self, i: Interpolator) -> Self {
        self.interpolators.scale = i;
        self
    }

    /// Interpolator for the horizontal translation channel.
    #[must_use]
    pub fn translate_x_interpolator(mut self, i: Interpolator) -> Self {
        self.interpolators.translate_x = i;
        self
    }

    /// Interpolator for the vertical translation channel.
    #[must_use]
    pub fn translate_y_interpolator(mut self, i: Interpolator) -> Self {
        self.interpolators.translate_y = i;
        self
    }

    /// Finishes configuration.
    #[must_use]
    pub fn build(self) -> TransformAnimator<S> {
        TransformAnimator {
            id: AnimatorId::next(),
            surface: self.surface,
            pivot: self.pivot,
            from: self.from,
            to: self.to,
            interpolators: self.interpolators,
            duration_ms: self.duration_ms,
            repeat: self.repeat,
            listeners: Vec::new(),
            next_listener: 0,
            state: RunState::Idle,
            passes_left: self.repeat,
            fraction: 0.0,
        }
    }

    fn refresh_translation(&mut self) {
        let linear = Affine::rotate(self.from.rotation.to_radians())
            * Affine::scale_non_uniform(self.from.scale_x, self.from.scale_y);
        let at = linear * self.pivot + self.current.translation();
        if !self.explicit.from_x {
            self.from.translate_x = at.x;
        }
        if !self.explicit.from_y {
            self.from.translate_y = at.y;
        }
        if !self.explicit.to_x {
            self.to.translate_x = at.x;
        }
        if !self.explicit.to_y {
            self.to.translate_y = at.y;
        }
    }
}

fn nonzero(scale: f64) -> f64 {
    if scale.abs() > f64::EPSILON { scale } else { 1.0 }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum RunState {
    Idle,
    Pending {
        delay_ms: u64,
        requested_at: Option<u64>,
    },
    Running {
        pass_started: Option<u64>,
    },
    Finished,
    Cancelled,
    Detached,
}

/// A frame-driven animation of a surface's image matrix.
///
/// The animator never schedules frames itself: the host calls
/// [`tick`](Self::tick) with the frame time until it stops returning a
/// [`Tick`] that [needs a frame](Tick::needs_frame).
pub struct TransformAnimator<S> {
    id: AnimatorId,
    surface: Weak<RefCell<S>>,
    pivot: Point,
    from: AnimationChannels,
    to: AnimationChannels,
    interpolators: Interpolators,
    duration_ms: i64,
    repeat: u32,
    listeners: Vec<(ListenerKey, Box<dyn AnimatorListener>)>,
    next_listener: u32,
    state: RunState,
    passes_left: u32,
    fraction: f64,
}

impl<S> fmt::Debug for TransformAnimator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformAnimator")
            .field("id", &self.id)
            .field("pivot", &self.pivot)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration_ms", &self.duration_ms)
            .field("state", &self.state)
            .field("fraction", &self.fraction)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S> TransformAnimator<S> {
    /// This animator's id, as reported to listeners.
    #[must_use]
    pub fn id(&self) -> AnimatorId {
        self.id
    }

    /// The pivot in image coordinates.
    #[must_use]
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Starting channel values.
    #[must_use]
    pub fn from_channels(&self) -> AnimationChannels {
        self.from
    }

    /// Final channel values.
    #[must_use]
    pub fn to_channels(&self) -> AnimationChannels {
        self.to
    }

    /// Run length in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    /// Time fraction of the last written frame, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Whether a run is scheduled, including a delayed start that has not elapsed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Pending { .. } | RunState::Running { .. })
    }

    /// Whether the last run completed normally.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    /// Whether the last run was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.state == RunState::Cancelled
    }

    /// Registers a listener and returns a key for removing it.
    pub fn add_listener(&mut self, listener: Box<dyn AnimatorListener>) -> ListenerKey {
        let key = ListenerKey(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.push((key, listener));
        key
    }

    /// Removes one listener.
    pub fn remove_listener(&mut self, key: ListenerKey) -> Option<Box<dyn AnimatorListener>> {
        let index = self.listeners.iter().position(|(k, _)| *k == key)?;
        Some(self.listeners.remove(index).1)
    }

    /// Removes every listener.
    pub fn remove_all_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Channel values at time fraction `fraction`.
    ///
    /// A channel whose start and end are equal reports exactly that value.
    #[must_use]
    pub fn channels_at(&self, fraction: f64) -> AnimationChannels {
        let i = &self.interpolators;
        let (from, to) = (&self.from, &self.to);
        AnimationChannels {
            translate_x: interpolate_channel(&i.translate_x, from.translate_x, to.translate_x, fraction),
            translate_y: interpolate_channel(&i.translate_y, from.translate_y, to.translate_y, fraction),
            scale_x: interpolate_channel(&i.scale, from.scale_x, to.scale_x, fraction),
            scale_y: interpolate_channel(&i.scale, from.scale_y, to.scale_y, fraction),
            rotation: interpolate_channel(&i.rotation, from.rotation, to.rotation, fraction),
        }
    }

    /// The image matrix at time fraction `fraction`.
    ///
    /// Scales about the pivot, rotates about it, then moves it to the
    /// interpolated translation.
    #[must_use]
    pub fn frame_at(&self, fraction: f64) -> Affine {
        let c = self.channels_at(fraction);
        let mut m = post_scale(Affine::IDENTITY, c.scale_x, c.scale_y, self.pivot);
        m = post_rotate(m, c.rotation, m * self.pivot);
        let target = Point::new(c.translate_x, c.translate_y);
        post_translate(m, target - m * self.pivot)
    }

    fn notify(&mut self, f: impl Fn(&mut dyn AnimatorListener, AnimatorId)) {
        let id = self.id;
        for (_, listener) in &mut self.listeners {
            f(listener.as_mut(), id);
        }
    }
}

impl<S: TransformSurface> TransformAnimator<S> {
    /// Starts a run on the next [`tick`](Self::tick).
    ///
    /// With a duration of zero or less the end state is written now and
    /// start and end are reported before this returns.
    pub fn start(&mut self) {
        self.start_delayed(0);
    }

    /// Starts a run once `delay_ms` has passed, counted from the next tick.
    ///
    /// Restarting a scheduled run begins it again from the first pass.
    pub fn start_delayed(&mut self, delay_ms: u64) {
        let Some(surface) = self.surface.upgrade() else {
            debug!("animator {:?}: surface dropped before start", self.id);
            self.state = RunState::Detached;
            return;
        };
        self.passes_left = self.repeat;
        if self.duration_ms <= 0 && delay_ms == 0 {
            debug!("animator {:?}: zero duration, jumping to end", self.id);
            self.notify(|l, id| l.on_animation_start(id));
            self.fraction = 1.0;
            surface.borrow_mut().set_image_matrix(self.frame_at(1.0));
            self.state = RunState::Finished;
            self.notify(|l, id| l.on_animation_end(id));
            return;
        }
        self.state = RunState::Pending {
            delay_ms,
            requested_at: None,
        };
    }

    /// Stops a scheduled or running run and reports `cancel` once.
    ///
    /// Does nothing if no run is scheduled or the surface is gone.
    pub fn cancel(&mut self) {
        if !self.is_running() {
            return;
        }
        if self.surface.strong_count() == 0 {
            self.state = RunState::Detached;
            return;
        }
        debug!("animator {:?}: cancelled at {:.3}", self.id, self.fraction);
        self.state = RunState::Cancelled;
        self.notify(|l, id| l.on_animation_cancel(id));
    }

    /// Advances the run to `now_ms` and writes the frame to the surface.
    pub fn tick(&mut self, now_ms: u64) -> Tick {
        let Some(surface) = self.surface.upgrade() else {
            if self.is_running() {
                debug!("animator {:?}: surface dropped mid-run", self.id);
            }
            self.state = RunState::Detached;
            return Tick::Detached;
        };

        let (pass_started, first_frame) = match self.state {
            RunState::Idle | RunState::Finished | RunState::Cancelled | RunState::Detached => {
                return Tick::Idle;
            }
            RunState::Pending {
                delay_ms,
                requested_at,
            } => {
                let requested = requested_at.unwrap_or(now_ms);
                if now_ms.saturating_sub(requested) < delay_ms {
                    self.state = RunState::Pending {
                        delay_ms,
                        requested_at: Some(requested),
                    };
                    return Tick::Waiting;
                }
                (now_ms, true)
            }
            RunState::Running { pass_started } => (pass_started.unwrap_or(now_ms), false),
        };
        self.state = RunState::Running {
            pass_started: Some(pass_started),
        };
        if first_frame {
            debug!("animator {:?}: start ({} ms)", self.id, self.duration_ms);
            self.notify(|l, id| l.on_animation_start(id));
        }

        let duration = u64::try_from(self.duration_ms).unwrap_or(0);
        let elapsed = now_ms.saturating_sub(pass_started);
        self.fraction = if duration == 0 {
            1.0
        } else {
            (elapsed as f64 / duration as f64).min(1.0)
        };
        trace!("animator {:?}: frame {:.3}", self.id, self.fraction);
        surface.borrow_mut().set_image_matrix(self.frame_at(self.fraction));

        if elapsed < duration {
            return Tick::Running;
        }
        if self.passes_left > 1 {
            self.passes_left -= 1;
            self.state = RunState::Running { pass_started: None };
            self.notify(|l, id| l.on_animation_repeat(id));
            return Tick::Running;
        }
        debug!("animator {:?}: end", self.id);
        self.passes_left = self.repeat;
        self.state = RunState::Finished;
        self.notify(|l, id| l.on_animation_end(id));
        Tick::Finished
    }
}
