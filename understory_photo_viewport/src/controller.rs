// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use log::{debug, trace, warn};
use understory_affine::{AffineTransform, SharedMatrix, angle_degrees, scale_x, scale_y, translate_y};
use understory_gesture::{GestureListener, GestureRecognizer, PointerPhase, PointerSample, TouchConfig};
use understory_transform_animator::{
    AnimatorEventKind, AnimatorId, Builder, EventQueue, FlingBounds, Interpolator, Scroller,
    TransformAnimator, TransformSurface,
};

use crate::config::ViewportConfig;
use crate::error::ViewportError;
use crate::flags::ViewportFlags;
use crate::sink::{AlphaSink, RenderSink};
use crate::surface::ImageSurface;

/// Resting range of the matrix translation for a fling.
///
/// `scaled` is the displayed image size. An oversized axis may rest anywhere
/// that keeps the view covered, from `view - scaled` up to `0`; an axis that
/// fits is pinned to its centered offset. Distances are truncated to whole
/// pixels. `None` when no axis is oversized: there is nothing to fling.
#[must_use]
pub fn fling_bounds(view: Size, scaled: Size) -> Option<FlingBounds> {
    let hs = (view.height - scaled.height).trunc();
    let ws = (view.width - scaled.width).trunc();
    if hs >= 0.0 && ws >= 0.0 {
        return None;
    }
    let cx = ((view.width - scaled.width) / 2.0).trunc();
    let cy = ((view.height - scaled.height) / 2.0).trunc();
    let (min_x, max_x) = if ws < 0.0 { (ws, 0.0) } else { (cx, cx) };
    let (min_y, max_y) = if hs < 0.0 { (hs, 0.0) } else { (cy, cy) };
    Some(FlingBounds {
        min_x,
        max_x,
        min_y,
        max_y,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RunKind {
    Entry,
    Dismiss,
    FitView,
    FitXy,
    Zoom,
}

#[derive(Debug)]
struct Run {
    kind: RunKind,
    animator: TransformAnimator<ImageSurface>,
}

struct DismissTarget {
    rect: Rect,
    on_dismissed: Box<dyn FnMut()>,
}

impl fmt::Debug for DismissTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissTarget")
            .field("rect", &self.rect)
            .finish_non_exhaustive()
    }
}

/// Drives an [`ImageSurface`] from pointer samples and frame ticks.
///
/// The controller owns the gesture recognizer, the current animation and
/// the fling scroller. Hosts feed it samples as they arrive and call
/// [`on_frame`](Self::on_frame) while [`needs_frame`](Self::needs_frame)
/// is true. Changes are reported through the [`RenderSink`] and
/// [`AlphaSink`] at most once per sample or frame.
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use understory_gesture::TouchConfig;
/// use understory_photo_viewport::{ViewportConfig, ViewportController};
///
/// let mut viewport = ViewportController::new(
///     Size::new(2000.0, 1000.0),
///     ViewportConfig::default(),
///     TouchConfig::default(),
///     (),
///     (),
/// );
/// viewport.set_init_args(Rect::new(100.0, 100.0, 300.0, 200.0), || {});
/// viewport.on_layout(Size::new(1000.0, 1000.0));
///
/// let mut now = 0;
/// while viewport.on_frame(now) {
///     now += 16;
/// }
/// assert_eq!(viewport.transform().sx, 0.5);
/// ```
#[derive(Debug)]
pub struct ViewportController<R, A> {
    recognizer: GestureRecognizer,
    core: ViewportCore<R, A>,
}

impl<R: RenderSink, A: AlphaSink> ViewportController<R, A> {
    /// Creates a controller for an image of `image_size`, not yet laid out.
    pub fn new(
        image_size: Size,
        config: ViewportConfig,
        touch: TouchConfig,
        render: R,
        alpha: A,
    ) -> Self {
        Self {
            recognizer: GestureRecognizer::new(touch),
            core: ViewportCore::new(image_size, config, render, alpha),
        }
    }

    /// Sets the origin rectangle for the entry and dismiss animations.
    ///
    /// `on_dismissed` fires once, when a dismiss animation completes. Set
    /// this before the first layout to get the entry animation.
    pub fn set_init_args(&mut self, rect: Rect, on_dismissed: impl FnMut() + 'static) {
        if self.core.flags.contains(ViewportFlags::LAID_OUT) {
            warn!("init args set after layout; the entry animation is skipped");
        }
        self.core.dismiss = Some(DismissTarget {
            rect,
            on_dismissed: Box::new(on_dismissed),
        });
    }

    /// Fits the image into a view of `view` size. Only the first call counts.
    pub fn on_layout(&mut self, view: Size) {
        self.core.layout(view);
        self.core.sync_outputs();
    }

    /// Feeds one pointer sample. Returns whether a gesture consumed it.
    pub fn on_pointer_sample(&mut self, sample: &PointerSample) -> bool {
        let handled = self.recognizer.on_sample(sample, &mut self.core);
        if sample.phase == PointerPhase::Cancel {
            self.core.end_session();
        }
        self.core.sync_outputs();
        handled
    }

    /// Feeds moves of several pointers that happened together.
    pub fn on_pointer_moves(&mut self, samples: &[PointerSample]) -> bool {
        let handled = self.recognizer.on_move_batch(samples, &mut self.core);
        self.core.sync_outputs();
        handled
    }

    /// Advances the fling and the running animation to `now_ms`.
    ///
    /// Returns whether another frame is needed.
    pub fn on_frame(&mut self, now_ms: u64) -> bool {
        self.core.frame(now_ms)
    }

    /// Animates the image back into its origin rectangle.
    ///
    /// # Errors
    ///
    /// [`ViewportError::NoInitArgs`] without an origin rectangle,
    /// [`ViewportError::NotLaidOut`] before the first layout.
    pub fn dismiss_preview(&mut self) -> Result<(), ViewportError> {
        let result = self.core.dismiss_preview();
        self.core.sync_outputs();
        result
    }

    /// Back navigation: dismisses if possible. Returns whether it did.
    pub fn on_back_pressed(&mut self) -> bool {
        self.dismiss_preview().is_ok()
    }
}

impl<R, A> ViewportController<R, A> {
    /// The displayed transform.
    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        self.core.surface.borrow().transform()
    }

    /// The displayed matrix.
    #[must_use]
    pub fn matrix(&self) -> Affine {
        self.core.surface.borrow().image_matrix()
    }

    /// Last background alpha sent to the sink, `1.0` before any.
    #[must_use]
    pub fn background_alpha(&self) -> f64 {
        self.core.emitted_alpha.unwrap_or(1.0)
    }

    /// Whether a dismiss animation has started.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.core.flags.contains(ViewportFlags::CLOSING)
    }

    /// Whether a fling is moving the image.
    #[must_use]
    pub fn is_on_fling(&self) -> bool {
        self.core.flags.contains(ViewportFlags::ON_FLING)
    }

    /// Whether the fitted image is taller than the view.
    #[must_use]
    pub fn is_long_image(&self) -> bool {
        self.core.flags.contains(ViewportFlags::LONG_IMAGE)
    }

    /// Whether the first layout has happened.
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        self.core.flags.contains(ViewportFlags::LAID_OUT)
    }

    /// Index into [`ViewportConfig::zoom_steps`] of the last double-tap zoom.
    #[must_use]
    pub fn scale_step_index(&self) -> usize {
        self.core.step_index
    }

    /// Scale that fits the image width to the view width.
    #[must_use]
    pub fn laid_out_scale(&self) -> f64 {
        self.core.laid_out_scale
    }

    /// All state bits.
    #[must_use]
    pub fn flags(&self) -> ViewportFlags {
        self.core.flags
    }

    /// The surface the controller animates.
    #[must_use]
    pub fn surface(&self) -> &Rc<RefCell<ImageSurface>> {
        &self.core.surface
    }

    /// A matrix handle for a render thread.
    #[must_use]
    pub fn matrix_reader(&self) -> SharedMatrix {
        self.core.surface.borrow().matrix_reader()
    }

    /// Whether a fling or animation still needs frames.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.core.needs_frame()
    }

    /// The gesture recognizer.
    #[must_use]
    pub fn recognizer(&self) -> &GestureRecognizer {
        &self.recognizer
    }

    /// The transform sink.
    #[must_use]
    pub fn render_sink(&self) -> &R {
        &self.core.render
    }

    /// The transform sink, mutably.
    pub fn render_sink_mut(&mut self) -> &mut R {
        &mut self.core.render
    }

    /// The alpha sink.
    #[must_use]
    pub fn alpha_sink(&self) -> &A {
        &self.core.alpha
    }

    /// The alpha sink, mutably.
    pub fn alpha_sink_mut(&mut self) -> &mut A {
        &mut self.core.alpha
    }
}

#[derive(Debug)]
struct ViewportCore<R, A> {
    config: ViewportConfig,
    surface: Rc<RefCell<ImageSurface>>,
    render: R,
    alpha: A,
    view: Size,
    image: Size,
    flags: ViewportFlags,
    dismiss: Option<DismissTarget>,
    laid_out_scale: f64,
    step_index: usize,
    /// Resting alpha, the base the closing fade multiplies.
    background_alpha: f64,
    emitted_alpha: Option<f64>,
    content_alpha: Option<f64>,
    scroll_start_y: f64,
    scroller: Scroller,
    run: Option<Run>,
    retired: Option<(AnimatorId, RunKind)>,
    events: EventQueue,
    synced_revision: Option<u64>,
}

impl<R, A> ViewportCore<R, A> {
    fn new(image: Size, config: ViewportConfig, render: R, alpha: A) -> Self {
        Self {
            config,
            surface: Rc::new(RefCell::new(ImageSurface::new(image))),
            render,
            alpha,
            view: Size::ZERO,
            image,
            flags: ViewportFlags::default(),
            dismiss: None,
            laid_out_scale: 1.0,
            step_index: 0,
            background_alpha: 1.0,
            emitted_alpha: None,
            content_alpha: None,
            scroll_start_y: 0.0,
            scroller: Scroller::new(config.density),
            run: None,
            retired: None,
            events: EventQueue::new(),
            synced_revision: None,
        }
    }

    fn needs_frame(&self) -> bool {
        self.flags.contains(ViewportFlags::ON_FLING)
            || self.run.as_ref().is_some_and(|r| r.animator.is_running())
    }

    fn matrix(&self) -> Affine {
        self.surface.borrow().image_matrix()
    }

    fn scale(&self) -> f64 {
        scale_x(self.matrix())
    }

    fn is_long(&self) -> bool {
        self.flags.contains(ViewportFlags::LONG_IMAGE)
    }

    fn is_rotated(&self) -> bool {
        angle_degrees(self.matrix()).abs() > self.config.rotation_epsilon_degrees
    }

    fn view_center(&self) -> Point {
        Point::new(self.view.width / 2.0, self.view.height / 2.0)
    }

    fn off_center_distance(&self) -> f64 {
        (self.surface.borrow().mapped_center() - self.view_center()).hypot()
    }

    /// How far the drag has pulled an edge of a long image into the view.
    ///
    /// Infinite when the dragged-toward edge is not inside the view, which
    /// also ends shrinking for the rest of the drag.
    fn over_distance(&mut self, current_y: f64) -> f64 {
        let m = self.matrix();
        let top = translate_y(m);
        let bottom = top + scale_y(m) * self.image.height;
        let dy = current_y - self.scroll_start_y;
        if dy > 0.0 {
            if top >= 0.0 {
                return dy;
            }
        } else if bottom <= self.view.height {
            return -dy;
        }
        self.flags.remove(ViewportFlags::SCROLL_SHRINKING);
        f64::INFINITY
    }

    fn end_session(&mut self) {
        self.flags.insert(
            ViewportFlags::NEW_SCALE | ViewportFlags::NEW_SCROLL | ViewportFlags::FIRST_SCALE_ZOOM_OUT,
        );
        self.flags.remove(ViewportFlags::SCROLL_SHRINKING);
    }
}

impl<R: RenderSink, A: AlphaSink> ViewportCore<R, A> {
    fn layout(&mut self, view: Size) {
        if self.flags.contains(ViewportFlags::LAID_OUT) {
            debug!("layout to {view:?} ignored, already laid out");
            return;
        }
        if self.image.is_zero_area() || view.is_zero_area() {
            warn!("cannot lay out image {:?} in view {view:?}", self.image);
            return;
        }
        self.view = view;
        self.laid_out_scale = view.width / self.image.width;
        let fitted_height = self.laid_out_scale * self.image.height;
        self.flags.set(ViewportFlags::LONG_IMAGE, fitted_height > view.height);
        self.flags.insert(ViewportFlags::LAID_OUT);
        let top = if self.is_long() {
            0.0
        } else {
            (view.height - fitted_height) / 2.0
        };
        debug!(
            "laid out at scale {:.4}, long image: {}",
            self.laid_out_scale,
            self.is_long()
        );

        let Some(rect) = self.dismiss.as_ref().map(|d| d.rect) else {
            {
                let mut surface = self.surface.borrow_mut();
                surface.scale_to(self.laid_out_scale, Point::ORIGIN);
                surface.translate_to(Point::new(0.0, top));
            }
            self.set_content_alpha(1.0);
            return;
        };
        self.set_content_alpha(0.0);
        let entry = Builder::new(&self.surface).map(|b| {
            b.from_translate_x(rect.center().x)
                .from_translate_y(rect.center().y)
                .from_scale_x(rect.width() / self.image.width)
                .from_scale_y(rect.height() / self.image.height)
                .to_translate_x(view.width / 2.0)
                .to_translate_y(top + fitted_height / 2.0)
                .to_scale_x(self.laid_out_scale)
                .to_scale_y(fitted_height / self.image.height)
                .to_rotate(0.0)
                .duration(self.config.entry_duration_ms)
        });
        match entry {
            Ok(builder) => self.start_run(RunKind::Entry, builder),
            Err(err) => {
                warn!("entry animation unavailable: {err}");
                self.set_content_alpha(1.0);
            }
        }
    }

    fn frame(&mut self, now_ms: u64) -> bool {
        self.compute_scroll(now_ms);
        let entry_fraction = self.run.as_mut().and_then(|run| {
            let tick = run.animator.tick(now_ms);
            trace!("{:?} run: {tick:?}", run.kind);
            (run.kind == RunKind::Entry && tick.needs_frame()).then(|| run.animator.fraction())
        });
        if let Some(fraction) = entry_fraction {
            self.set_content_alpha(fraction);
        }
        self.process_events();
        self.sync_outputs();
        self.needs_frame()
    }

    fn compute_scroll(&mut self, now_ms: u64) {
        if !self.flags.contains(ViewportFlags::ON_FLING) {
            return;
        }
        if self.flags.contains(ViewportFlags::CLOSING)
            || self.flags.contains(ViewportFlags::DOUBLE_TAPPING)
            || self.is_rotated()
        {
            self.scroller.abort();
            self.flags.remove(ViewportFlags::ON_FLING);
            return;
        }
        if self.scroller.compute_offset(now_ms) {
            let position = self.scroller.current();
            self.surface.borrow_mut().translate_to(position);
        } else {
            self.flags.remove(ViewportFlags::ON_FLING);
            let fit_width = self.is_long();
            self.animate_fit_xy_if_needed(fit_width);
        }
    }

    fn dismiss_preview(&mut self) -> Result<(), ViewportError> {
        let Some(rect) = self.dismiss.as_ref().map(|d| d.rect) else {
            warn!("dismiss requested without a dismiss rectangle");
            return Err(ViewportError::NoInitArgs);
        };
        if !self.flags.contains(ViewportFlags::LAID_OUT) {
            return Err(ViewportError::NotLaidOut);
        }
        let dismissing = self
            .run
            .as_ref()
            .is_some_and(|r| r.kind == RunKind::Dismiss && r.animator.is_running());
        if dismissing || self.flags.contains(ViewportFlags::DISMISSED) {
            debug!("dismiss already in progress");
            return Ok(());
        }
        let builder = Builder::new(&self.surface)?
            .to_rotate(0.0)
            .to_translate_x(rect.center().x)
            .to_translate_y(rect.center().y)
            .to_scale_x(rect.width() / self.image.width)
            .to_scale_y(rect.height() / self.image.height)
            .duration(self.config.dismiss_duration_ms);
        self.start_run(RunKind::Dismiss, builder);
        Ok(())
    }

    fn animate_fit_view(&mut self) -> Result<(), ViewportError> {
        let fit = self.view.width / self.image.width;
        let h = fit * self.image.height;
        let top = if self.is_long() {
            0.0
        } else {
            (self.view.height - h) / 2.0
        };
        let builder = Builder::new(&self.surface)?
            .to_rotate(0.0)
            .to_translate_x(self.view.width / 2.0)
            .to_translate_y(top + h / 2.0)
            .to_scale(fit)
            .duration(self.config.fit_view_duration_ms);
        self.start_run(RunKind::FitView, builder);
        Ok(())
    }

    /// Target centers for the axes that left their bounds.
    ///
    /// An oversized axis is pulled back only if an edge came inside the
    /// view; an axis that fits is always centered.
    fn xy_targets(&self) -> (Option<f64>, Option<f64>) {
        let (m, size) = {
            let s = self.surface.borrow();
            (s.image_matrix(), s.scaled_size())
        };
        let (w, h) = (size.width, size.height);
        let top_left = m * Point::ORIGIN;
        let top_right = m * Point::new(self.image.width, 0.0);
        let bottom_right = m * Point::new(self.image.width, self.image.height);

        let y = if h > self.view.height {
            if top_left.y > 0.0 {
                Some(h / 2.0)
            } else if bottom_right.y < self.view.height {
                Some(self.view.height - h / 2.0)
            } else {
                None
            }
        } else {
            Some(self.view.height / 2.0)
        };
        let x = if w > self.view.width {
            if top_left.x > 0.0 {
                Some(w / 2.0)
            } else if top_right.x < self.view.width {
                Some(self.view.width - w / 2.0)
            } else {
                None
            }
        } else {
            Some(self.view.width / 2.0)
        };
        (x, y)
    }

    fn animate_fit_xy_if_needed(&mut self, fit_width: bool) {
        if self.flags.contains(ViewportFlags::FIT_XY_UPDATING) {
            return;
        }
        let center = self.surface.borrow().mapped_center();
        let (x, y) = self.xy_targets();
        let x = x.filter(|x| (x - center.x).abs() > f64::EPSILON);
        let y = y.filter(|y| (y - center.y).abs() > f64::EPSILON);
        let fit = self.view.width / self.image.width;
        let rescale = fit_width && (self.scale() - fit).abs() > f64::EPSILON;
        let rotated = angle_degrees(self.matrix()).abs() > f64::EPSILON;
        if x.is_none() && y.is_none() && !rescale && !rotated {
            return;
        }
        let Ok(mut builder) = Builder::new(&self.surface) else {
            warn!("cannot recenter: surface is not in matrix mode");
            return;
        };
        builder = builder.to_rotate(0.0);
        if let Some(x) = x {
            builder = builder.to_translate_x(x);
        }
        if let Some(y) = y {
            builder = builder.to_translate_y(y);
        }
        if fit_width {
            builder = builder
                .to_scale_x(fit)
                .to_scale_y(self.laid_out_scale);
        }
        self.flags.insert(ViewportFlags::FIT_XY_UPDATING);
        self.start_run(RunKind::FitXy, builder.duration(self.config.fit_xy_duration_ms));
    }

    fn animate_zoom(&mut self, scale: f64, center: Point) -> Result<(), ViewportError> {
        let builder = Builder::new(&self.surface)?
            .to_scale(scale)
            .scale_interpolator(Interpolator::EaseInOut)
            .anim_center(center.x, center.y)
            .duration(self.config.zoom_duration_ms);
        self.start_run(RunKind::Zoom, builder);
        Ok(())
    }

    fn start_run(&mut self, kind: RunKind, builder: Builder<ImageSurface>) {
        self.retire_run();
        let mut animator = builder.build();
        animator.add_listener(Box::new(self.events.clone()));
        debug!("starting {kind:?} run {:?}", animator.id());
        animator.start();
        self.run = Some(Run { kind, animator });
        self.process_events();
    }

    /// Cancels the current run, if any, and handles its cancel event.
    fn retire_run(&mut self) {
        if let Some(mut old) = self.run.take() {
            self.retired = Some((old.animator.id(), old.kind));
            old.animator.cancel();
            self.process_events();
            self.retired = None;
        }
    }

    fn process_events(&mut self) {
        for event in self.events.drain() {
            let kind = match (&self.run, self.retired) {
                (Some(run), _) if run.animator.id() == event.animator => run.kind,
                (_, Some((id, kind))) if id == event.animator => kind,
                _ => {
                    trace!("stale animator event {event:?}");
                    continue;
                }
            };
            self.on_run_event(kind, event.kind);
        }
    }

    fn on_run_event(&mut self, kind: RunKind, event: AnimatorEventKind) {
        trace!("{kind:?} run: {event:?}");
        match (kind, event) {
            (RunKind::Dismiss, AnimatorEventKind::Start) => {
                self.flags.insert(ViewportFlags::CLOSING);
            }
            (RunKind::Dismiss, AnimatorEventKind::Cancel) => {
                self.flags.remove(ViewportFlags::CLOSING);
            }
            (RunKind::Dismiss, AnimatorEventKind::End) => {
                if self.flags.contains(ViewportFlags::DISMISSED) {
                    return;
                }
                self.flags.insert(ViewportFlags::DISMISSED);
                debug!("preview dismissed");
                if let Some(target) = &mut self.dismiss {
                    (target.on_dismissed)();
                }
            }
            (RunKind::FitXy, AnimatorEventKind::End | AnimatorEventKind::Cancel) => {
                self.flags.remove(ViewportFlags::FIT_XY_UPDATING);
            }
            (RunKind::Entry, AnimatorEventKind::End | AnimatorEventKind::Cancel) => {
                self.set_content_alpha(1.0);
            }
            _ => {}
        }
    }

    fn set_content_alpha(&mut self, alpha: f64) {
        if self.content_alpha != Some(alpha) {
            self.content_alpha = Some(alpha);
            self.alpha.set_content_alpha(alpha);
        }
    }

    /// Reports the transform and alpha if the matrix changed since last time.
    fn sync_outputs(&mut self) {
        let (revision, transform) = {
            let s = self.surface.borrow();
            (s.revision(), s.transform())
        };
        if self.synced_revision == Some(revision) {
            return;
        }
        self.synced_revision = Some(revision);
        self.render.render_transform(transform);
        self.update_alpha(transform);
    }

    fn update_alpha(&mut self, t: AffineTransform) {
        let alpha = if self.flags.contains(ViewportFlags::CLOSING) {
            let Some(rect) = self.dismiss.as_ref().map(|d| d.rect) else {
                return;
            };
            let travel = self.view.width - rect.width();
            let factor = if travel.abs() > f64::EPSILON {
                (t.sx * self.image.width - rect.width()) / travel
            } else {
                0.0
            };
            self.background_alpha * factor
        } else if self.flags.contains(ViewportFlags::LAID_OUT) && t.sx <= self.laid_out_scale {
            self.background_alpha = self.resting_alpha(t.sx).max(0.0).min(1.0);
            self.background_alpha
        } else {
            return;
        };
        let alpha = alpha.max(0.0).min(1.0);
        if self.emitted_alpha != Some(alpha) {
            trace!("background alpha {alpha:.3}");
            self.emitted_alpha = Some(alpha);
            self.alpha.set_background_alpha(alpha);
        }
    }

    /// Alpha from how far the scale fell below the fit and how far the
    /// image drifted from the view center. Long images use the scale term.
    fn resting_alpha(&self, scale: f64) -> f64 {
        let scale_alpha = scale / self.laid_out_scale;
        if self.is_long() {
            return scale_alpha;
        }
        let window = self.config.alpha_distance_window;
        let floor = self.config.alpha_distance_floor;
        let off = self.off_center_distance();
        let distance_alpha = if off > floor {
            (window - off).max(floor) / window
        } else {
            1.0
        };
        scale_alpha.min(distance_alpha)
    }

    fn settle(&mut self) {
        let scale = self.scale();
        let on_fling = self.flags.contains(ViewportFlags::ON_FLING);
        let result = if scale * self.image.width <= self.config.close_width(self.view.width) {
            if self.dismiss.is_some() {
                self.dismiss_preview()
            } else if !on_fling {
                self.animate_fit_view()
            } else {
                Ok(())
            }
        } else if on_fling {
            Ok(())
        } else {
            let rotated = angle_degrees(self.matrix()).abs() > self.config.rotation_snap_degrees;
            let shrunk = scale < self.laid_out_scale;
            if (rotated || shrunk) && !self.is_long() {
                self.animate_fit_view()
            } else {
                self.animate_fit_xy_if_needed(shrunk);
                Ok(())
            }
        };
        if let Err(err) = result {
            warn!("cannot settle after release: {err}");
        }
    }
}

impl<R: RenderSink, A: AlphaSink> GestureListener for ViewportCore<R, A> {
    fn on_action_down(&mut self, _sample: &PointerSample) {
        self.scroller.abort();
        let interruptible = self.run.as_ref().is_some_and(|r| {
            r.animator.is_running()
                && matches!(r.kind, RunKind::FitView | RunKind::FitXy | RunKind::Zoom)
        });
        if interruptible {
            self.retire_run();
        }
    }

    fn on_action_up(&mut self, _sample: &PointerSample) -> bool {
        self.end_session();
        if self.flags.contains(ViewportFlags::DOUBLE_TAPPING) {
            self.flags.remove(ViewportFlags::DOUBLE_TAPPING);
            return false;
        }
        if self.flags.contains(ViewportFlags::LAID_OUT) {
            self.settle();
        }
        true
    }

    fn on_double_tap_event(&mut self, sample: &PointerSample) -> bool {
        if !sample.is_up() || !self.flags.contains(ViewportFlags::LAID_OUT) {
            return false;
        }
        self.flags.insert(ViewportFlags::DOUBLE_TAPPING);
        self.scroller.abort();
        self.flags.remove(ViewportFlags::ON_FLING);
        let steps = self.config.zoom_steps.len().max(1);
        self.step_index = (self.step_index + 1) % steps;
        let scale = self.config.zoom_step(self.step_index) * self.view.width / self.image.width;
        debug!("double tap: zoom step {} ({scale:.4})", self.step_index);
        if let Err(err) = self.animate_zoom(scale, sample.position) {
            warn!("cannot zoom: {err}");
        }
        true
    }

    fn on_single_finger_scroll(
        &mut self,
        _down: &PointerSample,
        current: &PointerSample,
        distance: Vec2,
    ) -> bool {
        if self.flags.contains(ViewportFlags::NEW_SCROLL) {
            self.scroll_start_y = current.position.y;
            self.flags.remove(ViewportFlags::NEW_SCROLL);
        }
        let scale = self.scale();
        let (offset, pivot) = if self.is_long() {
            (self.over_distance(current.position.y), self.view_center())
        } else {
            (
                self.off_center_distance(),
                self.surface.borrow().mapped_center(),
            )
        };
        if offset < self.config.shrink_threshold
            && scale <= self.laid_out_scale * self.config.fit_tolerance
        {
            self.flags.insert(ViewportFlags::SCROLL_SHRINKING);
            let target = (self.view.width - offset) / self.image.width;
            self.surface.borrow_mut().scale_to(target, pivot);
        }
        self.surface.borrow_mut().post_translate(-distance);
        true
    }

    fn on_multi_finger_scroll(
        &mut self,
        _down: &PointerSample,
        _current: &PointerSample,
        distance: Vec2,
    ) -> bool {
        self.surface.borrow_mut().post_translate(-distance);
        true
    }

    fn on_scale(&mut self, factor: f64, focus: Point) -> bool {
        self.surface.borrow_mut().post_scale(factor, focus);
        if self.flags.contains(ViewportFlags::NEW_SCALE) {
            let zoom_out = self.scale() < self.laid_out_scale;
            self.flags.set(ViewportFlags::FIRST_SCALE_ZOOM_OUT, zoom_out);
            self.flags.remove(ViewportFlags::NEW_SCALE);
        }
        true
    }

    fn on_rotation(&mut self, delta_degrees: f64, focus: Point) -> bool {
        let rotatable = self.flags.contains(ViewportFlags::FIRST_SCALE_ZOOM_OUT) && !self.is_long();
        if rotatable {
            self.surface.borrow_mut().post_rotate(delta_degrees, focus);
        }
        rotatable
    }

    fn on_fling(&mut self, _down: &PointerSample, _up: &PointerSample, velocity: Vec2) -> bool {
        let scaled = self.surface.borrow().scaled_size();
        let Some(bounds) = fling_bounds(self.view, scaled) else {
            return false;
        };
        let shrinking_long = self.flags.contains(ViewportFlags::SCROLL_SHRINKING) && self.is_long();
        if !self.flags.contains(ViewportFlags::DOUBLE_TAPPING) && !self.is_rotated() && !shrinking_long
        {
            let start = self.matrix().translation();
            let overscroll = self.config.fling_overscroll;
            self.scroller.fling(
                Point::new(start.x.trunc(), start.y.trunc()),
                velocity,
                bounds,
                Vec2::new(overscroll, overscroll),
            );
            self.flags.insert(ViewportFlags::ON_FLING);
        }
        true
    }
}
