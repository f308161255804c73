// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::config::TouchConfig;
use crate::sample::{PointerId, PointerPhase, PointerSample};
use crate::velocity::VelocityTracker;

/// Receives classified gestures.
///
/// Every method has a no-op default, so listeners implement only what they
/// use. Methods returning `bool` report whether the listener consumed the
/// gesture; the recognizer ORs them into the return value of
/// [`GestureRecognizer::on_sample`].
pub trait GestureListener {
    /// The first pointer went down.
    fn on_action_down(&mut self, _sample: &PointerSample) {}

    /// The last pointer lifted. Called after any fling or double-tap event.
    fn on_action_up(&mut self, _sample: &PointerSample) -> bool {
        false
    }

    /// Down, move and up samples of the second tap of a double tap.
    fn on_double_tap_event(&mut self, _sample: &PointerSample) -> bool {
        false
    }

    /// The focus moved while exactly one pointer drives the gesture.
    ///
    /// `distance` is the previous focus minus the current focus, so dragging
    /// right yields a negative x.
    fn on_single_finger_scroll(
        &mut self,
        _down: &PointerSample,
        _current: &PointerSample,
        _distance: Vec2,
    ) -> bool {
        false
    }

    /// The focus moved while several pointers drive the gesture.
    ///
    /// `distance` follows the same convention as
    /// [`on_single_finger_scroll`](Self::on_single_finger_scroll).
    fn on_multi_finger_scroll(
        &mut self,
        _down: &PointerSample,
        _current: &PointerSample,
        _distance: Vec2,
    ) -> bool {
        false
    }

    /// The pointer span changed by `factor` since the last move.
    fn on_scale(&mut self, _factor: f64, _focus: Point) -> bool {
        false
    }

    /// The line through the first two pointers turned by `delta_degrees`.
    fn on_rotation(&mut self, _delta_degrees: f64, _focus: Point) -> bool {
        false
    }

    /// The last pointer lifted fast enough to fling, velocity in px/s.
    fn on_fling(&mut self, _down: &PointerSample, _up: &PointerSample, _velocity: Vec2) -> bool {
        false
    }
}

/// How the current scroll burst is being reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScrollMode {
    /// No scroll burst in progress.
    #[default]
    None,
    /// One pointer drives the scroll.
    SingleFinger,
    /// Several pointers drive the scroll; pinch and rotation may run too.
    MultiFinger,
}

#[derive(Clone, Debug)]
struct ActivePointer {
    id: PointerId,
    position: Point,
    velocity: VelocityTracker,
}

/// Turns raw pointer samples into gestures.
///
/// One recognizer tracks one gesture stream; feed it every sample in order
/// and pass the listener that should hear about the result. The recognizer
/// never stores the listener, so the same value can also own other state
/// the host mutates between samples.
///
/// Phases are normalized against the pointers currently down: a `Down` while
/// another pointer is active is handled as `PointerDown`, and an `Up` that
/// leaves pointers behind as `PointerUp`. Samples for unknown pointers are
/// ignored.
///
/// ```rust
/// use understory_gesture::{GestureEvent, GestureRecognizer, PointerSample, TouchConfig};
///
/// let mut recognizer = GestureRecognizer::new(TouchConfig::default());
/// let mut log: Vec<GestureEvent> = Vec::new();
/// recognizer.on_sample(&PointerSample::down(0, (100.0, 100.0), 0), &mut log);
/// recognizer.on_sample(&PointerSample::moved(0, (140.0, 100.0), 16), &mut log);
/// recognizer.on_sample(&PointerSample::up(0, (140.0, 100.0), 200), &mut log);
///
/// assert!(matches!(log[0], GestureEvent::ActionDown(_)));
/// assert!(matches!(log[1], GestureEvent::SingleFingerScroll { distance, .. } if distance.x == -40.0));
/// assert!(matches!(log.last(), Some(GestureEvent::ActionUp(_))));
/// ```
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    config: TouchConfig,
    pointers: SmallVec<[ActivePointer; 4]>,
    current_down: Option<PointerSample>,
    previous_up: Option<PointerSample>,
    tap_window_until: Option<u64>,
    double_tapping: bool,
    last_focus: Point,
    current_span: f64,
    initial_span: f64,
    previous_span: f64,
    rotation_baseline: Option<f64>,
    scroll_mode: ScrollMode,
    mode_deadline: Option<u64>,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(TouchConfig::default())
    }
}

impl GestureRecognizer {
    /// Creates an idle recognizer.
    #[must_use]
    pub fn new(config: TouchConfig) -> Self {
        Self {
            config,
            pointers: SmallVec::new(),
            current_down: None,
            previous_up: None,
            tap_window_until: None,
            double_tapping: false,
            last_focus: Point::ORIGIN,
            current_span: 0.0,
            initial_span: 0.0,
            previous_span: 0.0,
            rotation_baseline: None,
            scroll_mode: ScrollMode::None,
            mode_deadline: None,
        }
    }

    /// The thresholds in use.
    #[must_use]
    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Whether the second tap of a double tap is in progress.
    #[must_use]
    pub fn is_double_tapping(&self) -> bool {
        self.double_tapping
    }

    /// The scroll classification of the current burst.
    #[must_use]
    pub fn scroll_mode(&self) -> ScrollMode {
        self.scroll_mode
    }

    /// Average position of the pointers that are down, or the last known focus.
    #[must_use]
    pub fn focus(&self) -> Point {
        focus_of(self.pointers.iter().map(|p| p.position)).unwrap_or(self.last_focus)
    }

    /// Current pointer span (twice the mean deviation from the focus).
    #[must_use]
    pub fn span(&self) -> f64 {
        self.current_span
    }

    /// Handles one sample. Returns whether any listener callback consumed it.
    pub fn on_sample<L: GestureListener + ?Sized>(
        &mut self,
        sample: &PointerSample,
        listener: &mut L,
    ) -> bool {
        match sample.phase {
            PointerPhase::Move => self.on_move_batch(core::slice::from_ref(sample), listener),
            PointerPhase::Down | PointerPhase::PointerDown => {
                if self.index_of(sample.id).is_some() {
                    warn!("down for pointer {:?} which is already down", sample.id);
                    return false;
                }
                if self.pointers.is_empty() {
                    self.on_down(&sample.with_phase(PointerPhase::Down), listener)
                } else {
                    self.on_pointer_down(&sample.with_phase(PointerPhase::PointerDown));
                    false
                }
            }
            PointerPhase::Up | PointerPhase::PointerUp => {
                let Some(index) = self.index_of(sample.id) else {
                    warn!("up for unknown pointer {:?}", sample.id);
                    return false;
                };
                if self.pointers.len() > 1 {
                    self.on_pointer_up(index);
                    false
                } else {
                    self.on_up(index, &sample.with_phase(PointerPhase::Up), listener)
                }
            }
            PointerPhase::Cancel => {
                self.cancel();
                false
            }
        }
    }

    /// Handles moves of several pointers that happened together.
    ///
    /// All positions are applied before the gesture is evaluated once, with
    /// the last sample as the reported current event.
    pub fn on_move_batch<L: GestureListener + ?Sized>(
        &mut self,
        samples: &[PointerSample],
        listener: &mut L,
    ) -> bool {
        let mut last = None;
        for sample in samples {
            let Some(index) = self.index_of(sample.id) else {
                warn!("move for unknown pointer {:?}", sample.id);
                continue;
            };
            let pointer = &mut self.pointers[index];
            pointer.position = sample.position;
            pointer.velocity.add(sample.time_ms, sample.position);
            last = Some(sample.with_phase(PointerPhase::Move));
        }
        match last {
            Some(sample) => self.evaluate_move(&sample, listener),
            None => false,
        }
    }

    /// Drops all gesture state, as for a cancel sample.
    pub fn cancel(&mut self) {
        debug!("gesture cancelled");
        let config = self.config;
        *self = Self::new(config);
    }

    fn index_of(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|p| p.id == id)
    }

    fn push_pointer(&mut self, sample: &PointerSample) {
        let mut velocity = VelocityTracker::new();
        velocity.add(sample.time_ms, sample.position);
        self.pointers.push(ActivePointer {
            id: sample.id,
            position: sample.position,
            velocity,
        });
    }

    fn on_down<L: GestureListener + ?Sized>(
        &mut self,
        sample: &PointerSample,
        listener: &mut L,
    ) -> bool {
        self.push_pointer(sample);
        listener.on_action_down(sample);
        self.last_focus = sample.position;
        self.reset_span();

        let mut handled = false;
        let had_tap = self.tap_window_until.take().is_some_and(|until| sample.time_ms <= until);
        let is_double = had_tap
            && match (self.current_down, self.previous_up) {
                (Some(first_down), Some(first_up)) => {
                    self.is_considered_double_tap(&first_down, &first_up, sample)
                }
                _ => false,
            };
        if is_double {
            debug!("double tap at {:?}", sample.position);
            self.double_tapping = true;
            handled |= listener.on_double_tap_event(sample);
        } else {
            self.tap_window_until = Some(sample.time_ms + self.config.double_tap_timeout_ms);
        }
        self.current_down = Some(*sample);
        handled
    }

    fn is_considered_double_tap(
        &self,
        first_down: &PointerSample,
        first_up: &PointerSample,
        second_down: &PointerSample,
    ) -> bool {
        let Some(gap) = second_down.time_ms.checked_sub(first_up.time_ms) else {
            return false;
        };
        if gap < self.config.double_tap_min_time_ms || gap > self.config.double_tap_timeout_ms {
            return false;
        }
        // Whole-pixel deltas, like the platform detector.
        let dx = first_down.position.x.trunc() - second_down.position.x.trunc();
        let dy = first_down.position.y.trunc() - second_down.position.y.trunc();
        let slop = self.config.double_tap_slop;
        dx * dx + dy * dy < slop * slop
    }

    fn on_pointer_down(&mut self, sample: &PointerSample) {
        self.push_pointer(sample);
        self.last_focus = self.focus();
        self.rotation_baseline = None;
        self.reset_span();
    }

    fn evaluate_move<L: GestureListener + ?Sized>(
        &mut self,
        sample: &PointerSample,
        listener: &mut L,
    ) -> bool {
        if self.double_tapping {
            return listener.on_double_tap_event(sample);
        }
        let down = self.current_down.unwrap_or(*sample);
        let focus = self.focus();
        let distance = self.last_focus - focus;
        let mut handled = false;

        if distance.x.abs() >= 1.0 || distance.y.abs() >= 1.0 {
            let window_open = self.mode_deadline.is_some_and(|until| sample.time_ms < until);
            if self.scroll_mode == ScrollMode::None || window_open {
                self.classify_scroll(sample.time_ms);
            }
            handled |= match self.scroll_mode {
                ScrollMode::MultiFinger => {
                    listener.on_multi_finger_scroll(&down, sample, distance)
                }
                _ => listener.on_single_finger_scroll(&down, sample, distance),
            };
            self.last_focus = focus;
        }

        self.current_span = self.compute_span();
        if self.scroll_mode != ScrollMode::SingleFinger {
            handled |= self.detect_scale(focus, listener);
            handled |= self.detect_rotation(focus, listener);
        } else {
            self.reset_span();
        }
        self.previous_span = self.current_span;
        handled
    }

    fn classify_scroll(&mut self, now_ms: u64) {
        let mode = if self.pointers.len() > 1 {
            self.mode_deadline = None;
            ScrollMode::MultiFinger
        } else {
            if self.scroll_mode != ScrollMode::SingleFinger {
                self.mode_deadline = Some(now_ms + self.config.scroll_state_change_window_ms);
            }
            ScrollMode::SingleFinger
        };
        if mode != self.scroll_mode {
            debug!("scroll mode {:?} -> {:?}", self.scroll_mode, mode);
            self.scroll_mode = mode;
        }
    }

    fn detect_scale<L: GestureListener + ?Sized>(&self, focus: Point, listener: &mut L) -> bool {
        if (self.current_span - self.initial_span).abs() <= self.config.scale_span_slop
            || self.previous_span <= 0.0
        {
            return false;
        }
        listener.on_scale(self.current_span / self.previous_span, focus)
    }

    fn detect_rotation<L: GestureListener + ?Sized>(
        &mut self,
        focus: Point,
        listener: &mut L,
    ) -> bool {
        let [first, second, ..] = self.pointers.as_slice() else {
            self.rotation_baseline = None;
            return false;
        };
        let line = second.position - first.position;
        let angle = line.y.atan2(line.x).to_degrees();
        let Some(baseline) = self.rotation_baseline.replace(angle) else {
            return false;
        };
        let delta = normalize_delta(angle - baseline);
        if delta == 0.0 {
            return false;
        }
        listener.on_rotation(delta, focus)
    }

    fn on_pointer_up(&mut self, index: usize) {
        self.pointers.remove(index);
        self.rotation_baseline = None;
        self.last_focus = self.focus();
        self.reset_span();
    }

    fn on_up<L: GestureListener + ?Sized>(
        &mut self,
        index: usize,
        sample: &PointerSample,
        listener: &mut L,
    ) -> bool {
        let mut lifted = self.pointers.remove(index);
        lifted.velocity.add(sample.time_ms, sample.position);
        self.scroll_mode = ScrollMode::None;
        self.mode_deadline = None;
        self.rotation_baseline = None;

        let mut handled = false;
        if self.double_tapping {
            handled |= listener.on_double_tap_event(sample);
            self.double_tapping = false;
        } else {
            let velocity = lifted.velocity.velocity(self.config.max_fling_velocity);
            let min = self.config.min_fling_velocity;
            if velocity.x.abs() >= min || velocity.y.abs() >= min {
                debug!("fling {velocity:?}");
                let down = self.current_down.unwrap_or(*sample);
                handled |= listener.on_fling(&down, sample, velocity);
            }
        }
        handled |= listener.on_action_up(sample);
        self.previous_up = Some(*sample);
        self.reset_span();
        handled
    }

    fn reset_span(&mut self) {
        self.current_span = self.compute_span();
        self.initial_span = self.current_span;
        self.previous_span = self.current_span;
    }

    fn compute_span(&self) -> f64 {
        let positions = || self.pointers.iter().map(|p| p.position);
        let Some(focus) = focus_of(positions()) else {
            return 0.0;
        };
        let mut dev = Vec2::ZERO;
        let mut n = 0.0;
        for p in positions() {
            dev.x += (p.x - focus.x).abs();
            dev.y += (p.y - focus.y).abs();
            n += 1.0;
        }
        (2.0 * dev.x / n).hypot(2.0 * dev.y / n)
    }
}

fn focus_of(positions: impl Iterator<Item = Point>) -> Option<Point> {
    let mut sum = Vec2::ZERO;
    let mut n = 0.0;
    for p in positions {
        sum += p.to_vec2();
        n += 1.0;
    }
    (n > 0.0).then(|| (sum / n).to_point())
}

fn normalize_delta(degrees: f64) -> f64 {
    let mut d = degrees % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GestureEvent;
    use alloc::vec::Vec;

    fn feed(r: &mut GestureRecognizer, log: &mut Vec<GestureEvent>, samples: &[PointerSample]) {
        for s in samples {
            r.on_sample(s, log);
        }
    }

    #[test]
    fn span_is_twice_the_mean_deviation() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (0.0, 0.0), 0),
                PointerSample::down(1, (30.0, 40.0), 5),
            ],
        );
        assert!((r.span() - 50.0).abs() < 1e-9);
        assert_eq!(r.focus(), Point::new(15.0, 20.0));
        assert_eq!(r.pointer_count(), 2);
    }

    #[test]
    fn second_down_is_normalized_to_pointer_down() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (0.0, 0.0), 0),
                PointerSample::down(1, (10.0, 0.0), 5),
                PointerSample::up(0, (0.0, 0.0), 10),
            ],
        );
        assert_eq!(log.iter().filter(|e| matches!(e, GestureEvent::ActionDown(_))).count(), 1);
        assert!(!log.iter().any(|e| matches!(e, GestureEvent::ActionUp(_))));
        assert_eq!(r.pointer_count(), 1);
    }

    #[test]
    fn unknown_pointers_are_ignored() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        assert!(!r.on_sample(&PointerSample::moved(3, (1.0, 1.0), 0), &mut log));
        assert!(!r.on_sample(&PointerSample::up(3, (1.0, 1.0), 0), &mut log));
        assert!(log.is_empty());
    }

    #[test]
    fn sub_pixel_moves_do_not_scroll() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (10.0, 10.0), 0),
                PointerSample::moved(0, (10.5, 10.5), 8),
                PointerSample::moved(0, (10.9, 9.2), 16),
            ],
        );
        assert_eq!(log.len(), 1);
        assert_eq!(r.scroll_mode(), ScrollMode::None);
    }

    #[test]
    fn single_becomes_multi_inside_the_window() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (0.0, 0.0), 0),
                PointerSample::moved(0, (5.0, 0.0), 10),
                PointerSample::down(1, (100.0, 0.0), 20),
                PointerSample::moved(1, (110.0, 0.0), 30),
            ],
        );
        assert_eq!(r.scroll_mode(), ScrollMode::MultiFinger);
        assert!(matches!(log.last(), Some(GestureEvent::MultiFingerScroll { .. })));
    }

    #[test]
    fn single_is_locked_after_the_window() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (0.0, 0.0), 0),
                PointerSample::moved(0, (5.0, 0.0), 10),
                PointerSample::down(1, (100.0, 0.0), 100),
                PointerSample::moved(1, (200.0, 0.0), 110),
            ],
        );
        assert_eq!(r.scroll_mode(), ScrollMode::SingleFinger);
        assert!(!log.iter().any(|e| matches!(e, GestureEvent::Scale { .. })));
    }

    #[test]
    fn pinch_reports_incremental_factors() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (100.0, 100.0), 0),
                PointerSample::down(1, (200.0, 100.0), 5),
            ],
        );
        r.on_move_batch(
            &[
                PointerSample::moved(0, (80.0, 100.0), 16),
                PointerSample::moved(1, (220.0, 100.0), 16),
            ],
            &mut log,
        );
        r.on_move_batch(
            &[
                PointerSample::moved(0, (50.0, 100.0), 32),
                PointerSample::moved(1, (250.0, 100.0), 32),
            ],
            &mut log,
        );
        let factors: Vec<f64> = log
            .iter()
            .filter_map(|e| match e {
                GestureEvent::Scale { factor, .. } => Some(*factor),
                _ => None,
            })
            .collect();
        assert_eq!(factors.len(), 2);
        assert!((factors[0] - 140.0 / 100.0).abs() < 1e-9);
        assert!((factors[1] - 200.0 / 140.0).abs() < 1e-9);
    }

    #[test]
    fn small_span_changes_stay_below_slop() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (100.0, 100.0), 0),
                PointerSample::down(1, (200.0, 100.0), 5),
            ],
        );
        r.on_move_batch(
            &[
                PointerSample::moved(0, (95.0, 100.0), 16),
                PointerSample::moved(1, (205.0, 100.0), 16),
            ],
            &mut log,
        );
        assert!(!log.iter().any(|e| matches!(e, GestureEvent::Scale { .. })));
    }

    #[test]
    fn rotation_skips_the_baseline_sample() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (0.0, 0.0), 0),
                PointerSample::down(1, (100.0, 0.0), 5),
                PointerSample::moved(1, (100.0, 1.0), 10),
                PointerSample::moved(1, (0.0, 100.0), 20),
            ],
        );
        let deltas: Vec<f64> = log
            .iter()
            .filter_map(|e| match e {
                GestureEvent::Rotation { delta_degrees, .. } => Some(*delta_degrees),
                _ => None,
            })
            .collect();
        assert_eq!(deltas.len(), 1);
        let expected = 90.0 - 1_f64.atan2(100.0).to_degrees();
        assert!((deltas[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn rotation_deltas_wrap_around() {
        assert!((normalize_delta(350.0) + 10.0).abs() < 1e-12);
        assert!((normalize_delta(-350.0) - 10.0).abs() < 1e-12);
        assert_eq!(normalize_delta(180.0), 180.0);
        assert_eq!(normalize_delta(-180.0), 180.0);
        assert_eq!(normalize_delta(540.0), 180.0);
    }

    fn rotations(log: &[GestureEvent]) -> usize {
        log.iter()
            .filter(|e| matches!(e, GestureEvent::Rotation { .. }))
            .count()
    }

    fn scales(log: &[GestureEvent]) -> usize {
        log.iter()
            .filter(|e| matches!(e, GestureEvent::Scale { .. }))
            .count()
    }

    #[test]
    fn lifting_a_finger_mid_pinch_does_not_jump() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (100.0, 100.0), 0),
                PointerSample::down(1, (300.0, 100.0), 5),
                PointerSample::down(2, (200.0, 300.0), 10),
            ],
        );
        // Twist and spread so both baselines are live.
        r.on_move_batch(
            &[
                PointerSample::moved(0, (100.0, 110.0), 26),
                PointerSample::moved(1, (300.0, 90.0), 26),
                PointerSample::moved(2, (200.0, 300.0), 26),
            ],
            &mut log,
        );
        r.on_move_batch(
            &[
                PointerSample::moved(0, (90.0, 120.0), 42),
                PointerSample::moved(1, (310.0, 80.0), 42),
                PointerSample::moved(2, (200.0, 310.0), 42),
            ],
            &mut log,
        );
        assert!(rotations(&log) > 0, "the twist rotates before the lift");

        // Pointer 0 leaves: the first two pointers are now 1 and 2, whose
        // line points somewhere else entirely.
        r.on_sample(&PointerSample::up(0, (90.0, 120.0), 50), &mut log);
        assert_eq!(r.pointer_count(), 2);
        let before = log.len();
        r.on_move_batch(
            &[
                PointerSample::moved(1, (311.0, 80.0), 66),
                PointerSample::moved(2, (200.0, 311.0), 66),
            ],
            &mut log,
        );
        let after = &log[before..];
        assert_eq!(rotations(after), 0, "no rotation from the new baseline: {after:?}");
        assert_eq!(scales(after), 0, "no scale from the new span: {after:?}");
    }

    #[test]
    fn a_third_finger_landing_does_not_jump() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (100.0, 100.0), 0),
                PointerSample::down(1, (300.0, 100.0), 5),
            ],
        );
        r.on_move_batch(
            &[
                PointerSample::moved(0, (100.0, 110.0), 21),
                PointerSample::moved(1, (300.0, 90.0), 21),
            ],
            &mut log,
        );
        r.on_move_batch(
            &[
                PointerSample::moved(0, (90.0, 120.0), 37),
                PointerSample::moved(1, (310.0, 80.0), 37),
            ],
            &mut log,
        );
        assert!(rotations(&log) > 0, "the twist rotates before the landing");

        // A far-away third finger changes the span a lot.
        r.on_sample(&PointerSample::down(2, (200.0, 600.0), 45), &mut log);
        assert_eq!(r.pointer_count(), 3);
        let before = log.len();
        r.on_move_batch(
            &[
                PointerSample::moved(0, (90.0, 121.0), 61),
                PointerSample::moved(1, (310.0, 81.0), 61),
                PointerSample::moved(2, (200.0, 601.0), 61),
            ],
            &mut log,
        );
        let after = &log[before..];
        assert_eq!(rotations(after), 0, "no rotation from the new baseline: {after:?}");
        assert_eq!(scales(after), 0, "no scale from the new span: {after:?}");
    }

    #[test]
    fn cancel_clears_everything() {
        let mut r = GestureRecognizer::default();
        let mut log = Vec::new();
        feed(
            &mut r,
            &mut log,
            &[
                PointerSample::down(0, (0.0, 0.0), 0),
                PointerSample::down(1, (10.0, 0.0), 5),
                PointerSample::cancel(0, 10),
            ],
        );
        assert_eq!(r.pointer_count(), 0);
        assert_eq!(r.scroll_mode(), ScrollMode::None);
        assert!(!r.is_double_tapping());
    }
}
