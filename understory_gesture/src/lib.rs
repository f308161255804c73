// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_gesture --heading-base-level=0

//! Understory Gesture: touch gesture recognition for image viewers.
//!
//! [`GestureRecognizer`] consumes ordered [`PointerSample`]s and reports
//! gestures to a [`GestureListener`]:
//!
//! - action down / action up for the first and last contact,
//! - double tap (the second tap's down, moves and up),
//! - single-finger and multi-finger scroll, with a short debounce window in
//!   which a one-finger drag can still become a two-finger one,
//! - pinch scale as the incremental span ratio,
//! - rotation of the line through the first two contacts,
//! - fling, from an impulse-based [`VelocityTracker`].
//!
//! Thresholds live in [`TouchConfig`]. With the `ui_events_adapter` feature,
//! [`UiEventsAdapter`] converts `ui-events` pointer streams into samples.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_gesture::{GestureEvent, GestureRecognizer, PointerSample};
//!
//! let mut recognizer = GestureRecognizer::default();
//! let mut log = Vec::new();
//!
//! // First tap.
//! recognizer.on_sample(&PointerSample::down(0, (200.0, 300.0), 1_000), &mut log);
//! recognizer.on_sample(&PointerSample::up(0, (200.0, 300.0), 1_060), &mut log);
//! // Second tap 120 ms later, 10 px away.
//! recognizer.on_sample(&PointerSample::down(0, (210.0, 300.0), 1_180), &mut log);
//! assert!(recognizer.is_double_tapping());
//! recognizer.on_sample(&PointerSample::up(0, (210.0, 300.0), 1_240), &mut log);
//!
//! let taps = log.iter().filter(|e| matches!(e, GestureEvent::DoubleTapEvent(_))).count();
//! assert_eq!(taps, 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod events;
mod recognizer;
mod sample;
#[cfg(feature = "ui_events_adapter")]
mod ui_events_adapter;
mod velocity;

pub use config::TouchConfig;
pub use events::GestureEvent;
pub use recognizer::{GestureListener, GestureRecognizer, ScrollMode};
pub use sample::{PointerId, PointerPhase, PointerSample};
#[cfg(feature = "ui_events_adapter")]
pub use ui_events_adapter::UiEventsAdapter;
pub use velocity::{ASSUME_STOPPED_MS, VelocityTracker, VelocityTracker1D};
