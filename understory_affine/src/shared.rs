// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A matrix shared between the interaction thread and a render thread.

extern crate std;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::Affine;

use crate::{AffineTransform, Channel};

/// A lock-guarded matrix that can be cloned into other threads.
///
/// Every accessor takes the lock for exactly one copy of the matrix, so a
/// reader never observes a half-written update and the lock is never held
/// across a gesture or animation step. Clones share the same storage.
///
/// ```rust
/// use kurbo::Affine;
/// use understory_affine::{Channel, SharedMatrix};
///
/// let matrix = SharedMatrix::new(Affine::scale(2.0));
/// let reader = matrix.clone();
/// let handle = std::thread::spawn(move || reader.channel(Channel::ScaleX));
/// matrix.set_channel(Channel::TranslateX, 10.0);
/// let sx = handle.join().unwrap();
/// assert_eq!(sx, 2.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedMatrix {
    inner: Arc<Mutex<Affine>>,
}

impl SharedMatrix {
    /// Creates a shared matrix holding `m`.
    #[must_use]
    pub fn new(m: Affine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(m)),
        }
    }

    /// Returns a copy of the current matrix.
    #[must_use]
    pub fn snapshot(&self) -> Affine {
        *self.lock()
    }

    /// Returns the decomposed form of the current matrix.
    #[must_use]
    pub fn transform(&self) -> AffineTransform {
        AffineTransform::from_affine(self.snapshot())
    }

    /// Returns one channel of the current matrix.
    #[must_use]
    pub fn channel(&self, channel: Channel) -> f64 {
        crate::channel(self.snapshot(), channel)
    }

    /// Replaces the whole matrix.
    pub fn set(&self, m: Affine) {
        *self.lock() = m;
    }

    /// Replaces one channel, keeping the others, in one critical section.
    pub fn set_channel(&self, channel: Channel, value: f64) {
        let mut guard = self.lock();
        *guard = crate::with_channel(*guard, channel, value);
    }

    /// Runs `f` on the matrix under the lock and returns the new value.
    ///
    /// `f` should only do arithmetic; it runs while other threads wait.
    pub fn update(&self, f: impl FnOnce(Affine) -> Affine) -> Affine {
        let mut guard = self.lock();
        *guard = f(*guard);
        *guard
    }

    fn lock(&self) -> MutexGuard<'_, Affine> {
        // The payload is a plain `Affine`; a panic elsewhere cannot leave it torn.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use std::thread;

    #[test]
    fn clones_share_storage() {
        let a = SharedMatrix::new(Affine::IDENTITY);
        let b = a.clone();
        a.set(Affine::translate((3.0, 4.0)));
        assert_eq!(b.snapshot().translation(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn set_channel_is_read_modify_write() {
        let m = SharedMatrix::new(Affine::translate((1.0, 2.0)) * Affine::scale(3.0));
        m.set_channel(Channel::TranslateY, 9.0);
        let t = m.transform();
        assert_eq!((t.tx, t.ty), (1.0, 9.0));
        assert!((t.sx - 3.0).abs() < 1e-12);
    }

    #[test]
    fn readers_never_see_torn_matrices() {
        let m = SharedMatrix::new(Affine::scale(1.0));
        let reader = m.clone();
        let handle = thread::spawn(move || {
            for _ in 0..2_000 {
                let t = reader.transform();
                // Writers only ever store uniform scales.
                assert!((t.sx - t.sy).abs() < 1e-9, "torn read: {t:?}");
            }
        });
        for i in 0..2_000 {
            let s = 1.0 + f64::from(i % 7);
            m.update(|_| Affine::scale(s));
        }
        handle.join().unwrap();
    }
}
