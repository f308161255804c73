// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

bitflags::bitflags! {
    /// Viewport state bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewportFlags: u16 {
        /// The first layout has happened.
        const LAID_OUT            = 0b0000_0000_0001;
        /// The fitted image is taller than the view.
        const LONG_IMAGE          = 0b0000_0000_0010;
        /// A dismiss animation has started.
        const CLOSING             = 0b0000_0000_0100;
        /// A fling is moving the image.
        const ON_FLING            = 0b0000_0000_1000;
        /// The current touch sequence ended a double tap.
        const DOUBLE_TAPPING      = 0b0000_0001_0000;
        /// A per-axis recentering animation is running.
        const FIT_XY_UPDATING     = 0b0000_0010_0000;
        /// The next single-finger scroll starts a new drag.
        const NEW_SCROLL          = 0b0000_0100_0000;
        /// The current drag is shrinking the image.
        const SCROLL_SHRINKING    = 0b0000_1000_0000;
        /// The next pinch is the first of the touch sequence.
        const NEW_SCALE           = 0b0001_0000_0000;
        /// The first pinch of the sequence zoomed out; rotation is allowed.
        const FIRST_SCALE_ZOOM_OUT = 0b0010_0000_0000;
        /// The dismiss callback has fired.
        const DISMISSED           = 0b0100_0000_0000;
    }
}

impl Default for ViewportFlags {
    fn default() -> Self {
        Self::NEW_SCROLL | Self::NEW_SCALE | Self::FIRST_SCALE_ZOOM_OUT
    }
}
