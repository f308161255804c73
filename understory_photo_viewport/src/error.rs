// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use understory_transform_animator::AnimatorError;

/// Why a viewport command could not run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportError {
    /// The view has not been laid out yet.
    NotLaidOut,
    /// Dismissing needs the origin rectangle from `set_init_args`.
    NoInitArgs,
    /// The surface cannot be animated.
    Animator(AnimatorError),
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLaidOut => f.write_str("viewport has not been laid out"),
            Self::NoInitArgs => f.write_str("no dismiss rectangle was set"),
            Self::Animator(err) => write!(f, "cannot animate the image: {err}"),
        }
    }
}

impl core::error::Error for ViewportError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Animator(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AnimatorError> for ViewportError {
    fn from(err: AnimatorError) -> Self {
        Self::Animator(err)
    }
}

#[cfg(test)]
mod tests {
    use core::error::Error;

    use understory_transform_animator::ContentMode;

    use super::*;

    #[test]
    fn animator_errors_convert_and_chain() {
        let err = ViewportError::from(AnimatorError::UnsupportedContentMode(ContentMode::FitCenter));
        assert!(
            matches!(err, ViewportError::Animator(_)),
            "conversion keeps the animator error"
        );
        assert!(err.source().is_some(), "animator errors expose their source");
        assert!(
            ViewportError::NoInitArgs.source().is_none(),
            "plain variants have no source"
        );
    }
}
