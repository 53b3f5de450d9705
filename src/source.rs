//! The frame-source capability.
//!
//! This is the only contract consumers depend on. It mirrors the classic
//! capture interface: `read` pulls the next frame and reports success
//! in-band, `is_opened` says whether the source ever became usable. A source
//! that failed to open still implements the trait; its `read` returns
//! `(false, Frame::empty())` and the caller is expected to have checked
//! `is_opened` after resolution.

use crate::frame::Frame;

pub trait FrameSource {
    /// Pull the next frame. Synthetic sources always succeed; real captures
    /// pass device failures through as `ok = false`.
    fn read(&mut self) -> (bool, Frame);

    /// Whether the source opened successfully. Procedural sources cannot
    /// fail to open and always return true.
    fn is_opened(&self) -> bool;
}

/// Owned, dynamically dispatched source, as returned by the factory.
pub type BoxedSource = Box<dyn FrameSource>;

impl FrameSource for BoxedSource {
    fn read(&mut self) -> (bool, Frame) {
        (**self).read()
    }

    fn is_opened(&self) -> bool {
        (**self).is_opened()
    }
}
