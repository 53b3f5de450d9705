//! Device and file capture sources.
//!
//! Real decoding hardware is a black box to this crate. What lives here is
//! the capture-side half of the source contract: a `stub://` backend that
//! synthesizes a moving gradient (always opens, used by tests and demos),
//! and an unavailable backend for device indices and file paths no compiled
//! decoder can serve. Unopened captures still satisfy `FrameSource`; their
//! reads fail in-band and the factory's fallback step takes over.

use crate::frame::Frame;
use crate::source::FrameSource;
use crate::FrameSize;

pub struct CaptureSource {
    backend: CaptureBackend,
    target: String,
}

enum CaptureBackend {
    Stub(StubCapture),
    Unavailable,
}

impl CaptureSource {
    /// Open a capture device by index. No device decoder is compiled into
    /// this crate, so the result reports unopened and the factory falls
    /// back.
    pub fn open_device(index: u32) -> Self {
        log::debug!("no capture backend available for device {index}");
        Self {
            backend: CaptureBackend::Unavailable,
            target: format!("device {index}"),
        }
    }

    /// Open a capture from a path. `stub://` paths get the synthetic
    /// backend; anything else reports unopened.
    pub fn open_path(path: &str) -> Self {
        if path.starts_with("stub://") {
            Self {
                backend: CaptureBackend::Stub(StubCapture::new(FrameSize::default())),
                target: path.to_string(),
            }
        } else {
            log::debug!("no capture backend available for {path}");
            Self {
                backend: CaptureBackend::Unavailable,
                target: path.to_string(),
            }
        }
    }

    /// A placeholder source that never opens, for resolution chains where
    /// every attempt failed outright.
    pub fn unavailable(target: &str) -> Self {
        Self {
            backend: CaptureBackend::Unavailable,
            target: target.to_string(),
        }
    }

    /// Best-effort size request, as on a real capture device. The stub
    /// honors it; an unavailable backend ignores it.
    pub fn request_size(&mut self, size: FrameSize) {
        match &mut self.backend {
            CaptureBackend::Stub(stub) => stub.frame_size = size,
            CaptureBackend::Unavailable => {
                log::debug!("size request ignored for unopened capture {}", self.target);
            }
        }
    }

}

impl FrameSource for CaptureSource {
    fn read(&mut self) -> (bool, Frame) {
        match &mut self.backend {
            CaptureBackend::Stub(stub) => (true, stub.next_frame()),
            CaptureBackend::Unavailable => {
                log::debug!("read on unopened capture {}", self.target);
                (false, Frame::empty())
            }
        }
    }

    fn is_opened(&self) -> bool {
        matches!(self.backend, CaptureBackend::Stub(_))
    }
}

/// Synthetic capture backend: a gradient that scrolls one step per frame.
struct StubCapture {
    frame_size: FrameSize,
    frame_count: u64,
}

impl StubCapture {
    fn new(frame_size: FrameSize) -> Self {
        Self {
            frame_size,
            frame_count: 0,
        }
    }

    fn next_frame(&mut self) -> Frame {
        self.frame_count += 1;
        let len = self.frame_size.width as usize * self.frame_size.height as usize * 3;
        let mut pixels = vec![0u8; len];
        for (i, byte) in pixels.iter_mut().enumerate() {
            *byte = ((i as u64 + self.frame_count) % 256) as u8;
        }
        Frame::from_raw(pixels, self.frame_size)
            .unwrap_or_else(|_| Frame::zeros(self.frame_size))
    }
}
