use std::fmt;

/// Source of "next animation frame" callbacks
///
/// The renderer asks for at most one frame at a time and coalesces every
/// change made before it fires. Whoever owns the scheduler delivers the frame
/// by calling [`Renderer::on_animation_frame`](crate::Renderer::on_animation_frame).
pub trait FrameScheduler: fmt::Debug {
    /// Requests a frame; returns `false` if one is already pending
    fn request_frame(&mut self) -> bool;

    fn cancel_frame(&mut self);

    fn is_pending(&self) -> bool;

    /// Consumes the pending request, returning whether there was one
    fn take_frame(&mut self) -> bool;
}

/// Scheduler driven by the host, e.g. a timer loop or a test
#[derive(Debug, Default)]
pub struct ManualFrameScheduler {
    pending: bool,
    requested: u64,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct frames requested so far
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_frame(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.requested += 1;
        true
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }

    fn is_pending(&self) -> bool {
        self.pending
    }

    fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_coalesce() {
        let mut frames = ManualFrameScheduler::new();
        assert!(frames.request_frame());
        assert!(!frames.request_frame());
        assert_eq!(frames.requested(), 1);

        assert!(frames.take_frame());
        assert!(!frames.take_frame());
        assert!(frames.request_frame());
        frames.cancel_frame();
        assert!(!frames.is_pending());
        assert_eq!(frames.requested(), 2);
    }
}
