//! Frame-coalesced connection updates
//!
//! Mutations only mark state dirty and request a frame; the rendering driver
//! calls the flush once per animation frame. Requests made while a frame is
//! already pending collapse into that frame.

/// What a flushed frame must do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePlan {
    /// Recompute which connections exist before laying them out
    pub rebuild_membership: bool,
}

/// Two-phase (mark, flush) scheduler state
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    membership_dirty: bool,
    frame_pending: bool,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    /// Starts with membership dirty so the first frame builds the set
    pub fn new() -> Self {
        FrameScheduler {
            membership_dirty: true,
            frame_pending: false,
        }
    }

    pub fn mark_membership_dirty(&mut self) {
        self.membership_dirty = true;
    }

    /// Returns true if this call scheduled a new frame
    pub fn request_frame(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Structural change: dirty membership and make sure a frame is coming
    pub fn invalidate(&mut self) -> bool {
        self.mark_membership_dirty();
        self.request_frame()
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn is_membership_dirty(&self) -> bool {
        self.membership_dirty
    }

    /// Consume the pending frame, if any
    pub fn begin_frame(&mut self) -> Option<FramePlan> {
        if !self.frame_pending {
            return None;
        }
        self.frame_pending = false;
        let rebuild_membership = std::mem::take(&mut self.membership_dirty);
        Some(FramePlan { rebuild_membership })
    }

    /// Clear the membership flag after a synchronous rebuild
    pub fn membership_synced(&mut self) {
        self.membership_dirty = false;
    }
}
