/// One-shot request to save the next presented frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureRequest {
    pending: bool,
}

impl CaptureRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns true exactly once per request.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
