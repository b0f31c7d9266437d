/// Transient per-session flags. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStatus {
    pending: bool,
    last_error: Option<String>,
}

impl SessionStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Idle -> Pending. Clears the previous error.
    pub fn start_request(&mut self) {
        self.pending = true;
        self.last_error = None;
    }

    /// Pending -> Idle after a successful response.
    pub fn finish(&mut self) {
        self.pending = false;
    }

    /// Pending -> Idle after a failed response.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.pending = false;
        self.last_error = Some(message.into());
    }
}
