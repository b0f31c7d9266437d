/// Hook the conversation calls after every transcript mutation so the view can
/// bring the newest entry into sight.
pub trait ScrollController: Send + Sync {
    fn scroll_to_latest(&self);
}

/// For front ends without a scrollable viewport.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScroll;

impl ScrollController for NoopScroll {
    fn scroll_to_latest(&self) {}
}
