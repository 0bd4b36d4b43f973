use std::time::Duration;

/// How long the surface bounding rectangle is trusted before being re-read.
pub const DEFAULT_RECT_CACHE_TTL: Duration = Duration::from_millis(500);

/// Runtime switches for an [`InteractionManager`](super::InteractionManager).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Mark every handled native event as default-prevented.
    pub auto_prevent_default: bool,
    pub rect_cache_ttl: Duration,
    /// Two clicks closer together than this become a double click (window adapter only).
    pub double_click_interval: Duration,
    /// Maximum pointer travel, in logical pixels, between press and release for a click.
    pub click_slop: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            auto_prevent_default: true,
            rect_cache_ttl: DEFAULT_RECT_CACHE_TTL,
            double_click_interval: Duration::from_millis(400),
            click_slop: 4.0,
        }
    }
}
