use crate::types::poll_window::PollWindow;
use crate::vendors::VendorStrategy;
use chrono::Duration;
use log::info;

/// WeatherLink rejects requests spanning more than 24 hours.
#[derive(Debug, Clone, Copy)]
pub struct DavisStrategy {
    pub max_span: Duration,
}

impl Default for DavisStrategy {
    fn default() -> Self {
        Self {
            max_span: Duration::hours(24),
        }
    }
}

impl VendorStrategy for DavisStrategy {
    fn clamp(&self, window: PollWindow) -> PollWindow {
        let clamped = window.clamped_to(self.max_span);
        if clamped != window {
            info!(
                "Clamping davis window start from {} to {}",
                window.start, clamped.start
            );
        }
        clamped
    }
}
