use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Show analytics fallbacks while developing
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

/// Element the app is rendered into.
pub const APP_ELEMENT_ID: &str = "app";

/// Page anchor the scheduling widget is portalled into.
pub const MODAL_ROOT_ID: &str = "root";

pub const DEMO_REPORT_ID: &str = "demo-123";

pub const SCHEDULING_URL: &str = "https://calendly.com/revenue-diagnostic/strategy-call";

pub const TOAST_DISMISS_MS: u32 = 5_000;

// Mock persistence latency
pub const SAVE_BRIEF_DELAY_MS: u32 = 600;

pub const MOCK_BRIEF_ID: &str = "brief-placeholder-id";

pub mod scroll {
    pub const DURATION_SECS: f64 = 1.2;
    pub const TOP_DURATION_SECS: f64 = 1.5;
    pub const TOUCH_MULTIPLIER: f64 = 2.0;
    pub const WHEEL_MULTIPLIER: f64 = 1.0;
    /// Fraction of the viewport after which the nav turns solid.
    pub const NAV_SOLID_THRESHOLD: f64 = 0.15;
    pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
}
