/// Renderer configuration and validation-layer settings

use crate::error::{Error, Result};
use crate::graphics_device::PresentMode;

/// Largest accepted frames-in-flight bound
pub const MAX_FRAMES_IN_FLIGHT_LIMIT: usize = 3;

/// Which validation messages are displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSeverity {
    ErrorsOnly,
    ErrorsAndWarnings,
    All,
}

/// Where validation messages are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugOutput {
    Console,
    File(String),
    Both(String),
}

/// Validation message categories to display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMessageFilter {
    pub show_general: bool,
    pub show_validation: bool,
    pub show_performance: bool,
}

impl Default for DebugMessageFilter {
    fn default() -> Self {
        Self {
            show_general: true,
            show_validation: true,
            show_performance: true,
        }
    }
}

/// Validation message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name (reported to the driver)
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
    /// Enable validation/debug layers
    pub enable_validation: bool,
    /// Validation message severity filter
    pub debug_severity: DebugSeverity,
    /// Validation message output
    pub debug_output: DebugOutput,
    /// Validation message category filter
    pub debug_message_filter: DebugMessageFilter,
    /// Panic on the first validation error
    pub panic_on_error: bool,
    /// Abort on the first validation error (debugger attachment)
    pub break_on_validation_error: bool,
    /// Count validation messages
    pub enable_validation_stats: bool,
    /// Upper bound for frames in flight (1..=3); the swapchain may lower it
    pub max_frames_in_flight: usize,
    /// Preferred presentation mode
    pub present_mode: PresentMode,
    /// Color the swapchain render pass clears to
    pub clear_color: [f32; 4],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "LVE Application".to_string(),
            app_version: (1, 0, 0),
            enable_validation: cfg!(debug_assertions),
            debug_severity: DebugSeverity::ErrorsAndWarnings,
            debug_output: DebugOutput::Console,
            debug_message_filter: DebugMessageFilter::default(),
            panic_on_error: false,
            break_on_validation_error: false,
            enable_validation_stats: false,
            max_frames_in_flight: 2,
            present_mode: PresentMode::Mailbox,
            clear_color: [0.01, 0.01, 0.01, 1.0],
        }
    }
}

impl Config {
    /// Reject values the renderer cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.max_frames_in_flight == 0 || self.max_frames_in_flight > MAX_FRAMES_IN_FLIGHT_LIMIT {
            return Err(Error::InvalidConfig(format!(
                "max_frames_in_flight must be in 1..={}, got {}",
                MAX_FRAMES_IN_FLIGHT_LIMIT, self.max_frames_in_flight
            )));
        }
        if self.clear_color.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "clear_color must be finite, got {:?}",
                self.clear_color
            )));
        }
        if self.panic_on_error && self.break_on_validation_error {
            return Err(Error::InvalidConfig(
                "panic_on_error and break_on_validation_error are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
