//! Application configuration and constants
//!
//! Central naming and configuration values used across the workspace.
//! Branding and naming should reference these constants rather than
//! hardcoding strings.

/// The application name
pub const APP_NAME: &str = "Emberbox";

/// The application type/category
pub const APP_TYPE: &str = "music box";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Full application title
pub const fn app_title() -> &'static str {
    APP_NAME
}
