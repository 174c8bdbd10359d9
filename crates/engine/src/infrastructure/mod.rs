//! Infrastructure layer - configuration loaded from outside the process.

pub mod app_settings;

pub use app_settings::InterpreterSettings;
