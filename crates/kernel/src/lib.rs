//! Shared configuration for the shelf workspace.

pub mod settings;

pub use settings::{DatabaseSettings, Environment, LogFormat, Settings, TelemetrySettings};
