pub mod binder;
pub mod configuration;
pub mod domain;
pub mod errors;
pub mod source;
pub mod startup;
pub mod telemetry;
pub mod view;
