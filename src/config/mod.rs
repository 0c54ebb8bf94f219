// src/config/mod.rs
pub mod consts;
pub mod profile;
pub mod settings;

pub use profile::Profile;
pub use settings::AppConfig;
