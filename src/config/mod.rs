// Configuration module
// Public interface for configuration loading

pub mod constants;
mod loader;
pub mod persona;
mod settings;

pub use loader::load_config;
pub use persona::Persona;
pub use settings::Config;
