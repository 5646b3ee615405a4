// Canopy Assist - branded Q&A relay
// Library exports

pub mod cli;
pub mod client;
pub mod config;
pub mod conversation;
pub mod prompt;
pub mod providers;
pub mod relay;
pub mod server;
