pub mod analysis;
pub mod args;
pub mod commands;
mod config;
pub mod delivery;
mod error;
pub mod history;
pub mod model;
pub mod source;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::Error;
pub use error::Result;
