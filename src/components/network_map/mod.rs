mod component;
pub mod config;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod layout;
pub mod model;
mod render;
pub mod state;
pub mod tick;
pub mod types;
pub mod viewport;

#[cfg(test)]
mod fixtures;

pub use component::NetworkMap;
pub use config::MapConfig;
pub use error::SnapshotError;
pub use types::NetworkGraph;
