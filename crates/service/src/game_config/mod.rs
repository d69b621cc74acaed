//! Per-game configuration records and the store that owns them.

pub mod model;
pub mod store;

pub use model::{ConfigMap, GameConfig};
pub use store::ConfigStore;
