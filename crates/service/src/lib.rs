//! Service layer for the game config service.
//! - `game_config`: the file-backed map of per-game configs.
//! - `geo`: caller IP to country/city labels.
//! - `audit`: append-only access log for gated games.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod game_config;
pub mod geo;
pub mod audit;
