//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores so services persisting small maps as
//! JSON share one locking and write path.

pub mod json_map_store;
