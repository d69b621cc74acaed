//! IP to country/city resolution backed by a local MaxMind database.

pub mod maxmind;
pub mod resolver;

pub use maxmind::MaxmindLookup;
pub use resolver::{GeoLabels, GeoLocation, GeoLookup, GeoResolver};
