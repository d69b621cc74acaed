use std::{net::IpAddr, path::Path};

use maxminddb::{geoip2, Reader};
use tracing::info;

use crate::errors::ServiceError;
use crate::geo::resolver::{GeoLocation, GeoLookup};

/// Locale used for country names.
pub const COUNTRY_LOCALE: &str = "zh-CN";
/// Locale used for city names.
pub const CITY_LOCALE: &str = "en";

/// GeoLite2-City reader. Read-only after open, shared without locking.
pub struct MaxmindLookup {
    reader: Reader<Vec<u8>>,
}

impl MaxmindLookup {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path)
            .map_err(|e| ServiceError::Io(format!("{}: {}", path.display(), e)))?;
        info!(
            path = %path.display(),
            database_type = %reader.metadata.database_type,
            build_epoch = reader.metadata.build_epoch,
            "geoip database opened"
        );
        Ok(Self { reader })
    }
}

impl GeoLookup for MaxmindLookup {
    fn locate(&self, ip: IpAddr) -> Result<GeoLocation, ServiceError> {
        let record: geoip2::City = self
            .reader
            .lookup(ip)
            .map_err(|e| ServiceError::Resolution(format!("{}: {}", ip, e)))?;

        let country = record
            .country
            .and_then(|c| c.names)
            .and_then(|names| names.get(COUNTRY_LOCALE).map(|s| s.to_string()));
        let city = record
            .city
            .and_then(|c| c.names)
            .and_then(|names| names.get(CITY_LOCALE).map(|s| s.to_string()));

        Ok(GeoLocation { country, city })
    }
}
