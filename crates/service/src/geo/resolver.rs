use std::{net::IpAddr, sync::Arc};

use tracing::debug;

use crate::errors::ServiceError;

/// Country label returned for loopback callers.
pub const LOCAL_COUNTRY: &str = "本地";
/// City label returned for loopback callers.
pub const LOCAL_CITY: &str = "localhost";

const LOOPBACK: &str = "127.0.0.1";

/// Raw database answer; either name may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Trait abstraction for the IP location database.
/// Implementations must be safe for concurrent reads.
pub trait GeoLookup: Send + Sync {
    fn locate(&self, ip: IpAddr) -> Result<GeoLocation, ServiceError>;
}

/// Labels written to the audit log. Missing names are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoLabels {
    pub country: String,
    pub city: String,
}

#[derive(Clone)]
pub struct GeoResolver {
    lookup: Arc<dyn GeoLookup>,
}

impl GeoResolver {
    pub fn new(lookup: Arc<dyn GeoLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve an IP string to country and city labels.
    pub fn resolve(&self, ip: &str) -> Result<GeoLabels, ServiceError> {
        if ip == LOOPBACK {
            return Ok(GeoLabels { country: LOCAL_COUNTRY.to_string(), city: LOCAL_CITY.to_string() });
        }
        let addr: IpAddr = ip
            .parse()
            .map_err(|_| ServiceError::InvalidAddress(ip.to_string()))?;
        let location = self.lookup.locate(addr)?;
        debug!(%ip, country = ?location.country, city = ?location.city, "ip resolved");
        Ok(GeoLabels {
            country: location.country.unwrap_or_default(),
            city: location.city.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed {
        answer: Option<GeoLocation>,
        calls: AtomicUsize,
    }

    impl GeoLookup for Fixed {
        fn locate(&self, ip: IpAddr) -> Result<GeoLocation, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .ok_or_else(|| ServiceError::Resolution(format!("{} not in database", ip)))
        }
    }

    fn resolver(answer: Option<GeoLocation>) -> (Arc<Fixed>, GeoResolver) {
        let lookup = Arc::new(Fixed { answer, calls: AtomicUsize::new(0) });
        (lookup.clone(), GeoResolver::new(lookup))
    }

    #[test]
    fn loopback_skips_database() {
        let (lookup, r) = resolver(None);
        let labels = r.resolve("127.0.0.1").unwrap();
        assert_eq!(labels, GeoLabels { country: "本地".into(), city: "localhost".into() });
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn names_come_from_database() {
        let (lookup, r) = resolver(Some(GeoLocation {
            country: Some("日本".into()),
            city: Some("Tokyo".into()),
        }));
        let labels = r.resolve("203.0.113.7").unwrap();
        assert_eq!(labels.country, "日本");
        assert_eq!(labels.city, "Tokyo");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_names_become_empty() {
        let (_, r) = resolver(Some(GeoLocation { country: Some("美国".into()), city: None }));
        let labels = r.resolve("2001:db8::1").unwrap();
        assert_eq!(labels.country, "美国");
        assert_eq!(labels.city, "");
    }

    #[test]
    fn lookup_failure_is_returned() {
        let (_, r) = resolver(None);
        assert!(matches!(r.resolve("198.51.100.1"), Err(ServiceError::Resolution(_))));
    }

    #[test]
    fn unparseable_ip_is_rejected_before_lookup() {
        let (lookup, r) = resolver(None);
        assert!(matches!(r.resolve("not-an-ip"), Err(ServiceError::InvalidAddress(_))));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }
}
