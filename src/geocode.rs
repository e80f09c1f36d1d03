use log::warn;

use crate::error::TaskError;

/// One structured address returned by a reverse geocoding provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressCandidate {
    pub street: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

/// Reverse geocoding provider.
pub trait Geocoder {
    fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Vec<AddressCandidate>, TaskError>;
}

/// Used when no provider is configured; every lookup comes back empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Result<Vec<AddressCandidate>, TaskError> {
        Ok(Vec::new())
    }
}

/// Joins a candidate as `street name, city, region, country`, trimmed.
pub fn format_candidate(c: &AddressCandidate) -> String {
    let part = |p: &Option<String>| p.clone().unwrap_or_default();
    format!(
        "{} {}, {}, {}, {}",
        part(&c.street),
        part(&c.name),
        part(&c.city),
        part(&c.region),
        part(&c.country)
    )
    .trim()
    .to_string()
}

pub fn coordinate_fallback(lat: f64, lng: f64) -> String {
    format!("Lat: {lat}, Lng: {lng}")
}

/// Location text for a picked coordinate.
///
/// Uses the first candidate, or the raw coordinates if the provider returns
/// nothing or fails.
pub fn resolve_location<G: Geocoder + ?Sized>(geocoder: &G, lat: f64, lng: f64) -> String {
    match geocoder.reverse_geocode(lat, lng) {
        Ok(candidates) => match candidates.first() {
            Some(c) => format_candidate(c),
            None => coordinate_fallback(lat, lng),
        },
        Err(e) => {
            warn!("geocode::resolve_location: falling back to coordinates: {}", e);
            coordinate_fallback(lat, lng)
        }
    }
}
