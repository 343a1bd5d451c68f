//! Tide observation stations around Jeju and nearest-station lookup

use serde::Serialize;

/// Mean Earth radius used by the haversine formula (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A KHOA tide observation station
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObservationSite {
    pub name: &'static str,
    pub code: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl ObservationSite {
    /// Great-circle distance from this station to the given point (km)
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        haversine_distance(self.latitude, self.longitude, latitude, longitude)
    }
}

/// Stations on the Jeju coast, converted from degrees-minutes-seconds
pub static OBSERVATION_SITES: [ObservationSite; 4] = [
    // N 33°28'29" E 126°55'40"
    ObservationSite {
        name: "Seongsan",
        code: "DT_0022",
        latitude: 33.0 + 28.0 / 60.0 + 29.0 / 3600.0,
        longitude: 126.0 + 55.0 / 60.0 + 40.0 / 3600.0,
    },
    // N 33°12'52" E 126°15'04"
    ObservationSite {
        name: "Moseulpo",
        code: "DT_0023",
        latitude: 33.0 + 12.0 / 60.0 + 52.0 / 3600.0,
        longitude: 126.0 + 15.0 / 60.0 + 4.0 / 3600.0,
    },
    // N 33°14'24" E 126°33'42"
    ObservationSite {
        name: "Seogwipo",
        code: "DT_0010",
        latitude: 33.0 + 14.0 / 60.0 + 24.0 / 3600.0,
        longitude: 126.0 + 33.0 / 60.0 + 42.0 / 3600.0,
    },
    // N 33°31'39" E 126°32'35"
    ObservationSite {
        name: "Jeju",
        code: "DT_0004",
        latitude: 33.0 + 31.0 / 60.0 + 39.0 / 3600.0,
        longitude: 126.0 + 32.0 / 60.0 + 35.0 / 3600.0,
    },
];

/// Haversine great-circle distance between two points (km)
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lon1_rad = lon1.to_radians();
    let lat2_rad = lat2.to_radians();
    let lon2_rad = lon2.to_radians();

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from a station to a point (km)
pub fn distance_km(site: &ObservationSite, latitude: f64, longitude: f64) -> f64 {
    site.distance_to(latitude, longitude)
}

/// Find the station closest to the given point.
///
/// Ties go to the station listed first.
pub fn find_nearest_site(latitude: f64, longitude: f64) -> &'static ObservationSite {
    // the registry is non-empty, so the fallback is never taken
    nearest_in(&OBSERVATION_SITES, latitude, longitude).unwrap_or(&OBSERVATION_SITES[0])
}

/// Nearest entry of an arbitrary station list, `None` when empty
pub fn nearest_in(
    sites: &[ObservationSite],
    latitude: f64,
    longitude: f64,
) -> Option<&ObservationSite> {
    let mut iter = sites.iter();
    let mut nearest = iter.next()?;
    let mut best = nearest.distance_to(latitude, longitude);

    for site in iter {
        let distance = site.distance_to(latitude, longitude);
        if distance < best {
            nearest = site;
            best = distance;
        }
    }

    Some(nearest)
}

/// Look up a station by its KHOA code (e.g. `DT_0004`)
pub fn find_site_by_code(code: &str) -> Option<&'static ObservationSite> {
    OBSERVATION_SITES.iter().find(|site| site.code == code)
}
