/*
 *  cities.rs
 *
 *  travelboard - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Travel city catalog
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use serde::{Deserialize, Serialize};

/// One entry of the travel catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRef {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CityRef {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self { name: name.into(), latitude, longitude }
    }

    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

const DEFAULT_CITIES: [(&str, f64, f64); 24] = [
    ("Atlanta", 33.749, -84.388),
    ("Boston", 42.3584, -71.0598),
    ("Chicago", 41.9796, -87.9045),
    ("Cleveland", 41.4995, -81.6954),
    ("Dallas", 32.8959, -97.0372),
    ("Denver", 39.7391, -104.9847),
    ("Detroit", 42.3314, -83.0457),
    ("Hartford", 41.7637, -72.6851),
    ("Houston", 29.7633, -95.3633),
    ("Indianapolis", 39.7684, -86.158),
    ("Los Angeles", 34.0522, -118.2437),
    ("Miami", 25.7743, -80.1937),
    ("Minneapolis", 44.98, -93.2638),
    ("New York", 40.7142, -74.0059),
    ("Norfolk", 36.8468, -76.2852),
    ("Orlando", 28.5383, -81.3792),
    ("Philadelphia", 39.9523, -75.1638),
    ("Pittsburgh", 40.4406, -79.9959),
    ("St. Louis", 38.6273, -90.1979),
    ("San Francisco", 37.7749, -122.4194),
    ("Seattle", 47.6062, -122.3321),
    ("Syracuse", 43.0481, -76.1474),
    ("Tampa", 27.9475, -82.4584),
    ("Washington DC", 38.8951, -77.0364),
];

/// The classic travel board line-up.
pub fn default_catalog() -> Vec<CityRef> {
    DEFAULT_CITIES
        .iter()
        .map(|(name, lat, lon)| CityRef::new(*name, *lat, *lon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_usable() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 24);
        assert!(catalog.iter().all(|c| c.has_valid_coordinates() && !c.name.is_empty()));
        assert_eq!(catalog[0].name, "Atlanta");
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(!CityRef::new("Nowhere", 91.0, 0.0).has_valid_coordinates());
        assert!(!CityRef::new("Nowhere", 0.0, -181.0).has_valid_coordinates());
    }
}
