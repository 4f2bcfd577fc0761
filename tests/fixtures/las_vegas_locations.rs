//! Real Las Vegas / Henderson places for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Each place carries the street
//! address a user would type, so fixture geocoders can resolve it.

use route_optimizer::model::{AddressRecord, Coordinate};

/// A named place with its street address and position.
#[derive(Debug, Clone)]
pub struct Place {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            address,
            lat,
            lng,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

// ============================================================================
// Strip casinos (good start/end points)
// ============================================================================

pub const CASINOS: &[Place] = &[
    Place::new("Wynn Las Vegas", "3131 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1263781, -115.1658180),
    Place::new("MGM Grand", "3799 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1023654, -115.1688720),
    Place::new("Bellagio", "3600 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1126, -115.1767),
    Place::new("Caesars Palace", "3570 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1162, -115.1745),
    Place::new("Longhorn Casino", "5288 Boulder Hwy, Las Vegas, NV 89122", 36.1070664, -115.0591256),
];

// ============================================================================
// Delivery stops spread across the metro area
// ============================================================================

pub const STOPS: &[Place] = &[
    Place::new("Rivas Mexican Grill", "4616 E Charleston Blvd, Las Vegas, NV 89104", 36.1450055, -115.0482587),
    Place::new("Beers and Bets", "1818 Las Vegas Blvd N, Las Vegas, NV 89101", 36.1428945, -115.1573836),
    Place::new("Hard Rock Cafe", "3771 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1041592, -115.1722166),
    Place::new("Brooklyn Bowl", "3545 Las Vegas Blvd S, Las Vegas, NV 89109", 36.1175388, -115.1695094),
    Place::new("Bootlegger Bistro", "7700 Las Vegas Blvd S, Las Vegas, NV 89123", 36.0492047, -115.1715744),
    Place::new("Budget Suites South", "9000 Las Vegas Blvd S, Las Vegas, NV 89123", 36.0366259, -115.1713361),
    Place::new("Green Valley Ranch", "2300 Paseo Verde Pkwy, Henderson, NV 89052", 36.0308, -115.0825),
    Place::new("Sunset Station", "1301 W Sunset Rd, Henderson, NV 89014", 36.0614, -115.0631),
    Place::new("I Love Sushi", "11041 S Eastern Ave, Henderson, NV 89052", 35.9916660, -115.1028343),
    Place::new("Islander's Grill", "1445 W Sunset Rd, Henderson, NV 89014", 36.0335058, -114.9856162),
    Place::new("Pei Wei Town Square", "6599 Las Vegas Blvd S, Las Vegas, NV 89119", 36.0810469, -115.1472694),
    Place::new("Hello Tokyo", "4850 E Tropicana Ave, Las Vegas, NV 89121", 36.1161627, -115.0902096),
    Place::new("Original Lindo Michoacan", "2655 E Desert Inn Rd, Las Vegas, NV 89121", 36.1294005, -115.1135106),
    Place::new("Tomo Sushi", "3025 E Tropicana Ave, Las Vegas, NV 89121", 36.0992464, -115.1142123),
    Place::new("Sushi Twister", "6475 E Lake Mead Blvd, Las Vegas, NV 89156", 36.1007300, -115.0526259),
    Place::new("Coco's Bakery", "3900 Paradise Rd, Las Vegas, NV 89169", 36.1004202, -115.1652380),
    Place::new("Marakesh", "3900 Paradise Rd Ste 12, Las Vegas, NV 89169", 36.1177772, -115.1546882),
    Place::new("Mikos Izakaya", "3929 Spring Mountain Rd, Las Vegas, NV 89102", 36.0429503, -115.1527627),
];

/// Every place that should geocode.
pub fn all_places() -> Vec<Place> {
    let mut all = Vec::with_capacity(CASINOS.len() + STOPS.len());
    all.extend_from_slice(CASINOS);
    all.extend_from_slice(STOPS);
    all
}

/// Address records for `places`, indexed in the given order.
pub fn records(places: &[Place]) -> Vec<AddressRecord> {
    places
        .iter()
        .enumerate()
        .map(|(i, place)| AddressRecord::new(i, place.name, place.address))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_vegas_area() {
        for place in all_places() {
            assert!(place.lat > 35.9 && place.lat < 36.3, "{} lat out of range: {}", place.name, place.lat);
            assert!(place.lng > -115.4 && place.lng < -114.8, "{} lng out of range: {}", place.name, place.lng);
        }
    }

    #[test]
    fn test_addresses_are_unique() {
        let mut addresses: Vec<&str> = all_places().iter().map(|p| p.address).collect();
        addresses.sort_unstable();
        addresses.dedup();
        assert_eq!(addresses.len(), all_places().len());
    }
}
