//! Geographic zones grouping retailers for aggregation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Location;

/// A geographic zone: retailers inside it share offers and aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub center: Location,
    pub radius_km: f64,
    pub retailer_count: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Great-circle distance between two points in kilometres (haversine)
pub fn haversine_distance_km(a: Location, b: Location) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let p = Location::new(28.6139, 77.2090);
        assert!(haversine_distance_km(p, p) < 1e-9);
    }

    #[test]
    fn delhi_to_gurgaon_is_about_26_km() {
        let delhi = Location::new(28.6139, 77.2090);
        let gurgaon = Location::new(28.4595, 77.0266);
        let d = haversine_distance_km(delhi, gurgaon);
        assert!(d > 20.0 && d < 35.0, "got {}", d);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Location::new(19.0760, 72.8777);
        let b = Location::new(18.5204, 73.8567);
        let ab = haversine_distance_km(a, b);
        let ba = haversine_distance_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }
}
