//! 大圆距离。

use domain::LatLng;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine 距离（千米），保留两位小数。
pub fn haversine_km(from: LatLng, to: LatLng) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    round2(EARTH_RADIUS_KM * c)
}

/// 坐标无效时返回 None，不会 panic。
pub fn distance_km(from: LatLng, to: LatLng) -> Option<f64> {
    if !from.is_valid() || !to.is_valid() {
        return None;
    }
    Some(haversine_km(from, to))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let seoul = LatLng::new(37.5665, 126.9780);
        assert_eq!(haversine_km(seoul, seoul), 0.0);
    }

    #[test]
    fn symmetric_and_non_negative() {
        let pairs = [
            (LatLng::new(37.5665, 126.9780), LatLng::new(35.1796, 129.0756)),
            (LatLng::new(-33.8688, 151.2093), LatLng::new(51.5074, -0.1278)),
            (LatLng::new(0.0, 179.9), LatLng::new(0.0, -179.9)),
            (LatLng::new(90.0, 0.0), LatLng::new(-90.0, 0.0)),
        ];
        for (a, b) in pairs {
            let forward = haversine_km(a, b);
            assert!(forward >= 0.0);
            assert_eq!(forward, haversine_km(b, a));
        }
    }

    #[test]
    fn seoul_to_busan_is_about_325_km() {
        let seoul = LatLng::new(37.5665, 126.9780);
        let busan = LatLng::new(35.1796, 129.0756);
        let km = haversine_km(seoul, busan);
        assert!((320.0..330.0).contains(&km), "got {km}");
        assert_eq!(km, (km * 100.0).round() / 100.0);
    }

    #[test]
    fn invalid_coordinates_yield_none() {
        let valid = LatLng::new(37.0, 127.0);
        assert_eq!(distance_km(valid, LatLng::new(f64::NAN, 127.0)), None);
        assert_eq!(distance_km(LatLng::new(91.0, 0.0), valid), None);
        assert_eq!(distance_km(valid, valid), Some(0.0));
    }
}
