use geo::Point;

/// Mean Earth radius used for all AOI distance figures
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two lon/lat points
///
/// `d = 2R·atan2(√a, √(1−a))` with
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let delta_lat = (to.y() - from.y()).to_radians();
    let delta_lon = (to.x() - from.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Squared equirectangular distance in degrees², the cheap proxy used to
/// pre-rank nearest candidates before haversine
///
/// Longitude differences are scaled by `cos(origin latitude)` so a degree east
/// and a degree north weigh what they measure on the ground near the origin.
pub fn equirectangular_distance_sq(origin: Point, other: Point) -> f64 {
    let dx = (other.x() - origin.x()) * origin.y().to_radians().cos();
    let dy = other.y() - origin.y();
    dx * dx + dy * dy
}

/// Meridian arc between the two latitudes in kilometres
///
/// Never exceeds [`haversine_km`] for the same pair of points.
pub fn latitude_gap_km(a: Point, b: Point) -> f64 {
    EARTH_RADIUS_KM * (a.y() - b.y()).abs().to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let origin = Point::new(0.0, 0.0);
        assert_eq!(haversine_km(origin, origin), 0.0);
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let d = haversine_km(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((d - 111.2).abs() < 1.0, "1° at equator should be ~111.2 km, got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let abisko = Point::new(18.83, 68.35);
        let svartberget = Point::new(19.77, 64.25);
        let there = haversine_km(abisko, svartberget);
        let back = haversine_km(svartberget, abisko);
        assert!((there - back).abs() < 1e-9);
        assert!(there > 450.0 && there < 470.0, "got {}", there);
    }

    #[test]
    fn test_equirectangular_scales_longitude() {
        let equator = Point::new(0.0, 0.0);
        assert_eq!(equirectangular_distance_sq(equator, Point::new(3.0, 4.0)), 25.0);

        // At 64°N, 0.9° east is closer on the ground than 0.5° north.
        let north = Point::new(0.0, 64.0);
        let east = equirectangular_distance_sq(north, Point::new(0.9, 64.0));
        let up = equirectangular_distance_sq(north, Point::new(0.0, 64.5));
        assert!(east < up, "east {} should rank before north {}", east, up);
    }

    #[test]
    fn test_latitude_gap_bounds_haversine() {
        let pairs = [
            (Point::new(0.0, 64.0), Point::new(0.9, 64.0)),
            (Point::new(0.0, 64.0), Point::new(0.0, 64.5)),
            (Point::new(18.83, 68.35), Point::new(19.77, 64.25)),
            (Point::new(-170.0, -10.0), Point::new(170.0, 20.0)),
        ];
        for (a, b) in pairs {
            assert!(latitude_gap_km(a, b) <= haversine_km(a, b) + 1e-9);
        }
    }
}
