use geo::{Distance, Haversine, Point};

/// great-circle distance in meters between two survey coordinates.
pub fn haversine_meters(a: &Point<f64>, b: &Point<f64>) -> f64 {
    Haversine.distance(*a, *b)
}

/// survey geocoding occasionally emits NaN or infinite coordinates;
/// these must be screened before any distance comparison.
pub fn is_finite_point(p: &Point<f64>) -> bool {
    p.x().is_finite() && p.y().is_finite()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_haversine_zero_for_identical_points() {
        let p = Point::new(-122.4194, 37.7749);
        assert_eq!(haversine_meters(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_small_offset_is_meters_scale() {
        // ~0.001 degrees of latitude is roughly 111 meters
        let a = Point::new(-122.4194, 37.7749);
        let b = Point::new(-122.4194, 37.7759);
        let d = haversine_meters(&a, &b);
        assert!(d > 100.0 && d < 125.0, "unexpected distance: {d}");
    }

    #[test]
    fn test_non_finite_point_detected() {
        assert!(!is_finite_point(&Point::new(f64::NAN, 37.0)));
        assert!(!is_finite_point(&Point::new(-122.0, f64::INFINITY)));
        assert!(is_finite_point(&Point::new(-122.0, 37.0)));
    }
}
