//! Ray-casting point-in-polygon.
//!
//! Points lying exactly on a boundary edge may resolve either way; that is the
//! usual ray-casting ambiguity and is not special-cased.

use aoi_core::models::{Geometry, Position};
use geo::Point;

/// Ray-casting containment of `point` in a single ring
///
/// The ring may or may not repeat its first vertex at the end. Rings with
/// fewer than three vertices contain nothing.
pub fn point_in_ring(point: Point, ring: &[Position]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (point.x(), point.y());
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];

        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Whether a geometry contains `point`
///
/// Only outer rings are tested: a point inside a hole still counts as
/// contained, and a MultiPolygon contains the point when any of its polygons
/// does. A Point geometry contains only an identical point.
pub fn contains_point(geometry: &Geometry, point: Point) -> bool {
    match geometry {
        Geometry::Point { coordinates: [lon, lat] } => *lon == point.x() && *lat == point.y(),
        _ => geometry.outer_rings().into_iter().any(|ring| point_in_ring(point, ring)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle_ring() -> Vec<Position> {
        vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0], [0.0, 0.0]]
    }

    #[test]
    fn test_inside_and_outside() {
        let ring = rectangle_ring();
        assert!(point_in_ring(Point::new(2.0, 1.5), &ring));
        assert!(!point_in_ring(Point::new(5.0, 5.0), &ring));
        assert!(!point_in_ring(Point::new(-0.1, 1.5), &ring));
    }

    #[test]
    fn test_open_ring_behaves_like_closed_ring() {
        let open = vec![[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]];
        assert!(point_in_ring(Point::new(2.0, 1.5), &open));
        assert!(!point_in_ring(Point::new(4.5, 1.5), &open));
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upwards
        let ring = vec![
            [0.0, 0.0],
            [3.0, 0.0],
            [3.0, 3.0],
            [2.0, 3.0],
            [2.0, 1.0],
            [1.0, 1.0],
            [1.0, 3.0],
            [0.0, 3.0],
            [0.0, 0.0],
        ];
        assert!(point_in_ring(Point::new(0.5, 2.5), &ring));
        assert!(point_in_ring(Point::new(2.5, 2.5), &ring));
        assert!(!point_in_ring(Point::new(1.5, 2.5), &ring));
    }

    #[test]
    fn test_degenerate_ring_contains_nothing() {
        assert!(!point_in_ring(Point::new(0.0, 0.0), &[]));
        assert!(!point_in_ring(Point::new(0.5, 0.0), &[[0.0, 0.0], [1.0, 0.0]]));
    }

    #[test]
    fn test_holes_are_not_subtracted() {
        let geometry = Geometry::polygon(vec![
            rectangle_ring(),
            vec![[1.0, 1.0], [3.0, 1.0], [3.0, 2.0], [1.0, 2.0], [1.0, 1.0]],
        ]);
        assert!(contains_point(&geometry, Point::new(2.0, 1.5)));
    }

    #[test]
    fn test_multipolygon_any_part() {
        let geometry = Geometry::multi_polygon(vec![
            vec![rectangle_ring()],
            vec![vec![[10.0, 10.0], [12.0, 10.0], [12.0, 12.0], [10.0, 12.0], [10.0, 10.0]]],
        ]);
        assert!(contains_point(&geometry, Point::new(11.0, 11.0)));
        assert!(contains_point(&geometry, Point::new(1.0, 1.0)));
        assert!(!contains_point(&geometry, Point::new(7.0, 7.0)));
    }

    #[test]
    fn test_point_geometry_contains_only_itself() {
        let geometry = Geometry::point(19.775, 64.255);
        assert!(contains_point(&geometry, Point::new(19.775, 64.255)));
        assert!(!contains_point(&geometry, Point::new(19.775, 64.2551)));
    }
}
