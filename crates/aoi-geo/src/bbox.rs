use aoi_core::models::Geometry;
use geo::{coord, Point, Rect};

/// Axis-aligned bounding box in degrees, `[minLon, minLat, maxLon, maxLat]`
///
/// A thin wrapper around `geo::Rect`. Construction normalizes the corner
/// order, so callers that must reject inverted input check it beforehand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    rect: Rect,
}

impl BoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            rect: Rect::new(coord! { x: min_lon, y: min_lat }, coord! { x: max_lon, y: max_lat }),
        }
    }

    /// Box of zero extent around a single position
    pub fn degenerate(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, lon, lat)
    }

    pub fn min_lon(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_lon(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon(), self.min_lat(), self.max_lon(), self.max_lat()]
    }

    /// Midpoint of the box
    ///
    /// This is what the system calls the AOI centroid. It is deliberately not
    /// the area-weighted centroid; stored centroids were computed this way.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_lon() + self.max_lon()) / 2.0,
            (self.min_lat() + self.max_lat()) / 2.0,
        )
    }

    /// Grow the box by `margin` degrees on every side
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.min_lon() - margin,
            self.min_lat() - margin,
            self.max_lon() + margin,
            self.max_lat() + margin,
        )
    }

    /// Inclusive point-in-box test
    pub fn contains_point(&self, point: Point) -> bool {
        point.x() >= self.min_lon()
            && point.x() <= self.max_lon()
            && point.y() >= self.min_lat()
            && point.y() <= self.max_lat()
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        overlaps(self, other)
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self { rect }
    }
}

impl From<BoundingBox> for Rect {
    fn from(bbox: BoundingBox) -> Self {
        bbox.rect
    }
}

/// Bounding box of a geometry
///
/// Folds a running min/max over the outer ring of every polygon; holes never
/// widen the box. A Point gives a degenerate box. Returns `None` when the
/// geometry has no coordinates at all.
pub fn compute_bbox(geometry: &Geometry) -> Option<BoundingBox> {
    if let Geometry::Point { coordinates: [lon, lat] } = geometry {
        return Some(BoundingBox::degenerate(*lon, *lat));
    }

    let mut positions = geometry.outer_rings().into_iter().flatten();
    let [first_lon, first_lat] = *positions.next()?;

    let (min_lon, min_lat, max_lon, max_lat) = positions.fold(
        (first_lon, first_lat, first_lon, first_lat),
        |(min_lon, min_lat, max_lon, max_lat), [lon, lat]| {
            (min_lon.min(*lon), min_lat.min(*lat), max_lon.max(*lon), max_lat.max(*lat))
        },
    );

    Some(BoundingBox::new(min_lon, min_lat, max_lon, max_lat))
}

/// Whether two boxes overlap. Touching edges count as overlap.
pub fn overlaps(a: &BoundingBox, b: &BoundingBox) -> bool {
    !(a.max_lon() < b.min_lon()
        || a.min_lon() > b.max_lon()
        || a.max_lat() < b.min_lat()
        || a.min_lat() > b.max_lat())
}
