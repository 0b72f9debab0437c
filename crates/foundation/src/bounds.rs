/// Geographic extents in WGS84 degrees.
///
/// The representation is local: `west <= east` and `south <= north`. Extents
/// that cross the antimeridian are not modelled.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub const WORLD: Self = Self {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Clamp a widget-reported extent into the valid lon/lat ranges.
    ///
    /// Wrapped-world map views report longitudes beyond ±180 after panning;
    /// swapped edges are reordered.
    pub fn clamped(self) -> Self {
        let (west, east) = ordered(self.west, self.east);
        let (south, north) = ordered(self.south, self.north);
        Self {
            west: west.clamp(-180.0, 180.0),
            south: south.clamp(-90.0, 90.0),
            east: east.clamp(-180.0, 180.0),
            north: north.clamp(-90.0, 90.0),
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.west, self.south, self.east, self.north]
            .iter()
            .all(|v| v.is_finite())
            && self.west <= self.east
            && self.south <= self.north
            && (-180.0..=180.0).contains(&self.west)
            && (-180.0..=180.0).contains(&self.east)
            && (-90.0..=90.0).contains(&self.south)
            && (-90.0..=90.0).contains(&self.north)
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lng >= self.west
            && point.lng <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A map position. Note the field order: latitude first, as map widgets take it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}
