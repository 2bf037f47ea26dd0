use geo::{Geometry, LineString, Polygon, Within};

use crate::errors::{MatchupError, Result};

/// Parses a WKT polygon, coordinates in lon/lat order.
pub fn polygon_from_wkt(wkt: &str) -> Result<Polygon> {
    match gdal::vector::Geometry::from_wkt(wkt)?.to_geo()? {
        Geometry::Polygon(polygon) => Ok(polygon),
        _ => Err(MatchupError::NotAPolygon),
    }
}

/// Polygon with the exterior ring `points`, each `[lon, lat]`.
pub fn polygon_from_points(points: &[[f64; 2]]) -> Result<Polygon> {
    if points.len() < 3 {
        return Err(MatchupError::InvalidFootprint(format!(
            "a ring needs at least 3 points, got {}",
            points.len()
        )));
    }
    let ring = LineString::from(points.iter().map(|[x, y]| (*x, *y)).collect::<Vec<_>>());
    Ok(Polygon::new(ring, vec![]))
}

/// Whether `region` lies entirely within `footprint`.
pub fn covers(footprint: &Polygon, region: &Polygon) -> bool {
    region.is_within(footprint)
}
