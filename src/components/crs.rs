use std::fmt::Debug;

use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use proj::Proj;

use crate::errors::{MatchupError, Result};

/// Point transform between two reference systems.
///
/// Coordinates are in traditional GIS order: `xs` holds eastings or
/// longitudes, `ys` northings or latitudes.
pub trait PointTransform: Debug {
    fn transform_in_place(&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()>;

    fn transform_point(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (mut xs, mut ys) = ([x], [y]);
        self.transform_in_place(&mut xs, &mut ys)?;
        Ok((xs[0], ys[0]))
    }
}

fn check_lengths(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(MatchupError::LengthMismatch(xs.len(), ys.len()));
    }
    Ok(())
}

/// OSR backed transform.
pub struct GdalPointTransform(CoordTransform);

impl Debug for GdalPointTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GdalPointTransform")
    }
}

impl PointTransform for GdalPointTransform {
    fn transform_in_place(&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
        check_lengths(xs, ys)?;
        if xs.is_empty() {
            return Ok(());
        }
        let mut zs = vec![0.; xs.len()];
        Ok(self.0.transform_coords(xs, ys, &mut zs)?)
    }
}

/// Forward (projected → geographic) and inverse transforms for a WKT
/// projection, targeting the geographic system the projection is based on.
///
/// Axis order is pinned to traditional GIS order on both ends; GDAL >= 3
/// would otherwise follow the authority order (lat/lon for EPSG:4326).
pub fn gdal_transforms(wkt: &str) -> Result<(GdalPointTransform, GdalPointTransform)> {
    let mut source = SpatialRef::from_wkt(wkt)?;
    source.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    let mut target = source.geog_cs()?;
    target.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    let forward = CoordTransform::new(&source, &target)?;
    let inverse = CoordTransform::new(&target, &source)?;
    Ok((GdalPointTransform(forward), GdalPointTransform(inverse)))
}

/// PROJ backed transform.
pub struct ProjPointTransform(Proj);

impl Debug for ProjPointTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ProjPointTransform")
    }
}

impl PointTransform for ProjPointTransform {
    fn transform_in_place(&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
        check_lengths(xs, ys)?;
        let mut points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
        self.0.convert_array(&mut points)?;
        for ((x, y), (px, py)) in xs.iter_mut().zip(ys.iter_mut()).zip(points) {
            *x = px;
            *y = py;
        }
        Ok(())
    }
}

/// Forward and inverse transforms between a known CRS (e.g. `EPSG:32633`)
/// and WGS84. `new_known_crs` normalizes both ends to lon/lat order.
pub fn proj_transforms(crs: &str) -> Result<(ProjPointTransform, ProjPointTransform)> {
    let forward = Proj::new_known_crs(crs, "EPSG:4326", None)?;
    let inverse = Proj::new_known_crs("EPSG:4326", crs, None)?;
    Ok((ProjPointTransform(forward), ProjPointTransform(inverse)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rstest::rstest;

    /// Treats meters as degrees, optionally shifted. Keeps transform tests free
    /// of any projection database.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct ShiftTransform {
        pub dx: f64,
        pub dy: f64,
    }

    impl PointTransform for ShiftTransform {
        fn transform_in_place(&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
            check_lengths(xs, ys)?;
            xs.iter_mut().for_each(|x| *x += self.dx);
            ys.iter_mut().for_each(|y| *y += self.dy);
            Ok(())
        }
    }

    /// Identity that rejects the whole batch when any `x` lies beyond
    /// `limit`, as OSR does for points outside a projection's domain.
    #[derive(Debug, Clone, Copy)]
    pub struct BoundedTransform {
        pub limit: f64,
    }

    impl PointTransform for BoundedTransform {
        fn transform_in_place(&self, xs: &mut [f64], ys: &mut [f64]) -> Result<()> {
            check_lengths(xs, ys)?;
            match xs.iter().find(|x| !(x.abs() <= self.limit)) {
                Some(x) => Err(gdal::errors::GdalError::BadArgument(format!(
                    "{x} is beyond {}",
                    self.limit
                ))
                .into()),
                None => Ok(()),
            }
        }
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let transform = ShiftTransform::default();
        let result = transform.transform_in_place(&mut [0., 1.], &mut [0.]);
        assert!(matches!(result, Err(MatchupError::LengthMismatch(2, 1))));
    }

    #[test_log::test]
    fn gdal_transform_is_lon_lat_ordered() {
        let wkt = SpatialRef::from_epsg(32633).unwrap().to_wkt().unwrap();
        let (forward, inverse) = gdal_transforms(&wkt).unwrap();
        // central meridian of zone 33 at the equator
        let (lon, lat) = forward.transform_point(500_000., 0.).unwrap();
        assert!((lon - 15.).abs() < 1e-6, "lon {lon}");
        assert!(lat.abs() < 1e-6, "lat {lat}");
        let (x, y) = inverse.transform_point(lon, lat).unwrap();
        assert!((x - 500_000.).abs() < 1e-3);
        assert!(y.abs() < 1e-3);
    }

    #[rstest]
    #[case(500_000., 5_000_000.)]
    #[case(420_000., 4_650_000.)]
    #[case(600_000., 5_300_000.)]
    fn gdal_and_proj_agree(#[case] x: f64, #[case] y: f64) {
        let wkt = SpatialRef::from_epsg(32633).unwrap().to_wkt().unwrap();
        let (gdal_forward, _) = gdal_transforms(&wkt).unwrap();
        let (proj_forward, _) = proj_transforms("EPSG:32633").unwrap();
        let (glon, glat) = gdal_forward.transform_point(x, y).unwrap();
        let (plon, plat) = proj_forward.transform_point(x, y).unwrap();
        assert!((glon - plon).abs() < 1e-6);
        assert!((glat - plat).abs() < 1e-6);
    }

    #[test]
    fn empty_batches_are_noops() {
        let wkt = SpatialRef::from_epsg(32633).unwrap().to_wkt().unwrap();
        let (forward, _) = gdal_transforms(&wkt).unwrap();
        forward.transform_in_place(&mut [], &mut []).unwrap();
    }
}
