use std::{fmt::Debug, rc::Rc};

use geo::{AffineTransform, Coord};
use log::debug;
use shrinkwraprs::Shrinkwrap;

use crate::{
    components::crs::{gdal_transforms, proj_transforms, PointTransform},
    errors::{MatchupError, Result},
};

/// GDAL ordered geotransform: `[x0, a, b, y0, c, d]` with
/// `x = x0 + col*a + row*b` and `y = y0 + col*c + row*d`.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// Fails if either scale term is zero.
    pub fn new(coefficients: [f64; 6]) -> Result<Self> {
        if coefficients[1] == 0. || coefficients[5] == 0. {
            return Err(MatchupError::NonInvertibleGeoTransform(coefficients));
        }
        Ok(Self(coefficients))
    }

    pub fn affine(&self) -> AffineTransform {
        AffineTransform::new(self[1], self[2], self[0], self[4], self[5], self[3])
    }

    /// Pixel (row, col) to meter (y, x).
    pub fn pixel_to_meter(&self, row: f64, col: f64) -> (f64, f64) {
        let Coord { x, y } = self.affine().apply(Coord { x: col, y: row });
        (y, x)
    }

    /// Meter (y, x) to the nearest pixel (row, col), rounding half to even.
    ///
    /// Only the diagonal terms are inverted, so this is exact for north-up
    /// rasters only; skew terms are ignored. Returns `None` when the pixel
    /// is not representable (non-finite input).
    pub fn meter_to_pixel(&self, y: f64, x: f64) -> Option<(isize, isize)> {
        let col = ((x - self[0]) / self[1]).round_ties_even();
        let row = ((y - self[3]) / self[5]).round_ties_even();
        Some((num_traits::cast(row)?, num_traits::cast(col)?))
    }
}

/// Conversions between pixel (row, col), meter (y, x) and degree (lat, lon)
/// coordinates of one raster.
///
/// Immutable once built; share it with [Rc] between bands of a dataset.
pub struct Transformation {
    geotransform: GeoTransform,
    projection: Rc<str>,
    forward: Box<dyn PointTransform>,
    inverse: Box<dyn PointTransform>,
}

impl Debug for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformation")
            .field("geotransform", &self.geotransform)
            .field("projection", &self.projection)
            .finish()
    }
}

impl Transformation {
    pub fn new(
        projection: impl Into<Rc<str>>,
        geotransform: GeoTransform,
        forward: Box<dyn PointTransform>,
        inverse: Box<dyn PointTransform>,
    ) -> Self {
        Self {
            geotransform,
            projection: projection.into(),
            forward,
            inverse,
        }
    }

    /// Projection given as WKT, transforms through OSR.
    pub fn from_wkt(wkt: &str, geotransform: GeoTransform) -> Result<Self> {
        let (forward, inverse) = gdal_transforms(wkt)?;
        Ok(Self::new(wkt, geotransform, Box::new(forward), Box::new(inverse)))
    }

    /// Projection given as a known CRS code, transforms through PROJ to WGS84.
    pub fn from_crs(crs: &str, geotransform: GeoTransform) -> Result<Self> {
        let (forward, inverse) = proj_transforms(crs)?;
        Ok(Self::new(crs, geotransform, Box::new(forward), Box::new(inverse)))
    }

    pub fn from_dataset(dataset: &gdal::Dataset) -> Result<Self> {
        let geotransform = GeoTransform::new(dataset.geo_transform()?)?;
        Self::from_wkt(&dataset.projection(), geotransform)
    }

    pub fn geotransform(&self) -> &GeoTransform {
        &self.geotransform
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn pixel_to_meter(&self, row: f64, col: f64) -> (f64, f64) {
        self.geotransform.pixel_to_meter(row, col)
    }

    pub fn meter_to_pixel(&self, y: f64, x: f64) -> Option<(isize, isize)> {
        self.geotransform.meter_to_pixel(y, x)
    }

    pub fn meter_to_degree(&self, y: f64, x: f64) -> Result<(f64, f64)> {
        let (lon, lat) = self.forward.transform_point(x, y)?;
        Ok((lat, lon))
    }

    pub fn degree_to_meter(&self, lat: f64, lon: f64) -> Result<(f64, f64)> {
        let (x, y) = self.inverse.transform_point(lon, lat)?;
        Ok((y, x))
    }

    pub fn pixel_to_degree(&self, row: f64, col: f64) -> Result<(f64, f64)> {
        let (y, x) = self.pixel_to_meter(row, col);
        self.meter_to_degree(y, x)
    }

    /// `None` when the point has no pixel, including points the projection
    /// cannot transform.
    pub fn degree_to_pixel(&self, lat: f64, lon: f64) -> Result<Option<(isize, isize)>> {
        match self.degree_to_meter(lat, lon) {
            Ok((y, x)) => Ok(self.meter_to_pixel(y, x)),
            Err(err) => {
                debug!("({lat}, {lon}) has no pixel: {err}");
                Ok(None)
            }
        }
    }

    /// Batched [Self::meter_to_degree], returns `(lats, lons)`.
    pub fn meters_to_degrees(&self, ys: &[f64], xs: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        let (mut lons, mut lats) = (xs.to_vec(), ys.to_vec());
        self.forward.transform_in_place(&mut lons, &mut lats)?;
        Ok((lats, lons))
    }

    /// Batched [Self::degree_to_meter], returns `(ys, xs)`.
    pub fn degrees_to_meters(&self, lats: &[f64], lons: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        let (mut xs, mut ys) = (lons.to_vec(), lats.to_vec());
        self.inverse.transform_in_place(&mut xs, &mut ys)?;
        Ok((ys, xs))
    }

    /// Batched [Self::pixel_to_degree], returns `(lats, lons)`.
    pub fn pixels_to_degrees(&self, rows: &[f64], cols: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        if rows.len() != cols.len() {
            return Err(MatchupError::LengthMismatch(rows.len(), cols.len()));
        }
        let (ys, xs): (Vec<f64>, Vec<f64>) = rows
            .iter()
            .zip(cols)
            .map(|(row, col)| self.pixel_to_meter(*row, *col))
            .unzip();
        self.meters_to_degrees(&ys, &xs)
    }

    /// Batched [Self::degree_to_pixel], in input order.
    ///
    /// A batch the projection rejects as a whole is retried point by point,
    /// so only the points it cannot transform are `None`.
    pub fn degrees_to_pixels(
        &self,
        lats: &[f64],
        lons: &[f64],
    ) -> Result<Vec<Option<(isize, isize)>>> {
        if lats.len() != lons.len() {
            return Err(MatchupError::LengthMismatch(lats.len(), lons.len()));
        }
        match self.degrees_to_meters(lats, lons) {
            Ok((ys, xs)) => Ok(ys
                .into_iter()
                .zip(xs)
                .map(|(y, x)| self.meter_to_pixel(y, x))
                .collect()),
            Err(err) => {
                debug!("batch of {} points failed, transforming each: {err}", lats.len());
                lats.iter()
                    .zip(lons)
                    .map(|(lat, lon)| self.degree_to_pixel(*lat, *lon))
                    .collect()
            }
        }
    }
}
