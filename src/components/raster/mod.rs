pub mod collection;

use log::debug;
use ndarray::Array2;
use std::{fmt::Debug, rc::Rc};

use crate::{
    components::{
        band::BandReader,
        bounds::{in_shape, PixelBounds, Shape, Window},
        Resampling, Transformation,
    },
    errors::{MatchupError, Result},
};

/// One raster band with the transformation of its source and an optional
/// quantification value that raw values are divided by when scaled.
pub struct RasterAccessor {
    shape: Shape,
    reader: Rc<dyn BandReader>,
    quantification: Option<f64>,
    transformation: Rc<Transformation>,
}

impl Debug for RasterAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterAccessor")
            .field("shape", &self.shape)
            .field("quantification", &self.quantification)
            .field("reader", &self.reader)
            .finish()
    }
}

impl RasterAccessor {
    /// Fails if `quantification` is not a finite positive number.
    pub fn new(
        reader: Rc<dyn BandReader>,
        transformation: Rc<Transformation>,
        quantification: Option<f64>,
    ) -> Result<Self> {
        if let Some(value) = quantification.filter(|value| !(value.is_finite() && *value > 0.)) {
            return Err(MatchupError::InvalidQuantification(value));
        }
        Ok(Self {
            shape: reader.shape(),
            reader,
            quantification,
            transformation,
        })
    }

    /// (height, width)
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn quantification(&self) -> Option<f64> {
        self.quantification
    }

    pub fn transformation(&self) -> &Rc<Transformation> {
        &self.transformation
    }

    fn scale(&self, value: f64, scaled: bool) -> f64 {
        match self.quantification {
            Some(quantification) if scaled => value / quantification,
            _ => value,
        }
    }

    /// A NaN no-data value matches NaN pixels.
    fn is_no_data(&self, value: f64) -> bool {
        matches!(
            self.reader.no_data_value(),
            Some(no_data) if no_data == value || (no_data.is_nan() && value.is_nan())
        )
    }

    /// Reads `window` at its own resolution.
    ///
    /// `None` when the window offset lies outside the raster.
    pub fn read_window(
        &self,
        window: Window,
        resampling: Resampling,
        scaled: bool,
    ) -> Result<Option<Array2<f64>>> {
        let Some(bounds) = window.resolve(self.shape) else {
            return Ok(None);
        };
        let (width, height) = bounds.size();
        let mut array = Array2::zeros((height, width));
        self.read_bounds_into(&bounds, resampling, scaled, &mut array)?;
        Ok(Some(array))
    }

    /// Reads `window` into `buffer`, resampling to the buffer's shape.
    ///
    /// Returns `false`, leaving `buffer` untouched, when the window offset
    /// lies outside the raster.
    pub fn read_window_into(
        &self,
        window: Window,
        resampling: Resampling,
        scaled: bool,
        buffer: &mut Array2<f64>,
    ) -> Result<bool> {
        let Some(bounds) = window.resolve(self.shape) else {
            return Ok(false);
        };
        self.read_bounds_into(&bounds, resampling, scaled, buffer)?;
        Ok(true)
    }

    fn read_bounds_into(
        &self,
        bounds: &PixelBounds,
        resampling: Resampling,
        scaled: bool,
        buffer: &mut Array2<f64>,
    ) -> Result<()> {
        let (height, width) = buffer.dim();
        let slice = buffer
            .as_slice_mut()
            .ok_or(MatchupError::NdarrayError(ndarray::ShapeError::from_kind(
                ndarray::ErrorKind::IncompatibleLayout,
            )))?;
        self.reader
            .read_into_slice(bounds, (width, height), resampling, slice)?;
        if scaled && self.quantification.is_some() {
            buffer.mapv_inplace(|value| self.scale(value, true));
        }
        Ok(())
    }

    /// Value at a geodetic point.
    ///
    /// `None` when the point falls outside the raster or on no-data.
    pub fn get_matchup(&self, lat: f64, lon: f64, scaled: bool) -> Result<Option<f64>> {
        let Some((row, col)) = self.transformation.degree_to_pixel(lat, lon)? else {
            return Ok(None);
        };
        let window = Window::new(col, row).with_size(1, 1);
        let Some(data) = self.read_window(window, Resampling::NearestNeighbour, false)? else {
            return Ok(None);
        };
        Ok(Some(data[[0, 0]])
            .filter(|value| !self.is_no_data(*value))
            .map(|value| self.scale(value, scaled)))
    }

    /// Values at many geodetic points, in input order.
    ///
    /// Reads the single window enclosing every point inside the raster;
    /// points outside it, or on no-data, are `None`.
    pub fn get_matchups(
        &self,
        lats: &[f64],
        lons: &[f64],
        scaled: bool,
    ) -> Result<Vec<Option<f64>>> {
        let pixels = self.transformation.degrees_to_pixels(lats, lons)?;
        let selected: Vec<Option<(isize, isize)>> = pixels
            .into_iter()
            .map(|pixel| pixel.filter(|(row, col)| in_shape(self.shape, *row, *col)))
            .collect();

        let Some(bounds) = PixelBounds::enclosing(selected.iter().flatten().copied()) else {
            debug!("none of {} points inside {:?}", lats.len(), self.shape);
            return Ok(vec![None; selected.len()]);
        };
        let (width, height) = bounds.size();
        let mut data = Array2::zeros((height, width));
        self.read_bounds_into(&bounds, Resampling::NearestNeighbour, false, &mut data)?;

        Ok(selected
            .into_iter()
            .map(|pixel| {
                let (row, col) = pixel?;
                let value = data[bounds.local_index(row, col)?];
                (!self.is_no_data(value)).then(|| self.scale(value, scaled))
            })
            .collect())
    }
}
