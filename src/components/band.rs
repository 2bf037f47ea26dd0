use std::fmt::Debug;

use crate::components::{bounds::PixelBounds, Resampling, Shape};
use crate::errors::Result;

/// Read access to one band of a raster source.
pub trait BandReader: Debug {
    /// (height, width)
    fn shape(&self) -> Shape;

    fn no_data_value(&self) -> Option<f64>;

    /// Reads `bounds` into `slice`, a row-major buffer of `buffer_size`
    /// (width, height). Sizes that differ from the window are resampled.
    fn read_into_slice(
        &self,
        bounds: &PixelBounds,
        buffer_size: (usize, usize),
        resampling: Resampling,
        slice: &mut [f64],
    ) -> Result<()>;
}
