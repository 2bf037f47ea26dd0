use std::{fmt::Debug, path::Path, rc::Rc};

use crate::{
    components::{band::BandReader, transforms::GeoTransform, Metadata, Shape, Transformation},
    errors::Result,
};

/// Raster source holding one or more bands sharing a grid.
pub trait File: Debug + Sized {
    fn open<P: AsRef<Path>>(path: P) -> Result<Self>;
    fn description(&self) -> Result<String>;
    /// (height, width)
    fn shape(&self) -> Shape;
    fn projection(&self) -> String;
    fn geo_transform(&self) -> Result<GeoTransform>;
    fn num_bands(&self) -> usize;
    /// `index` counts from 1.
    fn band(&self, index: usize) -> Result<Rc<dyn BandReader>>;
    fn metadata(&self) -> Metadata;

    fn transformation(&self) -> Result<Transformation> {
        Transformation::from_wkt(&self.projection(), self.geo_transform()?)
    }
}
