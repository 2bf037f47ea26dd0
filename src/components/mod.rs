pub mod band;
pub mod bounds;
pub mod crs;
pub mod engines;
pub mod file;
pub mod raster;
pub mod resampling;
pub mod transforms;

pub use band::BandReader;
pub use bounds::{PixelBounds, Shape, Window};
pub use crs::PointTransform;
pub use engines::gdal_engine::{create_raster_file, GdalFile};
pub use file::File;
pub use raster::{collection::RasterCollection, RasterAccessor};
pub use resampling::Resampling;
pub use transforms::{GeoTransform, Transformation};

use std::collections::HashMap;
pub type Metadata = HashMap<String, String>;
