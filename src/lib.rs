//! Point match-ups from geo-rasters.
//!
//! A [Transformation] converts between pixel (row, col), projected meter
//! (y, x) and geodetic degree (lat, lon) coordinates of a raster. A
//! [RasterAccessor] reads values of one band at geodetic points, and a
//! [RasterCollection] fans such queries out over many bands and files.
//! The [catalogue] module locates satellite products covering a region.

mod components;
mod errors;
mod indexes;
mod intersection;

pub mod catalogue;
pub mod sensors;

pub use components::{
    bounds, create_raster_file, crs, BandReader, File, GdalFile, GeoTransform, Metadata,
    PixelBounds, PointTransform, RasterAccessor, RasterCollection, Resampling, Shape,
    Transformation, Window,
};
pub use errors::{MatchupError, Result};
pub use indexes::{IndexMap, RasterKey};
pub use intersection::{covers, polygon_from_points, polygon_from_wkt};
