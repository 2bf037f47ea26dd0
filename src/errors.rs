use crate::components::Resampling;

pub type Result<T> = std::result::Result<T, MatchupError>;

#[derive(thiserror::Error, Debug)]
pub enum MatchupError {
    #[error(transparent)]
    ProjError(#[from] proj::ProjError),
    #[error(transparent)]
    ProjCreateError(#[from] proj::ProjCreateError),
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Geotransform {0:?} is not invertible, x and y scale must be nonzero")]
    NonInvertibleGeoTransform([f64; 6]),
    #[error("Coordinate lists differ in length: {0} != {1}")]
    LengthMismatch(usize, usize),
    #[error("Resampling {0:?} is not supported by windowed reads")]
    UnsupportedResampling(Resampling),
    #[error("Quantification value {0} is not a positive divisor")]
    InvalidQuantification(f64),
    #[error("Invalid footprint: {0}")]
    InvalidFootprint(String),
    #[error("Geometry is not a polygon")]
    NotAPolygon,
    #[error("Empty product directory {0}")]
    EmptyProduct(String),
}
