use gdal::raster::ResampleAlg;
use serde::{Deserialize, Serialize};

use crate::errors::{MatchupError, Result};

/// Resampling applied when a window is read into a buffer of another size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resampling {
    #[default]
    NearestNeighbour,
    Bilinear,
    Cubic,
    CubicSpline,
    Lanczos,
    Average,
    Mode,
    Max,
    Min,
    Median,
    FirstQuartile,
    ThirdQuartile,
}

impl Resampling {
    /// GDAL `GRA_*` code.
    pub fn code(&self) -> u32 {
        match self {
            Resampling::NearestNeighbour => 0,
            Resampling::Bilinear => 1,
            Resampling::Cubic => 2,
            Resampling::CubicSpline => 3,
            Resampling::Lanczos => 4,
            Resampling::Average => 5,
            Resampling::Mode => 6,
            Resampling::Max => 8,
            Resampling::Min => 9,
            Resampling::Median => 10,
            Resampling::FirstQuartile => 11,
            Resampling::ThirdQuartile => 12,
        }
    }

    /// Algorithm for `RasterIO`; the order statistics only exist for warping.
    pub fn to_gdal(self) -> Result<ResampleAlg> {
        match self {
            Resampling::NearestNeighbour => Ok(ResampleAlg::NearestNeighbour),
            Resampling::Bilinear => Ok(ResampleAlg::Bilinear),
            Resampling::Cubic => Ok(ResampleAlg::Cubic),
            Resampling::CubicSpline => Ok(ResampleAlg::CubicSpline),
            Resampling::Lanczos => Ok(ResampleAlg::Lanczos),
            Resampling::Average => Ok(ResampleAlg::Average),
            Resampling::Mode => Ok(ResampleAlg::Mode),
            other => Err(MatchupError::UnsupportedResampling(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Resampling::Max)]
    #[case(Resampling::Min)]
    #[case(Resampling::Median)]
    #[case(Resampling::FirstQuartile)]
    #[case(Resampling::ThirdQuartile)]
    fn order_statistics_are_unsupported(#[case] resampling: Resampling) {
        assert!(matches!(
            resampling.to_gdal(),
            Err(MatchupError::UnsupportedResampling(r)) if r == resampling
        ));
    }

    #[test]
    fn deserializes_from_snake_case() {
        let resampling: Resampling = serde_json::from_str("\"cubic_spline\"").unwrap();
        assert_eq!(resampling, Resampling::CubicSpline);
        assert_eq!(resampling.code(), 3);
    }
}
