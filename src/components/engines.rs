use std::{collections::HashMap, fmt::Debug, path::Path, rc::Rc};

use crate::{
    components::{
        band::BandReader, bounds::PixelBounds, file::File, transforms::GeoTransform, Metadata,
        Resampling, Shape,
    },
    errors::Result,
};

/// Implementations for gdal
pub mod gdal_engine {
    use super::*;
    use gdal::{
        raster::{Buffer, GdalType},
        Dataset as GdalDataset, DriverManager, Metadata as GdalMetadata,
        MetadataEntry as GdalMetadataEntry,
    };
    use log::{debug, info};
    use ndarray::Array2;

    pub(crate) fn filter_metadata_gdal(metadata: &impl GdalMetadata, domain: &str) -> Metadata {
        GdalMetadata::metadata(metadata)
            .filter_map(|GdalMetadataEntry { domain: entry_domain, key, value }| {
                entry_domain.eq(domain).then_some((key, value))
            })
            .collect::<HashMap<_, _>>()
    }

    #[derive(Debug)]
    pub struct GdalFile {
        dataset: Rc<GdalDataset>,
    }

    impl GdalFile {
        pub fn dataset(&self) -> &GdalDataset {
            &self.dataset
        }
    }

    impl File for GdalFile {
        fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let dataset = Rc::new(GdalDataset::open(&path)?);
            info!(
                "opened {:?} with {} bands",
                path.as_ref(),
                dataset.raster_count()
            );
            Ok(GdalFile { dataset })
        }
        fn description(&self) -> Result<String> {
            Ok(self.dataset.description()?)
        }
        fn shape(&self) -> Shape {
            let (width, height) = self.dataset.raster_size();
            (height, width)
        }
        fn projection(&self) -> String {
            self.dataset.projection()
        }
        fn geo_transform(&self) -> Result<GeoTransform> {
            GeoTransform::new(self.dataset.geo_transform()?)
        }
        fn num_bands(&self) -> usize {
            self.dataset.raster_count()
        }
        fn band(&self, index: usize) -> Result<Rc<dyn BandReader>> {
            let rasterband = self.dataset.rasterband(index)?;
            let (width, height) = rasterband.size();
            Ok(Rc::new(GdalBandReader {
                dataset: Rc::clone(&self.dataset),
                index,
                shape: (height, width),
                no_data: rasterband.no_data_value(),
            }))
        }
        fn metadata(&self) -> Metadata {
            filter_metadata_gdal(self.dataset.as_ref(), "")
        }
    }

    /// Band of an open dataset; holding it keeps the dataset open.
    #[derive(Debug)]
    struct GdalBandReader {
        dataset: Rc<GdalDataset>,
        index: usize,
        shape: Shape,
        no_data: Option<f64>,
    }

    impl BandReader for GdalBandReader {
        fn shape(&self) -> Shape {
            self.shape
        }

        fn no_data_value(&self) -> Option<f64> {
            self.no_data
        }

        fn read_into_slice(
            &self,
            bounds: &PixelBounds,
            buffer_size: (usize, usize),
            resampling: Resampling,
            slice: &mut [f64],
        ) -> Result<()> {
            debug!("reading band {} window {:?}", self.index, bounds);
            let rasterband = self.dataset.rasterband(self.index)?;
            Ok(rasterband.read_into_slice::<f64>(
                bounds.offset(),
                bounds.size(),
                buffer_size,
                slice,
                Some(resampling.to_gdal()?),
            )?)
        }
    }

    /// Writes `arrays` as the bands of a new raster at `path`.
    ///
    /// All arrays must share the shape of the first one.
    pub fn create_raster_file<T: GdalType + Copy, P: AsRef<Path>>(
        path: P,
        arrays: &[Array2<T>],
        geotransform: Option<&GeoTransform>,
        projection: Option<&str>,
        driver: &str,
    ) -> Result<()> {
        let Some(first) = arrays.first() else {
            return Err(gdal::errors::GdalError::BadArgument(
                "at least one array is needed to create a raster".to_string(),
            )
            .into());
        };
        let (height, width) = first.dim();
        let driver = DriverManager::get_driver_by_name(driver)?;
        let mut dataset =
            driver.create_with_band_type::<T, _>(path.as_ref(), width, height, arrays.len())?;
        if let Some(projection) = projection {
            dataset.set_projection(projection)?;
        }
        if let Some(geotransform) = geotransform {
            dataset.set_geo_transform(geotransform)?;
        }
        for (index, array) in arrays.iter().enumerate() {
            if array.dim() != (height, width) {
                return Err(gdal::errors::GdalError::BadArgument(format!(
                    "array {index} has shape {:?}, expected {:?}",
                    array.dim(),
                    (height, width)
                ))
                .into());
            }
            let mut buffer = Buffer::new((width, height), array.iter().copied().collect());
            dataset
                .rasterband(index + 1)?
                .write((0, 0), (width, height), &mut buffer)?;
        }
        dataset.flush_cache()?;
        info!("created {:?} with {} bands", path.as_ref(), arrays.len());
        Ok(())
    }
}
