use log::{info, warn};
use std::{collections::BTreeMap, path::Path, rc::Rc};

use crate::{
    components::{engines::gdal_engine::GdalFile, file::File, raster::RasterAccessor},
    errors::Result,
    indexes::{IndexMap, RasterKey},
};

/// Rasters from one or more sources under unique keys.
///
/// Adding a key that already exists replaces the earlier raster.
#[derive(Debug, Default)]
pub struct RasterCollection {
    rasters: BTreeMap<RasterKey, RasterAccessor>,
}

impl RasterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection of `(path, index map, quantification value)` sources,
    /// added in order.
    pub fn from_sources<P: AsRef<Path>>(
        sources: impl IntoIterator<Item = (P, Option<IndexMap>, Option<f64>)>,
    ) -> Result<Self> {
        let mut collection = Self::new();
        for (path, index_map, quantification) in sources {
            collection.add_rasters(path, index_map, quantification)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.rasters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rasters.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RasterKey> {
        self.rasters.keys()
    }

    pub fn get(&self, key: &RasterKey) -> Option<&RasterAccessor> {
        self.rasters.get(key)
    }

    /// Opens `path` and adds its bands, see [Self::add_file].
    pub fn add_rasters(
        &mut self,
        path: impl AsRef<Path>,
        index_map: Option<IndexMap>,
        quantification: Option<f64>,
    ) -> Result<Vec<RasterKey>> {
        let file = GdalFile::open(path)?;
        self.add_file(&file, index_map, quantification)
    }

    /// Adds the bands of `file` named by `index_map`, or every band keyed by
    /// index continuing from the current size. All bands share one
    /// transformation.
    ///
    /// Nothing is added if any band fails to open.
    pub fn add_file<F: File>(
        &mut self,
        file: &F,
        index_map: Option<IndexMap>,
        quantification: Option<f64>,
    ) -> Result<Vec<RasterKey>> {
        let transformation = Rc::new(file.transformation()?);
        let index_map =
            index_map.unwrap_or_else(|| IndexMap::sequential(file.num_bands(), self.len()));
        let rasters = index_map
            .iter()
            .map(|(index, key)| -> Result<_> {
                let reader = file.band(*index)?;
                let raster =
                    RasterAccessor::new(reader, Rc::clone(&transformation), quantification)?;
                Ok((*index, key.clone(), raster))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut keys = Vec::with_capacity(rasters.len());
        for (index, key, raster) in rasters {
            if self.rasters.insert(key.clone(), raster).is_some() {
                let source = file.description().unwrap_or_default();
                warn!("raster {key} replaced by band {index} of {source:?}");
            }
            keys.push(key);
        }
        info!("added rasters {keys:?}");
        Ok(keys)
    }

    fn selected<'a>(
        &'a self,
        keys: Option<&'a [RasterKey]>,
    ) -> Box<dyn Iterator<Item = (&'a RasterKey, Option<&'a RasterAccessor>)> + 'a> {
        match keys {
            Some(keys) => Box::new(keys.iter().map(move |key| (key, self.rasters.get(key)))),
            None => Box::new(self.rasters.iter().map(|(key, raster)| (key, Some(raster)))),
        }
    }

    /// Match-up of every selected raster at one point, all rasters by default.
    ///
    /// Unknown keys and failing lookups map to `None` instead of failing the
    /// whole query.
    pub fn get_matchup(
        &self,
        lat: f64,
        lon: f64,
        scaled: bool,
        keys: Option<&[RasterKey]>,
    ) -> BTreeMap<RasterKey, Option<f64>> {
        self.selected(keys)
            .map(|(key, raster)| {
                let value = raster.and_then(|raster| {
                    raster
                        .get_matchup(lat, lon, scaled)
                        .unwrap_or_else(|err| {
                            warn!("matchup of {key} at ({lat}, {lon}) failed: {err}");
                            None
                        })
                });
                (key.clone(), value)
            })
            .collect()
    }

    /// Batched [Self::get_matchup], each value list in point order.
    pub fn get_matchups(
        &self,
        lats: &[f64],
        lons: &[f64],
        scaled: bool,
        keys: Option<&[RasterKey]>,
    ) -> BTreeMap<RasterKey, Vec<Option<f64>>> {
        self.selected(keys)
            .map(|(key, raster)| {
                let values = raster
                    .and_then(|raster| {
                        raster
                            .get_matchups(lats, lons, scaled)
                            .map_err(|err| warn!("matchups of {key} failed: {err}"))
                            .ok()
                    })
                    .unwrap_or_else(|| vec![None; lats.len()]);
                (key.clone(), values)
            })
            .collect()
    }
}
