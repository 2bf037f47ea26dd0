use geo::{Coord, Rect};
use itertools::{Itertools, MinMaxResult};
use shrinkwraprs::Shrinkwrap;

/// Raster extent as (height, width).
pub type Shape = (usize, usize);

/// Pixel window of a read.
///
/// `min` is the top left pixel (x = col, y = row), `max` is exclusive.
#[derive(Shrinkwrap, Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds(Rect<isize>);

impl PixelBounds {
    /// `offset` as (col, row), `size` as (width, height).
    pub fn new(offset: (isize, isize), size: (usize, usize)) -> Self {
        let min = Coord::from(offset);
        let max = min + Coord::from((size.0 as isize, size.1 as isize));
        Self(Rect::new(min, max))
    }

    /// Tightest window holding every `(row, col)`; `None` if there are none.
    pub fn enclosing(pixels: impl IntoIterator<Item = (isize, isize)> + Clone) -> Option<Self> {
        let rows = minmax(pixels.clone().into_iter().map(|(row, _)| row))?;
        let cols = minmax(pixels.into_iter().map(|(_, col)| col))?;
        let size = ((cols.1 - cols.0 + 1) as usize, (rows.1 - rows.0 + 1) as usize);
        Some(Self::new((cols.0, rows.0), size))
    }

    /// (col, row) of the top left pixel.
    pub fn offset(&self) -> (isize, isize) {
        self.0.min().x_y()
    }

    /// (width, height).
    pub fn size(&self) -> (usize, usize) {
        (self.0.width() as usize, self.0.height() as usize)
    }

    pub fn row_range(&self) -> std::ops::Range<isize> {
        self.0.min().y..self.0.max().y
    }

    pub fn col_range(&self) -> std::ops::Range<isize> {
        self.0.min().x..self.0.max().x
    }

    /// Index of `(row, col)` inside the window as `[row, col]`.
    pub fn local_index(&self, row: isize, col: isize) -> Option<[usize; 2]> {
        if self.row_range().contains(&row) && self.col_range().contains(&col) {
            let (col0, row0) = self.offset();
            Some([(row - row0) as usize, (col - col0) as usize])
        } else {
            None
        }
    }
}

fn minmax(values: impl Iterator<Item = isize>) -> Option<(isize, isize)> {
    match values.minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(value) => Some((value, value)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

/// Whether `(row, col)` lies in `[0, height) x [0, width)`.
pub fn in_shape(shape: Shape, row: isize, col: isize) -> bool {
    (0..shape.0 as isize).contains(&row) && (0..shape.1 as isize).contains(&col)
}

/// Read request in pixel space.
///
/// Missing `width`/`height` extend to the raster edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Window {
    pub col: isize,
    pub row: isize,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl Window {
    pub fn new(col: isize, row: isize) -> Self {
        Self {
            col,
            row,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Bounds within a raster of `shape`, `None` when the offset is outside.
    pub fn resolve(&self, shape: Shape) -> Option<PixelBounds> {
        if !in_shape(shape, self.row, self.col) {
            return None;
        }
        let width = self.width.unwrap_or(shape.1 - self.col as usize);
        let height = self.height.unwrap_or(shape.0 - self.row as usize);
        Some(PixelBounds::new((self.col, self.row), (width, height)))
    }
}
