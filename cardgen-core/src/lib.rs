//! Card face, back and print-sheet generation from CSV content.
//!
//! Records are read with [`record::read_records`], drawn by the per-category
//! renderers in [`cards`] onto a [`surface::Surface`], rasterized with resvg,
//! and tiled into sheets by [`atlas`].

pub mod assets;
pub mod atlas;
pub mod cards;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod raster;
pub mod record;
pub mod shapes;
pub mod surface;
pub mod text;

pub use cards::RenderContext;
pub use config::{Config, Locale};
pub use error::{CardError, Result};
pub use geometry::Generation;
pub use pipeline::{Category, Pipeline};
