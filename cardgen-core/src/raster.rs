//! PNG encoding and decoding of `tiny_skia` pixmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use tiny_skia::Pixmap;

use crate::error::{CardError, Result};

/// Straight-alpha RGBA bytes of a premultiplied pixmap.
pub fn demultiplied_rgba(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

/// Write `pixmap` as an 8-bit RGBA PNG. Same pixels always give the same bytes.
pub fn encode_png(pixmap: &Pixmap, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| CardError::io(path, e))?;
    let png_err = |source| CardError::Png {
        path: path.to_path_buf(),
        source,
    };
    let mut enc = Encoder::new(BufWriter::new(file), pixmap.width(), pixmap.height());
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    enc.set_filter(FilterType::NoFilter);
    enc.set_compression(Compression::Default);
    let mut writer = enc.write_header().map_err(png_err)?;
    writer
        .write_image_data(&demultiplied_rgba(pixmap))
        .map_err(png_err)?;
    writer.finish().map_err(png_err)?;
    Ok(())
}

pub fn load_png(path: &Path) -> Result<Pixmap> {
    Pixmap::load_png(path).map_err(|e| CardError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
