//! texarray - DDS textures as dense multi-dimensional arrays.
//!
//! This crate provides the entry points consumed by language bindings:
//! [`load`] and [`save`], the [`Format`] enumeration, and [`VERSION`].
//!
//! # Crates
//!
//! - [`texarray_common`] - Common utilities (binary reading and writing)
//! - [`texarray_dds`] - DDS container codec and pixel format catalog
//!
//! # Example
//!
//! ```no_run
//! use texarray::prelude::*;
//!
//! let loaded = texarray::load("data/kueken7_rgba8_unorm.dds")?;
//! println!("{:?} {}", loaded.image.shape(), loaded.format);
//!
//! let ones = Image::filled(128, 256, 1, 1u8)?;
//! texarray::save("ones.dds", &ones, Format::R8_UNORM_PACK8)?;
//! # Ok::<(), texarray::Error>(())
//! ```

use std::path::Path;

// Re-export all sub-crates
pub use texarray_common as common;
pub use texarray_dds as dds;

pub use texarray_dds::{
    describe, ElementType, Error, FormatInfo, Image, ImageData, LoadedImage, NumericClass,
    PixelFormat, Result,
};

/// Pixel format identifiers, enumerable through [`PixelFormat::ALL`].
pub type Format = PixelFormat;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Format;
    pub use texarray_dds::{
        DdsFile, DdsInfo, Element, Image, ImageData, LoadedImage, PixelFormat, SaveOptions,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load the top-level surface of a DDS file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedImage> {
    texarray_dds::load(path)
}

/// Save an image as `format`. The image must already match the format's
/// channel count and element type.
pub fn save<P: AsRef<Path>>(path: P, image: &Image, format: Format) -> Result<()> {
    texarray_dds::save(path, image, format)
}
