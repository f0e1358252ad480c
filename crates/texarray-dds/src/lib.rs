//! DDS texture loading and saving for uncompressed pixel formats.
//!
//! Images are dense `(height, width, channel)` arrays whose element type
//! follows the pixel format: integer formats keep their stored width and
//! signedness, floating point formats decode to `f32` or `f64`.
//!
//! - `texture.dds` with a `DX10` header - the DXGI code names the format
//! - `texture.dds` with a `TXA1` header - the catalog code names formats
//!   DXGI cannot express (RGB8, 64-bit channels, scaled integers)
//! - legacy files - D3D FourCC codes and channel bit masks are recognised
//!
//! Only the top-level surface is decoded by [`load`]; [`DdsFile`] exposes
//! further array layers and cube faces.
//!
//! # Example
//!
//! ```no_run
//! use texarray_dds::{load, save, Image, PixelFormat};
//!
//! let ones = Image::filled(128, 256, 1, 1u8)?;
//! save("ones.dds", &ones, PixelFormat::R8_UNORM_PACK8)?;
//!
//! let loaded = load("ones.dds")?;
//! assert_eq!(loaded.image.shape(), [128, 256, 1]);
//! assert_eq!(loaded.format, PixelFormat::R8_UNORM_PACK8);
//! # Ok::<(), texarray_dds::Error>(())
//! ```

mod descriptor;
mod error;
mod format;
mod header;
mod image;
mod pixels;
mod read;
mod write;

pub use descriptor::resolve_format;
pub use error::{Error, Result};
pub use format::{describe, ElementType, FormatInfo, NumericClass, PixelFormat};
pub use header::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC, MAX_HEADER_LEN};
pub use image::{Element, Image, ImageData};
pub use read::{load, load_from_bytes, read_info, DdsFile, DdsInfo, LoadedImage};
pub use write::{encode, save, save_with_options, write_to, HeaderStyle, SaveOptions};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
