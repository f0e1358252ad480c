//! DDS saving.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use texarray_common::BinaryWriter;
use tracing::debug;

use crate::format::{FormatInfo, PixelFormat};
use crate::header::{
    surface_size, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC, MAX_HEADER_LEN,
};
use crate::image::Image;
use crate::pixels;
use crate::{Error, Result, DDS_MAGIC};

/// Which pixel-format descriptor the writer emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderStyle {
    /// Always write an extended header: `DX10` with a DXGI code, or `TXA1`
    /// with the catalog code when DXGI has no equivalent.
    #[default]
    Dx10,
    /// Prefer a legacy D3D FourCC or bit-mask descriptor, falling back to
    /// [`HeaderStyle::Dx10`] for formats without one.
    Legacy,
}

/// Options for [`save_with_options`], [`encode`] and [`write_to`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaveOptions {
    pub header: HeaderStyle,
}

impl SaveOptions {
    pub fn with_header(mut self, header: HeaderStyle) -> Self {
        self.header = header;
        self
    }
}

/// Save an image as a single-surface DDS file.
///
/// The file is created or truncated. The image's element type and channel
/// count must match `format` exactly.
pub fn save<P: AsRef<Path>>(path: P, image: &Image, format: PixelFormat) -> Result<()> {
    save_with_options(path, image, format, &SaveOptions::default())
}

/// Save an image with explicit options.
pub fn save_with_options<P: AsRef<Path>>(
    path: P,
    image: &Image,
    format: PixelFormat,
    options: &SaveOptions,
) -> Result<()> {
    let path = path.as_ref();
    let writer = encode_into_writer(image, format, options)?;

    let mut out = BufWriter::new(File::create(path)?);
    writer.write_into(&mut out)?;
    out.flush()?;

    debug!(
        path = %path.display(),
        %format,
        width = image.width(),
        height = image.height(),
        bytes = writer.len(),
        "saved DDS"
    );
    Ok(())
}

/// Encode an image into DDS file bytes.
pub fn encode(image: &Image, format: PixelFormat, options: &SaveOptions) -> Result<Vec<u8>> {
    encode_into_writer(image, format, options).map(BinaryWriter::into_inner)
}

/// Encode an image and write it to a sink.
pub fn write_to<W: Write>(
    out: &mut W,
    image: &Image,
    format: PixelFormat,
    options: &SaveOptions,
) -> Result<()> {
    encode_into_writer(image, format, options)?.write_into(out)?;
    Ok(())
}

fn encode_into_writer(image: &Image, format: PixelFormat, options: &SaveOptions) -> Result<BinaryWriter> {
    let info = validate(image, format)?;

    let invalid = || Error::InvalidDimensions {
        width: image.width(),
        height: image.height(),
    };
    if image.width() == 0 || image.height() == 0 {
        return Err(invalid());
    }
    let width = u32::try_from(image.width()).map_err(|_| invalid())?;
    let height = u32::try_from(image.height()).map_err(|_| invalid())?;
    let pitch = u32::try_from(info.bytes_per_pixel())
        .ok()
        .and_then(|bpp| width.checked_mul(bpp))
        .ok_or_else(invalid)?;
    let payload_len = surface_size(width, height, 1, info.bytes_per_pixel()).ok_or_else(invalid)?;

    let (pixel_format, extension) = match options.header {
        HeaderStyle::Legacy => match format.legacy_pixel_format() {
            Some(pixel_format) => (pixel_format, None),
            None => extended_descriptor(format),
        },
        HeaderStyle::Dx10 => extended_descriptor(format),
    };
    let header = DdsHeader::texture_2d(width, height, pitch, pixel_format);

    let mut writer = BinaryWriter::with_capacity(MAX_HEADER_LEN + payload_len);
    writer.write_bytes(DDS_MAGIC);
    writer.write_struct(&header);
    if let Some(ext) = &extension {
        writer.write_struct(ext);
    }
    pixels::encode(image.data(), &info, writer.reserve_zeroed(payload_len));

    Ok(writer)
}

fn extended_descriptor(format: PixelFormat) -> (DdsPixelFormat, Option<DdsHeaderDxt10>) {
    match format.dxgi_format() {
        Some(code) => (
            DdsPixelFormat::with_four_cc(FourCC::DX10),
            Some(DdsHeaderDxt10::texture_2d(code)),
        ),
        None => (
            DdsPixelFormat::with_four_cc(FourCC::TXA1),
            Some(DdsHeaderDxt10::texture_2d(format.code())),
        ),
    }
}

/// Check that the image can be stored as `format` without reinterpretation.
fn validate(image: &Image, format: PixelFormat) -> Result<FormatInfo> {
    let info = format.info();
    if image.channels() != info.channels || image.element_type() != info.element_type {
        return Err(Error::FormatMismatch {
            format,
            expected_channels: info.channels,
            expected_type: info.element_type,
            actual_channels: image.channels(),
            actual_type: image.element_type(),
        });
    }
    Ok(info)
}
