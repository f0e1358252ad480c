//! Mapping between catalog formats and DDS pixel-format descriptors.
//!
//! A format can be named in a DDS file three ways: a DXGI code in the DX10
//! extension, a legacy D3D format stored in the FourCC field, or channel bit
//! masks. Formats DXGI cannot express are written with a `TXA1` extension
//! holding [`PixelFormat::code`].

use tracing::trace;

use crate::format::PixelFormat;
use crate::header::{DdsHeader, DdsHeaderDxt10, DdsPixelFormat, FourCC};
use crate::{Error, Result};

/// Canonical DXGI code for each format that has one. One-to-one, so a
/// format written through DX10 is detected as the same format on load.
const DXGI_FORMATS: &[(PixelFormat, u32)] = &[
    (PixelFormat::RGBA32_SFLOAT_PACK32, 2),
    (PixelFormat::RGBA32_UINT_PACK32, 3),
    (PixelFormat::RGBA32_SINT_PACK32, 4),
    (PixelFormat::RGB32_SFLOAT_PACK32, 6),
    (PixelFormat::RGB32_UINT_PACK32, 7),
    (PixelFormat::RGB32_SINT_PACK32, 8),
    (PixelFormat::RGBA16_SFLOAT_PACK16, 10),
    (PixelFormat::RGBA16_UNORM_PACK16, 11),
    (PixelFormat::RGBA16_UINT_PACK16, 12),
    (PixelFormat::RGBA16_SNORM_PACK16, 13),
    (PixelFormat::RGBA16_SINT_PACK16, 14),
    (PixelFormat::RG32_SFLOAT_PACK32, 16),
    (PixelFormat::RG32_UINT_PACK32, 17),
    (PixelFormat::RG32_SINT_PACK32, 18),
    (PixelFormat::RGBA8_UNORM_PACK8, 28),
    (PixelFormat::RGBA8_SRGB_PACK8, 29),
    (PixelFormat::RGBA8_UINT_PACK8, 30),
    (PixelFormat::RGBA8_SNORM_PACK8, 31),
    (PixelFormat::RGBA8_SINT_PACK8, 32),
    (PixelFormat::RG16_SFLOAT_PACK16, 34),
    (PixelFormat::RG16_UNORM_PACK16, 35),
    (PixelFormat::RG16_UINT_PACK16, 36),
    (PixelFormat::RG16_SNORM_PACK16, 37),
    (PixelFormat::RG16_SINT_PACK16, 38),
    (PixelFormat::R32_SFLOAT_PACK32, 41),
    (PixelFormat::R32_UINT_PACK32, 42),
    (PixelFormat::R32_SINT_PACK32, 43),
    (PixelFormat::RG8_UNORM_PACK8, 49),
    (PixelFormat::RG8_UINT_PACK8, 50),
    (PixelFormat::RG8_SNORM_PACK8, 51),
    (PixelFormat::RG8_SINT_PACK8, 52),
    (PixelFormat::R16_SFLOAT_PACK16, 54),
    (PixelFormat::R16_UNORM_PACK16, 56),
    (PixelFormat::R16_UINT_PACK16, 57),
    (PixelFormat::R16_SNORM_PACK16, 58),
    (PixelFormat::R16_SINT_PACK16, 59),
    (PixelFormat::R8_UNORM_PACK8, 61),
    (PixelFormat::R8_UINT_PACK8, 62),
    (PixelFormat::R8_SNORM_PACK8, 63),
    (PixelFormat::R8_SINT_PACK8, 64),
    (PixelFormat::BGRA8_UNORM_PACK8, 87),
    (PixelFormat::BGRA8_SRGB_PACK8, 91),
];

/// Legacy D3D formats stored as integers in the FourCC field.
const D3D_FORMATS: &[(PixelFormat, u32)] = &[
    (PixelFormat::RGBA16_UNORM_PACK16, 36),
    (PixelFormat::RGBA16_SNORM_PACK16, 110),
    (PixelFormat::R16_SFLOAT_PACK16, 111),
    (PixelFormat::RG16_SFLOAT_PACK16, 112),
    (PixelFormat::RGBA16_SFLOAT_PACK16, 113),
    (PixelFormat::R32_SFLOAT_PACK32, 114),
    (PixelFormat::RG32_SFLOAT_PACK32, 115),
    (PixelFormat::RGBA32_SFLOAT_PACK32, 116),
];

/// Legacy bit-mask layouts. When several layouts map to the same format,
/// the first one is used for writing.
struct MaskLayout {
    format: PixelFormat,
    flags: u32,
    bit_count: u32,
    masks: [u32; 4],
}

const MASK_LAYOUTS: &[MaskLayout] = &[
    MaskLayout {
        format: PixelFormat::RGBA8_UNORM_PACK8,
        flags: DdsPixelFormat::RGB | DdsPixelFormat::ALPHAPIXELS,
        bit_count: 32,
        masks: [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000],
    },
    MaskLayout {
        format: PixelFormat::BGRA8_UNORM_PACK8,
        flags: DdsPixelFormat::RGB | DdsPixelFormat::ALPHAPIXELS,
        bit_count: 32,
        masks: [0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000],
    },
    MaskLayout {
        format: PixelFormat::RGB8_UNORM_PACK8,
        flags: DdsPixelFormat::RGB,
        bit_count: 24,
        masks: [0xFF, 0xFF00, 0xFF_0000, 0],
    },
    MaskLayout {
        format: PixelFormat::BGR8_UNORM_PACK8,
        flags: DdsPixelFormat::RGB,
        bit_count: 24,
        masks: [0xFF_0000, 0xFF00, 0xFF, 0],
    },
    MaskLayout {
        format: PixelFormat::RG16_UNORM_PACK16,
        flags: DdsPixelFormat::RGB,
        bit_count: 32,
        masks: [0xFFFF, 0xFFFF_0000, 0, 0],
    },
    MaskLayout {
        format: PixelFormat::RG8_UNORM_PACK8,
        flags: DdsPixelFormat::RGB,
        bit_count: 16,
        masks: [0xFF, 0xFF00, 0, 0],
    },
    // A8L8
    MaskLayout {
        format: PixelFormat::RG8_UNORM_PACK8,
        flags: DdsPixelFormat::LUMINANCE | DdsPixelFormat::ALPHAPIXELS,
        bit_count: 16,
        masks: [0xFF, 0, 0, 0xFF00],
    },
    MaskLayout {
        format: PixelFormat::R16_UNORM_PACK16,
        flags: DdsPixelFormat::LUMINANCE,
        bit_count: 16,
        masks: [0xFFFF, 0, 0, 0],
    },
    MaskLayout {
        format: PixelFormat::R8_UNORM_PACK8,
        flags: DdsPixelFormat::LUMINANCE,
        bit_count: 8,
        masks: [0xFF, 0, 0, 0],
    },
];

impl PixelFormat {
    /// DXGI code of the format, if DXGI can express it.
    pub fn dxgi_format(self) -> Option<u32> {
        DXGI_FORMATS
            .iter()
            .find(|(format, _)| *format == self)
            .map(|&(_, code)| code)
    }

    /// Resolve a DXGI code.
    pub fn from_dxgi(code: u32) -> Result<Self> {
        DXGI_FORMATS
            .iter()
            .find(|(_, dxgi)| *dxgi == code)
            .map(|&(format, _)| format)
            .ok_or_else(|| Error::UnsupportedFormat(format!("DXGI format {code}")))
    }

    /// Legacy descriptor for the format, if one exists.
    pub fn legacy_pixel_format(self) -> Option<DdsPixelFormat> {
        if let Some(&(_, code)) = D3D_FORMATS.iter().find(|(format, _)| *format == self) {
            return Some(DdsPixelFormat::with_four_cc(FourCC::from_d3d(code)));
        }
        MASK_LAYOUTS
            .iter()
            .find(|layout| layout.format == self)
            .map(|layout| DdsPixelFormat::with_masks(layout.flags, layout.bit_count, layout.masks))
    }
}

/// Determine the catalog format a header describes.
///
/// `extension` must be present when [`DdsHeader::has_extension`] is true.
pub fn resolve_format(header: &DdsHeader, extension: Option<&DdsHeaderDxt10>) -> Result<PixelFormat> {
    let pixel_format = header.pixel_format;

    if header.has_extension() {
        let four_cc = pixel_format.four_cc;
        let ext = extension.ok_or_else(|| Error::MalformedHeader("missing extended header".into()))?;
        let code = ext.dxgi_format;
        trace!(four_cc = ?four_cc.0, code, "resolving extended format");
        return if header.is_dx10() {
            PixelFormat::from_dxgi(code)
        } else if four_cc == FourCC::TXA1 {
            PixelFormat::from_code(code)
        } else {
            Err(Error::UnsupportedFormat(format!("gli extended format {code}")))
        };
    }

    if pixel_format.has_four_cc() {
        let four_cc = pixel_format.four_cc;
        let code = four_cc.as_u32();
        trace!(code, "resolving legacy FourCC format");
        return D3D_FORMATS
            .iter()
            .find(|(_, d3d)| *d3d == code)
            .map(|&(format, _)| format)
            .ok_or_else(|| Error::UnsupportedFormat(describe_four_cc(four_cc)));
    }

    let bit_count = pixel_format.rgb_bit_count;
    let masks = pixel_format.masks();
    trace!(bit_count, ?masks, "resolving bit-mask format");

    MASK_LAYOUTS
        .iter()
        .find(|layout| layout.bit_count == bit_count && layout.masks == masks)
        .map(|layout| layout.format)
        .ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "{bit_count}-bit masks {:#x}/{:#x}/{:#x}/{:#x}",
                masks[0], masks[1], masks[2], masks[3]
            ))
        })
}

fn describe_four_cc(four_cc: FourCC) -> String {
    if four_cc.0.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        format!("FourCC '{}'", String::from_utf8_lossy(&four_cc.0))
    } else {
        format!("D3D format {}", four_cc.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn header_with(pixel_format: DdsPixelFormat) -> DdsHeader {
        DdsHeader::texture_2d(1, 1, 4, pixel_format)
    }

    #[test]
    fn test_dxgi_codes_are_one_to_one() {
        let mut codes = HashSet::new();
        let mut formats = HashSet::new();
        for &(format, code) in DXGI_FORMATS {
            assert!(codes.insert(code), "duplicate DXGI code {code}");
            assert!(formats.insert(format), "duplicate DXGI format {format}");
            assert_eq!(PixelFormat::from_dxgi(code).unwrap(), format);
            assert_eq!(format.dxgi_format(), Some(code));
        }
    }

    #[test]
    fn test_legacy_descriptors_resolve_back() {
        for &format in PixelFormat::ALL {
            if let Some(pixel_format) = format.legacy_pixel_format() {
                let resolved = resolve_format(&header_with(pixel_format), None).unwrap();
                assert_eq!(resolved, format);
            }
        }
    }

    #[test]
    fn test_extension_resolution() {
        let header = header_with(DdsPixelFormat::with_four_cc(FourCC::DX10));
        let ext = DdsHeaderDxt10::texture_2d(62);
        assert_eq!(
            resolve_format(&header, Some(&ext)).unwrap(),
            PixelFormat::R8_UINT_PACK8
        );

        let header = header_with(DdsPixelFormat::with_four_cc(FourCC::TXA1));
        let ext = DdsHeaderDxt10::texture_2d(PixelFormat::RGB16_UNORM_PACK16.code());
        assert_eq!(
            resolve_format(&header, Some(&ext)).unwrap(),
            PixelFormat::RGB16_UNORM_PACK16
        );

        assert!(matches!(
            resolve_format(&header, None),
            Err(Error::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_gli_extension_is_unsupported() {
        // 23 is a catalog code here, but gli numbers its extension differently.
        let header = header_with(DdsPixelFormat::with_four_cc(FourCC::GLI1));
        let ext = DdsHeaderDxt10::texture_2d(PixelFormat::RG8_SSCALED_PACK8.code());
        match resolve_format(&header, Some(&ext)) {
            Err(Error::UnsupportedFormat(message)) => assert!(message.contains("gli")),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_a8l8_reads_as_rg8() {
        let pixel_format = DdsPixelFormat::with_masks(
            DdsPixelFormat::LUMINANCE | DdsPixelFormat::ALPHAPIXELS,
            16,
            [0xFF, 0, 0, 0xFF00],
        );
        assert_eq!(
            resolve_format(&header_with(pixel_format), None).unwrap(),
            PixelFormat::RG8_UNORM_PACK8
        );
    }

    #[test]
    fn test_block_compressed_is_unsupported() {
        let header = header_with(DdsPixelFormat::with_four_cc(FourCC(*b"DXT1")));
        match resolve_format(&header, None) {
            Err(Error::UnsupportedFormat(message)) => assert!(message.contains("DXT1")),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }

        // BC7 through DX10
        let header = header_with(DdsPixelFormat::with_four_cc(FourCC::DX10));
        let ext = DdsHeaderDxt10::texture_2d(98);
        assert!(matches!(
            resolve_format(&header, Some(&ext)),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unknown_masks_are_unsupported() {
        // R5G6B5
        let pixel_format =
            DdsPixelFormat::with_masks(DdsPixelFormat::RGB, 16, [0xF800, 0x07E0, 0x001F, 0]);
        assert!(matches!(
            resolve_format(&header_with(pixel_format), None),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
