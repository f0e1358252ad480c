//! DDS header structures.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Magic, main header and extension header.
pub const MAX_HEADER_LEN: usize = 4 + DdsHeader::SIZE as usize + 20;

/// DDS file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeader {
    /// Header size (should be 124).
    pub size: u32,
    /// Header flags.
    pub flags: u32,
    /// Image height.
    pub height: u32,
    /// Image width.
    pub width: u32,
    /// Pitch or linear size.
    pub pitch_or_linear_size: u32,
    /// Depth (for volume textures).
    pub depth: u32,
    /// Number of mipmap levels.
    pub mipmap_count: u32,
    /// Reserved.
    pub reserved1: [u32; 11],
    /// Pixel format.
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities.
    pub caps: u32,
    /// Surface capabilities 2.
    pub caps2: u32,
    /// Surface capabilities 3.
    pub caps3: u32,
    /// Surface capabilities 4.
    pub caps4: u32,
    /// Reserved.
    pub reserved2: u32,
}

impl DdsHeader {
    /// Expected header size.
    pub const SIZE: u32 = 124;

    pub const FLAG_CAPS: u32 = 0x1;
    pub const FLAG_HEIGHT: u32 = 0x2;
    pub const FLAG_WIDTH: u32 = 0x4;
    pub const FLAG_PITCH: u32 = 0x8;
    pub const FLAG_PIXELFORMAT: u32 = 0x1000;
    pub const FLAG_MIPMAPCOUNT: u32 = 0x20000;
    pub const FLAG_LINEARSIZE: u32 = 0x80000;
    pub const FLAG_DEPTH: u32 = 0x80_0000;

    pub const CAPS_COMPLEX: u32 = 0x8;
    pub const CAPS_TEXTURE: u32 = 0x1000;
    pub const CAPS_MIPMAP: u32 = 0x40_0000;

    pub const CAPS2_CUBEMAP: u32 = 0x200;
    pub const CAPS2_VOLUME: u32 = 0x20_0000;

    /// Header for a single-surface 2D texture without mipmaps.
    ///
    /// `pitch` is the number of bytes per row of the top-level surface.
    pub fn texture_2d(width: u32, height: u32, pitch: u32, pixel_format: DdsPixelFormat) -> Self {
        Self {
            size: Self::SIZE,
            flags: Self::FLAG_CAPS
                | Self::FLAG_HEIGHT
                | Self::FLAG_WIDTH
                | Self::FLAG_PITCH
                | Self::FLAG_PIXELFORMAT
                | Self::FLAG_MIPMAPCOUNT,
            height,
            width,
            pitch_or_linear_size: pitch,
            depth: 0,
            mipmap_count: 1,
            reserved1: [0; 11],
            pixel_format,
            caps: Self::CAPS_TEXTURE,
            caps2: 0,
            caps3: 0,
            caps4: 0,
            reserved2: 0,
        }
    }

    /// Check if this is a DX10 extended header.
    pub fn is_dx10(&self) -> bool {
        self.pixel_format.has_four_cc() && self.pixel_format.four_cc == FourCC::DX10
    }

    /// Check if an extension block follows the header (`DX10`, `TXA1` or `GLI1`).
    pub fn has_extension(&self) -> bool {
        let four_cc = self.pixel_format.four_cc;
        self.pixel_format.has_four_cc()
            && (four_cc == FourCC::DX10 || four_cc == FourCC::TXA1 || four_cc == FourCC::GLI1)
    }

    /// Check if the texture is a cubemap according to the legacy caps.
    pub fn is_cubemap(&self) -> bool {
        self.caps2 & Self::CAPS2_CUBEMAP != 0
    }

    /// Depth of a volume texture, 1 for anything else.
    pub fn volume_depth(&self) -> u32 {
        if self.flags & Self::FLAG_DEPTH != 0 || self.caps2 & Self::CAPS2_VOLUME != 0 {
            self.depth.max(1)
        } else {
            1
        }
    }
}

/// DDS pixel format.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsPixelFormat {
    /// Structure size (should be 32).
    pub size: u32,
    /// Pixel format flags.
    pub flags: u32,
    /// Four-character code for compressed or extended formats.
    pub four_cc: FourCC,
    /// Number of bits per pixel (for uncompressed).
    pub rgb_bit_count: u32,
    /// Red bit mask.
    pub r_bit_mask: u32,
    /// Green bit mask.
    pub g_bit_mask: u32,
    /// Blue bit mask.
    pub b_bit_mask: u32,
    /// Alpha bit mask.
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    /// Expected structure size.
    pub const SIZE: u32 = 32;

    pub const ALPHAPIXELS: u32 = 0x1;
    pub const ALPHA: u32 = 0x2;
    pub const FOURCC: u32 = 0x4;
    pub const RGB: u32 = 0x40;
    pub const LUMINANCE: u32 = 0x2_0000;

    /// Pixel format identified only by a four-character code.
    pub fn with_four_cc(four_cc: FourCC) -> Self {
        Self {
            size: Self::SIZE,
            flags: Self::FOURCC,
            four_cc,
            rgb_bit_count: 0,
            r_bit_mask: 0,
            g_bit_mask: 0,
            b_bit_mask: 0,
            a_bit_mask: 0,
        }
    }

    /// Pixel format described by channel bit masks.
    pub fn with_masks(flags: u32, rgb_bit_count: u32, masks: [u32; 4]) -> Self {
        Self {
            size: Self::SIZE,
            flags,
            four_cc: FourCC([0; 4]),
            rgb_bit_count,
            r_bit_mask: masks[0],
            g_bit_mask: masks[1],
            b_bit_mask: masks[2],
            a_bit_mask: masks[3],
        }
    }

    /// Check if the four-character code field is in use.
    #[inline]
    pub fn has_four_cc(&self) -> bool {
        self.flags & Self::FOURCC != 0
    }

    /// Red, green, blue and alpha masks.
    #[inline]
    pub fn masks(&self) -> [u32; 4] {
        [self.r_bit_mask, self.g_bit_mask, self.b_bit_mask, self.a_bit_mask]
    }
}

/// Four-character code for compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(transparent)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    /// DX10 extended header.
    pub const DX10: Self = Self(*b"DX10");
    /// Extended header carrying a [`PixelFormat::code`](crate::PixelFormat::code)
    /// instead of a DXGI one.
    pub const TXA1: Self = Self(*b"TXA1");
    /// gli's extended header. Its format numbering is gli's own, so the
    /// extension is parsed but the format is never resolved.
    pub const GLI1: Self = Self(*b"GLI1");

    /// Legacy D3D formats are stored as a little-endian integer in place of
    /// the characters.
    #[inline]
    pub const fn from_d3d(code: u32) -> Self {
        Self(code.to_le_bytes())
    }

    /// The code read as a little-endian integer.
    #[inline]
    pub const fn as_u32(self) -> u32 {
        u32::from_le_bytes(self.0)
    }
}

/// DX10 extended header.
///
/// Files tagged `TXA1` use the same layout, with `dxgi_format` holding a
/// catalog format code.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct DdsHeaderDxt10 {
    /// DXGI format.
    pub dxgi_format: u32,
    /// Resource dimension.
    pub resource_dimension: u32,
    /// Misc flags.
    pub misc_flag: u32,
    /// Array size.
    pub array_size: u32,
    /// Misc flags 2.
    pub misc_flags2: u32,
}

impl DdsHeaderDxt10 {
    pub const DIMENSION_TEXTURE1D: u32 = 2;
    pub const DIMENSION_TEXTURE2D: u32 = 3;
    pub const DIMENSION_TEXTURE3D: u32 = 4;

    /// Cubemap flag in `misc_flag`.
    pub const MISC_TEXTURECUBE: u32 = 0x4;

    /// Extension for a single 2D texture.
    pub fn texture_2d(format: u32) -> Self {
        Self {
            dxgi_format: format,
            resource_dimension: Self::DIMENSION_TEXTURE2D,
            misc_flag: 0,
            array_size: 1,
            misc_flags2: 0,
        }
    }

    /// Check if the resource is a cubemap.
    pub fn is_cubemap(&self) -> bool {
        self.misc_flag & Self::MISC_TEXTURECUBE != 0
    }
}

/// Size in bytes of an uncompressed surface.
pub fn surface_size(width: u32, height: u32, depth: u32, bytes_per_pixel: usize) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(depth as usize)?
        .checked_mul(bytes_per_pixel)
}

/// Size in bytes of a full mip chain for one array layer or cube face.
pub fn mip_chain_size(
    width: u32,
    height: u32,
    depth: u32,
    mip_count: u32,
    bytes_per_pixel: usize,
) -> Option<usize> {
    let mut total = 0usize;
    for level in 0..mip_count.min(32) {
        let w = (width >> level).max(1);
        let h = (height >> level).max(1);
        let d = (depth >> level).max(1);
        total = total.checked_add(surface_size(w, h, d, bytes_per_pixel)?)?;
    }
    Some(total)
}
