//! Pixel format catalog.
//!
//! Every format the codec understands is a variant of [`PixelFormat`]. The
//! catalog is closed: each variant maps to exactly one [`FormatInfo`], and
//! identifiers that arrive as strings or numeric codes are checked against
//! it before anything else touches the pixel data.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// How the stored bits of a channel are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumericClass {
    /// Unsigned integer, by convention mapped to [0, 1].
    Unorm,
    /// Signed integer, by convention mapped to [-1, 1].
    Snorm,
    /// Unsigned integer converted to float without normalization.
    Uscaled,
    /// Signed integer converted to float without normalization.
    Sscaled,
    /// Unsigned integer.
    Uint,
    /// Signed integer.
    Sint,
    /// Unsigned normalized integer in the sRGB transfer curve.
    Srgb,
    /// IEEE-754 floating point.
    Sfloat,
}

impl NumericClass {
    /// Whether stored values carry a sign.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            NumericClass::Snorm | NumericClass::Sscaled | NumericClass::Sint | NumericClass::Sfloat
        )
    }
}

/// In-memory element type of a decoded image.
///
/// Integer formats keep their stored width and signedness. Floating point
/// formats decode to `F32` (16- and 32-bit) or `F64` (64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in memory.
    pub const fn size(self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::U16 | ElementType::I16 => 2,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 4,
            ElementType::U64 | ElementType::I64 | ElementType::F64 => 8,
        }
    }

    /// Lowercase name as used by array libraries (`uint8`, `float32`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::I8 => "int8",
            ElementType::U16 => "uint16",
            ElementType::I16 => "int16",
            ElementType::U32 => "uint32",
            ElementType::I32 => "int32",
            ElementType::U64 => "uint64",
            ElementType::I64 => "int64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout description of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatInfo {
    /// Channels per pixel (1 to 4).
    pub channels: usize,
    /// Stored bytes per channel.
    pub byte_width: usize,
    /// Interpretation of the stored bits.
    pub numeric_class: NumericClass,
    /// Element type of the decoded image.
    pub element_type: ElementType,
}

impl FormatInfo {
    /// Stored bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.channels * self.byte_width
    }

    /// Whether the stored width differs from the decoded element width
    /// (16-bit floats widen to `f32`).
    #[inline]
    pub const fn is_widened(&self) -> bool {
        self.byte_width != self.element_type.size()
    }
}

/// Look up the layout of a pixel format.
#[inline]
pub const fn describe(format: PixelFormat) -> FormatInfo {
    format.info()
}

macro_rules! pixel_formats {
    ($($name:ident = $code:literal => ($channels:literal, $width:literal, $class:ident, $elem:ident),)+) => {
        /// Uncompressed pixel formats.
        ///
        /// Identifiers spell out channel order, bits per channel, numeric
        /// class and packing unit, e.g. `RGBA16_SFLOAT_PACK16`.
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum PixelFormat {
            $($name,)+
        }

        impl PixelFormat {
            /// Every format in the catalog.
            pub const ALL: &'static [PixelFormat] = &[$(PixelFormat::$name,)+];

            /// Stable numeric code, used for formats stored in the `TXA1`
            /// header extension.
            pub const fn code(self) -> u32 {
                match self {
                    $(PixelFormat::$name => $code,)+
                }
            }

            /// Identifier of the format.
            pub const fn name(self) -> &'static str {
                match self {
                    $(PixelFormat::$name => stringify!($name),)+
                }
            }

            /// Layout of the format.
            pub const fn info(self) -> FormatInfo {
                match self {
                    $(PixelFormat::$name => FormatInfo {
                        channels: $channels,
                        byte_width: $width,
                        numeric_class: NumericClass::$class,
                        element_type: ElementType::$elem,
                    },)+
                }
            }

            /// Resolve a numeric code produced by [`PixelFormat::code`].
            pub fn from_code(code: u32) -> Result<Self> {
                match code {
                    $($code => Ok(PixelFormat::$name),)+
                    _ => Err(Error::UnsupportedFormat(format!("format code {code}"))),
                }
            }

            /// Resolve a format identifier such as `"R8_UNORM_PACK8"`.
            pub fn from_name(name: &str) -> Result<Self> {
                match name {
                    $(stringify!($name) => Ok(PixelFormat::$name),)+
                    _ => Err(Error::UnsupportedFormat(name.to_string())),
                }
            }
        }
    };
}

pixel_formats! {
    R8_UNORM_PACK8 = 10 => (1, 1, Unorm, U8),
    R8_SNORM_PACK8 = 11 => (1, 1, Snorm, I8),
    R8_USCALED_PACK8 = 12 => (1, 1, Uscaled, U8),
    R8_SSCALED_PACK8 = 13 => (1, 1, Sscaled, I8),
    R8_UINT_PACK8 = 14 => (1, 1, Uint, U8),
    R8_SINT_PACK8 = 15 => (1, 1, Sint, I8),
    R8_SRGB_PACK8 = 16 => (1, 1, Srgb, U8),

    RG8_UNORM_PACK8 = 20 => (2, 1, Unorm, U8),
    RG8_SNORM_PACK8 = 21 => (2, 1, Snorm, I8),
    RG8_USCALED_PACK8 = 22 => (2, 1, Uscaled, U8),
    RG8_SSCALED_PACK8 = 23 => (2, 1, Sscaled, I8),
    RG8_UINT_PACK8 = 24 => (2, 1, Uint, U8),
    RG8_SINT_PACK8 = 25 => (2, 1, Sint, I8),
    RG8_SRGB_PACK8 = 26 => (2, 1, Srgb, U8),

    RGB8_UNORM_PACK8 = 30 => (3, 1, Unorm, U8),
    RGB8_SNORM_PACK8 = 31 => (3, 1, Snorm, I8),
    RGB8_USCALED_PACK8 = 32 => (3, 1, Uscaled, U8),
    RGB8_SSCALED_PACK8 = 33 => (3, 1, Sscaled, I8),
    RGB8_UINT_PACK8 = 34 => (3, 1, Uint, U8),
    RGB8_SINT_PACK8 = 35 => (3, 1, Sint, I8),
    RGB8_SRGB_PACK8 = 36 => (3, 1, Srgb, U8),

    BGR8_UNORM_PACK8 = 40 => (3, 1, Unorm, U8),
    BGR8_SNORM_PACK8 = 41 => (3, 1, Snorm, I8),
    BGR8_USCALED_PACK8 = 42 => (3, 1, Uscaled, U8),
    BGR8_SSCALED_PACK8 = 43 => (3, 1, Sscaled, I8),
    BGR8_UINT_PACK8 = 44 => (3, 1, Uint, U8),
    BGR8_SINT_PACK8 = 45 => (3, 1, Sint, I8),
    BGR8_SRGB_PACK8 = 46 => (3, 1, Srgb, U8),

    RGBA8_UNORM_PACK8 = 50 => (4, 1, Unorm, U8),
    RGBA8_SNORM_PACK8 = 51 => (4, 1, Snorm, I8),
    RGBA8_USCALED_PACK8 = 52 => (4, 1, Uscaled, U8),
    RGBA8_SSCALED_PACK8 = 53 => (4, 1, Sscaled, I8),
    RGBA8_UINT_PACK8 = 54 => (4, 1, Uint, U8),
    RGBA8_SINT_PACK8 = 55 => (4, 1, Sint, I8),
    RGBA8_SRGB_PACK8 = 56 => (4, 1, Srgb, U8),

    BGRA8_UNORM_PACK8 = 60 => (4, 1, Unorm, U8),
    BGRA8_SRGB_PACK8 = 66 => (4, 1, Srgb, U8),

    RGBA8_UNORM_PACK32 = 70 => (4, 1, Unorm, U8),
    RGBA8_SNORM_PACK32 = 71 => (4, 1, Snorm, I8),
    RGBA8_USCALED_PACK32 = 72 => (4, 1, Uscaled, U8),
    RGBA8_SSCALED_PACK32 = 73 => (4, 1, Sscaled, I8),
    RGBA8_UINT_PACK32 = 74 => (4, 1, Uint, U8),
    RGBA8_SINT_PACK32 = 75 => (4, 1, Sint, I8),
    RGBA8_SRGB_PACK32 = 76 => (4, 1, Srgb, U8),

    R16_UNORM_PACK16 = 80 => (1, 2, Unorm, U16),
    R16_SNORM_PACK16 = 81 => (1, 2, Snorm, I16),
    R16_USCALED_PACK16 = 82 => (1, 2, Uscaled, U16),
    R16_SSCALED_PACK16 = 83 => (1, 2, Sscaled, I16),
    R16_UINT_PACK16 = 84 => (1, 2, Uint, U16),
    R16_SINT_PACK16 = 85 => (1, 2, Sint, I16),
    R16_SFLOAT_PACK16 = 86 => (1, 2, Sfloat, F32),

    RG16_UNORM_PACK16 = 90 => (2, 2, Unorm, U16),
    RG16_SNORM_PACK16 = 91 => (2, 2, Snorm, I16),
    RG16_USCALED_PACK16 = 92 => (2, 2, Uscaled, U16),
    RG16_SSCALED_PACK16 = 93 => (2, 2, Sscaled, I16),
    RG16_UINT_PACK16 = 94 => (2, 2, Uint, U16),
    RG16_SINT_PACK16 = 95 => (2, 2, Sint, I16),
    RG16_SFLOAT_PACK16 = 96 => (2, 2, Sfloat, F32),

    RGB16_UNORM_PACK16 = 100 => (3, 2, Unorm, U16),
    RGB16_SNORM_PACK16 = 101 => (3, 2, Snorm, I16),
    RGB16_USCALED_PACK16 = 102 => (3, 2, Uscaled, U16),
    RGB16_SSCALED_PACK16 = 103 => (3, 2, Sscaled, I16),
    RGB16_UINT_PACK16 = 104 => (3, 2, Uint, U16),
    RGB16_SINT_PACK16 = 105 => (3, 2, Sint, I16),
    RGB16_SFLOAT_PACK16 = 106 => (3, 2, Sfloat, F32),

    RGBA16_UNORM_PACK16 = 110 => (4, 2, Unorm, U16),
    RGBA16_SNORM_PACK16 = 111 => (4, 2, Snorm, I16),
    RGBA16_USCALED_PACK16 = 112 => (4, 2, Uscaled, U16),
    RGBA16_SSCALED_PACK16 = 113 => (4, 2, Sscaled, I16),
    RGBA16_UINT_PACK16 = 114 => (4, 2, Uint, U16),
    RGBA16_SINT_PACK16 = 115 => (4, 2, Sint, I16),
    RGBA16_SFLOAT_PACK16 = 116 => (4, 2, Sfloat, F32),

    R32_UINT_PACK32 = 120 => (1, 4, Uint, U32),
    R32_SINT_PACK32 = 121 => (1, 4, Sint, I32),
    R32_SFLOAT_PACK32 = 122 => (1, 4, Sfloat, F32),

    RG32_UINT_PACK32 = 130 => (2, 4, Uint, U32),
    RG32_SINT_PACK32 = 131 => (2, 4, Sint, I32),
    RG32_SFLOAT_PACK32 = 132 => (2, 4, Sfloat, F32),

    RGB32_UINT_PACK32 = 140 => (3, 4, Uint, U32),
    RGB32_SINT_PACK32 = 141 => (3, 4, Sint, I32),
    RGB32_SFLOAT_PACK32 = 142 => (3, 4, Sfloat, F32),

    RGBA32_UINT_PACK32 = 150 => (4, 4, Uint, U32),
    RGBA32_SINT_PACK32 = 151 => (4, 4, Sint, I32),
    RGBA32_SFLOAT_PACK32 = 152 => (4, 4, Sfloat, F32),

    R64_UINT_PACK64 = 160 => (1, 8, Uint, U64),
    R64_SINT_PACK64 = 161 => (1, 8, Sint, I64),
    R64_SFLOAT_PACK64 = 162 => (1, 8, Sfloat, F64),

    RG64_UINT_PACK64 = 170 => (2, 8, Uint, U64),
    RG64_SINT_PACK64 = 171 => (2, 8, Sint, I64),
    RG64_SFLOAT_PACK64 = 172 => (2, 8, Sfloat, F64),

    RGB64_UINT_PACK64 = 180 => (3, 8, Uint, U64),
    RGB64_SINT_PACK64 = 181 => (3, 8, Sint, I64),
    RGB64_SFLOAT_PACK64 = 182 => (3, 8, Sfloat, F64),

    RGBA64_UINT_PACK64 = 190 => (4, 8, Uint, U64),
    RGBA64_SINT_PACK64 = 191 => (4, 8, Sint, I64),
    RGBA64_SFLOAT_PACK64 = 192 => (4, 8, Sfloat, F64),
}

impl PixelFormat {
    /// Channels per pixel.
    #[inline]
    pub const fn channels(self) -> usize {
        self.info().channels
    }

    /// Stored bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self.info().bytes_per_pixel()
    }

    /// Element type of images in this format.
    #[inline]
    pub const fn element_type(self) -> ElementType {
        self.info().element_type
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
