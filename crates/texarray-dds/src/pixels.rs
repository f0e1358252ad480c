//! Conversion between little-endian pixel payloads and typed image storage.

use byteorder::{ByteOrder, LittleEndian};
use half::f16;

use crate::format::{ElementType, FormatInfo};
use crate::image::ImageData;

/// Decode a payload into typed storage.
///
/// `bytes.len()` must be a multiple of `info.byte_width`. Values are
/// reinterpreted bit-exactly, except 16-bit floats which widen to `f32`.
pub(crate) fn decode(bytes: &[u8], info: &FormatInfo) -> ImageData {
    let count = bytes.len() / info.byte_width;

    match info.element_type {
        ElementType::U8 => ImageData::U8(bytes.to_vec()),
        ElementType::I8 => ImageData::I8(bytes.iter().map(|&b| b as i8).collect()),
        ElementType::U16 => {
            let mut out = vec![0u16; count];
            LittleEndian::read_u16_into(bytes, &mut out);
            ImageData::U16(out)
        }
        ElementType::I16 => {
            let mut out = vec![0i16; count];
            LittleEndian::read_i16_into(bytes, &mut out);
            ImageData::I16(out)
        }
        ElementType::U32 => {
            let mut out = vec![0u32; count];
            LittleEndian::read_u32_into(bytes, &mut out);
            ImageData::U32(out)
        }
        ElementType::I32 => {
            let mut out = vec![0i32; count];
            LittleEndian::read_i32_into(bytes, &mut out);
            ImageData::I32(out)
        }
        ElementType::U64 => {
            let mut out = vec![0u64; count];
            LittleEndian::read_u64_into(bytes, &mut out);
            ImageData::U64(out)
        }
        ElementType::I64 => {
            let mut out = vec![0i64; count];
            LittleEndian::read_i64_into(bytes, &mut out);
            ImageData::I64(out)
        }
        ElementType::F32 if info.byte_width == 2 => {
            let mut bits = vec![0u16; count];
            LittleEndian::read_u16_into(bytes, &mut bits);
            ImageData::F32(bits.into_iter().map(|b| f16::from_bits(b).to_f32()).collect())
        }
        ElementType::F32 => {
            let mut out = vec![0f32; count];
            LittleEndian::read_f32_into(bytes, &mut out);
            ImageData::F32(out)
        }
        ElementType::F64 => {
            let mut out = vec![0f64; count];
            LittleEndian::read_f64_into(bytes, &mut out);
            ImageData::F64(out)
        }
    }
}

/// Encode typed storage into `out`.
///
/// The storage type must match `info.element_type` and `out.len()` must be
/// `data.len() * info.byte_width`. 16-bit float targets round to nearest.
pub(crate) fn encode(data: &ImageData, info: &FormatInfo, out: &mut [u8]) {
    match data {
        ImageData::U8(v) => out.copy_from_slice(v),
        ImageData::I8(v) => {
            for (dst, &src) in out.iter_mut().zip(v) {
                *dst = src as u8;
            }
        }
        ImageData::U16(v) => LittleEndian::write_u16_into(v, out),
        ImageData::I16(v) => LittleEndian::write_i16_into(v, out),
        ImageData::U32(v) => LittleEndian::write_u32_into(v, out),
        ImageData::I32(v) => LittleEndian::write_i32_into(v, out),
        ImageData::U64(v) => LittleEndian::write_u64_into(v, out),
        ImageData::I64(v) => LittleEndian::write_i64_into(v, out),
        ImageData::F32(v) if info.byte_width == 2 => {
            let bits: Vec<u16> = v.iter().map(|&x| f16::from_f32(x).to_bits()).collect();
            LittleEndian::write_u16_into(&bits, out);
        }
        ImageData::F32(v) => LittleEndian::write_f32_into(v, out),
        ImageData::F64(v) => LittleEndian::write_f64_into(v, out),
    }
}
