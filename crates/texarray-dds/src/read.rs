//! DDS loading.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use texarray_common::BinaryReader;
use tracing::{debug, trace, warn};

use crate::descriptor::resolve_format;
use crate::format::PixelFormat;
use crate::header::{
    mip_chain_size, surface_size, DdsHeader, DdsHeaderDxt10, DdsPixelFormat, MAX_HEADER_LEN,
};
use crate::image::Image;
use crate::pixels;
use crate::{Error, Result, DDS_MAGIC};

/// Metadata parsed from a DDS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdsInfo {
    pub width: u32,
    pub height: u32,
    /// Depth of a volume texture, 1 otherwise.
    pub depth: u32,
    /// Mip levels per layer (at least 1).
    pub mip_count: u32,
    /// Array elements (at least 1).
    pub array_layers: u32,
    /// 6 for cubemaps, 1 otherwise.
    pub faces: u32,
    pub format: PixelFormat,
}

impl DdsInfo {
    /// Number of separately addressable surfaces: array layers times faces.
    pub fn layer_count(&self) -> usize {
        self.array_layers as usize * self.faces as usize
    }

    pub fn is_cubemap(&self) -> bool {
        self.faces == 6
    }

    /// Bytes of the top-level 2D surface of one layer.
    pub fn surface_size(&self) -> Option<usize> {
        surface_size(self.width, self.height, 1, self.format.bytes_per_pixel())
    }

    /// Bytes from the start of one layer to the next, covering its full mip chain.
    pub fn layer_stride(&self) -> Option<usize> {
        mip_chain_size(
            self.width,
            self.height,
            self.depth,
            self.mip_count,
            self.format.bytes_per_pixel(),
        )
    }

    /// Bytes of payload the header describes.
    pub fn payload_size(&self) -> Option<usize> {
        self.layer_stride()?.checked_mul(self.layer_count())
    }
}

/// A decoded top-level surface and the format it was stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub image: Image,
    pub format: PixelFormat,
}

impl LoadedImage {
    pub fn into_parts(self) -> (Image, PixelFormat) {
        (self.image, self.format)
    }
}

/// A DDS file held in memory.
///
/// Gives access to every array layer (and cube face) of the top mip level.
/// [`load`] is the shortcut for the first layer.
#[derive(Debug, Clone)]
pub struct DdsFile {
    info: DdsInfo,
    data: Vec<u8>,
    payload_offset: usize,
}

impl DdsFile {
    /// Read and parse a DDS file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = open_file(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Self::parse(data)
    }

    /// Parse a DDS file from its bytes.
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        let (info, payload_offset) = parse_header(&data)?;
        check_payload_len(&info, data.len() - payload_offset);
        Ok(Self {
            info,
            data,
            payload_offset,
        })
    }

    pub fn info(&self) -> &DdsInfo {
        &self.info
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    /// Bytes following the headers.
    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_offset..]
    }

    /// Number of layers addressable through [`DdsFile::layer`].
    pub fn layer_count(&self) -> usize {
        self.info.layer_count()
    }

    /// The first layer.
    pub fn image(&self) -> Result<Image> {
        self.layer(0)
    }

    /// Decode the top mip level of a layer.
    ///
    /// Cubemap faces count as layers: index `layer * 6 + face`.
    pub fn layer(&self, index: usize) -> Result<Image> {
        decode_layer(&self.info, self.payload(), index)
    }
}

/// Load the top-level surface of a DDS file.
///
/// Only the first mip level of the first array layer (and first cube face)
/// is decoded; use [`DdsFile`] for the others.
pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedImage> {
    let path = path.as_ref();
    let file = DdsFile::open(path)?;
    let image = file.image()?;
    debug!(
        path = %path.display(),
        format = %file.format(),
        shape = ?image.shape(),
        "loaded DDS"
    );
    Ok(LoadedImage {
        image,
        format: file.format(),
    })
}

/// Load the top-level surface of an in-memory DDS file.
pub fn load_from_bytes(data: &[u8]) -> Result<LoadedImage> {
    let (info, payload_offset) = parse_header(data)?;
    let payload = &data[payload_offset..];
    check_payload_len(&info, payload.len());
    let image = decode_layer(&info, payload, 0)?;
    Ok(LoadedImage {
        image,
        format: info.format,
    })
}

/// Read only the header of a DDS file.
pub fn read_info<P: AsRef<Path>>(path: P) -> Result<DdsInfo> {
    let path = path.as_ref();
    let file = open_file(path)?;

    let mut header = Vec::with_capacity(MAX_HEADER_LEN);
    file.take(MAX_HEADER_LEN as u64).read_to_end(&mut header)?;

    let (info, _) = parse_header(&header)?;
    Ok(info)
}

/// Open `path` for reading. Directories are reported as missing files.
fn open_file(path: &Path) -> Result<File> {
    let file = File::open(path).map_err(|err| open_error(path, err))?;
    let metadata = file.metadata().map_err(|err| open_error(path, err))?;
    if metadata.is_dir() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"),
        });
    }
    Ok(file)
}

fn open_error(path: &Path, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => Error::FileNotFound {
            path: path.to_path_buf(),
            source: err,
        },
        _ => Error::Io(err),
    }
}

/// Parse magic, header and optional extension. Returns the payload offset.
fn parse_header(data: &[u8]) -> Result<(DdsInfo, usize)> {
    let mut reader = BinaryReader::new(data);
    reader.expect_magic(DDS_MAGIC)?;

    let header: DdsHeader = reader.read_struct()?;
    let header_size = header.size;
    if header_size != DdsHeader::SIZE {
        return Err(Error::MalformedHeader(format!(
            "header size {header_size}, expected {}",
            DdsHeader::SIZE
        )));
    }
    let pixel_format_size = header.pixel_format.size;
    if pixel_format_size != DdsPixelFormat::SIZE {
        return Err(Error::MalformedHeader(format!(
            "pixel format size {pixel_format_size}, expected {}",
            DdsPixelFormat::SIZE
        )));
    }

    let extension: Option<DdsHeaderDxt10> = if header.has_extension() {
        Some(reader.read_struct()?)
    } else {
        None
    };

    let format = resolve_format(&header, extension.as_ref())?;

    let (width, height) = (header.width, header.height);
    if width == 0 || height == 0 {
        return Err(Error::MalformedHeader(format!(
            "zero-sized surface {width}x{height}"
        )));
    }

    let is_volume = extension
        .is_some_and(|ext| ext.resource_dimension == DdsHeaderDxt10::DIMENSION_TEXTURE3D);
    let depth = if is_volume {
        header.depth.max(1)
    } else {
        header.volume_depth()
    };
    let cubemap = header.is_cubemap() || extension.is_some_and(|ext| ext.is_cubemap());

    let info = DdsInfo {
        width,
        height,
        depth,
        mip_count: header.mipmap_count.max(1),
        array_layers: extension.map_or(1, |ext| ext.array_size.max(1)),
        faces: if cubemap { 6 } else { 1 },
        format,
    };
    trace!(?info, "parsed DDS header");

    Ok((info, reader.position()))
}

fn check_payload_len(info: &DdsInfo, actual: usize) {
    match info.payload_size() {
        Some(expected) if actual > expected => {
            warn!(expected, actual, "DDS payload has trailing data");
        }
        Some(expected) if actual < expected => {
            trace!(expected, actual, "DDS payload shorter than the described mip chain");
        }
        _ => {}
    }
}

fn decode_layer(info: &DdsInfo, payload: &[u8], index: usize) -> Result<Image> {
    let count = info.layer_count();
    if index >= count {
        return Err(Error::LayerOutOfRange { index, count });
    }

    let overflow = || Error::MalformedHeader("surface size overflows".into());
    let surface = info.surface_size().ok_or_else(overflow)?;
    let start = info
        .layer_stride()
        .and_then(|stride| stride.checked_mul(index))
        .ok_or_else(overflow)?;
    let end = start.checked_add(surface).ok_or_else(overflow)?;

    let bytes = payload.get(start..end).ok_or(Error::TruncatedPayload {
        expected: end,
        actual: payload.len(),
    })?;

    let format_info = info.format.info();
    let data = pixels::decode(bytes, &format_info);
    Image::from_data(
        info.height as usize,
        info.width as usize,
        format_info.channels,
        data,
    )
}

#[cfg(test)]
mod tests {
    use std::fs;

    use texarray_common::BinaryWriter;

    use super::*;
    use crate::format::ElementType;
    use crate::header::FourCC;

    fn dds_bytes(header: &DdsHeader, extension: Option<&DdsHeaderDxt10>, payload: &[u8]) -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        writer.write_bytes(DDS_MAGIC);
        writer.write_struct(header);
        if let Some(ext) = extension {
            writer.write_struct(ext);
        }
        writer.write_bytes(payload);
        writer.into_inner()
    }

    fn dx10_header(width: u32, height: u32, bytes_per_pixel: u32) -> DdsHeader {
        DdsHeader::texture_2d(
            width,
            height,
            width * bytes_per_pixel,
            DdsPixelFormat::with_four_cc(FourCC::DX10),
        )
    }

    #[test]
    fn test_rgba16_sfloat_widens_to_f32() {
        let pixel_format = DdsPixelFormat::with_four_cc(FourCC::from_d3d(113));
        let header = DdsHeader::texture_2d(256, 256, 256 * 8, pixel_format);
        // Every channel 0.5 (0x3800)
        let payload: Vec<u8> = [0x00, 0x38].repeat(256 * 256 * 4);

        let loaded = load_from_bytes(&dds_bytes(&header, None, &payload)).unwrap();
        assert_eq!(loaded.format, PixelFormat::RGBA16_SFLOAT_PACK16);
        assert_eq!(loaded.image.shape(), [256, 256, 4]);
        assert_eq!(loaded.image.element_type(), ElementType::F32);
        assert!(loaded.image.as_slice::<f32>().unwrap().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_rgba8_unorm_from_masks() {
        let pixel_format = DdsPixelFormat::with_masks(
            DdsPixelFormat::RGB | DdsPixelFormat::ALPHAPIXELS,
            32,
            [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000],
        );
        let header = DdsHeader::texture_2d(256, 256, 256 * 4, pixel_format);
        let payload: Vec<u8> = (0..256 * 256 * 4).map(|i| (i % 256) as u8).collect();

        let loaded = load_from_bytes(&dds_bytes(&header, None, &payload)).unwrap();
        assert_eq!(loaded.format, PixelFormat::RGBA8_UNORM_PACK8);
        assert_eq!(loaded.image.shape(), [256, 256, 4]);
        assert_eq!(loaded.image.element_type(), ElementType::U8);
        assert_eq!(loaded.image.pixel::<u8>(0, 1), Some(&[4u8, 5, 6, 7][..]));
    }

    #[test]
    fn test_array_texture_exposes_first_layer() {
        let header = dx10_header(256, 256, 1);
        let mut ext = DdsHeaderDxt10::texture_2d(62);
        ext.array_size = 3;
        let payload: Vec<u8> = (0..3u8).flat_map(|layer| vec![layer; 256 * 256]).collect();
        let bytes = dds_bytes(&header, Some(&ext), &payload);

        let loaded = load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded.format, PixelFormat::R8_UINT_PACK8);
        assert_eq!(loaded.image.shape(), [256, 256, 1]);
        assert_eq!(loaded.image.element_type(), ElementType::U8);
        assert!(loaded.image.as_slice::<u8>().unwrap().iter().all(|&v| v == 0));

        let file = DdsFile::parse(bytes).unwrap();
        assert_eq!(file.layer_count(), 3);
        let last = file.layer(2).unwrap();
        assert!(last.as_slice::<u8>().unwrap().iter().all(|&v| v == 2));
        assert!(matches!(
            file.layer(3),
            Err(Error::LayerOutOfRange { index: 3, count: 3 })
        ));
    }

    #[test]
    fn test_layer_stride_skips_mip_chain() {
        let mut header = dx10_header(2, 2, 1);
        header.mipmap_count = 2;
        let mut ext = DdsHeaderDxt10::texture_2d(61);
        ext.array_size = 2;
        // Layer 0: 2x2 + 1x1, layer 1: 2x2 + 1x1
        let payload = [1, 1, 1, 1, 9, 2, 2, 2, 2, 9];

        let file = DdsFile::parse(dds_bytes(&header, Some(&ext), &payload)).unwrap();
        assert_eq!(file.info().layer_stride(), Some(5));
        assert_eq!(file.layer(1).unwrap().as_slice::<u8>(), Some(&[2u8; 4][..]));
    }

    #[test]
    fn test_cubemap_faces_are_layers() {
        let mut header = dx10_header(1, 1, 4);
        header.caps2 = DdsHeader::CAPS2_CUBEMAP;
        let ext = DdsHeaderDxt10::texture_2d(41);
        let payload: Vec<u8> = (0..6).flat_map(|face| (face as f32).to_le_bytes()).collect();

        let file = DdsFile::parse(dds_bytes(&header, Some(&ext), &payload)).unwrap();
        assert!(file.info().is_cubemap());
        assert_eq!(file.layer_count(), 6);
        assert_eq!(file.layer(5).unwrap().as_slice::<f32>(), Some(&[5.0f32][..]));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_file.dds");

        match load(&path) {
            Err(Error::FileNotFound { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
        assert!(matches!(read_info(&path), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();

        match load(dir.path()) {
            Err(Error::FileNotFound { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
        assert!(matches!(read_info(dir.path()), Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_volume_exposes_first_slice() {
        let mut header = dx10_header(2, 2, 1);
        header.flags |= DdsHeader::FLAG_DEPTH;
        header.depth = 3;
        let mut ext = DdsHeaderDxt10::texture_2d(61);
        ext.resource_dimension = DdsHeaderDxt10::DIMENSION_TEXTURE3D;
        let payload: Vec<u8> = (0..3u8).flat_map(|slice| [slice + 1; 4]).collect();

        let file = DdsFile::parse(dds_bytes(&header, Some(&ext), &payload)).unwrap();
        assert_eq!(file.info().depth, 3);
        assert_eq!(file.info().layer_stride(), Some(12));
        assert_eq!(file.layer_count(), 1);
        let image = file.image().unwrap();
        assert_eq!(image.shape(), [2, 2, 1]);
        assert_eq!(image.as_slice::<u8>(), Some(&[1u8; 4][..]));

        // Legacy volume: R8 luminance masks with the volume caps.
        let pixel_format = DdsPixelFormat::with_masks(DdsPixelFormat::LUMINANCE, 8, [0xFF, 0, 0, 0]);
        let mut header = DdsHeader::texture_2d(2, 2, 2, pixel_format);
        header.flags |= DdsHeader::FLAG_DEPTH;
        header.caps2 = DdsHeader::CAPS2_VOLUME;
        header.depth = 3;

        let loaded = load_from_bytes(&dds_bytes(&header, None, &payload)).unwrap();
        assert_eq!(loaded.format, PixelFormat::R8_UNORM_PACK8);
        assert_eq!(loaded.image.as_slice::<u8>(), Some(&[1u8; 4][..]));
    }

    #[test]
    fn test_trailing_data_is_ignored() {
        let ext = DdsHeaderDxt10::texture_2d(61);
        let bytes = dds_bytes(&dx10_header(2, 2, 1), Some(&ext), &[7, 7, 7, 7, 0xAA, 0xBB]);

        let loaded = load_from_bytes(&bytes).unwrap();
        assert_eq!(loaded.image.as_slice::<u8>(), Some(&[7u8; 4][..]));

        let file = DdsFile::parse(bytes).unwrap();
        assert_eq!(file.info().payload_size(), Some(4));
        assert_eq!(file.payload().len(), 6);
    }

    #[test]
    fn test_gli_file_is_rejected() {
        // gli numbers its GLI1 extension codes differently from `PixelFormat::code`.
        let header = DdsHeader::texture_2d(2, 1, 6, DdsPixelFormat::with_four_cc(FourCC::GLI1));
        let ext = DdsHeaderDxt10::texture_2d(23);
        let bytes = dds_bytes(&header, Some(&ext), &[0; 6]);
        assert!(matches!(load_from_bytes(&bytes), Err(Error::UnsupportedFormat(_))));

        let header = DdsHeader::texture_2d(2, 1, 6, DdsPixelFormat::with_four_cc(FourCC::TXA1));
        let ext = DdsHeaderDxt10::texture_2d(PixelFormat::RGB8_UNORM_PACK8.code());
        let loaded = load_from_bytes(&dds_bytes(&header, Some(&ext), &[0; 6])).unwrap();
        assert_eq!(loaded.format, PixelFormat::RGB8_UNORM_PACK8);
        assert_eq!(loaded.image.shape(), [1, 2, 3]);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = dds_bytes(&dx10_header(1, 1, 1), Some(&DdsHeaderDxt10::texture_2d(61)), &[0]);
        bytes[..4].copy_from_slice(b"KTX ");
        assert!(matches!(load_from_bytes(&bytes), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_bad_header_size() {
        let mut header = dx10_header(1, 1, 1);
        header.size = 100;
        let bytes = dds_bytes(&header, Some(&DdsHeaderDxt10::texture_2d(61)), &[0]);
        assert!(matches!(load_from_bytes(&bytes), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = dds_bytes(&dx10_header(1, 1, 1), None, &[]);
        // DX10 FourCC promises an extension that is not there.
        assert!(matches!(load_from_bytes(&bytes), Err(Error::MalformedHeader(_))));
        assert!(matches!(load_from_bytes(&bytes[..60]), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = dds_bytes(
            &dx10_header(4, 4, 1),
            Some(&DdsHeaderDxt10::texture_2d(61)),
            &[0; 10],
        );
        assert!(matches!(
            load_from_bytes(&bytes),
            Err(Error::TruncatedPayload {
                expected: 16,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_compressed_is_unsupported() {
        let header = DdsHeader::texture_2d(4, 4, 8, DdsPixelFormat::with_four_cc(FourCC(*b"DXT5")));
        let bytes = dds_bytes(&header, None, &[0; 16]);
        assert!(matches!(load_from_bytes(&bytes), Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_read_info_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("array.dds");
        let mut header = dx10_header(8, 4, 2);
        header.mipmap_count = 4;
        let mut ext = DdsHeaderDxt10::texture_2d(57);
        ext.array_size = 2;
        fs::write(&path, dds_bytes(&header, Some(&ext), &[0; 256])).unwrap();

        let info = read_info(&path).unwrap();
        assert_eq!(info.width, 8);
        assert_eq!(info.height, 4);
        assert_eq!(info.mip_count, 4);
        assert_eq!(info.array_layers, 2);
        assert_eq!(info.faces, 1);
        assert_eq!(info.format, PixelFormat::R16_UINT_PACK16);

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.image.shape(), [4, 8, 1]);
        assert_eq!(loaded.image.element_type(), ElementType::U16);
    }
}
