//! Dense `(height, width, channel)` images.

use crate::format::ElementType;
use crate::{Error, Result};

/// Typed element storage of an [`Image`], one variant per [`ElementType`].
#[derive(Debug, Clone, PartialEq)]
pub enum ImageData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
    U64(Vec<u64>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl ImageData {
    /// Element type of the storage.
    pub fn element_type(&self) -> ElementType {
        match self {
            ImageData::U8(_) => ElementType::U8,
            ImageData::I8(_) => ElementType::I8,
            ImageData::U16(_) => ElementType::U16,
            ImageData::I16(_) => ElementType::I16,
            ImageData::U32(_) => ElementType::U32,
            ImageData::I32(_) => ElementType::I32,
            ImageData::U64(_) => ElementType::U64,
            ImageData::I64(_) => ElementType::I64,
            ImageData::F32(_) => ElementType::F32,
            ImageData::F64(_) => ElementType::F64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            ImageData::U8(v) => v.len(),
            ImageData::I8(v) => v.len(),
            ImageData::U16(v) => v.len(),
            ImageData::I16(v) => v.len(),
            ImageData::U32(v) => v.len(),
            ImageData::I32(v) => v.len(),
            ImageData::U64(v) => v.len(),
            ImageData::I64(v) => v.len(),
            ImageData::F32(v) => v.len(),
            ImageData::F64(v) => v.len(),
        }
    }

    /// Check if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Primitive types that can be stored in an [`Image`].
pub trait Element: Copy + PartialEq + sealed::Sealed + 'static {
    /// Matching element type.
    const TYPE: ElementType;

    /// Wrap a vector into typed storage.
    fn wrap(data: Vec<Self>) -> ImageData;

    /// Borrow typed storage if it holds this type.
    fn view(data: &ImageData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                const TYPE: ElementType = ElementType::$variant;

                #[inline]
                fn wrap(data: Vec<Self>) -> ImageData {
                    ImageData::$variant(data)
                }

                #[inline]
                fn view(data: &ImageData) -> Option<&[Self]> {
                    match data {
                        ImageData::$variant(v) => Some(v.as_slice()),
                        _ => None,
                    }
                }
            }

            impl From<Vec<$ty>> for ImageData {
                fn from(data: Vec<$ty>) -> Self {
                    ImageData::$variant(data)
                }
            }
        )+
    };
}

impl_element! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
}

/// A dense image with axes `(height, width, channel)` in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    height: usize,
    width: usize,
    channels: usize,
    data: ImageData,
}

impl Image {
    /// Create an image from a typed vector.
    ///
    /// Fails if `channels` is not 1 to 4 or `data` does not hold exactly
    /// `height * width * channels` elements.
    pub fn new<T: Element>(height: usize, width: usize, channels: usize, data: Vec<T>) -> Result<Self> {
        Self::from_data(height, width, channels, T::wrap(data))
    }

    /// Create an image from already wrapped storage.
    pub fn from_data(height: usize, width: usize, channels: usize, data: ImageData) -> Result<Self> {
        if !(1..=4).contains(&channels) {
            return Err(Error::InvalidChannels(channels));
        }
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(Error::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(Error::InvalidShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// Create an image with every element set to `value`.
    pub fn filled<T: Element>(height: usize, width: usize, channels: usize, value: T) -> Result<Self> {
        let len = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(Error::InvalidDimensions { width, height })?;
        Self::new(height, width, channels, vec![value; len])
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `[height, width, channels]`
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }

    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    #[inline]
    pub fn data(&self) -> &ImageData {
        &self.data
    }

    #[inline]
    pub fn into_data(self) -> ImageData {
        self.data
    }

    /// Borrow the elements as `T`, or `None` if the image holds another type.
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::view(&self.data)
    }

    /// Channels of the pixel at `(row, col)`.
    pub fn pixel<T: Element>(&self, row: usize, col: usize) -> Option<&[T]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let start = (row * self.width + col) * self.channels;
        self.as_slice::<T>()
            .map(|elements| &elements[start..start + self.channels])
    }
}
