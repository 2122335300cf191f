//! Validation shared by all views constructed over byte regions.
use crate::error::{Error, Result};
use crate::offset::{check_alignment, positive_int};
use crate::region::ByteRegion;
use crate::typed::TypedArray;
use tarray_storage::ByteStorage;

/// Input of view construction.
///
/// A view is either built over existing bytes (`Storage` or
/// `Region`), or over a fresh region sized by an element count or
/// by an array-like source whose values are then copied.
#[derive(Debug, Clone)]
pub enum ViewSource<'a> {
    /// No input at all, same as zero length.
    Absent,
    /// External byte storage, wrapped as a region without copy.
    Storage(ByteStorage),
    /// Existing region, shared with the new view.
    Region(ByteRegion),
    /// Number of elements of a fresh region.
    Length(i64),
    /// Plain numbers to copy into a fresh region.
    Values(&'a [f64]),
    /// Another typed array to copy into a fresh region.
    Typed(&'a TypedArray),
}

impl From<ByteStorage> for ViewSource<'_> {
    #[inline]
    fn from(src: ByteStorage) -> Self {
        ViewSource::Storage(src)
    }
}

impl From<ByteRegion> for ViewSource<'_> {
    #[inline]
    fn from(src: ByteRegion) -> Self {
        ViewSource::Region(src)
    }
}

impl From<&ByteRegion> for ViewSource<'_> {
    #[inline]
    fn from(src: &ByteRegion) -> Self {
        ViewSource::Region(src.clone())
    }
}

impl From<usize> for ViewSource<'_> {
    #[inline]
    fn from(src: usize) -> Self {
        ViewSource::Length(i64::try_from(src).unwrap_or(i64::MAX))
    }
}

impl From<i64> for ViewSource<'_> {
    #[inline]
    fn from(src: i64) -> Self {
        ViewSource::Length(src)
    }
}

impl<'a> From<&'a [f64]> for ViewSource<'a> {
    #[inline]
    fn from(src: &'a [f64]) -> Self {
        ViewSource::Values(src)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for ViewSource<'a> {
    #[inline]
    fn from(src: &'a [f64; N]) -> Self {
        ViewSource::Values(src)
    }
}

impl<'a> From<&'a Vec<f64>> for ViewSource<'a> {
    #[inline]
    fn from(src: &'a Vec<f64>) -> Self {
        ViewSource::Values(src)
    }
}

impl<'a> From<&'a TypedArray> for ViewSource<'a> {
    #[inline]
    fn from(src: &'a TypedArray) -> Self {
        ViewSource::Typed(src)
    }
}

/// Validated placement of a view inside its region.
#[derive(Debug, Clone)]
pub(crate) struct ViewBounds {
    pub(crate) region: ByteRegion,
    pub(crate) byte_offset: usize,
    pub(crate) byte_length: usize,
    /// Window of region storage covered by the view.
    pub(crate) storage: ByteStorage,
}

impl ViewBounds {
    /// Bounds covering a whole region.
    #[inline]
    pub(crate) fn whole(region: ByteRegion) -> Self {
        let byte_length = region.byte_length();
        let storage = region.storage().clone();
        ViewBounds {
            region,
            byte_offset: 0,
            byte_length,
            storage,
        }
    }

    /// Check bounds and alignment of a view over given region.
    ///
    /// Absent `length` covers the rest of the region. Otherwise
    /// `length` counts elements of `element_size` bytes.
    pub(crate) fn resolve(
        region: ByteRegion,
        byte_offset: usize,
        length: Option<usize>,
        element_size: usize,
    ) -> Result<Self> {
        let total = region.byte_length();
        let byte_length = match length {
            None => total
                .checked_sub(byte_offset)
                .ok_or(Error::OffsetLengthOutOfRange)?,
            Some(len) => len
                .checked_mul(element_size)
                .ok_or(Error::OffsetLengthOutOfRange)?,
        };
        let end = match byte_offset.checked_add(byte_length) {
            Some(end) if end <= total => end,
            _ => return Err(Error::OffsetLengthOutOfRange),
        };
        let storage = region.storage().slice(byte_offset, end)?;
        // Offset of the window is checked within the whole allocation,
        // so a badly aligned slice of pooled memory is rejected as well.
        if !check_alignment(storage.underlying_offset(), element_size)
            || !check_alignment(storage.underlying_length(), element_size)
        {
            return Err(Error::UnalignedOffsetOrLength);
        }
        Ok(ViewBounds {
            region,
            byte_offset,
            byte_length,
            storage,
        })
    }
}

/// Validate construction of a view over existing bytes.
///
/// Returns `None` if the source is not a region or byte storage,
/// the caller then falls back to allocation of a fresh region.
pub(crate) fn validate_view(
    source: &ViewSource<'_>,
    byte_offset: Option<i64>,
    length: Option<i64>,
    element_size: usize,
) -> Result<Option<ViewBounds>> {
    let region = match source {
        ViewSource::Storage(storage) => ByteRegion::from_external(storage.clone()),
        ViewSource::Region(region) => region.clone(),
        _ => return Ok(None),
    };
    let byte_offset = positive_int(byte_offset, "Offset", Some(0))?;
    let length = match length {
        None => None,
        Some(len) => Some(positive_int(Some(len), "Length", None)?),
    };
    ViewBounds::resolve(region, byte_offset, length, element_size).map(Some)
}
