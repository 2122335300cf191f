use crate::error::{Error, Result};
use crate::kind::ElementKind;
use crate::offset::{abs_offset, positive_int};
use crate::region::ByteRegion;
use crate::validate::{validate_view, ViewBounds, ViewSource};
use smallvec::SmallVec;
use tarray_storage::ByteStorage;

/// Source of bulk assignment.
#[derive(Debug, Clone, Copy)]
pub enum ArrayLike<'a> {
    Values(&'a [f64]),
    Typed(&'a TypedArray),
}

#[allow(clippy::len_without_is_empty)]
impl ArrayLike<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            ArrayLike::Values(vs) => vs.len(),
            ArrayLike::Typed(t) => t.len(),
        }
    }
}

impl<'a> From<&'a [f64]> for ArrayLike<'a> {
    #[inline]
    fn from(src: &'a [f64]) -> Self {
        ArrayLike::Values(src)
    }
}

impl<'a, const N: usize> From<&'a [f64; N]> for ArrayLike<'a> {
    #[inline]
    fn from(src: &'a [f64; N]) -> Self {
        ArrayLike::Values(src)
    }
}

impl<'a> From<&'a Vec<f64>> for ArrayLike<'a> {
    #[inline]
    fn from(src: &'a Vec<f64>) -> Self {
        ArrayLike::Values(src)
    }
}

impl<'a> From<&'a TypedArray> for ArrayLike<'a> {
    #[inline]
    fn from(src: &'a TypedArray) -> Self {
        ArrayLike::Typed(src)
    }
}

/// TypedArray interprets a byte range of a region as a sequence
/// of fixed-width numbers of one element kind.
///
/// Views over overlapping bytes of one region observe each other's
/// writes immediately, so element writes go through `&self`.
/// Cloning a typed array creates another view on the same bytes.
#[derive(Debug, Clone)]
pub struct TypedArray {
    kind: ElementKind,
    region: ByteRegion,
    byte_offset: usize,
    byte_length: usize,
    length: usize,
    storage: ByteStorage,
}

impl TypedArray {
    /// Construct a typed array.
    ///
    /// If source is a region or byte storage, the array is a view over
    /// it, starting at `byte_offset` and covering `length` elements, or
    /// the rest of the region if `length` is absent.
    /// Otherwise a fresh region is allocated, sized by the element
    /// count or by the length of the array-like source, whose values
    /// are then copied in. `byte_offset` and `length` are ignored then.
    pub fn new<'a, S: Into<ViewSource<'a>>>(
        kind: ElementKind,
        source: S,
        byte_offset: Option<i64>,
        length: Option<i64>,
    ) -> Result<Self> {
        let source = source.into();
        if let Some(bounds) = validate_view(&source, byte_offset, length, kind.size())? {
            return Ok(TypedArray::from_bounds(kind, bounds));
        }
        let (count, values) = match source {
            ViewSource::Absent => (0, None),
            ViewSource::Length(n) => (positive_int(Some(n), "Length", Some(0))?, None),
            ViewSource::Values(vs) => (vs.len(), Some(ArrayLike::Values(vs))),
            ViewSource::Typed(t) => (t.len(), Some(ArrayLike::Typed(t))),
            ViewSource::Storage(_) | ViewSource::Region(_) => {
                return Err(Error::InvalidArgument(
                    "expected a typed array, array or number".to_string(),
                ))
            }
        };
        let array = TypedArray::alloc(kind, count)?;
        if let Some(src) = values {
            array.set(src, None)?;
        }
        Ok(array)
    }

    /// Create a zero-filled typed array of given element count.
    #[inline]
    pub fn with_length(kind: ElementKind, length: usize) -> Result<Self> {
        TypedArray::alloc(kind, length)
    }

    /// Create a typed array holding coerced copies of given values.
    #[inline]
    pub fn from_values(kind: ElementKind, values: &[f64]) -> Result<Self> {
        TypedArray::new(kind, values, None, None)
    }

    /// Create a typed array over existing region.
    #[inline]
    pub fn from_region(
        kind: ElementKind,
        region: &ByteRegion,
        byte_offset: Option<i64>,
        length: Option<i64>,
    ) -> Result<Self> {
        TypedArray::new(kind, region, byte_offset, length)
    }

    #[inline]
    fn alloc(kind: ElementKind, length: usize) -> Result<Self> {
        let byte_length = length
            .checked_mul(kind.size())
            .ok_or_else(|| Error::InvalidArgument("Length is too large".to_string()))?;
        let bounds = ViewBounds::whole(ByteRegion::new(byte_length)?);
        Ok(TypedArray::from_bounds(kind, bounds))
    }

    #[inline]
    fn from_bounds(kind: ElementKind, bounds: ViewBounds) -> Self {
        TypedArray {
            kind,
            length: bounds.byte_length / kind.size(),
            region: bounds.region,
            byte_offset: bounds.byte_offset,
            byte_length: bounds.byte_length,
            storage: bounds.storage,
        }
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// Offset of first element within the region.
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// The region this array is a view of.
    #[inline]
    pub fn buffer(&self) -> &ByteRegion {
        &self.region
    }

    #[inline]
    pub fn bytes_per_element(&self) -> usize {
        self.kind.size()
    }

    /// Returns element at given index, or `None` if index is
    /// out of range. Out of range read is never an error.
    #[inline]
    pub fn get(&self, index: i64) -> Option<f64> {
        let index = usize::try_from(index).ok().filter(|i| *i < self.length)?;
        self.load(index).ok()
    }

    /// Store value at given index, coerced by element kind.
    #[inline]
    pub fn put(&self, index: i64, value: f64) -> Result<()> {
        match usize::try_from(index) {
            Ok(i) if i < self.length => self.store(i, value),
            _ => Err(Error::OffsetLengthOutOfRange),
        }
    }

    /// Iterate over current element values.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.length).map_while(move |i| self.load(i).ok())
    }

    #[inline]
    pub fn to_vec(&self) -> Vec<f64> {
        let size = self.kind.size();
        self.storage
            .to_vec()
            .chunks_exact(size)
            .map(|c| self.kind.decode(c))
            .collect()
    }

    /// Assign values of source to this array starting at element `offset`.
    ///
    /// Source of same element kind is copied byte by byte. Source of
    /// other kind is converted element by element; if it shares bytes
    /// with the destination range, all its values are read out before
    /// the first write. Nothing is written if the source does not fit.
    pub fn set<'a, S: Into<ArrayLike<'a>>>(&self, source: S, offset: Option<i64>) -> Result<()> {
        let source = source.into();
        let length = source.len();
        let offset = positive_int(offset, "Offset", Some(0))?;
        match offset.checked_add(length) {
            Some(end) if end <= self.length => (),
            _ => return Err(Error::OffsetLengthOutOfRange),
        }
        match source {
            ArrayLike::Typed(src) if src.kind == self.kind => {
                src.storage
                    .copy_range(0, src.byte_length, &self.storage, offset * self.kind.size())?;
            }
            ArrayLike::Typed(src) if self.overlaps(src, offset, length) => {
                log::trace!(
                    "set {} from overlapping {}, copy {} values first",
                    self.kind.name(),
                    src.kind.name(),
                    length
                );
                let tmp: SmallVec<[f64; 16]> = src.iter().collect();
                self.store_all(offset, &tmp)?;
            }
            ArrayLike::Typed(src) => {
                for i in 0..length {
                    self.store(offset + i, src.load(i)?)?;
                }
            }
            ArrayLike::Values(vs) => self.store_all(offset, vs)?,
        }
        Ok(())
    }

    /// Create a view of same kind on elements `[begin, end)`, sharing bytes.
    ///
    /// Negative offsets count backward from the end. Absent `begin` is 0
    /// and absent `end` is the length. An empty or inverted range results
    /// in a fresh empty array.
    pub fn subarray(&self, begin: Option<i64>, end: Option<i64>) -> Result<TypedArray> {
        let begin = abs_offset(begin, self.length, Some(0));
        let end = abs_offset(end, self.length, None);
        if begin >= end {
            return TypedArray::with_length(self.kind, 0);
        }
        let size = self.kind.size();
        let bounds = ViewBounds::resolve(
            self.region.clone(),
            self.byte_offset + begin * size,
            Some(end - begin),
            size,
        )?;
        Ok(TypedArray::from_bounds(self.kind, bounds))
    }

    /// Returns whether destination range `[offset, offset + length)`
    /// of this array shares bytes with the source array.
    #[inline]
    fn overlaps(&self, src: &TypedArray, offset: usize, length: usize) -> bool {
        if !self.storage.same_allocation(&src.storage) {
            return false;
        }
        let src_start = src.storage.underlying_offset();
        let src_end = src_start + src.byte_length;
        let dst_start = self.storage.underlying_offset() + offset * self.kind.size();
        let dst_end = dst_start + length * self.kind.size();
        !(src_start >= dst_end || src_end <= dst_start)
    }

    #[inline]
    fn load(&self, index: usize) -> Result<f64> {
        let size = self.kind.size();
        let mut buf = [0u8; 8];
        self.storage.copy_to_slice(index * size, &mut buf[..size])?;
        Ok(self.kind.decode(&buf[..size]))
    }

    #[inline]
    fn store(&self, index: usize, value: f64) -> Result<()> {
        let size = self.kind.size();
        let mut buf = [0u8; 8];
        self.kind.encode(value, &mut buf[..size]);
        self.storage.copy_from_slice(index * size, &buf[..size])?;
        Ok(())
    }

    /// Encode all values first, then write them with one copy.
    #[inline]
    fn store_all(&self, offset: usize, values: &[f64]) -> Result<()> {
        let size = self.kind.size();
        let mut buf: SmallVec<[u8; 64]> = SmallVec::from_elem(0, values.len() * size);
        for (chunk, v) in buf.chunks_exact_mut(size).zip(values) {
            self.kind.encode(*v, chunk);
        }
        self.storage.copy_from_slice(offset * size, &buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ALL_ELEMENT_KINDS;
    use tarray_storage::Endian;
    use ElementKind::*;

    #[test]
    fn test_construct_with_length() {
        for kind in ALL_ELEMENT_KINDS {
            let arr = TypedArray::new(kind, 10usize, None, None).unwrap();
            assert_eq!(10, arr.len());
            assert_eq!(0, arr.byte_offset());
            assert_eq!(10 * kind.size(), arr.byte_length());
            assert_eq!(10 * kind.size(), arr.buffer().byte_length());
            assert_eq!(kind.size(), arr.bytes_per_element());
            assert!(arr.iter().all(|v| v == 0.0));
        }
        let empty = TypedArray::new(Int32, ViewSource::Absent, None, None).unwrap();
        assert!(empty.is_empty());
        assert!(matches!(
            TypedArray::new(Int32, -1i64, None, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TypedArray::new(Uint8, i64::MAX, None, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TypedArray::new(Float64, i64::MAX, None, None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TypedArray::with_length(Int16, usize::MAX / 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_construct_from_values() {
        let values: Vec<f64> = (1..=10).rev().map(f64::from).collect();
        for kind in ALL_ELEMENT_KINDS {
            let arr = TypedArray::from_values(kind, &values).unwrap();
            assert_eq!(values, arr.to_vec());
            let copy = TypedArray::new(kind, &arr, None, None).unwrap();
            assert_eq!(values, copy.to_vec());
            // copy owns a different region.
            copy.put(0, 0.0).unwrap();
            assert_eq!(Some(10.0), arr.get(0));
        }
    }

    #[test]
    fn test_construct_from_other_kind() {
        let src = TypedArray::from_values(Float64, &[1.5, -1.0, 300.0]).unwrap();
        let arr = TypedArray::new(Uint8, &src, None, None).unwrap();
        assert_eq!(vec![1.0, 255.0, 44.0], arr.to_vec());
        let arr = TypedArray::new(Uint8Clamped, &src, None, None).unwrap();
        assert_eq!(vec![2.0, 0.0, 255.0], arr.to_vec());
    }

    #[test]
    fn test_get_out_of_range() {
        let arr = TypedArray::from_values(Int16, &[2.0, 3.0]).unwrap();
        assert_eq!(Some(2.0), arr.get(0));
        assert_eq!(Some(3.0), arr.get(1));
        assert_eq!(None, arr.get(2));
        assert_eq!(None, arr.get(-1));
        assert_eq!(None, arr.get(0x2000_0000));
        assert_eq!(Err(Error::OffsetLengthOutOfRange), arr.put(2, 1.0));
        assert_eq!(Err(Error::OffsetLengthOutOfRange), arr.put(-1, 1.0));
        assert_eq!(vec![2.0, 3.0], arr.to_vec());
    }

    #[test]
    fn test_view_over_region() {
        let region = ByteRegion::new(16).unwrap();
        let bytes = TypedArray::from_region(Uint8, &region, None, None).unwrap();
        let halves = TypedArray::from_region(Uint16, &region, None, None).unwrap();
        let inner = TypedArray::from_region(Uint16, &region, Some(2), Some(2)).unwrap();
        let words = TypedArray::from_region(Uint32, &region, None, None).unwrap();
        assert_eq!(16, bytes.len());
        assert_eq!(8, halves.len());
        assert_eq!(2, inner.len());
        assert_eq!(2, inner.byte_offset());
        assert_eq!(4, words.len());
        for (i, b) in (0x08..0x10).enumerate() {
            bytes.put(i as i64, f64::from(b)).unwrap();
        }
        let u16_at = |i: usize| f64::from(u16::from_ne_bytes([0x08 + 2 * i as u8, 0x09 + 2 * i as u8]));
        assert_eq!(Some(u16_at(0)), halves.get(0));
        assert_eq!(Some(u16_at(3)), halves.get(3));
        assert_eq!(Some(u16_at(1)), inner.get(0));
        assert_eq!(Some(u16_at(2)), inner.get(1));
        assert_eq!(
            Some(f64::from(u32::from_ne_bytes([0x0c, 0x0d, 0x0e, 0x0f]))),
            words.get(1)
        );
        assert_eq!(0x0c, region.storage().read::<u8>(4, Endian::Big).unwrap());
    }

    #[test]
    fn test_subarray_aliasing() {
        let arr = TypedArray::from_values(Uint8, &[8.0, 9.0, 10.0, 11.0, 12.0]).unwrap();
        let sub = arr.subarray(Some(2), Some(4)).unwrap();
        assert_eq!(Uint8, sub.kind());
        assert_eq!(vec![10.0, 11.0], sub.to_vec());
        assert_eq!(2, sub.byte_offset());
        assert!(sub.buffer().same_region(arr.buffer()));
        sub.put(0, 0x12 as f64).unwrap();
        sub.put(1, 0x34 as f64).unwrap();
        assert_eq!(Some(0x12 as f64), arr.get(2));
        assert_eq!(Some(0x34 as f64), arr.get(3));
        arr.put(3, 1.0).unwrap();
        assert_eq!(Some(1.0), sub.get(1));
    }

    #[test]
    fn test_subarray_offsets() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let arr = TypedArray::from_values(Int32, &values).unwrap();
        assert_eq!(vec![0.0, 1.0, 2.0, 3.0, 4.0], arr.subarray(Some(0), Some(5)).unwrap().to_vec());
        assert_eq!(vec![4.0, 5.0, 6.0, 7.0, 8.0, 9.0], arr.subarray(Some(4), None).unwrap().to_vec());
        assert_eq!(vec![8.0, 9.0], arr.subarray(Some(-2), None).unwrap().to_vec());
        assert_eq!(values, arr.subarray(None, None).unwrap().to_vec());
        assert_eq!(values, arr.subarray(Some(-20), Some(20)).unwrap().to_vec());
        let sub = arr.subarray(Some(1), Some(3)).unwrap().subarray(Some(1), None).unwrap();
        assert_eq!(8, sub.byte_offset());
        assert_eq!(vec![2.0], sub.to_vec());
        let empty = arr.subarray(Some(7), Some(3)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(Int32, empty.kind());
        assert!(!empty.buffer().same_region(arr.buffer()));
        assert!(arr.subarray(Some(10), None).unwrap().is_empty());
    }

    #[test]
    fn test_set_from_values() {
        let arr = TypedArray::with_length(Int8, 10).unwrap();
        arr.set(&[1.0, 2.0, 3.0], Some(2)).unwrap();
        assert_eq!(vec![0.0, 0.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0], arr.to_vec());
        arr.set(&[200.0], Some(9)).unwrap();
        assert_eq!(Some(-56.0), arr.get(9));
        arr.set(&[] as &[f64], Some(10)).unwrap();
        assert_eq!(Err(Error::OffsetLengthOutOfRange), arr.set(&[1.0, 1.0], Some(9)));
        assert_eq!(Err(Error::OffsetLengthOutOfRange), arr.set(&[0.0; 11], None));
        assert!(matches!(arr.set(&[1.0], Some(-1)), Err(Error::InvalidArgument(_))));
        assert_eq!(Some(0.0), arr.get(0));
    }

    #[test]
    fn test_set_same_kind_overlap() {
        let values: Vec<f64> = (0..8).map(f64::from).collect();
        let arr = TypedArray::from_values(Uint16, &values).unwrap();
        let head = arr.subarray(Some(0), Some(6)).unwrap();
        arr.set(&head, Some(2)).unwrap();
        assert_eq!(vec![0.0, 1.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0], arr.to_vec());

        let arr = TypedArray::from_values(Uint16, &values).unwrap();
        let tail = arr.subarray(Some(2), None).unwrap();
        arr.set(&tail, None).unwrap();
        assert_eq!(vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 6.0, 7.0], arr.to_vec());
    }

    #[test]
    fn test_set_cross_kind_overlap() {
        let a = TypedArray::with_length(Uint16, 8).unwrap();
        let b = TypedArray::from_region(Uint8, a.buffer(), Some(0), Some(2)).unwrap();
        b.put(0, 5.0).unwrap();
        b.put(1, 5.0).unwrap();
        assert_eq!(Some(f64::from(0x0505u16)), a.get(0));
        a.set(&b, None).unwrap();
        assert_eq!(Some(5.0), a.get(0));
        assert_eq!(Some(5.0), a.get(1));
    }

    #[test]
    fn test_set_cross_kind_disjoint() {
        let region = ByteRegion::new(16).unwrap();
        let bytes = TypedArray::from_region(Uint8, &region, Some(0), Some(4)).unwrap();
        let words = TypedArray::from_region(Int32, &region, Some(8), Some(2)).unwrap();
        bytes.set(&[1.0, 2.0, 255.0, 4.0], None).unwrap();
        words.set(&bytes.subarray(Some(2), None).unwrap(), None).unwrap();
        assert_eq!(vec![255.0, 4.0], words.to_vec());
        assert_eq!(vec![1.0, 2.0, 255.0, 4.0], bytes.to_vec());
    }

    #[test]
    fn test_nan_conversion() {
        for kind in ALL_ELEMENT_KINDS {
            let arr = TypedArray::from_values(kind, &[1.0, 1.0]).unwrap();
            arr.put(0, f64::NAN).unwrap();
            arr.set(&[f64::NAN], Some(1)).unwrap();
            for v in arr.iter() {
                if kind.is_float() {
                    assert!(v.is_nan());
                } else {
                    assert_eq!(0.0, v);
                }
            }
        }
    }

    #[test]
    fn test_truncation() {
        for kind in [Int8, Int16, Int32] {
            let arr = TypedArray::from_values(kind, &[0.6, 10.6, -0.6, -10.6]).unwrap();
            assert_eq!(vec![0.0, 10.0, 0.0, -10.0], arr.to_vec());
        }
        for kind in [Uint8, Uint16, Uint32] {
            let arr = TypedArray::from_values(kind, &[0.6, 10.6]).unwrap();
            assert_eq!(vec![0.0, 10.0], arr.to_vec());
        }
        let arr = TypedArray::from_values(Uint8Clamped, &[0.6, 10.6, -10.0, 260.0]).unwrap();
        assert_eq!(vec![1.0, 11.0, 0.0, 255.0], arr.to_vec());
    }
}
