//! Element kinds of typed arrays and their numeric coercion.
//!
//! Every kind maps to an entry of a static codec table. The entry
//! holds element size, names, and a pair of pure functions that
//! encode a number into element bytes and decode it back. Element
//! bytes always use the native byte order.
use tarray_storage::{ByteRepr, Endian};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementKind {
    Int8 = 0,
    Uint8 = 1,
    Uint8Clamped = 2,
    Int16 = 3,
    Uint16 = 4,
    Int32 = 5,
    Uint32 = 6,
    Float32 = 7,
    Float64 = 8,
}

pub const ALL_ELEMENT_KINDS: [ElementKind; 9] = [
    ElementKind::Int8,
    ElementKind::Uint8,
    ElementKind::Uint8Clamped,
    ElementKind::Int16,
    ElementKind::Uint16,
    ElementKind::Int32,
    ElementKind::Uint32,
    ElementKind::Float32,
    ElementKind::Float64,
];

struct KindCodec {
    size: usize,
    name: &'static str,
    type_name: &'static str,
    encode: fn(f64, &mut [u8]),
    decode: fn(&[u8]) -> f64,
}

static CODECS: [KindCodec; 9] = [
    KindCodec {
        size: 1,
        name: "Int8Array",
        type_name: "int8",
        encode: |v, buf| (wrap_int(v, 8) as u8 as i8).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(i8::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 1,
        name: "Uint8Array",
        type_name: "uint8",
        encode: |v, buf| (wrap_int(v, 8) as u8).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(u8::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 1,
        name: "Uint8ClampedArray",
        type_name: "pixel",
        encode: |v, buf| clamp_u8(v).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(u8::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 2,
        name: "Int16Array",
        type_name: "int16",
        encode: |v, buf| (wrap_int(v, 16) as u16 as i16).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(i16::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 2,
        name: "Uint16Array",
        type_name: "uint16",
        encode: |v, buf| (wrap_int(v, 16) as u16).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(u16::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 4,
        name: "Int32Array",
        type_name: "int32",
        encode: |v, buf| (wrap_int(v, 32) as u32 as i32).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(i32::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 4,
        name: "Uint32Array",
        type_name: "uint32",
        encode: |v, buf| (wrap_int(v, 32) as u32).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(u32::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 4,
        name: "Float32Array",
        type_name: "float",
        encode: |v, buf| (v as f32).write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from(f32::from_bytes(buf, Endian::NATIVE)),
    },
    KindCodec {
        size: 8,
        name: "Float64Array",
        type_name: "double",
        encode: |v, buf| v.write_bytes(buf, Endian::NATIVE),
        decode: |buf| f64::from_bytes(buf, Endian::NATIVE),
    },
];

impl ElementKind {
    #[inline]
    fn codec(self) -> &'static KindCodec {
        &CODECS[self as usize]
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn size(self) -> usize {
        self.codec().size
    }

    /// Name of the array type, e.g. "Float32Array".
    #[inline]
    pub fn name(self) -> &'static str {
        self.codec().name
    }

    /// Short name of the element type, e.g. "float".
    #[inline]
    pub fn type_name(self) -> &'static str {
        self.codec().type_name
    }

    /// Lookup kind by either array type name or element type name.
    #[inline]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ELEMENT_KINDS
            .iter()
            .copied()
            .find(|k| k.name() == name || k.type_name() == name)
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }

    /// Encode number into first `size()` bytes of the buffer,
    /// applying the coercion rule of this kind.
    #[inline]
    pub fn encode(self, value: f64, buf: &mut [u8]) {
        (self.codec().encode)(value, buf)
    }

    /// Decode element from first `size()` bytes of the buffer.
    #[inline]
    pub fn decode(self, buf: &[u8]) -> f64 {
        (self.codec().decode)(buf)
    }

    /// Returns the value that reads back after storing given number.
    #[inline]
    pub fn coerce(self, value: f64) -> f64 {
        let mut buf = [0u8; 8];
        self.encode(value, &mut buf);
        self.decode(&buf)
    }
}

/// Truncate toward zero and wrap modulo 2^bits.
/// NaN and infinities become zero.
#[inline]
pub fn wrap_int(value: f64, bits: u32) -> u64 {
    debug_assert!(bits <= 32);
    if !value.is_finite() {
        return 0;
    }
    let modulus = (1u64 << bits) as f64;
    // remainder of an integral value is exact.
    value.trunc().rem_euclid(modulus) as u64
}

/// Round to nearest and saturate into [0, 255]. NaN becomes zero.
#[inline]
pub fn clamp_u8(value: f64) -> u8 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        value.round() as u8
    }
}
