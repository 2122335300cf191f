//! Typed views over shared byte regions.
//!
//! A [`ByteRegion`] owns a fixed-length block of bytes. Any number of
//! views can be constructed over (part of) a region:
//!
//! * [`TypedArray`] interprets bytes as a sequence of fixed-width
//!   numbers of one [`ElementKind`], coercing every written number by
//!   the rule of that kind.
//! * [`DataView`] reads and writes numbers of any width at any byte
//!   offset in either byte order.
//!
//! Views over overlapping bytes alias each other: a write through one
//! view is visible through every other view at once. Regions and views
//! are cheap handles, cloning them never copies bytes.
//!
//! ```
//! use tarray::{ByteRegion, DataView, ElementKind, Endian, TypedArray};
//!
//! let region = ByteRegion::new(8).unwrap();
//! let bytes = TypedArray::from_region(ElementKind::Uint8, &region, None, None).unwrap();
//! let view = DataView::new(&region, None, None).unwrap();
//! bytes.set(&[0x08, 0x09].map(f64::from), None).unwrap();
//! assert_eq!(0x0809, view.get_uint16(0, Endian::Big).unwrap());
//! ```
pub mod data_view;
pub mod error;
pub mod kind;
pub mod offset;
pub mod region;
pub mod typed;
pub mod validate;
pub mod view;

pub use data_view::DataView;
pub use error::{Error, Result};
pub use kind::{ElementKind, ALL_ELEMENT_KINDS};
pub use region::ByteRegion;
pub use typed::{ArrayLike, TypedArray};
pub use validate::ViewSource;
pub use view::{AnyView, ViewKind};

pub use tarray_storage::{ByteRepr, ByteStorage, Endian, StorageConfig, StoragePool};
