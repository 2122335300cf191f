use crate::data_view::DataView;
use crate::error::{Error, Result};
use crate::kind::ElementKind;
use crate::region::ByteRegion;
use crate::typed::TypedArray;
use crate::validate::ViewSource;

/// Kind of view to construct by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Common base of all views, which cannot be constructed.
    Abstract,
    Typed(ElementKind),
    Data,
}

impl ViewKind {
    /// Resolve view kind from type name, e.g. "Int16Array", "DataView".
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "ArrayBufferView" => Ok(ViewKind::Abstract),
            "DataView" => Ok(ViewKind::Data),
            "TypedArray" => Err(Error::InvalidArgument(
                "TypedArray cannot be constructed without element kind".to_string(),
            )),
            _ => ElementKind::from_name(name)
                .map(ViewKind::Typed)
                .ok_or_else(|| Error::InvalidArgument(format!("unknown view type {}", name))),
        }
    }
}

/// Either kind of view over a byte region.
#[derive(Debug, Clone)]
pub enum AnyView {
    Typed(TypedArray),
    Data(DataView),
}

impl AnyView {
    /// Construct view of given kind.
    pub fn construct<'a, S: Into<ViewSource<'a>>>(
        kind: ViewKind,
        source: S,
        byte_offset: Option<i64>,
        length: Option<i64>,
    ) -> Result<Self> {
        match kind {
            ViewKind::Abstract => Err(Error::InvalidConstructorCall),
            ViewKind::Typed(k) => TypedArray::new(k, source, byte_offset, length).map(AnyView::Typed),
            ViewKind::Data => DataView::new(source, byte_offset, length).map(AnyView::Data),
        }
    }

    /// Construct view by type name.
    #[inline]
    pub fn construct_by_name<'a, S: Into<ViewSource<'a>>>(
        name: &str,
        source: S,
        byte_offset: Option<i64>,
        length: Option<i64>,
    ) -> Result<Self> {
        let kind = ViewKind::from_name(name)?;
        AnyView::construct(kind, source, byte_offset, length)
    }

    #[inline]
    pub fn kind(&self) -> ViewKind {
        match self {
            AnyView::Typed(t) => ViewKind::Typed(t.kind()),
            AnyView::Data(_) => ViewKind::Data,
        }
    }

    #[inline]
    pub fn buffer(&self) -> &ByteRegion {
        match self {
            AnyView::Typed(t) => t.buffer(),
            AnyView::Data(d) => d.buffer(),
        }
    }

    #[inline]
    pub fn byte_offset(&self) -> usize {
        match self {
            AnyView::Typed(t) => t.byte_offset(),
            AnyView::Data(d) => d.byte_offset(),
        }
    }

    #[inline]
    pub fn byte_length(&self) -> usize {
        match self {
            AnyView::Typed(t) => t.byte_length(),
            AnyView::Data(d) => d.byte_length(),
        }
    }

    #[inline]
    pub fn as_typed(&self) -> Option<&TypedArray> {
        match self {
            AnyView::Typed(t) => Some(t),
            _ => None,
        }
    }

    #[inline]
    pub fn as_data(&self) -> Option<&DataView> {
        match self {
            AnyView::Data(d) => Some(d),
            _ => None,
        }
    }
}

impl From<TypedArray> for AnyView {
    #[inline]
    fn from(src: TypedArray) -> Self {
        AnyView::Typed(src)
    }
}

impl From<DataView> for AnyView {
    #[inline]
    fn from(src: DataView) -> Self {
        AnyView::Data(src)
    }
}
