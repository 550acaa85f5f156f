//! Runtime type tags and the element type registry.
//!
//! A host describes the elements of its arrays with a small integer, the [`TypeTag`]. Numerical
//! routines are instantiated for concrete Rust types, but the code that sits between the host and
//! those routines regularly needs to recover the size and alignment of an element from such a tag,
//! e.g. to convert strides in bytes to strides in elements. The registry in this module is the
//! single source of truth for that information.
//!
//! The set of supported types is closed: every tag is a variant of [`TypeTag`], and the table of
//! [`TypeInfo`] records is a `static` that is built at compile time. Looking up a record never
//! fails, the tag `0` and any out-of-range integer resolve to the sentinel record of
//! [`TypeTag::Invalid`].

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    mem::{align_of, size_of},
    os::raw::{c_int, c_long},
};

use crate::{
    data::array::dimensions::strides_from_bytes,
    error::{ArrayResult, TypeError},
};

/// Identifies a primitive element type at run time.
///
/// The discriminant of each variant is the integer the host uses for that type.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    #[default]
    Invalid = 0,
    /// C `int`
    Int = 1,
    /// C `long`
    Long = 2,
    /// Pointer-sized unsigned integer
    USize = 3,
    I8 = 4,
    I16 = 5,
    I32 = 6,
    I64 = 7,
    U8 = 8,
    U16 = 9,
    U32 = 10,
    U64 = 11,
    F32 = 12,
    F64 = 13,
    Bool = 14,
    F16 = 15,
    /// A complex number made of two `f32`s
    Complex64 = 16,
    /// A complex number made of two `f64`s
    Complex128 = 17,
}

impl TypeTag {
    /// The number of tags, including [`TypeTag::Invalid`].
    pub const COUNT: usize = 18;

    /// All valid tags in order.
    pub const ALL: [TypeTag; Self::COUNT - 1] = [
        TypeTag::Int,
        TypeTag::Long,
        TypeTag::USize,
        TypeTag::I8,
        TypeTag::I16,
        TypeTag::I32,
        TypeTag::I64,
        TypeTag::U8,
        TypeTag::U16,
        TypeTag::U32,
        TypeTag::U64,
        TypeTag::F32,
        TypeTag::F64,
        TypeTag::Bool,
        TypeTag::F16,
        TypeTag::Complex64,
        TypeTag::Complex128,
    ];

    /// Convert a raw tag to a `TypeTag`, unknown values are converted to `TypeTag::Invalid`.
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            1 => TypeTag::Int,
            2 => TypeTag::Long,
            3 => TypeTag::USize,
            4 => TypeTag::I8,
            5 => TypeTag::I16,
            6 => TypeTag::I32,
            7 => TypeTag::I64,
            8 => TypeTag::U8,
            9 => TypeTag::U16,
            10 => TypeTag::U32,
            11 => TypeTag::U64,
            12 => TypeTag::F32,
            13 => TypeTag::F64,
            14 => TypeTag::Bool,
            15 => TypeTag::F16,
            16 => TypeTag::Complex64,
            17 => TypeTag::Complex128,
            _ => TypeTag::Invalid,
        }
    }

    /// Returns the raw value of this tag.
    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns `false` if this is `TypeTag::Invalid`.
    #[inline]
    pub const fn is_valid(self) -> bool {
        !matches!(self, TypeTag::Invalid)
    }

    /// Returns the registry record of this tag.
    #[inline]
    pub fn info(self) -> &'static TypeInfo {
        lookup(self)
    }

    /// Returns the size of an element of this type in bytes, 0 for `TypeTag::Invalid`.
    #[inline]
    pub fn size(self) -> usize {
        self.info().size
    }

    /// Returns the alignment of an element of this type in bytes, 0 for `TypeTag::Invalid`.
    #[inline]
    pub fn align(self) -> usize {
        self.info().align
    }

    /// Returns the display name of this type.
    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.name())
    }
}

/// The smallest or largest value of a type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Limit {
    Int(i128),
    Float(f64),
}

/// Immutable metadata of an element type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TypeInfo {
    /// The size of an element in bytes.
    pub size: usize,
    /// The alignment of an element in bytes.
    pub align: usize,
    /// Human-readable name.
    pub name: &'static str,
    pub is_signed: bool,
    pub is_integer: bool,
    pub is_floating: bool,
    pub is_complex: bool,
    /// The smallest representable value, if the type has a scalar range.
    pub min: Option<Limit>,
    /// The largest representable value, if the type has a scalar range.
    pub max: Option<Limit>,
}

impl TypeInfo {
    /// The record returned for invalid and unknown tags.
    pub const INVALID: TypeInfo = TypeInfo {
        size: 0,
        align: 0,
        name: "invalid",
        is_signed: false,
        is_integer: false,
        is_floating: false,
        is_complex: false,
        min: None,
        max: None,
    };

    const fn integer<T>(name: &'static str, is_signed: bool, min: i128, max: i128) -> Self {
        TypeInfo {
            size: size_of::<T>(),
            align: align_of::<T>(),
            name,
            is_signed,
            is_integer: true,
            is_floating: false,
            is_complex: false,
            min: Some(Limit::Int(min)),
            max: Some(Limit::Int(max)),
        }
    }

    const fn floating<T>(name: &'static str, min: f64, max: f64) -> Self {
        TypeInfo {
            size: size_of::<T>(),
            align: align_of::<T>(),
            name,
            is_signed: true,
            is_integer: false,
            is_floating: true,
            is_complex: false,
            min: Some(Limit::Float(min)),
            max: Some(Limit::Float(max)),
        }
    }

    const fn boolean() -> Self {
        TypeInfo {
            size: size_of::<bool>(),
            align: align_of::<bool>(),
            name: "bool",
            is_signed: false,
            is_integer: false,
            is_floating: false,
            is_complex: false,
            min: Some(Limit::Int(0)),
            max: Some(Limit::Int(1)),
        }
    }

    const fn complex<T>(name: &'static str) -> Self {
        TypeInfo {
            size: size_of::<T>(),
            align: align_of::<T>(),
            name,
            is_signed: true,
            is_integer: false,
            is_floating: true,
            is_complex: true,
            min: None,
            max: None,
        }
    }

    /// Returns `true` if this is the sentinel record.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if elements described by `self` and `other` can be reinterpreted as each
    /// other, e.g. C `int` and `i32` on most targets.
    pub fn is_layout_compatible(&self, other: &TypeInfo) -> bool {
        !self.is_invalid()
            && self.size == other.size
            && self.align == other.align
            && self.is_signed == other.is_signed
            && self.is_integer == other.is_integer
            && self.is_floating == other.is_floating
            && self.is_complex == other.is_complex
    }
}

static TYPE_INFOS: [TypeInfo; TypeTag::COUNT] = [
    TypeInfo::INVALID,
    TypeInfo::integer::<c_int>("int", true, c_int::MIN as i128, c_int::MAX as i128),
    TypeInfo::integer::<c_long>("long", true, c_long::MIN as i128, c_long::MAX as i128),
    TypeInfo::integer::<usize>("usize", false, 0, usize::MAX as i128),
    TypeInfo::integer::<i8>("i8", true, i8::MIN as i128, i8::MAX as i128),
    TypeInfo::integer::<i16>("i16", true, i16::MIN as i128, i16::MAX as i128),
    TypeInfo::integer::<i32>("i32", true, i32::MIN as i128, i32::MAX as i128),
    TypeInfo::integer::<i64>("i64", true, i64::MIN as i128, i64::MAX as i128),
    TypeInfo::integer::<u8>("u8", false, 0, u8::MAX as i128),
    TypeInfo::integer::<u16>("u16", false, 0, u16::MAX as i128),
    TypeInfo::integer::<u32>("u32", false, 0, u32::MAX as i128),
    TypeInfo::integer::<u64>("u64", false, 0, u64::MAX as i128),
    TypeInfo::floating::<f32>("f32", f32::MIN as f64, f32::MAX as f64),
    TypeInfo::floating::<f64>("f64", f64::MIN, f64::MAX),
    TypeInfo::boolean(),
    // IEEE half precision, laid out like a u16
    TypeInfo::floating::<u16>("f16", -65504.0, 65504.0),
    TypeInfo::complex::<[f32; 2]>("complex64"),
    TypeInfo::complex::<[f64; 2]>("complex128"),
];

/// Returns the record of `tag`.
#[inline]
pub fn lookup(tag: TypeTag) -> &'static TypeInfo {
    &TYPE_INFOS[tag as usize]
}

/// Returns the record of the raw tag `raw`, the sentinel record is returned if `raw` is not a
/// valid tag.
#[inline]
pub fn lookup_raw(raw: i32) -> &'static TypeInfo {
    lookup(TypeTag::from_raw(raw))
}

/// Convert strides in bytes to strides in elements of type `tag`.
///
/// Fails if `tag` is invalid or if a stride is negative or not a multiple of the element size.
pub fn element_strides(
    byte_strides: &[isize],
    tag: TypeTag,
    strides: &mut [usize],
) -> ArrayResult<()> {
    if !tag.is_valid() {
        Err(TypeError::InvalidTag)?;
    }

    strides_from_bytes(byte_strides, tag.size(), strides)?;
    Ok(())
}
