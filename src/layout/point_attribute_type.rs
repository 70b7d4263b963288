use std::{collections::HashMap, fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use static_assertions::const_assert;

use crate::{AttributeError, Result};

/// The primitive data types that a single element of a point attribute can be stored in. The discriminant of each
/// variant is its ordinal, which is how binary potree formats refer to attribute types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PointAttributeType {
    #[cfg_attr(feature = "serde", serde(rename = "double"))]
    Double = 0,
    #[cfg_attr(feature = "serde", serde(rename = "float"))]
    Float = 1,
    #[cfg_attr(feature = "serde", serde(rename = "int8"))]
    Int8 = 2,
    #[cfg_attr(feature = "serde", serde(rename = "uint8"))]
    UInt8 = 3,
    #[cfg_attr(feature = "serde", serde(rename = "int16"))]
    Int16 = 4,
    #[cfg_attr(feature = "serde", serde(rename = "uint16"))]
    UInt16 = 5,
    #[cfg_attr(feature = "serde", serde(rename = "int32"))]
    Int32 = 6,
    #[cfg_attr(feature = "serde", serde(rename = "uint32"))]
    UInt32 = 7,
    #[cfg_attr(feature = "serde", serde(rename = "int64"))]
    Int64 = 8,
    #[cfg_attr(feature = "serde", serde(rename = "uint64"))]
    UInt64 = 9,
}

lazy_static! {
    static ref TYPES_BY_NAME: HashMap<&'static str, PointAttributeType> = {
        let mut types = HashMap::with_capacity(2 * PointAttributeType::ALL.len());
        for datatype in PointAttributeType::ALL.iter().copied() {
            types.insert(datatype.key(), datatype);
            types.insert(datatype.name(), datatype);
        }
        types
    };
}

impl PointAttributeType {
    /// All point attribute types, indexed by their ordinal
    pub const ALL: [PointAttributeType; 10] = [
        PointAttributeType::Double,
        PointAttributeType::Float,
        PointAttributeType::Int8,
        PointAttributeType::UInt8,
        PointAttributeType::Int16,
        PointAttributeType::UInt16,
        PointAttributeType::Int32,
        PointAttributeType::UInt32,
        PointAttributeType::Int64,
        PointAttributeType::UInt64,
    ];

    /// Looks up a point attribute type by name. Both the registry key (e.g. `DATA_TYPE_FLOAT`) and the short name
    /// (e.g. `float`) are accepted.
    /// ```
    /// # use potree_attributes::layout::*;
    /// let datatype = PointAttributeType::from_name("DATA_TYPE_FLOAT").unwrap();
    /// assert_eq!(PointAttributeType::Float, datatype);
    /// assert_eq!(datatype, PointAttributeType::from_name("float").unwrap());
    /// ```
    pub fn from_name(name: &str) -> Result<Self> {
        TYPES_BY_NAME
            .get(name)
            .copied()
            .ok_or_else(|| AttributeError::UnknownTypeName(name.to_owned()))
    }

    /// Looks up a point attribute type by its ordinal
    /// ```
    /// # use potree_attributes::layout::*;
    /// let datatype = PointAttributeType::from_ordinal(1).unwrap();
    /// assert_eq!(PointAttributeType::Float, datatype);
    /// assert_eq!(4, datatype.size());
    /// assert!(PointAttributeType::from_ordinal(10).is_err());
    /// ```
    pub fn from_ordinal(ordinal: usize) -> Result<Self> {
        Self::ALL
            .get(ordinal)
            .copied()
            .ok_or(AttributeError::UnknownTypeOrdinal(ordinal))
    }

    /// Returns the ordinal of this type
    pub const fn ordinal(&self) -> usize {
        *self as usize
    }

    /// Returns the short name of this type, as it appears in potree metadata files
    pub const fn name(&self) -> &'static str {
        match self {
            PointAttributeType::Double => "double",
            PointAttributeType::Float => "float",
            PointAttributeType::Int8 => "int8",
            PointAttributeType::UInt8 => "uint8",
            PointAttributeType::Int16 => "int16",
            PointAttributeType::UInt16 => "uint16",
            PointAttributeType::Int32 => "int32",
            PointAttributeType::UInt32 => "uint32",
            PointAttributeType::Int64 => "int64",
            PointAttributeType::UInt64 => "uint64",
        }
    }

    /// Returns the registry key of this type
    pub const fn key(&self) -> &'static str {
        match self {
            PointAttributeType::Double => "DATA_TYPE_DOUBLE",
            PointAttributeType::Float => "DATA_TYPE_FLOAT",
            PointAttributeType::Int8 => "DATA_TYPE_INT8",
            PointAttributeType::UInt8 => "DATA_TYPE_UINT8",
            PointAttributeType::Int16 => "DATA_TYPE_INT16",
            PointAttributeType::UInt16 => "DATA_TYPE_UINT16",
            PointAttributeType::Int32 => "DATA_TYPE_INT32",
            PointAttributeType::UInt32 => "DATA_TYPE_UINT32",
            PointAttributeType::Int64 => "DATA_TYPE_INT64",
            PointAttributeType::UInt64 => "DATA_TYPE_UINT64",
        }
    }

    /// Returns the size in bytes of a single value of this type
    pub const fn size(&self) -> usize {
        match self {
            PointAttributeType::Double => 8,
            PointAttributeType::Float => 4,
            PointAttributeType::Int8 => 1,
            PointAttributeType::UInt8 => 1,
            PointAttributeType::Int16 => 2,
            PointAttributeType::UInt16 => 2,
            PointAttributeType::Int32 => 4,
            PointAttributeType::UInt32 => 4,
            PointAttributeType::Int64 => 8,
            PointAttributeType::UInt64 => 8,
        }
    }
}

impl Display for PointAttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for PointAttributeType {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Marker trait for all Rust types that can hold a single element of a point attribute. Maps the Rust type onto its
/// [PointAttributeType], so code that packs point records can go from a static type to the dynamic one.
pub trait PrimitiveType: Copy + 'static {
    const DATATYPE: PointAttributeType;
}

macro_rules! impl_primitive_type {
    ($type:ty, $variant:ident) => {
        impl PrimitiveType for $type {
            const DATATYPE: PointAttributeType = PointAttributeType::$variant;
        }

        const_assert!(std::mem::size_of::<$type>() == PointAttributeType::$variant.size());
    };
}

impl_primitive_type!(f64, Double);
impl_primitive_type!(f32, Float);
impl_primitive_type!(i8, Int8);
impl_primitive_type!(u8, UInt8);
impl_primitive_type!(i16, Int16);
impl_primitive_type!(u16, UInt16);
impl_primitive_type!(i32, Int32);
impl_primitive_type!(u32, UInt32);
impl_primitive_type!(i64, Int64);
impl_primitive_type!(u64, UInt64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_are_dense() {
        for (idx, datatype) in PointAttributeType::ALL.iter().enumerate() {
            assert_eq!(idx, datatype.ordinal());
            assert_eq!(*datatype, PointAttributeType::from_ordinal(idx).unwrap());
        }
    }

    #[test]
    fn test_lookup_round_trip() {
        for datatype in PointAttributeType::ALL {
            let by_name = PointAttributeType::from_name(datatype.name()).unwrap();
            let by_key = PointAttributeType::from_name(datatype.key()).unwrap();
            assert_eq!(by_name, by_key);
            assert_eq!(
                datatype.name(),
                PointAttributeType::from_ordinal(by_name.ordinal())
                    .unwrap()
                    .name()
            );
        }
    }

    #[test]
    fn test_sizes() {
        let expected_sizes = [8, 4, 1, 1, 2, 2, 4, 4, 8, 8];
        let actual_sizes = PointAttributeType::ALL
            .iter()
            .map(|datatype| datatype.size())
            .collect::<Vec<_>>();
        assert_eq!(expected_sizes.to_vec(), actual_sizes);
    }

    #[test]
    fn test_unknown_types() {
        assert_eq!(
            Err(AttributeError::UnknownTypeName("DATA_TYPE_HALF".into())),
            PointAttributeType::from_name("DATA_TYPE_HALF")
        );
        assert_eq!(
            Err(AttributeError::UnknownTypeOrdinal(10)),
            PointAttributeType::from_ordinal(10)
        );
        // Lookup is case sensitive
        assert!(PointAttributeType::from_name("Float").is_err());
    }

    #[test]
    fn test_from_str() {
        let datatype: PointAttributeType = "uint16".parse().unwrap();
        assert_eq!(PointAttributeType::UInt16, datatype);
        assert_eq!("uint16", datatype.to_string());
    }

    #[test]
    fn test_primitive_type_mapping() {
        fn datatype_of<T: PrimitiveType>() -> PointAttributeType {
            T::DATATYPE
        }
        assert_eq!(PointAttributeType::Double, datatype_of::<f64>());
        assert_eq!(PointAttributeType::UInt8, datatype_of::<u8>());
        assert_eq!(std::mem::size_of::<u32>(), datatype_of::<u32>().size());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&PointAttributeType::UInt16).unwrap();
        assert_eq!("\"uint16\"", json);
        let datatype: PointAttributeType = serde_json::from_str("\"double\"").unwrap();
        assert_eq!(PointAttributeType::Double, datatype);
    }
}
