use std::{borrow::Cow, fmt::Display};

use super::PointAttributeType;
use crate::{AttributeError, Result};

/// The standard point attributes of potree. Every definition in the [attributes] module carries one of these
/// tags, which is what identifies it as that standard attribute. Custom definitions never carry a tag, even if
/// their name, type and element count match a standard attribute exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StandardAttribute {
    PositionCartesian,
    RgbaPacked,
    RgbPacked,
    NormalFloats,
    Intensity,
    Classification,
    NormalSpheremapped,
    NormalOct16,
    Normal,
    ReturnNumber,
    NumberOfReturns,
    SourceId,
    Indices,
    Spacing,
    GpsTime,
}

impl StandardAttribute {
    /// All standard attributes in catalog order
    pub const ALL: [StandardAttribute; 15] = [
        StandardAttribute::PositionCartesian,
        StandardAttribute::RgbaPacked,
        StandardAttribute::RgbPacked,
        StandardAttribute::NormalFloats,
        StandardAttribute::Intensity,
        StandardAttribute::Classification,
        StandardAttribute::NormalSpheremapped,
        StandardAttribute::NormalOct16,
        StandardAttribute::Normal,
        StandardAttribute::ReturnNumber,
        StandardAttribute::NumberOfReturns,
        StandardAttribute::SourceId,
        StandardAttribute::Indices,
        StandardAttribute::Spacing,
        StandardAttribute::GpsTime,
    ];

    /// Returns the name under which this attribute is registered in the catalog. This is not always the name of
    /// the attribute definition itself: `RGBA_PACKED` and `RGB_PACKED` are both named `COLOR_PACKED`.
    pub const fn key(&self) -> &'static str {
        match self {
            StandardAttribute::PositionCartesian => "POSITION_CARTESIAN",
            StandardAttribute::RgbaPacked => "RGBA_PACKED",
            StandardAttribute::RgbPacked => "RGB_PACKED",
            StandardAttribute::NormalFloats => "NORMAL_FLOATS",
            StandardAttribute::Intensity => "INTENSITY",
            StandardAttribute::Classification => "CLASSIFICATION",
            StandardAttribute::NormalSpheremapped => "NORMAL_SPHEREMAPPED",
            StandardAttribute::NormalOct16 => "NORMAL_OCT16",
            StandardAttribute::Normal => "NORMAL",
            StandardAttribute::ReturnNumber => "RETURN_NUMBER",
            StandardAttribute::NumberOfReturns => "NUMBER_OF_RETURNS",
            StandardAttribute::SourceId => "SOURCE_ID",
            StandardAttribute::Indices => "INDICES",
            StandardAttribute::Spacing => "SPACING",
            StandardAttribute::GpsTime => "GPS_TIME",
        }
    }

    /// Returns the catalog definition for this standard attribute
    /// ```
    /// # use potree_attributes::layout::*;
    /// assert_eq!(attributes::INTENSITY, StandardAttribute::Intensity.definition());
    /// ```
    pub fn definition(&self) -> PointAttributeDefinition {
        match self {
            StandardAttribute::PositionCartesian => attributes::POSITION_CARTESIAN,
            StandardAttribute::RgbaPacked => attributes::RGBA_PACKED,
            StandardAttribute::RgbPacked => attributes::RGB_PACKED,
            StandardAttribute::NormalFloats => attributes::NORMAL_FLOATS,
            StandardAttribute::Intensity => attributes::INTENSITY,
            StandardAttribute::Classification => attributes::CLASSIFICATION,
            StandardAttribute::NormalSpheremapped => attributes::NORMAL_SPHEREMAPPED,
            StandardAttribute::NormalOct16 => attributes::NORMAL_OCT16,
            StandardAttribute::Normal => attributes::NORMAL,
            StandardAttribute::ReturnNumber => attributes::RETURN_NUMBER,
            StandardAttribute::NumberOfReturns => attributes::NUMBER_OF_RETURNS,
            StandardAttribute::SourceId => attributes::SOURCE_ID,
            StandardAttribute::Indices => attributes::INDICES,
            StandardAttribute::Spacing => attributes::SPACING,
            StandardAttribute::GpsTime => attributes::GPS_TIME,
        }
    }

    /// Is this one of the representations of a point normal?
    pub fn is_normal(&self) -> bool {
        matches!(
            self,
            StandardAttribute::Normal
                | StandardAttribute::NormalFloats
                | StandardAttribute::NormalOct16
                | StandardAttribute::NormalSpheremapped
        )
    }
}

/// A definition for a single point attribute, like the position or the intensity of a point. A definition has a
/// name and stores `num_elements` values of a primitive [PointAttributeType], so a 3D position with `float`
/// components has three elements and a size of 12 bytes.
///
/// Definitions are immutable values. The `with_*` methods return a modified copy. Names are not unique: two
/// definitions with the same name but different types or element counts are different attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointAttributeDefinition {
    name: Cow<'static, str>,
    datatype: PointAttributeType,
    num_elements: usize,
    byte_size: usize,
    description: Cow<'static, str>,
    range: [f64; 2],
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    standard: Option<StandardAttribute>,
}

impl PointAttributeDefinition {
    /// The largest size in bytes that a single attribute may have
    pub const MAX_BYTE_SIZE: usize = u32::MAX as usize;

    const EMPTY_RANGE: [f64; 2] = [f64::INFINITY, f64::NEG_INFINITY];

    const fn standard(
        standard: StandardAttribute,
        name: &'static str,
        datatype: PointAttributeType,
        num_elements: usize,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            datatype,
            num_elements,
            byte_size: num_elements * datatype.size(),
            description: Cow::Borrowed(""),
            range: Self::EMPTY_RANGE,
            standard: Some(standard),
        }
    }

    /// Creates a new custom PointAttributeDefinition with the given name, data type and number of elements. Fails if
    /// `num_elements` is zero or if the attribute would be larger than [MAX_BYTE_SIZE](Self::MAX_BYTE_SIZE) bytes
    /// ```
    /// # use potree_attributes::layout::*;
    /// let custom_attribute = PointAttributeDefinition::custom("Custom", PointAttributeType::UInt16, 2).unwrap();
    /// # assert_eq!(custom_attribute.name(), "Custom");
    /// assert_eq!(4, custom_attribute.byte_size());
    /// assert!(PointAttributeDefinition::custom("Custom", PointAttributeType::UInt16, 0).is_err());
    /// ```
    pub fn custom<S: Into<Cow<'static, str>>>(
        name: S,
        datatype: PointAttributeType,
        num_elements: usize,
    ) -> Result<Self> {
        let name = name.into();
        let byte_size = match num_elements.checked_mul(datatype.size()) {
            Some(byte_size) if num_elements > 0 && byte_size <= Self::MAX_BYTE_SIZE => byte_size,
            _ => {
                return Err(AttributeError::InvalidElementCount {
                    name: name.into_owned(),
                    num_elements,
                });
            }
        };
        Ok(Self {
            name,
            datatype,
            num_elements,
            byte_size,
            description: Cow::Borrowed(""),
            range: Self::EMPTY_RANGE,
            standard: None,
        })
    }

    /// Returns the name of this PointAttributeDefinition
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the datatype of a single element of this PointAttributeDefinition
    pub fn datatype(&self) -> PointAttributeType {
        self.datatype
    }

    /// Returns the number of elements of this PointAttributeDefinition
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Returns the size in bytes of this attribute, which is `num_elements() * datatype().size()`
    /// ```
    /// # use potree_attributes::layout::*;
    /// assert_eq!(12, attributes::POSITION_CARTESIAN.byte_size());
    /// assert_eq!(8, attributes::GPS_TIME.byte_size());
    /// ```
    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Returns the free-form description of this attribute. Empty unless set through `with_description`
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the value range `[min, max]` of this attribute. An unset range is `[+inf, -inf]`
    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Returns true if a value range has been set for this attribute
    pub fn has_range(&self) -> bool {
        self.range[0] <= self.range[1]
    }

    /// Returns the [StandardAttribute] this definition belongs to, or `None` for custom attributes
    pub fn standard_attribute(&self) -> Option<StandardAttribute> {
        self.standard
    }

    /// Is this one of the standard normal attributes (`NORMAL`, `NORMAL_FLOATS`, `NORMAL_OCT16` or
    /// `NORMAL_SPHEREMAPPED`)?
    /// ```
    /// # use potree_attributes::layout::*;
    /// assert!(attributes::NORMAL_OCT16.is_normal());
    /// let lookalike = PointAttributeDefinition::custom("NORMAL_OCT16", PointAttributeType::UInt8, 2).unwrap();
    /// assert!(!lookalike.is_normal());
    /// ```
    pub fn is_normal(&self) -> bool {
        self.standard.map_or(false, |standard| standard.is_normal())
    }

    /// Returns a new PointAttributeDefinition based on this one, but with the given description
    /// ```
    /// # use potree_attributes::layout::*;
    /// let intensity = attributes::INTENSITY.with_description("Return strength");
    /// # assert_eq!("Return strength", intensity.description());
    /// # assert_eq!("", attributes::INTENSITY.description());
    /// ```
    pub fn with_description<S: Into<Cow<'static, str>>>(&self, description: S) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Returns a new PointAttributeDefinition based on this one, but with the value range `[min, max]`
    pub fn with_range(&self, min: f64, max: f64) -> Self {
        Self {
            range: [min, max],
            ..self.clone()
        }
    }
}

impl Display for PointAttributeDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.num_elements == 1 {
            write!(f, "{}: {}", self.name, self.datatype)
        } else {
            write!(f, "{}: {}[{}]", self.name, self.datatype, self.num_elements)
        }
    }
}

/// The catalog of standard potree point attributes
pub mod attributes {
    use std::collections::HashMap;

    use lazy_static::lazy_static;
    use log::debug;

    use super::{PointAttributeDefinition, StandardAttribute};
    use crate::{layout::PointAttributeType, AttributeError, Result};

    macro_rules! standard_attribute {
        ($(#[$doc:meta])* $const_name:ident, $kind:ident, $name:expr, $datatype:ident, $num_elements:expr) => {
            $(#[$doc])*
            pub const $const_name: PointAttributeDefinition = PointAttributeDefinition::standard(
                StandardAttribute::$kind,
                $name,
                PointAttributeType::$datatype,
                $num_elements,
            );
        };
    }

    standard_attribute!(
        /// Cartesian 3D position, stored as three floats
        POSITION_CARTESIAN, PositionCartesian, "POSITION_CARTESIAN", Float, 3
    );
    standard_attribute!(
        /// Packed RGBA color, stored as four bytes
        RGBA_PACKED, RgbaPacked, "COLOR_PACKED", Int8, 4
    );
    standard_attribute!(
        /// Packed RGB color, stored as three bytes. Shares the name `COLOR_PACKED` with [RGBA_PACKED]
        RGB_PACKED, RgbPacked, "COLOR_PACKED", Int8, 3
    );
    standard_attribute!(NORMAL_FLOATS, NormalFloats, "NORMAL_FLOATS", Float, 3);
    standard_attribute!(INTENSITY, Intensity, "INTENSITY", UInt16, 1);
    standard_attribute!(CLASSIFICATION, Classification, "CLASSIFICATION", UInt8, 1);
    standard_attribute!(
        /// Normal encoded with a spheremap transform into two bytes
        NORMAL_SPHEREMAPPED, NormalSpheremapped, "NORMAL_SPHEREMAPPED", UInt8, 2
    );
    standard_attribute!(
        /// Normal in octahedral encoding with 8 bits per component
        NORMAL_OCT16, NormalOct16, "NORMAL_OCT16", UInt8, 2
    );
    standard_attribute!(NORMAL, Normal, "NORMAL", Float, 3);
    standard_attribute!(RETURN_NUMBER, ReturnNumber, "RETURN_NUMBER", UInt8, 1);
    standard_attribute!(
        NUMBER_OF_RETURNS,
        NumberOfReturns,
        "NUMBER_OF_RETURNS",
        UInt8,
        1
    );
    standard_attribute!(SOURCE_ID, SourceId, "SOURCE_ID", UInt16, 1);
    standard_attribute!(INDICES, Indices, "INDICES", UInt32, 1);
    standard_attribute!(SPACING, Spacing, "SPACING", Float, 1);
    standard_attribute!(GPS_TIME, GpsTime, "GPS_TIME", Double, 1);

    /// Alias for [RGBA_PACKED]
    pub const COLOR_PACKED: PointAttributeDefinition = RGBA_PACKED;

    lazy_static! {
        static ref STANDARD_ATTRIBUTES_BY_NAME: HashMap<&'static str, StandardAttribute> = {
            let mut attributes = StandardAttribute::ALL
                .iter()
                .map(|standard| (standard.key(), *standard))
                .collect::<HashMap<_, _>>();
            attributes.insert("COLOR_PACKED", StandardAttribute::RgbaPacked);
            attributes
        };
    }

    /// Returns all standard attribute definitions in catalog order. The `COLOR_PACKED` alias is not listed separately
    pub fn all() -> impl Iterator<Item = PointAttributeDefinition> {
        StandardAttribute::ALL
            .iter()
            .map(|standard| standard.definition())
    }

    /// Returns all names that [by_name] understands, sorted alphabetically
    pub fn names() -> Vec<&'static str> {
        let mut names = STANDARD_ATTRIBUTES_BY_NAME
            .keys()
            .copied()
            .collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Looks up a standard attribute by its catalog name
    /// ```
    /// # use potree_attributes::layout::*;
    /// let color = attributes::by_name("COLOR_PACKED").unwrap();
    /// assert_eq!(attributes::RGBA_PACKED, color);
    /// assert!(attributes::by_name("NOT_A_REAL_NAME").is_err());
    /// ```
    pub fn by_name(name: &str) -> Result<PointAttributeDefinition> {
        match STANDARD_ATTRIBUTES_BY_NAME.get(name) {
            Some(standard) => Ok(standard.definition()),
            None => {
                debug!("No standard point attribute named '{}'", name);
                Err(AttributeError::UnknownAttribute(name.to_owned()))
            }
        }
    }
}
