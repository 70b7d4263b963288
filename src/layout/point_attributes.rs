use std::{fmt::Display, iter::FromIterator, ops::Deref, sync::Arc};

use itertools::Itertools;
use log::{debug, trace};
use static_assertions::assert_impl_all;

use super::{attributes, PointAttributeDefinition};
use crate::{AttributeError, Result};

/// Groups several attributes of a record into one vector quantity, e.g. three scalar attributes that together form
/// a 3D vector. Vectors are metadata only and do not take part in the byte layout of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointVector {
    pub name: String,
    pub attributes: Vec<String>,
}

impl PointVector {
    pub fn new<S: Into<String>>(name: S, attributes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }
}

/// Describes the layout of a single point record as an ordered sequence of attributes. The attributes are tightly
/// packed in the order in which they were added, so the offset of an attribute is the sum of the sizes of all
/// attributes before it.
///
/// `PointAttributes` can only grow: attributes are appended with [add](PointAttributes::add) and never removed or
/// reordered. The same attribute may appear more than once. Record sizes and offsets are `u64`, and a single attribute
/// is at most [MAX_BYTE_SIZE](PointAttributeDefinition::MAX_BYTE_SIZE) bytes, so adding attributes never overflows
/// the record size. Once a layout is complete, [freeze](PointAttributes::freeze)
/// turns it into a [SharedPointAttributes] that can be handed to other threads.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointAttributes {
    attributes: Vec<PointAttributeDefinition>,
    byte_size: u64,
    vectors: Vec<PointVector>,
}

impl PointAttributes {
    /// Creates a new empty PointAttributes
    /// ```
    /// # use potree_attributes::layout::*;
    /// let point_attributes = PointAttributes::new();
    /// # assert_eq!(0, point_attributes.size());
    /// # assert_eq!(0, point_attributes.byte_size());
    /// ```
    pub fn new() -> Self {
        Self {
            ..Default::default()
        }
    }

    /// Creates a new PointAttributes from the names of standard attributes, see [attributes::by_name]. Fails if any of
    /// the names is unknown, in which case no PointAttributes is created at all.
    /// ```
    /// # use potree_attributes::layout::*;
    /// let point_attributes = PointAttributes::from_names(&["POSITION_CARTESIAN", "COLOR_PACKED"]).unwrap();
    /// assert_eq!(2, point_attributes.size());
    /// assert_eq!(16, point_attributes.byte_size());
    /// assert!(PointAttributes::from_names(&["POSITION_CARTESIAN", "NOT_A_REAL_NAME"]).is_err());
    /// ```
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let definitions = names
            .into_iter()
            .map(|name| attributes::by_name(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let point_attributes = definitions.into_iter().collect::<Self>();
        debug!("Created point attributes {}", point_attributes);
        Ok(point_attributes)
    }

    /// Creates a new PointAttributes from the given sequence of attribute definitions
    pub fn from_attributes(attributes: &[PointAttributeDefinition]) -> Self {
        attributes.iter().cloned().collect()
    }

    /// Appends the given attribute to the end of this PointAttributes
    /// ```
    /// # use potree_attributes::layout::*;
    /// let mut point_attributes = PointAttributes::new();
    /// point_attributes.add(attributes::POSITION_CARTESIAN);
    /// point_attributes.add(attributes::INTENSITY);
    /// assert_eq!(2, point_attributes.size());
    /// assert_eq!(14, point_attributes.byte_size());
    /// ```
    pub fn add(&mut self, attribute: PointAttributeDefinition) {
        trace!(
            "Adding attribute {} at offset {}",
            attribute,
            self.byte_size
        );
        self.byte_size += attribute.byte_size() as u64;
        self.attributes.push(attribute);
    }

    /// Appends the given vector to the vectors of this PointAttributes. This has no effect on the attributes or the
    /// byte layout
    pub fn add_vector(&mut self, vector: PointVector) {
        self.vectors.push(vector);
    }

    /// Returns true if this PointAttributes contains at least one of the standard normal attributes (`NORMAL`,
    /// `NORMAL_FLOATS`, `NORMAL_OCT16` or `NORMAL_SPHEREMAPPED`). Custom attributes never count as normals, regardless
    /// of their name
    /// ```
    /// # use potree_attributes::layout::*;
    /// let mut point_attributes = PointAttributes::from_attributes(&[attributes::POSITION_CARTESIAN]);
    /// assert!(!point_attributes.has_normals());
    /// point_attributes.add(attributes::NORMAL_OCT16);
    /// assert!(point_attributes.has_normals());
    /// ```
    pub fn has_normals(&self) -> bool {
        self.attributes
            .iter()
            .any(|attribute| attribute.is_normal())
    }

    /// Returns the offset in bytes to the start of the attribute at `index` within a tightly packed point record.
    /// Fails if `index` is not smaller than [size](PointAttributes::size)
    /// ```
    /// # use potree_attributes::layout::*;
    /// let point_attributes = PointAttributes::from_attributes(&[attributes::POSITION_CARTESIAN, attributes::INTENSITY]);
    /// assert_eq!(0, point_attributes.offset_of(0).unwrap());
    /// assert_eq!(12, point_attributes.offset_of(1).unwrap());
    /// assert!(point_attributes.offset_of(2).is_err());
    /// ```
    pub fn offset_of(&self, index: usize) -> Result<u64> {
        if index >= self.attributes.len() {
            return Err(AttributeError::IndexOutOfRange {
                index,
                size: self.attributes.len(),
            });
        }
        Ok(self.attributes[..index]
            .iter()
            .map(|attribute| attribute.byte_size() as u64)
            .sum())
    }

    /// Returns the attribute at `index`, or `None` if `index` is out of range
    pub fn get(&self, index: usize) -> Option<&PointAttributeDefinition> {
        self.attributes.get(index)
    }

    /// Returns the index of the first attribute with the given name, or `None` if there is no such attribute
    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attribute| attribute.name() == name)
    }

    /// Returns an iterator over all attributes in this PointAttributes, in record order
    pub fn attributes(&self) -> impl Iterator<Item = &PointAttributeDefinition> + '_ {
        self.attributes.iter()
    }

    /// Returns an iterator over all attributes in this PointAttributes together with their offset within the record
    /// ```
    /// # use potree_attributes::layout::*;
    /// let point_attributes = PointAttributes::from_attributes(&[attributes::GPS_TIME, attributes::CLASSIFICATION]);
    /// let offsets = point_attributes
    ///     .attributes_with_offsets()
    ///     .map(|(offset, _)| offset)
    ///     .collect::<Vec<_>>();
    /// assert_eq!(vec![0, 8], offsets);
    /// ```
    pub fn attributes_with_offsets(
        &self,
    ) -> impl Iterator<Item = (u64, &PointAttributeDefinition)> + '_ {
        self.attributes.iter().scan(0, |offset, attribute| {
            let attribute_offset = *offset;
            *offset += attribute.byte_size() as u64;
            Some((attribute_offset, attribute))
        })
    }

    /// Returns the size in bytes of a single point record, i.e. the stride of a buffer of tightly packed records
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Returns the number of attributes in this PointAttributes
    pub fn size(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns all vectors of this PointAttributes in the order in which they were added
    pub fn vectors(&self) -> &[PointVector] {
        &self.vectors
    }

    /// Turns this PointAttributes into an immutable [SharedPointAttributes]
    pub fn freeze(self) -> SharedPointAttributes {
        SharedPointAttributes(Arc::new(self))
    }
}

impl FromIterator<PointAttributeDefinition> for PointAttributes {
    fn from_iter<T: IntoIterator<Item = PointAttributeDefinition>>(iter: T) -> Self {
        let mut point_attributes = Self::new();
        point_attributes.extend(iter);
        point_attributes
    }
}

impl Extend<PointAttributeDefinition> for PointAttributes {
    fn extend<T: IntoIterator<Item = PointAttributeDefinition>>(&mut self, iter: T) {
        for attribute in iter {
            self.add(attribute);
        }
    }
}

impl Display for PointAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] ({} bytes)",
            self.attributes.iter().join(", "),
            self.byte_size
        )
    }
}

/// An immutable, cheaply clonable snapshot of a [PointAttributes]. All read-only queries of `PointAttributes` are
/// available through `Deref`. Clones share the same underlying layout, so this is the type to hand out to multiple
/// readers, possibly on other threads.
/// ```
/// # use potree_attributes::layout::*;
/// let shared = PointAttributes::from_names(&["POSITION_CARTESIAN", "INTENSITY"]).unwrap().freeze();
/// let reader = shared.clone();
/// let stride = std::thread::spawn(move || reader.byte_size()).join().unwrap();
/// assert_eq!(shared.byte_size(), stride);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SharedPointAttributes(Arc<PointAttributes>);

assert_impl_all!(SharedPointAttributes: Send, Sync, Clone);

impl SharedPointAttributes {
    /// Returns an owned copy of the underlying PointAttributes that can be extended further. The snapshot itself is
    /// not affected by changes to the copy
    pub fn to_owned_attributes(&self) -> PointAttributes {
        self.0.as_ref().clone()
    }
}

impl Deref for SharedPointAttributes {
    type Target = PointAttributes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<PointAttributes> for SharedPointAttributes {
    fn from(point_attributes: PointAttributes) -> Self {
        point_attributes.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        layout::{PointAttributeType, StandardAttribute},
        ErrorKind,
    };

    #[test]
    fn test_empty() {
        let point_attributes = PointAttributes::new();
        assert!(point_attributes.is_empty());
        assert_eq!(0, point_attributes.size());
        assert_eq!(0, point_attributes.byte_size());
        assert!(!point_attributes.has_normals());
        assert_eq!(
            Err(AttributeError::IndexOutOfRange { index: 0, size: 0 }),
            point_attributes.offset_of(0)
        );
        assert_eq!(
            point_attributes,
            PointAttributes::from_names(Vec::<String>::new()).unwrap()
        );
    }

    #[test]
    fn test_from_names_keeps_order() {
        let names = ["GPS_TIME", "INTENSITY", "POSITION_CARTESIAN"];
        let point_attributes = PointAttributes::from_names(&names).unwrap();
        let actual_names = point_attributes
            .attributes()
            .map(|attribute| attribute.name())
            .collect::<Vec<_>>();
        assert_eq!(names.to_vec(), actual_names);
        assert_eq!(8 + 2 + 12, point_attributes.byte_size());
    }

    #[test]
    fn test_from_names_fails_on_unknown_name() {
        let error =
            PointAttributes::from_names(vec!["POSITION_CARTESIAN".to_string(), "RGB".to_string()])
                .unwrap_err();
        assert_eq!(AttributeError::UnknownAttribute("RGB".into()), error);
        assert_eq!(ErrorKind::NotFound, error.kind());
    }

    #[test]
    fn test_duplicates_are_allowed() {
        let point_attributes =
            PointAttributes::from_attributes(&[attributes::INTENSITY, attributes::INTENSITY]);
        assert_eq!(2, point_attributes.size());
        assert_eq!(4, point_attributes.byte_size());
        assert_eq!(2, point_attributes.offset_of(1).unwrap());
        assert_eq!(Some(0), point_attributes.index_of_name("INTENSITY"));
    }

    #[test]
    fn test_offsets_match_iterator() {
        let point_attributes = PointAttributes::from_attributes(&[
            attributes::POSITION_CARTESIAN,
            attributes::RGB_PACKED,
            attributes::NORMAL_OCT16,
            attributes::GPS_TIME,
        ]);
        for (index, (offset, attribute)) in point_attributes.attributes_with_offsets().enumerate() {
            assert_eq!(offset, point_attributes.offset_of(index).unwrap());
            assert_eq!(Some(attribute), point_attributes.get(index));
        }
        assert_eq!(
            vec![0, 12, 15, 17],
            point_attributes
                .attributes_with_offsets()
                .map(|(offset, _)| offset)
                .collect::<Vec<_>>()
        );
        assert_eq!(25, point_attributes.byte_size());
    }

    #[test]
    fn test_largest_attributes_do_not_overflow() {
        let largest = PointAttributeDefinition::custom(
            "Largest",
            PointAttributeType::UInt8,
            PointAttributeDefinition::MAX_BYTE_SIZE,
        )
        .unwrap();
        let mut point_attributes = PointAttributes::new();
        point_attributes.add(largest.clone());
        point_attributes.add(largest);
        point_attributes.add(attributes::INTENSITY);

        let largest_size = PointAttributeDefinition::MAX_BYTE_SIZE as u64;
        assert_eq!(3, point_attributes.size());
        assert_eq!(2 * largest_size + 2, point_attributes.byte_size());
        assert_eq!(2 * largest_size, point_attributes.offset_of(2).unwrap());
    }

    #[test]
    fn test_has_normals_uses_standard_attributes() {
        for standard in StandardAttribute::ALL {
            let point_attributes = PointAttributes::from_attributes(&[standard.definition()]);
            assert_eq!(standard.is_normal(), point_attributes.has_normals());
        }

        let mut point_attributes = PointAttributes::new();
        point_attributes.add(
            PointAttributeDefinition::custom("NORMAL_FLOATS", PointAttributeType::Float, 3)
                .unwrap(),
        );
        assert!(!point_attributes.has_normals());
        point_attributes.add(attributes::NORMAL_FLOATS.with_description("Estimated normal"));
        assert!(point_attributes.has_normals());
    }

    #[test]
    fn test_vectors_are_independent() {
        let mut point_attributes = PointAttributes::from_names(&["POSITION_CARTESIAN"]).unwrap();
        let vector = PointVector::new(
            "position",
            vec!["X".to_string(), "Y".to_string(), "Z".to_string()],
        );
        point_attributes.add_vector(vector.clone());
        assert_eq!(&[vector], point_attributes.vectors());
        assert_eq!(1, point_attributes.size());
        assert_eq!(12, point_attributes.byte_size());
    }

    #[test]
    fn test_freeze() {
        let point_attributes =
            PointAttributes::from_names(&["POSITION_CARTESIAN", "CLASSIFICATION"]).unwrap();
        let shared: SharedPointAttributes = point_attributes.clone().into();
        assert_eq!(point_attributes, *shared);

        let mut extended = shared.to_owned_attributes();
        extended.add(attributes::INTENSITY);
        assert_eq!(3, extended.size());
        assert_eq!(2, shared.size());
        assert_eq!(13, shared.byte_size());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let mut point_attributes = PointAttributes::from_names(&["INTENSITY"]).unwrap();
        point_attributes.add_vector(PointVector::new("intensity", vec!["INTENSITY".to_string()]));
        let json = serde_json::to_value(&point_attributes).unwrap();
        assert_eq!(2, json["byte_size"]);
        assert_eq!("INTENSITY", json["attributes"][0]["name"]);
        assert_eq!("uint16", json["attributes"][0]["datatype"]);
        assert_eq!("Intensity", json["attributes"][0]["standard"]);
        assert_eq!("intensity", json["vectors"][0]["name"]);
    }

    #[test]
    fn test_display() {
        let point_attributes =
            PointAttributes::from_names(&["POSITION_CARTESIAN", "INTENSITY"]).unwrap();
        assert_eq!(
            "[POSITION_CARTESIAN: float[3], INTENSITY: uint16] (14 bytes)",
            point_attributes.to_string()
        );
    }
}
