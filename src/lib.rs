#![warn(clippy::all)]

//! Point attribute data model for potree point clouds
//!
//! This crate describes *what* a single point record looks like, not how it is read or written. It has three
//! parts that build on each other:
//!
//! - A registry of the primitive types that point attributes are stored in ([PointAttributeType](crate::layout::PointAttributeType))
//! - A catalog of the standard point attributes of potree (position, color, normals, intensity etc.), see the
//!   [attributes](crate::layout::attributes) module
//! - [PointAttributes](crate::layout::PointAttributes), the ordered set of attributes that makes up one point record. It
//!   knows the size of a record and the offset of every attribute within it
//!
//! File readers, buffer packers and renderers use `PointAttributes` to figure out strides and offsets of the point data.

mod error;
pub use self::error::*;

/// Defines attributes and data layout of point records
pub mod layout;
