mod point_attribute_type;
pub use self::point_attribute_type::*;

mod point_attribute;
pub use self::point_attribute::*;

mod point_attributes;
pub use self::point_attributes::*;
