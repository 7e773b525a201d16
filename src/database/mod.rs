// Query backends a grid can drive

pub mod entity;
pub mod table;

pub use entity::EntityQuery;
pub use table::{TableQuery, columns_equal};
