// Grid driver: the backend capability and the request pipeline built on it

pub mod traits;

pub use traits::{Grid, GridRow, Queryable};
