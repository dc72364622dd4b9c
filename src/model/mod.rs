//! Types that represent the core data model, such as `Item` and `PriorityTable`.
mod item;
mod number;
mod priority;

pub use item::{Item, RawRow};
pub use number::{parse_decimal, parse_lenient, NumberError};
pub use priority::PriorityTable;
