pub mod resolve;
pub mod types;

pub use resolve::{resolve, ColumnMap, ResolvedColumn};
pub use types::{ColumnAliases, LogicalField};
