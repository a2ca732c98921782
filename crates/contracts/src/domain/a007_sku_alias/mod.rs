pub mod aggregate;

pub use aggregate::{normalize_alias, SkuAlias, SkuAliasId};
