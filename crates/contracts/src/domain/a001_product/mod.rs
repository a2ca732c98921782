pub mod aggregate;

pub use aggregate::{EstoqueRow, KitComponent, Product, ProductDto, ProductId, ProductKind};
