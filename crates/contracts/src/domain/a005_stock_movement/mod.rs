pub mod aggregate;

pub use aggregate::{
    EntradaRequest, MovementKind, SaidaRequest, SaldoResponse, StockMovement, StockMovementId,
};
