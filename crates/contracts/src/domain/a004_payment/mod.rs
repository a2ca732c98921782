pub mod aggregate;

pub use aggregate::{Payment, PaymentDto, PaymentId};
