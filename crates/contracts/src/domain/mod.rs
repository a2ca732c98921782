pub mod common;

pub mod a001_product;
pub mod a002_customer;
pub mod a003_sale;
pub mod a004_payment;
pub mod a005_stock_movement;
pub mod a006_full_shipment;
pub mod a007_sku_alias;
