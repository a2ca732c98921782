pub mod a001_product;
pub mod a002_customer;
pub mod a003_sale;
pub mod a004_payment;
pub mod a005_stock;
pub mod a006_full_shipment;
pub mod d400_sales_summary;
pub mod d401_customer_balances;
pub mod usecases;
