use anyhow::Result;
use chrono::Utc;
use contracts::domain::a004_payment::{Payment, PaymentDto};
use uuid::Uuid;

use super::repository;
use crate::shared::error::DomainError;

fn generate_code() -> String {
    format!("PAG-{}", &Uuid::new_v4().to_string()[..8])
}

pub async fn create(dto: PaymentDto) -> Result<Uuid> {
    let mut payment = Payment::new_for_insert(
        generate_code(),
        dto.customer_name.trim().to_string(),
        dto.payment_date.unwrap_or_else(Utc::now),
        dto.amount,
    );
    payment.metodo = dto.metodo.clone();
    payment.base.comment = dto.comment.clone();

    payment.validate().map_err(DomainError::validation)?;
    payment.before_write();

    repository::insert(&payment).await
}

pub async fn update(dto: PaymentDto) -> Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("ID inválido"))?;

    let mut payment = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Pagamento não encontrado"))?;

    payment.customer_name = dto.customer_name.trim().to_string();
    if let Some(date) = dto.payment_date {
        payment.payment_date = date;
    }
    payment.amount = dto.amount;
    payment.metodo = dto.metodo.clone();
    payment.base.comment = dto.comment.clone();

    payment.validate().map_err(DomainError::validation)?;
    payment.before_write();

    repository::update(&payment).await
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Payment>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<Payment>> {
    repository::list_all().await
}
