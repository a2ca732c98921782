use anyhow::Result;
use contracts::domain::a002_customer::{Customer, CustomerDto};
use uuid::Uuid;

use super::repository;
use crate::shared::error::DomainError;

pub async fn create(dto: CustomerDto) -> Result<Uuid> {
    let code = format!("CLT-{}", &Uuid::new_v4().to_string()[..8]);
    let mut aggregate = Customer::new_for_insert(code, dto.nome.clone());
    aggregate.update(&dto);

    aggregate.validate().map_err(DomainError::validation)?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: CustomerDto) -> Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| DomainError::validation("ID inválido"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Cliente não encontrado"))?;

    aggregate.update(&dto);

    aggregate.validate().map_err(DomainError::validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

pub async fn delete(id: Uuid) -> Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> Result<Option<Customer>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<Customer>> {
    repository::list_all().await
}

/// Resolver o cliente de uma importação FULL: por ID quando informado,
/// senão pelo nome sem caixa/trim (comportamento da lista de clientes de
/// importação).
pub async fn resolve_for_import(
    client_id: Option<&str>,
    client_name: Option<&str>,
) -> Result<Customer> {
    if let Some(id_str) = client_id {
        let id = Uuid::parse_str(id_str)
            .map_err(|_| DomainError::validation("client_id inválido"))?;
        return repository::get_by_id(id)
            .await?
            .filter(|c| !c.base.metadata.is_deleted)
            .ok_or_else(|| DomainError::not_found("Cliente da importação não encontrado"));
    }

    if let Some(nome) = client_name {
        return repository::get_by_name_normalized(nome)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Nenhum cliente corresponde a \"{}\"", nome))
            });
    }

    Err(DomainError::validation(
        "Informe client_id ou client_name para a importação",
    ))
}
