use super::{EntityMetadata, Origin};

/// Trait para a raiz de um agregado
///
/// Define os métodos obrigatórios e os metadados de classe de todos os
/// agregados do sistema.
pub trait AggregateRoot {
    /// Tipo do identificador do agregado
    type Id;

    // ============================================================================
    // Métodos de instância (dados de um registro)
    // ============================================================================

    /// ID do registro
    fn id(&self) -> Self::Id;

    /// Código de negócio do registro
    fn code(&self) -> &str;

    /// Descrição/nome do registro
    fn description(&self) -> &str;

    /// Metadados de ciclo de vida
    fn metadata(&self) -> &EntityMetadata;

    /// Metadados mutáveis
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    // ============================================================================
    // Metadados da classe do agregado (dados estáticos)
    // ============================================================================

    /// Índice do agregado no sistema (ex.: "a001")
    fn aggregate_index() -> &'static str;

    /// Nome da coleção no banco (ex.: "product")
    fn collection_name() -> &'static str;

    /// Nome do elemento para a UI (singular, ex.: "Produto")
    fn element_name() -> &'static str;

    /// Nome da lista para a UI (plural, ex.: "Produtos")
    fn list_name() -> &'static str;

    /// Origem dos dados do agregado
    fn origin() -> Origin;

    // ============================================================================
    // Métodos com implementação padrão
    // ============================================================================

    /// Nome completo do agregado (ex.: "a001_product")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }

    /// Prefixo para tabelas do banco (ex.: "a001_product_")
    fn table_prefix() -> String {
        format!("{}_", Self::full_name())
    }
}
