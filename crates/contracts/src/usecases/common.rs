/// Metadados estáticos de um caso de uso
pub trait UseCaseMetadata {
    /// Índice do caso de uso no sistema (ex.: "u501")
    fn usecase_index() -> &'static str;

    /// Nome técnico do caso de uso (ex.: "import_full")
    fn usecase_name() -> &'static str;

    /// Nome de exibição para a UI
    fn display_name() -> &'static str;

    /// Descrição do que o caso de uso faz
    fn description() -> &'static str;

    /// Nome completo (ex.: "u501_import_full")
    fn full_name() -> String {
        format!("{}_{}", Self::usecase_index(), Self::usecase_name())
    }
}
