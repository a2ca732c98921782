pub mod progress;
pub mod request;
pub mod response;

pub use progress::ImportProgress;
pub use request::ImportRequest;
pub use response::ImportResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct ImportFull;

impl UseCaseMetadata for ImportFull {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_full"
    }

    fn display_name() -> &'static str {
        "Importação de envios FULL"
    }

    fn description() -> &'static str {
        "Importa as linhas brutas de um envio FULL (planilha ou API do Mercado Livre) e as deixa pendentes de conciliação"
    }
}
