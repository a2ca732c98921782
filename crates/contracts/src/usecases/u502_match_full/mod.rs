pub mod progress;
pub mod request;
pub mod response;

pub use progress::MatchProgress;
pub use request::MatchRequest;
pub use response::MatchResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct MatchFull;

impl UseCaseMetadata for MatchFull {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "match_full"
    }

    fn display_name() -> &'static str {
        "Conciliação automática de envios FULL"
    }

    fn description() -> &'static str {
        "Relaciona itens pendentes de envios FULL com o catálogo pelo SKU e pelo De-Para aprendido"
    }
}
