pub mod aggregate;

pub use aggregate::{
    CreateKitAndRelateRequest, CreateKitResponse, FullItemId, FullShipment, FullShipmentId,
    FullShipmentItem, KitComponentRef, KitCompositionQuery, KitMeta, KitSearchOutcome,
    KitSearchResponse, MatchStatus, RelateManualRequest, ShipmentGroup,
};
