pub mod u501_import_full;
pub mod u502_match_full;
