pub mod directory;
pub mod ledger;
pub mod models;
