pub mod auth;
pub mod catalog;
pub mod discrepancy;
pub mod ledger;
pub mod order;
pub mod product;
