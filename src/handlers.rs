pub mod auth;
pub mod catalog;
pub mod discrepancies;
pub mod ledger;
pub mod orders;
pub mod products;
pub mod stocks;
pub mod users;
