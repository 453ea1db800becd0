pub mod auth;
pub use auth::AuthService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod order_service;
pub use order_service::OrderService;
pub mod ledger_service;
pub use ledger_service::LedgerService;
pub mod discrepancy_service;
pub use discrepancy_service::DiscrepancyService;
