pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod discrepancy_repo;
pub use discrepancy_repo::DiscrepancyRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
