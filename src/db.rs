pub mod store;
pub use store::{Collection, CollectionStore, Collections, MemoryCollectionStore, PgCollectionStore};
pub mod operations_repo;
pub use operations_repo::{OperationsRepository, OrderRepository};
pub mod finance_repo;
pub use finance_repo::{FinanceRepository, PaymentRepository};
pub mod inventory_repo;
pub use inventory_repo::{InventoryRepository, MaterialRepository};
pub mod crm_repo;
pub use crm_repo::{CrmRepository, ProviderRepository};
pub mod audit_repo;
pub use audit_repo::{AuditRepository, StoredAuditRepository};
