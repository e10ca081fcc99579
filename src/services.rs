pub mod audit_service;
pub mod auth;
pub mod crm_service;
pub mod finance_service;
pub mod inventory_service;
pub mod operation_service;
pub mod statistics_service;
