pub mod audit;
pub mod auth;
pub mod crm;
pub mod finance;
pub mod inventory;
pub mod operations;
pub mod rbac;
pub mod statistics;
