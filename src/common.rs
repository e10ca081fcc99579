pub mod error;
pub mod money;
pub mod serde_utils;
