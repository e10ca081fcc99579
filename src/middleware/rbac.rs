// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::{auth::CurrentUser, rbac::Capability},
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// 2. O Extractor (Guardião): consulta a tabela de capacidades do papel
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or(AppError::InvalidToken)?;

        let required = T::capability();
        if !user.role.has_capability(required) {
            tracing::warn!("🚫 {} ({:?}) sem a permissão '{}'", user.name, user.role, required.slug());
            return Err(AppError::Forbidden(required.slug()));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident => $capability:expr) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn capability() -> Capability {
                $capability
            }
        }
    };
}

permission!(PermOrders => Capability::Orders);
permission!(PermReceivedOrders => Capability::ReceivedOrders);
permission!(PermPayments => Capability::Payments);
permission!(PermMaterials => Capability::Materials);
permission!(PermProviders => Capability::Providers);
permission!(PermAudit => Capability::Audit);
permission!(PermStatistics => Capability::Statistics);
permission!(PermProviderStatistics => Capability::ProviderStatistics);
