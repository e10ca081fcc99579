// src/models/rbac.rs

//! Tabela de capacidades por papel.
//!
//! Cada papel enxerga um conjunto fixo de seções do console; as rotas da API
//! são protegidas consultando esta mesma tabela.

use serde::Serialize;

use crate::models::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Dashboard,
    Orders,
    Clients,
    Providers,
    Payments,
    Statistics,
    Users,
    Audit,
    ReceivedOrders,
    Materials,
    ProviderStatistics,
}

impl Capability {
    pub fn slug(&self) -> &'static str {
        match self {
            Capability::Dashboard => "dashboard",
            Capability::Orders => "orders",
            Capability::Clients => "clients",
            Capability::Providers => "providers",
            Capability::Payments => "payments",
            Capability::Statistics => "statistics",
            Capability::Users => "users",
            Capability::Audit => "audit",
            Capability::ReceivedOrders => "orders:received",
            Capability::Materials => "materials",
            Capability::ProviderStatistics => "statistics:provider",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MenuSection {
    #[serde(rename = "PRINCIPAL")]
    Principal,
    #[serde(rename = "GESTIÓN")]
    Gestion,
    #[serde(rename = "ADMINISTRACIÓN")]
    Administracion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub section: MenuSection,
    #[serde(skip)]
    pub capability: Capability,
}

const fn entry(
    id: &'static str,
    label: &'static str,
    section: MenuSection,
    capability: Capability,
) -> MenuEntry {
    MenuEntry { id, label, section, capability }
}

const ADMIN_MENU: &[MenuEntry] = &[
    entry("dashboard", "Dashboard", MenuSection::Principal, Capability::Dashboard),
    entry("orders", "Órdenes", MenuSection::Gestion, Capability::Orders),
    entry("clients", "Clientes", MenuSection::Gestion, Capability::Clients),
    entry("providers", "Proveedores", MenuSection::Gestion, Capability::Providers),
    entry("payments", "Pagos", MenuSection::Gestion, Capability::Payments),
    entry("statistics", "Estadísticas", MenuSection::Gestion, Capability::Statistics),
    entry("users", "Usuarios", MenuSection::Administracion, Capability::Users),
    entry("audit", "Auditoría", MenuSection::Administracion, Capability::Audit),
];

const ASSISTANT_MENU: &[MenuEntry] = &[
    entry("dashboard", "Dashboard", MenuSection::Principal, Capability::Dashboard),
    entry("orders", "Órdenes", MenuSection::Gestion, Capability::Orders),
    entry("clients", "Clientes", MenuSection::Gestion, Capability::Clients),
    entry("payments", "Pagos", MenuSection::Gestion, Capability::Payments),
    entry("statistics", "Estadísticas", MenuSection::Gestion, Capability::Statistics),
];

const PROVIDER_MENU: &[MenuEntry] = &[
    entry("orders", "Órdenes Recibidas", MenuSection::Gestion, Capability::ReceivedOrders),
    entry("materials", "Materiales", MenuSection::Gestion, Capability::Materials),
    entry("statistics", "Estadísticas", MenuSection::Gestion, Capability::ProviderStatistics),
];

impl Role {
    pub fn menu(&self) -> &'static [MenuEntry] {
        match self {
            Role::Administrador => ADMIN_MENU,
            Role::Asistente => ASSISTANT_MENU,
            Role::Proveedor => PROVIDER_MENU,
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.menu().iter().any(|e| e.capability == capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_sees_audit_and_providers() {
        assert!(Role::Administrador.has_capability(Capability::Audit));
        assert!(Role::Administrador.has_capability(Capability::Providers));
        assert!(!Role::Asistente.has_capability(Capability::Audit));
        assert!(!Role::Asistente.has_capability(Capability::Providers));
        assert!(!Role::Proveedor.has_capability(Capability::Audit));
    }

    #[test]
    fn provider_statistics_are_separate_from_lab_statistics() {
        assert!(Role::Proveedor.has_capability(Capability::ProviderStatistics));
        assert!(!Role::Proveedor.has_capability(Capability::Statistics));
        assert!(!Role::Asistente.has_capability(Capability::ProviderStatistics));
    }

    #[test]
    fn menu_serializes_section_labels() {
        let json = serde_json::to_value(Role::Proveedor.menu()).unwrap();
        assert_eq!(json[0]["id"], "orders");
        assert_eq!(json[0]["section"], "GESTIÓN");
        assert!(json[0].get("capability").is_none());
    }
}
