use crate::models::Role;
use crate::routing::routes::{RoutePermissionTable, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub screen: Screen,
}

impl MenuItem {
    pub fn path(&self) -> &'static str {
        self.screen.pattern()
    }
}

const SIDEBAR: [MenuItem; 5] = [
    MenuItem { label: "Dashboard", screen: Screen::Dashboard },
    MenuItem { label: "Sites", screen: Screen::SiteList },
    MenuItem { label: "Interventions", screen: Screen::InterventionList },
    MenuItem { label: "Rapports", screen: Screen::Reports },
    MenuItem { label: "Utilisateurs", screen: Screen::Users },
];

/// Entradas del menú lateral visibles para un rol (las mismas que deja pasar la guardia)
pub fn menu_items(table: &RoutePermissionTable, role: Role) -> Vec<MenuItem> {
    SIDEBAR
        .iter()
        .filter(|item| table.permits(item.screen, role))
        .copied()
        .collect()
}
