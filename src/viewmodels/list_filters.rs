// ============================================================================
// FILTROS DE LISTAS - Alcance por rol + filtros de la barra de búsqueda
// ============================================================================
// SOLO lógica de preparación de datos - Sin estado
// ============================================================================

use crate::models::alert::{AlertKind, AlertStatus, Severity};
use crate::models::intervention::{InterventionKind, InterventionStatus, Priority};
use crate::models::site::{SiteKind, SiteStatus, ValidationStatus};
use crate::models::{Alert, Identity, Intervention, Role, Site};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized(search: &str) -> Option<String> {
    let search = search.trim();
    if search.is_empty() {
        None
    } else {
        Some(search.to_lowercase())
    }
}

// ==========================================
// ALCANCE POR ROL
// ==========================================

/// Sitios visibles: ADMIN todos, GESTIONNAIRE los de su sede, TECHNICIEN ninguno
pub fn scope_sites(identity: &Identity, sites: Vec<Site>) -> Vec<Site> {
    match identity.role {
        Role::Admin => sites,
        Role::Manager => sites
            .into_iter()
            .filter(|site| site.organization_unit == identity.organization_unit)
            .collect(),
        Role::Technician => Vec::new(),
    }
}

/// Un técnico solo ve las intervenciones que tiene asignadas
pub fn scope_interventions(identity: &Identity, interventions: Vec<Intervention>) -> Vec<Intervention> {
    match identity.role {
        Role::Admin | Role::Manager => interventions,
        Role::Technician => interventions
            .into_iter()
            .filter(|i| i.assigned_to.as_deref() == Some(identity.id.as_str()))
            .collect(),
    }
}

// ==========================================
// INTERVENCIONES
// ==========================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionFilter {
    pub status: Option<InterventionStatus>,
    pub priority: Option<Priority>,
    pub kind: Option<InterventionKind>,
    pub site: Option<String>,
    pub assignee: Option<String>,
    pub search: String,
}

impl InterventionFilter {
    pub fn matches(&self, intervention: &Intervention) -> bool {
        if self.status.is_some_and(|s| s != intervention.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != intervention.priority) {
            return false;
        }
        if self.kind.is_some_and(|k| k != intervention.kind) {
            return false;
        }
        if let Some(site) = &self.site {
            if *site != intervention.site {
                return false;
            }
        }
        if let Some(assignee) = &self.assignee {
            if intervention.assigned_to.as_ref() != Some(assignee) {
                return false;
            }
        }
        match normalized(&self.search) {
            Some(needle) => contains_ignore_case(&intervention.description, &needle),
            None => true,
        }
    }

    /// Filtra y ordena: prioridad más alta primero, después fecha planificada
    pub fn apply<'a>(&self, interventions: &'a [Intervention]) -> Vec<&'a Intervention> {
        let mut visible: Vec<&Intervention> =
            interventions.iter().filter(|i| self.matches(i)).collect();
        visible.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.planned_date.cmp(&b.planned_date))
        });
        visible
    }
}

// ==========================================
// SITIOS
// ==========================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteFilter {
    pub status: Option<SiteStatus>,
    pub kind: Option<SiteKind>,
    pub validation: Option<ValidationStatus>,
    pub search: String,
}

impl SiteFilter {
    /// Sitios pendientes de validación (pantalla /admin/sites/validation)
    pub fn pending_validation() -> Self {
        Self {
            validation: Some(ValidationStatus::Pending),
            ..Self::default()
        }
    }

    pub fn matches(&self, site: &Site) -> bool {
        if self.status.is_some_and(|s| s != site.status) {
            return false;
        }
        if self.kind.is_some_and(|k| k != site.kind) {
            return false;
        }
        if self.validation.is_some_and(|v| v != site.validation_status) {
            return false;
        }
        match normalized(&self.search) {
            Some(needle) => {
                contains_ignore_case(&site.name, &needle)
                    || contains_ignore_case(&site.location.city, &needle)
                    || contains_ignore_case(&site.location.address, &needle)
            }
            None => true,
        }
    }

    pub fn apply<'a>(&self, sites: &'a [Site]) -> Vec<&'a Site> {
        sites.iter().filter(|site| self.matches(site)).collect()
    }
}

// ==========================================
// ALERTAS
// ==========================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub status: Option<AlertStatus>,
    /// Severidad mínima
    pub severity: Option<Severity>,
    pub kind: Option<AlertKind>,
    pub site: Option<String>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.map_or(true, |s| s == alert.status)
            && self.severity.map_or(true, |min| alert.severity >= min)
            && self.kind.map_or(true, |k| k == alert.kind)
            && self.site.as_ref().map_or(true, |site| *site == alert.site_id)
    }

    /// Filtra y ordena: más severa primero, después más reciente
    pub fn apply<'a>(&self, alerts: &'a [Alert]) -> Vec<&'a Alert> {
        let mut visible: Vec<&Alert> = alerts.iter().filter(|a| self.matches(a)).collect();
        visible.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        visible
    }
}
