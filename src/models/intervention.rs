use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterventionKind {
    Maintenance,
    Repair,
    Installation,
    Inspection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    #[serde(alias = "pending")]
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    #[serde(alias = "critical")]
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionNote {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Ticket de mantenimiento sobre un sitio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    #[serde(rename = "_id")]
    pub id: String,
    /// Id del sitio
    #[serde(alias = "siteId")]
    pub site: String,
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub status: InterventionStatus,
    pub priority: Priority,
    pub description: String,
    #[serde(default)]
    pub planned_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    /// Id del técnico asignado
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub notes: Vec<InterventionNote>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Cuerpo de `POST /interventions` y `PUT /interventions/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionDraft {
    pub site: String,
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub status: InterventionStatus,
    pub priority: Priority,
    pub description: String,
    pub planned_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}
