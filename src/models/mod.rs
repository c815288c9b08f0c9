pub mod auth;
pub mod site;
pub mod intervention;
pub mod alert;
pub mod monitoring;
pub mod export;
pub mod live;
pub mod notification;

pub use auth::{Credential, Identity, LoginRequest, LoginResponse, RegisterRequest, Role};
pub use site::{Site, SiteDraft, SiteStats, SiteValidationRequest};
pub use intervention::{Intervention, InterventionDraft};
pub use alert::Alert;
pub use monitoring::{EquipmentMetrics, MonitoringStatus, SimulationStatus, SiteMetrics};
pub use export::{ExportFormat, ExportOptions, ExportResponse};
pub use live::{LiveMessage, Topic};
pub use notification::{Notification, NotificationKind};
