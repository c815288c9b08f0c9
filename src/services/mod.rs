// ============================================================================
// SERVICES - SOLO comunicación (HTTP + canal en vivo)
// ============================================================================

pub mod http;
pub mod api_client;
pub mod auth_service;
pub mod site_service;
pub mod intervention_service;
pub mod alert_service;
pub mod monitoring_service;
pub mod export_service;
pub mod user_service;
pub mod notification_service;
pub mod scheduler;
pub mod socket;
pub mod live_channel;

pub use api_client::ApiClient;
pub use http::{FetchTransport, HttpRequest, HttpResponse, HttpTransport, Method};
pub use live_channel::{ChannelState, ListenerId, LiveUpdateChannel, SocketEvents, Subscription};
pub use scheduler::{BrowserScheduler, PendingTask, Scheduler};
pub use socket::{BrowserSocketFactory, SocketFactory, SocketHandle};
