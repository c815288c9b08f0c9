// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod session_state;
pub mod app_state;

pub use reactivity::ReactiveState;
pub use session_state::{Session, SessionState};
pub use app_state::{AppContext, Platform};
