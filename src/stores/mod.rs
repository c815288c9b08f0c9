pub mod session_store;
pub mod operations_store;

pub use operations_store::OperationsStore;
pub use session_store::SessionStore;
