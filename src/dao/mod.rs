/// Session storage backends.
pub mod session_store;
/// Session entity and storage abstraction.
pub mod session;
