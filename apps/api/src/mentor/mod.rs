// AI mentor chat history.
// Reply generation lives with the LLM integration; this module only keeps
// per-session history behind the `SessionStore` seam.

pub mod handlers;
pub mod memory;
pub mod redis_store;
pub mod store;
