pub mod session;

pub use session::{session_context_middleware, SessionPatch, SessionSnapshot, LANGUAGE_KEY};
