//! Backend-independent pieces shared by every store module

pub mod context;

pub use context::{ContextError, RequestContext};
