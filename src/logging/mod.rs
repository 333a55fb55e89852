//! Logging Module
//!
//! Call interception with per-task context and sensitive value redaction.

mod context;
mod interceptor;
mod redact;
mod request;


// Re-export public types
pub use context::{CallContext, ClassType, UNKNOWN_CLIENT_IP};
pub use interceptor::{render_args, simple_type_name, Interceptor};
pub use redact::{SensitiveDataFilter, SensitiveKeys, DEFAULT_SENSITIVE_KEYS, REDACTED};
pub use request::{capture_inbound_request, InboundRequest};
