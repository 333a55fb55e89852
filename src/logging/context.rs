//! Call Context
//!
//! Per-call `clientIP` / `classType` fields held in task-local storage.
//! Each intercepted call binds its own context for the lifetime of the
//! wrapped future, so concurrent calls on other tasks never see it.

use std::fmt;
use std::future::Future;

tokio::task_local! {
    static CALL_CONTEXT: CallContext;
}

/// Client IP recorded when the call did not originate from an HTTP request.
pub const UNKNOWN_CLIENT_IP: &str = "N/A";

// == Class Type ==
/// Classification of the intercepted call target, used as a log label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassType {
    /// Request-handling entry point
    Controller,
    /// Internal operation
    Service,
}

impl ClassType {
    /// Classifies a target by its type name.
    pub fn classify(type_name: &str) -> Self {
        if type_name.contains("Controller") {
            ClassType::Controller
        } else {
            ClassType::Service
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassType::Controller => "Controller",
            ClassType::Service => "Service",
        }
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Call Context ==
/// Contextual fields visible for the duration of one intercepted call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub client_ip: String,
    pub class_type: ClassType,
}

impl CallContext {
    pub fn new(client_ip: impl Into<String>, class_type: ClassType) -> Self {
        Self {
            client_ip: client_ip.into(),
            class_type,
        }
    }

    /// Runs `fut` with this context bound to the current task.
    ///
    /// The binding is released when `fut` completes, errors, panics or is
    /// dropped. A context already bound by an enclosing call is shadowed and
    /// becomes visible again afterwards.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        CALL_CONTEXT.scope(self, fut).await
    }

    /// Context of the intercepted call currently running on this task, if any.
    pub fn current() -> Option<CallContext> {
        CALL_CONTEXT.try_with(Clone::clone).ok()
    }
}
