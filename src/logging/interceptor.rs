//! Call Interceptor
//!
//! Decorator placed around controller and service methods. Every wrapped
//! call emits one info line of the form
//!
//! ```text
//! [<classType>] IP=<ip> Method=<name> Class=<simpleClassName> Args=<redactedArgs>
//! ```
//!
//! and runs with a [`CallContext`] bound to its task, plus a `call` span
//! carrying the same fields so events logged by the wrapped operation are
//! tagged with them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use super::context::{CallContext, ClassType, UNKNOWN_CLIENT_IP};
use super::redact::SensitiveDataFilter;
use super::request::InboundRequest;

// == Interceptor ==
/// Logging decorator shared by every intercepted component.
#[derive(Debug, Clone, Default)]
pub struct Interceptor {
    filter: Arc<SensitiveDataFilter>,
}

impl Interceptor {
    pub fn new(filter: SensitiveDataFilter) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }

    // == Intercept ==
    /// Wraps `operation`, a call to `method` on a `T`.
    ///
    /// Arguments are rendered eagerly from their `Debug` form; the client IP
    /// is resolved when the returned future is first polled. The output of
    /// `operation` is returned untouched, so `Err` values and panics reach
    /// the caller as they were raised. The call context is released on
    /// every exit path.
    ///
    /// # Arguments
    /// * `method` - Name of the intercepted method
    /// * `args` - Method arguments, in declaration order
    /// * `operation` - The method body to run
    pub fn intercept<T, F>(
        &self,
        method: &'static str,
        args: &[&(dyn fmt::Debug + Sync)],
        operation: F,
    ) -> impl Future<Output = F::Output>
    where
        T: ?Sized,
        F: Future,
    {
        let class_name = simple_type_name::<T>();
        let class_type = ClassType::classify(class_name);
        let args = self.filter.filter(&render_args(args));

        async move {
            let client_ip = InboundRequest::current_remote_ip()
                .unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string());

            let span = info_span!("call", client_ip = %client_ip, class_type = %class_type);
            let context = CallContext::new(client_ip.clone(), class_type);

            context
                .scope(async move {
                    info!(
                        "[{}] IP={} Method={} Class={} Args={}",
                        class_type, client_ip, method, class_name, args
                    );
                    operation.await
                })
                .instrument(span)
                .await
        }
    }
}

// == Utility Functions ==
/// Renders arguments as `[a, b, ...]` from their `Debug` form.
pub fn render_args(args: &[&(dyn fmt::Debug + Sync)]) -> String {
    let rendered: Vec<String> = args.iter().map(|arg| format!("{:?}", arg)).collect();
    format!("[{}]", rendered.join(", "))
}

/// Returns the unqualified name of `T`, without module path or generics.
pub fn simple_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::SensitiveKeys;
    use std::io;
    use std::net::SocketAddr;
    use std::sync::Mutex;

    struct FakeController;
    struct FakeService;
    struct Wrapper<T>(T);

    #[derive(Debug)]
    struct Credentials {
        user: &'static str,
        password: &'static str,
    }

    // == Log Capture ==
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .without_time()
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }

        fn line_containing(&self, needle: &str) -> String {
            self.lines()
                .into_iter()
                .find(|line| line.contains(needle))
                .unwrap_or_else(|| panic!("no log line contains {:?}", needle))
        }
    }

    fn addr(s: &str) -> Option<SocketAddr> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name::<FakeController>(), "FakeController");
        assert_eq!(simple_type_name::<Wrapper<FakeService>>(), "Wrapper");
        assert_eq!(simple_type_name::<str>(), "str");
    }

    #[test]
    fn test_render_args() {
        assert_eq!(render_args(&[]), "[]");
        assert_eq!(render_args(&[&"u1", &"Alice"]), r#"["u1", "Alice"]"#);
        assert_eq!(render_args(&[&42, &None::<u8>]), "[42, None]");
    }

    #[tokio::test]
    async fn test_log_line_format_without_request() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        Interceptor::default()
            .intercept::<FakeService, _>("getUser", &[&"u1"], async {})
            .await;

        let line = logs.line_containing("Method=getUser");
        assert!(line.contains(r#"[Service] IP=N/A Method=getUser Class=FakeService Args=["u1"]"#));
    }

    #[tokio::test]
    async fn test_client_ip_from_inbound_request() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let seen = InboundRequest::new(addr("172.16.0.9:40000"))
            .scope(
                Interceptor::default()
                    .intercept::<FakeController, _>("createUser", &[&"u1", &"Alice"], async {
                        CallContext::current()
                    }),
            )
            .await;

        assert_eq!(seen, Some(CallContext::new("172.16.0.9", ClassType::Controller)));
        let line = logs.line_containing("Method=createUser");
        assert!(line.contains("[Controller] IP=172.16.0.9"));
        assert!(line.contains("Class=FakeController"));
    }

    #[tokio::test]
    async fn test_sensitive_arguments_are_redacted() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let creds = Credentials {
            user: "bob",
            password: "hunter2",
        };
        Interceptor::default()
            .intercept::<FakeService, _>("login", &[&creds, &"token=abc"], async {})
            .await;

        let line = logs.line_containing("Method=login");
        assert!(line.contains(r#"Credentials { user: "bob", password: *** }"#));
        assert!(line.contains(r#""token=***"#));
        assert!(!line.contains("hunter2"));
        assert!(!line.contains("abc"));
    }

    #[tokio::test]
    async fn test_custom_sensitive_keys() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let interceptor = Interceptor::new(SensitiveDataFilter::new(&SensitiveKeys::new(["pin"])));
        interceptor
            .intercept::<FakeService, _>("unlock", &[&"pin=1234", &"password=visible"], async {})
            .await;

        let line = logs.line_containing("Method=unlock");
        assert!(line.contains("pin=***"));
        assert!(line.contains("password=visible"));
    }

    #[tokio::test]
    async fn test_result_passes_through_unchanged() {
        let interceptor = Interceptor::default();

        let ok: Result<u32, String> = interceptor
            .intercept::<FakeService, _>("compute", &[], async { Ok(7) })
            .await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> = interceptor
            .intercept::<FakeService, _>("compute", &[], async { Err("cache down".to_string()) })
            .await;
        assert_eq!(err, Err("cache down".to_string()));
        assert!(CallContext::current().is_none());
    }

    #[tokio::test]
    async fn test_panic_propagates() {
        let handle = tokio::spawn(Interceptor::default().intercept::<FakeService, _>(
            "explode",
            &[],
            async { panic!("wrapped failure") },
        ));

        let err = handle.await.unwrap_err();
        assert!(err.is_panic());
    }

    #[tokio::test]
    async fn test_nested_calls_inherit_ip_and_restore_context() {
        let interceptor = Interceptor::default();
        let inner = interceptor.clone();

        let (inner_ctx, outer_ctx) = InboundRequest::new(addr("10.1.1.1:1000"))
            .scope(interceptor.intercept::<FakeController, _>("outer", &[], async move {
                let inner_ctx = inner
                    .intercept::<FakeService, _>("inner", &[], async { CallContext::current() })
                    .await;
                (inner_ctx, CallContext::current())
            }))
            .await;

        assert_eq!(inner_ctx, Some(CallContext::new("10.1.1.1", ClassType::Service)));
        assert_eq!(outer_ctx, Some(CallContext::new("10.1.1.1", ClassType::Controller)));
        assert!(CallContext::current().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_calls_keep_their_own_context() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let interceptor = Interceptor::default();

        let alpha = InboundRequest::new(addr("10.0.0.1:5000")).scope(
            interceptor.intercept::<FakeController, _>("alpha", &[&"a"], async {
                tokio::task::yield_now().await;
                info!("inside alpha");
                tokio::task::yield_now().await;
                CallContext::current()
            }),
        );
        let beta = InboundRequest::new(addr("10.0.0.2:5000")).scope(
            interceptor.intercept::<FakeService, _>("beta", &[&"b"], async {
                tokio::task::yield_now().await;
                info!("inside beta");
                tokio::task::yield_now().await;
                CallContext::current()
            }),
        );

        let (alpha_ctx, beta_ctx) = tokio::join!(alpha, beta);

        assert_eq!(alpha_ctx, Some(CallContext::new("10.0.0.1", ClassType::Controller)));
        assert_eq!(beta_ctx, Some(CallContext::new("10.0.0.2", ClassType::Service)));

        let alpha_line = logs.line_containing("Method=alpha");
        assert!(alpha_line.contains("[Controller] IP=10.0.0.1"));
        assert!(!alpha_line.contains("10.0.0.2"));

        let beta_line = logs.line_containing("Method=beta");
        assert!(beta_line.contains("[Service] IP=10.0.0.2"));
        assert!(!beta_line.contains("10.0.0.1"));

        let inside_alpha = logs.line_containing("inside alpha");
        assert!(inside_alpha.contains("client_ip=10.0.0.1"));
        assert!(inside_alpha.contains("class_type=Controller"));

        let inside_beta = logs.line_containing("inside beta");
        assert!(inside_beta.contains("client_ip=10.0.0.2"));
        assert!(inside_beta.contains("class_type=Service"));
    }
}
