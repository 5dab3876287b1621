//! Rejected input must not leak into logs.

use std::io;
use std::sync::{Arc, Mutex};

use query_guard::{
    Comparison, GuardConfig, QueryGuard, QueryRequest, Registry, Sanitizer, Tainted,
};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn captured<F: FnOnce()>(f: F) -> String {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.contents()
}

fn guard() -> QueryGuard {
    let registry = Registry::builder()
        .object("Account", ["Id", "Name"])
        .build();
    QueryGuard::new(registry.into(), GuardConfig::default())
}

#[test]
fn rejected_object_is_logged_without_content() {
    let payload = "Account; DROP TABLE Account; --";
    let logs = captured(|| {
        let request = QueryRequest::new(Tainted::new(payload.to_string()));
        assert!(guard().build(&request).is_err());
    });

    assert!(logs.contains("identifier rejected"));
    assert!(logs.contains("candidate_len=31"));
    assert!(!logs.contains("DROP"));
}

#[test]
fn defaulted_sort_is_logged_without_content() {
    let logs = captured(|| {
        let request = QueryRequest::new(Tainted::new("Account".to_string()))
            .sort(
                Tainted::new("Name".to_string()),
                Tainted::new("ASC; SELECT * FROM User".to_string()),
            );
        assert!(guard().build(&request).is_ok());
    });

    assert!(logs.contains("sort direction not recognised"));
    assert!(!logs.contains("FROM User"));
}

#[test]
fn bound_values_are_not_logged() {
    let logs = captured(|| {
        let request = QueryRequest::new(Tainted::new("Account".to_string())).filter(
            Tainted::new("Name".to_string()),
            Comparison::Eq,
            "customer-7781-private",
        );
        assert!(guard().build(&request).is_ok());
    });

    assert!(logs.contains("query template composed"));
    assert!(logs.contains("SELECT * FROM Account WHERE Name = :p0"));
    assert!(!logs.contains("customer-7781-private"));
}

#[test]
fn sanitizer_logs_only_lengths() {
    let logs = captured(|| {
        let cleaned = Sanitizer::default().sanitize("x'; DROP TABLE secret_table; --");
        assert!(!cleaned.contains("DROP"));
    });

    assert!(logs.contains("sanitizer removed content"));
    assert!(!logs.contains("secret_table"));
}
