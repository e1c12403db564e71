use mockito::Server;
use site_status::{
    build_report, resolve_urls, ConfigSource, EnvConfig, HttpProber, ProbeOutcome, Report,
    SiteStatusService,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Config source that remembers every key it was asked for.
struct RecordingConfig {
    values: HashMap<String, String>,
    reads: Mutex<Vec<String>>,
}

impl RecordingConfig {
    fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            reads: Mutex::new(Vec::new()),
        }
    }

    fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

impl ConfigSource for RecordingConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.reads.lock().unwrap().push(key.to_string());
        self.values.get(key).cloned()
    }
}

#[test]
fn test_gap_stops_scan() {
    let source = RecordingConfig::new(&[
        ("FUNC_SITE_0", "http://a.example"),
        ("FUNC_SITE_1", "http://b.example"),
        ("FUNC_SITE_2", "http://c.example"),
        ("FUNC_SITE_4", "http://e.example"),
        ("FUNC_SITE_5", "http://f.example"),
    ]);

    let (worklist, error) = resolve_urls(&source);

    assert_eq!(worklist.len(), 3);
    assert!(error.is_none());
    assert_eq!(
        source.reads(),
        vec!["FUNC_SITE_0", "FUNC_SITE_1", "FUNC_SITE_2", "FUNC_SITE_3"]
    );
}

#[test]
fn test_env_config_reads_process_environment() {
    std::env::set_var("FUNC_SITE_0", "http://env.example");
    std::env::remove_var("FUNC_SITE_1");

    let (worklist, error) = resolve_urls(&EnvConfig);

    std::env::remove_var("FUNC_SITE_0");

    assert_eq!(worklist.len(), 1);
    assert_eq!(worklist.entries()[0].url, "http://env.example");
    assert!(error.is_none());
}

#[tokio::test]
async fn test_all_sites_up() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for path in ["/one", "/two", "/three"] {
        mocks.push(
            server
                .mock("GET", path)
                .with_status(200)
                .expect(1)
                .create_async()
                .await,
        );
    }

    let base = server.url();
    let urls: Vec<String> = ["/one", "/two", "/three"]
        .iter()
        .map(|p| format!("{base}{p}"))
        .collect();
    let source = RecordingConfig::new(&[
        ("FUNC_SITE_0", urls[0].as_str()),
        ("FUNC_SITE_1", urls[1].as_str()),
        ("FUNC_SITE_2", urls[2].as_str()),
    ]);

    let report = build_report(&source, &HttpProber::new()).await;

    let expected = format!(
        "FUNCTION OUTPUT:\n\n\
         SITE: {0} - RESULT: Ok - 200 OK\n\
         SITE: {1} - RESULT: Ok - 200 OK\n\
         SITE: {2} - RESULT: Ok - 200 OK",
        urls[0], urls[1], urls[2]
    );
    assert_eq!(report.to_string(), expected);

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_mixed_sites_each_get_one_line() {
    let mut server = Server::new_async().await;
    let up = server
        .mock("GET", "/up")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;
    let broken = server
        .mock("GET", "/broken")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let up_url = format!("{}/up", server.url());
    let broken_url = format!("{}/broken", server.url());
    let source = RecordingConfig::new(&[
        ("FUNC_SITE_0", broken_url.as_str()),
        ("FUNC_SITE_1", "http://127.0.0.1:1/"),
        ("FUNC_SITE_2", up_url.as_str()),
    ]);

    let report = build_report(&source, &HttpProber::new()).await;
    let lines = report.lines();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].url, broken_url);
    assert_eq!(
        lines[0].outcome,
        ProbeOutcome::Error("500 Internal Server Error".to_string())
    );
    assert_eq!(lines[1].url, "http://127.0.0.1:1/");
    assert!(!lines[1].outcome.is_ok());
    assert_eq!(lines[2].url, up_url);
    assert_eq!(lines[2].outcome, ProbeOutcome::Ok("200 OK".to_string()));

    up.assert_async().await;
    broken.assert_async().await;
}

#[tokio::test]
async fn test_malformed_url_does_not_abort_invocation() {
    let mut server = Server::new_async().await;
    let ok = server
        .mock("GET", "/")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let ok_url = server.url();
    let source = RecordingConfig::new(&[
        ("FUNC_SITE_0", ok_url.as_str()),
        ("FUNC_SITE_1", "not-a-url"),
    ]);

    let report = build_report(&source, &HttpProber::new()).await;
    let text = report.to_string();
    let lines: Vec<&str> = text.lines().skip(2).collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("SITE: {ok_url} - RESULT: Ok - 200 OK"));
    assert!(lines[1].starts_with("SITE: not-a-url - RESULT: Error - "));
    ok.assert_async().await;
}

#[tokio::test]
async fn test_no_configuration_makes_no_requests() {
    let mut server = Server::new_async().await;
    let never = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = RecordingConfig::new(&[("FUNC_SITE_1", server.url().as_str())]);
    let report = build_report(&source, &HttpProber::new()).await;

    assert!(matches!(report, Report::Error(_)));
    assert_eq!(report.to_string(), "ERROR: no valid URLs found");
    assert_eq!(report.to_string().lines().count(), 1);
    never.assert_async().await;
}

#[tokio::test]
async fn test_service_end_to_end() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/status")
        .with_status(302)
        .with_header("location", "/moved")
        .expect(1)
        .create_async()
        .await;
    let moved = server
        .mock("GET", "/moved")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let url = format!("{}/status", server.url());
    let source: HashMap<String, String> = [("FUNC_SITE_0".to_string(), url.clone())]
        .into_iter()
        .collect();
    let service = SiteStatusService::with_parts(source, HttpProber::new());

    let report = service.run_site_check().await;

    // Redirects are followed with the client defaults
    assert_eq!(
        report.to_string(),
        format!("FUNCTION OUTPUT:\n\nSITE: {url} - RESULT: Ok - 200 OK")
    );
    mock.assert_async().await;
    moved.assert_async().await;
}
