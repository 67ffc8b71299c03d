//! Integration tests for the pipeline
//!
//! These tests use wiremock to serve search and detail pages and run the
//! full fetch, extract, export and persist cycle end-to-end.

use job_trawler::config::{Config, IdentityEntry};
use job_trawler::crawler::{run_pipeline, DiscoveryError, LinkDiscoverer, Pipeline};
use job_trawler::storage::{open_storage, JobStore};
use job_trawler::ScraperError;
use scraper::Html;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, count: u32, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.search.base_url = Some(base_url.to_string());
    config.search.count = count;
    config.search.page_delay_ms = 0;
    config.output.directory = output_dir.to_string_lossy().to_string();
    config.identity = vec![IdentityEntry::with_user_agent("TestAgent/1.0")];
    config
}

/// Search page embedding the given link paths the way the live site does
fn search_page(paths: &[&str]) -> String {
    let entries: Vec<String> = paths
        .iter()
        .enumerate()
        .map(|(i, p)| format!(r#"{{"jobkey":"k{}","link":"{}","rank":{}}}"#, i, p, i))
        .collect();
    format!(
        r#"<html><head><script>window.mosaic = {{"results":[{}]}};</script></head><body><h1>Jobs</h1></body></html>"#,
        entries.join(",")
    )
}

/// Detail page with the standard field markup; `None` omits the node
fn detail_page(title: &str, company: &str, salary: Option<&str>, location: &str) -> String {
    let salary_html = salary
        .map(|s| format!(r#"<span class="icl-u-xs-mr--xs">{}</span>"#, s))
        .unwrap_or_default();
    format!(
        r#"<html><body>
        <h1 class="icl-u-xs-mb--xs icl-u-xs-mt--none jobsearch-JobInfoHeader-title">{title}</h1>
        <div class="jobsearch-CompanyInfoWithoutHeaderImage">
            <div><div class="icl-u-lg-mr--sm icl-u-xs-mr--xs">{company}</div></div>
            <div>{location}</div>
        </div>
        {salary_html}
        <div class="jobsearch-jobDescriptionText">Work on {title} things.</div>
        </body></html>"#
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_search_page(server: &MockServer, start: &str, paths: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("start", start))
        .respond_with(html_response(search_page(paths)))
        .mount(server)
        .await;
}

async fn mount_detail_page(server: &MockServer, detail_path: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(detail_path))
        .respond_with(html_response(body))
        .expect(hits)
        .mount(server)
        .await;
}

fn csv_files(dir: &Path) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|p| p.extension().map(|e| e == "csv").unwrap_or(false))
        .collect()
}

#[tokio::test]
async fn test_two_links_single_page_end_to_end() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_search_page(
        &server,
        "0",
        &["/company/Acme/jobs/Python-Dev-1", "/company/Beta/jobs/Backend-2"],
    )
    .await;
    mount_detail_page(
        &server,
        "/company/Acme/jobs/Python-Dev-1",
        detail_page("Python Developer", "Acme GmbH", Some("60.000 €"), "Berlin"),
        1,
    )
    .await;
    mount_detail_page(
        &server,
        "/company/Beta/jobs/Backend-2",
        detail_page("Backend Engineer", "Beta AG", Some("70.000 €"), "Potsdam"),
        1,
    )
    .await;

    let config = create_test_config(&server.uri(), 10, output.path());
    let summary = run_pipeline(&config).await.expect("pipeline should succeed");

    assert_eq!(summary.jobs.len(), 2);
    assert_eq!(summary.jobs[0].title, "Python Developer");
    assert_eq!(summary.jobs[0].company, "Acme GmbH");
    assert_eq!(summary.jobs[0].location, "Berlin");
    assert_eq!(
        summary.jobs[0].apply_url,
        format!("{}/company/Acme/jobs/Python-Dev-1", server.uri())
    );
    assert_eq!(summary.jobs[1].title, "Backend Engineer");
    assert_eq!(summary.jobs[1].company, "Beta AG");

    // Mock server speaks plain http, so nothing qualifies for auto-apply
    assert!(summary.apply_links.is_empty());

    // Export: header plus one row per record
    let mut reader = csv::Reader::from_path(&summary.export_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][0], "Backend Engineer");

    // Store: two committed rows with distinct apply URLs
    let store = open_storage(&summary.database_path).unwrap();
    let stored = store.load_jobs().unwrap();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].job.apply_url, stored[1].job.apply_url);
    assert_eq!(summary.new_jobs.len(), 2);
    assert!(stored
        .iter()
        .all(|s| s.job.added_at.as_deref().map(|t| !t.is_empty()).unwrap_or(false)));
}

#[tokio::test]
async fn test_missing_salary_is_stored_empty() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_search_page(&server, "0", &["/company/Acme/jobs/Dev-1"]).await;
    mount_detail_page(
        &server,
        "/company/Acme/jobs/Dev-1",
        detail_page("Data Engineer", "Acme GmbH", None, "Leipzig"),
        1,
    )
    .await;

    let config = create_test_config(&server.uri(), 10, output.path());
    let summary = run_pipeline(&config).await.unwrap();

    let store = open_storage(&summary.database_path).unwrap();
    let stored = store
        .get_job_by_apply_url(&format!("{}/company/Acme/jobs/Dev-1", server.uri()))
        .unwrap()
        .expect("row should be stored");

    assert_eq!(stored.job.salary, "");
    assert_eq!(stored.job.title, "Data Engineer");
    assert_eq!(stored.job.company, "Acme GmbH");
    assert_eq!(stored.job.location, "Leipzig");
    assert_eq!(stored.job.summary, "Work on Data Engineer things.");
}

#[tokio::test]
async fn test_duplicate_fragment_fetched_once() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_search_page(
        &server,
        "0",
        &["/company/Acme/jobs/Dev-1", "/company/Acme/jobs/Dev-1"],
    )
    .await;
    mount_detail_page(
        &server,
        "/company/Acme/jobs/Dev-1",
        detail_page("Dev", "Acme", None, "Berlin"),
        1,
    )
    .await;

    let config = create_test_config(&server.uri(), 10, output.path());
    let summary = run_pipeline(&config).await.unwrap();

    assert_eq!(summary.jobs.len(), 1);
}

#[tokio::test]
async fn test_identical_records_across_pages_collapse() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // The same posting shows up on both result pages
    mount_search_page(&server, "0", &["/company/Acme/jobs/Dev-1"]).await;
    mount_search_page(&server, "10", &["/company/Acme/jobs/Dev-1"]).await;
    mount_detail_page(
        &server,
        "/company/Acme/jobs/Dev-1",
        detail_page("Dev", "Acme", None, "Berlin"),
        2,
    )
    .await;

    let config = create_test_config(&server.uri(), 20, output.path());
    let summary = run_pipeline(&config).await.unwrap();

    assert_eq!(summary.jobs.len(), 1);
}

#[tokio::test]
async fn test_same_content_different_urls_kept_but_store_rejects_one() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_search_page(
        &server,
        "0",
        &["/company/Acme/jobs/Dev-1", "/company/Acme/jobs/Dev-2"],
    )
    .await;
    for detail_path in ["/company/Acme/jobs/Dev-1", "/company/Acme/jobs/Dev-2"] {
        mount_detail_page(
            &server,
            detail_path,
            detail_page("Dev", "Acme", None, "Berlin"),
            1,
        )
        .await;
    }

    let config = create_test_config(&server.uri(), 10, output.path());
    let summary = run_pipeline(&config).await.unwrap();

    // Different URLs make distinct records in memory...
    assert_eq!(summary.jobs.len(), 2);
    // ...but the shared location is unique in the store
    assert_eq!(summary.new_jobs.len(), 1);
    assert_eq!(
        summary.new_jobs[0].apply_url,
        format!("{}/company/Acme/jobs/Dev-1", server.uri())
    );

    let mut reader = csv::Reader::from_path(&summary.export_path).unwrap();
    assert_eq!(reader.records().count(), 2);
}

#[tokio::test]
async fn test_second_run_reports_no_new_jobs() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_search_page(&server, "0", &["/company/Acme/jobs/Dev-1"]).await;
    mount_detail_page(
        &server,
        "/company/Acme/jobs/Dev-1",
        detail_page("Dev", "Acme", None, "Berlin"),
        2,
    )
    .await;

    let config = create_test_config(&server.uri(), 10, output.path());
    let first = run_pipeline(&config).await.unwrap();
    let second = run_pipeline(&config).await.unwrap();

    assert_eq!(first.new_jobs.len(), 1);
    assert!(second.new_jobs.is_empty());
    assert_eq!(first.database_path, second.database_path);
    assert_eq!(second.jobs.len(), 1);

    let store = open_storage(&second.database_path).unwrap();
    assert_eq!(store.count_jobs().unwrap(), 1);
}

#[tokio::test]
async fn test_error_status_page_parsed_without_links() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html><body>Busy</body></html>"))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 10, output.path());
    let summary = run_pipeline(&config).await.unwrap();

    assert!(summary.jobs.is_empty());
    assert!(summary.new_jobs.is_empty());
    assert!(summary.export_path.exists());
}

#[tokio::test]
async fn test_requests_carry_identity_headers() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(html_response(search_page(&["/company/Acme/jobs/Dev-1"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/company/Acme/jobs/Dev-1"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(html_response(detail_page("Dev", "Acme", None, "Berlin")))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 10, output.path());
    let summary = run_pipeline(&config).await.unwrap();
    assert_eq!(summary.jobs.len(), 1);
}

#[tokio::test]
async fn test_network_failure_is_fatal_and_writes_nothing() {
    let output = TempDir::new().unwrap();

    // Nothing listens on port 1
    let config = create_test_config("http://127.0.0.1:1", 10, output.path());
    let result = run_pipeline(&config).await;

    assert!(matches!(result, Err(ScraperError::Http { .. })));
    assert!(csv_files(output.path()).is_empty());
}

#[tokio::test]
async fn test_detail_fetch_failure_aborts_run() {
    let output = TempDir::new().unwrap();
    let server = MockServer::start().await;

    // Link points at a host that refuses connections
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(html_response(search_page(&["/company/Acme/jobs/Dev-1"])))
        .mount(&server)
        .await;

    struct UnreachableDiscoverer;

    impl LinkDiscoverer for UnreachableDiscoverer {
        fn discover(&self, _document: &Html, _origin: &str) -> Result<Vec<String>, DiscoveryError> {
            Ok(vec!["http://127.0.0.1:1/company/Acme/jobs/Dev-1".to_string()])
        }
    }

    let config = create_test_config(&server.uri(), 10, output.path());
    let pipeline = Pipeline::with_discoverer(&config, Box::new(UnreachableDiscoverer)).unwrap();
    let result = pipeline.run().await;

    assert!(matches!(result, Err(ScraperError::Http { .. })));
}

#[tokio::test]
async fn test_custom_discoverer_replaces_marker_strategy() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(html_response(
            r#"<html><body><a class="result" href="/view/42">Job</a></body></html>"#.to_string(),
        ))
        .mount(&server)
        .await;
    mount_detail_page(&server, "/view/42", detail_page("Dev", "Acme", None, "Berlin"), 1).await;

    struct AnchorDiscoverer;

    impl LinkDiscoverer for AnchorDiscoverer {
        fn discover(&self, document: &Html, origin: &str) -> Result<Vec<String>, DiscoveryError> {
            let selector = scraper::Selector::parse("a.result").unwrap();
            Ok(document
                .select(&selector)
                .filter_map(|a| a.value().attr("href"))
                .map(|href| format!("{}{}", origin, href))
                .collect())
        }
    }

    let config = create_test_config(&server.uri(), 10, output.path());
    let pipeline = Pipeline::with_discoverer(&config, Box::new(AnchorDiscoverer)).unwrap();
    let result = pipeline.run().await.unwrap();

    assert_eq!(result.jobs.len(), 1);
    assert_eq!(result.jobs[0].apply_url, format!("{}/view/42", server.uri()));
}
