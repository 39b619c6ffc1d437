use std::time::{Duration, Instant};

use sitecheck_probe::{RetryPolicy, SiteVisitor, VisitError, retrieve_with_retry};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        backoff: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn test_first_attempt_success_skips_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let visitor = SiteVisitor::new().unwrap();
    let links = retrieve_with_retry(&visitor, &server.uri(), true, &quick_policy())
        .await
        .unwrap();

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_fail_then_succeed_recovers_after_backoff() {
    let server = MockServer::start().await;

    // First round sees the failure, the retry falls through to the 200.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(999))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let visitor = SiteVisitor::new().unwrap();
    let started = Instant::now();
    retrieve_with_retry(&visitor, &server.uri(), true, &quick_policy())
        .await
        .unwrap();

    assert!(
        started.elapsed() >= Duration::from_millis(50),
        "backoff did not elapse between attempts"
    );
    assert_eq!(visitor.stats().attempts, 2);
    assert_eq!(visitor.stats().success_visits, 1);
}

#[tokio::test]
async fn test_exhausted_attempts_surface_the_last_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(999))
        .expect(2)
        .mount(&server)
        .await;

    let visitor = SiteVisitor::new().unwrap();
    let err = retrieve_with_retry(&visitor, &server.uri(), true, &quick_policy())
        .await
        .unwrap_err();

    match err {
        VisitError::UnexpectedStatus { site, status } => {
            assert_eq!(site, server.uri());
            assert_eq!(status, 999);
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
    assert_eq!(visitor.stats().attempts, 2);
    assert_eq!(visitor.stats().success_visits, 0);
}

#[tokio::test]
async fn test_retry_repeats_the_whole_round() {
    let origin = MockServer::start().await;
    let linked = MockServer::start().await;
    let base = format!("http://localhost:{}", linked.address().port());

    // Link target fails once, then recovers; the retry must re-fetch the
    // parent page too, not just the failed link.
    let page = format!(r#"<a href="{}/flaky">flaky</a>"#, base);
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(2)
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(999))
        .up_to_n_times(1)
        .mount(&linked)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&linked)
        .await;

    let visitor = SiteVisitor::new().unwrap();
    let links = retrieve_with_retry(&visitor, &origin.uri(), true, &quick_policy())
        .await
        .unwrap();

    assert_eq!(links.len(), 1);
    assert!(links.contains(&format!("{}/flaky", base)));
    assert_eq!(visitor.stats().attempts, 4);
    assert_eq!(visitor.stats().success_visits, 3);
}

#[tokio::test]
async fn test_link_failures_counted_per_round() {
    let origin = MockServer::start().await;
    let linked = MockServer::start().await;
    let base = format!("http://localhost:{}", linked.address().port());

    let page = format!(r#"<a href="{}/broken">broken</a>"#, base);
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(2)
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(999))
        .expect(2)
        .mount(&linked)
        .await;

    let visitor = SiteVisitor::new().unwrap();
    let err = retrieve_with_retry(&visitor, &origin.uri(), true, &quick_policy())
        .await
        .unwrap_err();

    match err {
        VisitError::LinkFailures { site, failures } => {
            assert_eq!(site, origin.uri());
            assert_eq!(failures.len(), 1);
        }
        other => panic!("expected LinkFailures, got {:?}", other),
    }
}
