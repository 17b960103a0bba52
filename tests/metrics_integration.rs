//! Evaluator behavior against a failing or empty hosting API.

use core::time::Duration;
use serde_json::json;
use trustscore::hosting::{Client, RetryPolicy};
use trustscore::identity::RepositoryIdentity;
use trustscore::metrics::{EvalContext, MetricKind, evaluate};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn identity() -> RepositoryIdentity {
    let url = Url::parse("https://github.com/acme/widget").expect("url");
    RepositoryIdentity::parse(&url, url.as_str()).expect("identity")
}

fn context(server: &MockServer) -> EvalContext {
    let retry = RetryPolicy {
        max_retry_attempts: 2,
        base_delay: Duration::from_millis(5),
        request_timeout: Duration::from_secs(10),
    };
    let client = Client::new(None, server.uri()).expect("client").with_retry_policy(retry);
    EvalContext::new(client, ["MIT".to_string()])
}

#[tokio::test]
async fn test_fetch_failure_uses_fallback_scores() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let ctx = context(&server);
    let repo = identity();

    for kind in MetricKind::ALL {
        let result = evaluate(kind, &repo, &ctx).await;
        assert_eq!(result.kind, kind);
        assert!(
            (result.score - kind.fallback_score()).abs() < f64::EPSILON,
            "{kind} scored {} instead of its fallback",
            result.score
        );
    }
}

#[tokio::test]
async fn test_license_fails_closed_and_maintainability_neutral() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let ctx = context(&server);
    let repo = identity();

    assert!(evaluate(MetricKind::License, &repo, &ctx).await.score.abs() < f64::EPSILON);
    assert!((evaluate(MetricKind::Maintainability, &repo, &ctx).await.score - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_absent_signals_use_documented_defaults() {
    // Every endpoint answers 404.
    let server = MockServer::start().await;
    let ctx = context(&server);
    let repo = identity();

    let expected = [
        (MetricKind::RampUp, 0.0),
        (MetricKind::BusFactor, 0.0),
        (MetricKind::Correctness, 0.5),
        (MetricKind::License, 0.0),
        (MetricKind::Maintainability, 0.5),
    ];

    for (kind, score) in expected {
        let result = evaluate(kind, &repo, &ctx).await;
        assert!((result.score - score).abs() < f64::EPSILON, "{kind} scored {}", result.score);
    }
}

#[tokio::test]
async fn test_license_expression_from_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "license": { "spdx_id": "NOASSERTION" } })))
        .mount(&server)
        .await;

    let result = evaluate(MetricKind::License, &identity(), &context(&server)).await;
    assert!(result.score.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_license_survives_one_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/license"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/license"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "license": { "spdx_id": "MIT" } })))
        .mount(&server)
        .await;

    let result = evaluate(MetricKind::License, &identity(), &context(&server)).await;
    assert!((result.score - 1.0).abs() < f64::EPSILON);

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_shared_issue_listing_feeds_both_issue_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "created_at": "2024-01-01T00:00:00Z", "closed_at": "2024-01-31T00:00:00Z", "state": "closed" },
            { "created_at": "2024-01-01T00:00:00Z", "closed_at": null, "state": "open" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let repo = identity();

    let correctness = evaluate(MetricKind::Correctness, &repo, &ctx).await;
    let maintainability = evaluate(MetricKind::Maintainability, &repo, &ctx).await;

    assert!((correctness.score - 0.5).abs() < 1e-9);
    assert!((maintainability.score - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_fresh_package_context_fetches_again() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widget/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let repo = identity();

    assert!(ctx.issues(&repo).await.expect("issues").is_empty());
    assert!(ctx.issues(&repo).await.expect("issues").is_empty());
    assert!(ctx.for_package().issues(&repo).await.expect("issues").is_empty());
}
