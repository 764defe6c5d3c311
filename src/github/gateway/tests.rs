//! HTTP-level tests for the Octocrab gateway.

use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{GitHubGateway, OctocrabGateway};
use crate::github::{GitHubError, PersonalAccessToken, PullRequestState, RepositorySlug};

struct GatewayFixture {
    runtime: Runtime,
    server: MockServer,
    gateway: OctocrabGateway,
}

impl GatewayFixture {
    fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn mount(&self, mock: Mock) {
        self.block_on(mock.mount(&self.server));
    }
}

fn build_gateway(runtime: &Runtime, api_base: &str, timeout: Duration) -> OctocrabGateway {
    let _guard = runtime.enter();
    OctocrabGateway::for_api_base(api_base, timeout).expect("gateway should build")
}

#[fixture]
fn gateway_fixture() -> GatewayFixture {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let gateway = build_gateway(&runtime, &server.uri(), Duration::from_secs(5));
    GatewayFixture {
        runtime,
        server,
        gateway,
    }
}

fn slug() -> RepositorySlug {
    RepositorySlug::parse("octo/widgets").expect("slug should parse")
}

fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("ghp_test").expect("token present")
}

fn repository_body() -> serde_json::Value {
    json!({
        "id": 42,
        "name": "widgets",
        "full_name": "octo/widgets",
        "description": "Widget factory",
        "stargazers_count": 10,
        "forks_count": 2,
        "open_issues_count": 3,
        "language": "Rust",
        "updated_at": "2025-06-01T12:00:00Z",
        "html_url": "https://github.com/octo/widgets",
        "private": false,
        "topics": ["widgets"]
    })
}

#[rstest]
fn repository_sends_versioned_accept_and_token(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets"))
            .and(header("accept", "application/vnd.github.v3+json"))
            .and(header("authorization", "token ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repository_body()))
            .expect(1),
    );

    let repository = gateway_fixture
        .block_on(gateway_fixture.gateway.repository(&slug(), Some(token())))
        .expect("request should succeed");

    assert_eq!(repository.full_name, "octo/widgets");
    assert_eq!(repository.language.as_deref(), Some("Rust"));
    assert_eq!(repository.stargazers_count, 10);
    gateway_fixture.block_on(gateway_fixture.server.verify());
}

#[rstest]
fn anonymous_requests_omit_authorization(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repository_body())),
    );

    gateway_fixture
        .block_on(gateway_fixture.gateway.repository(&slug(), None))
        .expect("request should succeed");

    let requests = gateway_fixture
        .block_on(gateway_fixture.server.received_requests())
        .expect("request recording enabled");
    let request = requests.first().expect("one request recorded");
    assert!(
        !request.headers.contains_key("authorization"),
        "anonymous request should not carry credentials"
    );
}

#[rstest]
fn open_pull_requests_requests_one_page_of_open_pulls(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/pulls"))
            .and(query_param("state", "open"))
            .and(query_param("per_page", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": 1,
                "number": 5,
                "title": "Faster widgets",
                "state": "open",
                "created_at": "2025-06-01T00:00:00Z",
                "updated_at": "2025-06-02T00:00:00Z",
                "html_url": "https://github.com/octo/widgets/pull/5",
                "user": { "login": "octocat", "avatar_url": "https://avatars/octocat" },
                "draft": true,
                "head": { "ref": "speed" },
                "base": { "ref": "main" }
            }])))
            .expect(1),
    );

    let pulls = gateway_fixture
        .block_on(
            gateway_fixture
                .gateway
                .open_pull_requests(&slug(), 20, Some(token())),
        )
        .expect("request should succeed");

    let first = pulls.first().expect("one pull request");
    assert_eq!(first.number, 5);
    assert_eq!(first.state, PullRequestState::Open);
    assert!(first.draft);
    assert_eq!(first.head.name, "speed");
    gateway_fixture.block_on(gateway_fixture.server.verify());
}

#[rstest]
fn not_found_is_an_upstream_error(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest/repos/repos#get-a-repository"
            }))),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.repository(&slug(), None))
        .expect_err("request should fail");

    assert_eq!(
        error,
        GitHubError::Upstream {
            status: 404,
            message: "Not Found".to_owned(),
        }
    );
}

#[rstest]
fn exhausted_quota_is_rate_limited(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-limit", "60")
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(json!({ "message": "API rate limit exceeded for 10.0.0.1." })),
            ),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.repository(&slug(), None))
        .expect_err("request should fail");

    let GitHubError::RateLimited { rate_limit, .. } = error else {
        panic!("expected RateLimited, got {error:?}");
    };
    let info = rate_limit.expect("rate limit headers should be captured");
    assert_eq!(info.limit(), 60);
    assert_eq!(info.reset_at(), 1_700_000_000);
}

#[rstest]
fn forbidden_without_exhaustion_is_upstream(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "4999")
                    .set_body_json(json!({ "message": "Resource not accessible by integration" })),
            ),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.authenticated_user(token()))
        .expect_err("request should fail");

    assert!(
        matches!(error, GitHubError::Upstream { status: 403, .. }),
        "expected Upstream 403, got {error:?}"
    );
}

#[rstest]
fn malformed_success_body_is_a_decode_error(gateway_fixture: GatewayFixture) {
    gateway_fixture.mount(
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": \"not-a-number\"")),
    );

    let error = gateway_fixture
        .block_on(gateway_fixture.gateway.repository(&slug(), None))
        .expect_err("request should fail");

    assert!(
        matches!(error, GitHubError::Decode { .. }),
        "expected Decode, got {error:?}"
    );
}

#[rstest]
fn slow_responses_time_out_as_unreachable() {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    let gateway = build_gateway(&runtime, &server.uri(), Duration::from_millis(200));
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(3))
                    .set_body_json(json!({ "login": "octocat" })),
            )
            .mount(&server),
    );

    let error = runtime
        .block_on(gateway.authenticated_user(token()))
        .expect_err("request should time out");

    assert!(
        matches!(error, GitHubError::Unreachable { .. }),
        "expected Unreachable, got {error:?}"
    );
}

#[rstest]
fn refused_connection_is_unreachable() {
    let runtime = Runtime::new().expect("runtime should start");
    let gateway = build_gateway(&runtime, "http://127.0.0.1:1", Duration::from_secs(2));

    let error = runtime
        .block_on(gateway.repository(&slug(), None))
        .expect_err("request should fail");

    assert!(
        matches!(error, GitHubError::Unreachable { .. }),
        "expected Unreachable, got {error:?}"
    );
}
