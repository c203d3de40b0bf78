use bytes::Bytes;
use http::header::ALLOW;
use http::{Method, StatusCode};

use routeplan::blueprint::BuildError;
use routeplan::blueprint::method_guard::{GET, MethodGuard, POST};
use routeplan::config::{RoutingConfig, TrailingSlash};
use routeplan::router::RouteLookup;
use routeplan::{Blueprint, FallbackExt, RequestContext, Response, RouteTable};

async fn echo_route(ctx: RequestContext) -> Response {
    Response::new(Bytes::from(ctx.endpoint().pattern().to_owned()))
}

async fn echo_params(ctx: RequestContext) -> Response {
    let rendered: Vec<String> = ctx
        .params()
        .iter()
        .map(|(k, v)| format!("{k}={}", v.as_str()))
        .collect();
    Response::new(Bytes::from(rendered.join("&")))
}

fn request(method: Method, path: &str) -> routeplan::Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

fn matched_pattern<'a>(table: &'a RouteTable, method: &Method, path: &str) -> Option<&'a str> {
    match table.lookup(method, path) {
        RouteLookup::Matched(m) => Some(m.endpoint().pattern()),
        _ => None,
    }
}

#[test]
fn the_route_table_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RouteTable>();
}

#[test]
fn more_specific_templates_win_within_the_same_order() {
    let mut bp = Blueprint::new();
    bp.route(GET, "/files/{*rest}", echo_route);
    bp.route(GET, "/files/{name}", echo_route);
    bp.route(GET, "/files/{id:int}", echo_route);
    bp.route(GET, "/files/latest", echo_route);
    let table = bp.build().unwrap();

    assert_eq!(
        matched_pattern(&table, &Method::GET, "/files/latest"),
        Some("/files/latest")
    );
    assert_eq!(
        matched_pattern(&table, &Method::GET, "/files/7"),
        Some("/files/{id:int}")
    );
    assert_eq!(
        matched_pattern(&table, &Method::GET, "/files/report"),
        Some("/files/{name}")
    );
    assert_eq!(
        matched_pattern(&table, &Method::GET, "/files/a/b"),
        Some("/files/{*rest}")
    );
}

#[test]
fn a_lower_order_beats_specificity() {
    let mut bp = Blueprint::new();
    bp.route(GET, "/about", echo_route);
    bp.route(GET, "/{page}", echo_route).with_order(-1);
    let table = bp.build().unwrap();
    assert_eq!(
        matched_pattern(&table, &Method::GET, "/about"),
        Some("/{page}")
    );
}

#[tokio::test]
async fn a_method_mismatch_is_reported_with_the_allowed_methods() {
    let mut bp = Blueprint::new();
    bp.route(GET, "/orders/{id}", echo_route);
    bp.route(
        MethodGuard::new([Method::PUT, Method::PATCH]),
        "/orders/{id}",
        echo_route,
    );
    bp.route(POST, "/orders", echo_route);
    let table = bp.build().unwrap();

    let RouteLookup::MethodNotAllowed(allowed) = table.lookup(&Method::DELETE, "/orders/1") else {
        panic!("Expected a method mismatch");
    };
    assert_eq!(
        allowed.iter().collect::<Vec<_>>(),
        [&Method::GET, &Method::PUT, &Method::PATCH]
    );

    let response = table.handle(request(Method::DELETE, "/orders/1")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[ALLOW], "GET, PUT, PATCH");

    let response = table.handle(request(Method::GET, "/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn a_fallback_turns_method_mismatches_into_matches() {
    async fn shell(_ctx: RequestContext) -> Response {
        Response::new(Bytes::from_static(b"shell"))
    }

    let mut bp = Blueprint::new();
    bp.route(POST, "/login", echo_route);
    bp.fallback(shell);
    let table = bp.build().unwrap();

    let response = table.handle(request(Method::GET, "/login")).await;
    assert_eq!(response.body(), "shell");
}

#[tokio::test]
async fn route_parameters_are_captured() {
    let mut bp = Blueprint::new();
    bp.route(GET, "/users/{user_id}/posts/{*slug}", echo_params);
    let table = bp.build().unwrap();

    let response = table
        .handle(request(Method::GET, "/users/42/posts/2024/hello%20world"))
        .await;
    assert_eq!(response.body(), "user_id=42&slug=2024/hello%20world");

    let RouteLookup::Matched(m) = table.lookup(&Method::GET, "/users/42/posts/hello%20world")
    else {
        panic!("Expected a match");
    };
    assert_eq!(m.params().decode("slug").unwrap().unwrap(), "hello world");
}

#[test]
fn custom_constraints_are_available_to_templates() {
    let mut bp = Blueprint::new();
    bp.constraint("slug", |value: &str| {
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_lowercase() || b == b'-')
    });
    bp.route(GET, "/blog/{post:slug}", echo_route);
    let table = bp.build().unwrap();

    assert!(matched_pattern(&table, &Method::GET, "/blog/hello-world").is_some());
    assert!(matched_pattern(&table, &Method::GET, "/blog/Hello").is_none());
}

#[test]
fn nested_constraints_are_visible_to_the_parent() {
    let mut child = Blueprint::new();
    child.constraint("even", |value: &str| {
        value.parse::<u64>().is_ok_and(|n| n % 2 == 0)
    });
    let mut bp = Blueprint::new();
    bp.nest(child);
    bp.route(GET, "/pages/{n:even}", echo_route);
    let table = bp.build().unwrap();

    assert!(matched_pattern(&table, &Method::GET, "/pages/4").is_some());
    assert!(matched_pattern(&table, &Method::GET, "/pages/3").is_none());
}

#[test]
fn matching_honors_the_routing_configuration() {
    let build = |config: RoutingConfig| {
        let mut bp = Blueprint::new();
        bp.route(GET, "/About", echo_route);
        bp.build_with_config(config).unwrap()
    };

    let lenient = build(RoutingConfig::default());
    assert!(matched_pattern(&lenient, &Method::GET, "/about/").is_some());

    let mut config = RoutingConfig::default();
    config.case_sensitive = true;
    config.trailing_slash = TrailingSlash::Strict;
    let strict = build(config);
    assert!(matched_pattern(&strict, &Method::GET, "/about").is_none());
    assert!(matched_pattern(&strict, &Method::GET, "/About/").is_none());
    assert!(matched_pattern(&strict, &Method::GET, "/About").is_some());
    assert!(strict.config().case_sensitive);
}

#[test]
fn build_errors_point_at_the_registration() {
    let mut bp = Blueprint::new();
    bp.route(GET, "/users/{id}/{id}", echo_route);
    let err = bp.build().unwrap_err();
    let BuildError::InvalidTemplate {
        registered_at,
        source,
        ..
    } = &err
    else {
        panic!("Expected an invalid template error, got {err:?}");
    };
    assert_eq!(registered_at.file, file!());
    insta::assert_snapshot!(source, @"The `id` parameter appears more than once in the same template");

    let mut bp = Blueprint::new();
    bp.fallback_at("/{*path:missing}", echo_route).unwrap();
    let err = bp.build().unwrap_err();
    assert!(
        err.to_string()
            .starts_with("`/{*path:missing}`, registered at "),
        "{err}"
    );
    assert!(
        err.to_string()
            .ends_with("uses the `missing` constraint, but no constraint with that name has been registered"),
        "{err}"
    );
}

#[tokio::test]
async fn handlers_can_inspect_the_matched_endpoint() {
    #[derive(Clone)]
    struct CacheFor(u32);

    async fn cached(ctx: RequestContext) -> Response {
        let seconds = ctx
            .endpoint()
            .metadata()
            .get::<CacheFor>()
            .map_or(0, |c| c.0);
        Response::new(Bytes::from(seconds.to_string()))
    }

    let mut bp = Blueprint::new();
    bp.route(GET, "/static/{*file}", cached)
        .with_metadata(CacheFor(3600));
    bp.route(GET, "/live", cached);
    let table = bp.build().unwrap();

    let response = table.handle(request(Method::GET, "/static/app.js")).await;
    assert_eq!(response.body(), "3600");
    let response = table.handle(request(Method::GET, "/live")).await;
    assert_eq!(response.body(), "0");
}
