use routeplan::blueprint::method_guard::{GET, MethodGuard};
use routeplan::manifest::Manifest;
use routeplan::{Blueprint, FallbackExt, RequestContext, Response};

async fn handler(_ctx: RequestContext) -> Response {
    Response::default()
}

fn table() -> routeplan::RouteTable {
    let mut api = Blueprint::new();
    api.route(GET, "/users/{id:int}", handler);
    api.route(
        MethodGuard::new([http::Method::PUT, http::Method::PATCH]),
        "/users/{id:int}",
        handler,
    );

    let mut bp = Blueprint::new();
    bp.fallback(handler);
    bp.nest_at("/api", api);
    bp.build().unwrap()
}

#[test]
fn the_manifest_lists_endpoints_in_dispatch_order() {
    let manifest = table().manifest();
    let summary: Vec<_> = manifest
        .endpoints
        .iter()
        .map(|e| {
            format!(
                "{} | {} | {} | {}",
                e.order,
                e.methods.join(","),
                e.pattern,
                e.display_name
            )
        })
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    0 | GET | /api/users/{id:int} | HTTP: GET /api/users/{id:int}
    0 | PUT,PATCH | /api/users/{id:int} | HTTP: PUT, PATCH /api/users/{id:int}
    2147483647 | * | {*path:nonfile} | Fallback
    ");
}

#[test]
fn the_manifest_survives_a_round_trip_to_disk() {
    let manifest = table().manifest();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.ron");

    manifest.persist(&path).unwrap();
    let loaded = Manifest::load(&path).unwrap();
    assert_eq!(loaded, manifest);
}

#[test]
fn loading_a_missing_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::load(&dir.path().join("missing.ron")).unwrap_err();
    assert!(err.to_string().contains("missing.ron"), "{err}");
}
