//! # routeplan
//!
//! Build a route table for an HTTP application, fallbacks included.
//!
//! Routes are registered against a [`Blueprint`]. Each registration returns a
//! [`RegisteredRoute`] handle to attach conventions (metadata, order, display name, …)
//! before [`Blueprint::build`] validates everything and produces an immutable
//! [`RouteTable`], ready to dispatch requests.
//!
//! ## Fallbacks
//!
//! A fallback is the endpoint of last resort: it's only selected when no other endpoint
//! matches the request. The typical use case is a single-page application, where every
//! client-side route must be served the same HTML shell while missing static files
//! should still return `404`.
//!
//! ```rust
//! use bytes::Bytes;
//! use http::StatusCode;
//! use routeplan::{Blueprint, FallbackExt, RequestContext, Response};
//! use routeplan::blueprint::method_guard::GET;
//!
//! async fn get_user(ctx: RequestContext) -> Response {
//!     let id = ctx.params().get("id").unwrap_or_default().to_owned();
//!     Response::new(Bytes::from(id))
//! }
//!
//! async fn spa_shell(_ctx: RequestContext) -> Response {
//!     Response::new(Bytes::from_static(b"<div id=\"app\"></div>"))
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut bp = Blueprint::new();
//! bp.route(GET, "/api/users/{id:int}", get_user);
//! bp.fallback(spa_shell);
//! let table = bp.build().unwrap();
//!
//! let request = |path: &str| http::Request::get(path).body(Bytes::new()).unwrap();
//! let response = table.handle(request("/settings/profile")).await;
//! assert_eq!(response.body(), "<div id=\"app\"></div>");
//! // It looks like a file name: the fallback doesn't match.
//! let response = table.handle(request("/assets/app.js")).await;
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! # }
//! ```
pub use blueprint::{Blueprint, FallbackExt, RegisteredRoute, RouteBuilder};
pub use handler::{Handler, Request, RequestContext, Response};
pub use router::RouteTable;

pub mod blueprint;
pub mod config;
pub mod constraint;
pub mod endpoint;
pub mod handler;
pub mod manifest;
pub mod reflection;
pub mod route;
pub mod router;
pub mod telemetry;
