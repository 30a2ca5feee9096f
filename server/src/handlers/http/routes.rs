use std::convert::Infallible;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Method, Request, Response, StatusCode};
use tracing::{debug, warn};

use shared::types::TokenClaims;

use crate::AppState;
use crate::auth::Caller;
use crate::handlers::http::utils::*;
use crate::handlers::http::{auth, catalog, profile};

// ---------------------------------------------------------------------------
// Handler type aliases
// ---------------------------------------------------------------------------
//
// Three tiers:
//
//   Open     no auth. Receives (req, state).
//   Trainer  a live current token. Receives (req, state, claims).
//   Admin    the current token belongs to the admin user. Receives (req, state).
//
// "Current token" is the session slot or the request's bearer header,
// depending on `auth.session_mode`.

type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send>>;

type RouteHandler =
    Box<dyn Fn(Request<hyper::body::Incoming>, AppState) -> HandlerFuture + Send + Sync>;

type TrainerHandler = Box<
    dyn Fn(Request<hyper::body::Incoming>, AppState, TokenClaims) -> HandlerFuture + Send + Sync,
>;

enum RouteKind {
    Open(RouteHandler),
    Trainer(TrainerHandler),
    Admin(RouteHandler),
}

struct Route {
    method: Method,
    path: String,
    kind: RouteKind,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router {
    routes: Vec<Route>,
    web_dir: Option<String>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .field("web_dir", &self.web_dir)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            web_dir: None,
        }
    }

    /// Serve `/static/...` from `web_dir` instead of `paths.web_dir`.
    pub fn with_web_dir(mut self, web_dir: String) -> Self {
        self.web_dir = Some(web_dir);
        self
    }

    fn open<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    fn trainer<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState, TokenClaims) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: RouteKind::Trainer(Box::new(move |req, state, claims| {
                Box::pin(handler(req, state, claims))
            })),
        });
        self
    }

    fn admin<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            kind: RouteKind::Admin(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    // ── Open (no auth) ────────────────────────────────────────────────────────

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.open(Method::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.open(Method::POST, path, handler)
    }

    // ── Trainer (live current token) ──────────────────────────────────────────

    pub fn get_trainer<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState, TokenClaims) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.trainer(Method::GET, path, handler)
    }

    pub fn post_trainer<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState, TokenClaims) -> Fut
            + Send
            + Sync
            + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.trainer(Method::POST, path, handler)
    }

    // ── Admin (current token's subject is the admin user) ─────────────────────

    pub fn get_admin<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.admin(Method::GET, path, handler)
    }

    pub fn post_admin<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<hyper::body::Incoming>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response<BoxBody<Bytes, Infallible>>>> + Send + 'static,
    {
        self.admin(Method::POST, path, handler)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route(
        &self,
        req: Request<hyper::body::Incoming>,
        state: AppState,
    ) -> Result<Response<BoxBody<Bytes, Infallible>>> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method || !Self::path_matches(&route.path, &path) {
                continue;
            }

            return match &route.kind {
                RouteKind::Open(h) => h(req, state).await,

                RouteKind::Trainer(h) => {
                    let caller = state.caller(get_bearer_token(req.headers())).await;
                    match caller {
                        Caller::Trainer(claims) => h(req, state, claims).await,
                        Caller::Anonymous => {
                            warn!("Trainer route {} {} without a token", method, path);
                            unauthorized("UNAUTHORIZED", "Unauthorized")
                        }
                        Caller::Expired => {
                            warn!("Trainer route {} {} with expired token", method, path);
                            unauthorized("TOKEN_EXPIRED", "Invalid or expired token")
                        }
                        Caller::Invalid(_) => {
                            unauthorized("INVALID_TOKEN", "Invalid or expired token")
                        }
                    }
                }

                RouteKind::Admin(h) => {
                    if state.is_admin_caller(get_bearer_token(req.headers())).await {
                        h(req, state).await
                    } else {
                        warn!("Admin route {} {} refused", method, path);
                        unauthorized("UNAUTHORIZED", "Unauthorized")
                    }
                }
            };
        }

        // No registered route matched, try static file fallback for GET.
        if method == Method::GET {
            if let Some(static_response) = self.try_serve_static(&path, &state).await? {
                return Ok(static_response);
            }
        }

        deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);

        if route_path == clean {
            return true;
        }

        // Segment-by-segment matching for `:param` wildcards.
        // e.g.  "/api/pokemons/:dex"  matches  "/api/pokemons/25"
        let route_segs: Vec<&str> = route_path.split('/').collect();
        let path_segs: Vec<&str> = clean.split('/').collect();

        if route_segs.len() != path_segs.len() {
            return false;
        }

        route_segs
            .iter()
            .zip(path_segs.iter())
            .all(|(r, p)| (r.starts_with(':') && !p.is_empty()) || r == p)
    }

    // ── Static file fallback ──────────────────────────────────────────────────

    /// Map `/static/...` onto the web directory. Anything else, or any path
    /// that tries to climb out of the directory, is not served.
    pub fn static_file_path(web_dir: &str, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.strip_prefix("/static/")?;
        if relative.is_empty()
            || relative
                .split('/')
                .any(|seg| seg == ".." || seg == "." || seg.is_empty())
        {
            return None;
        }

        Some(Path::new(web_dir).join("static").join(relative))
    }

    async fn try_serve_static(
        &self,
        path: &str,
        state: &AppState,
    ) -> Result<Option<Response<BoxBody<Bytes, Infallible>>>> {
        let web_dir = match &self.web_dir {
            Some(dir) => dir.clone(),
            None => state.config.read().await.paths.web_dir.clone(),
        };

        let Some(file_path) = Self::static_file_path(web_dir.trim_end_matches('/'), path) else {
            return Ok(None);
        };

        match tokio::fs::read(&file_path).await {
            Ok(content) => Ok(Some(
                deliver_page_with_status(&file_path, content, StatusCode::OK, CacheStrategy::Yes)
                    .context("Failed to deliver static file")?,
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Static file not found: {}", file_path.display());
                Ok(None)
            }
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read static file {}", file_path.display())),
        }
    }
}

fn unauthorized(code: &str, message: &str) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_error_json(code, message, StatusCode::UNAUTHORIZED)
        .context("Failed to deliver 401 response")
}

// ---------------------------------------------------------------------------
// Application router
//
// Auth tier is enforced here at the routing level; handlers MUST NOT repeat
// the check.
// ---------------------------------------------------------------------------

pub fn build_router() -> Router {
    Router::new()
        // ── Public ────────────────────────────────────────────────────────────
        .get("/", |req, state| async move {
            catalog::handle_home(req, state).await.context("Home page failed")
        })
        .get("/pokedex", |req, state| async move {
            catalog::handle_pokedex_list(req, state)
                .await
                .context("Pokedex list failed")
        })
        .get("/pokedex/:dex", |req, state| async move {
            catalog::handle_pokedex_detail(req, state)
                .await
                .context("Pokedex detail failed")
        })
        .get("/api/trainers", |req, state| async move {
            auth::handle_trainers_page(req, state)
                .await
                .context("Trainers page failed")
        })
        .post("/api/register", |req, state| async move {
            auth::handle_register(req, state)
                .await
                .context("Registration failed")
        })
        .post("/api/login", |req, state| async move {
            auth::handle_login(req, state).await.context("Login failed")
        })
        .get("/health", |_req, _state| async move {
            deliver_serialized_json(
                &serde_json::json!({ "status": "success", "health": "ok" }),
                StatusCode::OK,
            )
        })
        // ── Trainer ───────────────────────────────────────────────────────────
        .get_trainer("/api/profile", |req, state, claims| async move {
            profile::handle_get_profile(req, state, claims)
                .await
                .context("Profile get failed")
        })
        .post_trainer("/api/add_pokemon/:id", |req, state, claims| async move {
            profile::handle_add_pokemon(req, state, claims)
                .await
                .context("Add pokemon failed")
        })
        // ── Admin ─────────────────────────────────────────────────────────────
        .get_admin("/api/pokemons", |req, state| async move {
            catalog::handle_list_pokemons(req, state)
                .await
                .context("Pokemon list failed")
        })
        .get_admin("/api/pokemons/:dex", |req, state| async move {
            catalog::handle_get_pokemon(req, state)
                .await
                .context("Pokemon get failed")
        })
        .get_admin("/api/create", |req, state| async move {
            catalog::handle_create_page(req, state)
                .await
                .context("Create page failed")
        })
        .post_admin("/api/create", |req, state| async move {
            catalog::handle_create_pokemon(req, state)
                .await
                .context("Create pokemon failed")
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
