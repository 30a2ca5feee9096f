//! Pokédex HTTP server: catalog and trainer stores, token auth and the
//! request handlers that sit on top of them.

pub mod auth;
pub mod database;
pub mod handlers;

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use shared::config::LiveConfig;
use shared::types::AppConfig;

use crate::auth::{Caller, SessionSlot, TokenIssuer, current_token, resolve_caller};
use crate::database::{PokedexDb, TrainerDb};
use crate::handlers::http::routes::Router;
use crate::handlers::http::utils::deliver_error_json;

/// Everything a handler can reach. Cheap to clone; all fields share state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: LiveConfig,
    pub pokedex: PokedexDb,
    pub trainers: TrainerDb,
    pub tokens: TokenIssuer,
    pub session: SessionSlot,
}

impl AppState {
    /// Open both on-disk stores named in `config.paths`.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let pokedex = PokedexDb::open(&config.paths.pokedex_db)
            .await
            .with_context(|| format!("Failed to open catalog store {}", config.paths.pokedex_db))?;
        let trainers = TrainerDb::open(&config.paths.trainers_db)
            .await
            .with_context(|| {
                format!("Failed to open trainer store {}", config.paths.trainers_db)
            })?;

        Self::assemble(config, pokedex, trainers)
    }

    /// Same as [`AppState::open`] but backed by private in-memory databases.
    pub async fn in_memory(config: AppConfig) -> Result<Self> {
        let pokedex = PokedexDb::open_in_memory()
            .await
            .context("Failed to open in-memory catalog store")?;
        let trainers = TrainerDb::open_in_memory()
            .await
            .context("Failed to open in-memory trainer store")?;

        Self::assemble(config, pokedex, trainers)
    }

    fn assemble(config: AppConfig, pokedex: PokedexDb, trainers: TrainerDb) -> Result<Self> {
        let secret = config
            .auth
            .resolved_jwt_secret()
            .ok_or_else(|| anyhow!("No JWT secret configured"))?;
        let tokens = TokenIssuer::new(
            secret.as_bytes(),
            Duration::from_secs(config.auth.default_token_expiry_secs()),
        );

        Ok(Self {
            config: LiveConfig::new(config),
            pokedex,
            trainers,
            tokens,
            session: SessionSlot::new(),
        })
    }

    /// Resolve the current caller. `request_token` is the request's own
    /// bearer token and only matters in bearer session mode.
    pub async fn caller(&self, request_token: Option<String>) -> Caller {
        let mode = self.config.read().await.auth.session_mode;
        resolve_caller(
            &self.tokens,
            current_token(&self.session, mode, request_token),
        )
    }

    /// True when the current caller holds a live token for the admin user.
    pub async fn is_admin_caller(&self, request_token: Option<String>) -> bool {
        let admin_username = self.config.read().await.auth.admin_username.clone();
        self.caller(request_token).await.is_admin(&admin_username)
    }
}

/// Accept connections until the listener fails, one task per connection.
pub async fn serve(listener: TcpListener, state: AppState, router: Arc<Router>) -> Result<()> {
    let max_connections = state.config.read().await.server.max_connections;
    let permits = Arc::new(Semaphore::new(max_connections));

    info!(
        "Listening on http://{}",
        listener.local_addr().context("Listener has no local address")?
    );

    loop {
        let permit = permits
            .clone()
            .acquire_owned()
            .await
            .context("Connection semaphore closed")?;

        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let io = TokioIo::new(stream);
        let state = state.clone();
        let router = router.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let state = state.clone();
                let router = router.clone();
                async move { Ok::<_, Infallible>(dispatch(&router, req, state).await) }
            });

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                debug!("Error serving connection from {}: {:?}", peer, err);
            }

            drop(permit);
        });
    }
}

/// Route one request, turning handler failures into a 500 JSON body.
async fn dispatch(
    router: &Router,
    req: Request<hyper::body::Incoming>,
    state: AppState,
) -> Response<BoxBody<Bytes, Infallible>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match router.route(req, state).await {
        Ok(response) => {
            info!("{} {} -> {}", method, path, response.status().as_u16());
            response
        }
        Err(e) => {
            error!("{} {} failed: {:#}", method, path, e);
            internal_error()
        }
    }
}

fn internal_error() -> Response<BoxBody<Bytes, Infallible>> {
    deliver_error_json(
        "INTERNAL_ERROR",
        "An internal error occurred",
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .unwrap_or_else(|_| {
        let mut response = Response::new(handlers::http::utils::empty());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}
