//! Backend entry-point: configuration, connectivity checks, migrations, and
//! the HTTP server.

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use roomboard::doc::ApiDoc;
use roomboard::inbound::http;
use roomboard::outbound::persistence::{run_migrations, DbPool, PoolConfig};
use roomboard::outbound::session_store::RedisSessionStore;
use roomboard::server::{build_state, AppConfig};

fn fail(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
///
/// Fails fast: missing configuration, an unreachable database or session
/// store, or a failed migration all abort before the server binds.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env().map_err(|err| fail("configuration", err))?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(|err| fail("database pool", err))?;
    pool.ping().await.map_err(|err| fail("database ping", err))?;

    let database_url = config.database_url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .map_err(|err| fail("migration task", err))?
        .map_err(|err| fail("migrations", err))?;

    let sessions = RedisSessionStore::connect(&config.redis_url)
        .await
        .map_err(|err| fail("session store", err))?;
    sessions
        .ping()
        .await
        .map_err(|err| fail("session store ping", err))?;

    let state = web::Data::new(build_state(pool, sessions));
    info!(addr = %config.server_addr, "starting server");

    HttpServer::new(move || {
        let app = App::new().app_data(state.clone()).configure(http::configure);
        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
        app
    })
    .bind(config.server_addr)?
    .run()
    .await
}
