/*
 * Responsibility
 * - Config 読み込み → 依存生成 (PgPool / repos / verifier / resolver) → Router 組み立て
 * - Middleware の適用 (access / CORS / security headers / http)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Context;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::repos::{PgOrganizationRepo, PgPrincipalRepo, PgShopRepo};
use crate::services::{auth::build_token_verifier, id_codec::IdCodec};
use crate::state::AppState;
use crate::tenancy::{AccessEnforcer, RoleCatalog, TenantResolver};

fn init_tracing() {
    // RUST_LOG=info,payments_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development は即落として気づけるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load config")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {} (tenant header: {})",
        config.app_env,
        config.addr,
        config.tenant_header
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("migrations applied");
    }

    let auth = build_token_verifier(config)?;
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)?;

    // ロール定義はプロセス起動時に 1 度だけ組み立て、以後は読み取り専用
    let catalog = Arc::new(RoleCatalog::builtin());
    let tenants = TenantResolver::new(Arc::new(PgOrganizationRepo::new(pool.clone())), catalog);

    Ok(AppState {
        auth,
        principals: Arc::new(PgPrincipalRepo::new(pool.clone())),
        tenants,
        enforcer: AccessEnforcer::default(),
        shops: Arc::new(PgShopRepo::new(pool)),
        id_codec,
        tenant_header: config.tenant_header.clone(),
    })
}

/// Router 全体 (v1 + 横断 middleware)。テストからも使う
pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    // 外側ほど先に動く: http (request id / trace / limit / timeout) → CORS → security headers
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
