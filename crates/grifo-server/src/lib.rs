pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: std::path::PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // State
        .route("/api/state", get(routes::state::get_state))
        // Obras
        .route("/api/obras", get(routes::obras::list_obras))
        .route("/api/obras", post(routes::obras::create_obra))
        .route("/api/obras/{slug}", get(routes::obras::get_obra))
        // Week plans + tasks + PCP
        .route("/api/obras/{slug}/weeks", get(routes::weeks::list_weeks))
        .route("/api/obras/{slug}/weeks", post(routes::weeks::create_week))
        .route(
            "/api/obras/{slug}/weeks/{week}",
            get(routes::weeks::get_week),
        )
        .route(
            "/api/obras/{slug}/weeks/{week}/tasks",
            post(routes::weeks::add_task),
        )
        .route(
            "/api/obras/{slug}/weeks/{week}/tasks/{id}/check",
            post(routes::weeks::check_task_day),
        )
        .route(
            "/api/obras/{slug}/weeks/{week}/pcp",
            get(routes::weeks::get_pcp),
        )
        .route(
            "/api/obras/{slug}/weeks/{week}/report",
            get(routes::weeks::get_weekly_report),
        )
        // Playbook
        .route(
            "/api/obras/{slug}/playbook",
            get(routes::playbook::get_playbook),
        )
        .route(
            "/api/obras/{slug}/playbook/import",
            post(routes::playbook::import_playbook),
        )
        .route(
            "/api/obras/{slug}/playbook/coefficient",
            put(routes::playbook::set_coefficient),
        )
        // Agenda + diary
        .route("/api/obras/{slug}/agenda", get(routes::agenda::list_events))
        .route("/api/obras/{slug}/agenda", post(routes::agenda::add_event))
        .route(
            "/api/obras/{slug}/agenda/{id}/done",
            post(routes::agenda::mark_done),
        )
        .route(
            "/api/obras/{slug}/diary/{date}",
            get(routes::agenda::get_diary),
        )
        // Partners
        .route("/api/partners", get(routes::partners::list_partners))
        .route("/api/partners", post(routes::partners::create_partner))
        .route(
            "/api/partners/{slug}/rate",
            post(routes::partners::rate_partner),
        )
        // Gamification
        .route("/api/ranking", get(routes::ranking::get_ranking))
        .route(
            "/api/obras/{slug}/weeks/{week}/award",
            post(routes::ranking::award_week),
        )
        // Init
        .route("/api/init", post(routes::init::init_project))
        .layer(cors)
        .with_state(app_state)
}

/// Start the GrifoBoard API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("GrifoBoard API listening on http://localhost:{port}");

    if open_browser {
        let url = format!("http://localhost:{port}/api/state");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the server on a pre-bound listener so the caller can read the
/// actual port first (useful when `port = 0` and the OS picks one).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("GrifoBoard API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/state");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
