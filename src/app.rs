use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::users;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .merge(users::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
