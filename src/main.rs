use std::net::SocketAddr;
use std::sync::OnceLock;

use anyhow::Context;
use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum_server::tls_rustls::RustlsConfig;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;

mod assignment;
mod availability;
mod config;
mod database;
mod endpoints;
mod grouping;
mod model;
mod progress;
mod question;

const OK_JSON: &str = r#"{ "message": "OK" }"#;

/// Upload-time window used when grouping resources, set once from configuration.
static GROUPING_WINDOW: OnceLock<chrono::Duration> = OnceLock::new();

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Begin logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level()?)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("could not install the log subscriber")?;

    // The frontend is served from elsewhere, so allow any origin to read and post JSON
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(AllowOrigin::any())
        .expose_headers([CONTENT_TYPE]);

    let app = router().layer(cors);

    database::init_database(&config.database).await?;
    info!("Database initialized");

    install_grouping_window(config.grouping_window());

    let addr = config
        .server
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;

    match (&config.server.tls_cert, &config.server.tls_key) {
        (Some(cert), Some(key)) => {
            let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
            let tls = RustlsConfig::from_pem_file(cert, key)
                .await
                .context("could not load TLS certificate")?;
            info!("Listening on https://{addr}");
            axum_server::bind_rustls(addr, tls)
                .serve(app.into_make_service())
                .await?;
        }
        _ => {
            info!("Listening on http://{addr}");
            axum_server::bind(addr).serve(app.into_make_service()).await?;
        }
    }

    Ok(())
}

/// Stores the grouping window. Only the first call wins.
fn install_grouping_window(window: chrono::Duration) -> bool {
    if GROUPING_WINDOW.set(window).is_err() {
        warn!("Grouping window was already set, ignoring {}s", window.num_seconds());
        return false;
    }
    true
}

fn router() -> Router {
    Router::new()
        .route("/api/health", get(endpoints::health))
        .route(
            "/api/courses/{course_id}/resources",
            get(endpoints::resources::list_course_resources),
        )
        .route(
            "/api/courses/{course_id}/assignments",
            post(endpoints::instructor::add_assignment),
        )
        .route(
            "/api/organizations/{organization_id}/students/{student_id}/assignments",
            get(endpoints::student::get_visible_assignments),
        )
        .route(
            "/api/students/{student_id}/progress",
            post(endpoints::progress::record_progress),
        )
        .route(
            "/api/students/{student_id}/progress/weekly",
            get(endpoints::progress::get_weekly_progress),
        )
        .route(
            "/api/students/{student_id}/progress/summary",
            get(endpoints::progress::get_progress_summary),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_window_is_set_once() {
        assert!(install_grouping_window(chrono::Duration::minutes(10)));
        assert!(!install_grouping_window(chrono::Duration::minutes(1)));
        assert_eq!(GROUPING_WINDOW.get(), Some(&chrono::Duration::minutes(10)));
    }
}
