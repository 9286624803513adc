// src/server.rs

use serde::Serialize;
use std::{convert::Infallible, sync::Arc, time::Instant};
use tracing::{error, info, warn};
use warp::{
    http::StatusCode,
    reply::{Reply, Response},
    Filter, Rejection,
};

use crate::report::Reporter;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

fn with_reporter(
    reporter: Arc<Reporter>,
) -> impl Filter<Extract = (Arc<Reporter>,), Error = Infallible> + Clone {
    warp::any().map(move || reporter.clone())
}

/// `GET /` landing page, `GET /health`, `GET /chart/{metric}`.
pub fn routes(
    reporter: Arc<Reporter>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let page = landing_page(&reporter);
    let index = warp::path::end()
        .and(warp::get())
        .map(move || warp::reply::html(page.clone()).into_response());

    let health = warp::path("health").and(warp::path::end()).and(warp::get()).map(|| {
        warp::reply::json(&serde_json::json!({
            "status": "healthy",
            "service": "covidcurves"
        }))
        .into_response()
    });

    let chart = warp::path!("chart" / String)
        .and(warp::get())
        .and(with_reporter(reporter))
        .and_then(chart_handler);

    index.or(health).unify().or(chart).unify()
}

async fn chart_handler(metric: String, reporter: Arc<Reporter>) -> Result<Response, Rejection> {
    if reporter.config().metric(&metric).is_none() {
        warn!(%metric, "unknown metric requested");
        return Ok(error_reply(
            StatusCode::NOT_FOUND,
            format!("unknown metric {:?}", metric),
            None,
        ));
    }

    let start = Instant::now();
    match reporter.chart(&metric).await {
        Ok(view) => {
            info!(%metric, elapsed = ?start.elapsed(), "chart served");
            Ok(warp::reply::json(&view).into_response())
        }
        Err(e) => {
            error!(%metric, error = %e, "chart failed");
            Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not build chart".into(),
                Some(e.to_string()),
            ))
        }
    }
}

fn error_reply(status: StatusCode, error: String, details: Option<String>) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorResponse { error, details }), status)
        .into_response()
}

fn landing_page(reporter: &Reporter) -> String {
    let charts: String = reporter
        .config()
        .metrics
        .iter()
        .map(|m| {
            format!(
                "\t\t\t<li><a href=\"/chart/{name}\">{name}</a> (from {cutoff} cases)</li>\n",
                name = m.name,
                cutoff = m.cutoff
            )
        })
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n\t<head>\n\t\t<title>COVID-19</title>\n\t</head>\n\t<body>\n\t\t<ul id=\"content\">\n{}\t\t</ul>\n\t</body>\n</html>\n",
        charts
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn reporter() -> Arc<Reporter> {
        Arc::new(Reporter::new(Config::default()).unwrap())
    }

    #[tokio::test]
    async fn test_landing_page_lists_metrics() {
        let res = warp::test::request()
            .method("GET")
            .path("/")
            .reply(&routes(reporter()))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = String::from_utf8_lossy(res.body()).to_string();
        assert!(body.contains("/chart/confirmed"));
        assert!(body.contains("/chart/deaths"));
    }

    #[tokio::test]
    async fn test_health() {
        let res = warp::test::request()
            .path("/health")
            .reply(&routes(reporter()))
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_metric_is_not_found() {
        let res = warp::test::request()
            .path("/chart/recovered")
            .reply(&routes(reporter()))
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
