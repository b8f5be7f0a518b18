//! HTTP server setup and demo handlers.
//!
//! # Responsibilities
//! - Create Axum Router with the demo handlers
//! - Wire up middleware (tracing, correlation)
//! - Bind server to listener and shut down on Ctrl+C

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::middleware::{correlation_middleware, CorrelationState};
use crate::logging::{Fault, LoggerService};

const SUMMARIES: [&str; 10] = [
    "Freezing", "Bracing", "Chilly", "Cool", "Mild", "Warm", "Balmy", "Hot", "Sweltering", "Scorching",
];

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub logger: Arc<dyn LoggerService>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherForecast {
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub temperature_f: i32,
    pub summary: String,
}

impl WeatherForecast {
    fn random(date: NaiveDate, rng: &mut impl Rng) -> Self {
        let temperature_c = rng.gen_range(-20..55);
        Self {
            date,
            temperature_c,
            temperature_f: 32 + (f64::from(temperature_c) / 0.5556) as i32,
            summary: SUMMARIES[rng.gen_range(0..SUMMARIES.len())].to_string(),
        }
    }
}

/// HTTP server for the demo service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(
        config: &AppConfig,
        logger: Arc<dyn LoggerService>,
    ) -> Result<Self, axum::http::header::InvalidHeaderName> {
        let correlation = Arc::new(CorrelationState::from_config(config)?);
        let router = build_router(AppState { logger }, correlation);
        Ok(Self { router })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState, correlation: Arc<CorrelationState>) -> Router {
    Router::new()
        .route("/weatherforecast", get(weather_forecast))
        .route("/weatherforecast/failure", get(weather_forecast_failure))
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn_with_state(correlation, correlation_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn weather_forecast(State(state): State<AppState>) -> Response {
    let scope = match state.logger.scope("Get", "test") {
        Ok(scope) => scope,
        Err(e) => {
            tracing::error!(error = %e, "Cannot open logging scope");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let today = Utc::now().date_naive();
    let mut rng = rand::thread_rng();
    let forecasts: Vec<WeatherForecast> = (1..=5)
        .map(|offset| {
            let date = today.checked_add_days(Days::new(offset)).unwrap_or(today);
            WeatherForecast::random(date, &mut rng)
        })
        .collect();

    scope.log_info(&format!("Returning {} forecasts", forecasts.len()));
    scope.finish();

    Json(forecasts).into_response()
}

async fn weather_forecast_failure(State(state): State<AppState>) -> Response {
    let failure = Fault::composite(
        "AggregateException",
        "One or more stations failed to report.",
        vec![
            Fault::new("TimeoutException", "Station north did not answer in 30 s"),
            Fault::new("InvalidDataException", "Station south sent a malformed reading")
                .caused_by(Fault::new("FormatException", "'--' is not a number")),
        ],
    );
    state
        .logger
        .log_exception_with_message("Forecast refresh failed.", Some(&failure), "GetFailure");

    (StatusCode::INTERNAL_SERVER_ERROR, "Forecast refresh failed").into_response()
}

async fn health() -> &'static str {
    "OK"
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_fahrenheit() {
        let mut rng = rand::thread_rng();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for _ in 0..50 {
            let forecast = WeatherForecast::random(date, &mut rng);
            assert!((-20..55).contains(&forecast.temperature_c));
            assert_eq!(forecast.temperature_f, 32 + (f64::from(forecast.temperature_c) / 0.5556) as i32);
            assert!(SUMMARIES.contains(&forecast.summary.as_str()));
        }
    }
}
