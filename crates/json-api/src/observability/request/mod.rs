//! Request logging middleware with request ids and optional parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();
    let names = spans::request_span_name(&method, &path);
    let otel_path = names.otel_path;
    let otel_span_name = names.otel_span_name;
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    if settings::otel_parent_propagation_enabled()
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    metrics::observe_request(&method, &otel_path, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        log_outcome(&Outcome {
            method: &method,
            path: &path,
            request_id: &request_id,
            status: status.as_u16(),
            duration_ms,
            threshold_ms,
        });
    });
}

#[derive(Debug)]
struct Outcome<'a> {
    method: &'a str,
    path: &'a str,
    request_id: &'a str,
    status: u16,
    duration_ms: u128,
    threshold_ms: u128,
}

impl Outcome<'_> {
    fn is_slow(&self) -> bool {
        self.duration_ms > self.threshold_ms
    }
}

fn log_outcome(outcome: &Outcome<'_>) {
    let Outcome {
        method,
        path,
        request_id,
        status,
        duration_ms,
        threshold_ms,
    } = *outcome;

    info!(status, duration_ms, "request.completed");

    match status {
        500..=599 => error!(status, method, path, request_id, "server error response"),
        400..=499 => warn!(status, method, path, request_id, "client error response"),
        _ => {}
    }

    if outcome.is_slow() {
        warn!(
            method,
            path,
            request_id,
            duration_ms,
            threshold_ms,
            "slow request detected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(duration_ms: u128) -> Outcome<'static> {
        Outcome {
            method: "POST",
            path: "/orders",
            request_id: "req-1",
            status: 201,
            duration_ms,
            threshold_ms: 1_000,
        }
    }

    #[test]
    fn requests_over_the_threshold_are_slow() {
        assert!(outcome(1_001).is_slow());
        assert!(!outcome(1_000).is_slow());
        assert!(!outcome(12).is_slow());
    }
}
