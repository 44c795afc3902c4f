use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use prometheus::{Encoder, Registry, TextEncoder};
use std::sync::Arc;

/// Start the metrics HTTP server
/// This should be called in a separate thread/runtime to avoid conflicts
pub async fn start_metrics_server(registry: Arc<Registry>, port: u16) -> std::io::Result<()> {
    tracing::info!("📊 Starting metrics server on http://0.0.0.0:{}/metrics", port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(registry.clone()))
            .route("/metrics", web::get().to(metrics_handler))
            .route("/health", web::get().to(health_handler))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

async fn metrics_handler(registry: web::Data<Arc<Registry>>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

/// Sum of every series in the named counter family.
fn counter_total(registry: &Registry, name: &str) -> u64 {
    registry
        .gather()
        .iter()
        .filter(|family| family.name() == name)
        .flat_map(|family| family.metric.iter())
        .filter_map(|metric| metric.counter.value)
        .sum::<f64>() as u64
}

async fn health_handler(registry: web::Data<Arc<Registry>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "activity-comments",
        "commands": {
            "dispatched": counter_total(&registry, "commands_dispatched_total"),
            "failed": counter_total(&registry, "commands_failed_total"),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use actix_web::test;

    #[actix_web::test]
    async fn metrics_endpoint_exposes_command_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.record_command("CreateComment", None, 0.01);
        let registry = Arc::new(metrics.registry().clone());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(registry))
                .route("/metrics", web::get().to(metrics_handler)),
        )
        .await;

        let body = test::call_and_read_body(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("commands_dispatched_total{command=\"CreateComment\"} 1"));
    }

    #[actix_web::test]
    async fn health_reports_command_totals() {
        let metrics = Metrics::new().unwrap();
        metrics.record_command("CreateComment", None, 0.01);
        metrics.record_command("CreateComment", Some("not_found"), 0.01);
        metrics.record_command("CreateActivity", Some("validation"), 0.01);
        let registry = Arc::new(metrics.registry().clone());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(registry))
                .route("/health", web::get().to(health_handler)),
        )
        .await;

        let body: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(body["service"], "activity-comments");
        assert_eq!(body["commands"]["dispatched"], 3);
        assert_eq!(body["commands"]["failed"], 2);
    }
}
