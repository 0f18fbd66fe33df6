use crate::cli::ServeArgs;
use crate::infra::{
    seeded_profiles, AppState, InMemoryIdentityProvider, InMemoryProfileStore, LoggingClaimSetter,
    RedirectGateway, SeededDirectory,
};
use crate::routes::with_marketplace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use skillbridge::accounts::ProvisioningService;
use skillbridge::config::AppConfig;
use skillbridge::error::AppError;
use skillbridge::telemetry;
use skillbridge::workflows::registration::{PaymentGateway, RegistrationState};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let identity = Arc::new(InMemoryIdentityProvider::default());
    let store = Arc::new(InMemoryProfileStore::default());
    let claims = Arc::new(LoggingClaimSetter);
    let service = Arc::new(ProvisioningService::new(identity, store, claims, None));

    let gateway: Option<Arc<dyn PaymentGateway>> =
        match (&config.payment.provider_url, &config.payment.merchant_id) {
            (Some(provider_url), Some(merchant_id)) => {
                info!(%provider_url, "payment provider configured");
                Some(Arc::new(RedirectGateway::new(
                    provider_url.clone(),
                    merchant_id.clone(),
                )))
            }
            _ => {
                info!("no payment provider configured, using mock confirmations");
                None
            }
        };

    let registration = RegistrationState {
        service,
        gateway,
        return_url: config.payment.return_url.clone(),
    };
    let directory = Arc::new(SeededDirectory::new(seeded_profiles()));

    let app = with_marketplace_routes(registration, directory)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "skills marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
