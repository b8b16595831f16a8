//! Server runtime.
//!
//! [`ServerHandle`] owns the gateway lifecycle: adapter wiring (HTTP or
//! in-memory), metrics recorder, REST API listener and graceful shutdown.
//! The CLI binary is a thin wrapper around it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::BookingService;
use crate::config::{AppConfig, LoggingConfig};
use crate::domain::{AppResult, ReservationGateway, VillaCatalog};
use crate::infrastructure::memory::{demo_villas, DEMO_ADMIN_ID};
use crate::infrastructure::{
    HttpReservationGateway, HttpVillaCatalog, InMemoryReservationGateway, InMemoryVillaCatalog,
    ServiceClient,
};
use crate::interfaces::http::{create_api_router, ApiState};
use crate::shared::errors::InfraError;
use crate::shared::retry::RetryConfig;
use crate::shared::shutdown::{listen_for_shutdown_signals, shutdown_with_timeout, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    pub config: AppConfig,
    /// Serve seeded in-process data instead of calling the upstream services.
    pub in_memory: bool,
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running gateway.
///
/// ```rust,no_run
/// use villa_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.shutdown().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub booking: Arc<BookingService>,
    pub config: AppConfig,
    /// Address actually bound (differs from the config when port 0 is used)
    pub local_addr: SocketAddr,

    shutdown: ShutdownSignal,
    api_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Wire the adapters, bind the listener and start serving.
    pub async fn start(opts: ServerOptions) -> AppResult<Self> {
        let config = opts.config;
        info!("Starting villa booking gateway...");

        let metrics = prometheus_handle();

        let (booking, backend) = if opts.in_memory {
            (in_memory_booking_service(), "in_memory")
        } else {
            (upstream_booking_service(&config)?, "upstream")
        };
        let booking = Arc::new(booking);

        let router = create_api_router(ApiState::new(Arc::clone(&booking), backend), metrics);

        let listener = tokio::net::TcpListener::bind(config.address())
            .await
            .map_err(InfraError::from)?;
        let local_addr = listener.local_addr().map_err(InfraError::from)?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/swagger-ui/", local_addr);

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            booking,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM / SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    /// Wait for shutdown to be triggered, then for in-flight requests to
    /// drain, bounded by `server.shutdown_timeout`.
    pub async fn wait(self) {
        let timeout = Duration::from_secs(self.config.server.shutdown_timeout);
        let mut api_task = self.api_task;

        let drained = shutdown_with_timeout(&self.shutdown, timeout, async {
            if let Err(e) = (&mut api_task).await {
                error!("REST API task failed: {}", e);
            }
        })
        .await;

        if !drained {
            warn!("Aborting REST API with requests still in flight");
            api_task.abort();
        }
        info!("Villa booking gateway stopped");
    }

    pub async fn shutdown(self) {
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Wiring ─────────────────────────────────────────────────────────

fn upstream_booking_service(config: &AppConfig) -> AppResult<BookingService> {
    let services = &config.services;
    let retry = RetryConfig::with_attempts(services.retry_attempts);

    let villa_client = ServiceClient::new(
        "villa",
        services.villa_url.as_str(),
        services.request_timeout(),
        retry.clone(),
    )?;
    let reservation_client = ServiceClient::new(
        "reservation",
        services.reservation_url.as_str(),
        services.request_timeout(),
        retry,
    )?;
    info!(
        villa_url = %services.villa_url,
        reservation_url = %services.reservation_url,
        "Using upstream services"
    );

    let villas: Arc<dyn VillaCatalog> = Arc::new(HttpVillaCatalog::new(villa_client));
    let reservations: Arc<dyn ReservationGateway> =
        Arc::new(HttpReservationGateway::new(reservation_client));
    Ok(BookingService::new(villas, reservations))
}

fn in_memory_booking_service() -> BookingService {
    let catalog = Arc::new(InMemoryVillaCatalog::new(demo_villas()));
    catalog.grant_admin(DEMO_ADMIN_ID);
    let gateway = Arc::new(InMemoryReservationGateway::new(catalog.clone()));
    gateway.grant_admin(DEMO_ADMIN_ID);
    warn!("Serving in-memory demo data; nothing is persisted");
    BookingService::new(catalog, gateway)
}

/// The global recorder can only be installed once per process; later
/// starts (tests, restarts) reuse the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Metrics disabled, recorder could not be installed: {}", e);
                None
            }
        })
        .clone()
}

// ── Tracing ────────────────────────────────────────────────────────

/// Install the global tracing subscriber. `RUST_LOG` overrides `logging.level`.
///
/// Call once at process startup, before [`ServerHandle::start`].
pub fn init_tracing(logging: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

    // try_init: a subscriber may already be set by an embedding process
    let _ = match logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };
}
