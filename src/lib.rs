#![doc = include_str!("../README.md")]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::extract::ConnectInfo;
use axum::{routing, Router};
use tokio::net::TcpListener;
use tokio::signal;

mod error;
pub use error::{Error, Result};

mod config;
pub use config::Config;

mod state;
pub use state::State;

pub mod allowlist;
pub mod cors;
pub mod fonts;
pub mod middleware;
pub mod origin;
pub mod pages;
pub mod settings;

#[allow(clippy::missing_docs_in_private_items)]
type Server = axum::serve::Serve<
	IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
	axum::middleware::AddExtension<Router, ConnectInfo<SocketAddr>>,
>;

/// Run the service.
///
/// This function will not exit until a SIGINT signal is received.
/// If you want to supply a custom signal for graceful shutdown, use
/// [`run_until()`] instead.
pub async fn run(config: Config) -> anyhow::Result<()> {
	server(config)
		.await
		.context("build http server")?
		.with_graceful_shutdown(sigint())
		.await
		.context("run http server")
}

/// Run the service until a given future completes.
///
/// This function is the same as [`run()`], except that it also waits for
/// the provided `until` future, and shuts down the server when that future
/// resolves.
pub async fn run_until<Until>(config: Config, until: Until) -> anyhow::Result<()>
where
	Until: Future<Output = ()> + Send + 'static,
{
	server(config)
		.await
		.context("build http server")?
		.with_graceful_shutdown(async move {
			tokio::select! {
				() = until => {}
				() = sigint() => {}
			}
		})
		.await
		.context("run http server")
}

/// Runs the necessary setup and returns a future that will run the server
/// when polled.
///
/// See [`run()`] and [`run_until()`].
async fn server(config: Config) -> anyhow::Result<Server> {
	tracing::debug!(addr = %config.addr, "establishing TCP connection");

	let tcp_listener = TcpListener::bind(config.addr)
		.await
		.context("bind tcp socket")?;

	let addr = tcp_listener.local_addr().context("get tcp addr")?;

	tracing::info!(%addr, prod = cfg!(feature = "production"), "listening for requests");

	let state = State::new(config);
	let service = router(state).into_make_service_with_connect_info::<SocketAddr>();

	Ok(axum::serve(tcp_listener, service))
}

/// Builds the service's router and middleware chain.
///
/// The layer order is part of the contract: panics are caught outermost,
/// requests are logged, `OPTIONS` requests terminate at the preflight
/// gate, and the header policy decorates everything the gate lets
/// through.
pub fn router(state: Arc<State>) -> Router {
	Router::new()
		.route("/", routing::get(pages::serve))
		.fallback(pages::serve)
		.with_state(Arc::clone(&state))
		.nest("/settings", settings::router(Arc::clone(&state)))
		.layer(middleware::headers::layer(Arc::clone(&state)))
		.layer(middleware::preflight::layer(state))
		.layer(middleware::logging::layer!())
		.layer(middleware::panic_handler::layer())
}

/// Waits for a SIGINT signal from the operating system.
async fn sigint() {
	let signal_result = signal::ctrl_c().await;

	if let Err(err) = signal_result {
		tracing::error!(target: "multidomain::audit_log", "failed to receive SIGINT: {err}");
	} else {
		tracing::warn!(target: "multidomain::audit_log", "received SIGINT; shutting down...");
	}
}
