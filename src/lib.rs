//! An HTTP service serving the top-10 leaderboard of a quiz.
//!
//! `GET /leaderboard` returns the best scores, `POST /leaderboard` submits a new one.
//! See [`leaderboard`] for details.

use std::fmt::Write;
use std::future::Future;
use std::net::SocketAddr;

use anyhow::Context;
use axum::extract::connect_info::IntoMakeServiceWithConnectInfo;
use axum::extract::ConnectInfo;
use axum::{routing, Router};
use tokio::net::TcpListener;
use tokio::signal;

mod error;
pub use error::{Error, ErrorBody, Result};

mod config;
pub use config::Config;

mod state;
pub use state::State;

#[cfg(test)]
mod tests;

pub mod middleware;
pub mod openapi;
pub mod responses;

pub mod leaderboard;

#[allow(clippy::missing_docs_in_private_items)]
type Server = axum::serve::Serve<
	IntoMakeServiceWithConnectInfo<Router, SocketAddr>,
	axum::middleware::AddExtension<Router, ConnectInfo<SocketAddr>>,
>;

/// Run the service.
///
/// This function will not exit until a SIGINT signal is received.
/// If you want to supply a custom signal for graceful shutdown, use [`run_until()`] instead.
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
/// This function is the same as [`run()`], except that it also waits for the provided `until`
/// future, and shuts down the server when that future resolves.
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

/// Builds the full HTTP service for the given state.
///
/// Every response, including errors and panics, carries `Access-Control-Allow-Origin: *`.
pub fn app(state: &'static State) -> Router {
	Router::new()
		.merge(leaderboard::router(state))
		.route("/docs/openapi.json", routing::get(openapi::serve))
		.fallback(not_found)
		.layer(middleware::panic_handler::layer())
		.layer(middleware::logging::layer!())
		.layer(middleware::cors::permissive())
}

/// Runs the necessary setup for the service and returns a future that will run the server when
/// polled.
///
/// See [`run()`] and [`run_until()`].
async fn server(config: Config) -> anyhow::Result<Server> {
	tracing::debug!(addr = %config.addr, "establishing TCP connection");

	let tcp_listener = TcpListener::bind(config.addr)
		.await
		.context("bind tcp socket")?;

	let addr = tcp_listener.local_addr().context("get tcp addr")?;
	tracing::info!(%addr, prod = cfg!(feature = "production"), "listening for requests");

	let state = State::new(config).context("initialize state")?;
	let spec = openapi::Spec::new();
	let mut routes_message = String::from("registering routes:\n");

	for (path, methods) in spec.routes() {
		writeln!(&mut routes_message, "    • {path} => [{methods}]")?;
	}

	tracing::info!("{routes_message}");

	let service = app(state).into_make_service_with_connect_info::<SocketAddr>();

	Ok(axum::serve(tcp_listener, service))
}

/// Answers requests to unknown paths.
async fn not_found() -> Error {
	Error::not_found()
}

/// Waits for a SIGINT signal from the operating system.
#[tracing::instrument(name = "runtime::signals")]
async fn sigint() {
	let signal_result = signal::ctrl_c().await;

	if let Err(err) = signal_result {
		tracing::error!("failed to receive SIGINT: {err}");
	} else {
		tracing::warn!("received SIGINT; shutting down...");
	}
}
