//! Module containing the [`Config`] struct, the service's configuration.

use std::env;
use std::error::Error as StdError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::Context;
use derive_more::Debug;
use url::Url;

/// Default IP address to listen on if `LEADERBOARD_IP` is not set.
const DEFAULT_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default port to listen on if `LEADERBOARD_PORT` is not set.
const DEFAULT_PORT: u16 = 8080;

/// Configuration values for the service.
///
/// These are read from the environment once on startup, and never change afterwards.
#[derive(Debug, Clone)]
pub struct Config {
	/// The ip address and port the service is going to listen on.
	#[debug("{addr}")]
	pub addr: SocketAddr,

	/// The database URL that leaderboard entries are stored in.
	///
	/// If this is `None`, the service still starts, but every request that needs the database
	/// is answered with a configuration error.
	#[debug("{}", database_url.as_ref().map(redacted).unwrap_or_else(|| String::from("<unset>")))]
	pub database_url: Option<Url>,
}

impl Config {
	/// Creates a new [`Config`] object by reading from the environment.
	pub fn new() -> anyhow::Result<Self> {
		let ip_addr = parse_from_env_opt("LEADERBOARD_IP")?.unwrap_or(DEFAULT_IP);
		let port = parse_from_env_opt("LEADERBOARD_PORT")?.unwrap_or(DEFAULT_PORT);
		let addr = SocketAddr::new(ip_addr, port);
		let database_url = parse_from_env_opt("DATABASE_URL")?;

		Ok(Self { addr, database_url })
	}
}

/// Renders a database URL without its credentials.
fn redacted(url: &Url) -> String {
	struct Redacted<'a>(&'a Url);

	impl fmt::Display for Redacted<'_> {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			write!(f, "{}://", self.0.scheme())?;

			if let Some(host) = self.0.host_str() {
				write!(f, "{host}")?;
			}

			if let Some(port) = self.0.port() {
				write!(f, ":{port}")?;
			}

			write!(f, "{}", self.0.path())
		}
	}

	Redacted(url).to_string()
}

/// Parses an environment variable into an `Option<T>`, returning `None` if the variable is not
/// set or empty.
fn parse_from_env_opt<T>(var: &str) -> anyhow::Result<Option<T>>
where
	T: FromStr,
	T::Err: StdError + Send + Sync + 'static,
{
	let Some(value) = env::var(var).ok() else {
		return Ok(None);
	};

	if value.is_empty() {
		return Ok(None);
	}

	<T as FromStr>::from_str(&value)
		.map(Some)
		.with_context(|| format!("failed to parse `{var}`"))
}
