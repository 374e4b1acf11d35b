use std::error::Error as StdError;

use multidomain::Config;
use tracing::{info, warn};

mod logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError>> {
	if let Err(error) = dotenvy::dotenv() {
		eprintln!("Failed to load `.env` file: {error}");
	}

	let config = Config::new()?;
	let _guard = logging::init()?;

	info!("initialized multi-domain service");

	if cfg!(not(feature = "production")) {
		warn!("running in development mode");
	}

	multidomain::run(config).await?;

	Ok(())
}
