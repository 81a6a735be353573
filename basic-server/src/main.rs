use std::{env, path, process::ExitCode, sync::Arc};

use pxp_meta_adapter_sqlite::MetaAdapterSqlite;

pub struct Config {
	pub db_dir: path::PathBuf,
	pub listen: String,
	pub session_cache_size: usize,
}

impl Config {
	fn from_env() -> Self {
		Config {
			db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
			session_cache_size: env::var("SESSION_CACHE_SIZE")
				.ok()
				.and_then(|s| s.parse().ok())
				.unwrap_or(1000),
		}
	}
}

#[tokio::main]
async fn main() -> ExitCode {
	let config = Config::from_env();
	let mut builder = pxp::AppBuilder::new();

	let meta_adapter = match MetaAdapterSqlite::new(&config.db_dir).await {
		Ok(adapter) => Arc::new(adapter),
		Err(err) => {
			tracing::error!("FATAL: Cannot open database in {}: {}", config.db_dir.display(), err);
			return ExitCode::FAILURE;
		}
	};

	builder
		.listen(config.listen)
		.session_cache_size(config.session_cache_size)
		.meta_adapter(meta_adapter);

	match builder.run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			tracing::error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
