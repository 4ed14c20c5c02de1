use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "consultorio";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name printed on report headers.
pub const CLINIC_NAME: &str = "Centro Psicológico Bienestar";

/// Currency symbol for Peruvian soles.
pub const CURRENCY_SYMBOL: &str = "S/";

/// Backend REST API root used when neither `--api-url` nor the environment
/// provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Environment variable read for the backend URL.
pub const API_URL_ENV: &str = "CONSULTORIO_API_URL";

/// Backend requests give up after this long.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "consultorio=debug,warn" } else { "warn" }
}
