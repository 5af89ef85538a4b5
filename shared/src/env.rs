use std::str::FromStr;

use log::warn;

/// Loads `.env` from the working directory, if there is one.
pub fn init() {
    let _ = dotenv::dotenv();
}

/// Reads `key` from the environment, falling back to `default` when it is
/// unset or does not parse.
pub fn var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Ignoring {}={:?}: cannot parse it", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
