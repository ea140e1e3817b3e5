//! Configuration files for integration tests

use std::io::Write;

use flow_config::Config;
use tempfile::NamedTempFile;

/// Write `body` below an `[endpoint]` table pointing at `base_url` and load it
///
/// The returned file must outlive any re-read of the configuration.
pub fn load(base_url: &str, body: &str) -> (NamedTempFile, Config) {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        "[endpoint]\nbase_url = \"{base_url}\"\napi_key = \"sk-integration\"\ntimeout = \"5s\"\n\n{body}"
    )
    .expect("write config");

    let config = Config::load(file.path()).expect("valid config");
    (file, config)
}
