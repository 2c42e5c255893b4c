use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the API listens on, e.g. "127.0.0.1:3000".
    pub listen_addr: String,
    /// Shared secret every request must present in the `authorization`
    /// header. Overridable via the `STREAMGATE_API_TOKEN` environment
    /// variable so the secret can stay out of the file.
    pub api_token: String,
    /// Directory holding one rendered `<name>.conf` fragment per stream.
    /// Must be included by the nginx main config inside a `stream` block.
    pub streams_dir: String,
    #[serde(default)]
    pub nginx: NginxConfig,
}

/// How to drive the nginx daemon. The argument vectors are configurable so
/// a non-default main config can be passed (`test_args: ["-t", "-c", ...]`).
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NginxConfig {
    pub binary: String,
    pub test_args: Vec<String>,
    pub reload_args: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for NginxConfig {
    fn default() -> Self {
        Self {
            binary: "nginx".to_string(),
            test_args: vec!["-t".to_string()],
            reload_args: vec!["-s".to_string(), "reload".to_string()],
            timeout_secs: 10,
        }
    }
}
