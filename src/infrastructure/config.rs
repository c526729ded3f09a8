use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub logs_volume: LogsVolumeSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PolicySettings {
    /// Receiver of the policy served before anything was submitted.
    #[serde(default = "default_receiver")]
    pub receiver_id: String,
    #[serde(default)]
    pub group_by: Vec<String>,
    /// Labels always offered in the group-by selector.
    #[serde(default = "default_common_labels")]
    pub common_labels: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogsVolumeSettings {
    /// Upstream URL with `${from}` and `${to}` placeholders (epoch ms).
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    /// Filter used when RUST_LOG is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_receiver() -> String {
    "default-email".to_string()
}

fn default_common_labels() -> Vec<String> {
    vec![
        "grafana_folder".to_string(),
        "alertname".to_string(),
        "...".to_string(),
    ]
}

fn default_upstream_url() -> String {
    "http://localhost:3100/logs-volume?from=${from}&to=${to}".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            receiver_id: default_receiver(),
            group_by: Vec::new(),
            common_labels: default_common_labels(),
        }
    }
}

impl Default for LogsVolumeSettings {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Load `config/settings.*` (optional) overridden by `VOLUME_POLICY__*` env vars.
pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/settings").required(false))
        .add_source(
            config::Environment::with_prefix("VOLUME_POLICY")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a URL template
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_without_any_source() {
        let settings = parse("");
        assert_eq!(settings.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(settings.policy.receiver_id, "default-email");
        assert_eq!(settings.policy.common_labels.len(), 3);
        assert_eq!(settings.logs_volume.timeout_secs, 30);
        assert_eq!(settings.log.level, "info");
    }

    #[test]
    fn test_file_overrides() {
        let settings = parse(
            r#"
            [server]
            bind_addr = "127.0.0.1:9000"

            [policy]
            receiver_id = "pager"
            group_by = ["cluster"]

            [logs_volume]
            timeout_secs = 5
            "#,
        );
        assert_eq!(settings.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(settings.policy.receiver_id, "pager");
        assert_eq!(settings.policy.group_by, vec!["cluster"]);
        assert_eq!(settings.policy.common_labels[0], "grafana_folder");
        assert_eq!(settings.logs_volume.timeout_secs, 5);
    }

    #[test]
    fn test_prepare_query() {
        let mut vars = HashMap::new();
        vars.insert("from".to_string(), "1000".to_string());
        vars.insert("to".to_string(), "2000".to_string());

        let query = "http://loki/logs-volume?from=${from}&to=${to}";
        let result = prepare_query(query, &vars);

        assert_eq!(result, "http://loki/logs-volume?from=1000&to=2000");
    }

    #[test]
    fn test_prepare_query_encodes_values() {
        let mut vars = HashMap::new();
        vars.insert("query".to_string(), "{app=\"api\"}".to_string());
        let result = prepare_query("http://loki/q?expr=${query}", &vars);
        assert_eq!(result, "http://loki/q?expr=%7Bapp%3D%22api%22%7D");
    }
}
