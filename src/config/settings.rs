use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    /// Upper bound for a single store call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "convokeep.duckdb".to_string(),
            timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    /// The deployed frontend. Empty disables it, leaving only the dev origin.
    pub frontend_origin: String,
    pub dev_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_origin: "${FRONTEND_URL}".to_string(),
            dev_origin: "http://localhost:5173".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GroqConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout_ms: u64,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            api_key: "${GROQ_API_KEY}".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            timeout_ms: 30_000,
            temperature: 0.3,
            max_tokens: 512,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GoogleConfig {
    pub client_id: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: "${GOOGLE_CLIENT_ID}".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub groq: GroqConfig,
    pub google: GoogleConfig,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CONVOKEEP").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;
        app_config.expand_placeholders();

        Ok(app_config)
    }

    /// Replaces `${VAR}` values with the environment's value (empty when unset).
    pub fn expand_placeholders(&mut self) {
        self.server.host = expand_env(&self.server.host);
        self.database.path = expand_env(&self.database.path);
        self.cors.frontend_origin = expand_env(&self.cors.frontend_origin);
        self.cors.dev_origin = expand_env(&self.cors.dev_origin);
        self.groq.api_key = expand_env(&self.groq.api_key);
        self.google.client_id = expand_env(&self.google.client_id);
    }
}

fn expand_env(val: &str) -> String {
    match val.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        Some(var_name) => std::env::var(var_name).unwrap_or_default(),
        None => val.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_only_whole_placeholders() {
        std::env::set_var("CK_TEST_PLACEHOLDER", "secret");
        assert_eq!(expand_env("${CK_TEST_PLACEHOLDER}"), "secret");
        assert_eq!(expand_env("${CK_TEST_UNSET_VAR}"), "");
        assert_eq!(expand_env("plain-${value}"), "plain-${value}");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does-not-exist-anywhere").unwrap();
        assert_eq!(config.groq.max_tokens, 512);
        assert_eq!(config.groq.model, "llama-3.3-70b-versatile");
        assert_eq!(config.cors.dev_origin, "http://localhost:5173");
    }
}
