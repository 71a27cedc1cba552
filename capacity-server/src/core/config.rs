/// Server configuration.
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | Runtime environment |
/// | LOG_LEVEL | info | Max tracing level |
/// | LOG_DIR | (stdout) | Daily-rolling log file directory |
/// | GOOGLE_AI_API_KEY | (empty) | Gemini API key for floor-plan analysis |
/// | GEMINI_MODEL | gemini-2.5-flash | Vision model name |
/// | VISION_TIMEOUT_MS | 30000 | Vision request timeout |
/// | USE_MOCK_DATA | false | Return canned analysis without calling the API |
/// | MOCK_ERROR | (unset) | `quota` simulates a quota-exhausted failure |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API listen port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Max tracing level
    pub log_level: String,
    /// Log file directory; stdout when unset
    pub log_dir: Option<String>,
    /// Gemini API key
    pub google_ai_api_key: String,
    /// Vision model name
    pub gemini_model: String,
    /// Vision request timeout (milliseconds)
    pub vision_timeout_ms: u64,
    /// Skip the vision API and return sample data
    pub use_mock_analysis: bool,
    /// Simulated upstream failure mode (currently only "quota")
    pub mock_analysis_error: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            google_ai_api_key: std::env::var("GOOGLE_AI_API_KEY").unwrap_or_default(),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".into()),
            vision_timeout_ms: std::env::var("VISION_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            use_mock_analysis: std::env::var("USE_MOCK_DATA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            mock_analysis_error: std::env::var("MOCK_ERROR").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
