//! Configuration for the requirement-processing pipeline.
//!
//! Mirrors `rigger_core::RiggerConfig`: a single struct aggregating the
//! database location, queue tuning, LLM provider registry settings, and
//! Git identity, loaded from environment variables. API keys are read
//! from environment variables named by each provider entry and are never
//! stored inline.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial PipelineConfig for environment-driven startup.

/// Supported LLM provider wire protocols.
///
/// # Examples
///
/// ```
/// use pipeline_core::config::Protocol;
///
/// assert_eq!(Protocol::OpenAiChat.to_string(), "openai-chat");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    /// OpenAI-compatible `/chat/completions` endpoint.
    OpenAiChat,
    /// Anthropic `/v1/messages` endpoint.
    AnthropicMessages,
    /// Google generative `generateContent` endpoint.
    GoogleGenerate,
    /// Local Ollama `/api/generate` endpoint.
    OllamaGenerate,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Protocol::OpenAiChat => "openai-chat",
            Protocol::AnthropicMessages => "anthropic-messages",
            Protocol::GoogleGenerate => "google-generate",
            Protocol::OllamaGenerate => "ollama-generate",
        };
        write!(f, "{}", s)
    }
}

/// Configuration for a single LLM provider registry entry.
///
/// Grounded on `rigger_core::config::provider::ProviderConfig`: connection
/// details plus an environment variable name for credential material, never
/// the credential itself.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ProviderEntryConfig {
    /// Provider identifier, e.g. "openai-primary".
    pub id: std::string::String,
    /// Wire protocol this provider speaks.
    pub protocol: Protocol,
    /// Base endpoint URL.
    pub endpoint: std::string::String,
    /// Environment variable holding the credential (API key / bearer token).
    /// `None` for providers that need no auth (local Ollama).
    pub credential_env: std::option::Option<std::string::String>,
    /// Default model identifier for this provider.
    pub default_model: std::string::String,
    /// Whether this provider is eligible for dispatch.
    pub enabled: bool,
}

impl ProviderEntryConfig {
    /// Resolves the credential from the environment, if one is configured.
    ///
    /// Returns `Ok(None)` both when no credential is required and when
    /// the sentinel value `"ollama"` is configured directly as the
    /// credential environment variable name: the openai-chat adapter
    /// omits the Authorization header entirely when the sentinel
    /// credential "ollama" is used.
    pub fn resolve_credential(&self) -> std::result::Result<std::option::Option<std::string::String>, crate::error::PipelineError> {
        match &self.credential_env {
            std::option::Option::None => std::result::Result::Ok(std::option::Option::None),
            std::option::Option::Some(var) if var == "ollama" => std::result::Result::Ok(std::option::Option::None),
            std::option::Option::Some(var) => match std::env::var(var) {
                std::result::Result::Ok(value) => std::result::Result::Ok(std::option::Option::Some(value)),
                std::result::Result::Err(_) => std::result::Result::Err(crate::error::PipelineError::config(
                    std::format!("missing credential environment variable {} for provider {}", var, self.id),
                )),
            },
        }
    }
}

/// LLM provider registry configuration: every configured backend plus the
/// fallback order and default provider identifier.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct ProviderRegistryConfig {
    /// All configured provider entries, keyed by provider id.
    pub providers: std::collections::HashMap<std::string::String, ProviderEntryConfig>,
    /// Ordered list of provider ids tried before any remaining enabled providers.
    pub fallback_order: std::vec::Vec<std::string::String>,
    /// Provider id used when a call does not specify one explicitly.
    pub default_provider: std::string::String,
}

/// Priority queue tuning.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct QueueConfig {
    /// Maximum number of jobs processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Total attempts per job, including the first (default 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Initial backoff delay in seconds; doubles per retry.
    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,
}

fn default_concurrency() -> usize {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_secs() -> u64 {
    5
}

impl std::default::Default for QueueConfig {
    fn default() -> Self {
        QueueConfig {
            concurrency: default_concurrency(),
            max_attempts: default_max_attempts(),
            initial_backoff_secs: default_initial_backoff_secs(),
        }
    }
}

/// Git identity used by the Committer when pushing generated artifacts.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct GitIdentityConfig {
    pub username: std::string::String,
    pub email: std::string::String,
    pub ssh_key_path: std::option::Option<std::string::String>,
}

/// Top-level pipeline configuration.
///
/// # Examples
///
/// ```no_run
/// use pipeline_core::PipelineConfig;
///
/// let config = PipelineConfig::from_env().unwrap();
/// assert!(config.queue.concurrency > 0);
/// ```
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct PipelineConfig {
    pub database_url: std::string::String,
    pub queue: QueueConfig,
    pub providers: ProviderRegistryConfig,
    pub git: GitIdentityConfig,
    /// When `true`, a task whose quality score fails the gate is failed
    /// before the Committer ever runs. Default is `false`: commit
    /// regardless of the verdict, recording it in `details.qualityPassed`.
    #[serde(default)]
    pub quality_gate_enabled: bool,
}

impl PipelineConfig {
    /// Loads configuration from environment variables.
    ///
    /// Recognized variables: `DATABASE_URL`, `MAX_CONCURRENT_TASKS`,
    /// `DEFAULT_LLM_PROVIDER`, `LLM_FALLBACK_ORDER` (comma-separated),
    /// `OLLAMA_API_URL`, `OLLAMA_MODELS` (comma-separated model names, one
    /// provider entry per model), `OPENAI_API_KEY`/`OPENAI_API_URL`,
    /// `ANTHROPIC_API_KEY`/`ANTHROPIC_API_URL`, `GOOGLE_API_KEY`/
    /// `GOOGLE_API_URL`, `GIT_USERNAME`, `GIT_EMAIL`, `GIT_SSH_KEY_PATH`,
    /// `QUALITY_GATE_ENABLED` (`"1"`/`"true"`, default off).
    pub fn from_env() -> std::result::Result<Self, crate::error::PipelineError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| crate::error::PipelineError::config("DATABASE_URL is required"))?;

        let concurrency = std::env::var("MAX_CONCURRENT_TASKS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or_else(default_concurrency);

        let mut providers: std::collections::HashMap<std::string::String, ProviderEntryConfig> = std::collections::HashMap::new();

        if let std::result::Result::Ok(ollama_url) = std::env::var("OLLAMA_API_URL") {
            let models = std::env::var("OLLAMA_MODELS").unwrap_or_else(|_| "llama3.1".to_string());
            for model in models.split(',').map(|m| m.trim()).filter(|m| !m.is_empty()) {
                let id = std::format!("ollama-{}", model);
                providers.insert(
                    id.clone(),
                    ProviderEntryConfig {
                        id,
                        protocol: Protocol::OllamaGenerate,
                        endpoint: ollama_url.clone(),
                        credential_env: std::option::Option::None,
                        default_model: model.to_string(),
                        enabled: true,
                    },
                );
            }
        }

        if let std::result::Result::Ok(api_key_env) = std::env::var("OPENAI_API_KEY_ENV") {
            let endpoint = std::env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
            let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
            providers.insert(
                "openai".to_string(),
                ProviderEntryConfig {
                    id: "openai".to_string(),
                    protocol: Protocol::OpenAiChat,
                    endpoint,
                    credential_env: std::option::Option::Some(api_key_env),
                    default_model: model,
                    enabled: true,
                },
            );
        }

        if let std::result::Result::Ok(api_key_env) = std::env::var("ANTHROPIC_API_KEY_ENV") {
            let endpoint = std::env::var("ANTHROPIC_API_URL").unwrap_or_else(|_| "https://api.anthropic.com".to_string());
            let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| "claude-3-5-sonnet-20241022".to_string());
            providers.insert(
                "anthropic".to_string(),
                ProviderEntryConfig {
                    id: "anthropic".to_string(),
                    protocol: Protocol::AnthropicMessages,
                    endpoint,
                    credential_env: std::option::Option::Some(api_key_env),
                    default_model: model,
                    enabled: true,
                },
            );
        }

        if let std::result::Result::Ok(api_key_env) = std::env::var("GOOGLE_API_KEY_ENV") {
            let endpoint = std::env::var("GOOGLE_API_URL").unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
            let model = std::env::var("GOOGLE_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
            providers.insert(
                "google".to_string(),
                ProviderEntryConfig {
                    id: "google".to_string(),
                    protocol: Protocol::GoogleGenerate,
                    endpoint,
                    credential_env: std::option::Option::Some(api_key_env),
                    default_model: model,
                    enabled: true,
                },
            );
        }

        let default_provider = std::env::var("DEFAULT_LLM_PROVIDER").unwrap_or_else(|_| {
            providers.keys().next().cloned().unwrap_or_else(|| "ollama".to_string())
        });

        let fallback_order = std::env::var("LLM_FALLBACK_ORDER")
            .ok()
            .map(|raw| raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_else(std::vec::Vec::new);

        let git = GitIdentityConfig {
            username: std::env::var("GIT_USERNAME").unwrap_or_else(|_| "requirement-pipeline".to_string()),
            email: std::env::var("GIT_EMAIL").unwrap_or_else(|_| "pipeline@example.com".to_string()),
            ssh_key_path: std::env::var("GIT_SSH_KEY_PATH").ok(),
        };

        let quality_gate_enabled = std::env::var("QUALITY_GATE_ENABLED")
            .ok()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        std::result::Result::Ok(PipelineConfig {
            database_url,
            queue: QueueConfig {
                concurrency,
                ..std::default::Default::default()
            },
            providers: ProviderRegistryConfig {
                providers,
                fallback_order,
                default_provider,
            },
            git,
            quality_gate_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "DATABASE_URL",
            "MAX_CONCURRENT_TASKS",
            "OLLAMA_API_URL",
            "OLLAMA_MODELS",
            "OPENAI_API_KEY_ENV",
            "ANTHROPIC_API_KEY_ENV",
            "GOOGLE_API_KEY_ENV",
            "DEFAULT_LLM_PROVIDER",
            "LLM_FALLBACK_ORDER",
            "GIT_USERNAME",
            "GIT_EMAIL",
            "GIT_SSH_KEY_PATH",
            "QUALITY_GATE_ENABLED",
        ] {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_from_env_quality_gate_defaults_disabled() {
        clear_env();
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite::memory:");
        }
        let config = PipelineConfig::from_env().unwrap();
        assert!(!config.quality_gate_enabled);
        clear_env();
    }

    #[test]
    fn test_from_env_quality_gate_enabled_via_env() {
        clear_env();
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite::memory:");
            std::env::set_var("QUALITY_GATE_ENABLED", "true");
        }
        let config = PipelineConfig::from_env().unwrap();
        assert!(config.quality_gate_enabled);
        clear_env();
    }

    #[test]
    fn test_from_env_requires_database_url() {
        clear_env();
        let result = PipelineConfig::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_env_builds_ollama_providers() {
        clear_env();
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite::memory:");
            std::env::set_var("OLLAMA_API_URL", "http://localhost:11434");
            std::env::set_var("OLLAMA_MODELS", "llama3.1,qwen2.5");
        }

        let config = PipelineConfig::from_env().unwrap();
        assert_eq!(config.providers.providers.len(), 2);
        assert!(config.providers.providers.contains_key("ollama-llama3.1"));
        assert!(config.providers.providers.contains_key("ollama-qwen2.5"));
        assert_eq!(config.queue.concurrency, 5);

        clear_env();
    }

    #[test]
    fn test_from_env_respects_concurrency_override() {
        clear_env();
        unsafe {
            std::env::set_var("DATABASE_URL", "sqlite::memory:");
            std::env::set_var("MAX_CONCURRENT_TASKS", "12");
        }

        let config = PipelineConfig::from_env().unwrap();
        assert_eq!(config.queue.concurrency, 12);

        clear_env();
    }

    #[test]
    fn test_resolve_credential_missing_env_is_config_error() {
        let entry = ProviderEntryConfig {
            id: "openai".to_string(),
            protocol: Protocol::OpenAiChat,
            endpoint: "https://api.openai.com/v1".to_string(),
            credential_env: std::option::Option::Some("DOES_NOT_EXIST_XYZ".to_string()),
            default_model: "gpt-4o-mini".to_string(),
            enabled: true,
        };

        let result = entry.resolve_credential();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().category(), crate::error::ErrorCategory::Config);
    }

    #[test]
    fn test_resolve_credential_no_env_needed_is_none() {
        let entry = ProviderEntryConfig {
            id: "ollama-llama3.1".to_string(),
            protocol: Protocol::OllamaGenerate,
            endpoint: "http://localhost:11434".to_string(),
            credential_env: std::option::Option::None,
            default_model: "llama3.1".to_string(),
            enabled: true,
        };

        let resolved = entry.resolve_credential().unwrap();
        assert!(resolved.is_none());
    }
}
