//! Single reqwest-based adapter dispatching on `Protocol` to the exact wire
//! shape each LLM backend expects.
//!
//! Grounded on `transcript_processor::adapters::mistral_adapter`'s single
//! struct wrapping one `reqwest::Client`, a JSON-builder request, and a
//! `serde_json::Value` walk to pull the response text back out. That file
//! only covered the OpenAI-compatible shape; this adapter extends the same
//! pattern to Anthropic, Google, and Ollama's native shapes behind one
//! dispatch routine instead of one adapter struct per protocol.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial HttpLlmProtocolAdapter covering all four wire protocols.

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_ANTHROPIC_MAX_TOKENS: u32 = 4096;

#[derive(hexser::HexAdapter)]
pub struct HttpLlmProtocolAdapter {
    http: reqwest::Client,
}

impl HttpLlmProtocolAdapter {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }

    async fn call_openai_chat(
        &self,
        entry: &pipeline_core::config::ProviderEntryConfig,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
        let url = std::format!("{}/chat/completions", entry.endpoint.trim_end_matches('/'));
        let mut messages = std::vec::Vec::new();
        if let std::option::Option::Some(sys) = system {
            messages.push(serde_json::json!({"role": "system", "content": sys}));
        }
        messages.push(serde_json::json!({"role": "user", "content": prompt}));

        let mut body = serde_json::json!({
            "model": entry.default_model,
            "messages": messages,
            "temperature": options.temperature,
        });
        if let std::option::Option::Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        let credential = entry.resolve_credential()?;
        let mut request = self.http.post(&url).json(&body);
        if let std::option::Option::Some(key) = credential {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("transport error: {}", e)))?;
        if !response.status().is_success() {
            return std::result::Result::Err(pipeline_core::PipelineError::provider_retryable(
                entry.id.clone(),
                std::format!("HTTP status {}", response.status()),
            ));
        }
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("failed to decode response body: {}", e)))?;

        payload
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| pipeline_core::PipelineError::provider_parse(entry.id.clone(), "missing choices[0].message.content"))
    }

    async fn call_anthropic_messages(
        &self,
        entry: &pipeline_core::config::ProviderEntryConfig,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
        let url = std::format!("{}/v1/messages", entry.endpoint.trim_end_matches('/'));
        let mut body = serde_json::json!({
            "model": entry.default_model,
            "max_tokens": options.max_tokens.unwrap_or(DEFAULT_ANTHROPIC_MAX_TOKENS),
            "temperature": options.temperature,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let std::option::Option::Some(sys) = system {
            body["system"] = serde_json::json!(sys);
        }

        let credential = entry.resolve_credential()?;
        let mut request = self.http.post(&url).header("anthropic-version", ANTHROPIC_VERSION).json(&body);
        if let std::option::Option::Some(key) = credential {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("transport error: {}", e)))?;
        if !response.status().is_success() {
            return std::result::Result::Err(pipeline_core::PipelineError::provider_retryable(
                entry.id.clone(),
                std::format!("HTTP status {}", response.status()),
            ));
        }
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("failed to decode response body: {}", e)))?;

        payload
            .get("content")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| pipeline_core::PipelineError::provider_parse(entry.id.clone(), "missing content[0].text"))
    }

    async fn call_google_generate(
        &self,
        entry: &pipeline_core::config::ProviderEntryConfig,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
        let credential = entry.resolve_credential()?.ok_or_else(|| {
            pipeline_core::PipelineError::config(std::format!("provider {} requires an API key", entry.id))
        })?;
        let url = std::format!(
            "{}/models/{}:generateContent?key={}",
            entry.endpoint.trim_end_matches('/'),
            entry.default_model,
            credential,
        );

        let full_prompt = match system {
            std::option::Option::Some(sys) => std::format!("{}\n\n{}", sys, prompt),
            std::option::Option::None => prompt.to_string(),
        };
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": full_prompt}]}],
            "generationConfig": {
                "temperature": options.temperature,
                "maxOutputTokens": options.max_tokens,
            },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("transport error: {}", e)))?;
        if !response.status().is_success() {
            return std::result::Result::Err(pipeline_core::PipelineError::provider_retryable(
                entry.id.clone(),
                std::format!("HTTP status {}", response.status()),
            ));
        }
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("failed to decode response body: {}", e)))?;

        payload
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| pipeline_core::PipelineError::provider_parse(entry.id.clone(), "missing candidates[0].content.parts[0].text"))
    }

    async fn call_ollama_generate(
        &self,
        entry: &pipeline_core::config::ProviderEntryConfig,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
        let url = std::format!("{}/api/generate", entry.endpoint.trim_end_matches('/'));
        let full_prompt = match system {
            std::option::Option::Some(sys) => std::format!("{}\n\n{}", sys, prompt),
            std::option::Option::None => prompt.to_string(),
        };
        let num_predict = options.max_tokens.map(|n| n as i64).unwrap_or(-1);
        let body = serde_json::json!({
            "model": entry.default_model,
            "prompt": full_prompt,
            "stream": false,
            "options": {
                "temperature": options.temperature,
                "num_predict": num_predict,
            },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("transport error: {}", e)))?;
        if !response.status().is_success() {
            return std::result::Result::Err(pipeline_core::PipelineError::provider_retryable(
                entry.id.clone(),
                std::format!("HTTP status {}", response.status()),
            ));
        }
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| pipeline_core::PipelineError::provider_retryable(entry.id.clone(), std::format!("failed to decode response body: {}", e)))?;

        payload
            .get("response")
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| pipeline_core::PipelineError::provider_parse(entry.id.clone(), "missing response field"))
    }
}

impl std::default::Default for HttpLlmProtocolAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::ports::llm_protocol_adapter_port::LlmProtocolAdapterPort for HttpLlmProtocolAdapter {
    async fn call(
        &self,
        entry: &pipeline_core::config::ProviderEntryConfig,
        prompt: &str,
        system: std::option::Option<&str>,
        options: &crate::domain::call_options::CallOptions,
    ) -> std::result::Result<std::string::String, pipeline_core::PipelineError> {
        match entry.protocol {
            pipeline_core::config::Protocol::OpenAiChat => self.call_openai_chat(entry, prompt, system, options).await,
            pipeline_core::config::Protocol::AnthropicMessages => self.call_anthropic_messages(entry, prompt, system, options).await,
            pipeline_core::config::Protocol::GoogleGenerate => self.call_google_generate(entry, prompt, system, options).await,
            pipeline_core::config::Protocol::OllamaGenerate => self.call_ollama_generate(entry, prompt, system, options).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_protocol_adapter_port::LlmProtocolAdapterPort;

    fn entry(protocol: pipeline_core::config::Protocol, endpoint: &str) -> pipeline_core::config::ProviderEntryConfig {
        pipeline_core::config::ProviderEntryConfig {
            id: "test-provider".to_string(),
            protocol,
            endpoint: endpoint.to_string(),
            credential_env: std::option::Option::None,
            default_model: "test-model".to_string(),
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_openai_chat_parses_content_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"hello from openai"}}]}"#)
            .create_async()
            .await;

        let adapter = HttpLlmProtocolAdapter::new();
        let e = entry(pipeline_core::config::Protocol::OpenAiChat, &server.url());
        let result = adapter
            .call(&e, "hi", std::option::Option::None, &crate::domain::call_options::CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result, "hello from openai");
    }

    #[tokio::test]
    async fn test_openai_chat_non_2xx_is_retryable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/chat/completions").with_status(503).create_async().await;

        let adapter = HttpLlmProtocolAdapter::new();
        let e = entry(pipeline_core::config::Protocol::OpenAiChat, &server.url());
        let result = adapter
            .call(&e, "hi", std::option::Option::None, &crate::domain::call_options::CallOptions::default())
            .await;
        let err = result.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_openai_chat_missing_content_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let adapter = HttpLlmProtocolAdapter::new();
        let e = entry(pipeline_core::config::Protocol::OpenAiChat, &server.url());
        let result = adapter
            .call(&e, "hi", std::option::Option::None, &crate::domain::call_options::CallOptions::default())
            .await;
        let err = result.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_anthropic_messages_parses_text_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[{"type":"text","text":"hello from claude"}]}"#)
            .create_async()
            .await;

        let adapter = HttpLlmProtocolAdapter::new();
        let e = entry(pipeline_core::config::Protocol::AnthropicMessages, &server.url());
        let result = adapter
            .call(&e, "hi", std::option::Option::Some("be terse"), &crate::domain::call_options::CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result, "hello from claude");
    }

    #[tokio::test]
    async fn test_google_generate_parses_nested_parts_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Regex(r"^/models/.*:generateContent".to_string()))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"hello from gemini"}]}}]}"#)
            .create_async()
            .await;

        let mut e = entry(pipeline_core::config::Protocol::GoogleGenerate, &server.url());
        e.credential_env = std::option::Option::Some("TEST_GOOGLE_KEY_LLM_REGISTRY".to_string());
        unsafe {
            std::env::set_var("TEST_GOOGLE_KEY_LLM_REGISTRY", "fake-key");
        }

        let adapter = HttpLlmProtocolAdapter::new();
        let result = adapter
            .call(&e, "hi", std::option::Option::None, &crate::domain::call_options::CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result, "hello from gemini");

        unsafe {
            std::env::remove_var("TEST_GOOGLE_KEY_LLM_REGISTRY");
        }
    }

    #[tokio::test]
    async fn test_ollama_generate_parses_response_field() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"hello from ollama","done":true}"#)
            .create_async()
            .await;

        let adapter = HttpLlmProtocolAdapter::new();
        let e = entry(pipeline_core::config::Protocol::OllamaGenerate, &server.url());
        let result = adapter
            .call(&e, "hi", std::option::Option::None, &crate::domain::call_options::CallOptions::default())
            .await
            .unwrap();
        assert_eq!(result, "hello from ollama");
    }
}
