use anyhow::{bail, Context, Result};

/// Which completion backend to talk to. Chosen once at startup; the rest of
/// the pipeline only ever sees the `CompletionBackend` trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiMode {
    /// Local Ollama-style endpoint, no credentials needed.
    Local,
    /// Hosted OpenAI-style chat-completions API.
    Hosted,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub ai_mode: AiMode,
    pub ollama_url: String,
    pub ollama_model: String,
    /// Only required when `ai_mode` is `Hosted`.
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let ai_mode = parse_ai_mode(&optional("AI_MODE", "local"))?;

        // Hosted mode is unusable without a key, so fail at boot rather than
        // on the first chat request.
        let openai_api_key = match ai_mode {
            AiMode::Hosted => required("OPENAI_API_KEY")?,
            AiMode::Local => optional("OPENAI_API_KEY", ""),
        };

        Ok(Self {
            database_url: optional("DATABASE_URL", "sqlite:floatchat.db?mode=rwc"),
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            ai_mode,
            ollama_url: optional("OLLAMA_URL", "http://localhost:11434"),
            ollama_model: optional("OLLAMA_MODEL", "llama3.2"),
            openai_api_key,
            openai_model: optional("OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: optional("OPENAI_BASE_URL", "https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_owned(),
        })
    }
}

pub fn parse_ai_mode(raw: &str) -> Result<AiMode> {
    match raw.to_ascii_lowercase().as_str() {
        "local" => Ok(AiMode::Local),
        "hosted" => Ok(AiMode::Hosted),
        other => bail!("unknown AI_MODE '{other}' (expected 'local' or 'hosted')"),
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
