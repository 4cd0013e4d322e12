use crate::error::{GenError, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_OUTPUT_DIR: &str = "generated_images";
pub const DEFAULT_PROMPT_FILE: &str = "prompt.txt";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";

const GEMINI_KEY_PLACEHOLDER: &str = "your_api_key_here";
const AWS_KEY_PLACEHOLDERS: &[&str] = &["your_access_key_here", "your_secret_key_here"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Gemini,
    Bedrock,
}

impl ProviderKind {
    pub fn default_text_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Bedrock => "amazon.titan-text-express-v1",
        }
    }

    pub fn default_image_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "imagen-4.0-generate-001",
            ProviderKind::Bedrock => "amazon.titan-image-generator-v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Bedrock => write!(f, "bedrock"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "bedrock" | "aws" => Ok(ProviderKind::Bedrock),
            other => Err(format!(
                "unknown provider '{}', expected 'gemini' or 'bedrock'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn validate(&self) -> Result<()> {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => Err(GenError::ConfigError(
                "GEMINI_API_KEY not found in environment variables. Please check your .env file."
                    .into(),
            )),
            Some(GEMINI_KEY_PLACEHOLDER) => Err(GenError::ConfigError(
                "You are using the default placeholder API key. Please update your .env file with a valid API key."
                    .into(),
            )),
            Some(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_BEDROCK_REGION)
    }

    // Neither key set means the default AWS credential chain is used.
    fn validate(&self) -> Result<()> {
        let access = self.access_key.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let secret = self.secret_key.as_deref().map(str::trim).filter(|s| !s.is_empty());

        match (access, secret) {
            (None, None) => Ok(()),
            (Some(a), Some(s)) => {
                if AWS_KEY_PLACEHOLDERS.contains(&a) || AWS_KEY_PLACEHOLDERS.contains(&s) {
                    Err(GenError::ConfigError(
                        "You are using a placeholder AWS credential. Please update your .env file."
                            .into(),
                    ))
                } else {
                    Ok(())
                }
            }
            _ => Err(GenError::ConfigError(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".into(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub gemini: GeminiConfig,
    pub bedrock: BedrockConfig,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub output_dir: PathBuf,
    pub prompt_file: PathBuf,
    pub open_viewer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderKind::default(),
            gemini: GeminiConfig::default(),
            bedrock: BedrockConfig::default(),
            text_model: None,
            image_model: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prompt_file: PathBuf::from(DEFAULT_PROMPT_FILE),
            open_viewer: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match non_empty("PROMPTCANVAS_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>().map_err(GenError::ConfigError)?,
            None => ProviderKind::default(),
        };

        let gemini = GeminiConfig {
            api_key: lookup("GEMINI_API_KEY"),
            base_url: non_empty("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        };

        let bedrock = BedrockConfig {
            region: non_empty("AWS_REGION").or_else(|| non_empty("AWS_DEFAULT_REGION")),
            access_key: lookup("AWS_ACCESS_KEY_ID"),
            secret_key: lookup("AWS_SECRET_ACCESS_KEY"),
        };

        Ok(Config {
            provider,
            gemini,
            bedrock,
            text_model: non_empty("PROMPTCANVAS_TEXT_MODEL"),
            image_model: non_empty("PROMPTCANVAS_IMAGE_MODEL"),
            output_dir: non_empty("PROMPTCANVAS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            prompt_file: PathBuf::from(DEFAULT_PROMPT_FILE),
            open_viewer: true,
        })
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_file = path.into();
        self
    }

    pub fn with_viewer(mut self, enabled: bool) -> Self {
        self.open_viewer = enabled;
        self
    }

    pub fn text_model(&self) -> &str {
        self.text_model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_text_model())
    }

    pub fn image_model(&self) -> &str {
        self.image_model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_image_model())
    }

    /// Checks the credential of the selected provider. Must pass before any remote call.
    pub fn validate(&self) -> Result<()> {
        match self.provider {
            ProviderKind::Gemini => self.gemini.validate(),
            ProviderKind::Bedrock => self.bedrock.validate(),
        }
    }
}
