use crate::config::{Config, ProviderKind};
use clap::Parser;
use std::path::PathBuf;

/// Refine a short prompt with an LLM, render it with an image model, and open the result.
#[derive(Parser, Debug)]
#[command(name = "promptcanvas", version, about, long_about = None)]
pub struct Cli {
    /// The text description for the image. Falls back to the prompt file when omitted.
    pub prompt: Option<String>,

    /// List available models and exit.
    #[arg(long)]
    pub list_models: bool,

    /// Backend to use (gemini or bedrock).
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Model used to refine the prompt.
    #[arg(long)]
    pub text_model: Option<String>,

    /// Model used to render the image.
    #[arg(long)]
    pub image_model: Option<String>,

    /// Directory for generated images.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// File read when no prompt argument is given; created empty if missing.
    #[arg(long, default_value = "prompt.txt")]
    pub prompt_file: PathBuf,

    /// Do not open the saved image in the default viewer.
    #[arg(long)]
    pub no_open: bool,

    /// Print debug logs to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit log lines as JSON objects.
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Layers command-line flags over an environment-derived config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(provider) = self.provider {
            config = config.with_provider(provider);
        }
        if let Some(model) = &self.text_model {
            config = config.with_text_model(model.clone());
        }
        if let Some(model) = &self.image_model {
            config = config.with_image_model(model.clone());
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir.clone());
        }
        config
            .with_prompt_file(self.prompt_file.clone())
            .with_viewer(!self.no_open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_prompt() {
        let cli = Cli::try_parse_from(["promptcanvas", "a cat on a roof"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("a cat on a roof"));
        assert!(!cli.list_models);
        assert!(!cli.json_logs);
        assert_eq!(cli.prompt_file, PathBuf::from("prompt.txt"));
    }

    #[test]
    fn test_list_models_flag() {
        let cli = Cli::try_parse_from(["promptcanvas", "--list-models"]).unwrap();
        assert!(cli.list_models);
        assert!(cli.prompt.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "promptcanvas",
            "--provider",
            "bedrock",
            "--image-model",
            "amazon.titan-image-generator-v2:0",
            "-o",
            "out",
            "--no-open",
            "a fox",
        ])
        .unwrap();

        let config = cli.apply(Config::new().with_output_dir("generated_images"));
        assert_eq!(config.provider, ProviderKind::Bedrock);
        assert_eq!(config.image_model(), "amazon.titan-image-generator-v2:0");
        assert_eq!(config.text_model(), "amazon.titan-text-express-v1");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.open_viewer);
    }

    #[test]
    fn test_log_flags() {
        let cli = Cli::try_parse_from(["promptcanvas", "-v", "--json-logs"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
    }

    #[test]
    fn test_bad_provider_rejected() {
        assert!(Cli::try_parse_from(["promptcanvas", "--provider", "dalle"]).is_err());
    }
}
