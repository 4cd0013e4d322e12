use crate::{
    config::Config,
    error::{GenError, Result},
    generator::ImageGenerator,
    logger,
    prompt::{PromptOrigin, PromptOutcome, PromptSource},
    refiner::PromptRefiner,
    services::GenClient,
    viewer::{NoopViewer, SystemViewer, Viewer},
};
use std::path::PathBuf;
use std::sync::Arc;

/// How a run ended without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Listed(Vec<String>),
    ListingFailed(String),
    NoPrompt(PathBuf),
    EmptyPrompt,
    Generated(Vec<PathBuf>),
    GenerationFailed(String),
}

pub struct App {
    client: GenClient,
    config: Config,
    viewer: Arc<dyn Viewer>,
}

impl App {
    pub fn new(client: GenClient, config: Config) -> Self {
        let viewer: Arc<dyn Viewer> = if config.open_viewer {
            Arc::new(SystemViewer)
        } else {
            Arc::new(NoopViewer)
        };

        Self {
            client,
            config,
            viewer,
        }
    }

    pub fn with_viewer(mut self, viewer: Arc<dyn Viewer>) -> Self {
        self.viewer = viewer;
        self
    }

    pub async fn execute(&self, prompt: Option<&str>, list_models: bool) -> Result<RunOutcome> {
        if list_models {
            return Ok(self.list_models().await);
        }
        self.run_pipeline(prompt).await
    }

    pub async fn list_models(&self) -> RunOutcome {
        println!("Fetching available models...");

        match self.client.catalog().list_models().await {
            Ok(models) => {
                for model in &models {
                    println!("- {}", model);
                }
                RunOutcome::Listed(models)
            }
            Err(e) => {
                println!("Error listing models: {}", e);
                RunOutcome::ListingFailed(e.to_string())
            }
        }
    }

    /// Prompt source, then refinement, then image generation. A refinement failure
    /// or an unreadable prompt file is returned as `Err`; everything else is a reported outcome.
    pub async fn run_pipeline(&self, cli_prompt: Option<&str>) -> Result<RunOutcome> {
        let source = PromptSource::new(&self.config.prompt_file);

        let raw = match source.obtain(cli_prompt)? {
            PromptOutcome::Ready(raw) => raw,
            PromptOutcome::Missing(path) => {
                println!("There is no prompt or {}", path.display());
                return Ok(RunOutcome::NoPrompt(path));
            }
            PromptOutcome::Empty => {
                println!("Error: Prompt is empty.");
                return Ok(RunOutcome::EmptyPrompt);
            }
        };

        if let PromptOrigin::File(path) = &raw.origin {
            println!("Reading prompt from {}...", path.display());
        }

        println!("Refining prompt: '{}'...", raw.text);
        let refiner = PromptRefiner::new(self.client.text(), self.config.text_model());
        let refined = {
            let _timer = logger::timer("prompt refinement");
            refiner.refine(&raw.text).await?
        };
        println!("Refined Prompt: {}\n", refined);

        println!(
            "Generating image with {} (this may take a moment)...",
            self.config.image_model()
        );
        let generator = ImageGenerator::new(self.client.image(), self.config.image_model())
            .with_viewer(self.viewer.clone());

        let result = {
            let _timer = logger::timer("image generation");
            generator.generate(&refined, &self.config.output_dir).await
        };

        match result {
            Ok(paths) => {
                for path in &paths {
                    println!("Image saved to: {}", path.display());
                }
                Ok(RunOutcome::Generated(paths))
            }
            Err(e @ GenError::GenerationError(_)) => {
                println!("Failed to generate image: {}", e);
                Ok(RunOutcome::GenerationFailed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// Validates configuration, connects the selected backend, and runs one invocation.
pub async fn run(config: Config, prompt: Option<&str>, list_models: bool) -> Result<RunOutcome> {
    let client = GenClient::connect(&config).await?;
    log::debug!(
        "Connected to {} (text: {}, image: {})",
        config.provider,
        config.text_model(),
        config.image_model()
    );
    App::new(client, config).execute(prompt, list_models).await
}

/// Process exit status for a finished invocation: 1 only for fatal errors
/// (bad configuration, failed refinement), 0 for every other outcome.
pub fn exit_status(result: &Result<RunOutcome>) -> u8 {
    match result {
        Err(e) if e.is_fatal() => 1,
        _ => 0,
    }
}

/// Text shown on stderr for an `Err` result.
pub fn report_error(e: &GenError) -> String {
    if e.is_fatal() {
        format!("Error: {}", e)
    } else {
        format!("Warning: {}", e)
    }
}
