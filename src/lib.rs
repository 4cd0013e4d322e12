//! Two-stage prompt-to-image pipeline: a text model expands a short prompt,
//! an image model renders it, and the result is written under a local directory.

pub mod app;
#[cfg(feature = "bedrock")]
pub mod bedrock;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod generator;
pub mod logger;
pub mod models;
pub mod prompt;
pub mod refiner;
pub mod services;
pub mod viewer;

pub use app::{App, RunOutcome};
pub use config::{BedrockConfig, Config, GeminiConfig, ProviderKind};
pub use error::{GenError, Result};
pub use generator::ImageGenerator;
pub use models::*;
pub use prompt::{PromptOrigin, PromptOutcome, PromptSource, RawPrompt};
pub use refiner::PromptRefiner;
pub use services::{GenClient, ImageService, ModelCatalog, TextService};
pub use viewer::{NoopViewer, SystemViewer, Viewer};
