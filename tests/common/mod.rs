#![allow(dead_code)]

use async_trait::async_trait;
use promptcanvas::{
    App, Config, GenClient, GenError, GeneratedImage, ImageGenerationRequest, ImageService,
    ModelCatalog, NoopViewer, Result, TextGenerationRequest, TextService,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PNG_PAYLOAD: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRmock";

#[derive(Default)]
pub struct MockText {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl MockText {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextService for MockText {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt);
        self.reply
            .clone()
            .ok_or_else(|| GenError::RequestError("500 Internal Server Error".into()))
    }
}

#[derive(Default)]
pub struct MockImage {
    payload: Option<Vec<u8>>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl MockImage {
    pub fn returning(payload: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            payload: Some(payload.to_vec()),
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageService for MockImage {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt);
        match &self.payload {
            Some(bytes) => Ok(vec![GeneratedImage::png(bytes.clone())]),
            None => Err(GenError::RequestError("400 - INVALID_ARGUMENT".into())),
        }
    }
}

#[derive(Default)]
pub struct MockCatalog {
    pub calls: AtomicUsize,
}

impl MockCatalog {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelCatalog for MockCatalog {
    async fn list_models(&self) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            "models/gemini-2.0-flash".to_string(),
            "models/imagen-4.0-generate-001".to_string(),
        ])
    }
}

pub struct Harness {
    pub text: Arc<MockText>,
    pub image: Arc<MockImage>,
    pub catalog: Arc<MockCatalog>,
    pub app: App,
}

pub fn harness(root: &Path, text: Arc<MockText>, image: Arc<MockImage>) -> Harness {
    let catalog = Arc::new(MockCatalog::default());
    let client = GenClient::from_parts(text.clone(), image.clone(), catalog.clone());
    let config = Config::new()
        .with_output_dir(root.join("out"))
        .with_prompt_file(root.join("prompt.txt"))
        .with_viewer(false);
    let app = App::new(client, config).with_viewer(Arc::new(NoopViewer));

    Harness {
        text,
        image,
        catalog,
        app,
    }
}

/// Matches `img_DDDD-DD-DD_DDDDDD.png`.
pub fn is_timestamped_png(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix("img_")
        .and_then(|rest| rest.strip_suffix(".png"))
    else {
        return false;
    };
    let shape = "dddd-dd-dd_dddddd";
    stamp.len() == shape.len()
        && stamp.chars().zip(shape.chars()).all(|(c, s)| match s {
            'd' => c.is_ascii_digit(),
            other => c == other,
        })
}
