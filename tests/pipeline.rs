mod common;

use common::{harness, is_timestamped_png, MockImage, MockText, PNG_PAYLOAD};
use promptcanvas::{app, Config, GenError, GeminiConfig, RunOutcome};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_timestamp_name_matcher() {
    assert!(is_timestamped_png("img_2024-03-09_120005.png"));
    assert!(!is_timestamped_png("img_2024-03-09_120005_1.png"));
    assert!(!is_timestamped_png("image_2024-03-09_120005.png"));
}

#[tokio::test]
async fn test_prompt_from_file_produces_one_image() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("prompt.txt"), "a cat\n").unwrap();
    let h = harness(
        dir.path(),
        MockText::replying("  A tabby cat, soft rim light  "),
        MockImage::returning(PNG_PAYLOAD),
    );

    let outcome = h.app.execute(None, false).await.unwrap();

    let paths = match outcome {
        RunOutcome::Generated(paths) => paths,
        other => panic!("expected generated image, got {:?}", other),
    };
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].parent(), Some(dir.path().join("out").as_path()));
    let name = paths[0].file_name().unwrap().to_str().unwrap();
    assert!(is_timestamped_png(name), "unexpected file name {}", name);
    assert_eq!(fs::read(&paths[0]).unwrap(), PNG_PAYLOAD);

    assert!(h.text.prompts.lock().unwrap()[0].ends_with("Input: a cat"));
    assert_eq!(
        *h.image.prompts.lock().unwrap(),
        vec!["A tabby cat, soft rim light".to_string()]
    );
}

#[tokio::test]
async fn test_cli_prompt_is_used_verbatim() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("prompt.txt"), "ignored").unwrap();
    let h = harness(
        dir.path(),
        MockText::replying("refined"),
        MockImage::returning(PNG_PAYLOAD),
    );

    h.app.execute(Some("a fox at dawn"), false).await.unwrap();
    assert!(h.text.prompts.lock().unwrap()[0].ends_with("Input: a fox at dawn"));
}

#[tokio::test]
async fn test_missing_prompt_file_is_created_and_nothing_generated() {
    let dir = tempdir().unwrap();
    let h = harness(
        dir.path(),
        MockText::replying("refined"),
        MockImage::returning(PNG_PAYLOAD),
    );

    let outcome = h.app.execute(None, false).await.unwrap();

    assert_eq!(outcome, RunOutcome::NoPrompt(dir.path().join("prompt.txt")));
    assert_eq!(fs::read_to_string(dir.path().join("prompt.txt")).unwrap(), "");
    assert_eq!(h.text.calls(), 0);
    assert_eq!(h.image.calls(), 0);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_empty_prompt_file_stops_before_remote_calls() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("prompt.txt"), "   \n").unwrap();
    let h = harness(
        dir.path(),
        MockText::replying("refined"),
        MockImage::returning(PNG_PAYLOAD),
    );

    let outcome = h.app.execute(None, false).await.unwrap();

    assert_eq!(outcome, RunOutcome::EmptyPrompt);
    assert_eq!(h.text.calls(), 0);
    assert_eq!(h.image.calls(), 0);
}

#[tokio::test]
async fn test_refinement_failure_short_circuits() {
    let dir = tempdir().unwrap();
    let h = harness(
        dir.path(),
        MockText::failing(),
        MockImage::returning(PNG_PAYLOAD),
    );

    let err = h.app.execute(Some("a cat"), false).await.unwrap_err();

    assert!(matches!(err, GenError::RefinementError(_)));
    assert!(err.is_fatal());
    assert_eq!(h.text.calls(), 1);
    assert_eq!(h.image.calls(), 0);
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_generation_failure_is_reported_not_raised() {
    let dir = tempdir().unwrap();
    let h = harness(dir.path(), MockText::replying("refined"), MockImage::failing());

    let outcome = h.app.execute(Some("a cat"), false).await.unwrap();

    assert!(matches!(outcome, RunOutcome::GenerationFailed(msg) if msg.contains("INVALID_ARGUMENT")));
    assert_eq!(h.image.calls(), 1);
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_list_models_touches_nothing_else() {
    let dir = tempdir().unwrap();
    let h = harness(
        dir.path(),
        MockText::replying("refined"),
        MockImage::returning(PNG_PAYLOAD),
    );

    let outcome = h.app.execute(Some("a cat"), true).await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Listed(vec![
            "models/gemini-2.0-flash".to_string(),
            "models/imagen-4.0-generate-001".to_string(),
        ])
    );
    assert_eq!(h.catalog.calls(), 1);
    assert_eq!(h.text.calls(), 0);
    assert_eq!(h.image.calls(), 0);
    assert!(!dir.path().join("prompt.txt").exists());
}

#[tokio::test]
async fn test_repeated_runs_never_overwrite() {
    let dir = tempdir().unwrap();
    let h = harness(
        dir.path(),
        MockText::replying("refined"),
        MockImage::returning(PNG_PAYLOAD),
    );

    let first = h.app.execute(Some("a cat"), false).await.unwrap();
    let second = h.app.execute(Some("a cat"), false).await.unwrap();

    let (RunOutcome::Generated(a), RunOutcome::Generated(b)) = (first, second) else {
        panic!("both runs should generate");
    };
    assert_ne!(a[0], b[0]);
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 2);
}

#[tokio::test]
async fn test_missing_credential_fails_before_any_work() {
    let dir = tempdir().unwrap();
    let prompt_file = dir.path().join("prompt.txt");
    let config = Config::new()
        .with_gemini(GeminiConfig::new())
        .with_prompt_file(&prompt_file)
        .with_output_dir(dir.path().join("out"));

    let err = app::run(config, None, false).await.unwrap_err();

    assert!(matches!(err, GenError::ConfigError(_)));
    assert!(!prompt_file.exists());
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_placeholder_credential_blocks_listing() {
    let config = Config::new().with_gemini(GeminiConfig::new().with_api_key("your_api_key_here"));
    let err = app::run(config, None, true).await.unwrap_err();
    assert!(matches!(err, GenError::ConfigError(msg) if msg.contains("placeholder")));
}
