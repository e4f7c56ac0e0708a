use vermeer_core::{GenerateOptionsBuilder, Part, RemoteAssetStore, RemoteGenerator};
use vermeer_models::{GeminiClient, GeminiConfig};

fn client() -> GeminiClient {
    let _ = dotenvy::dotenv();
    GeminiClient::from_env(&GeminiConfig::default()).expect("GEMINI_API_KEY must be set for API tests")
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_generates_an_image() -> anyhow::Result<()> {
    let config = GeminiConfig::default();
    let options = GenerateOptionsBuilder::default()
        .aspect_ratio("1:1")
        .seed(7)
        .build()?;

    let response = client()
        .generate(
            config.model(),
            &[Part::Text("A single red apple on a white table".to_string())],
            &options,
        )
        .await?;

    let raw = response.raw.expect("raw payload");
    assert!(!raw.candidates.is_empty());
    println!("Finish reason: {:?}", raw.candidates[0].finish_reason);
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
async fn test_gemini_upload_and_delete() -> anyhow::Result<()> {
    // 1x1 transparent GIF
    let gif = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";
    let client = client();

    let file = client.upload(gif, "image/gif", "pixel.gif").await?;
    assert!(file.name.starts_with("files/"));
    println!("Uploaded: {}", file.uri);

    client.delete(&file.name).await?;
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_is_reported() {
    let config = GeminiConfig::default().with_api_key_env("VERMEER_TEST_UNSET_KEY".to_string());
    let err = GeminiClient::from_env(&config).unwrap_err();
    assert!(err.to_string().contains("VERMEER_TEST_UNSET_KEY"));
}
