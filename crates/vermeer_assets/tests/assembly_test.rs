//! Part assembly through the full pipeline with mocked collaborators.

mod test_utils;

use test_utils::{Harness, ip, png_bytes};
use vermeer_assets::{CompressionConfig, PipelineConfig};
use vermeer_cache::{AssetCache, CacheValue, bytes_key};
use vermeer_core::{Part, RequestContext};

#[tokio::test]
async fn test_public_reference_is_fetched_cached_and_inlined() {
    let h = Harness::default();
    let png = png_bytes();
    h.serve_public("host", "https://host/img.png", png.clone());
    let ctx = RequestContext::new();

    let part = h
        .pipeline
        .prepare_asset_part(&ctx, "https://host/img.png")
        .await
        .expect("part");

    assert_eq!(
        part,
        Part::InlineImage {
            mime_type: "image/png".to_string(),
            data: png.clone(),
        }
    );
    assert_eq!(
        h.cache.get(&bytes_key("https://host/img.png")).await,
        Some(CacheValue::Bytes(png))
    );
    assert_eq!(h.http.calls(), 1);

    // Served from cache without another fetch or resolution.
    let again = h
        .pipeline
        .prepare_asset_part(&ctx, "https://host/img.png")
        .await;
    assert!(matches!(again, Some(Part::InlineImage { .. })));
    assert_eq!(h.http.calls(), 1);
    assert_eq!(h.resolver.calls(), 1);
}

#[tokio::test]
async fn test_loopback_reference_is_dropped_without_cache_write() {
    let h = Harness::default();
    h.http.serve("http://127.0.0.1/x.png", png_bytes());
    let ctx = RequestContext::new();

    let part = h
        .pipeline
        .prepare_asset_part(&ctx, "http://127.0.0.1/x.png")
        .await;

    assert!(part.is_none());
    assert_eq!(h.http.calls(), 0);
    assert!(h.cache.is_empty().await);
}

#[tokio::test]
async fn test_rebinding_host_with_one_private_address_is_dropped() {
    let h = Harness::default();
    h.resolver
        .add("rebind.example", vec![ip("93.184.216.34"), ip("10.0.0.7")]);
    h.http.serve("https://rebind.example/a.png", png_bytes());
    let ctx = RequestContext::new();

    assert!(
        h.pipeline
            .prepare_asset_part(&ctx, "https://rebind.example/a.png")
            .await
            .is_none()
    );
    assert_eq!(h.http.calls(), 0);
}

#[tokio::test]
async fn test_disallowed_scheme_and_unresolvable_host_are_dropped() {
    let h = Harness::default();
    let ctx = RequestContext::new();

    assert!(h.pipeline.prepare_asset_part(&ctx, "file:///etc/passwd").await.is_none());
    assert!(h.pipeline.prepare_asset_part(&ctx, "ftp://host/a.png").await.is_none());
    assert!(
        h.pipeline
            .prepare_asset_part(&ctx, "https://nowhere.invalid/a.png")
            .await
            .is_none()
    );
    assert!(h.pipeline.prepare_asset_part(&ctx, "not a url").await.is_none());
    assert_eq!(h.http.calls(), 0);
}

#[tokio::test]
async fn test_non_image_bytes_never_become_inline_parts() {
    let h = Harness::default();
    h.serve_public("host", "https://host/page.png", b"<html>hi</html>".to_vec());
    let ctx = RequestContext::new();

    assert!(
        h.pipeline
            .prepare_asset_part(&ctx, "https://host/page.png")
            .await
            .is_none()
    );
    assert!(h.cache.is_empty().await);
}

#[tokio::test]
async fn test_cached_non_image_bytes_are_not_inlined() {
    let h = Harness::default();
    h.cache
        .set(
            &bytes_key("https://host/poisoned"),
            CacheValue::Bytes(b"plain text".to_vec()),
            std::time::Duration::from_secs(60),
        )
        .await;
    let ctx = RequestContext::new();

    assert!(
        h.pipeline
            .prepare_asset_part(&ctx, "https://host/poisoned")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_one_unreachable_reference_yields_n_minus_one_parts() {
    let h = Harness::default();
    h.serve_public("a.example", "https://a.example/1.png", png_bytes());
    h.serve_public("b.example", "https://b.example/2.png", png_bytes());
    h.resolver.add("c.example", vec![ip("93.184.216.35")]);
    let ctx = RequestContext::new();

    let uris = [
        "https://a.example/1.png",
        "https://c.example/missing.png",
        "https://b.example/2.png",
    ];
    let parts = h.pipeline.assemble_parts(&ctx, "draw this", &uris).await;

    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], Part::Text("draw this".to_string()));
    assert!(parts[1..].iter().all(Part::is_image));
}

#[tokio::test]
async fn test_blank_references_are_skipped() {
    let h = Harness::default();
    let ctx = RequestContext::new();

    let parts = h
        .pipeline
        .assemble_parts(&ctx, "prompt", &["", "   ", "\t"])
        .await;

    assert_eq!(parts, vec![Part::Text("prompt".to_string())]);
    assert_eq!(h.resolver.calls(), 0);
}

#[tokio::test]
async fn test_object_storage_reference_skips_network_validation() {
    let h = Harness::default();
    let png = png_bytes();
    h.storage.put("gs://bucket/char.png", png.clone());
    let ctx = RequestContext::new();

    let part = h
        .pipeline
        .prepare_asset_part(&ctx, "gs://bucket/char.png")
        .await;

    assert_eq!(
        part,
        Some(Part::InlineImage {
            mime_type: "image/png".to_string(),
            data: png,
        })
    );
    assert_eq!(h.resolver.calls(), 0);
    assert_eq!(h.http.calls(), 0);
}

#[tokio::test]
async fn test_missing_storage_object_is_dropped() {
    let h = Harness::default();
    let ctx = RequestContext::new();

    assert!(
        h.pipeline
            .prepare_asset_part(&ctx, "gs://bucket/absent.png")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn test_compression_converts_to_jpeg() {
    let config = PipelineConfig::default().with_compression(CompressionConfig::enabled_with_quality(60));
    let h = Harness::new(config);
    h.serve_public("host", "https://host/img.png", png_bytes());
    let ctx = RequestContext::new();

    match h.pipeline.prepare_asset_part(&ctx, "https://host/img.png").await {
        Some(Part::InlineImage { mime_type, data }) => {
            assert_eq!(mime_type, "image/jpeg");
            assert_eq!(&data[..2], &[0xFF, 0xD8]);
        }
        other => panic!("expected inline image, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancelled_context_drops_reference() {
    let h = Harness::default();
    h.serve_public("host", "https://host/img.png", png_bytes());
    let (ctx, handle) = RequestContext::new().cancellable();
    handle.cancel();

    let parts = h
        .pipeline
        .assemble_parts(&ctx, "prompt", &["https://host/img.png"])
        .await;

    assert_eq!(parts.len(), 1);
    assert_eq!(h.http.calls(), 0);
}

#[tokio::test]
async fn test_registered_handle_takes_priority() {
    let h = Harness::default();
    h.serve_public("host", "https://host/img.png", png_bytes());
    let ctx = RequestContext::new();

    let uri = h
        .pipeline
        .register_asset(&ctx, "https://host/img.png")
        .await
        .unwrap();
    let fetches = h.http.calls();

    let part = h
        .pipeline
        .prepare_asset_part(&ctx, "https://host/img.png")
        .await;

    assert_eq!(
        part,
        Some(Part::RemoteHandle {
            uri,
            mime_type: Some("image/png".to_string()),
        })
    );
    assert_eq!(h.http.calls(), fetches);
}
