//! HTTP surface: one route per ingress path.

mod base64_json;
mod multipart;
mod reference;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use thumbnail_core::{Config, Thumbnailer};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::ingress::http_client;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub thumbnailer: Thumbnailer,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> reqwest::Result<Self> {
        let client = http_client(&config.limits)?;
        Ok(Self {
            thumbnailer: Thumbnailer::new(config),
            client,
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.thumbnailer.config().limits.max_upload_bytes();
    with_middleware(routes(), body_limit).with_state(state)
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/multipart", post(multipart::upload))
        .route("/base64", post(base64_json::upload))
        .route("/reference", get(reference::fetch))
        .route("/health", get(health))
        .fallback(redirect_trailing_slash)
}

/// Body cap, panic recovery and request tracing, innermost first.
fn with_middleware(routes: Router<AppState>, body_limit: usize) -> Router<AppState> {
    routes
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

/// Redirect `/path/` to `/path`; anything else unmatched is a 404.
///
/// GET uses 301. Other methods get 307 so clients resend the body.
async fn redirect_trailing_slash(method: Method, uri: Uri) -> Response {
    let path = uri.path();
    if path.len() <= 1 || !path.ends_with('/') {
        return StatusCode::NOT_FOUND.into_response();
    }

    // Collapse leading slashes too, or `//host/` would become an off-site redirect.
    let mut location = format!("/{}", path.trim_matches('/'));
    if let Some(query) = uri.query() {
        location.push('?');
        location.push_str(query);
    }

    let status = if method == Method::GET {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };
    (status, [(header::LOCATION, location)]).into_response()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

/// Serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use image::{ExtendedColorType, ImageEncoder, RgbImage};
    use std::path::Path;
    use thumbnail_core::{Derivation, Ingress};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let mut state: u32 = 7;
        let img = RgbImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let [r, g, b, _] = state.to_le_bytes();
            image::Rgb([r, g, b])
        });
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn text_fixture() -> Vec<u8> {
        "definitely not an image\n".repeat(64).into_bytes()
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    /// A server whose three storage directories live in a fresh temp dir.
    fn test_server() -> (TestServer, Config, tempfile::TempDir) {
        test_server_with(Config::default())
    }

    fn test_server_with(mut config: Config) -> (TestServer, Config, tempfile::TempDir) {
        let root = tempfile::tempdir().unwrap();
        config.storage.multipart_dir = root.path().join("multipart");
        config.storage.base64_dir = root.path().join("base64");
        config.storage.reference_dir = root.path().join("reference");
        for ingress in Ingress::ALL {
            std::fs::create_dir(config.storage_dir(ingress)).unwrap();
        }

        let state = AppState::new(config.clone()).unwrap();
        let server = TestServer::new(router(state)).unwrap();
        (server, config, root)
    }

    #[tokio::test]
    async fn test_health() {
        let (server, _config, _root) = test_server();
        let response = server.get("/health").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "ok");
    }

    #[tokio::test]
    async fn test_trailing_slash_redirects() {
        let (server, _config, _root) = test_server();

        let response = server.get("/health/").await;
        response.assert_status(StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.header("location").to_str().unwrap(), "/health");

        let response = server
            .get("/reference/")
            .add_query_param("url", "http://example.com/a.png")
            .await;
        response.assert_status(StatusCode::MOVED_PERMANENTLY);
        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(location.starts_with("/reference?url="));
        assert!(location.contains("example.com"));
    }

    #[tokio::test]
    async fn test_trailing_slash_on_post_keeps_method() {
        let (server, _config, _root) = test_server();
        let response = server.post("/multipart/").await;

        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.header("location").to_str().unwrap(), "/multipart");
    }

    #[tokio::test]
    async fn test_redirect_stays_on_host() {
        let uri = Uri::builder()
            .path_and_query("//evil.example/")
            .build()
            .unwrap();

        let response = redirect_trailing_slash(Method::GET, uri).await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[header::LOCATION], "/evil.example");
    }

    #[tokio::test]
    async fn test_unknown_route_not_found() {
        let (server, _config, _root) = test_server();
        server.get("/nope").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handler_panic_is_server_error() {
        async fn explode() -> &'static str {
            panic!("handler exploded")
        }

        let state = AppState::new(Config::default()).unwrap();
        let app = with_middleware(routes().route("/explode", get(explode)), 1024)
            .with_state(state);
        let server = TestServer::new(app).unwrap();

        let response = server.get("/explode").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), "internal server error");

        // The server keeps answering after a panic
        server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_multipart_image() {
        let (server, config, _root) = test_server();
        let form = MultipartForm::new()
            .add_text("caption", "ignored")
            .add_part("image", Part::bytes(jpeg_fixture(800, 600)).file_name("test1.jpg"));

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status_ok();
        let results: Vec<Derivation> = response.json();
        assert_eq!(results.len(), 1);
        assert_eq!(
            (results[0].thumbnail_width, results[0].thumbnail_height),
            (100, 75)
        );
        assert_eq!(file_count(&config.storage_dir(Ingress::Multipart)), 2);
    }

    #[tokio::test]
    async fn test_multipart_several_files() {
        let (server, config, _root) = test_server();
        let form = MultipartForm::new()
            .add_part("a", Part::bytes(jpeg_fixture(300, 200)).file_name("a.jpg"))
            .add_part("b", Part::bytes(png_fixture(64, 64)).file_name("b.png"));

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status_ok();
        let results: Vec<Derivation> = response.json();
        assert_eq!(results.len(), 2);
        assert_eq!(file_count(&config.storage_dir(Ingress::Multipart)), 4);
    }

    #[tokio::test]
    async fn test_multipart_non_image() {
        let (server, config, _root) = test_server();
        let form = MultipartForm::new()
            .add_part("image", Part::bytes(text_fixture()).file_name("test3.txt"));

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "test3.txt: unknown format");
        assert_eq!(file_count(&config.storage_dir(Ingress::Multipart)), 0);
    }

    #[tokio::test]
    async fn test_multipart_stops_at_first_failing_part() {
        let (server, config, _root) = test_server();
        let form = MultipartForm::new()
            .add_part("notes", Part::bytes(text_fixture()).file_name("notes.txt"))
            .add_part("image", Part::bytes(jpeg_fixture(320, 240)).file_name("later.jpg"));

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "notes.txt: unknown format");
        assert_eq!(file_count(&config.storage_dir(Ingress::Multipart)), 0);
    }

    #[tokio::test]
    async fn test_multipart_over_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_mb = 1;
        let (server, config, _root) = test_server_with(config);
        let oversized = vec![0xFF; 2 * 1024 * 1024];
        let form = MultipartForm::new()
            .add_part("image", Part::bytes(oversized).file_name("huge.jpg"));

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(file_count(&config.storage_dir(Ingress::Multipart)), 0);
    }

    #[tokio::test]
    async fn test_multipart_large_text_field_over_limit() {
        let mut config = Config::default();
        config.limits.max_upload_mb = 1;
        let (server, _config, _root) = test_server_with(config);
        let form = MultipartForm::new()
            .add_text("caption", "x".repeat(2 * 1024 * 1024))
            .add_part("image", Part::bytes(jpeg_fixture(64, 64)).file_name("small.jpg"));

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_multipart_missing_body() {
        let (server, _config, _root) = test_server();
        let response = server
            .post("/multipart")
            .content_type("multipart/form-data")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "missing form body");
    }

    #[tokio::test]
    async fn test_multipart_without_files() {
        let (server, _config, _root) = test_server();
        let form = MultipartForm::new().add_text("caption", "no files here");

        let response = server.post("/multipart").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "no image files in form");
    }

    #[tokio::test]
    async fn test_base64_image() {
        let (server, config, _root) = test_server();
        let encoded = BASE64.encode(png_fixture(120, 90));

        let response = server
            .post("/base64")
            .json(&serde_json::json!(encoded))
            .await;

        response.assert_status_ok();
        let result: Derivation = response.json();
        assert_eq!((result.width, result.height), (120, 90));
        assert!(result.original_path.starts_with(config.storage_dir(Ingress::Base64)));
        assert_eq!(file_count(&config.storage_dir(Ingress::Base64)), 2);
    }

    #[tokio::test]
    async fn test_base64_non_image() {
        let (server, config, _root) = test_server();
        let encoded = BASE64.encode(text_fixture());

        let response = server
            .post("/base64")
            .json(&serde_json::json!(encoded))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "unknown format");
        assert_eq!(file_count(&config.storage_dir(Ingress::Base64)), 0);
    }

    #[tokio::test]
    async fn test_base64_over_upload_limit() {
        let mut config = Config::default();
        config.limits.max_upload_mb = 1;
        let (server, config, _root) = test_server_with(config);
        let encoded = "A".repeat(2 * 1024 * 1024);

        let response = server
            .post("/base64")
            .json(&serde_json::json!(encoded))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(file_count(&config.storage_dir(Ingress::Base64)), 0);
    }

    #[tokio::test]
    async fn test_base64_missing_body() {
        let (server, _config, _root) = test_server();
        let response = server
            .post("/base64")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "missing request body");
    }

    #[tokio::test]
    async fn test_reference_image() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/photo.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/png")
                    .set_body_bytes(png_fixture(200, 400)),
            )
            .mount(&upstream)
            .await;

        let (server, config, _root) = test_server();
        let response = server
            .get("/reference")
            .add_query_param("url", format!("{}/photo.png", upstream.uri()))
            .await;

        response.assert_status_ok();
        let result: Derivation = response.json();
        assert_eq!((result.thumbnail_width, result.thumbnail_height), (50, 100));
        assert_eq!(file_count(&config.storage_dir(Ingress::Reference)), 2);
    }

    #[tokio::test]
    async fn test_reference_non_image() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(text_fixture()))
            .mount(&upstream)
            .await;

        let (server, _config, _root) = test_server();
        let response = server
            .get("/reference")
            .add_query_param("url", format!("{}/notes.txt", upstream.uri()))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "unknown format");
    }

    #[tokio::test]
    async fn test_reference_missing_url() {
        let (server, _config, _root) = test_server();
        let response = server.get("/reference").add_query_param("url", "").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.text(), "missing url parameter");
    }

    #[tokio::test]
    async fn test_reference_upstream_failure() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&upstream)
            .await;

        let (server, _config, _root) = test_server();
        let response = server
            .get("/reference")
            .add_query_param("url", format!("{}/broken.png", upstream.uri()))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_same_bytes_share_hash_across_ingress() {
        let upstream = MockServer::start().await;
        let data = jpeg_fixture(256, 256);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(data.clone()))
            .mount(&upstream)
            .await;

        let (server, _config, _root) = test_server();
        let via_base64: Derivation = server
            .post("/base64")
            .json(&serde_json::json!(BASE64.encode(&data)))
            .await
            .json();
        let via_reference: Derivation = server
            .get("/reference")
            .add_query_param("url", format!("{}/same.jpg", upstream.uri()))
            .await
            .json();

        assert_eq!(via_base64.content_hash, via_reference.content_hash);
        assert_ne!(via_base64.original_path, via_reference.original_path);
    }

    #[tokio::test]
    async fn test_missing_storage_dir_is_server_error() {
        let (server, config, _root) = test_server();
        std::fs::remove_dir(config.storage_dir(Ingress::Base64)).unwrap();

        let response = server
            .post("/base64")
            .json(&serde_json::json!(BASE64.encode(png_fixture(80, 80))))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.text().starts_with("failed to write"));
    }
}
