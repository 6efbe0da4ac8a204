use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bridge_api::config::ServerConfig;
use bridge_api::router::build_app_router;
use bridge_api::state::AppState;
use bridge_cache::TemplateCache;
use bridge_core::config::BridgeConfig;
use bridge_engine::EngineSettings;
use bridge_pipeline::JobPipeline;

/// Engine stub that copies the target to the output path and drops a
/// marker file (in its working directory) proving it was invoked.
pub const ENGINE_OK: &str = r#"
: > engine_ran.marker
target=""
out=""
while [ "$#" -gt 0 ]; do
  case "$1" in
    --target-path) target="$2"; shift 2 ;;
    --output-path) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
cp "$target" "$out"
"#;

pub const TEMPLATE_BYTES: &[u8] = b"fake-template-video";

/// A fully wired test application over a scratch work directory.
pub struct TestApp {
    pub app: Router,
    pub config: Arc<BridgeConfig>,
    pub engine_dir: PathBuf,
    _tmp: tempfile::TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
    }
}

/// Build the full application router over a scratch directory, using the
/// given engine stub script.
///
/// This mirrors the wiring in `main.rs` so integration tests exercise the
/// same middleware stack and pipeline that production uses.
pub fn build_test_app(engine_script: &str) -> TestApp {
    let tmp = tempfile::tempdir().unwrap();
    let work_dir = tmp.path().join("bridge_data");
    let engine_dir = tmp.path().join("engine");
    std::fs::create_dir_all(&engine_dir).unwrap();

    let config = Arc::new(BridgeConfig::rooted_at(&work_dir));
    config.ensure_dirs().unwrap();

    let script = engine_dir.join("engine.sh");
    std::fs::write(&script, engine_script).unwrap();
    let engine = Arc::new(EngineSettings {
        root: engine_dir.clone(),
        python_bin: "sh".into(),
        script: script.to_str().unwrap().into(),
        execution_provider: "cpu".into(),
        output_video_preset: "ultrafast".into(),
        output_video_quality: "80".into(),
    });

    let http = reqwest::Client::new();
    let cache = Arc::new(TemplateCache::new(
        config.templates_dir(),
        http.clone(),
        Duration::from_secs(5),
    ));
    let pipeline = Arc::new(JobPipeline::new(
        Arc::clone(&config),
        engine,
        cache,
        http,
    ));

    let state = AppState {
        config: Arc::clone(&config),
        pipeline,
    };
    let app = build_app_router(state, &test_server_config());

    TestApp {
        app,
        config,
        engine_dir,
        _tmp: tmp,
    }
}

/// Spawn a callback receiver on an ephemeral port, recording every body.
pub async fn spawn_callback_peer(callbacks: Arc<Mutex<Vec<Value>>>) -> SocketAddr {
    let app = Router::new().route(
        "/callback",
        post(move |Json(body): Json<Value>| {
            let callbacks = Arc::clone(&callbacks);
            async move {
                callbacks.lock().unwrap().push(body);
                axum::http::StatusCode::OK
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Spawn a template host serving `TEMPLATE_BYTES` for any template path.
pub async fn spawn_template_host() -> SocketAddr {
    let app = Router::new().route(
        "/templates/{file}",
        get(|| async { TEMPLATE_BYTES.to_vec() }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Issue a GET request against the router.
pub async fn get_uri(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Issue a JSON POST request against the router.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll until at least `count` callbacks have been recorded, or time out.
pub async fn await_callbacks(
    callbacks: &Arc<Mutex<Vec<Value>>>,
    count: usize,
    timeout: Duration,
) -> Vec<Value> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        {
            let recorded = callbacks.lock().unwrap();
            if recorded.len() >= count {
                return recorded.clone();
            }
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("timed out waiting for {count} callback(s)");
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}
