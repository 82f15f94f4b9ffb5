use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TriggerFood {
    food_name: String,
    average_increase_mm: f64,
    occurrence_count: u32,
    confidence_score: u32,
}

#[derive(Debug, Deserialize)]
struct Advice {
    category: String,
    food: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct Metrics {
    days_analyzed: usize,
    is_improving_trend: bool,
    food_score: u32,
}

#[derive(Debug, Deserialize)]
struct AnalysisResult {
    trigger_foods: Vec<TriggerFood>,
    weekly_trend: Vec<Value>,
    advice: Vec<Advice>,
    metrics: Metrics,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("meal_trigger_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/observations")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_meal_trigger_analyzer"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn pasta_day(date: &str) -> Value {
    json!({
        "date": date,
        "meals": { "lunch": ["pasta"] },
        "measurements": {
            "abdomen": { "baseline": 80, "lunch": 88 },
            "hips": { "baseline": "70", "lunch": "n/a" }
        },
        "stress_level": 4
    })
}

async fn clear_store(client: &Client, base_url: &str) {
    let stored: Vec<Value> = client
        .get(format!("{base_url}/api/observations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for observation in stored {
        let date = observation["date"].as_str().unwrap().to_string();
        let response = client
            .delete(format!("{base_url}/api/observations/{date}"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn http_stored_history_is_analyzed_once_enough_days_exist() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    clear_store(&client, &server.base_url).await;

    for date in ["2026-03-02", "2026-03-03"] {
        let response = client
            .post(format!("{}/api/observations", server.base_url))
            .json(&pasta_day(date))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let early = client
        .get(format!("{}/api/analysis", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(early.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(early.text().await.unwrap().contains("need more data"));

    let response = client
        .post(format!("{}/api/observations", server.base_url))
        .json(&pasta_day("2026-03-04"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let result: AnalysisResult = client
        .get(format!("{}/api/analysis", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(result.metrics.days_analyzed, 3);
    assert_eq!(result.metrics.food_score, 60);
    assert!(!result.metrics.is_improving_trend);
    assert_eq!(result.weekly_trend.len(), 3);
    assert_eq!(result.trigger_foods.len(), 1);
    assert_eq!(result.trigger_foods[0].food_name, "pasta");
    assert_eq!(result.trigger_foods[0].average_increase_mm, 4.0);
    assert_eq!(result.trigger_foods[0].occurrence_count, 3);
    assert_eq!(result.trigger_foods[0].confidence_score, 60);
    assert_eq!(result.advice[0].category, "limit");
    assert!(result.advice[0].reason.contains("+4.0mm"));
}

#[tokio::test]
async fn http_observation_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    clear_store(&client, &server.base_url).await;

    let invalid = client
        .post(format!("{}/api/observations", server.base_url))
        .json(&json!({ "date": "2026-04-01", "stress_level": 12 }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let stored: Value = client
        .post(format!("{}/api/observations", server.base_url))
        .json(&json!({ "date": "2026-04-01", "meals": { "dinner": [" soup ", ""] } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["meals"]["dinner"], json!(["soup"]));

    let fetched = client
        .get(format!("{}/api/observations/2026-04-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(fetched.status().is_success());

    let deleted = client
        .delete(format!("{}/api/observations/2026-04-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(format!("{}/api/observations/2026-04-01", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_supplied_history_is_analyzed_without_storing() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let observations: Vec<Value> = ["2026-05-04", "2026-05-01", "2026-05-02", "2026-05-03"]
        .into_iter()
        .map(|date| json!({ "date": date, "meals": { "breakfast": ["oats"] } }))
        .collect();

    let result: AnalysisResult = client
        .post(format!("{}/api/analysis", server.base_url))
        .json(&json!({ "observations": observations }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(result.metrics.days_analyzed, 4);
    assert_eq!(result.metrics.food_score, 90);
    assert!(result.trigger_foods.is_empty());
    assert_eq!(result.advice.len(), 1);
    assert_eq!(result.advice[0].category, "prefer");
    assert_eq!(result.advice[0].food, "leafy greens");
    assert_eq!(result.weekly_trend[0]["date"], "2026-05-01");

    let too_short = client
        .post(format!("{}/api/analysis", server.base_url))
        .json(&json!({ "observations": [observations[0], observations[0]] }))
        .send()
        .await
        .unwrap();
    assert_eq!(too_short.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
