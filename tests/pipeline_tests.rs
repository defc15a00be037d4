use std::fs;
use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use slidevox::config::{KeyFileCredential, StaticCredential};
use slidevox::error::SlidevoxError;
use slidevox::materialize::MANIFEST_FILE;
use slidevox::pipeline::Pipeline;
use slidevox::util::retry::RetryPolicy;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_data() -> serde_json::Value {
    json!({
        "metadata": {
            "title": "Engineering Update",
            "subtitle": "What shipped this quarter",
            "voice": "shimmer",
            "hasAudio": false,
            "titleScript": "Welcome to the engineering update.",
            "theme": "midnight"
        },
        "slides": [
            {
                "id": 1,
                "type": "content",
                "title": "Highlights",
                "content": ["a", "b"],
                "script": "Here are the highlights."
            },
            {
                "id": 2,
                "type": "conclusion",
                "title": "Next Steps",
                "content": ["c"],
                "script": "And here is what comes next."
            }
        ]
    })
}

fn write_slideshow(dir: &Path, with_html: bool) {
    let data = serde_json::to_string_pretty(&sample_data()).unwrap();
    fs::write(dir.join("slideshow_data.json"), &data).unwrap();

    if with_html {
        let embedded: String = data
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 {
                    line.to_string()
                } else {
                    format!("\n        {line}")
                }
            })
            .collect();
        let html = format!(
            "<html>\n<body></body>\n<script>\n        let slideshowData = {embedded};\n        render(slideshowData);\n</script>\n</html>\n"
        );
        fs::write(dir.join("index.html"), html).unwrap();
    }
}

fn pipeline(dir: &Path, server: &MockServer) -> Pipeline {
    Pipeline::new(dir)
        .with_credentials(Box::new(StaticCredential("test-key".to_string())))
        .with_base_url(server.uri())
        .with_pacing(Duration::ZERO)
        .with_retry_policy(RetryPolicy::none())
}

async fn mount_tts_ok(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(b"ID3synthesized".to_vec()),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn extract_embedded(html: &str) -> serde_json::Value {
    let start = html.find("let slideshowData = ").unwrap() + "let slideshowData = ".len();
    let end = html[start..].find("};").unwrap() + start + 1;
    serde_json::from_str(&html[start..end]).unwrap()
}

#[tokio::test]
async fn full_run_produces_audio_and_syncs_all_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    write_slideshow(dir.path(), true);

    let server = MockServer::start().await;
    mount_tts_ok(&server, 3).await;

    let summary = pipeline(dir.path(), &server).run(|_| {}).await.unwrap();

    assert_eq!(summary.entries, 3);
    assert_eq!(summary.report.generated, vec!["slide-0", "slide-1", "slide-2"]);
    assert!(summary.html_updated);

    let audio_dir = dir.path().join("slideshow_audio");
    for id in ["slide-0", "slide-1", "slide-2"] {
        assert_eq!(
            fs::read(audio_dir.join(format!("{id}.mp3"))).unwrap(),
            b"ID3synthesized"
        );
    }

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(audio_dir.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest["files"].as_array().unwrap().len(), 3);

    let persisted: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("slideshow_data.json")).unwrap())
            .unwrap();
    assert_eq!(persisted["metadata"]["hasAudio"], json!(true));
    let stamp = persisted["metadata"]["audioGeneratedAt"].as_str().unwrap();
    chrono::DateTime::parse_from_rfc3339(stamp).expect("well-formed timestamp");
    // untouched fields pass through
    assert_eq!(persisted["metadata"]["theme"], json!("midnight"));

    // embedded copy equals the persisted document modulo indentation
    let html = fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(html.contains("render(slideshowData);"));
    assert_eq!(extract_embedded(&html), persisted);
}

#[tokio::test]
async fn second_run_makes_no_synthesis_calls() {
    let dir = tempfile::tempdir().unwrap();
    write_slideshow(dir.path(), true);

    let server = MockServer::start().await;
    // three calls total across both runs
    mount_tts_ok(&server, 3).await;

    let p = pipeline(dir.path(), &server);
    p.run(|_| {}).await.unwrap();
    let before = fs::read(dir.path().join("slideshow_audio/slide-2.mp3")).unwrap();

    let summary = p.run(|_| {}).await.unwrap();
    assert_eq!(summary.report.skipped.len(), 3);
    assert!(summary.report.generated.is_empty());
    assert_eq!(
        fs::read(dir.path().join("slideshow_audio/slide-2.mp3")).unwrap(),
        before
    );
}

#[tokio::test]
async fn per_entry_failure_still_completes_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_slideshow(dir.path(), false);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .and(body_string_contains("Here are the highlights."))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .expect(1)
        .mount(&server)
        .await;
    mount_tts_ok(&server, 2).await;

    let summary = pipeline(dir.path(), &server).run(|_| {}).await.unwrap();

    assert_eq!(summary.report.generated, vec!["slide-0", "slide-2"]);
    assert_eq!(summary.report.failed.len(), 1);
    assert_eq!(summary.report.failed[0].id, "slide-1");

    let audio_dir = dir.path().join("slideshow_audio");
    assert!(audio_dir.join("slide-0.mp3").exists());
    assert!(!audio_dir.join("slide-1.mp3").exists());
    assert!(audio_dir.join("slide-2.mp3").exists());

    // manifest matches on-disk state
    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(audio_dir.join(MANIFEST_FILE)).unwrap()).unwrap();
    let ids: Vec<_> = manifest["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["slide-0", "slide-2"]);

    // the run is still a completion, so metadata is updated
    let persisted: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("slideshow_data.json")).unwrap())
            .unwrap();
    assert_eq!(persisted["metadata"]["hasAudio"], json!(true));
}

#[tokio::test]
async fn missing_credential_aborts_before_creating_the_audio_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_slideshow(dir.path(), false);

    let server = MockServer::start().await;
    let p = Pipeline::new(dir.path())
        .with_credentials(Box::new(KeyFileCredential::new("/nonexistent/openai-key.js")))
        .with_base_url(server.uri());

    let err = p.run(|_| {}).await.expect_err("no credential must be fatal");
    assert!(matches!(err, SlidevoxError::Configuration(_)));
    assert!(
        !dir.path().join("slideshow_audio").exists(),
        "fatal pre-flight errors must not create the audio directory"
    );
}

#[tokio::test]
async fn missing_document_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;

    let err = pipeline(dir.path(), &server)
        .run(|_| {})
        .await
        .expect_err("no document must be fatal");
    assert!(matches!(err, SlidevoxError::Data(_)));
}

#[tokio::test]
async fn run_without_html_succeeds_with_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    write_slideshow(dir.path(), false);

    let server = MockServer::start().await;
    mount_tts_ok(&server, 3).await;

    let summary = pipeline(dir.path(), &server).run(|_| {}).await.unwrap();
    assert!(!summary.html_updated);
    assert!(dir.path().join("slideshow_audio/slide-0.mp3").exists());
}
