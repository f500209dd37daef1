use std::time::Duration;

use serde_json::{Value, json};
use spiel_insights::batch::ChunkRequest;
use spiel_insights::config::Config;
use spiel_insights::error::ProviderError;
use spiel_insights::provider::{AnalyticsProvider, TextAnalyticsClient};
use spiel_insights::scrape::parse_target_list;
use spiel_insights::{Spiel, analyze_spiel};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const KEY: &str = "test-key";

/// Answers every submitted document: sentiment 0.9, or its first word as key phrase.
struct Echo;

impl Respond for Echo {
    fn respond(&self, req: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&req.body).unwrap();
        let key_phrases = req.url.path().ends_with("keyPhrases");
        let documents: Vec<Value> = body["documents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| {
                if key_phrases {
                    let first = d["text"].as_str().unwrap().split_whitespace().next().unwrap();
                    json!({ "id": d["id"], "keyPhrases": [first] })
                } else {
                    json!({ "id": d["id"], "score": 0.9 })
                }
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({ "documents": documents, "errors": [] }))
    }
}

fn requests(n: usize) -> Vec<ChunkRequest> {
    (0..n)
        .map(|i| ChunkRequest {
            id: i.to_string(),
            language: "en".into(),
            text: format!("chunk number {i}"),
        })
        .collect()
}

fn client(server: &MockServer) -> TextAnalyticsClient {
    TextAnalyticsClient::new(&server.uri(), KEY, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_sentiment_response_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .and(header("Ocp-Apim-Subscription-Key", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{ "id": "0", "score": 0.25 }],
            "errors": [{ "id": "1", "message": "Document text is empty." }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client(&server).sentiment(&requests(2)).await.unwrap();
    assert_eq!(resp.documents.len(), 1);
    assert_eq!(resp.documents[0].id, "0");
    assert_eq!(resp.documents[0].score, 0.25);
    assert_eq!(resp.errors.len(), 1);
    assert_eq!(resp.errors[0].id.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_key_phrases_response_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/keyPhrases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{ "id": "0", "keyPhrases": ["fellow citizens", "liberty"] }],
            "errors": [{ "message": "Request-level warning" }]
        })))
        .mount(&server)
        .await;

    let resp = client(&server).key_phrases(&requests(1)).await.unwrap();
    assert_eq!(resp.documents[0].key_phrases, vec!["fellow citizens", "liberty"]);
    assert_eq!(resp.errors[0].id, None);
}

#[tokio::test]
async fn test_large_batches_split_across_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(Echo)
        .expect(3)
        .mount(&server)
        .await;

    let resp = client(&server)
        .with_max_documents_per_request(2)
        .sentiment(&requests(5))
        .await
        .unwrap();

    let mut ids: Vec<String> = resp.documents.iter().map(|d| d.id.clone()).collect();
    ids.sort();
    assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
    assert!(resp.errors.is_empty());
}

#[tokio::test]
async fn test_failed_request_becomes_chunk_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sentiment"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let resp = client(&server).sentiment(&requests(3)).await.unwrap();
    assert!(resp.documents.is_empty());
    assert_eq!(resp.errors.len(), 3);
    assert!(resp.errors.iter().all(|e| e.message.contains("500")));
}

#[test]
fn test_missing_api_key() {
    let err = TextAnalyticsClient::from_config(&Config::default()).unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey));

    let err = TextAnalyticsClient::new("http://localhost", " ", Duration::from_secs(1)).unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey));
}

#[tokio::test]
async fn test_pipeline_against_mock_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(Echo).mount(&server).await;

    let long = vec!["liberty"; 1500].join(" ");
    let doc = Spiel {
        paragraphs: vec!["We the people".into(), long, String::new()],
        ..Spiel::new("Speaker", "http://example.com")
    };

    let analytics = analyze_spiel(&doc, 5120, "en", &client(&server)).await.unwrap();

    assert_eq!(analytics.per_paragraph.len(), 3);
    assert!((analytics.per_paragraph[1].sentiment - 0.9).abs() < 1e-9);
    assert!((analytics.summary.sentiment - 0.9).abs() < 1e-9);
    assert!(analytics.summary.key_phrases.contains("We"));
    assert!(analytics.summary.key_phrases.contains("liberty"));
    assert!(analytics.per_paragraph.iter().all(|p| !p.partial));
}

#[tokio::test]
async fn test_scrape_targets_end_to_end() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inaugural"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"
            <html><body>
              <span class="displaytext">
                <p>Fellow citizens, I am again called upon.</p>
                <p>Previous to the execution of any official act.</p>
              </span>
            </body></html>
            "#,
        ))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;

    let api = MockServer::start().await;
    Mock::given(method("POST")).respond_with(Echo).mount(&api).await;

    let list = format!(
        "George Washington;{0}/inaugural;March 4, 1793\nNobody;{0}/missing;2000-01-01\n",
        site.uri()
    );
    let targets = parse_target_list(&list);
    assert_eq!(targets.len(), 2);

    let tmp = tempfile::TempDir::new().unwrap();
    let output = tmp.path().join("sentiment.txt");
    let json_dir = tmp.path().join("records");

    let written = spiel_insights::cli::scrape::scrape_targets(
        &Config::default(),
        &client(&api),
        &reqwest::Client::new(),
        &targets,
        &output,
        Some(&json_dir),
    )
    .await
    .unwrap();

    assert_eq!(written, 1);
    let lines = std::fs::read_to_string(&output).unwrap();
    let fields: Vec<&str> = lines.trim().split(';').collect();
    assert_eq!(fields[..2], ["George Washington", "March 4, 1793"]);
    let sentiment: f64 = fields[2].parse().unwrap();
    assert!((sentiment - 0.9).abs() < 1e-9);

    let record: Value = serde_json::from_str(
        &std::fs::read_to_string(json_dir.join("001-george-washington.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(record["date"], "1793-03-04");
    assert_eq!(record["paragraphs"].as_array().unwrap().len(), 2);
}
