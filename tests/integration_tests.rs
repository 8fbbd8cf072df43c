#![allow(clippy::needless_borrows_for_generic_args)]

use std::sync::Arc;

use client_service::models::{Client, ClientEventType};
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn test_create_client_scenario() {
    let (test_env, repository, publisher) = TestEnvironment::with_fakes().await;

    let body = json!({
        "ci": "1726647066",
        "firstName": "Christopher",
        "lastName": "Pallo",
        "phone": "0995312828",
        "address": "Condado"
    });

    let response = test_env
        .client
        .post(&test_env.url("/clients"))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 201);
    let echoed: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(echoed, body);

    assert_eq!(repository.writes(), vec![sample_client()]);

    let events = publisher.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        serde_json::to_value(&events[0]).unwrap(),
        json!({ "eventType": "ClientCreated", "data": body })
    );
}

#[tokio::test]
async fn test_duplicate_posts_write_and_publish_twice() {
    let (test_env, repository, publisher) = TestEnvironment::with_fakes().await;

    let first = sample_client();
    let second = Client {
        address: Some("Cumbaya".into()),
        ..sample_client()
    };

    for client in [&first, &second] {
        let response = test_env
            .client
            .post(&test_env.url("/clients"))
            .json(client)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status().as_u16(), 201);
    }

    assert_eq!(repository.writes().len(), 2);
    assert_eq!(repository.latest("1726647066"), Some(second));

    let events = publisher.events();
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|event| event.event_type == ClientEventType::ClientCreated));
}

#[tokio::test]
async fn test_store_failure_returns_500_without_publishing() {
    let publisher = Arc::new(RecordingPublisher::default());
    let test_env =
        TestEnvironment::new(Arc::new(FailingClientRepository), publisher.clone(), false).await;

    let response = test_env
        .client
        .post(&test_env.url("/clients"))
        .json(&sample_client())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Error creating client");
    assert_eq!(body["error"]["code"], "ResourceNotFoundException");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Clients_gr8"));

    assert!(publisher.events().is_empty());
}

#[tokio::test]
async fn test_disabled_broker_still_creates_client() {
    let (test_env, repository) = TestEnvironment::without_broker().await;

    let response = test_env
        .client
        .post(&test_env.url("/clients"))
        .json(&sample_client())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(repository.writes().len(), 1);

    let health: serde_json::Value = test_env
        .client
        .get(&test_env.url("/health/status"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["service"], "client-service");
}

#[tokio::test]
async fn test_partial_body_is_stored_as_given() {
    let (test_env, repository, _publisher) = TestEnvironment::with_fakes().await;

    let response = test_env
        .client
        .post(&test_env.url("/clients"))
        .json(&json!({ "firstName": "Ana", "unknown": 42 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 201);
    let echoed: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(echoed, json!({ "firstName": "Ana" }));
    assert_eq!(repository.writes()[0].ci, None);
}

#[tokio::test]
async fn test_field_values_are_not_type_checked() {
    let (test_env, repository, publisher) = TestEnvironment::with_fakes().await;

    let body = json!({ "ci": 1726647066, "firstName": "Christopher", "lastName": null });

    let response = test_env
        .client
        .post(&test_env.url("/clients"))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 201);
    let echoed: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(echoed, body);

    let writes = repository.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].ci, Some(json!(1726647066)));
    assert_eq!(writes[0].last_name, Some(serde_json::Value::Null));
    assert_eq!(writes[0].phone, None);

    assert_eq!(serde_json::to_value(&publisher.events()[0].data).unwrap(), body);
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let (test_env, repository, publisher) = TestEnvironment::with_fakes().await;

    let response = test_env
        .client
        .post(&test_env.url("/clients"))
        .header("content-type", "text/plain")
        .body("ci=1726647066")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 415);
    assert!(repository.writes().is_empty());
    assert!(publisher.events().is_empty());
}

#[tokio::test]
async fn test_root_and_docs_routes() {
    let (test_env, _repository, _publisher) = TestEnvironment::with_fakes().await;

    let response = test_env
        .client
        .get(&test_env.url("/"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "Client Service Running");

    let response = test_env
        .client
        .get(&test_env.url("/api-docs"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let doc: serde_json::Value = test_env
        .client
        .get(&test_env.url("/api-docs/openapi.json"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(doc["info"]["title"], "Client Service API");
    assert!(doc["paths"]["/clients"]["post"].is_object());
}

#[tokio::test]
async fn test_metrics_endpoint_counts_requests() {
    let (test_env, _repository, _publisher) = TestEnvironment::with_fakes().await;

    test_env
        .client
        .post(&test_env.url("/clients"))
        .json(&sample_client())
        .send()
        .await
        .expect("Failed to send request");

    let text = test_env
        .client
        .get(&test_env.url("/metrics"))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();

    assert!(text.contains("client_operations_total{operation=\"create\",status=\"success\"} 1"));
    assert!(text.contains("client_events_total{event_type=\"ClientCreated\",status=\"success\"} 1"));
}
