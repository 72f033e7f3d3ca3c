use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::helpers::{json_body, TestApp};

#[tokio::test]
async fn subscribe_returns_a_201_with_the_new_subscription() {
    let app = TestApp::spawn().await;
    let before = Utc::now();

    let response = app.subscribe("user@example.com").await;

    assert_eq!(response.status().as_u16(), 201);
    let body = json_body(response).await;
    let id = body["id"].as_str().expect("Missing id");
    assert!(!id.is_empty());
    Uuid::parse_str(id).expect("The id is not a UUID");
    assert_eq!(body["email"], "user@example.com");
    let subscribed_at: DateTime<Utc> = body["subscribed_at"]
        .as_str()
        .expect("Missing subscribed_at")
        .parse()
        .expect("subscribed_at is not RFC 3339");
    assert!(subscribed_at >= before - Duration::seconds(1));
    assert!(subscribed_at <= Utc::now() + Duration::seconds(1));
}

#[tokio::test]
async fn subscribe_keeps_the_original_case_of_the_email() {
    let app = TestApp::spawn().await;

    let response = app.subscribe("Ursula.LeGuin@Example.com").await;

    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(json_body(response).await["email"], "Ursula.LeGuin@Example.com");
}

#[tokio::test]
async fn subscribe_returns_a_409_when_the_email_is_already_subscribed() {
    let app = TestApp::spawn().await;

    assert_eq!(app.subscribe("user@example.com").await.status().as_u16(), 201);
    let response = app.subscribe("user@example.com").await;

    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(
        json_body(response).await["detail"],
        "This email address is already subscribed."
    );
}

#[tokio::test]
async fn subscribe_treats_case_variants_as_the_same_email() {
    let app = TestApp::spawn().await;

    assert_eq!(app.subscribe("A@x.com").await.status().as_u16(), 201);
    assert_eq!(app.subscribe("a@X.com").await.status().as_u16(), 409);
}

#[tokio::test]
async fn different_emails_get_different_ids() {
    let app = TestApp::spawn().await;

    let first = json_body(app.subscribe("user@example.com").await).await;
    let second = json_body(app.subscribe("other@example.com").await).await;

    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn subscribe_returns_a_422_when_the_email_is_invalid() {
    let app = TestApp::spawn_without_rate_limit().await;
    let test_cases = [
        ("", "empty email"),
        ("definitely-not-an-email", "missing the at symbol"),
        ("@domain.com", "missing the subject"),
        ("ursula le guin@domain.com", "containing whitespace"),
    ];

    for (email, description) in test_cases {
        let response = app.subscribe(email).await;

        assert_eq!(
            422,
            response.status().as_u16(),
            "The API did not return a 422 Unprocessable Entity for the case: {description}",
        );
        let detail = json_body(response).await["detail"].clone();
        assert!(detail.as_str().unwrap().contains("is not a valid subscriber email"));
    }
}

#[tokio::test]
async fn subscribe_returns_a_400_when_the_payload_is_malformed() {
    let app = TestApp::spawn_without_rate_limit().await;
    let test_cases = [
        (serde_json::json!({}), "missing the email"),
        (serde_json::json!({ "email": 42 }), "email is not a string"),
        (serde_json::json!({ "mail": "user@example.com" }), "email field is misspelled"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscriptions(&body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the {description}"
        );
    }
}

#[tokio::test]
async fn subscribe_returns_a_400_when_the_body_is_not_json() {
    let app = TestApp::spawn().await;

    let response = app
        .api_client
        .post(format!("{}/subscriptions", &app.address))
        .header("Content-Type", "application/json")
        .body("email=user%40example.com")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn rejected_emails_are_not_stored() {
    let app = TestApp::spawn_without_rate_limit().await;

    assert_eq!(app.subscribe("not-an-email").await.status().as_u16(), 422);

    // The same address, once fixed, is still free to subscribe
    assert_eq!(app.subscribe("not-an-email@example.com").await.status().as_u16(), 201);
}

#[tokio::test]
async fn concurrent_subscriptions_for_the_same_email_create_one_subscriber() {
    let app = TestApp::spawn_without_rate_limit().await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let client = app.api_client.clone();
            let url = format!("{}/subscriptions", &app.address);
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&serde_json::json!({ "email": "racer@example.com" }))
                    .send()
                    .await
                    .expect("Failed to send request")
                    .status()
                    .as_u16()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == 409).count(), 19);
}
