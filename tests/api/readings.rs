use crate::helpers::spawn_app;
use diesel::prelude::*;
use lumen::models::{Reading, Subscriber};
use lumen::schema::{readings, subscribers};
use serde_json::json;

const EMAIL: &str = "ursula_le_guin@gmail.com";

fn tarot_reading(title: &str) -> serde_json::Value {
    json!({
        "email": EMAIL,
        "type": "tarot",
        "topic": "love",
        "question": "Will it last?",
        "result": {"title": title, "text": "The cards lean towards yes.", "tags": ["hope", "patience"]},
        "summary": "A hopeful spread."
    })
}

#[tokio::test]
async fn saved_readings_round_trip() {
    // arrange
    let app = spawn_app().await;
    let body = tarot_reading("The Star");

    // act
    let saved = app.save_reading(&body).await;
    let listed: serde_json::Value = app
        .get(&format!("/api/readings?email={}", EMAIL))
        .await
        .json()
        .await
        .unwrap();

    // assert
    let listed = listed["data"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], saved["data"]["id"]);
    assert_eq!(listed[0]["type"], "tarot");
    assert_eq!(listed[0]["topic"], "love");
    assert_eq!(listed[0]["question"], "Will it last?");
    assert_eq!(listed[0]["summary"], "A hopeful spread.");
    assert_eq!(listed[0]["result"], body["result"]);
}

#[tokio::test]
async fn saving_a_reading_registers_the_subscriber_once() {
    // arrange
    let app = spawn_app().await;

    // act
    app.save_reading(&tarot_reading("The Star")).await;
    app.save_reading(&tarot_reading("The Moon")).await;

    // assert
    let mut conn = app.db();
    let saved_subscribers = subscribers::table
        .select(Subscriber::as_select())
        .load(&mut conn)
        .unwrap();
    assert_eq!(saved_subscribers.len(), 1);
    assert_eq!(saved_subscribers[0].email, EMAIL);

    let saved_readings = readings::table
        .select(Reading::as_select())
        .load(&mut conn)
        .unwrap();
    assert_eq!(saved_readings.len(), 2);
    assert!(saved_readings
        .iter()
        .all(|r| r.subscriber_id == saved_subscribers[0].id));
}

#[tokio::test]
async fn readings_are_listed_newest_first_and_filtered() {
    // arrange
    let app = spawn_app().await;
    app.save_reading(&tarot_reading("First")).await;
    app.save_reading(&json!({
        "email": EMAIL,
        "type": "saju",
        "result": {"title": "Second"}
    }))
    .await;
    app.save_reading(&tarot_reading("Third")).await;

    // act
    let all: serde_json::Value = app
        .get(&format!("/api/readings?email={}", EMAIL))
        .await
        .json()
        .await
        .unwrap();
    let tarot_only: serde_json::Value = app
        .get(&format!("/api/readings?email={}&type=tarot&limit=1", EMAIL))
        .await
        .json()
        .await
        .unwrap();

    // assert
    let titles: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["result"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Third", "Second", "First"]);

    let tarot_only = tarot_only["data"].as_array().unwrap();
    assert_eq!(tarot_only.len(), 1);
    assert_eq!(tarot_only[0]["result"]["title"], "Third");
}

#[tokio::test]
async fn unknown_emails_have_no_readings() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.get("/api/readings?email=nobody@example.com").await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn listing_returns_a_400_for_invalid_queries() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("", "a missing email"),
        ("email=not-an-email", "an invalid email"),
        ("email=a@example.com&type=runes", "an unknown reading type"),
        ("email=a@example.com&limit=0", "a zero limit"),
        ("email=a@example.com&limit=1000", "a limit that is too large"),
    ];

    for (query, error_message) in test_cases {
        // act
        let response = app.get(&format!("/api/readings?{}", query)).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request for {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn saving_returns_a_400_when_data_is_invalid() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({"email": EMAIL, "type": "tarot"}), "a missing result"),
        (json!({"email": EMAIL, "type": "tarot", "result": null}), "a null result"),
        (json!({"email": EMAIL, "type": "runes", "result": {}}), "an unknown type"),
        (json!({"email": "nope", "type": "tarot", "result": {}}), "an invalid email"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_json("/api/readings", &invalid_body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn owners_can_delete_their_readings() {
    // arrange
    let app = spawn_app().await;
    let saved = app.save_reading(&tarot_reading("The Star")).await;
    let reading_id = saved["data"]["id"].as_str().unwrap().to_string();
    app.post_session("owner-session-1", Some(EMAIL)).await;

    // act
    let response = app
        .delete(&format!("/api/readings/{}", reading_id), Some("owner-session-1"))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let remaining = readings::table
        .count()
        .get_result::<i64>(&mut app.db())
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn deleting_requires_a_known_session() {
    // arrange
    let app = spawn_app().await;
    let saved = app.save_reading(&tarot_reading("The Star")).await;
    let path = format!("/api/readings/{}", saved["data"]["id"].as_str().unwrap());

    // act
    let without_header = app.delete(&path, None).await;
    let unknown_session = app.delete(&path, Some("never-registered")).await;
    let malformed_session = app.delete(&path, Some("bad id!")).await;

    // assert
    assert_eq!(401, without_header.status().as_u16());
    assert_eq!(401, unknown_session.status().as_u16());
    assert_eq!(401, malformed_session.status().as_u16());
}

#[tokio::test]
async fn only_the_owner_may_delete_a_reading() {
    // arrange
    let app = spawn_app().await;
    let saved = app.save_reading(&tarot_reading("The Star")).await;
    let path = format!("/api/readings/{}", saved["data"]["id"].as_str().unwrap());
    app.post_session("anonymous-session", None).await;
    app.post_session("someone-else-session", Some("octavia_butler@gmail.com"))
        .await;

    // act
    let anonymous = app.delete(&path, Some("anonymous-session")).await;
    let someone_else = app.delete(&path, Some("someone-else-session")).await;

    // assert
    assert_eq!(403, anonymous.status().as_u16());
    assert_eq!(403, someone_else.status().as_u16());
    let remaining = readings::table
        .count()
        .get_result::<i64>(&mut app.db())
        .unwrap();
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn deleting_a_missing_reading_is_a_404() {
    // arrange
    let app = spawn_app().await;
    app.post_session("owner-session-1", Some(EMAIL)).await;

    // act
    let response = app
        .delete(
            &format!("/api/readings/{}", uuid::Uuid::new_v4()),
            Some("owner-session-1"),
        )
        .await;

    // assert
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn session_lookup_failures_are_a_500_not_a_401() {
    // arrange
    let app = spawn_app().await;
    let saved = app.save_reading(&tarot_reading("The Star")).await;
    let path = format!("/api/readings/{}", saved["data"]["id"].as_str().unwrap());
    app.post_session("owner-session-1", Some(EMAIL)).await;
    diesel::sql_query("ALTER TABLE user_sessions DROP COLUMN email")
        .execute(&mut app.db())
        .unwrap();

    // act
    let response = app.delete(&path, Some("owner-session-1")).await;

    // assert
    assert_eq!(500, response.status().as_u16());
}
