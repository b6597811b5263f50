use crate::helpers::{spawn_app, spawn_app_without_generation};
use lumen::generation::GenerationError;
use serde_json::json;

#[tokio::test]
async fn horoscope_returns_the_extracted_reading() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_json("/api/horoscope", &json!({"sign": "leo", "topic": "career"}))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sign"]["sign"], "leo");
    assert_eq!(body["data"]["generation"], "generated");
    assert_eq!(body["data"]["reading"]["title"], "A quiet spark");
    assert_eq!(body["data"]["reading"]["sections"][0]["heading"], "Work");

    let prompt = app.generator.last_prompt();
    assert!(prompt.contains("Leo"));
    assert!(prompt.contains("Focus on this topic: career"));
}

#[tokio::test]
async fn horoscope_derives_the_sign_from_a_birth_date() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_json("/api/horoscope", &json!({"birthDate": "1990-08-01"}))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["sign"]["sign"], "leo");
}

#[tokio::test]
async fn horoscope_returns_a_400_when_data_is_invalid() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({}), "missing both sign and birth date"),
        (json!({"sign": "dragon"}), "an unknown sign"),
        (json!({"birthDate": "1990-02-31"}), "an impossible birth date"),
        (json!({"birthDate": "2999-01-01"}), "a birth date in the future"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_json("/api/horoscope", &invalid_body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
    assert!(app.generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_bodies_are_rejected_with_a_400() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_raw("/api/horoscope", "{\"sign\": ").await;

    // assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn prose_replies_are_wrapped_as_content() {
    // arrange
    let app = spawn_app().await;
    app.generator
        .reply_with(Ok("The stars are quiet today.".to_string()));

    // act
    let response = app.post_json("/api/horoscope", &json!({"sign": "aries"})).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["data"]["reading"],
        json!({"content": "The stars are quiet today."})
    );
}

#[tokio::test]
async fn unparseable_replies_fail_with_the_raw_text() {
    // arrange
    let app = spawn_app().await;
    let raw = "Here you go: {\"title\": \"Unfinished\", }";
    app.generator.reply_with(Ok(raw.to_string()));

    // act
    let response = app.post_json("/api/horoscope", &json!({"sign": "aries"})).await;

    // assert
    assert_eq!(500, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["raw"], raw);
}

#[tokio::test]
async fn upstream_errors_keep_their_status() {
    // arrange
    let app = spawn_app().await;
    app.generator.reply_with(Err(GenerationError::Upstream {
        status: 429,
        message: "Resource has been exhausted".to_string(),
    }));

    // act
    let response = app.post_json("/api/tarot", &json!({})).await;

    // assert
    assert_eq!(429, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Resource has been exhausted");
}

#[tokio::test]
async fn readings_are_skipped_without_a_generation_key() {
    // arrange
    let app = spawn_app_without_generation().await;
    let test_cases = vec![
        ("/api/horoscope", json!({"sign": "leo"})),
        ("/api/tarot", json!({})),
        ("/api/saju", json!({"birthDate": "1990-04-20"})),
    ];

    for (path, body) in test_cases {
        // act
        let response = app.post_json(path, &body).await;

        // assert
        assert_eq!(
            200,
            response.status().as_u16(),
            "{} failed instead of skipping the reading.",
            path
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["generation"], "skipped", "{}", path);
        assert!(body["data"]["reading"].is_null());
    }
}

#[tokio::test]
async fn tarot_uses_the_daily_spread_when_no_cards_are_picked() {
    // arrange
    let app = spawn_app().await;
    let daily: serde_json::Value = app.get("/api/daily").await.json().await.unwrap();

    // act
    let response = app
        .post_json("/api/tarot", &json!({"question": "Should I move?"}))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["cards"], daily["data"]["spread"]);
    assert_eq!(body["data"]["question"], "Should I move?");
    assert!(app.generator.last_prompt().contains("The querent asks: Should I move?"));
}

#[tokio::test]
async fn tarot_interprets_the_picked_cards() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_json(
            "/api/tarot",
            &json!({"cards": [{"name": "The Star"}, {"name": "death", "reversed": true}]}),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    let cards = body["data"]["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["card"]["number"], 17);
    assert_eq!(cards[1]["card"]["number"], 13);
    assert_eq!(cards[1]["reversed"], true);
    assert!(app.generator.last_prompt().contains("Death (죽음) reversed"));
}

#[tokio::test]
async fn tarot_returns_a_400_for_invalid_picks() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({"cards": []}), "no cards"),
        (json!({"cards": [{"name": "The Sun"}, {"name": "the sun"}]}), "a duplicate card"),
        (json!({"cards": [{"name": "Ace of Cups"}]}), "a minor arcana card"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_json("/api/tarot", &invalid_body).await;

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
async fn saju_reports_the_year_pillar() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app
        .post_json(
            "/api/saju",
            &json!({"birthDate": "1984-06-15", "birthTime": "07:30", "gender": "female"}),
        )
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["birthDate"], "1984-06-15");
    assert_eq!(body["data"]["yearPillar"]["animal"], "rat");
    assert_eq!(body["data"]["zodiac"]["sign"], "gemini");

    let prompt = app.generator.last_prompt();
    assert!(prompt.contains("갑자년"));
    assert!(prompt.contains("at 07:30"));
    assert!(prompt.contains("Gender: female"));
}

#[tokio::test]
async fn saju_returns_a_400_when_data_is_invalid() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (json!({}), "missing the birth date"),
        (json!({"birthDate": "1984/06/15"}), "a malformed birth date"),
        (json!({"birthDate": "1850-01-01"}), "a birth date before 1900"),
        (json!({"birthDate": "1984-06-15", "birthTime": "25:00"}), "an invalid hour"),
        (json!({"birthDate": "1984-06-15", "gender": "robot"}), "an unknown gender"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_json("/api/saju", &invalid_body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload had {}.",
            error_message
        );
    }
}
