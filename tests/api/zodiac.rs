use crate::helpers::spawn_app;

#[tokio::test]
async fn zodiac_resolves_sign_boundaries() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (3, 20, "pisces"),
        (3, 21, "aries"),
        (12, 21, "sagittarius"),
        (12, 22, "capricorn"),
        (1, 19, "capricorn"),
        (1, 20, "aquarius"),
        (2, 29, "pisces"),
    ];

    for (month, day, expected) in test_cases {
        // act
        let response = app.get(&format!("/api/zodiac?month={}&day={}", month, day)).await;

        // assert
        assert_eq!(200, response.status().as_u16());
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            body["data"]["sign"], expected,
            "{}/{} resolved to the wrong sign.",
            month, day
        );
    }
}

#[tokio::test]
async fn zodiac_returns_a_400_for_invalid_input() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        ("month=2&day=30", "a day that does not exist"),
        ("month=13&day=1", "a month out of range"),
        ("month=0&day=10", "month zero"),
        ("month=5", "a missing day"),
        ("", "no parameters"),
    ];

    for (query, error_message) in test_cases {
        // act
        let response = app.get(&format!("/api/zodiac?{}", query)).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request for {}.",
            error_message
        );
    }
}
