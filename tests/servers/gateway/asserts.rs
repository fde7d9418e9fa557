use reqwest::Response;

pub async fn assert_unprocessable_entity(response: Response, expected_message: &str) {
    assert_eq!(response.status(), 422);
    assert_text_error(response, expected_message).await;
}

pub async fn assert_not_found(response: Response, expected_message: &str) {
    assert_eq!(response.status(), 404);
    assert_text_error(response, expected_message).await;
}

async fn assert_text_error(response: Response, expected_message: &str) {
    assert_eq!(response.headers().get("content-type").unwrap(), "text/plain; charset=utf-8");

    let body = response.text().await.unwrap();

    assert!(
        body.contains(expected_message),
        ":\n  response: `\"{body}\"`\n  does not contain: `\"{expected_message}\"`"
    );
}

pub fn assert_header(response: &Response, name: &str, expected_value: &str) {
    assert_eq!(
        response
            .headers()
            .get(name)
            .unwrap_or_else(|| panic!("the response should have the {name} header"))
            .to_str()
            .unwrap(),
        expected_value
    );
}
