// tests/pacelimiter/transport_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::stub_transport::{StubResponse, StubTransport};
    use crate::fixtures::test_clock::TestClock;
    use pace_limiter::{
        Body, Method, NoJitter, PaceLimiter, PaceLimiterConfig, RequestOptions, combine_url,
    };
    use serde_json::json;

    const BASE_URL: &str = "https://inventory.example.com/api/v1";

    fn limiter(transport: &StubTransport) -> PaceLimiter<StubTransport, TestClock> {
        PaceLimiter::with_config(
            PaceLimiterConfig::new(BASE_URL),
            transport.clone(),
            TestClock::new(0.0),
        )
        .unwrap()
        .with_jitter(NoJitter)
    }

    #[test]
    fn url_joining_table() {
        let cases = [
            ("", BASE_URL.to_string()),
            ("/models", format!("{BASE_URL}/models")),
            ("/hardware/42", format!("{BASE_URL}/hardware/42")),
            ("?search=laptop", format!("{BASE_URL}?search=laptop")),
            ("hardware", format!("{BASE_URL}hardware")),
        ];
        for (path, expected) in cases {
            assert_eq!(combine_url(BASE_URL, path), expected);
        }
    }

    #[tokio::test]
    async fn options_pass_through_untouched() {
        let transport = StubTransport::new();
        let limiter = limiter(&transport);
        let options = RequestOptions::new()
            .header("Authorization", "Bearer token")
            .header("Accept", "application/json")
            .query("model_id", 7);

        let response = limiter.get("/hardware", options.clone()).await.unwrap();

        assert_eq!(
            response,
            StubResponse {
                status: 200,
                url: format!("{BASE_URL}/hardware"),
            }
        );
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].options, options);
    }

    #[tokio::test]
    async fn each_verb_uses_its_method() {
        let transport = StubTransport::new();
        let limiter = limiter(&transport);
        let body = json!({ "asset_tag": "A-100", "status_id": 2 });

        limiter.get("/hardware/1", RequestOptions::new()).await.unwrap();
        limiter
            .put("/hardware/1", RequestOptions::new().json(body.clone()))
            .await
            .unwrap();
        limiter.post("/hardware", RequestOptions::new().text("x")).await.unwrap();
        limiter.patch("/hardware/1", RequestOptions::new()).await.unwrap();
        limiter.delete("/hardware/1", RequestOptions::new()).await.unwrap();
        limiter
            .request(Method::HEAD, "", RequestOptions::new())
            .await
            .unwrap();

        let methods: Vec<Method> = transport.sent().into_iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![
                Method::GET,
                Method::PUT,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::HEAD
            ]
        );
        assert_eq!(transport.sent()[1].options.body, Some(Body::Json(body)));
        assert_eq!(transport.sent()[5].url, BASE_URL);
        assert_eq!(limiter.recorded_requests(), 6);
    }
}
