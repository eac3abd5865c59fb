mod common;

mod server_time {
    use binance_alpha_sdk::error::Kind;
    use binance_alpha_sdk::types::CancellationToken;
    use chrono::Utc;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::public_client;

    #[tokio::test]
    async fn ping_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = public_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(StatusCode::OK).json_body(json!({}));
        });

        client.ping(&CancellationToken::new()).await?;

        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn server_time_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = public_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/time")
                .is_true(|req| req.query_params().is_empty());
            then.status(StatusCode::OK)
                .json_body(json!({ "serverTime": 1_499_827_319_559_i64 }));
        });

        let server_time = client.server_time(&CancellationToken::new()).await?;

        assert_eq!(server_time, 1_499_827_319_559);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn sync_time_offset_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let mut client = public_client(&server)?;

        // The exchange clock runs a minute ahead of ours.
        let server_time = Utc::now().timestamp_millis() + 60_000;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/time");
            then.status(StatusCode::OK)
                .json_body(json!({ "serverTime": server_time }));
        });

        let offset = client.sync_time_offset(&CancellationToken::new()).await?;

        assert!(
            (-61_000..=-59_000).contains(&offset),
            "offset should be about -60s, got {offset}"
        );
        assert_eq!(client.time_offset(), offset);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn out_of_range_server_time_should_be_malformed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let mut client = public_client(&server)?;
        client.set_time_offset(250);

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/time");
            then.status(StatusCode::OK)
                .json_body(json!({ "serverTime": i64::MIN }));
        });

        let err = client
            .sync_time_offset(&CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::MalformedResponse);
        assert_eq!(client.time_offset(), 250, "a failed sync keeps the old offset");
        mock.assert();

        Ok(())
    }
}

mod security {
    use binance_alpha_sdk::auth::{API_KEY_HEADER, SecretString, SecurityLevel, sign};
    use binance_alpha_sdk::error::{Kind, MissingCredentials};
    use binance_alpha_sdk::request::{Method, PendingRequest, RequestOption};
    use binance_alpha_sdk::types::CancellationToken;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::{API_KEY, FORM_CONTENT_TYPE, SECRET, authenticated_client, public_client};

    #[tokio::test]
    async fn public_request_should_succeed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/depth")
                .query_param("symbol", "BTCUSDT")
                .query_param("limit", "5")
                .is_true(|req| req.query_params().len() == 2);
            then.status(StatusCode::OK)
                .json_body(json!({ "lastUpdateId": 1, "bids": [], "asks": [] }));
        });

        let mut request = PendingRequest::new(Method::Get, "/api/v3/depth", SecurityLevel::None);
        request.set_param("symbol", "BTCUSDT").set_param("limit", 5);

        let body = client
            .dispatch(request, &CancellationToken::new(), [])
            .await?;

        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body)?["lastUpdateId"],
            1
        );
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn api_key_request_should_carry_header_only() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/historicalTrades")
                .header(API_KEY_HEADER, API_KEY)
                .query_param("symbol", "BTCUSDT")
                .is_true(|req| req.query_params().len() == 1);
            then.status(StatusCode::OK).json_body(json!([]));
        });

        let mut request = PendingRequest::new(
            Method::Get,
            "/api/v3/historicalTrades",
            SecurityLevel::ApiKey,
        );
        request.set_param("symbol", "BTCUSDT");

        client
            .dispatch(request, &CancellationToken::new(), [])
            .await?;

        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn signed_request_should_carry_timestamp_and_signature() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/order")
                .header(API_KEY_HEADER, API_KEY)
                .query_param("symbol", "BTCUSDT")
                .query_param("recvWindow", "5000")
                .query_param_exists("timestamp")
                .query_param_exists("signature");
            then.status(StatusCode::OK).json_body(json!({}));
        });

        let mut request = PendingRequest::new(Method::Get, "/api/v3/order", SecurityLevel::Signed);
        request.set_param("symbol", "BTCUSDT");

        client
            .dispatch(
                request,
                &CancellationToken::new(),
                [RequestOption::recv_window(5_000)],
            )
            .await?;

        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn signature_should_cover_the_query_on_the_wire() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v3/order")
                .is_true(|req| {
                    let params: Vec<(String, String)> = req.query_params().into_iter().collect();
                    let value = |name: &str| {
                        params
                            .iter()
                            .find(|(key, _)| key == name)
                            .map(|(_, value)| value.clone())
                    };

                    let (Some(window), Some(symbol), Some(timestamp), Some(signature)) = (
                        value("recvWindow"),
                        value("symbol"),
                        value("timestamp"),
                        value("signature"),
                    ) else {
                        return false;
                    };

                    // Keys are sorted and the timestamp is appended last.
                    let payload =
                        format!("recvWindow={window}&symbol={symbol}&timestamp={timestamp}");
                    let secret = SecretString::from(SECRET.to_owned());
                    sign(&secret, &payload).is_ok_and(|expected| expected == signature)
                });
            then.status(StatusCode::OK).json_body(json!({}));
        });

        let mut request = PendingRequest::new(Method::Get, "/api/v3/order", SecurityLevel::Signed);
        request.set_param("symbol", "BTCUSDT").set_recv_window(5_000);

        client
            .dispatch(request, &CancellationToken::new(), [])
            .await?;

        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn signed_form_request_should_send_body() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v3/order")
                .header(API_KEY_HEADER, API_KEY)
                .header("content-type", FORM_CONTENT_TYPE)
                .body("price=0.5&quantity=10&side=BUY&symbol=BTCUSDT")
                .query_param_exists("timestamp")
                .query_param_exists("signature")
                .is_true(|req| req.query_params().len() == 2);
            then.status(StatusCode::OK)
                .json_body(json!({ "orderId": 1 }));
        });

        let mut request = PendingRequest::new(Method::Post, "/api/v3/order", SecurityLevel::Signed);
        request
            .set_form_param("symbol", "BTCUSDT")
            .set_form_param("side", "BUY")
            .set_form_param("quantity", 10)
            .set_form_param("price", "0.5");

        client
            .dispatch(request, &CancellationToken::new(), [])
            .await?;

        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn missing_credentials_should_send_nothing() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = public_client(&server)?;

        let mock = server.mock(|when, then| {
            when.path("/api/v3/account");
            then.status(StatusCode::OK).json_body(json!({}));
        });

        let request = PendingRequest::new(Method::Get, "/api/v3/account", SecurityLevel::Signed);
        let err = client
            .dispatch(request, &CancellationToken::new(), [])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::Validation);
        assert!(
            err.downcast_ref::<MissingCredentials>().is_some(),
            "expected missing credentials, got {err}"
        );
        mock.assert_calls(0);

        Ok(())
    }
}

mod errors {
    use binance_alpha_sdk::auth::SecurityLevel;
    use binance_alpha_sdk::error::{Kind, MalformedResponse};
    use binance_alpha_sdk::request::{Method, PendingRequest};
    use binance_alpha_sdk::types::CancellationToken;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde::Deserialize;
    use serde_json::json;

    use crate::common::authenticated_client;

    #[tokio::test]
    async fn api_error_should_carry_envelope() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/order");
            then.status(StatusCode::BAD_REQUEST)
                .json_body(json!({ "code": -1121, "msg": "Invalid symbol." }));
        });

        let request = PendingRequest::new(Method::Get, "/api/v3/order", SecurityLevel::Signed);
        let err = client
            .dispatch(request, &CancellationToken::new(), [])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::Api);
        let api = err.api().unwrap();
        assert_eq!(api.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(api.code, -1121);
        assert_eq!(api.message, "Invalid symbol.");
        assert_eq!(api.path, "/api/v3/order");
        assert_eq!(
            api.to_string(),
            "error(400 Bad Request) making GET call to /api/v3/order: code=-1121, msg=Invalid symbol."
        );
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn non_json_error_should_be_malformed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/time");
            then.status(StatusCode::INTERNAL_SERVER_ERROR)
                .body("<html>upstream down</html>");
        });

        let err = client
            .server_time(&CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::MalformedResponse);
        let malformed = err.downcast_ref::<MalformedResponse>().unwrap();
        assert_eq!(malformed.status_code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(malformed.body_text(), "<html>upstream down</html>");
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn empty_envelope_should_be_malformed() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(StatusCode::SERVICE_UNAVAILABLE)
                .json_body(json!({ "code": 0, "msg": "" }));
        });

        let err = client.ping(&CancellationToken::new()).await.unwrap_err();

        assert_eq!(err.kind(), Kind::MalformedResponse);
        mock.assert();

        Ok(())
    }

    #[tokio::test]
    async fn undecodable_success_should_be_malformed() -> anyhow::Result<()> {
        #[derive(Debug, Deserialize)]
        #[expect(dead_code, reason = "Only the decode failure matters")]
        struct Account {
            balances: Vec<String>,
        }

        let server = MockServer::start();
        let client = authenticated_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/account");
            then.status(StatusCode::OK)
                .json_body(json!({ "balances": "none" }));
        });

        let request = PendingRequest::new(Method::Get, "/api/v3/account", SecurityLevel::Signed);
        let err = client
            .send::<Account, _>(request, &CancellationToken::new(), [])
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::MalformedResponse);
        let malformed = err.downcast_ref::<MalformedResponse>().unwrap();
        assert_eq!(malformed.status_code, StatusCode::OK);
        assert_eq!(malformed.body_text(), r#"{"balances":"none"}"#);
        mock.assert();

        Ok(())
    }
}

mod cancellation {
    use std::time::{Duration, Instant};

    use binance_alpha_sdk::client::{Client, Config};
    use binance_alpha_sdk::error::Kind;
    use binance_alpha_sdk::types::CancellationToken;
    use httpmock::{Method::GET, MockServer};
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::common::public_client;

    #[tokio::test]
    async fn cancel_during_call_should_abort() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = public_client(&server)?;

        server.mock(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(StatusCode::OK)
                .delay(Duration::from_secs(10))
                .json_body(json!({}));
        });

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let started = Instant::now();
        let err = client.ping(&token).await.unwrap_err();

        assert!(err.is_cancelled(), "expected cancellation, got {err}");
        assert_eq!(err.kind(), Kind::Transport);
        assert!(
            started.elapsed() < Duration::from_secs(5),
            "cancellation should not wait for the response"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_token_should_send_nothing() -> anyhow::Result<()> {
        let server = MockServer::start();
        let client = public_client(&server)?;

        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(StatusCode::OK).json_body(json!({}));
        });

        let token = CancellationToken::new();
        token.cancel();

        let err = client.ping(&token).await.unwrap_err();

        assert!(err.is_cancelled(), "expected cancellation, got {err}");
        mock.assert_calls(0);

        Ok(())
    }

    #[tokio::test]
    async fn timeout_should_be_transport_error() -> anyhow::Result<()> {
        let server = MockServer::start();
        let config = Config::builder()
            .timeout(Duration::from_millis(100))
            .build();
        let client = Client::new(&server.base_url(), config)?;

        server.mock(|when, then| {
            when.method(GET).path("/api/v3/ping");
            then.status(StatusCode::OK)
                .delay(Duration::from_secs(5))
                .json_body(json!({}));
        });

        let err = client
            .ping(&CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), Kind::Transport);
        assert!(!err.is_cancelled(), "a timeout is not a cancellation");

        Ok(())
    }
}
