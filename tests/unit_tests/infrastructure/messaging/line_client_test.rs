use axum::Router;
use axum::extract::Path;
use axum::response::IntoResponse;
use axum::routing::{get, post};

use saraphi::application::ports::{ChatClient, DownloadError};
use saraphi::domain::Destination;
use saraphi::infrastructure::messaging::LineClient;

use crate::helpers::start_mock_server;

#[tokio::test]
async fn given_voice_message_when_downloading_content_then_raw_bytes_are_returned() {
    let data_app = Router::new().route(
        "/v2/bot/message/{message_id}/content",
        get(|| async { b"m4a audio bytes".to_vec() }),
    );
    let (data_base, shutdown_tx) = start_mock_server(data_app).await;

    let client = LineClient::with_base_urls(&data_base, &data_base, "token".to_string());
    let bytes = client.download_content("m1").await.unwrap();

    assert_eq!(&bytes[..], b"m4a audio bytes");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_expired_message_when_downloading_content_then_not_found_is_returned() {
    let data_app = Router::new().route(
        "/v2/bot/message/{message_id}/content",
        get(|| async { (axum::http::StatusCode::NOT_FOUND, "not found").into_response() }),
    );
    let (data_base, shutdown_tx) = start_mock_server(data_app).await;

    let client = LineClient::with_base_urls(&data_base, &data_base, "token".to_string());
    let result = client.download_content("gone").await;

    assert!(matches!(result, Err(DownloadError::NotFound(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_text_when_pushing_then_send_succeeds_against_the_push_endpoint() {
    let app = Router::new().route("/v2/bot/message/push", post(|| async { "{}" }));
    let (base, shutdown_tx) = start_mock_server(app).await;

    let client = LineClient::with_base_urls(&base, &base, "token".to_string());
    let result = client.push_text("u1", "hello").await;

    assert!(result.is_ok());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_push_endpoint_error_when_pushing_then_send_failed_is_returned() {
    let app = Router::new().route(
        "/v2/bot/message/push",
        post(|| async {
            (
                axum::http::StatusCode::TOO_MANY_REQUESTS,
                r#"{"message":"rate limited"}"#,
            )
                .into_response()
        }),
    );
    let (base, shutdown_tx) = start_mock_server(app).await;

    let client = LineClient::with_base_urls(&base, &base, "token".to_string());
    let result = client.push_text("u1", "hello").await;

    assert!(result.is_err());
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_user_destination_when_looking_up_display_name_then_profile_endpoint_is_used() {
    let app = Router::new().route(
        "/v2/bot/profile/{user_id}",
        get(|Path(user_id): Path<String>| async move {
            format!(r#"{{"displayName":"User {}"}}"#, user_id)
        }),
    );
    let (base, shutdown_tx) = start_mock_server(app).await;

    let client = LineClient::with_base_urls(&base, &base, "token".to_string());
    let name = client
        .display_name(&Destination::User {
            user_id: "u1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(name, "User u1");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_group_destination_when_looking_up_display_name_then_member_endpoint_is_used() {
    let app = Router::new().route(
        "/v2/bot/group/{group_id}/member/{user_id}",
        get(|| async { r#"{"displayName":"Member"}"# }),
    );
    let (base, shutdown_tx) = start_mock_server(app).await;

    let client = LineClient::with_base_urls(&base, &base, "token".to_string());
    let name = client
        .display_name(&Destination::Group {
            group_id: "g1".to_string(),
            user_id: Some("u1".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(name, "Member");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_group_destination_without_speaker_when_looking_up_then_it_fails_without_a_request() {
    let client = LineClient::with_base_urls(
        "http://127.0.0.1:1",
        "http://127.0.0.1:1",
        "token".to_string(),
    );

    let result = client
        .display_name(&Destination::Group {
            group_id: "g1".to_string(),
            user_id: None,
        })
        .await;

    assert!(result.is_err());
}
