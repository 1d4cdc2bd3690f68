//! Mock Telegram Bot API server
//!
//! Built on wiremock. Method names are matched case-insensitively since the
//! Bot API accepts both `sendMessage` and `SendMessage`.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "123456789:TEST-token";

pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// A bot that talks to this server
    pub fn bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server uri");
        Bot::new(TEST_BOT_TOKEN).set_api_url(url)
    }

    fn method_path(api_method: &str) -> String {
        format!("(?i)^/bot[^/]+/{}$", api_method)
    }

    pub async fn mock_method(&self, api_method: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path_regex(Self::method_path(api_method)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_send_message_ok(&self, chat_id: i64) {
        self.mock_method("sendMessage", 200, json!({ "ok": true, "result": message_json(chat_id) }))
            .await;
    }

    pub async fn mock_bot_kicked(&self, api_method: &str) {
        self.mock_method(
            api_method,
            403,
            json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was kicked from the group chat"
            }),
        )
        .await;
    }

    /// Answer `getFile` for `file_id` and serve `bytes` from the file endpoint
    pub async fn mock_photo_file(&self, file_id: &str, file_path: &str, bytes: &[u8]) {
        self.mock_method(
            "getFile",
            200,
            json!({
                "ok": true,
                "result": {
                    "file_id": file_id,
                    "file_unique_id": format!("unique-{}", file_id),
                    "file_size": bytes.len(),
                    "file_path": file_path
                }
            }),
        )
        .await;

        Mock::given(method("GET"))
            .and(path_regex(format!("^/file/bot[^/]+/{}$", file_path.replace('.', "\\."))))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
            .mount(&self.server)
            .await;
    }

    /// Number of requests received for a method
    pub async fn request_count(&self, api_method: &str) -> usize {
        let suffix = format!("/{}", api_method.to_lowercase());
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path().to_lowercase().ends_with(&suffix))
            .count()
    }
}

pub fn message_json(chat_id: i64) -> Value {
    json!({
        "message_id": 123,
        "from": {
            "id": 123456789,
            "is_bot": true,
            "first_name": "AdRelay",
            "username": "adrelay_bot"
        },
        "chat": {
            "id": chat_id,
            "title": "Test Group",
            "type": "supergroup"
        },
        "date": 1640995200,
        "text": "Sale!"
    })
}
