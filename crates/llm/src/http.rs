use std::time::Duration;

use futures::FutureExt;
use snafu::{ResultExt, ensure};

use super::answer::{Answer, ChatRequest, extract_answer};
use super::client::{AssistantClient, BoxFuture};
use super::error::{
    AssistantError, AssistantResult, BuildClientSnafu, DecodeResponseSnafu, MissingEndpointSnafu,
    ReadResponseSnafu, SendRequestSnafu,
};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl AssistantConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim().to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Posts `{"question": ...}` as JSON and reads the answer from the JSON reply.
pub struct HttpAssistantClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAssistantClient {
    pub fn new(config: AssistantConfig) -> AssistantResult<Self> {
        ensure!(
            !config.endpoint.is_empty(),
            MissingEndpointSnafu {
                stage: "http-client-new",
            }
        );

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context(BuildClientSnafu {
            stage: "build-http-client",
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    async fn post_question(&self, question: &str) -> AssistantResult<Answer> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { question })
            .send()
            .await
            .context(SendRequestSnafu {
                stage: "send-question",
                endpoint: self.endpoint.clone(),
            })?;

        let status = response.status();
        let payload = response.text().await.context(ReadResponseSnafu {
            stage: "read-answer-body",
        })?;

        if !status.is_success() {
            return Err(AssistantError::ResponseStatus {
                stage: "answer-http-status",
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body: payload,
            });
        }

        let body: serde_json::Value =
            serde_json::from_str(&payload).context(DecodeResponseSnafu {
                stage: "decode-answer-body",
            })?;

        let answer = extract_answer(&body);
        if matches!(answer, Answer::Missing) {
            tracing::debug!(endpoint = %self.endpoint, "assistant response carried no answer");
        }
        Ok(answer)
    }
}

impl AssistantClient for HttpAssistantClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn ask<'a>(&'a self, question: &'a str) -> BoxFuture<'a, AssistantResult<Answer>> {
        async move {
            let result = self.post_question(question).await;
            if let Err(error) = &result {
                tracing::warn!(
                    endpoint = %self.endpoint,
                    error = %error,
                    "assistant exchange failed"
                );
            }
            result
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::{Value, json};

    use super::*;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let address = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{address}/chat")
    }

    fn client_for(endpoint: String) -> HttpAssistantClient {
        let config = AssistantConfig::new(endpoint).with_timeout(Duration::from_secs(5));
        HttpAssistantClient::new(config).expect("client")
    }

    #[tokio::test]
    async fn posts_question_as_json_and_reads_nested_content() {
        let app = Router::new().route(
            "/chat",
            post(|Json(body): Json<Value>| async move {
                let question = body["question"].as_str().unwrap_or_default().to_string();
                Json(json!({ "answer": { "content": format!("echo:{question}") } }))
            }),
        );
        let client = client_for(serve(app).await);

        let answer = client.ask(" hello ").await.expect("answer");
        assert_eq!(answer, Answer::Text("echo: hello ".to_string()));
    }

    #[tokio::test]
    async fn server_error_status_is_a_failure() {
        let app = Router::new().route(
            "/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client_for(serve(app).await);

        let error = client.ask("hi").await.expect_err("status failure");
        assert!(matches!(
            error,
            AssistantError::ResponseStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn non_json_body_is_a_failure() {
        let app = Router::new().route("/chat", post(|| async { "plain text" }));
        let client = client_for(serve(app).await);

        let error = client.ask("hi").await.expect_err("decode failure");
        assert!(matches!(error, AssistantError::DecodeResponse { .. }));
    }

    #[tokio::test]
    async fn body_without_answer_is_missing() {
        let app = Router::new().route("/chat", post(|| async { Json(json!({ "detail": "ok" })) }));
        let client = client_for(serve(app).await);

        assert_eq!(client.ask("hi").await.expect("answer"), Answer::Missing);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_send_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let address = listener.local_addr().expect("address");
        drop(listener);

        let client = client_for(format!("http://{address}/chat"));
        let error = client.ask("hi").await.expect_err("send failure");
        assert!(matches!(error, AssistantError::SendRequest { .. }));
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        assert!(matches!(
            HttpAssistantClient::new(AssistantConfig::new("   ")),
            Err(AssistantError::MissingEndpoint { .. })
        ));
    }
}
