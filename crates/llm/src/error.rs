use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AssistantError {
    #[snafu(display("assistant endpoint is empty"))]
    MissingEndpoint { stage: &'static str },
    #[snafu(display("failed to build http client on `{stage}`: {source}"))]
    BuildClient {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("request to '{endpoint}' failed on `{stage}`: {source}"))]
    SendRequest {
        stage: &'static str,
        endpoint: String,
        source: reqwest::Error,
    },
    #[snafu(display("assistant endpoint '{endpoint}' returned status {status}"))]
    ResponseStatus {
        stage: &'static str,
        endpoint: String,
        status: u16,
        body: String,
    },
    #[snafu(display("failed to read assistant response on `{stage}`: {source}"))]
    ReadResponse {
        stage: &'static str,
        source: reqwest::Error,
    },
    #[snafu(display("assistant response is not valid JSON on `{stage}`: {source}"))]
    DecodeResponse {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("assistant exchange was interrupted on `{stage}`: {details}"))]
    Interrupted {
        stage: &'static str,
        details: String,
    },
}

pub type AssistantResult<T> = Result<T, AssistantError>;
