use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StorageError {
    #[snafu(display("failed to read key-value store at {path:?} on `{stage}`: {source}"))]
    ReadStore {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("key-value store at {path:?} is not a JSON object of strings: {source}"))]
    ParseStore {
        stage: &'static str,
        path: PathBuf,
        source: serde_json::Error,
    },
    #[snafu(display("failed to create store directory at {path:?} on `{stage}`: {source}"))]
    CreateStoreDirectory {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize key-value store on `{stage}`: {source}"))]
    SerializeStore {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write key-value store at {path:?} on `{stage}`: {source}"))]
    WriteStore {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace key-value store from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempStore {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
