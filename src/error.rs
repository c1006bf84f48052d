use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no config file found, tried: {}", display_paths(.paths))]
    ConfigNotFound { paths: Vec<PathBuf> },
    #[error("can not parse config file {}:{line}: {message}", .path.display())]
    ConfigParse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("option {option} is missing in section [{section}]")]
    MissingOption { section: String, option: String },
    #[error("password and token both missing for user {username}")]
    MissingCredentials { username: String },
    #[error("403: bad credentials for {username}")]
    Authentication { username: String },
    #[error("404: incorrect login URL {url}")]
    Endpoint { url: String },
    #[error("login to {url} failed with status {status}")]
    Login { status: StatusCode, url: String },
    #[error("http request to {url} failed: {source}")]
    Transport {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("can not order a {left} against a {right}")]
    EntityKindMismatch {
        left: &'static str,
        right: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return String::from("(none)");
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
