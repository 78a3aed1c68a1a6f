#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("http transport issue encountered: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid pool url: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("json encoding issue encountered: {0}")]
    Json(#[from] serde_json::Error),
    #[error("provision xml issue encountered: {0}")]
    ProvisionXml(#[from] quick_xml::DeError),
    #[error("provision spec missing from the vm other-config")]
    ProvisionSpecMissing,
    #[error("xenapi fault: {}", .0.join(" "))]
    Api(Vec<String>),
    #[error("rpc fault {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("rpc response carried neither a result nor an error")]
    ResponseMalformed,
}

impl Error {
    /// The xapi fault code, e.g. `SESSION_AUTHENTICATION_FAILED`, when this
    /// error is an API fault with a non-empty error description.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Error::Api(description) => description.first().map(|code| code.as_str()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
