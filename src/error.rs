pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum Error {
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    InvalidSlotCount(usize),
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Yaml(e) => write!(f, "YAML config error: {}", e),
            Error::Json(e) => write!(f, "JSON config error: {}", e),
            Error::InvalidSlotCount(n) => write!(f, "Invalid slot count: {}", n),
        }
    }
}

impl std::error::Error for Error {}
