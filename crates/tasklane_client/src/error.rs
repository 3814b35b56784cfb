use thiserror::Error;

/// Client errors. Every variant carries a description of the attempted
/// operation so notifications can say what failed.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a usable response (connect, timeout, body
    /// decode).
    #[error("could not {operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("could not {operation}: HTTP {status}")]
    Api {
        operation: String,
        status: u16,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn transport(operation: &str, source: reqwest::Error) -> Self {
        Error::Transport {
            operation: operation.to_string(),
            source,
        }
    }

    pub(crate) fn api(operation: &str, status: u16, body: String) -> Self {
        Error::Api {
            operation: operation.to_string(),
            status,
            body,
        }
    }

    /// Description of the operation that failed (e.g. "create list").
    pub fn operation(&self) -> &str {
        match self {
            Error::Transport { operation, .. } | Error::Api { operation, .. } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::api("rename list", 500, "boom".to_string());
        assert_eq!(err.to_string(), "could not rename list: HTTP 500");
        assert_eq!(err.operation(), "rename list");
    }
}
