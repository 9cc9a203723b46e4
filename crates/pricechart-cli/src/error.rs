use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] pricechart_core::ValidationError),

    #[error(transparent)]
    Source(#[from] pricechart_core::SourceError),

    #[error("no rows for {symbol} in {range}")]
    EmptySeries { symbol: String, range: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Web(pricechart_web::WebError),
}

impl From<pricechart_web::WebError> for CliError {
    fn from(error: pricechart_web::WebError) -> Self {
        match error {
            pricechart_web::WebError::Serialization(source) => Self::Serialization(source),
            other => Self::Web(other),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Source(_) => 3,
            Self::EmptySeries { .. } => 4,
            Self::Serialization(_) => 5,
            Self::Io(_) | Self::Web(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_category() {
        let validation = CliError::from(pricechart_core::ValidationError::EmptySymbol);
        let source = CliError::from(pricechart_core::SourceError::unavailable("down"));
        let empty = CliError::EmptySeries {
            symbol: String::from("NTFL"),
            range: String::from("2020-01-01..2020-01-01"),
        };
        let io = CliError::from(std::io::Error::other("disk full"));

        assert_eq!(validation.exit_code(), 2);
        assert_eq!(source.exit_code(), 3);
        assert_eq!(empty.exit_code(), 4);
        assert_eq!(io.exit_code(), 10);
        assert_eq!(empty.to_string(), "no rows for NTFL in 2020-01-01..2020-01-01");
    }

    #[test]
    fn web_errors_keep_their_category() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid");
        let serialization = CliError::from(pricechart_web::WebError::Serialization(json_error));
        assert!(matches!(serialization, CliError::Serialization(_)));
        assert_eq!(serialization.exit_code(), 5);

        let bind = CliError::from(pricechart_web::WebError::Bind {
            addr: "127.0.0.1:8501".parse().expect("addr"),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        });
        assert_eq!(bind.exit_code(), 10);
    }
}
