use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("mandatory attribute chart.{attribute} is missing on chart[#{chart}]")]
    MissingMandatoryAttribute { attribute: String, chart: String },

    #[error("chart[#{chart}] cannot be anchored: parent must be defined")]
    MissingAnchor { chart: String },

    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("draw step failed: {0}")]
    Draw(String),
}

impl ChartError {
    /// Configuration errors are caused by an incompletely set up chart.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingMandatoryAttribute { .. } | Self::MissingAnchor { .. }
        )
    }
}

/// Failure reported by an asynchronous commit handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("commit failed: {0}")]
pub struct CommitError(pub String);

impl CommitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
