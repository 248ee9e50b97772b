//! Step failure types.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

/// Kind recorded when a delegated step had no definition.
pub const NO_DEFINITION_FOUND: &str = "NoDefinitionFound";

/// Captured cause of a FAILED step.
///
/// Delegated failures carry the innermost step's reason unchanged, so the
/// reported kind and message always describe the root cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    /// Short classification, e.g. `Panic` or an error type name.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
    /// Full diagnostic text: kind, message, cause chain and step location.
    pub trace: String,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Error returned by a step handler.
///
/// # Examples
/// ```
/// use cress::StepError;
///
/// let err = StepError::failed("balance was 3, expected 5");
/// assert_eq!(err.reason().kind, "StepFailed");
/// assert_eq!(err.to_string(), "balance was 3, expected 5");
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum StepError {
    /// A plain failure with a message.
    Failed {
        /// What went wrong.
        message: String,
    },
    /// An arbitrary error raised by handler code.
    Custom {
        /// Concrete error type name.
        kind: String,
        /// The error's display text.
        message: String,
        /// The error's `source()` chain, outermost first.
        causes: Vec<String>,
    },
    /// The handler panicked.
    Panic {
        /// Rendered panic payload.
        message: String,
    },
    /// A delegated step had no matching definition.
    Undefined {
        /// The unmatched sentence.
        sentence: String,
    },
    /// A delegated step failed; carries that step's original reason.
    Delegated(FailureReason),
}

impl StepError {
    /// Build a plain failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Wrap any error, recording its type name and cause chain.
    #[must_use]
    pub fn custom<E: StdError + 'static>(err: E) -> Self {
        let full = std::any::type_name::<E>();
        let kind = full.rsplit("::").next().unwrap_or(full).to_string();
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self::Custom {
            kind,
            message: err.to_string(),
            causes,
        }
    }

    /// Turn a payload caught from a panicking handler into
    /// [`StepError::Panic`].
    ///
    /// `panic!` payloads are `&str` or `String`; any other payload is
    /// reported without its value.
    ///
    /// # Examples
    /// ```
    /// use cress::StepError;
    ///
    /// let payload = std::panic::catch_unwind(|| panic!("count was {}", 3))
    ///     .expect_err("handler panics");
    /// let err = StepError::from_panic(payload.as_ref());
    /// assert_eq!(err.reason().kind, "Panic");
    /// assert_eq!(err.to_string(), "count was 3");
    /// ```
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "step panicked with a non-string payload".to_string());
        Self::Panic { message }
    }

    /// Short classification of the failure.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Failed { .. } => "StepFailed",
            Self::Custom { kind, .. } => kind,
            Self::Panic { .. } => "Panic",
            Self::Undefined { .. } => NO_DEFINITION_FOUND,
            Self::Delegated(reason) => &reason.kind,
        }
    }

    /// Capture the failure as a [`FailureReason`].
    #[must_use]
    pub fn reason(&self) -> FailureReason {
        if let Self::Delegated(reason) = self {
            return reason.clone();
        }
        let message = self.to_string();
        let mut trace = format!("{}: {message}", self.kind());
        if let Self::Custom { causes, .. } = self {
            for cause in causes {
                trace.push_str("\n  caused by: ");
                trace.push_str(cause);
            }
        }
        FailureReason {
            kind: self.kind().to_string(),
            message,
            trace,
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { message } | Self::Custom { message, .. } | Self::Panic { message } => {
                f.write_str(message)
            }
            Self::Undefined { sentence } => write!(f, "Undefined step: {sentence}"),
            Self::Delegated(reason) => f.write_str(&reason.message),
        }
    }
}

impl StdError for StepError {}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        Self::failed(message)
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        Self::failed(message)
    }
}

impl From<std::io::Error> for StepError {
    fn from(err: std::io::Error) -> Self {
        Self::custom(err)
    }
}

impl From<std::num::ParseIntError> for StepError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::custom(err)
    }
}

impl From<std::num::ParseFloatError> for StepError {
    fn from(err: std::num::ParseFloatError) -> Self {
        Self::custom(err)
    }
}

impl From<crate::error::SyntaxError> for StepError {
    fn from(err: crate::error::SyntaxError) -> Self {
        Self::custom(err)
    }
}
