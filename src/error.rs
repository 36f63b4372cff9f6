//! Unified pipeline error.
//!
//! Every fallible operation returns `PipelineError`. It remembers where it was
//! raised (`#[track_caller]` on the constructors and `From` impls, so `?` records
//! the call site), what kind of failure it is, the original error, and a chain of
//! context strings added on the way up.

use std::panic::Location;

use thiserror::Error;

/// Failure classes surfaced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing environment variable, invalid split ratio, insecure URL...
    Configuration,
    /// Database unreachable, authentication failure, driver errors.
    Connectivity,
    /// Filesystem and CSV writer failures.
    Io,
    /// Empty collection, degenerate split, malformed file contents.
    Data,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Configuration => 2,
            ErrorKind::Data => 3,
            ErrorKind::Connectivity => 4,
            ErrorKind::Io => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Connectivity => "connectivity",
            ErrorKind::Io => "io",
            ErrorKind::Data => "data",
        }
    }
}

/// The original failure wrapped by a `PipelineError`.
#[derive(Debug, Error)]
pub enum Cause {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Cause {
    /// Type name of the original error.
    pub fn type_name(&self) -> &'static str {
        match self {
            Cause::Message(_) => "PipelineError",
            Cause::Io(_) => "std::io::Error",
            Cause::Csv(_) => "csv::Error",
            Cause::Mongo(_) => "mongodb::error::Error",
            Cause::Json(_) => "serde_json::Error",
            Cause::Yaml(_) => "serde_yaml::Error",
        }
    }
}

pub struct PipelineError {
    kind: ErrorKind,
    cause: Cause,
    file: &'static str,
    line: u32,
    context: Vec<String>,
}

impl PipelineError {
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::wrap(kind, Cause::Message(message.into()))
    }

    #[track_caller]
    pub fn wrap(kind: ErrorKind, cause: impl Into<Cause>) -> Self {
        let location = Location::caller();
        Self {
            kind,
            cause: cause.into(),
            file: location.file(),
            line: location.line(),
            context: Vec::new(),
        }
    }

    /// Append a context line. The originating location and cause are kept.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn error_type(&self) -> &'static str {
        self.cause.type_name()
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Message of the original error, without location or context.
    pub fn message(&self) -> String {
        self.cause.to_string()
    }

    /// Context lines, innermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = "=".repeat(80);
        writeln!(f, "{rule}")?;
        writeln!(f, "Heart Failure Pipeline Error")?;
        writeln!(f, "{}", "-".repeat(80))?;
        writeln!(f, "Error Kind     : {}", self.kind.label())?;
        writeln!(f, "Error Type     : {}", self.error_type())?;
        writeln!(f, "File Name      : {}", self.file)?;
        writeln!(f, "Line Number    : {}", self.line)?;
        writeln!(f, "Error Message  : {}", self.cause)?;
        for context in self.context.iter().rev() {
            writeln!(f, "Context        : {context}")?;
        }
        write!(f, "{rule}")
    }
}

impl std::fmt::Debug for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineError")
            .field("kind", &self.kind)
            .field("error_type", &self.error_type())
            .field("file", &self.file)
            .field("line", &self.line)
            .field("message", &self.message())
            .field("context", &self.context)
            .finish()
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Message(_) => None,
            Cause::Io(e) => Some(e),
            Cause::Csv(e) => Some(e),
            Cause::Mongo(e) => Some(e),
            Cause::Json(e) => Some(e),
            Cause::Yaml(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PipelineError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::wrap(ErrorKind::Io, err)
    }
}

impl From<csv::Error> for PipelineError {
    #[track_caller]
    fn from(err: csv::Error) -> Self {
        let kind = if err.is_io_error() {
            ErrorKind::Io
        } else {
            ErrorKind::Data
        };
        Self::wrap(kind, err)
    }
}

impl From<mongodb::error::Error> for PipelineError {
    #[track_caller]
    fn from(err: mongodb::error::Error) -> Self {
        let kind = match *err.kind {
            mongodb::error::ErrorKind::InvalidArgument { .. } => ErrorKind::Configuration,
            _ => ErrorKind::Connectivity,
        };
        Self::wrap(kind, err)
    }
}

impl From<serde_json::Error> for PipelineError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        let kind = if err.is_io() { ErrorKind::Io } else { ErrorKind::Data };
        Self::wrap(kind, err)
    }
}

impl From<serde_yaml::Error> for PipelineError {
    #[track_caller]
    fn from(err: serde_yaml::Error) -> Self {
        Self::wrap(ErrorKind::Data, err)
    }
}

/// Context chaining for any result whose error converts into `PipelineError`.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T, PipelineError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    PipelineError: From<E>,
{
    #[track_caller]
    fn context(self, context: impl Into<String>) -> Result<T, PipelineError> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(PipelineError::from(err).with_context(context)),
        }
    }
}
