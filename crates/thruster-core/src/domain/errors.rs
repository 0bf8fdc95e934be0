use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ThrusterResult<T> = Result<T, ThrusterError>;

/// Failure classes the shell can tell apart by exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrusterErrorCategory {
    /// Rejected input vector or command line.
    InputValidationError,
    /// Unknown gas or unusable gas table.
    ConfigurationError,
    /// Inputs that leave outputs undefined, when the caller asked for strictness.
    ComputationError,
    InternalError,
}

impl ThrusterErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::ConfigurationError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::ConfigurationError => "ConfigurationError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

impl Display for ThrusterErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).name())
    }
}

/// Error surfaced to the shell. Module-level `thiserror` types convert into
/// this so every failure carries a stable placeholder and exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrusterError {
    category: ThrusterErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl ThrusterError {
    fn new(
        category: ThrusterErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            ThrusterErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn configuration(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ThrusterErrorCategory::ConfigurationError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ThrusterErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(ThrusterErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> ThrusterErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    /// `ERROR: [PLACEHOLDER] message`
    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for ThrusterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.category, self.placeholder, self.message)
    }
}

impl Error for ThrusterError {}
