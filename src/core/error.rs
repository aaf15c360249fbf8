//! Error handling for the inventory adapter
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`InventoryError`]) where callers or tests need
//!    to tell failures apart (a 404 versus a 500, a missing cache file versus a
//!    corrupt one)
//! 2. **User-friendly reports** ([`ErrorContext`]) for the CLI, with details and
//!    a suggestion printed to stderr
//!
//! Library functions return [`anyhow::Result`] and attach context with
//! [`anyhow::Context`]; [`user_friendly_error`] digs the typed error back out of
//! the chain when one is present.
//!
//! ```rust,no_run
//! use foreman_inventory::core::{InventoryError, user_friendly_error};
//!
//! let err = anyhow::Error::from(InventoryError::ConfigError {
//!     message: "missing option 'url' in section [foreman]".to_string(),
//! });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failure cases of the inventory pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Required settings are missing or no settings file was found.
    #[error("Error parsing configuration: {message}")]
    ConfigError {
        /// What is missing or wrong
        message: String,
    },

    /// A settings file exists but is not valid TOML for the expected schema.
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path of the offending file
        file: String,
        /// Parser message
        reason: String,
    },

    /// The request never produced an HTTP response.
    #[error("Network error: {operation}")]
    NetworkError {
        /// Request description, e.g. `GET https://foreman/api/v2/hosts`
        operation: String,
        /// Transport error text
        reason: String,
    },

    /// Foreman answered with a non-success status that is not recovered locally.
    #[error("Foreman returned HTTP {status} for {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Response status code
        status: u16,
    },

    /// Foreman answered with a body that does not have the expected shape.
    #[error("Unexpected response from {url}")]
    InvalidResponse {
        /// Requested URL
        url: String,
        /// Decoder message
        reason: String,
    },

    /// A cache document could not be read.
    #[error("Failed to read cache file {path}")]
    CacheReadError {
        /// Cache file path
        path: String,
        /// I/O error text
        reason: String,
    },

    /// A cache document is not valid JSON for its schema.
    #[error("Corrupt cache file {path}")]
    CacheParseError {
        /// Cache file path
        path: String,
        /// Decoder message
        reason: String,
    },

    /// A cache document could not be written.
    #[error("File system error: {operation}")]
    FileSystemError {
        /// What was attempted
        operation: String,
        /// Path involved
        path: String,
    },

    /// Anything else.
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// An [`InventoryError`] plus optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: InventoryError,
    /// A hint on how to fix it
    pub suggestion: Option<String>,
    /// Extra background on the failure
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wraps `error` without details or suggestion.
    #[must_use]
    pub const fn new(error: InventoryError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Adds a suggestion line.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Adds a details line.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the report to stderr with colours.
    ///
    /// Stdout is never touched so a failing run cannot corrupt the JSON an
    /// orchestration tool is parsing.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Converts any error into an [`ErrorContext`] with a suggestion.
///
/// Typed [`InventoryError`]s anywhere in the chain get tailored advice; I/O
/// errors get generic file advice; everything else is reported with its full
/// cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(inventory_error) =
        error.chain().find_map(|cause| cause.downcast_ref::<InventoryError>())
    {
        return create_error_context(inventory_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(InventoryError::FileSystemError {
                operation: "file access".to_string(),
                path: "unknown".to_string(),
            })
            .with_suggestion("Check ownership and permissions of the cache directory")
            .with_details(io_error.to_string());
        }
    }

    ErrorContext::new(InventoryError::Other {
        message: with_cause_chain(&error),
    })
}

fn with_cause_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

fn create_error_context(error: InventoryError) -> ErrorContext {
    match &error {
        InventoryError::ConfigError { .. } => ErrorContext::new(error)
            .with_suggestion(format!(
                "Provide [foreman] url, user, password and ssl_verify in {} or a file named by ${}",
                crate::constants::SYSTEM_SETTINGS_PATH,
                crate::constants::SETTINGS_PATH_ENV,
            ))
            .with_details("Settings files are merged in order; later files override earlier ones"),

        InventoryError::ConfigParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax: strings must be quoted, ssl_verify is true/false")
                .with_details(details)
        }

        InventoryError::NetworkError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check [foreman] url and network access; set ssl_verify = false for self-signed certificates")
                .with_details(details)
        }

        InventoryError::HttpStatus { status, .. } => {
            let suggestion = match status {
                401 | 403 => "Check [foreman] user and password and the account's API permissions",
                _ => "Retry later or check the Foreman server logs",
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        InventoryError::InvalidResponse { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check that [foreman] url points at the Foreman root, not an API path")
                .with_details(details)
        }

        InventoryError::CacheReadError { reason, .. }
        | InventoryError::CacheParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Run again with --refresh-cache to rebuild the cache")
                .with_details(details)
        }

        InventoryError::FileSystemError { .. } => ErrorContext::new(error)
            .with_suggestion("Check that [cache] path is writable"),

        InventoryError::Other { .. } => ErrorContext::new(error),
    }
}
