//! Error types for analysis parsing, merging, and splitting.

use std::path::PathBuf;

/// Errors raised by analysis operations.
///
/// Merge and split are total over well-formed input. The variants below mark
/// either malformed on-disk text or an analysis whose cross-table invariants
/// were broken upstream; both are reported immediately and never defaulted.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// An I/O error occurred while reading or writing an analysis file.
    #[error("analysis I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The analysis text does not follow the section format.
    #[error("malformed analysis at line {line}: {reason}")]
    Parse {
        /// 1-based line number of the offending line.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// The analysis was written by an unsupported format version.
    #[error("unsupported analysis format: '{found}'")]
    UnsupportedVersion {
        /// The version line that was found.
        found: String,
    },

    /// A dependency targets a class whose API digest was never recorded.
    #[error("no API digest recorded for external class '{class}'")]
    MissingExternalApi {
        /// The fully-qualified class name without a digest.
        class: String,
    },

    /// An internal dependency targets a source that produced no classes, so
    /// it cannot be rewritten as an external dependency.
    #[error("no representative class for source '{source_file}'")]
    MissingRepresentative {
        /// The source file without recorded classes.
        source_file: String,
    },

    /// Two merge inputs both claim the same source.
    #[error("source '{source_file}' appears in more than one merged analysis")]
    OverlappingSources {
        /// The source present in more than one input.
        source_file: String,
    },
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
