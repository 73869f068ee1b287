/*!
 * # potrad - concurrent PO catalog translation
 *
 * A Rust library that translates every entry of a gettext catalog through a
 * LibreTranslate-compatible HTTP service and writes an ORIGINAL/TRADUCCIÓN report.
 *
 * ## Features
 *
 * - Catalog parsing with polib, falling back to a tolerant line scanner
 * - Bounded worker pool with cancellation and panic isolation
 * - Retries with exponential backoff for transient service errors
 * - Output in catalog order regardless of completion order
 * - Atomic replacement of the output file
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `catalog`: Catalog parsing strategies
 * - `providers`: Translation backends:
 *   - `providers::libretranslate`: HTTP client
 *   - `providers::mock`: In-process provider for tests
 * - `translation`: Scheduling, retries, collection and progress
 * - `output_writer`: Report rendering and writing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod catalog;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod output_writer;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use catalog::{parse_catalog, Entry};
pub use errors::{AppError, ErrorKind, OutputError, ParseError, ProviderError};
pub use output_writer::{format_records, OutputWriter, WriteStatus};
pub use translation::{RunResult, RunSummary, TranslationOutcome};
