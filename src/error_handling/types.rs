//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Error types for catalog database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// No catalog file at the given path.
    #[error("Catalog not found at {0}")]
    CatalogNotFound(String),

    /// A JSON column could not be encoded or decoded.
    #[error("Invalid JSON in column {column}: {source}")]
    JsonColumn {
        column: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The file exists but was never initialized as a catalog.
    #[error("{0} is not a retrogallery catalog (no image_items table)")]
    NotACatalog(String),
}

/// Types of errors that can occur while crawling.
///
/// These are failures that cost the crawl a page, an image, or a catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// Index or gallery page could not be fetched
    PageFetchError,
    /// Image request failed (network, status, empty body)
    ImageDownloadError,
    /// Storage path could not be built (missing title)
    StoragePathError,
    /// Image bytes could not be written or read back
    StorageWriteError,
    /// Item could not be recorded in the catalog
    CatalogWriteError,
    /// Gallery task panicked
    GalleryTaskPanic,
}

/// Types of warnings that can occur while crawling.
///
/// Warnings mark pages whose structure yielded nothing; the crawl continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
#[allow(clippy::enum_variant_names)] // All variants start with "Empty" by design
pub enum WarningType {
    EmptyIndexPage,   // Index page matched no gallery links
    EmptyGalleryPage, // Gallery page matched no image groups with URLs
}

/// Types of informational metrics that can occur while crawling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    OffsiteGallery,     // Gallery link outside the site's allowed domains
    DuplicateGallery,   // Gallery URL already visited in this run
    DownloadDownloaded, // Image fetched and written
    DownloadUptodate,   // Image already stored and fresh
    DownloadCached,     // Image already produced earlier in this run
    ItemKept,           // Item with at least one stored image
    ItemDropped,        // Item with no successful downloads
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::PageFetchError => "Page fetch error",
            ErrorType::ImageDownloadError => "Image download error",
            ErrorType::StoragePathError => "Storage path error",
            ErrorType::StorageWriteError => "Storage write error",
            ErrorType::CatalogWriteError => "Catalog write error",
            ErrorType::GalleryTaskPanic => "Gallery task panic",
        }
    }
}

impl std::fmt::Display for WarningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WarningType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::EmptyIndexPage => "Index page without galleries",
            WarningType::EmptyGalleryPage => "Gallery page without images",
        }
    }
}

impl std::fmt::Display for InfoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::OffsiteGallery => "Offsite gallery skipped",
            InfoType::DuplicateGallery => "Duplicate gallery skipped",
            InfoType::DownloadDownloaded => "Images downloaded",
            InfoType::DownloadUptodate => "Images up to date",
            InfoType::DownloadCached => "Images cached in run",
            InfoType::ItemKept => "Items kept",
            InfoType::ItemDropped => "Items dropped",
        }
    }
}
