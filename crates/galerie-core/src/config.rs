//! Configuration module
//!
//! This module provides configuration structures for the API and services, including
//! the document store, the image directory, upload limits, thumbnail bounds and the
//! EXIF tag allow-list.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::store_backend::DocumentStoreBackend;
use crate::validation::DEFAULT_RESERVED_GALLERY_NAMES;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const IMAGE_FOLDER: &str = "./images";
const IMAGE_MAX_SIZE_MB: usize = 10;
const THUMBNAIL_MIN_DIMENSION: u32 = 200;
const THUMBNAIL_MAX_DIMENSION: u32 = 2000;
const THUMBNAIL_JPEG_QUALITY: u8 = 85;

/// EXIF tags extracted from uploads unless `EXIF_TAGS` overrides them.
pub const DEFAULT_EXIF_TAGS: &[&str] = &[
    "Make",
    "Model",
    "FileSource",
    "ExifImageWidth",
    "ExifImageHeight",
    "FocalLength",
    "FNumber",
    "ShutterSpeedValue",
    "ISO",
    "Flash",
    "DateTimeOriginal",
    "CreateDate",
    "GPSLatitude",
    "GPSLongitude",
];

/// Namespace in which an uploaded filename must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameScope {
    /// No two images anywhere may share a stored filename
    System,
    /// Only images of the same gallery are compared; other galleries may share the file
    Gallery,
}

impl FromStr for FilenameScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(FilenameScope::System),
            "gallery" => Ok(FilenameScope::Gallery),
            _ => Err(anyhow::anyhow!(
                "Invalid DUPLICATE_FILENAME_SCOPE: {}. Must be 'system' or 'gallery'",
                s
            )),
        }
    }
}

/// Base configuration shared by the server and its collaborators
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
    pub log_format: String,
}

/// Gallery service configuration
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    pub base: BaseConfig,
    pub document_store: DocumentStoreBackend,
    pub database_url: Option<String>,
    // Image artifact storage
    pub image_folder: PathBuf,
    pub default_preview_path: PathBuf,
    // Uploads
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub filename_scope: FilenameScope,
    pub reserved_gallery_names: Vec<String>,
    // Thumbnails
    pub thumbnail_min_dimension: u32,
    pub thumbnail_max_dimension: u32,
    pub thumbnail_jpeg_quality: u8,
    // Metadata extraction
    pub exif_tags: Vec<String>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let image_folder = PathBuf::from(IMAGE_FOLDER);
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                environment: "development".to_string(),
                log_format: "compact".to_string(),
            },
            document_store: DocumentStoreBackend::Memory,
            database_url: None,
            default_preview_path: default_preview_for(&image_folder),
            image_folder,
            max_file_size_bytes: IMAGE_MAX_SIZE_MB * 1024 * 1024,
            allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            filename_scope: FilenameScope::System,
            reserved_gallery_names: DEFAULT_RESERVED_GALLERY_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            thumbnail_min_dimension: THUMBNAIL_MIN_DIMENSION,
            thumbnail_max_dimension: THUMBNAIL_MAX_DIMENSION,
            thumbnail_jpeg_quality: THUMBNAIL_JPEG_QUALITY,
            exif_tags: DEFAULT_EXIF_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The default preview image lives one level above the image folder.
fn default_preview_for(image_folder: &std::path::Path) -> PathBuf {
    image_folder.join("..").join("default.jpg")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl GalleryConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins: split_list(&cors_origins_str),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "compact".to_string())
                .to_lowercase(),
        };

        let document_store = match env::var("DOCUMENT_STORE") {
            Ok(value) => value.parse()?,
            Err(_) => DocumentStoreBackend::Postgres,
        };

        let image_folder =
            PathBuf::from(env::var("IMAGE_FOLDER").unwrap_or_else(|_| IMAGE_FOLDER.to_string()));
        let default_preview_path = env::var("DEFAULT_PREVIEW_IMAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_preview_for(&image_folder));

        let max_file_size_mb = env::var("IMAGE_MAX_SIZE")
            .unwrap_or_else(|_| IMAGE_MAX_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(IMAGE_MAX_SIZE_MB);

        let filename_scope = match env::var("DUPLICATE_FILENAME_SCOPE") {
            Ok(value) => value.parse()?,
            Err(_) => FilenameScope::System,
        };

        let reserved_gallery_names = env::var("RESERVED_GALLERY_NAMES")
            .map(|s| split_list(&s))
            .unwrap_or_else(|_| {
                DEFAULT_RESERVED_GALLERY_NAMES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let exif_tags = env::var("EXIF_TAGS")
            .map(|s| split_list(&s))
            .unwrap_or_else(|_| DEFAULT_EXIF_TAGS.iter().map(|s| s.to_string()).collect());

        Ok(Self {
            base,
            document_store,
            database_url: env::var("DATABASE_URL").ok(),
            image_folder,
            default_preview_path,
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
            filename_scope,
            reserved_gallery_names,
            thumbnail_min_dimension: env::var("THUMBNAIL_MIN_DIMENSION")
                .unwrap_or_else(|_| THUMBNAIL_MIN_DIMENSION.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_MIN_DIMENSION),
            thumbnail_max_dimension: env::var("THUMBNAIL_MAX_DIMENSION")
                .unwrap_or_else(|_| THUMBNAIL_MAX_DIMENSION.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_MAX_DIMENSION),
            thumbnail_jpeg_quality: env::var("THUMBNAIL_JPEG_QUALITY")
                .unwrap_or_else(|_| THUMBNAIL_JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_JPEG_QUALITY),
            exif_tags,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.document_store == DocumentStoreBackend::Postgres {
            let url = self.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL must be set when using the postgres document store")
            })?;
            if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("IMAGE_MAX_SIZE must be greater than zero"));
        }

        if self.thumbnail_min_dimension == 0
            || self.thumbnail_min_dimension > self.thumbnail_max_dimension
        {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_MIN_DIMENSION ({}) must be positive and not exceed THUMBNAIL_MAX_DIMENSION ({})",
                self.thumbnail_min_dimension,
                self.thumbnail_max_dimension
            ));
        }

        if self.thumbnail_jpeg_quality == 0 || self.thumbnail_jpeg_quality > 100 {
            return Err(anyhow::anyhow!(
                "THUMBNAIL_JPEG_QUALITY must be between 1 and 100"
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GalleryConfig>);

impl Config {
    fn as_gallery(&self) -> &GalleryConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = GalleryConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_gallery().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        self.as_gallery().is_production()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_gallery().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_gallery().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_gallery().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_gallery().base.db_timeout_seconds
    }

    pub fn environment(&self) -> &str {
        &self.as_gallery().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_gallery().base.log_format
    }

    pub fn document_store(&self) -> DocumentStoreBackend {
        self.as_gallery().document_store
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_gallery().database_url.as_deref()
    }

    pub fn image_folder(&self) -> &std::path::Path {
        &self.as_gallery().image_folder
    }

    pub fn default_preview_path(&self) -> &std::path::Path {
        &self.as_gallery().default_preview_path
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_gallery().max_file_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.as_gallery().allowed_content_types
    }

    pub fn filename_scope(&self) -> FilenameScope {
        self.as_gallery().filename_scope
    }

    pub fn reserved_gallery_names(&self) -> &[String] {
        &self.as_gallery().reserved_gallery_names
    }

    pub fn thumbnail_min_dimension(&self) -> u32 {
        self.as_gallery().thumbnail_min_dimension
    }

    pub fn thumbnail_max_dimension(&self) -> u32 {
        self.as_gallery().thumbnail_max_dimension
    }

    pub fn thumbnail_jpeg_quality(&self) -> u8 {
        self.as_gallery().thumbnail_jpeg_quality
    }

    pub fn exif_tags(&self) -> &[String] {
        &self.as_gallery().exif_tags
    }
}

impl From<GalleryConfig> for Config {
    fn from(config: GalleryConfig) -> Self {
        Config(Box::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::from(GalleryConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.filename_scope(), FilenameScope::System);
        assert_eq!(config.exif_tags().len(), DEFAULT_EXIF_TAGS.len());
    }

    #[test]
    fn test_default_preview_is_next_to_image_folder() {
        let config = GalleryConfig::default();
        assert_eq!(
            config.default_preview_path,
            PathBuf::from("./images").join("..").join("default.jpg")
        );
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let mut config = GalleryConfig {
            document_store: DocumentStoreBackend::Postgres,
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());

        config.database_url = Some("mysql://localhost/galerie".to_string());
        assert!(config.validate().is_err());

        config.database_url = Some("postgresql://localhost/galerie".to_string());
        assert!(config.validate().is_ok());

        config.database_url = Some("postgres://localhost/galerie".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_thumbnail_bounds_rejected() {
        let config = GalleryConfig {
            thumbnail_min_dimension: 2000,
            thumbnail_max_dimension: 200,
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut config = GalleryConfig::default();
        config.base.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.base.cors_origins = vec!["https://photos.example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_filename_scope_parse() {
        assert_eq!(
            "Gallery".parse::<FilenameScope>().unwrap(),
            FilenameScope::Gallery
        );
        assert!("global".parse::<FilenameScope>().is_err());
    }

    #[test]
    fn test_split_list_skips_empty_entries() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
    }
}
