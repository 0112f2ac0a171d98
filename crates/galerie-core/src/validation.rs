//! Validation module
//!
//! Provides validation for user supplied names:
//! - Gallery names: trimmed length bounds and a reserved-name list
//! - Image filenames: minimum length, bare filename (no directory components)

use crate::error::AppError;

/// Minimum gallery name length (after trimming)
pub const MIN_GALLERY_NAME_LENGTH: usize = 3;

/// Maximum gallery name length (after trimming)
pub const MAX_GALLERY_NAME_LENGTH: usize = 15;

/// Minimum stored filename length
pub const MIN_FILENAME_LENGTH: usize = 3;

/// Names that collide with route segments of the HTTP surface
pub const DEFAULT_RESERVED_GALLERY_NAMES: &[&str] = &["gallery", "galleries", "log"];

/// Rules a gallery name must satisfy before it reaches the repository.
#[derive(Debug, Clone)]
pub struct GalleryNamePolicy {
    min_length: usize,
    max_length: usize,
    reserved: Vec<String>,
}

impl Default for GalleryNamePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_RESERVED_GALLERY_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

impl GalleryNamePolicy {
    pub fn new(reserved: Vec<String>) -> Self {
        Self {
            min_length: MIN_GALLERY_NAME_LENGTH,
            max_length: MAX_GALLERY_NAME_LENGTH,
            reserved,
        }
    }

    /// Validate a raw gallery name and return its trimmed form.
    ///
    /// Length is counted in characters, not bytes. Reserved names are matched exactly,
    /// the same way uniqueness is (case-sensitive).
    pub fn validate(&self, raw: &str) -> Result<String, AppError> {
        let name = raw.trim();
        let length = name.chars().count();

        if length < self.min_length || length > self.max_length {
            return Err(AppError::InvalidInput(format!(
                "Gallery name must be between {} and {} characters long, got {}",
                self.min_length, self.max_length, length
            )));
        }

        if self.is_reserved(name) {
            return Err(AppError::InvalidInput(format!(
                "Gallery name '{}' is reserved",
                name
            )));
        }

        Ok(name.to_string())
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.iter().any(|r| r == name)
    }
}

/// Validate an uploaded image filename before it becomes a stored `path`.
///
/// Storage is a single flat directory, so the filename must not contain directory
/// separators or parent references.
pub fn validate_image_filename(filename: &str) -> Result<(), AppError> {
    if filename.chars().count() < MIN_FILENAME_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Filename '{}' must be at least {} characters long",
            filename, MIN_FILENAME_LENGTH
        )));
    }

    if filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0')
    {
        return Err(AppError::InvalidInput(format!(
            "Filename '{}' must not contain path separators",
            filename
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let policy = GalleryNamePolicy::default();
        assert_eq!(policy.validate("  alpha  ").unwrap(), "alpha");
    }

    #[test]
    fn test_name_length_bounds() {
        let policy = GalleryNamePolicy::default();
        assert!(policy.validate("ab").is_err());
        assert!(policy.validate("   ab   ").is_err());
        assert!(policy.validate("abc").is_ok());
        assert!(policy.validate("a".repeat(15).as_str()).is_ok());
        assert!(policy.validate("a".repeat(16).as_str()).is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let policy = GalleryNamePolicy::default();
        // 3 characters, 6 bytes
        assert!(policy.validate("čšž").is_ok());
    }

    #[test]
    fn test_reserved_names_rejected() {
        let policy = GalleryNamePolicy::default();
        for name in ["gallery", "galleries", "log"] {
            match policy.validate(name) {
                Err(AppError::InvalidInput(msg)) => assert!(msg.contains("reserved")),
                other => panic!("expected InvalidInput for {}, got {:?}", name, other),
            }
        }
        // Case-sensitive, like uniqueness
        assert!(policy.validate("Gallery").is_ok());
    }

    #[test]
    fn test_custom_reserved_list() {
        let policy = GalleryNamePolicy::new(vec!["admin".to_string()]);
        assert!(policy.validate("admin").is_err());
        assert!(policy.validate("gallery").is_ok());
    }

    #[test]
    fn test_filename_validation() {
        assert!(validate_image_filename("a.jpg").is_ok());
        assert!(validate_image_filename("ab").is_err());
        assert!(validate_image_filename("../etc.jpg").is_err());
        assert!(validate_image_filename("dir/a.jpg").is_err());
        assert!(validate_image_filename("dir\\a.jpg").is_err());
    }
}
