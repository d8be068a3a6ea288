use crate::device_media::error::MediaError;
use std::error::Error;

/// Single sink for every failure the picker runs into.
pub trait Reporter: Send + Sync {
    fn report(&self, error: &MediaError) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub fn format_error(error: &MediaError) -> String {
    format!("Error: {} - {}", error.name(), error.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        let error = MediaError::NotAllowed("Permission denied".to_string());

        assert_eq!(
            format_error(&error),
            "Error: NotAllowedError - Permission denied"
        );
    }
}
