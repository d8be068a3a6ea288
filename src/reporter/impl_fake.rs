use crate::device_media::error::MediaError;
use crate::reporter::interface::Reporter;
use std::error::Error;
use std::sync::Mutex;

#[derive(Default)]
pub struct ReporterFake {
    reported: Mutex<Vec<MediaError>>,
}

impl ReporterFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> Vec<MediaError> {
        self.reported
            .lock()
            .map(|reported| reported.clone())
            .unwrap_or_default()
    }
}

impl Reporter for ReporterFake {
    fn report(&self, error: &MediaError) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.reported
            .lock()
            .map_err(|_| "Reporter lock poisoned")?
            .push(error.clone());
        Ok(())
    }
}
