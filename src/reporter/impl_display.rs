use crate::device_display::interface::DeviceDisplay;
use crate::device_media::error::MediaError;
use crate::library::logger::interface::Logger;
use crate::reporter::interface::{format_error, Reporter};
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Shows the latest error in the display's message area and logs it.
pub struct ReporterDisplay {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ReporterDisplay {
    pub fn new(
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device_display,
            logger: logger.with_namespace("reporter"),
        }
    }
}

impl Reporter for ReporterDisplay {
    fn report(&self, error: &MediaError) -> Result<(), Box<dyn Error + Send + Sync>> {
        let message = format_error(error);
        self.logger.error(&format!("{} ({:?})", message, error))?;

        let mut device_display = self
            .device_display
            .lock()
            .map_err(|_| "Display lock poisoned")?;
        device_display.show_message(&message)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_display::impl_fake::{DeviceDisplayFake, DisplayCall};
    use crate::library::logger::impl_console::LoggerConsole;

    #[test]
    fn test_report_replaces_message() {
        let logger = Arc::new(LoggerConsole::new(
            chrono::FixedOffset::east_opt(0).unwrap(),
        ));
        let display = Arc::new(Mutex::new(DeviceDisplayFake::new(logger.clone())));
        let reporter = ReporterDisplay::new(display.clone(), logger);

        reporter
            .report(&MediaError::NotReadable("Device in use".to_string()))
            .unwrap();
        reporter
            .report(&MediaError::NotFound("Requested device not found".to_string()))
            .unwrap();

        let display = display.lock().unwrap();
        assert_eq!(
            display.message(),
            Some("Error: NotFoundError - Requested device not found")
        );
        assert_eq!(
            display.calls(),
            &[
                DisplayCall::ShowMessage("Error: NotReadableError - Device in use".to_string()),
                DisplayCall::ShowMessage(
                    "Error: NotFoundError - Requested device not found".to_string()
                ),
            ]
        );
    }
}
