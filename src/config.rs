use crate::device_media::interface::{MediaDeviceInfo, MediaDeviceKind};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    Fake,
    Native,
}

impl FromStr for MediaBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fake" => Ok(MediaBackend::Fake),
            "native" => Ok(MediaBackend::Native),
            other => Err(format!("Unknown media backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Gui,
    Console,
}

impl FromStr for DisplayKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gui" => Ok(DisplayKind::Gui),
            "console" => Ok(DisplayKind::Console),
            other => Err(format!("Unknown display: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub logger_timezone: chrono::FixedOffset,
    pub media_backend: MediaBackend,
    pub display: DisplayKind,
    pub ideal_resolution: Option<(u32, u32)>,
    pub ideal_frame_rate: Option<u32>,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub repaint_interval: Duration,
    pub fake_devices: Vec<MediaDeviceInfo>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logger_timezone: local_offset(),
            media_backend: if cfg!(feature = "native-camera") {
                MediaBackend::Native
            } else {
                MediaBackend::Fake
            },
            display: DisplayKind::Gui,
            ideal_resolution: Some((640, 480)),
            ideal_frame_rate: Some(30),
            window_title: "Dual Camera Picker".to_string(),
            window_size: [1024.0, 480.0],
            repaint_interval: Duration::from_millis(33),
            fake_devices: vec![
                MediaDeviceInfo::video_input("fake-front", "Fake Front Camera"),
                MediaDeviceInfo {
                    device_id: "fake-mic".to_string(),
                    label: "Fake Microphone".to_string(),
                    kind: MediaDeviceKind::AudioInput,
                },
                MediaDeviceInfo::video_input("fake-rear", ""),
                MediaDeviceInfo::video_input("fake-usb", "Fake USB Camera"),
            ],
        }
    }
}

impl Config {
    /// Defaults overridden by `DUAL_CAMERA_*` environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config = Config::default();

        if let Some(backend) = var("DUAL_CAMERA_BACKEND") {
            config.media_backend = backend.parse()?;
        }
        if let Some(display) = var("DUAL_CAMERA_DISPLAY") {
            config.display = display.parse()?;
        }

        let width = var("DUAL_CAMERA_WIDTH").map(|w| w.parse::<u32>()).transpose()?;
        let height = var("DUAL_CAMERA_HEIGHT").map(|h| h.parse::<u32>()).transpose()?;
        match (width, height) {
            (Some(width), Some(height)) => config.ideal_resolution = Some((width, height)),
            (None, None) => {}
            _ => return Err("DUAL_CAMERA_WIDTH and DUAL_CAMERA_HEIGHT must be set together".into()),
        }

        if let Some(fps) = var("DUAL_CAMERA_FPS") {
            config.ideal_frame_rate = Some(fps.parse()?);
        }

        Ok(config)
    }
}

fn local_offset() -> chrono::FixedOffset {
    *chrono::Local::now().offset()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<Config, Box<dyn std::error::Error + Send + Sync>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("DUAL_CAMERA_BACKEND", "fake"),
            ("DUAL_CAMERA_DISPLAY", "Console"),
            ("DUAL_CAMERA_WIDTH", "1280"),
            ("DUAL_CAMERA_HEIGHT", "720"),
            ("DUAL_CAMERA_FPS", "15"),
        ])
        .unwrap();

        assert_eq!(config.media_backend, MediaBackend::Fake);
        assert_eq!(config.display, DisplayKind::Console);
        assert_eq!(config.ideal_resolution, Some((1280, 720)));
        assert_eq!(config.ideal_frame_rate, Some(15));
    }

    #[test]
    fn test_partial_resolution_is_rejected() {
        assert!(from_map(&[("DUAL_CAMERA_WIDTH", "1280")]).is_err());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(from_map(&[("DUAL_CAMERA_BACKEND", "webcam")]).is_err());
    }

    #[test]
    fn test_defaults_without_vars() {
        let config = from_map(&[]).unwrap();

        assert_eq!(config.display, DisplayKind::Gui);
        assert_eq!(config.ideal_resolution, Some((640, 480)));
    }
}
