use config::{Config, DisplayKind, MediaBackend};
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::{run_window, DeviceDisplayGui};
use device_display::interface::DeviceDisplay;
use device_media::impl_fake::DeviceMediaFake;
use device_media::interface::DeviceMedia;
use dual_camera::main::DualCamera;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use reporter::impl_display::ReporterDisplay;
use std::sync::{Arc, Mutex};

mod config;
mod device_display;
mod device_media;
mod dual_camera;
mod library;
mod reporter;
mod slot;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let device_media = new_device_media(&config, logger.clone())?;

    match config.display {
        DisplayKind::Gui => {
            let gui = DeviceDisplayGui::new(config.repaint_interval);
            let window = gui.window();
            let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(gui));

            let dual_camera = new_dual_camera(&config, logger.clone(), device_media, device_display);
            let handle = std::thread::spawn(move || dual_camera.run());

            run_window(window, &config.window_title, config.window_size)?;

            match handle.join() {
                Ok(result) => {
                    result?;
                }
                Err(_) => logger.error("Controller thread panicked")?,
            }
        }
        DisplayKind::Console => {
            let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(DeviceDisplayConsole::new()));

            new_dual_camera(&config, logger, device_media, device_display).run()?;
        }
    }

    Ok(())
}

fn new_dual_camera(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_media: Arc<dyn DeviceMedia + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
) -> DualCamera {
    let reporter = Arc::new(ReporterDisplay::new(device_display.clone(), logger.clone()));
    DualCamera::new(config.clone(), logger, device_media, device_display, reporter)
}

fn new_device_media(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn DeviceMedia + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
    match config.media_backend {
        MediaBackend::Fake => Ok(Arc::new(DeviceMediaFake::new(
            logger,
            config.fake_devices.clone(),
        ))),
        #[cfg(feature = "native-camera")]
        MediaBackend::Native => Ok(Arc::new(
            device_media::impl_native::DeviceMediaNative::new(logger),
        )),
        #[cfg(not(feature = "native-camera"))]
        MediaBackend::Native => {
            Err("Native cameras need the `native-camera` feature".into())
        }
    }
}
