use crate::config::Config;
use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent};
use crate::device_media::interface::{DeviceMedia, MediaStreamConstraints};
use crate::dual_camera::core::{Effect, Msg};
use crate::library::logger::interface::Logger;
use crate::reporter::interface::Reporter;
use std::sync::mpsc::{SendError, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct RunEffect {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    device_media: Arc<dyn DeviceMedia + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    reporter: Arc<dyn Reporter + Send + Sync>,
    event_sender: Sender<Msg>,
}

impl RunEffect {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_media: Arc<dyn DeviceMedia + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        reporter: Arc<dyn Reporter + Send + Sync>,
        event_sender: Sender<Msg>,
    ) -> Self {
        Self {
            config,
            logger: logger.with_namespace("effect"),
            device_media,
            device_display,
            reporter,
            event_sender,
        }
    }

    fn constraints(&self, base: MediaStreamConstraints) -> MediaStreamConstraints {
        MediaStreamConstraints {
            ideal_resolution: self.config.ideal_resolution,
            ideal_frame_rate: self.config.ideal_frame_rate,
            ..base
        }
    }

    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::SubscribeToDisplayEvents => {
                let events = match self.device_display.lock() {
                    Ok(device_display) => device_display.events(),
                    Err(_) => {
                        let _ = self.logger.error("Display lock poisoned");
                        return;
                    }
                };
                for event in events {
                    let msg = match event {
                        DeviceDisplayEvent::SelectionChanged { slot, device_id } => {
                            Msg::DeviceSelected { slot, device_id }
                        }
                        DeviceDisplayEvent::RefreshRequested => Msg::RefreshRequested,
                        DeviceDisplayEvent::CloseRequested => Msg::ShutdownRequested,
                    };
                    if self.event_sender.send(msg).is_err() {
                        return;
                    }
                }
                let _ = self.logger.info("Display events closed");
                let _ = self.event_sender.send(Msg::ShutdownRequested);
            }
            Effect::RequestPermission => {
                let probe = self
                    .device_media
                    .get_user_media(&MediaStreamConstraints::any_video())
                    .map(|stream| stream.stop());
                let _ = self.event_sender.send(Msg::PermissionDone(probe));
            }
            Effect::EnumerateDevices => {
                let devices = self.device_media.enumerate_devices();
                let _ = self.event_sender.send(Msg::EnumerateDone(devices));
            }
            Effect::StartStream {
                slot,
                device_id,
                generation,
                replacing,
            } => {
                if let Some(stream) = replacing {
                    stream.stop();
                }
                let result = self
                    .device_media
                    .get_user_media(&self.constraints(MediaStreamConstraints::exact_device(
                        &device_id,
                    )));
                let sent = self.event_sender.send(Msg::StreamStartDone {
                    slot,
                    generation,
                    result,
                });
                if let Err(SendError(Msg::StreamStartDone {
                    result: Ok(stream), ..
                })) = sent
                {
                    stream.stop();
                }
            }
            Effect::StopStream { stream } => {
                stream.stop();
            }
            Effect::Report { error } => {
                if let Err(e) = self.reporter.report(&error) {
                    let _ = self
                        .logger
                        .error(&format!("Failed to report {:?}: {}", error, e));
                }
            }
        }
    }
}
