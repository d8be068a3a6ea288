use crate::config::Config;
use crate::device_display::interface::DeviceDisplay;
use crate::device_media::interface::DeviceMedia;
use crate::dual_camera::core::{init, transition, Effect, Model, Msg, Phase};
use crate::dual_camera::render::Render;
use crate::dual_camera::run_effect::RunEffect;
use crate::library::logger::interface::Logger;
use crate::reporter::interface::Reporter;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};

/// Owns the picker's state. Every message is applied on the thread running
/// [`DualCamera::run`]; effects run on their own threads and answer by message.
pub struct DualCamera {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    event_receiver: Receiver<Msg>,
    run_effect: RunEffect,
    render: Render,
}

impl DualCamera {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_media: Arc<dyn DeviceMedia + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        reporter: Arc<dyn Reporter + Send + Sync>,
    ) -> Self {
        let (event_sender, event_receiver) = channel();
        let logger = logger.with_namespace("dual_camera");

        Self {
            run_effect: RunEffect::new(
                config.clone(),
                logger.clone(),
                device_media,
                device_display.clone(),
                reporter,
                event_sender,
            ),
            render: Render::new(device_display),
            config,
            logger,
            event_receiver,
        }
    }

    /// Processes messages until shutdown is requested, then stops every stream
    /// and returns the final model.
    pub fn run(&self) -> Result<Model, Box<dyn std::error::Error + Send + Sync>> {
        let (mut model, effects) = init();

        self.execute_effects(effects);

        loop {
            let msg = self.event_receiver.recv()?;

            self.logger.info(&format!("msg: {:?}", msg))?;

            let (new_model, effects) = transition(&self.config, model, msg);
            model = new_model;

            self.logger
                .info(&format!("model: {:?} effects: {:?}", model, effects))?;

            if let Err(e) = self.render.render(&model) {
                self.logger.error(&format!("Render failed: {}", e))?;
            }

            if model.phase == Phase::ShuttingDown {
                for effect in effects {
                    self.run_effect.run_effect(effect);
                }
                self.logger.info("Shut down")?;
                return Ok(model);
            }

            self.execute_effects(effects);
        }
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            let run_effect = self.run_effect.clone();
            std::thread::spawn(move || run_effect.run_effect(effect));
        }
    }
}
