use crate::device_display::interface::{DeviceDisplay, SelectOption};
use crate::device_media::interface::MediaStream;
use crate::dual_camera::core::{select_options, Model};
use crate::slot::Slot;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default, PartialEq)]
struct RenderedSlot {
    options: Vec<SelectOption>,
    selected: Option<String>,
    stream: Option<MediaStream>,
}

/// Projects the model onto the display, touching only what changed since the
/// previous render.
#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    rendered: Arc<Mutex<[RenderedSlot; 2]>>,
}

impl Render {
    pub fn new(device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>) -> Self {
        Self {
            device_display,
            rendered: Arc::new(Mutex::new(Default::default())),
        }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let options = select_options(&model.devices);
        let mut rendered = self.rendered.lock().map_err(|_| "Render lock poisoned")?;
        let mut device_display = self
            .device_display
            .lock()
            .map_err(|_| "Display lock poisoned")?;

        for slot in Slot::ALL {
            let state = model.slot(slot);
            let previous = &mut rendered[slot.index()];

            if previous.options != options || previous.selected != state.selected {
                device_display.set_options(slot, &options, state.selected.as_deref())?;
                previous.options = options.clone();
                previous.selected = state.selected.clone();
            }

            if previous.stream != state.stream {
                device_display.bind_video(slot, state.stream.clone())?;
                previous.stream = state.stream.clone();
            }
        }

        Ok(())
    }
}
