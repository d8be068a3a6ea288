use crate::device_display::interface::{DeviceDisplay, DeviceDisplayEvent, SelectOption};
use crate::device_media::interface::MediaStream;
use crate::library::logger::interface::Logger;
use crate::slot::Slot;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq)]
pub enum DisplayCall {
    SetOptions {
        slot: Slot,
        options: Vec<SelectOption>,
        selected: Option<String>,
    },
    BindVideo {
        slot: Slot,
        stream: Option<MediaStream>,
    },
    ShowMessage(String),
}

/// Records what would have been drawn and lets tests play the user's part.
pub struct DeviceDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    calls: Vec<DisplayCall>,
    options: [Vec<SelectOption>; 2],
    selected: [Option<String>; 2],
    bound: [Option<MediaStream>; 2],
    message: Option<String>,
    event_sender: Arc<Mutex<Option<Sender<DeviceDisplayEvent>>>>,
}

impl DeviceDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("display").with_namespace("fake"),
            calls: Vec::new(),
            options: [Vec::new(), Vec::new()],
            selected: [None, None],
            bound: [None, None],
            message: None,
            event_sender: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }

    pub fn options(&self, slot: Slot) -> &[SelectOption] {
        &self.options[slot.index()]
    }

    pub fn selected(&self, slot: Slot) -> Option<&str> {
        self.selected[slot.index()].as_deref()
    }

    pub fn bound(&self, slot: Slot) -> Option<&MediaStream> {
        self.bound[slot.index()].as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Delivers `event` to the current subscriber. Returns false if nobody
    /// has subscribed yet.
    pub fn emit(&self, event: DeviceDisplayEvent) -> bool {
        match self.event_sender.lock() {
            Ok(sender) => sender
                .as_ref()
                .map(|sender| sender.send(event).is_ok())
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.event_sender
            .lock()
            .map(|sender| sender.is_some())
            .unwrap_or(false)
    }

    /// Drops the subscriber's sender, ending its event stream like a closed
    /// stdin would.
    pub fn close_events(&self) {
        if let Ok(mut sender) = self.event_sender.lock() {
            sender.take();
        }
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn set_options(
        &mut self,
        slot: Slot,
        options: &[SelectOption],
        selected: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!(
            "set_options({}, {} options, {:?})",
            slot.select_id(),
            options.len(),
            selected
        ))?;
        self.options[slot.index()] = options.to_vec();
        self.selected[slot.index()] = selected.map(str::to_string);
        self.calls.push(DisplayCall::SetOptions {
            slot,
            options: options.to_vec(),
            selected: selected.map(str::to_string),
        });
        Ok(())
    }

    fn bind_video(
        &mut self,
        slot: Slot,
        stream: Option<MediaStream>,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("bind_video({}, {:?})", slot.video_id(), stream))?;
        self.bound[slot.index()] = stream.clone();
        self.calls.push(DisplayCall::BindVideo { slot, stream });
        Ok(())
    }

    fn show_message(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!("show_message({})", message))?;
        self.message = Some(message.to_string());
        self.calls
            .push(DisplayCall::ShowMessage(message.to_string()));
        Ok(())
    }

    fn events(&self) -> Receiver<DeviceDisplayEvent> {
        let (tx, rx) = channel();
        if let Ok(mut sender) = self.event_sender.lock() {
            *sender = Some(tx);
        }
        rx
    }
}
