use crate::device_media::interface::MediaStream;
use crate::slot::Slot;
use std::error::Error;
use std::sync::mpsc::Receiver;

/// One entry of a camera selection control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceDisplayEvent {
    /// The user picked a different entry in a slot's selection control.
    SelectionChanged { slot: Slot, device_id: String },
    RefreshRequested,
    CloseRequested,
}

/// The surface the picker draws on: two selection controls, two video
/// surfaces and a message area.
pub trait DeviceDisplay: Send + Sync {
    /// Replace every entry of the slot's selection control.
    fn set_options(
        &mut self,
        slot: Slot,
        options: &[SelectOption],
        selected: Option<&str>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Use `stream` as the slot's video source; `None` blanks the surface.
    fn bind_video(
        &mut self,
        slot: Slot,
        stream: Option<MediaStream>,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Replace the message area's text.
    fn show_message(&mut self, message: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn events(&self) -> Receiver<DeviceDisplayEvent>;
}
