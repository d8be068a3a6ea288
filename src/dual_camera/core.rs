use crate::config::Config;
use crate::device_display::interface::SelectOption;
use crate::device_media::error::MediaError;
use crate::device_media::interface::{MediaDeviceInfo, MediaDeviceKind, MediaStream};
use crate::slot::Slot;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Bootstrapping,
    Enumerating,
    Ready,
    /// The permission probe failed; nothing else starts until a refresh.
    Failed,
    ShuttingDown,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SlotState {
    /// Device the slot was last asked to show.
    pub selected: Option<String>,
    pub stream: Option<MediaStream>,
    /// Id of the latest request issued for this slot. Results tagged with an
    /// older generation are discarded.
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Model {
    pub phase: Phase,
    pub devices: Vec<MediaDeviceInfo>,
    pub slots: [SlotState; 2],
}

impl Model {
    pub fn slot(&self, slot: Slot) -> &SlotState {
        &self.slots[slot.index()]
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        &mut self.slots[slot.index()]
    }
}

#[derive(Debug)]
pub enum Msg {
    PermissionDone(Result<(), MediaError>),
    EnumerateDone(Result<Vec<MediaDeviceInfo>, MediaError>),
    DeviceSelected {
        slot: Slot,
        device_id: String,
    },
    StreamStartDone {
        slot: Slot,
        generation: u64,
        result: Result<MediaStream, MediaError>,
    },
    RefreshRequested,
    ShutdownRequested,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    SubscribeToDisplayEvents,
    RequestPermission,
    EnumerateDevices,
    /// Stops `replacing` (if any), then opens `device_id` for `slot`.
    StartStream {
        slot: Slot,
        device_id: String,
        generation: u64,
        replacing: Option<MediaStream>,
    },
    StopStream {
        stream: MediaStream,
    },
    Report {
        error: MediaError,
    },
}

pub fn init() -> (Model, Vec<Effect>) {
    (
        Model::default(),
        vec![Effect::SubscribeToDisplayEvents, Effect::RequestPermission],
    )
}

/// Options for a camera selection control, in enumeration order. Devices
/// without a label are named by their 1-based position.
pub fn select_options(devices: &[MediaDeviceInfo]) -> Vec<SelectOption> {
    devices
        .iter()
        .enumerate()
        .map(|(idx, device)| SelectOption {
            value: device.device_id.clone(),
            text: if device.label.is_empty() {
                format!("Camera {}", idx + 1)
            } else {
                device.label.clone()
            },
        })
        .collect()
}

pub fn video_inputs(devices: Vec<MediaDeviceInfo>) -> Vec<MediaDeviceInfo> {
    devices
        .into_iter()
        .filter(|device| device.kind == MediaDeviceKind::VideoInput)
        .collect()
}

pub fn start_stream(model: &mut Model, slot: Slot, device_id: String) -> Effect {
    let state = model.slot_mut(slot);
    state.generation += 1;
    state.selected = Some(device_id.clone());

    Effect::StartStream {
        slot,
        device_id,
        generation: state.generation,
        replacing: state.stream.take(),
    }
}

/// Empties `slot` if its selected device is no longer enumerated, returning
/// the stream that has to be stopped.
fn release_missing(model: &mut Model, slot: Slot) -> Option<MediaStream> {
    let present = {
        let selected = model.slot(slot).selected.as_deref();
        model
            .devices
            .iter()
            .any(|device| Some(device.device_id.as_str()) == selected)
    };
    let state = model.slot_mut(slot);
    if present || state.selected.is_none() {
        return None;
    }

    state.generation += 1;
    state.selected = None;
    state.stream.take()
}

pub fn transition(_config: &Config, model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    let mut model = model;

    if model.phase == Phase::ShuttingDown {
        return match msg {
            Msg::StreamStartDone {
                result: Ok(stream), ..
            } => (model, vec![Effect::StopStream { stream }]),
            _ => (model, vec![]),
        };
    }

    match msg {
        Msg::PermissionDone(Ok(())) => {
            model.phase = Phase::Enumerating;
            (model, vec![Effect::EnumerateDevices])
        }
        Msg::PermissionDone(Err(error)) => {
            model.phase = Phase::Failed;
            (model, vec![Effect::Report { error }])
        }

        Msg::EnumerateDone(Ok(devices)) => {
            model.phase = Phase::Ready;
            model.devices = video_inputs(devices);

            let auto_start: Vec<(Slot, String)> = Slot::ALL
                .into_iter()
                .zip(model.devices.iter())
                .map(|(slot, device)| (slot, device.device_id.clone()))
                .collect();

            let mut effects: Vec<Effect> = auto_start
                .into_iter()
                .map(|(slot, device_id)| start_stream(&mut model, slot, device_id))
                .collect();

            for slot in Slot::ALL.into_iter().skip(model.devices.len()) {
                if let Some(stream) = release_missing(&mut model, slot) {
                    effects.push(Effect::StopStream { stream });
                }
            }

            (model, effects)
        }
        Msg::EnumerateDone(Err(error)) => {
            model.phase = Phase::Ready;
            (model, vec![Effect::Report { error }])
        }

        Msg::DeviceSelected { slot, device_id } => {
            let effect = start_stream(&mut model, slot, device_id);
            (model, vec![effect])
        }

        Msg::StreamStartDone {
            slot,
            generation,
            result,
        } => {
            let state = model.slot_mut(slot);
            if generation != state.generation {
                return match result {
                    Ok(stream) => (model, vec![Effect::StopStream { stream }]),
                    Err(_) => (model, vec![]),
                };
            }

            match result {
                Ok(stream) => {
                    state.stream = Some(stream);
                    (model, vec![])
                }
                Err(error) => {
                    state.stream = None;
                    (model, vec![Effect::Report { error }])
                }
            }
        }

        Msg::RefreshRequested => match model.phase {
            Phase::Ready => {
                model.phase = Phase::Enumerating;
                (model, vec![Effect::EnumerateDevices])
            }
            Phase::Failed => {
                model.phase = Phase::Bootstrapping;
                (model, vec![Effect::RequestPermission])
            }
            _ => (model, vec![]),
        },

        Msg::ShutdownRequested => {
            model.phase = Phase::ShuttingDown;
            let effects = model
                .slots
                .iter_mut()
                .filter_map(|state| {
                    state.generation += 1;
                    state.stream.take()
                })
                .map(|stream| Effect::StopStream { stream })
                .collect();
            (model, effects)
        }
    }
}
