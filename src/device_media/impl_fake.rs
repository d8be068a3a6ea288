use crate::device_media::error::MediaError;
use crate::device_media::interface::{
    DeviceMedia, Frame, MediaDeviceInfo, MediaDeviceKind, MediaStream, MediaStreamConstraints,
    MediaStreamTrack, TrackState, VideoConstraint,
};
use crate::library::logger::interface::Logger;
use rand::Rng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaCall {
    EnumerateDevices,
    GetUserMedia(MediaStreamConstraints),
}

/// Scriptable media backend. Serves synthetic test-pattern streams for the
/// configured devices and records every call.
pub struct DeviceMediaFake {
    logger: Arc<dyn Logger + Send + Sync>,
    devices: Vec<MediaDeviceInfo>,
    frame_size: (u32, u32),
    permission_error: Option<MediaError>,
    enumerate_error: Option<MediaError>,
    device_errors: HashMap<String, MediaError>,
    calls: Mutex<Vec<MediaCall>>,
    opened: Mutex<Vec<MediaStream>>,
    active_at_requests: Mutex<Vec<Vec<MediaStream>>>,
}

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

impl DeviceMediaFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, devices: Vec<MediaDeviceInfo>) -> Self {
        Self {
            logger: logger.with_namespace("device_media").with_namespace("fake"),
            devices,
            frame_size: (320, 240),
            permission_error: None,
            enumerate_error: None,
            device_errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
            active_at_requests: Mutex::new(Vec::new()),
        }
    }

    /// Every capture request fails with `error`, like a denied permission prompt.
    #[allow(dead_code)]
    pub fn with_permission_error(mut self, error: MediaError) -> Self {
        self.permission_error = Some(error);
        self
    }

    #[allow(dead_code)]
    pub fn with_enumerate_error(mut self, error: MediaError) -> Self {
        self.enumerate_error = Some(error);
        self
    }

    /// Exact requests for `device_id` fail with `error`, e.g. a busy camera.
    #[allow(dead_code)]
    pub fn with_device_error(mut self, device_id: &str, error: MediaError) -> Self {
        self.device_errors.insert(device_id.to_string(), error);
        self
    }

    #[allow(dead_code)]
    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_size = (width.max(1), height.max(1));
        self
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Streams handed out so far, in order, including the permission probe.
    #[allow(dead_code)]
    pub fn opened_streams(&self) -> Vec<MediaStream> {
        self.opened
            .lock()
            .map(|opened| opened.clone())
            .unwrap_or_default()
    }

    /// For each `get_user_media` call, the streams that were still live when
    /// it arrived.
    #[allow(dead_code)]
    pub fn active_at_requests(&self) -> Vec<Vec<MediaStream>> {
        self.active_at_requests
            .lock()
            .map(|active| active.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: MediaCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn resolve_device(
        &self,
        constraint: &VideoConstraint,
    ) -> Result<(usize, &MediaDeviceInfo), MediaError> {
        let mut video_inputs = self
            .devices
            .iter()
            .filter(|device| device.kind == MediaDeviceKind::VideoInput)
            .enumerate();

        match constraint {
            VideoConstraint::Any => video_inputs
                .next()
                .ok_or_else(|| MediaError::NotFound("Requested device not found".to_string())),
            VideoConstraint::ExactDevice(device_id) => {
                if let Some(error) = self.device_errors.get(device_id) {
                    return Err(error.clone());
                }
                video_inputs
                    .find(|(_, device)| &device.device_id == device_id)
                    .ok_or_else(|| MediaError::Overconstrained {
                        constraint: "deviceId".to_string(),
                        message: format!("No video input matches deviceId {}", device_id),
                    })
            }
        }
    }
}

impl DeviceMedia for DeviceMediaFake {
    fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, MediaError> {
        self.record(MediaCall::EnumerateDevices);
        let _ = self.logger.info("Enumerating devices...");

        if let Some(error) = &self.enumerate_error {
            return Err(error.clone());
        }

        Ok(self.devices.clone())
    }

    fn get_user_media(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<MediaStream, MediaError> {
        self.record(MediaCall::GetUserMedia(constraints.clone()));
        let active: Vec<MediaStream> = self
            .opened_streams()
            .into_iter()
            .filter(|stream| stream.is_active())
            .collect();
        if let Ok(mut active_at_requests) = self.active_at_requests.lock() {
            active_at_requests.push(active);
        }
        let _ = self
            .logger
            .info(&format!("get_user_media({:?})", constraints.video));

        if let Some(error) = &self.permission_error {
            return Err(error.clone());
        }

        let (position, device) = self.resolve_device(&constraints.video)?;
        let (width, height) = constraints.ideal_resolution.unwrap_or(self.frame_size);

        let stream_id = NEXT_STREAM_ID.fetch_add(1, Ordering::SeqCst);
        let track = FakeVideoTrack::new(
            format!("fake-track-{}", stream_id),
            device.label.clone(),
            width.max(1),
            height.max(1),
            position,
        );
        let stream = MediaStream::new(
            format!("fake-stream-{}", stream_id),
            device.device_id.clone(),
            vec![Arc::new(track)],
        );

        if let Ok(mut opened) = self.opened.lock() {
            opened.push(stream.clone());
        }

        Ok(stream)
    }
}

struct FakeVideoTrack {
    id: String,
    label: String,
    width: u32,
    height: u32,
    tint: [u8; 3],
    started: Instant,
    live: AtomicBool,
    sequence: AtomicU64,
}

const TINTS: [[u8; 3]; 4] = [[40, 90, 160], [160, 70, 40], [50, 140, 70], [130, 60, 140]];

impl FakeVideoTrack {
    fn new(id: String, label: String, width: u32, height: u32, position: usize) -> Self {
        Self {
            id,
            label,
            width,
            height,
            tint: TINTS[position % TINTS.len()],
            started: Instant::now(),
            live: AtomicBool::new(true),
            sequence: AtomicU64::new(0),
        }
    }

    fn render_pattern(&self) -> Vec<u8> {
        let mut rng = rand::rng();
        let bar_width = (self.width / 16).max(1);
        let bar_x = (self.started.elapsed().as_millis() / 8) as u32 % self.width;

        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);
        for y in 0..self.height {
            let shade = (y * 255 / self.height) as u8 / 2;
            for x in 0..self.width {
                let on_bar = x >= bar_x && x < bar_x + bar_width;
                let noise: u8 = rng.random_range(0..16);
                for channel in self.tint {
                    let value = if on_bar {
                        240
                    } else {
                        channel.saturating_add(shade)
                    };
                    rgb.push(value.saturating_add(noise));
                }
            }
        }
        rgb
    }
}

impl MediaStreamTrack for FakeVideoTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn ready_state(&self) -> TrackState {
        if self.live.load(Ordering::SeqCst) {
            TrackState::Live
        } else {
            TrackState::Ended
        }
    }

    fn latest_frame(&self) -> Option<Frame> {
        if !self.live.load(Ordering::SeqCst) {
            return None;
        }

        Some(Frame {
            width: self.width,
            height: self.height,
            rgb: Arc::new(self.render_pattern()),
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst),
        })
    }
}
