use crate::device_media::error::MediaError;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaDeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// Snapshot of one device as reported by the backend. `label` may be empty
/// until the backend has been granted access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaDeviceInfo {
    pub device_id: String,
    pub label: String,
    pub kind: MediaDeviceKind,
}

impl MediaDeviceInfo {
    pub fn video_input(device_id: &str, label: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            label: label.to_string(),
            kind: MediaDeviceKind::VideoInput,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoConstraint {
    Any,
    /// The backend must fail rather than substitute another camera.
    ExactDevice(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaStreamConstraints {
    pub video: VideoConstraint,
    pub audio: bool,
    pub ideal_resolution: Option<(u32, u32)>,
    pub ideal_frame_rate: Option<u32>,
}

impl MediaStreamConstraints {
    pub fn any_video() -> Self {
        Self {
            video: VideoConstraint::Any,
            audio: false,
            ideal_resolution: None,
            ideal_frame_rate: None,
        }
    }

    pub fn exact_device(device_id: &str) -> Self {
        Self {
            video: VideoConstraint::ExactDevice(device_id.to_string()),
            ..Self::any_video()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Packed RGB8, `width * height * 3` bytes.
    pub rgb: Arc<Vec<u8>>,
    pub sequence: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackState {
    Live,
    Ended,
}

pub trait MediaStreamTrack: Send + Sync {
    fn id(&self) -> &str;
    fn label(&self) -> &str;
    /// Releases the capture device before returning. Calling it on an ended
    /// track does nothing.
    fn stop(&self);
    fn ready_state(&self) -> TrackState;
    fn latest_frame(&self) -> Option<Frame>;
}

/// Handle to one capture session. Clones share the same tracks.
#[derive(Clone)]
pub struct MediaStream {
    id: String,
    device_id: String,
    tracks: Vec<Arc<dyn MediaStreamTrack>>,
}

impl MediaStream {
    pub fn new(id: String, device_id: String, tracks: Vec<Arc<dyn MediaStreamTrack>>) -> Self {
        Self {
            id,
            device_id,
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn tracks(&self) -> &[Arc<dyn MediaStreamTrack>] {
        &self.tracks
    }

    pub fn stop(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.tracks
            .iter()
            .any(|track| track.ready_state() == TrackState::Live)
    }

    pub fn latest_frame(&self) -> Option<Frame> {
        self.tracks.iter().find_map(|track| track.latest_frame())
    }
}

impl PartialEq for MediaStream {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MediaStream {}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("device_id", &self.device_id)
            .field(
                "tracks",
                &self.tracks.iter().map(|track| track.id()).collect::<Vec<_>>(),
            )
            .field("active", &self.is_active())
            .finish()
    }
}

pub trait DeviceMedia: Send + Sync {
    fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, MediaError>;
    fn get_user_media(&self, constraints: &MediaStreamConstraints)
        -> Result<MediaStream, MediaError>;
}
