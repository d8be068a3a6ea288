use crate::device_media::error::MediaError;
use crate::device_media::interface::{
    DeviceMedia, Frame, MediaDeviceInfo, MediaStream, MediaStreamConstraints, MediaStreamTrack,
    TrackState, VideoConstraint,
};
use crate::library::logger::interface::Logger;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::{Camera, NokhwaError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::JoinHandle;

/// Real cameras through nokhwa. Each stream owns a capture thread that keeps
/// the latest decoded frame until the stream is stopped.
pub struct DeviceMediaNative {
    logger: Arc<dyn Logger + Send + Sync>,
    backend: ApiBackend,
    next_stream_id: AtomicU64,
}

impl DeviceMediaNative {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("device_media").with_namespace("native"),
            backend: ApiBackend::Auto,
            next_stream_id: AtomicU64::new(1),
        }
    }

    fn query(&self) -> Result<Vec<MediaDeviceInfo>, MediaError> {
        let cameras = nokhwa::query(self.backend).map_err(to_media_error)?;
        Ok(cameras
            .iter()
            .map(|info| MediaDeviceInfo::video_input(&info.index().to_string(), &info.human_name()))
            .collect())
    }

    fn resolve_device(&self, constraint: &VideoConstraint) -> Result<MediaDeviceInfo, MediaError> {
        let devices = self.query()?;
        match constraint {
            VideoConstraint::Any => devices
                .into_iter()
                .next()
                .ok_or_else(|| MediaError::NotFound("Requested device not found".to_string())),
            VideoConstraint::ExactDevice(device_id) => devices
                .into_iter()
                .find(|device| &device.device_id == device_id)
                .ok_or_else(|| MediaError::Overconstrained {
                    constraint: "deviceId".to_string(),
                    message: format!("No video input matches deviceId {}", device_id),
                }),
        }
    }
}

impl DeviceMedia for DeviceMediaNative {
    fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, MediaError> {
        let devices = self.query()?;
        let _ = self
            .logger
            .info(&format!("Found {} video inputs", devices.len()));
        Ok(devices)
    }

    fn get_user_media(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<MediaStream, MediaError> {
        let device = self.resolve_device(&constraints.video)?;
        let index = parse_camera_index(&device.device_id);
        let requested = requested_format(constraints);

        let stream_id = self.next_stream_id.fetch_add(1, Ordering::SeqCst);
        let live = Arc::new(AtomicBool::new(true));
        let latest = Arc::new(Mutex::new(None));
        let (opened_tx, opened_rx) = mpsc::sync_channel(1);

        let thread_live = live.clone();
        let thread_latest = latest.clone();
        let logger = self.logger.clone();
        let capture = std::thread::spawn(move || {
            capture_loop(index, requested, opened_tx, thread_live, thread_latest, logger)
        });

        let opened = opened_rx.recv().unwrap_or_else(|_| {
            Err(MediaError::Abort(
                "Capture thread exited before the camera opened".to_string(),
            ))
        });
        if let Err(error) = opened {
            let _ = capture.join();
            return Err(error);
        }

        let _ = self.logger.info(&format!(
            "Opened {} ({})",
            device.device_id, device.label
        ));

        let track = NativeVideoTrack {
            id: format!("native-track-{}", stream_id),
            label: device.label.clone(),
            live,
            latest,
            capture: Mutex::new(Some(capture)),
            logger: self.logger.clone(),
        };

        Ok(MediaStream::new(
            format!("native-stream-{}", stream_id),
            device.device_id,
            vec![Arc::new(track)],
        ))
    }
}

fn capture_loop(
    index: CameraIndex,
    requested: RequestedFormat<'static>,
    opened: mpsc::SyncSender<Result<(), MediaError>>,
    live: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<Frame>>>,
    logger: Arc<dyn Logger + Send + Sync>,
) {
    let mut camera = match Camera::new(index, requested).and_then(|mut camera| {
        camera.open_stream()?;
        Ok(camera)
    }) {
        Ok(camera) => camera,
        Err(error) => {
            let _ = opened.send(Err(to_media_error(error)));
            return;
        }
    };
    let _ = opened.send(Ok(()));

    let mut sequence = 0;
    while live.load(Ordering::SeqCst) {
        let decoded = camera
            .frame()
            .and_then(|buffer| buffer.decode_image::<RgbFormat>());

        match decoded {
            Ok(image) => {
                let frame = Frame {
                    width: image.width(),
                    height: image.height(),
                    rgb: Arc::new(image.into_raw()),
                    sequence,
                };
                sequence += 1;
                if let Ok(mut latest) = latest.lock() {
                    *latest = Some(frame);
                }
            }
            Err(error) => {
                let _ = logger.error(&format!("Frame capture failed: {}", error));
                live.store(false, Ordering::SeqCst);
            }
        }
    }

    if let Err(error) = camera.stop_stream() {
        let _ = logger.error(&format!("Failed to stop camera stream: {}", error));
    }
    if let Ok(mut latest) = latest.lock() {
        *latest = None;
    }
}

fn requested_format(constraints: &MediaStreamConstraints) -> RequestedFormat<'static> {
    match constraints.ideal_resolution {
        Some((width, height)) => {
            let format = CameraFormat::new(
                Resolution::new(width, height),
                FrameFormat::MJPEG,
                constraints.ideal_frame_rate.unwrap_or(30),
            );
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format))
        }
        None => RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
    }
}

fn parse_camera_index(device_id: &str) -> CameraIndex {
    match device_id.parse::<u32>() {
        Ok(index) => CameraIndex::Index(index),
        Err(_) => CameraIndex::String(device_id.to_string()),
    }
}

fn to_media_error(error: NokhwaError) -> MediaError {
    match error {
        NokhwaError::OpenDeviceError(..) | NokhwaError::OpenStreamError(..) => {
            MediaError::NotReadable(error.to_string())
        }
        other => MediaError::Unknown(other.to_string()),
    }
}

struct NativeVideoTrack {
    id: String,
    label: String,
    live: Arc<AtomicBool>,
    latest: Arc<Mutex<Option<Frame>>>,
    capture: Mutex<Option<JoinHandle<()>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl MediaStreamTrack for NativeVideoTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    /// Returns once the capture thread has released the camera, so the same
    /// device can be opened again right away.
    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);

        let capture = match self.capture.lock() {
            Ok(mut capture) => capture.take(),
            Err(_) => None,
        };
        if let Some(capture) = capture {
            if capture.join().is_err() {
                let _ = self
                    .logger
                    .error(&format!("Capture thread for {} panicked", self.id));
            }
        }
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
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }
}
