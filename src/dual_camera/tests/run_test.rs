use crate::config::Config;
use crate::device_display::impl_fake::DeviceDisplayFake;
use crate::device_display::interface::DeviceDisplayEvent;
use crate::device_media::impl_fake::DeviceMediaFake;
use crate::device_media::interface::MediaDeviceInfo;
use crate::dual_camera::core::Phase;
use crate::dual_camera::main::DualCamera;
use crate::dual_camera::tests::fixture::test_logger;
use crate::reporter::impl_display::ReporterDisplay;
use crate::slot::Slot;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn test_run_until_window_closes() {
    let logger = test_logger();
    let device_media = Arc::new(DeviceMediaFake::new(
        logger.clone(),
        vec![
            MediaDeviceInfo::video_input("camA", ""),
            MediaDeviceInfo::video_input("camB", "Logitech"),
        ],
    ));
    let device_display = Arc::new(Mutex::new(DeviceDisplayFake::new(logger.clone())));
    let reporter = Arc::new(ReporterDisplay::new(device_display.clone(), logger.clone()));

    let dual_camera = DualCamera::new(
        Config::default(),
        logger,
        device_media.clone(),
        device_display.clone(),
        reporter,
    );
    let handle = std::thread::spawn(move || dual_camera.run());

    wait_until(|| {
        let display = device_display.lock().unwrap();
        Slot::ALL
            .iter()
            .all(|slot| display.bound(*slot).is_some())
    });

    wait_until(|| {
        device_display
            .lock()
            .unwrap()
            .emit(DeviceDisplayEvent::SelectionChanged {
                slot: Slot::Second,
                device_id: "missing".to_string(),
            })
    });
    wait_until(|| device_display.lock().unwrap().message().is_some());
    assert_eq!(
        device_display.lock().unwrap().message(),
        Some("Error: OverconstrainedError - No video input matches deviceId missing")
    );

    assert!(device_display
        .lock()
        .unwrap()
        .emit(DeviceDisplayEvent::CloseRequested));
    let model = handle.join().unwrap().unwrap();

    assert_eq!(model.phase, Phase::ShuttingDown);
    assert!(device_media
        .opened_streams()
        .iter()
        .all(|stream| !stream.is_active()));
}

#[test]
fn test_run_stops_when_display_events_end() {
    let logger = test_logger();
    let device_media = Arc::new(DeviceMediaFake::new(
        logger.clone(),
        vec![MediaDeviceInfo::video_input("camA", "")],
    ));
    let device_display = Arc::new(Mutex::new(DeviceDisplayFake::new(logger.clone())));
    let reporter = Arc::new(ReporterDisplay::new(device_display.clone(), logger.clone()));

    let dual_camera = DualCamera::new(
        Config::default(),
        logger,
        device_media.clone(),
        device_display.clone(),
        reporter,
    );
    let handle = std::thread::spawn(move || dual_camera.run());

    wait_until(|| {
        let display = device_display.lock().unwrap();
        display.is_subscribed() && display.bound(Slot::First).is_some()
    });

    device_display.lock().unwrap().close_events();
    wait_until(|| handle.is_finished());
    let model = handle.join().unwrap().unwrap();

    assert_eq!(model.phase, Phase::ShuttingDown);
    assert!(device_media
        .opened_streams()
        .iter()
        .all(|stream| !stream.is_active()));
}
