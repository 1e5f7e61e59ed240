// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the calibration session

use std::io::Write;
use std::sync::{Arc, Mutex};
use vision_calib::errors::{MirrorError, TransportError};
use vision_calib::messages::{
    Encoding, ImageConfig, ImageFrame, LabelConfiguration, MirrorConfig, OmniVisionConfResponse,
    Range, VisionHsvConfig,
};
use vision_calib::mirror::MirrorStepPolicy;
use vision_calib::session::{
    Action, ActiveTimer, CalibrationSession, ConfigEdit, Effect, Event, Indicator, ModeToggle,
    Outbound, Shortcut, SyncState,
};

fn solid_frame(rgb: [u8; 3]) -> ImageFrame {
    ImageFrame {
        width: 4,
        height: 3,
        encoding: Encoding::Rgb8,
        data: rgb.repeat(12),
    }
}

/// In-memory log sink
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    fn error_lines(&self) -> usize {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .filter(|line| line.contains("ERROR"))
            .count()
    }
}

/// Run `f` with every tracing event written to a fresh buffer
fn capture_logs(f: impl FnOnce()) -> LogBuffer {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    buffer
}

fn publishes(effects: &[Effect]) -> Vec<Outbound> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Publish(outbound) => Some(outbound.clone()),
            _ => None,
        })
        .collect()
}

fn rejections(effects: &[Effect]) -> Vec<MirrorError> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::MirrorRejected(err) => Some(err.clone()),
            _ => None,
        })
        .collect()
}

fn send_mirror(session: &mut CalibrationSession, distances: &str, max: u16, step: u16) -> Vec<Effect> {
    session.dispatch(Event::ConfigEdited(ConfigEdit::MaxDistance(max)));
    session.dispatch(Event::ConfigEdited(ConfigEdit::Step(step)));
    session.dispatch(Event::ConfigEdited(ConfigEdit::Distances(distances.to_string())));
    session.dispatch(Event::Action(Action::SendMirror))
}

#[test]
fn test_mirror_scenario_accepted() {
    let mut session = CalibrationSession::default();
    let effects = send_mirror(&mut session, "10,20,30", 30, 10);

    assert!(rejections(&effects).is_empty());
    assert_eq!(
        publishes(&effects),
        vec![Outbound::Mirror(MirrorConfig {
            max_distance: 30,
            step: 10,
            pixel_distances: vec![10, 20, 30],
        })]
    );
    assert_eq!(
        session.calibrator().mirror_configuration().pixel_distances,
        vec![10, 20, 30]
    );
}

#[test]
fn test_mirror_scenario_wrong_sequence() {
    let mut session = CalibrationSession::default();
    let effects = send_mirror(&mut session, "10,30,20", 30, 10);

    assert!(publishes(&effects).is_empty());
    assert_eq!(
        rejections(&effects),
        vec![MirrorError::WrongSequence { index: 1 }]
    );
}

#[test]
fn test_mirror_scenario_wrong_number() {
    let mut session = CalibrationSession::default();
    let effects = send_mirror(&mut session, "10,20", 30, 10);

    assert!(publishes(&effects).is_empty());
    let errors = rejections(&effects);
    assert_eq!(
        errors,
        vec![MirrorError::WrongNumber {
            expected: 3,
            provided: 2
        }]
    );
    assert_eq!(
        errors[0].to_string(),
        "Wrong number of distance values.\n3 arguments needed but 2 were provided"
    );
}

#[test]
fn test_mirror_send_iff_count_and_order_hold() {
    let cases = [
        ("5", 10, 10, true),
        ("5,5", 20, 10, true),
        ("5,4", 20, 10, false),
        ("1,2,3,4", 45, 10, true),
        ("1,2,3", 45, 10, false),
        ("1,2,3,3,9", 50, 10, true),
        ("9,2,3,3,9", 50, 10, false),
    ];

    for (distances, max, step, ok) in cases {
        let mut session = CalibrationSession::default();
        let effects = send_mirror(&mut session, distances, max, step);
        assert_eq!(publishes(&effects).len(), usize::from(ok), "{}", distances);
        assert_eq!(rejections(&effects).len(), usize::from(!ok), "{}", distances);
    }
}

#[test]
fn test_exact_step_policy_rejects_remainder() {
    let mut session = CalibrationSession::new(MirrorStepPolicy::RequireExact);
    let effects = send_mirror(&mut session, "1,2,3,4", 45, 10);
    assert!(publishes(&effects).is_empty());
    assert_eq!(
        rejections(&effects),
        vec![MirrorError::InexactStep {
            max_distance: 45,
            step: 10
        }]
    );
}

#[test]
fn test_toggle_calibration_twice_round_trips() {
    let mut session = CalibrationSession::default();
    let mode = session.mode();
    let timer = mode.active_timer();
    let indicator = mode.indicator();

    session.dispatch(Event::ModeToggled(ModeToggle::Calibration));
    assert_eq!(session.mode().active_timer(), ActiveTimer::Threshold);
    assert_eq!(session.mode().indicator(), Indicator::Calibrating);

    session.dispatch(Event::ModeToggled(ModeToggle::Calibration));
    assert_eq!(session.mode(), mode);
    assert_eq!(session.mode().active_timer(), timer);
    assert_eq!(session.mode().indicator(), indicator);
}

#[test]
fn test_calibration_shortcut_forces_raw_and_grabs() {
    let mut session = CalibrationSession::default();
    session.dispatch(Event::Shortcut(Shortcut::MapMode));

    let effects = session.dispatch(Event::Shortcut(Shortcut::ToggleCalibration));
    assert!(session.mode().calibrating);
    match publishes(&effects).as_slice() {
        [Outbound::ImageRequest(request)] => assert_eq!(request.kind, 1),
        other => panic!("unexpected effects: {:?}", other),
    }
}

#[test]
fn test_display_follows_latest_frame() {
    let mut session = CalibrationSession::default();
    let colors = [[10, 0, 0], [0, 20, 0], [0, 0, 30], [40, 40, 40]];

    for (n, rgb) in colors.iter().enumerate() {
        session.dispatch(Event::FrameArrived(solid_frame(*rgb)));
        assert!(
            session.display().pixels().all(|p| p.0 == *rgb),
            "frame {} not shown",
            n + 1
        );
    }
}

#[test]
fn test_frames_do_not_reach_preview_while_calibrating() {
    let mut session = CalibrationSession::default();
    session.dispatch(Event::ModeToggled(ModeToggle::Calibration));
    let generation = session.display_generation();

    session.dispatch(Event::FrameArrived(solid_frame([1, 2, 3])));
    assert_eq!(session.display_generation(), generation);

    // The next threshold tick renders the newest frame
    session.dispatch(Event::Tick(ActiveTimer::Threshold));
    assert_eq!(session.display().dimensions(), (4, 3));
}

#[test]
fn test_crosshair_only_with_overlay_enabled() {
    let mut session = CalibrationSession::default();
    session.dispatch(Event::FrameArrived(solid_frame([0, 0, 0])));
    session.dispatch(Event::ModeToggled(ModeToggle::Drawing(true)));
    let generation = session.display_generation();

    session.dispatch(Event::Tick(ActiveTimer::Interaction));
    assert_eq!(session.display_generation(), generation);

    session.dispatch(Event::ModeToggled(ModeToggle::DrawOverlay(true)));
    session.dispatch(Event::Tick(ActiveTimer::Interaction));
    assert_ne!(session.display_generation(), generation);
}

#[test]
fn test_stop_always_clears_multiplicity() {
    let mut session = CalibrationSession::default();

    for multiple in [true, false] {
        session.dispatch(Event::ConfigEdited(ConfigEdit::Multiple(multiple)));
        session.dispatch(Event::ConfigEdited(ConfigEdit::Frequency(12)));

        let effects = session.dispatch(Event::Action(Action::Stop));
        match publishes(&effects).as_slice() {
            [Outbound::ImageRequest(request)] => {
                assert!(!request.is_multiple);
                assert_eq!(request.frequency, 12);
            }
            other => panic!("unexpected effects: {:?}", other),
        }
    }
}

#[test]
fn test_feed_shortcut_streams() {
    let mut session = CalibrationSession::default();
    let effects = session.dispatch(Event::Shortcut(Shortcut::Feed));
    match publishes(&effects).as_slice() {
        [Outbound::ImageRequest(request)] => assert!(request.is_multiple),
        other => panic!("unexpected effects: {:?}", other),
    }
}

#[test]
fn test_retrieval_failure_keeps_defaults() {
    let mut session = CalibrationSession::default();
    let controls = session.controls().clone();
    let vision = session.calibrator().lut_configuration();
    let geometry = session.calibrator().image_configuration();

    let effects = session.dispatch(Event::ConfigRetrieved(Err(TransportError::Timeout)));

    assert!(effects.is_empty());
    assert_eq!(session.sync_state(), SyncState::Unsynchronized);
    assert_eq!(session.controls(), &controls);
    assert_eq!(session.calibrator().lut_configuration(), vision);
    assert_eq!(session.calibrator().image_configuration(), geometry);
}

#[test]
fn test_retrieval_failure_logs_one_error() {
    for err in [
        TransportError::Timeout,
        TransportError::ConnectFailed("127.0.0.1:11311: refused".to_string()),
    ] {
        let logs = capture_logs(|| {
            let mut session = CalibrationSession::default();
            session.dispatch(Event::ConfigRetrieved(Err(err.clone())));
        });
        assert_eq!(logs.error_lines(), 1, "{:?}", err);
    }
}

#[test]
fn test_retrieval_populates_widgets() {
    let mut session = CalibrationSession::default();
    let ball = LabelConfiguration {
        h: Range::new(10, 40),
        s: Range::new(100, 255),
        v: Range::new(80, 255),
    };
    let response = OmniVisionConfResponse {
        mirror_conf: MirrorConfig {
            max_distance: 30,
            step: 10,
            pixel_distances: vec![12, 25, 40],
        },
        vision_conf: VisionHsvConfig {
            ball,
            ..Default::default()
        },
        image_conf: ImageConfig {
            center_x: 250,
            center_y: 230,
            tilt: 5,
        },
    };

    session.dispatch(Event::ConfigRetrieved(Ok(response)));
    assert_eq!(session.sync_state(), SyncState::Synchronized);
    assert_eq!(session.controls().distances, "12,25,40");
    assert_eq!(session.controls().step, 10);
    assert_eq!(session.calibrator().image_configuration().center_x, 250);

    session.dispatch(Event::ConfigEdited(ConfigEdit::Label(2)));
    assert_eq!(session.active_label(), ball);
}
