// Synthetic-clock tests for the frame pacer.

use cube_core::{FramePacer, PacerDecision, SAMPLE_WINDOW_SECS};

fn ready_ticks(decision: PacerDecision) -> Option<u32> {
    match decision {
        PacerDecision::Ready { delta_ticks } => Some(delta_ticks),
        PacerDecision::Wait { .. } => None,
    }
}

#[test]
fn rejects_non_positive_target_fps() {
    assert!(FramePacer::new(0.0).is_err());
    assert!(FramePacer::new(-30.0).is_err());
    assert!(FramePacer::new(f64::NAN).is_err());
    assert!(FramePacer::new(60.0).is_ok());
}

#[test]
fn first_observation_waits() {
    // The first time seeds the timer; delta is 0, so the decision is Wait.
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(123.456)).is_none());
}

#[test]
fn below_interval_never_ready() {
    // 10 fps target: increments of 10 ms stay below the 100 ms interval
    // until the cumulative delta crosses it.
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(0.0)).is_none());
    for step in 1..10 {
        let now = f64::from(step) * 0.01;
        assert!(
            ready_ticks(pacer.poll(now)).is_none(),
            "unexpected Ready at t={now}"
        );
    }
    // Cumulative delta reaches the interval.
    assert_eq!(ready_ticks(pacer.poll(0.1)), Some(1));
}

#[test]
fn exactly_one_ready_per_interval_crossed() {
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(0.0)).is_none());
    assert_eq!(ready_ticks(pacer.poll(0.1)), Some(1));
    // Same instant again: the interval was consumed, so we wait.
    assert!(ready_ticks(pacer.poll(0.1)).is_none());
    assert!(ready_ticks(pacer.poll(0.15)).is_none());
    assert_eq!(ready_ticks(pacer.poll(0.21)), Some(1));
}

#[test]
fn last_frame_time_advances_by_real_elapsed_time() {
    // After a late frame at t=0.13 the next interval is measured from 0.13,
    // not from a fixed 0.1 step.
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(0.0)).is_none());
    assert_eq!(ready_ticks(pacer.poll(0.13)), Some(1));
    assert!(ready_ticks(pacer.poll(0.20)).is_none());
    assert_eq!(ready_ticks(pacer.poll(0.23)), Some(1));
}

#[test]
fn delta_ticks_proportional_to_elapsed_time() {
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(0.0)).is_none());
    // Two intervals late: two simulation ticks.
    assert_eq!(ready_ticks(pacer.poll(0.2)), Some(2));
    // Three and a half intervals rounds to four.
    assert_eq!(ready_ticks(pacer.poll(0.55)), Some(4));
}

#[test]
fn catch_up_burst_is_clamped() {
    // A long stall must not unleash an unbounded tick burst.
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(0.0)).is_none());
    let ticks = ready_ticks(pacer.poll(100.0)).unwrap();
    assert!(ticks >= 1);
    assert!(ticks <= cube_core::MAX_TICKS_PER_STEP);
}

#[test]
fn fps_sample_reports_over_window_then_resets() {
    let mut pacer = FramePacer::new(10.0).unwrap();
    assert!(ready_ticks(pacer.poll(0.0)).is_none());
    // Not yet due early in the window.
    assert!(pacer.take_fps_sample(1.0).is_none());
    let mut frames = 0u32;
    let mut step = 0u32;
    loop {
        step += 1;
        let now = f64::from(step) * 0.1;
        if now >= SAMPLE_WINDOW_SECS {
            break;
        }
        if ready_ticks(pacer.poll(now)).is_some() {
            frames += 1;
        }
    }
    assert!(frames > 0);
    let now = SAMPLE_WINDOW_SECS + 0.5;
    let fps = pacer.take_fps_sample(now).expect("window elapsed");
    assert!((fps - f64::from(frames) / now).abs() < 1.0);
    // Counter reset: an immediate second sample is not due.
    assert!(pacer.take_fps_sample(now).is_none());
}

#[test]
fn wait_hint_is_bounded() {
    let mut pacer = FramePacer::new(60.0).unwrap();
    match pacer.poll(0.0) {
        PacerDecision::Wait { hint } => {
            assert!(hint > std::time::Duration::ZERO);
            assert!(hint <= std::time::Duration::from_millis(5));
        }
        PacerDecision::Ready { .. } => panic!("first poll must wait"),
    }
}
