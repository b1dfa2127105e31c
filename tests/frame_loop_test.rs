mod common;

use yurt_scene::flow::{FrameLoop, Step, StopSignal};

use crate::common::test_utils::CountingHost;

#[test]
fn each_step_updates_renders_and_rearms_once() {
    let mut frame_loop = FrameLoop::default();
    let mut host = CountingHost::new();

    for n in 1..=5 {
        assert_eq!(frame_loop.step(&mut host), Step::Continue);
        assert_eq!(host.update_invocations(), n);
        assert_eq!(host.render_invocations(), n);
        assert_eq!(host.frame_requests(), n);
    }
    assert_eq!(frame_loop.frames(), 5);
}

#[test]
fn controls_receive_elapsed_time() {
    let mut frame_loop = FrameLoop::default();
    let mut host = CountingHost::new();

    frame_loop.step(&mut host);
    let first = host.last_elapsed().expect("elapsed time");
    std::thread::sleep(std::time::Duration::from_millis(5));
    frame_loop.step(&mut host);
    let second = host.last_elapsed().expect("elapsed time");
    assert!(second > first);
    assert!(frame_loop.elapsed() >= second);
}

#[test]
fn nothing_happens_after_stop() {
    let stop = StopSignal::new();
    let mut frame_loop = FrameLoop::new(stop.clone());
    let mut host = CountingHost::new();

    frame_loop.step(&mut host);
    frame_loop.step(&mut host);
    stop.stop();

    for _ in 0..3 {
        assert_eq!(frame_loop.step(&mut host), Step::Stopped);
    }
    assert_eq!(host.update_invocations(), 2);
    assert_eq!(host.render_invocations(), 2);
    assert_eq!(host.frame_requests(), 2);
    assert_eq!(frame_loop.frames(), 2);
}

#[test]
fn stop_during_render_skips_the_rearm() {
    let stop = StopSignal::new();
    let mut frame_loop = FrameLoop::new(stop.clone());
    let mut host = CountingHost::stopping_after(3, stop.clone());

    assert_eq!(frame_loop.step(&mut host), Step::Continue);
    assert_eq!(frame_loop.step(&mut host), Step::Continue);
    assert_eq!(frame_loop.step(&mut host), Step::Stopped);
    assert_eq!(frame_loop.step(&mut host), Step::Stopped);

    assert_eq!(host.render_invocations(), 3);
    assert_eq!(host.frame_requests(), 2);
    assert_eq!(frame_loop.frames(), 3);
    assert!(stop.is_stopped());
}

#[test]
fn stop_signal_is_shared_between_clones() {
    let frame_loop = FrameLoop::default();
    let signal = frame_loop.stop_signal();
    let other = signal.clone();
    assert!(!signal.is_stopped());

    let handle = std::thread::spawn(move || other.stop());
    handle.join().expect("stopping thread");
    assert!(signal.is_stopped());
    assert!(frame_loop.stop_signal().is_stopped());
}
