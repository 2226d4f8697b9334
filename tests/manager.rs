mod common;

use common::{access_unit, tag_of, ScriptedLibrary};
use turnx::{Error, Frame, SessionManager};
use turnx_codec::BitRate;

#[test]
fn operations_before_start_are_rejected() {
    let mut manager = SessionManager::new(ScriptedLibrary::new());

    assert!(!manager.is_active());
    assert!(matches!(manager.stop(), Err(Error::NotInitialized)));
    assert!(matches!(
        manager.push(Frame::encoded(access_unit(1, 64))),
        Err(Error::NotInitialized)
    ));
    assert!(matches!(manager.pop(), Err(Error::NotInitialized)));
    assert!(matches!(manager.size(), Err(Error::NotInitialized)));
    assert!(matches!(
        manager.set_bitrate(BitRate::from_kbps(100)),
        Err(Error::NotInitialized)
    ));
}

#[test]
fn double_start_is_rejected() {
    let library = ScriptedLibrary::new();
    let mut manager = SessionManager::new(library.clone());

    manager.start(176, 144).unwrap();
    assert!(matches!(manager.start(176, 144), Err(Error::AlreadyInitialized)));
    // The live session is untouched.
    assert_eq!(library.live_handles(), 2);
    assert_eq!(manager.size().unwrap(), 0);
}

#[test]
fn stop_then_restart() {
    let library = ScriptedLibrary::new();
    let mut manager = SessionManager::new(library.clone());

    manager.start(176, 144).unwrap();
    manager.push(Frame::encoded(access_unit(1, 64))).unwrap();
    manager.stop().unwrap();
    assert!(!manager.is_active());
    assert_eq!(library.live_handles(), 0);
    assert!(matches!(manager.stop(), Err(Error::NotInitialized)));

    manager.start(320, 240).unwrap();
    // Frames queued by the previous session are gone.
    assert_eq!(manager.size().unwrap(), 0);
    manager.push(Frame::encoded(access_unit(9, 64))).unwrap();
    assert_eq!(tag_of(&manager.pop().unwrap()), 9);
}

#[test]
fn failed_start_leaves_manager_stopped() {
    let library = ScriptedLibrary::new();
    library.script().fail_encoder_init = true;
    let mut manager = SessionManager::new(library.clone());

    assert!(matches!(manager.start(176, 144), Err(Error::EncoderInitFailed(_))));
    assert!(!manager.is_active());
    assert_eq!(library.live_handles(), 0);

    library.script().fail_encoder_init = false;
    manager.start(176, 144).unwrap();
    assert!(manager.is_active());
}

#[test]
fn zero_geometry_is_invalid_config() {
    let mut manager = SessionManager::new(ScriptedLibrary::new());
    assert!(matches!(manager.start(0, 144), Err(Error::InvalidConfig(_))));
    assert!(!manager.is_active());
}

#[test]
fn bitrate_and_stats_follow_the_session() {
    let mut manager = SessionManager::new(ScriptedLibrary::new());
    manager.start(176, 144).unwrap();

    manager.set_bitrate(BitRate::from_kbps(800)).unwrap();
    assert_eq!(manager.bitrate().unwrap().as_kbps(), 800);

    manager.push(Frame::encoded(access_unit(1, 64))).unwrap();
    manager.push(Frame::encoded(access_unit(2, 64))).unwrap();
    manager.pop().unwrap();
    let stats = manager.stats().unwrap();
    assert_eq!((stats.frames_in, stats.frames_out), (2, 1));
}
