//! Lifecycle scenarios run against the headless backend

use super::*;
use crate::config::LaunchMode;
use crate::platform::headless::{Call, DrawCall, Fault, HeadlessBackend};
use crate::render::{RenderState, Viewport};

fn config() -> SessionConfig {
    SessionConfig::new("Test Window").with_launch(LaunchMode::Windowed)
}

fn live_session(backend: &mut HeadlessBackend, mode: DisplayMode) -> DisplaySession<HeadlessBackend> {
    let mut session = DisplaySession::new(config());
    session
        .acquire(backend, mode, &mut FallbackDecision::Abort)
        .expect("acquire should succeed");
    session
}

fn assert_pristine(backend: &HeadlessBackend) {
    assert_eq!(backend.outstanding(), 0, "leaked resources: {backend:?}");
    assert!(backend.violations().is_empty(), "violations: {:?}", backend.violations());
}

#[test]
fn test_windowed_acquire_goes_live() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);

    assert_eq!(session.state(), SessionState::Live);
    assert_eq!(session.mode(), DisplayMode::Windowed);
    assert!(session.window().is_some());
    assert!(session.surface().is_some());
    assert!(session.context().is_some());
    assert!(session.is_context_bound());
    assert_eq!(backend.current_context(), session.context());
    assert_eq!(backend.display_override(), None);
    assert!(backend.cursor_visible());

    assert!(session.release(&mut backend).is_clean());
    assert_pristine(&backend);
}

#[test]
fn test_acquire_steps_run_in_order() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::FullScreen);
    let window = session.window().unwrap();
    let surface = session.surface().unwrap();
    let context = session.context().unwrap();

    assert_eq!(
        backend.journal(),
        &[
            Call::RegisterClass,
            Call::ChangeDisplayMode(VideoMode {
                width: 640,
                height: 480,
                bits_per_pixel: 32
            }),
            Call::SetCursorVisible(false),
            Call::CreateWindow(WindowStyle::Popup),
            Call::AcquireSurface(window),
            Call::ChoosePixelFormat,
            Call::ApplyPixelFormat(surface),
            Call::CreateContext(surface),
            Call::MakeCurrent(context),
            Call::PresentWindow(window),
        ]
    );

    session.release(&mut backend);
}

#[test]
fn test_release_runs_in_reverse_order() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::FullScreen);
    let window = session.window().unwrap();
    let surface = session.surface().unwrap();
    let context = session.context().unwrap();
    backend.clear_journal();

    let report = session.release(&mut backend);

    assert!(report.is_clean());
    assert_eq!(
        backend.journal(),
        &[
            Call::RestoreDisplayMode,
            Call::SetCursorVisible(true),
            Call::ClearCurrent,
            Call::DeleteContext(context),
            Call::ReleaseSurface(surface),
            Call::DestroyWindow(window),
            Call::UnregisterClass,
        ]
    );
    assert_eq!(session.state(), SessionState::Unacquired);
    assert_pristine(&backend);
}

#[test]
fn test_live_session_sets_projection_and_baseline_state() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);

    let projection = session.projection().cloned().unwrap();
    assert_eq!(projection.viewport, Viewport { x: 0, y: 0, width: 640, height: 480 });
    assert_eq!(
        backend.draws(),
        &[DrawCall::Projection(projection), DrawCall::RenderState(RenderState::BASELINE)]
    );

    session.release(&mut backend);
}

#[test]
fn test_windowed_rect_accounts_for_frame() {
    let insets = FrameInsets {
        left: 3,
        top: 22,
        right: 3,
        bottom: 3,
    };
    let mut backend = HeadlessBackend::new().with_frame_insets(insets);
    let mut session = live_session(&mut backend, DisplayMode::Windowed);
    let window = session.window().unwrap();

    let rect = backend.window_rect(window).unwrap();
    assert_eq!((rect.width(), rect.height()), (646, 505));
    assert_eq!(backend.window_style(window), Some(WindowStyle::Overlapped));
    assert_eq!(backend.window_title(window), Some("Test Window"));

    session.release(&mut backend);
}

#[test]
fn test_fullscreen_overrides_display_and_hides_cursor() {
    let mut backend = HeadlessBackend::new().with_frame_insets(FrameInsets {
        left: 3,
        top: 22,
        right: 3,
        bottom: 3,
    });
    let config = config().with_fullscreen_extent(Extent::new(1366, 768));
    let mut session = DisplaySession::new(config);
    session
        .acquire(&mut backend, DisplayMode::FullScreen, &mut FallbackDecision::Abort)
        .unwrap();
    let window = session.window().unwrap();

    assert_eq!(session.mode(), DisplayMode::FullScreen);
    assert!(session.has_display_override());
    assert!(session.is_cursor_hidden());
    assert!(!backend.cursor_visible());
    assert_eq!(
        backend.display_override(),
        Some(VideoMode {
            width: 1366,
            height: 768,
            bits_per_pixel: 32
        })
    );
    let rect = backend.window_rect(window).unwrap();
    assert_eq!((rect.width(), rect.height()), (1366, 768));

    session.release(&mut backend);
    assert_pristine(&backend);
}

#[test]
fn test_failure_at_every_step_leaves_nothing_allocated() {
    let cases = [
        (Fault::RegisterClass, "ClassRegistrationFailed"),
        (Fault::CreateWindow, "WindowCreationFailed"),
        (Fault::AcquireSurface, "SurfaceAcquisitionFailed"),
        (Fault::ChoosePixelFormat, "NoSuitablePixelFormat"),
        (Fault::ApplyPixelFormat, "FormatApplicationFailed"),
        (Fault::CreateContext, "ContextCreationFailed"),
        (Fault::MakeCurrent, "ContextBindFailed"),
    ];

    for mode in [DisplayMode::Windowed, DisplayMode::FullScreen] {
        for depth in [16, 24, 32] {
            for (fault, expected) in cases {
                let mut backend = HeadlessBackend::new().with_fault(fault);
                let mut session = DisplaySession::new(SessionConfig {
                    color_depth: depth,
                    ..config()
                });

                let error = session
                    .acquire(&mut backend, mode, &mut FallbackDecision::Abort)
                    .unwrap_err();

                assert!(
                    format!("{error:?}").starts_with(expected),
                    "{fault:?} in {mode:?} produced {error:?}"
                );
                assert_eq!(session.state(), SessionState::Unacquired);
                assert!(!session.holds_resources());
                assert_pristine(&backend);
            }
        }
    }
}

#[test]
fn test_pixel_format_failure_destroys_window_and_class() {
    let mut backend = HeadlessBackend::new().with_fault(Fault::ChoosePixelFormat);
    let mut session = DisplaySession::new(config());

    let error = session
        .acquire(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort)
        .unwrap_err();

    assert!(matches!(error, SessionError::NoSuitablePixelFormat(_)));
    assert!(backend.journal().iter().any(|call| matches!(call, Call::DestroyWindow(_))));
    assert!(backend.journal().contains(&Call::UnregisterClass));
    assert_eq!(backend.window_count(), 0);
    assert!(!backend.is_class_registered("OpenGlWindow"));
    assert_pristine(&backend);
}

#[test]
fn test_unsupported_fullscreen_continues_windowed() {
    let mut backend = HeadlessBackend::new().with_fault(Fault::ChangeDisplayMode);
    let mut prompt = ScriptedPrompt::new(DisplayMode::FullScreen, FallbackDecision::ContinueWindowed);
    let mut session = DisplaySession::new(config());

    session
        .acquire(&mut backend, DisplayMode::FullScreen, &mut prompt)
        .unwrap();
    let window = session.window().unwrap();

    assert_eq!(prompt.fallback_questions, 1);
    assert!(session.is_live());
    assert_eq!(session.mode(), DisplayMode::Windowed);
    assert!(!session.has_display_override());
    assert!(backend.cursor_visible());
    assert_eq!(backend.display_override(), None);
    assert_eq!(backend.window_style(window), Some(WindowStyle::Overlapped));
    assert!(!backend.journal().contains(&Call::SetCursorVisible(false)));

    session.release(&mut backend);
    assert!(!backend.journal().contains(&Call::RestoreDisplayMode));
    assert_pristine(&backend);
}

#[test]
fn test_unsupported_fullscreen_abort_rolls_back() {
    let mut backend = HeadlessBackend::new().with_fault(Fault::ChangeDisplayMode);
    let mut session = DisplaySession::new(config());

    let error = session
        .acquire(&mut backend, DisplayMode::FullScreen, &mut FallbackDecision::Abort)
        .unwrap_err();

    assert!(matches!(
        error,
        SessionError::DisplayModeUnsupported(BackendError::UnsupportedMode(_))
    ));
    assert_eq!(backend.window_count(), 0);
    assert_pristine(&backend);
}

#[test]
fn test_reregistering_existing_class_reuses_it() {
    let mut backend = HeadlessBackend::new();
    backend.register_class("OpenGlWindow").unwrap();
    let mut session = DisplaySession::new(config());

    session
        .acquire(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort)
        .unwrap();
    assert!(session.is_live());

    session.release(&mut backend);
    assert_pristine(&backend);
}

#[test]
fn test_release_is_idempotent() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::FullScreen);

    let first = session.release(&mut backend);
    backend.clear_journal();
    let second = session.release(&mut backend);

    assert!(first.is_clean());
    assert!(second.is_clean());
    assert_eq!(session.state(), SessionState::Unacquired);
    assert!(backend.journal().is_empty());
    assert_pristine(&backend);
}

#[test]
fn test_release_of_never_acquired_session_is_noop() {
    let mut backend = HeadlessBackend::new();
    let mut session: DisplaySession<HeadlessBackend> = DisplaySession::new(config());

    assert!(session.release(&mut backend).is_clean());
    assert!(session.release(&mut backend).is_clean());
    assert_eq!(session.state(), SessionState::Unacquired);
    assert!(backend.journal().is_empty());
}

#[test]
fn test_teardown_continues_past_failures() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::FullScreen);
    backend.inject(Fault::ClearCurrent);
    backend.inject(Fault::DeleteContext);
    backend.inject(Fault::ReleaseSurface);

    let report = session.release(&mut backend);

    let steps: Vec<TeardownStep> = report.failures.iter().map(|f| f.step).collect();
    assert_eq!(
        steps,
        vec![
            TeardownStep::UnbindContext,
            TeardownStep::DeleteContext,
            TeardownStep::ReleaseSurface
        ]
    );
    assert!(backend.journal().iter().any(|call| matches!(call, Call::DestroyWindow(_))));
    assert!(backend.journal().contains(&Call::UnregisterClass));
    assert_eq!(session.state(), SessionState::Unacquired);
    assert!(!session.holds_resources());

    // Every handle was nulled, so a second release does not retry them
    backend.clear_journal();
    assert!(session.release(&mut backend).is_clean());
    assert!(backend.journal().is_empty());
}

#[test]
fn test_acquire_twice_is_rejected() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);

    let result = session.acquire(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort);

    assert_eq!(result, Err(SessionError::AlreadyAcquired));
    assert!(session.is_live());
    assert_eq!(backend.window_count(), 1);

    session.release(&mut backend);
}

#[test]
fn test_invalid_request_touches_nothing() {
    let mut backend = HeadlessBackend::new();
    let mut session = DisplaySession::new(SessionConfig {
        color_depth: 12,
        ..config()
    });

    let result = session.acquire(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort);

    assert!(matches!(result, Err(SessionError::InvalidRequest(_))));
    assert!(backend.journal().is_empty());
    assert_eq!(session.state(), SessionState::Unacquired);
}

#[test]
fn test_oversized_extent_is_rejected_before_registration() {
    let mut backend = HeadlessBackend::new().with_frame_insets(FrameInsets {
        left: 8,
        top: 31,
        right: 8,
        bottom: 8,
    });
    let mut session = DisplaySession::new(config().with_windowed_extent(Extent::new(u32::MAX, 480)));

    let result = session.acquire(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort);

    assert!(matches!(result, Err(SessionError::InvalidRequest(_))));
    assert!(backend.journal().is_empty());
    assert_eq!(session.state(), SessionState::Unacquired);
    assert_pristine(&backend);
}

#[test]
fn test_switch_releases_before_acquiring() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);
    let old_window = session.window().unwrap();
    let old_context = session.context().unwrap();
    backend.clear_journal();

    let report = session
        .switch(&mut backend, DisplayMode::FullScreen, &mut FallbackDecision::Abort)
        .unwrap();

    assert!(report.is_clean());
    let journal = backend.journal();
    let destroyed = journal
        .iter()
        .position(|call| *call == Call::DestroyWindow(old_window))
        .unwrap();
    let registered = journal.iter().position(|call| *call == Call::RegisterClass).unwrap();
    assert!(destroyed < registered);
    assert_eq!(journal[0], Call::ClearCurrent);
    assert_eq!(journal[1], Call::DeleteContext(old_context));

    assert_eq!(session.mode(), DisplayMode::FullScreen);
    assert_ne!(session.window(), Some(old_window));
    assert_eq!(backend.window_count(), 1);
    assert_eq!(backend.context_count(), 1);
    assert!(backend.violations().is_empty());

    session.release(&mut backend);
    assert_pristine(&backend);
}

#[test]
fn test_failed_switch_leaves_nothing_bound() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::FullScreen);
    backend.inject(Fault::CreateContext);

    let error = session
        .switch(&mut backend, DisplayMode::Windowed, &mut FallbackDecision::Abort)
        .unwrap_err();

    assert!(error.release.is_clean());
    assert!(matches!(error.source, SessionError::ContextCreationFailed(_)));
    assert_eq!(session.state(), SessionState::Unacquired);
    assert_eq!(backend.current_context(), None);
    assert_pristine(&backend);
}

#[test]
fn test_switch_back_and_forth_keeps_one_context() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);

    for _ in 0..4 {
        let next = session.mode().toggled();
        session
            .switch(&mut backend, next, &mut FallbackDecision::Abort)
            .unwrap();
        assert_eq!(backend.context_count(), 1);
        assert_eq!(backend.current_context(), session.context());
    }

    assert_eq!(session.mode(), DisplayMode::Windowed);
    session.release(&mut backend);
    assert_pristine(&backend);
}

#[test]
fn test_resize_touches_no_handle() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);
    backend.clear_journal();

    let projection = session.resize(&mut backend, 800, 0).cloned().unwrap();

    assert_eq!(projection.viewport.height, 1);
    assert!((projection.aspect - 800.0).abs() < f32::EPSILON);
    assert!(backend.journal().is_empty());
    assert_eq!(backend.draws(), &[DrawCall::Projection(projection)]);

    session.release(&mut backend);
}

#[test]
fn test_resize_ignored_when_not_live() {
    let mut backend = HeadlessBackend::new();
    let mut session: DisplaySession<HeadlessBackend> = DisplaySession::new(config());

    assert!(session.resize(&mut backend, 320, 240).is_none());
    assert!(backend.draws().is_empty());
    assert_eq!(backend.draws_without_context(), 0);
}

#[test]
fn test_present_swaps_live_surface_only() {
    let mut backend = HeadlessBackend::new();
    let mut session = live_session(&mut backend, DisplayMode::Windowed);

    session.present(&mut backend).unwrap();
    assert_eq!(backend.swap_count(), 1);

    session.release(&mut backend);
    session.present(&mut backend).unwrap();
    assert_eq!(backend.swap_count(), 1);
}
