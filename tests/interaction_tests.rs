mod common;

use std::time::{Duration, Instant};

use common::*;
use curve_chart::{
    ChartView, DeviceDataStore, EditError, InputOutcome, KeyCommand, MenuAction, ModeKind, MouseButton,
    ScreenPoint, Viewport,
};

/// Ten hours of minute data for A and B.
fn fixture() -> (ChartView, DeviceDataStore, FakeSurface) {
    let a = series("A", BASE, MINUTE, 601, |i| (20.0 + (i % 10) as f64, 50.0));
    let b = series("B", BASE, MINUTE, 601, |i| (25.0 - (i % 10) as f64, 55.0));
    let store = store(vec![("A", a), ("B", b)]);
    let surface = FakeSurface::new(Viewport::new(BASE, BASE + 10 * HOUR));
    (view(), store, surface)
}

fn full() -> Viewport {
    Viewport::new(BASE, BASE + 10 * HOUR)
}

/// Puts the view on `window` as if the surface had reported it.
fn show(view: &mut ChartView, store: &DeviceDataStore, surface: &mut FakeSurface, window: Viewport) {
    surface.extremes = Some(window);
    let applied = view.on_extremes_changed(Some(window), store, surface);
    assert_eq!(applied, Some(window));
}

#[test]
fn test_zoom_out_stops_at_full_span() {
    let (mut view, store, mut surface) = fixture();
    show(&mut view, &store, &mut surface, Viewport::new(BASE + 4 * HOUR, BASE + 5 * HOUR));

    for _ in 0..30 {
        view.on_wheel(&wheel(300.0, 100.0, 120.0), &store, &mut surface);
    }
    assert_eq!(view.viewport(), Some(full()), "Never wider than the data");
    assert_eq!(surface.extremes, Some(full()));
}

#[test]
fn test_zoom_in_anchored_at_pointer() {
    let (mut view, store, mut surface) = fixture();
    // Page x 510 is the middle of the plot.
    let outcome = view.on_wheel(&wheel(510.0, 100.0, -120.0), &store, &mut surface);
    let Some(next) = view.viewport() else {
        panic!("zoom must set a viewport");
    };
    assert!(matches!(outcome, InputOutcome::ViewportChanged(v) if v == next));

    let expected_width = (10 * HOUR) as f64 * 0.85;
    assert!((next.span() as f64 - expected_width).abs() <= 1.0);
    assert!((next.center() - (BASE + 5 * HOUR) as f64).abs() <= 1.0);
    assert_eq!(surface.silent_sets, vec![Some(next)]);
}

#[test]
fn test_zoom_in_respects_min_width() {
    let (mut view, store, mut surface) = fixture();
    for _ in 0..200 {
        view.on_wheel(&wheel(510.0, 100.0, -120.0), &store, &mut surface);
    }
    assert_eq!(view.viewport().map(|v| v.span()), Some(30_000));
}

#[test]
fn test_extremes_echo_is_ignored() {
    let (mut view, store, mut surface) = fixture();
    view.on_wheel(&wheel(510.0, 100.0, -120.0), &store, &mut surface);
    let zoomed = view.viewport();
    assert!(view.extremes_guard().is_engaged());

    // The surface echoes the change it was given.
    let echo = surface.extremes;
    assert_eq!(view.on_extremes_changed(echo, &store, &mut surface), None);
    assert_eq!(view.viewport(), zoomed);
    assert!(!view.extremes_guard().is_engaged());
    assert_eq!(surface.silent_sets.len(), 1, "No corrective call for an echo");
}

#[test]
fn test_out_of_bounds_extremes_corrected_once() {
    let (mut view, store, mut surface) = fixture();
    let reported = Viewport::new(BASE - HOUR, BASE + HOUR);

    let applied = view.on_extremes_changed(Some(reported), &store, &mut surface);
    let corrected = Viewport::new(BASE, BASE + HOUR);
    assert_eq!(applied, Some(corrected));
    assert_eq!(surface.silent_sets, vec![Some(corrected)]);

    // Echo of the corrective call.
    assert_eq!(view.on_extremes_changed(Some(corrected), &store, &mut surface), None);
    assert_eq!(surface.silent_sets.len(), 1);

    // A genuine user change afterwards is processed again.
    let next = Viewport::new(BASE + 2 * HOUR, BASE + 3 * HOUR);
    assert_eq!(view.on_extremes_changed(Some(next), &store, &mut surface), Some(next));
    assert_eq!(view.viewport(), Some(next));
}

#[test]
fn test_too_narrow_extremes_widened() {
    let (mut view, store, mut surface) = fixture();
    let mid = BASE + 5 * HOUR;
    let reported = Viewport::new(mid, mid + 10 * SECOND);

    let applied = view
        .on_extremes_changed(Some(reported), &store, &mut surface)
        .expect("corrected window");
    assert_eq!(applied.span(), 30_000);
    assert_eq!(applied, Viewport::new(mid - 10 * SECOND, mid + 20 * SECOND));
}

#[test]
fn test_right_drag_pans_and_suppresses_context_menu() {
    let (mut view, mut store, mut surface) = fixture();
    let window = Viewport::new(BASE + 2 * HOUR, BASE + 4 * HOUR);
    show(&mut view, &store, &mut surface, window);

    let t0 = Instant::now();
    let pressed = view.on_pointer_down(&down(510.0, 100.0, MouseButton::Right, t0), &store, &mut surface);
    assert!(matches!(pressed, InputOutcome::Consumed));
    assert!(view.is_panning());

    view.on_pointer_move(&moved(610.0, 100.0, t0), &store, &mut surface);
    let shifted = Viewport::new(window.min - 12 * MINUTE, window.max - 12 * MINUTE);
    assert_eq!(view.viewport(), Some(shifted), "100 px of 1000 moves back 10% of two hours");

    let released = t0 + Duration::from_millis(400);
    view.on_pointer_up(&down(610.0, 100.0, MouseButton::Right, released), &mut store, &mut surface);
    assert!(!view.is_panning());

    let menu = view.on_context_menu(
        ScreenPoint::new(610.0, 100.0),
        released + Duration::from_millis(50),
        &store,
        &surface,
    );
    assert!(menu.is_none(), "Context menu right after a drag-pan is suppressed");

    let menu = view.on_context_menu(
        ScreenPoint::new(610.0, 100.0),
        released + Duration::from_millis(500),
        &store,
        &surface,
    );
    assert!(menu.is_some());
}

#[test]
fn test_suppression_expires_after_window() {
    let (mut view, mut store, mut surface) = fixture();
    show(&mut view, &store, &mut surface, Viewport::new(BASE + 2 * HOUR, BASE + 4 * HOUR));

    let t0 = Instant::now();
    view.on_pointer_down(&down(510.0, 100.0, MouseButton::Middle, t0), &store, &mut surface);
    view.on_pointer_move(&moved(560.0, 100.0, t0), &store, &mut surface);
    view.on_pointer_up(&down(560.0, 100.0, MouseButton::Middle, t0), &mut store, &mut surface);

    let menu = view.on_context_menu(
        ScreenPoint::new(560.0, 100.0),
        t0 + Duration::from_millis(250),
        &store,
        &surface,
    );
    assert!(menu.is_some(), "Suppression lasts 200 ms only");
}

#[test]
fn test_click_without_drag_does_not_suppress() {
    let (mut view, mut store, mut surface) = fixture();
    show(&mut view, &store, &mut surface, Viewport::new(BASE + 2 * HOUR, BASE + 4 * HOUR));

    let t0 = Instant::now();
    view.on_pointer_down(&down(510.0, 100.0, MouseButton::Right, t0), &store, &mut surface);
    view.on_pointer_move(&moved(512.0, 100.0, t0), &store, &mut surface);
    view.on_pointer_up(&down(512.0, 100.0, MouseButton::Right, t0), &mut store, &mut surface);

    let menu = view.on_context_menu(ScreenPoint::new(512.0, 100.0), t0, &store, &surface);
    assert!(menu.is_some(), "Movement under the threshold is a click");
}

#[test]
fn test_pan_at_edge_keeps_width() {
    let (mut view, mut store, mut surface) = fixture();
    let window = Viewport::new(BASE, BASE + 2 * HOUR);
    show(&mut view, &store, &mut surface, window);

    let t0 = Instant::now();
    view.on_pointer_down(&down(510.0, 100.0, MouseButton::Right, t0), &store, &mut surface);
    view.on_pointer_move(&moved(1000.0, 100.0, t0), &store, &mut surface);
    view.on_pointer_up(&down(1000.0, 100.0, MouseButton::Right, t0), &mut store, &mut surface);
    assert_eq!(view.viewport(), Some(window));
}

#[test]
fn test_left_button_is_left_to_basic_mode_selection() {
    let (mut view, store, mut surface) = fixture();
    let t0 = Instant::now();
    let outcome = view.on_pointer_down(&down(510.0, 100.0, MouseButton::Left, t0), &store, &mut surface);
    assert!(matches!(outcome, InputOutcome::Ignored));
    assert!(!view.is_panning());
}

#[test]
fn test_mode_switch_resets_mode_state_but_keeps_viewport() {
    let (mut view, mut store, mut surface) = fixture();
    let window = Viewport::new(BASE + HOUR, BASE + 2 * HOUR);
    show(&mut view, &store, &mut surface, window);

    view.select_range(at(1, 0, 0), at(1, 5, 0)).expect("basic mode");
    view.copy(&store, None).expect("copy");
    view.select_range(at(1, 10, 0), at(1, 15, 0)).expect("basic mode");

    let policy = view.set_mode(ModeKind::MagicPen, &mut surface);
    assert!(policy.capture_pointer);
    assert!(policy.suppress_native_drag);
    assert!(!surface.box_selection);
    assert_eq!(view.selection(), None);

    view.set_mode(ModeKind::Basic, &mut surface);
    assert!(surface.box_selection);
    assert_eq!(view.selection(), None);
    assert_eq!(
        view.paste(&mut store, None, at(3, 0, 0)).map(|_| ()),
        Err(EditError::EmptyClipboard),
        "Leaving basic mode drops the clipboard"
    );
    assert_eq!(view.viewport(), Some(window));
}

#[test]
fn test_reset_view_and_context() {
    let (mut view, mut store, mut surface) = fixture();
    show(&mut view, &store, &mut surface, Viewport::new(BASE + HOUR, BASE + 2 * HOUR));

    view.reset_view(&mut surface);
    assert_eq!(view.viewport(), None);
    assert_eq!(surface.silent_sets.last(), Some(&None));

    show(&mut view, &store, &mut surface, Viewport::new(BASE + HOUR, BASE + 2 * HOUR));
    view.select_range(at(1, 0, 0), at(1, 5, 0)).expect("basic mode");
    view.copy(&store, Some("A")).expect("copy");
    view.paste(&mut store, Some("B"), at(6, 0, 0)).expect("paste");

    view.reset_context();
    assert_eq!(view.viewport(), None);
    assert!(view.history().is_empty());
    assert_eq!(view.mode_kind(), ModeKind::Basic);
    assert!(view.undo(&mut store).is_err());
}

#[test]
fn test_render_uses_current_window() {
    let (mut view, store, mut surface) = fixture();
    let full_render = view.render(&store);
    assert_eq!(full_render.len(), 2);
    assert_eq!(full_render[0].1.len(), 601, "601 points fit under MAX_POINTS");

    show(&mut view, &store, &mut surface, Viewport::new(BASE + HOUR, BASE + 2 * HOUR));
    assert_eq!(view.render_series(&store, "A").len(), 61);
    assert!(view.render_series(&store, "missing").is_empty());
}

#[test]
fn test_context_menu_entries_follow_state() {
    let (mut view, mut store, mut surface) = fixture();
    let t0 = Instant::now();

    surface.hit("A", at(1, 0, 0), 20.0);
    let menu = view
        .on_context_menu(ScreenPoint::new(510.0, 100.0), t0, &store, &surface)
        .expect("basic mode menu");
    assert_eq!(menu.target_device.as_deref(), Some("A"));
    assert!(!menu.is_enabled(MenuAction::Copy), "No selection yet");
    assert!(!menu.is_enabled(MenuAction::Paste));

    view.select_range(at(1, 0, 0), at(1, 5, 0)).expect("basic mode");
    let menu = view
        .on_context_menu(ScreenPoint::new(510.0, 100.0), t0, &store, &surface)
        .expect("basic mode menu");
    assert!(menu.is_enabled(MenuAction::Copy));
    assert!(menu.is_enabled(MenuAction::ComputeAverage));
    assert!(menu.is_enabled(MenuAction::AverageCopyTo));

    let copied = view.run_menu_action(&menu, MenuAction::Copy, &mut store);
    assert!(matches!(copied, InputOutcome::Notice(_)));

    // Single-device clipboard: paste needs a curve under the cursor.
    surface.hit("B", at(5, 0, 0), 80.0);
    let blank = view
        .on_context_menu(ScreenPoint::new(510.0, 100.0), t0, &store, &surface)
        .expect("basic mode menu");
    assert_eq!(blank.target_device, None, "80 px is beyond the hit-test distance");
    assert!(!blank.is_enabled(MenuAction::Paste));

    surface.hit("B", at(5, 0, 0), 10.0);
    let on_b = view
        .on_context_menu(ScreenPoint::new(510.0, 100.0), t0, &store, &surface)
        .expect("basic mode menu");
    assert!(on_b.is_enabled(MenuAction::Paste));
    let pasted = view.run_menu_action(&on_b, MenuAction::Paste, &mut store);
    assert!(matches!(pasted, InputOutcome::Committed(ref o) if o.changed == vec!["B".to_string()]));

    view.set_mode(ModeKind::Drag, &mut surface);
    assert!(view
        .on_context_menu(ScreenPoint::new(510.0, 100.0), t0, &store, &surface)
        .is_none());
}

#[test]
fn test_keyboard_commands() {
    let (mut view, mut store, surface) = fixture();

    let undo = view.on_key(KeyCommand::Undo, &mut store, &surface);
    assert!(matches!(undo, InputOutcome::Rejected(EditError::NothingToUndo)));

    view.select_range(at(1, 0, 0), at(1, 5, 0)).expect("basic mode");
    view.on_key(KeyCommand::Escape, &mut store, &surface);
    assert_eq!(view.selection(), None);

    let copy = view.on_key(KeyCommand::Copy, &mut store, &surface);
    assert!(matches!(copy, InputOutcome::Rejected(EditError::NoSelection)));

    view.select_range(at(1, 0, 0), at(1, 5, 0)).expect("basic mode");
    assert!(matches!(
        view.on_key(KeyCommand::Copy, &mut store, &surface),
        InputOutcome::Notice(_)
    ));

    // Multi-device clipboard, pointer over a blank area at 05:00.
    let mut surface = surface;
    let t0 = Instant::now();
    view.on_pointer_move(&moved(510.0, 100.0, t0), &store, &mut surface);
    let pasted = view.on_key(KeyCommand::Paste, &mut store, &surface);
    assert!(matches!(pasted, InputOutcome::Committed(ref o) if o.changed.len() == 2));
    assert!(store.dataset("A").and_then(|ds| ds.at(at(5, 0, 0))).is_some());

    let undone = view.on_key(KeyCommand::Undo, &mut store, &surface);
    assert!(matches!(undone, InputOutcome::Committed(_)));
    let redone = view.on_key(KeyCommand::Redo, &mut store, &surface);
    assert!(matches!(redone, InputOutcome::Committed(_)));
}

#[test]
fn test_keyboard_paste_ignores_unknown_curve_under_pointer() {
    let (mut view, mut store, mut surface) = fixture();
    view.select_range(at(1, 0, 0), at(1, 5, 0)).expect("basic mode");
    view.on_key(KeyCommand::Copy, &mut store, &surface);

    // A curve the registry does not know sits under the pointer.
    surface.hit("ghost", at(5, 0, 0), 10.0);
    view.on_pointer_move(&moved(510.0, 100.0, Instant::now()), &store, &mut surface);

    let menu = view
        .on_context_menu(ScreenPoint::new(510.0, 100.0), Instant::now(), &store, &surface)
        .expect("basic mode menu");
    assert_eq!(menu.target_device, None);

    let pasted = view.on_key(KeyCommand::Paste, &mut store, &surface);
    assert!(
        matches!(pasted, InputOutcome::Committed(ref o) if o.changed.len() == 2),
        "Keyboard paste resolves the same blank target as the context menu: {pasted:?}"
    );
    assert!(store.dataset("ghost").is_none());
}
