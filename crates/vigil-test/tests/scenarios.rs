//! End-to-end scenarios for the proctoring widget.

use proptest::prelude::*;
use vigil_core::{
    Environment, FullscreenError, HostResponse, Key, KeyFilter, KeyInput, LastAction, Modifiers,
    MonitorConfig, RecoveryPolicy, ScriptedHost, Shortcut, SignalKind, ViolationKind,
};
use vigil_test::{Harness, OVERLAY};
use vigil_widgets::{
    DISMISS_BUTTON, ENTER_BUTTON, FULLSCREEN_CARD, RETURN_BUTTON, VISIBILITY_CARD, WARNINGS_CARD,
};

#[test]
fn test_denied_on_mount_shows_enter_button() {
    let mut harness = Harness::with(ScriptedHost::denying(), MonitorConfig::default());
    harness.mount();
    harness
        .assert_fullscreen(false)
        .assert_warning_hidden()
        .assert_warning_count(0)
        .assert_last_action(LastAction::RequestDenied)
        .assert_exists(ENTER_BUTTON)
        .assert_text(FULLSCREEN_CARD, "Inactive");
}

#[test]
fn test_enter_button_retries_request() {
    let mut harness = Harness::with(ScriptedHost::denying(), MonitorConfig::default());
    harness.mount();
    harness.host().set_fallback(HostResponse::Grant);
    harness.click(ENTER_BUTTON);
    harness
        .assert_fullscreen(true)
        .assert_not_exists(ENTER_BUTTON)
        .assert_warning_count(0);
    assert_eq!(harness.host().request_count(), 2);
}

#[test]
fn test_mount_already_fullscreen_then_exit() {
    let mut harness = Harness::with(
        ScriptedHost::granting(),
        MonitorConfig::default().request_on_mount(false),
    );
    harness
        .starting_in(Environment {
            fullscreen: true,
            visible: true,
        })
        .mount();
    harness
        .assert_fullscreen(true)
        .assert_not_exists(ENTER_BUTTON)
        .assert_text(FULLSCREEN_CARD, "Active");

    harness.exit_fullscreen();
    harness
        .assert_warning_visible()
        .assert_warning_count(1)
        .assert_last_action(LastAction::Violation(ViolationKind::FullscreenExit));
}

#[test]
fn test_mount_in_hidden_tab_shows_no_warning() {
    let mut harness = Harness::with(ScriptedHost::holding(), MonitorConfig::default());
    harness
        .starting_in(Environment {
            fullscreen: false,
            visible: false,
        })
        .mount();
    harness
        .assert_tab_visible(false)
        .assert_warning_hidden()
        .assert_warning_count(0)
        .assert_text(VISIBILITY_CARD, "Hidden");

    harness.show_tab().hide_tab();
    harness.assert_warning_visible().assert_warning_count(1);
}

#[test]
fn test_tab_switch_then_dismiss() {
    let mut harness = Harness::new();
    harness.mount().hide_tab();
    harness
        .assert_warning_visible()
        .assert_warning_count(1)
        .assert_text(VISIBILITY_CARD, "Hidden")
        .assert_text_contains(OVERLAY, "switched tabs");

    harness.click(DISMISS_BUTTON);
    harness
        .assert_warning_hidden()
        .assert_warning_count(1)
        .assert_tab_visible(false)
        .assert_fullscreen(true)
        .assert_last_action(LastAction::Dismissed)
        .assert_text(WARNINGS_CARD, "1 violations");
}

#[test]
fn test_devtools_keys_suppressed_any_time() {
    let mut harness = Harness::new();
    harness.press("F12").assert_passed();

    harness.mount();
    let before = harness.state();
    harness.press("F12").assert_suppressed();
    harness.press("Ctrl+Shift+I").assert_suppressed();
    harness
        .press_input(KeyInput::new(Key::F12, Modifiers::new(false, true, false, false)))
        .assert_suppressed();
    harness.press("Ctrl+I").assert_passed();
    harness.press("I").assert_passed();
    assert_eq!(harness.state(), before);

    harness.exit_fullscreen().press("F12").assert_suppressed();
}

#[test]
fn test_context_menu_suppressed_without_state_change() {
    let mut harness = Harness::new();
    harness.mount();
    let before = harness.state();
    harness.right_click().assert_suppressed();
    assert_eq!(harness.state(), before);

    harness.hide_tab();
    let before = harness.state();
    harness.right_click().assert_suppressed();
    assert_eq!(harness.state(), before);
}

#[test]
fn test_unmount_stops_all_handlers() {
    let mut harness = Harness::new();
    harness.mount().unmount();
    harness.assert_listeners(0);

    harness.exit_fullscreen().hide_tab();
    harness.assert_warning_count(0).assert_warning_hidden();
    harness.right_click().assert_passed();
    harness.press("F12").assert_passed();
    for kind in SignalKind::ALL {
        assert_eq!(harness.source().listener_count_for(kind), 0);
    }
}

#[test]
fn test_remount_does_not_duplicate_handlers() {
    let mut harness = Harness::new();
    harness.mount().unmount().mount();
    harness.assert_listeners(4);
    harness.hide_tab().assert_warning_count(1);
}

#[test]
fn test_return_to_fullscreen_after_exit() {
    let mut harness = Harness::new();
    harness.mount().exit_fullscreen();
    harness.assert_warning_visible().assert_exists(RETURN_BUTTON);

    harness.click(RETURN_BUTTON);
    harness
        .assert_fullscreen(true)
        .assert_warning_hidden()
        .assert_warning_count(1)
        .assert_last_action(LastAction::Recovered);
}

#[test]
fn test_lenient_recovery_clears_overlay_while_tab_hidden() {
    let mut harness = Harness::new();
    harness.mount().hide_tab().click(RETURN_BUTTON);
    harness.assert_warning_hidden().assert_tab_visible(false);
    assert!(harness.state().any_violation_active());
}

#[test]
fn test_strict_recovery_keeps_overlay_while_tab_hidden() {
    let config = MonitorConfig::default().recovery(RecoveryPolicy::Strict);
    let mut harness = Harness::with(ScriptedHost::granting(), config);
    harness.mount().hide_tab().click(RETURN_BUTTON);
    harness.assert_warning_visible().assert_fullscreen(true);

    harness.show_tab().click(RETURN_BUTTON);
    harness.assert_warning_hidden();
}

#[test]
fn test_failed_return_keeps_overlay() {
    let mut harness = Harness::new();
    harness.mount().exit_fullscreen();
    harness.deny_next().click(RETURN_BUTTON);
    harness
        .assert_warning_visible()
        .assert_fullscreen(false)
        .assert_last_action(LastAction::RequestDenied);
}

#[test]
fn test_pending_request_settles_after_unmount() {
    let mut harness = Harness::with(ScriptedHost::holding(), MonitorConfig::default());
    harness.mount();
    assert_eq!(harness.host().pending_count(), 1);
    harness.unmount().resolve(Ok(()));
    harness.assert_fullscreen(false).assert_last_action(LastAction::Mounted);
}

#[test]
fn test_unsupported_fullscreen_degrades() {
    let mut harness = Harness::with(ScriptedHost::holding(), MonitorConfig::default());
    harness.mount().resolve(Err(FullscreenError::Unsupported));
    harness
        .assert_fullscreen(false)
        .assert_warning_hidden()
        .assert_exists(ENTER_BUTTON);
}

#[test]
fn test_custom_blocked_shortcuts() {
    let config = MonitorConfig::default()
        .blocked_shortcuts(KeyFilter::empty().with(Shortcut::ctrl(Key::U)));
    let mut harness = Harness::with(ScriptedHost::granting(), config);
    harness.mount();
    harness.press("Ctrl+U").assert_suppressed();
    harness.press("F12").assert_passed();
    harness.right_click().assert_suppressed();
}

#[test]
fn test_config_from_toml_drives_monitor() {
    let config = MonitorConfig::from_toml(
        r#"
        request_on_mount = false
        blocked_shortcuts = ["Ctrl+U"]
        "#,
    )
    .unwrap();
    let mut harness = Harness::with(ScriptedHost::granting(), config);
    harness.mount();
    assert_eq!(harness.host().request_count(), 0);
    harness.assert_fullscreen(false).assert_exists(ENTER_BUTTON);
    harness.press("ctrl+u").assert_suppressed();
}

#[test]
fn test_violation_log_records_order() {
    let mut harness = Harness::new();
    harness
        .mount()
        .exit_fullscreen()
        .hide_tab()
        .show_tab()
        .enter_fullscreen()
        .hide_tab();
    let kinds: Vec<_> = harness.state().violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        [
            ViolationKind::FullscreenExit,
            ViolationKind::TabHidden,
            ViolationKind::TabHidden
        ]
    );
    let sequences: Vec<_> = harness.state().violations.iter().map(|v| v.sequence).collect();
    assert_eq!(sequences, [1, 2, 3]);
}

#[test]
fn test_repeated_hidden_signal_counts_once() {
    let mut harness = Harness::new();
    harness.mount().hide_tab().hide_tab();
    harness.assert_warning_count(1);
}

#[derive(Debug, Clone)]
enum Step {
    ExitFullscreen,
    EnterFullscreen,
    HideTab,
    ShowTab,
    RightClick,
    Devtools,
    Dismiss,
    Return,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::ExitFullscreen),
        Just(Step::EnterFullscreen),
        Just(Step::HideTab),
        Just(Step::ShowTab),
        Just(Step::RightClick),
        Just(Step::Devtools),
        Just(Step::Dismiss),
        Just(Step::Return),
    ]
}

proptest! {
    #[test]
    fn prop_count_matches_violating_transitions(steps in prop::collection::vec(step(), 0..40)) {
        let mut harness = Harness::new();
        harness.mount();
        let mut expected = 0u32;
        for step in steps {
            let before = harness.state();
            match step {
                Step::ExitFullscreen => {
                    if before.is_fullscreen {
                        expected += 1;
                    }
                    harness.exit_fullscreen();
                }
                Step::EnterFullscreen => {
                    harness.enter_fullscreen();
                }
                Step::HideTab => {
                    if before.is_tab_visible {
                        expected += 1;
                    }
                    harness.hide_tab();
                }
                Step::ShowTab => {
                    harness.show_tab();
                }
                Step::RightClick => {
                    harness.right_click();
                    prop_assert!(harness.last_disposition().is_suppressed());
                    prop_assert_eq!(harness.state(), before.clone());
                }
                Step::Devtools => {
                    harness.press("F12");
                    prop_assert!(harness.last_disposition().is_suppressed());
                    prop_assert_eq!(harness.state(), before.clone());
                }
                Step::Dismiss => {
                    harness.click(DISMISS_BUTTON);
                    let after = harness.state();
                    prop_assert!(!after.show_warning);
                    prop_assert_eq!(after.warning_count, before.warning_count);
                    prop_assert_eq!(after.is_fullscreen, before.is_fullscreen);
                    prop_assert_eq!(after.is_tab_visible, before.is_tab_visible);
                }
                Step::Return => {
                    harness.monitor().return_to_fullscreen();
                    let after = harness.state();
                    prop_assert!(after.is_fullscreen);
                    prop_assert!(!after.show_warning);
                }
            }
            prop_assert_eq!(harness.state().warning_count, expected);
        }
    }
}
