// Tests for the edge-triggered display-mode switch.

use cube_core::{DisplayMode, ModeSwitch};

const ADVANCE: char = 'm';

#[test]
fn mode_cycle_wraps_to_blank() {
    assert_eq!(DisplayMode::Blank.next(), DisplayMode::EmissiveCube);
    assert_eq!(DisplayMode::EmissiveCube.next(), DisplayMode::Blank);
}

#[test]
fn held_key_advances_exactly_once() {
    let mut switch = ModeSwitch::new(ADVANCE, DisplayMode::EmissiveCube);
    // Auto-repeat delivers press, press, press with no release in between.
    assert!(switch.key_down(ADVANCE));
    assert_eq!(switch.mode(), DisplayMode::Blank);
    assert!(!switch.key_down(ADVANCE));
    assert!(!switch.key_down(ADVANCE));
    assert_eq!(switch.mode(), DisplayMode::Blank);
}

#[test]
fn release_then_press_advances_again() {
    let mut switch = ModeSwitch::new(ADVANCE, DisplayMode::EmissiveCube);
    assert!(switch.key_down(ADVANCE));
    switch.key_up(ADVANCE);
    assert!(switch.key_down(ADVANCE));
    // Two genuine presses: full cycle back to the starting mode.
    assert_eq!(switch.mode(), DisplayMode::EmissiveCube);
}

#[test]
fn full_cycle_wraps_through_blank() {
    let mut switch = ModeSwitch::new(ADVANCE, DisplayMode::Blank);
    assert!(switch.key_down(ADVANCE));
    assert_eq!(switch.mode(), DisplayMode::EmissiveCube);
    switch.key_up(ADVANCE);
    assert!(switch.key_down(ADVANCE));
    assert_eq!(switch.mode(), DisplayMode::Blank);
}

#[test]
fn other_keys_do_not_advance() {
    let mut switch = ModeSwitch::new(ADVANCE, DisplayMode::EmissiveCube);
    assert!(!switch.key_down('x'));
    switch.key_up('x');
    assert!(!switch.key_down('y'));
    assert_eq!(switch.mode(), DisplayMode::EmissiveCube);
}

#[test]
fn releasing_a_different_key_keeps_the_detector_armed() {
    let mut switch = ModeSwitch::new(ADVANCE, DisplayMode::EmissiveCube);
    assert!(switch.key_down(ADVANCE));
    // Releasing some other key must not re-arm the advance key.
    switch.key_up('x');
    assert!(!switch.key_down(ADVANCE));
    assert_eq!(switch.mode(), DisplayMode::Blank);
}
