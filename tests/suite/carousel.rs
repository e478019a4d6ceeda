//! Carousel behaviour over long interactions.

use std::time::Duration;

use innersight_engine::carousel::{Carousel, SETTLE_DELAY, SNAP_IDLE};
use innersight_engine::{SIGNALS, Signal};

const FRAME: Duration = Duration::from_millis(8);

fn ready(reduced_motion: bool) -> Carousel<Signal> {
    let mut carousel = Carousel::new(SIGNALS.to_vec(), 11);
    carousel.set_reduced_motion(reduced_motion);
    carousel.set_viewport_width(100.0);
    carousel.advance(SETTLE_DELAY);
    carousel
}

fn settle(carousel: &mut Carousel<Signal>) {
    for _ in 0..200 {
        if !carousel.is_animating() {
            return;
        }
        carousel.advance(FRAME);
    }
    panic!("carousel never settled");
}

fn active_name(carousel: &Carousel<Signal>) -> &'static str {
    carousel.select_active().map_or("", |s| s.name())
}

#[test]
fn starts_on_the_first_signal() {
    let carousel = ready(false);
    assert_eq!(active_name(&carousel), "Clarity");
}

#[test]
fn walking_left_forever_never_runs_out() {
    let mut carousel = ready(true);
    let n = SIGNALS.len();
    for step in 1..=100 {
        assert!(carousel.scroll_by(-1));
        let expected = (n - step % n) % n;
        assert_eq!(carousel.active_index(), Some(expected), "step {step}");
    }
    assert!(carousel.offset() > 0.0);
}

#[test]
fn walking_right_with_animation_cycles_the_catalog() {
    let mut carousel = ready(false);
    let mut seen = Vec::new();
    for _ in 0..(SIGNALS.len() * 3) {
        carousel.scroll_by(1);
        settle(&mut carousel);
        seen.push(active_name(&carousel));
    }
    assert_eq!(&seen[..5], &["Momentum", "Confidence", "Ambiguity", "Tension", "Clarity"]);
    assert_eq!(seen[..5], seen[5..10]);
    assert_eq!(seen[5..10], seen[10..15]);
}

#[test]
fn fine_scroll_snaps_to_an_item_centre() {
    let mut carousel = ready(false);
    let width = carousel.item_width().unwrap();
    carousel.scroll_by_offset(width * 0.7);

    let mut idle = Duration::ZERO;
    while idle < SNAP_IDLE + Duration::from_millis(400) {
        carousel.advance(FRAME);
        idle += FRAME;
    }

    assert_eq!(active_name(&carousel), "Momentum");
    let remainder = carousel.offset() % width;
    assert!(remainder < 0.01 || width - remainder < 0.01, "offset {}", carousel.offset());
}

#[test]
fn resize_keeps_the_active_item() {
    let mut carousel = ready(true);
    carousel.scroll_by(1);
    carousel.scroll_by(1);
    assert_eq!(active_name(&carousel), "Confidence");

    carousel.set_viewport_width(61.0);
    assert_eq!(active_name(&carousel), "Confidence");
    carousel.set_viewport_width(240.0);
    assert_eq!(active_name(&carousel), "Confidence");
}

#[test]
fn visible_items_have_exactly_one_active() {
    let carousel = ready(false);
    let visible = carousel.visible_items();
    assert!(visible.len() >= 2, "{visible:?}");
    assert_eq!(visible.iter().filter(|item| item.is_active).count(), 1);
    let active = visible.iter().find(|item| item.is_active).unwrap();
    assert!((active.center - 50.0).abs() < 0.01);
}
