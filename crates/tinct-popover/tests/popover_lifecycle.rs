#![forbid(unsafe_code)]

//! State-machine tests against the in-memory document.
//!
//! Each test builds a [`Scene`] (anchor at `(10, 10, 20, 20)`, floating
//! element `100 × 50`) and drives the popover through host events.

use pretty_assertions::assert_eq;
use tinct_core::event::{EventKind, KeyCode, KeyEvent, Modifiers};
use tinct_core::geometry::{Point, Rect};
use tinct_harness::{FakeDom, RecordingController, Scene, ToggleCall};
use tinct_popover::host::Controller;
use tinct_popover::{PopoverConfig, PopoverEvent, Side, Target};

fn config(position: &str, margin: f64) -> PopoverConfig {
    PopoverConfig::default().position(position).margin(margin)
}

fn open_scene(width: f64, height: f64) -> Scene {
    let scene = Scene::new(width, height);
    scene.controller.set_open(true);
    scene
}

// ============================================================================
// Attach / detach
// ============================================================================

#[test]
fn attach_positions_below_anchor_start_aligned() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&config("bottom-start", 5.0));
    popover.attach();

    assert_eq!(scene.transform().as_deref(), Some("translate(10px, 35px)"));
    let position = popover.last_position().unwrap();
    assert_eq!(position.side, Some(Side::Bottom));
    assert!(popover.state().anchor_visible);
    assert!(popover.state().floating_visible);
}

#[test]
fn attach_binds_scroll_resize_pointer_and_key_listeners() {
    let scene = Scene::new(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    assert_eq!(
        scene.dom.listeners(),
        vec![
            (Target::Document, EventKind::Scroll),
            (Target::Window, EventKind::Resize),
            (Target::Document, EventKind::PointerDown),
            (Target::Document, EventKind::KeyDown),
        ]
    );
}

#[test]
fn clipping_ancestors_are_tracked_nearest_first() {
    let dom = FakeDom::new(1000.0, 800.0);
    let outer = dom.scroller(dom.body(), Rect::new(0.0, 0.0, 400.0, 400.0));
    let inline_wrapper = dom.element(outer, Rect::new(0.0, 0.0, 400.0, 400.0));
    dom.set_computed(inline_wrapper, "overflow", "hidden");
    dom.set_computed(inline_wrapper, "display", "inline");
    let plain = dom.element(inline_wrapper, Rect::new(0.0, 0.0, 400.0, 400.0));
    let inner = dom.element(plain, Rect::new(0.0, 0.0, 300.0, 300.0));
    dom.set_computed(inner, "overflow-y", "scroll");

    let mut scene = Scene::with_dom(dom.clone());
    scene.anchor = dom.element(inner, Rect::new(10.0, 10.0, 20.0, 20.0));
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    assert_eq!(
        popover.scroll_targets(),
        &[
            Target::Element(inner),
            Target::Element(outer),
            Target::Document
        ]
    );
    let scroll_targets: Vec<_> = dom
        .listeners()
        .into_iter()
        .filter(|(_, kind)| *kind == EventKind::Scroll)
        .map(|(target, _)| target)
        .collect();
    assert_eq!(scroll_targets, popover.scroll_targets().to_vec());
}

#[test]
fn detach_unbinds_everything_and_clears_styles() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();
    assert!(scene.transform().is_some());

    popover.detach();
    assert!(!popover.is_attached());
    assert!(scene.dom.listeners().is_empty());
    assert_eq!(scene.dom.listener_calls(), (4, 4));
    assert_eq!(scene.transform(), None);
    assert_eq!(scene.forced_height(), None);

    // Second detach is a no-op.
    popover.detach();
    assert_eq!(scene.dom.listener_calls(), (4, 4));
}

#[test]
fn dropping_the_popover_detaches_it() {
    let scene = open_scene(1000.0, 800.0);
    {
        let mut popover = scene.popover(&PopoverConfig::default());
        popover.attach();
        assert_eq!(scene.dom.listeners().len(), 4);
    }
    assert!(scene.dom.listeners().is_empty());
    assert_eq!(scene.transform(), None);
}

#[test]
fn events_after_detach_are_ignored() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();
    popover.detach();

    assert!(!popover.handle_event(PopoverEvent::Scroll));
    assert_eq!(popover.update(), None);
    assert_eq!(scene.transform(), None);
}

// ============================================================================
// Repositioning
// ============================================================================

#[test]
fn flips_to_top_near_viewport_bottom() {
    let scene = open_scene(1000.0, 800.0);
    scene
        .dom
        .set_rect(scene.anchor, Rect::new(10.0, 780.0, 20.0, 10.0));
    let mut popover = scene.popover(&config("bottom-start", 5.0));
    popover.attach();

    let position = popover.last_position().unwrap();
    assert_eq!(position.side, Some(Side::Top));
    assert_eq!(position.y, 725.0);
    assert_eq!(scene.transform().as_deref(), Some("translate(10px, 725px)"));
}

#[test]
fn resize_recomputes_with_fresh_geometry() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&config("bottom-start", 5.0));
    popover.attach();

    scene
        .dom
        .set_rect(scene.anchor, Rect::new(200.0, 100.0, 20.0, 20.0));
    popover.handle_event(PopoverEvent::Resize);
    assert_eq!(scene.transform().as_deref(), Some("translate(200px, 125px)"));
}

#[test]
fn closed_popover_is_not_repositioned() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&config("bottom-start", 5.0));
    popover.attach();
    scene.controller.set_open(false);

    scene
        .dom
        .set_rect(scene.anchor, Rect::new(200.0, 100.0, 20.0, 20.0));
    popover.handle_event(PopoverEvent::Scroll);
    assert_eq!(popover.update(), None);
    assert_eq!(scene.transform().as_deref(), Some("translate(10px, 35px)"));
}

#[test]
fn overflowing_height_is_clamped_and_recomputed_idempotently() {
    let scene = open_scene(1000.0, 800.0);
    scene
        .dom
        .set_rect(scene.floating, Rect::new(0.0, 0.0, 100.0, 900.0));
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    assert_eq!(scene.forced_height().as_deref(), Some("780px"));
    assert_eq!(scene.transform().as_deref(), Some("translate(38px, 10px)"));
    let first = popover.last_position().unwrap();
    assert_eq!(first.clamped_height, Some(780.0));

    // The forced height is removed before measuring again.
    let second = popover.update().unwrap();
    assert_eq!(second, first);
    assert_eq!(scene.forced_height().as_deref(), Some("780px"));
    assert_eq!(scene.transform().as_deref(), Some("translate(38px, 10px)"));
}

#[test]
fn forced_height_is_dropped_once_it_fits_again() {
    let scene = open_scene(1000.0, 800.0);
    scene
        .dom
        .set_rect(scene.floating, Rect::new(0.0, 0.0, 100.0, 900.0));
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();
    assert!(scene.forced_height().is_some());

    scene
        .dom
        .set_rect(scene.floating, Rect::new(0.0, 0.0, 100.0, 50.0));
    popover.handle_event(PopoverEvent::Resize);
    assert_eq!(scene.forced_height(), None);
}

#[test]
fn positioning_origin_is_subtracted() {
    let scene = open_scene(1000.0, 800.0);
    scene
        .dom
        .set_positioning_offset(scene.floating, Point::new(5.0, 15.0));
    let mut popover = scene.popover(&config("bottom-start", 5.0));
    popover.attach();

    assert_eq!(scene.transform().as_deref(), Some("translate(5px, 20px)"));
    // The reported position stays in viewport coordinates.
    assert_eq!(popover.last_position().unwrap().origin(), Point::new(10.0, 35.0));
}

#[test]
fn detached_floating_element_degrades_without_panicking() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();
    scene.dom.disconnect(scene.floating);

    let position = popover.update().unwrap();
    assert!(position.x.is_finite() && position.y.is_finite());
}

#[test]
fn invalid_configuration_degrades_to_defaults() {
    let scene = open_scene(1000.0, 800.0);
    let config = PopoverConfig::default().position("upside-down").margin("lots");
    let mut popover = scene.popover(&config);
    popover.attach();

    // Falls back to bottom-center with zero margin; 100px does not fit
    // centered under a 20px anchor at x=10, so start alignment wins.
    let position = popover.last_position().unwrap();
    assert_eq!(position.side, Some(Side::Bottom));
    assert_eq!(position.alignment, Some(tinct_popover::Alignment::Start));
    assert_eq!(position.y, 30.0);
    assert_eq!(position.x, 10.0);
}

// ============================================================================
// Visibility
// ============================================================================

fn scene_in_scroller() -> (Scene, tinct_harness::NodeId) {
    let dom = FakeDom::new(1000.0, 800.0);
    let scroller = dom.scroller(dom.body(), Rect::new(0.0, 0.0, 300.0, 300.0));
    let mut scene = Scene::with_dom(dom.clone());
    scene.anchor = dom.element(scroller, Rect::new(10.0, 100.0, 20.0, 20.0));
    (scene, scroller)
}

#[test]
fn anchor_scrolled_out_force_closes_even_when_always_open() {
    let (mut scene, scroller) = scene_in_scroller();
    scene.controller = RecordingController::new().always_open().opened();
    let mut popover = scene.popover(&PopoverConfig::default().toggle(false));
    popover.attach();
    assert!(scene.controller.is_open());

    scene.dom.scroll_contents(scroller, 0.0, 400.0);
    popover.handle_event(PopoverEvent::Scroll);

    assert!(!scene.controller.is_open());
    assert!(!popover.state().anchor_visible);
    assert_eq!(
        scene.controller.calls().last(),
        Some(&ToggleCall {
            open: false,
            forced: true
        })
    );
}

#[test]
fn always_open_popover_reopens_when_anchor_returns() {
    let (mut scene, scroller) = scene_in_scroller();
    scene.controller = RecordingController::new().always_open().opened();
    let mut popover = scene.popover(&PopoverConfig::default().toggle(false));
    popover.attach();

    scene.dom.scroll_contents(scroller, 0.0, 400.0);
    popover.handle_event(PopoverEvent::Scroll);
    let hidden_transform = scene.transform();

    scene.dom.scroll_contents(scroller, 0.0, -400.0);
    popover.handle_event(PopoverEvent::Scroll);

    assert!(scene.controller.is_open());
    assert!(popover.state().anchor_visible);
    assert_eq!(scene.transform().as_deref(), Some("translate(10px, 128px)"));
    assert_eq!(hidden_transform.as_deref(), Some("translate(10px, 128px)"));
}

#[test]
fn toggleable_popover_stays_closed_when_anchor_returns() {
    let (scene, scroller) = scene_in_scroller();
    scene.controller.set_open(true);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    scene.dom.scroll_contents(scroller, 0.0, 400.0);
    popover.handle_event(PopoverEvent::Scroll);
    scene.dom.scroll_contents(scroller, 0.0, -400.0);
    popover.handle_event(PopoverEvent::Scroll);

    assert!(!scene.controller.is_open());
    assert!(popover.state().anchor_visible);
}

#[test]
fn hidden_anchor_is_never_positioned_against() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&config("bottom-start", 5.0));
    popover.attach();

    scene
        .dom
        .set_rect(scene.anchor, Rect::new(10.0, -100.0, 20.0, 20.0));
    scene.controller.set_open(true);
    popover.handle_event(PopoverEvent::Resize);

    assert!(!scene.controller.is_open());
    assert_eq!(scene.transform().as_deref(), Some("translate(10px, 35px)"));
}

#[test]
fn observer_reports_drive_visibility() {
    let scene = Scene::with_dom(FakeDom::new(1000.0, 800.0).with_observer());
    let controller = RecordingController::new().always_open().opened();
    let mut popover = scene_popover_with(&scene, controller.clone());
    popover.attach();
    assert_eq!(scene.dom.observed(), vec![scene.anchor]);

    popover.handle_event(PopoverEvent::Visibility(false));
    assert!(!controller.is_open());
    // Repeated reports are deduplicated.
    popover.handle_event(PopoverEvent::Visibility(false));
    assert_eq!(controller.calls().len(), 1);

    popover.handle_event(PopoverEvent::Visibility(true));
    assert!(controller.is_open());

    popover.detach();
    assert!(scene.dom.observed().is_empty());
}

#[test]
fn observer_hosts_do_not_measure_visibility_on_scroll() {
    let scene = Scene::with_dom(FakeDom::new(1000.0, 800.0).with_observer());
    scene.controller.set_open(true);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    // Off-screen, but the observer has not said so yet.
    scene
        .dom
        .set_rect(scene.anchor, Rect::new(10.0, -100.0, 20.0, 20.0));
    popover.handle_event(PopoverEvent::Scroll);
    assert!(scene.controller.is_open());
    assert!(popover.state().anchor_visible);
}

#[test]
fn open_popover_over_hidden_anchor_closes_at_attach() {
    for dom in [
        FakeDom::new(1000.0, 800.0),
        FakeDom::new(1000.0, 800.0).with_observer(),
    ] {
        let scene = Scene::with_dom(dom);
        scene
            .dom
            .set_rect(scene.anchor, Rect::new(10.0, -100.0, 20.0, 20.0));
        scene.controller.set_open(true);
        let mut popover = scene.popover(&PopoverConfig::default());
        popover.attach();

        assert!(!scene.controller.is_open());
        assert!(!popover.state().anchor_visible);
        assert!(!popover.state().floating_visible);
        assert_eq!(scene.transform(), None);

        // The observer's first report repeats what attach measured.
        popover.handle_event(PopoverEvent::Visibility(false));
        assert_eq!(
            scene.controller.calls(),
            vec![ToggleCall {
                open: false,
                forced: true
            }]
        );
    }
}

#[test]
fn closed_popover_over_hidden_anchor_is_left_alone_at_attach() {
    let scene = Scene::new(1000.0, 800.0);
    scene
        .dom
        .set_rect(scene.anchor, Rect::new(10.0, -100.0, 20.0, 20.0));
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    assert!(scene.controller.calls().is_empty());
    assert!(!popover.state().anchor_visible);
}

fn scene_popover_with(
    scene: &Scene,
    controller: RecordingController,
) -> tinct_popover::Popover<FakeDom, RecordingController> {
    tinct_popover::Popover::new(
        scene.dom.clone(),
        scene.anchor,
        scene.floating,
        controller,
        &PopoverConfig::default().toggle(false),
    )
}

// ============================================================================
// Close on scroll
// ============================================================================

#[test]
fn close_on_scroll_closes_after_repositioning() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&config("bottom-start", 5.0).close_on_scroll(true));
    popover.attach();

    scene
        .dom
        .set_rect(scene.anchor, Rect::new(50.0, 10.0, 20.0, 20.0));
    popover.handle_event(PopoverEvent::Scroll);

    assert!(!scene.controller.is_open());
    assert_eq!(scene.transform().as_deref(), Some("translate(50px, 35px)"));
    assert_eq!(
        scene.controller.calls(),
        vec![ToggleCall {
            open: false,
            forced: true
        }]
    );
}

#[test]
fn close_on_scroll_ignores_resize() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default().close_on_scroll(true));
    popover.attach();

    popover.handle_event(PopoverEvent::Resize);
    assert!(scene.controller.is_open());
}

// ============================================================================
// Dismissal and focus trap
// ============================================================================

#[test]
fn pointer_down_outside_closes() {
    let scene = open_scene(1000.0, 800.0);
    let outside = scene.dom.element(scene.dom.body(), Rect::ZERO);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    popover.handle_event(PopoverEvent::PointerDown(outside));
    assert!(!scene.controller.is_open());
    assert_eq!(
        scene.controller.calls(),
        vec![ToggleCall {
            open: false,
            forced: false
        }]
    );
}

#[test]
fn pointer_down_on_anchor_floating_or_label_keeps_open() {
    let scene = open_scene(1000.0, 800.0);
    let inside = scene.dom.element(scene.floating, Rect::ZERO);
    let label = scene.dom.element(scene.dom.body(), Rect::ZERO);
    let label_text = scene.dom.element(label, Rect::ZERO);
    let mut popover = scene
        .popover(&PopoverConfig::default())
        .with_labels(vec![label]);
    popover.attach();

    for target in [scene.anchor, scene.floating, inside, label_text] {
        popover.handle_event(PopoverEvent::PointerDown(target));
        assert!(scene.controller.is_open(), "closed by {target:?}");
    }
    assert!(scene.controller.calls().is_empty());
}

#[test]
fn always_open_ignores_outside_pointer_down() {
    let mut scene = Scene::new(1000.0, 800.0);
    scene.controller = RecordingController::new().always_open().opened();
    let outside = scene.dom.element(scene.dom.body(), Rect::ZERO);
    let mut popover = scene.popover(&PopoverConfig::default().toggle(false));
    popover.attach();

    popover.handle_event(PopoverEvent::PointerDown(outside));
    assert!(scene.controller.is_open());
}

#[test]
fn escape_closes_and_returns_focus_to_anchor() {
    let scene = open_scene(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    let prevented = popover.handle_event(PopoverEvent::Key {
        key: KeyEvent::new(KeyCode::Escape),
        active: None,
    });
    assert!(!prevented);
    assert!(!scene.controller.is_open());
    assert_eq!(scene.dom.focused(), Some(scene.anchor));
}

#[test]
fn tab_off_either_end_returns_to_reference() {
    let scene = open_scene(1000.0, 800.0);
    let first = scene.dom.element(scene.floating, Rect::ZERO);
    let middle = scene.dom.element(scene.floating, Rect::ZERO);
    let last = scene.dom.element(scene.floating, Rect::ZERO);
    for id in [first, middle, last] {
        scene.dom.set_focusable(id, true);
    }
    let reference = scene.dom.element(scene.dom.body(), Rect::ZERO);
    let mut popover = scene
        .popover(&PopoverConfig::default())
        .with_reference(reference);
    popover.attach();

    let tab = KeyEvent::new(KeyCode::Tab);
    let shift_tab = tab.with_modifiers(Modifiers::SHIFT);

    assert!(!popover.handle_event(PopoverEvent::Key {
        key: tab,
        active: Some(middle),
    }));
    assert_eq!(scene.dom.focused(), None);

    assert!(popover.handle_event(PopoverEvent::Key {
        key: tab,
        active: Some(last),
    }));
    assert_eq!(scene.dom.focused(), Some(reference));

    assert!(popover.handle_event(PopoverEvent::Key {
        key: shift_tab,
        active: Some(first),
    }));
    assert!(!popover.handle_event(PopoverEvent::Key {
        key: shift_tab,
        active: Some(last),
    }));
    assert!(scene.controller.is_open());
}

#[test]
fn keys_are_ignored_while_closed() {
    let scene = Scene::new(1000.0, 800.0);
    let mut popover = scene.popover(&PopoverConfig::default());
    popover.attach();

    popover.handle_event(PopoverEvent::Key {
        key: KeyEvent::new(KeyCode::Escape),
        active: None,
    });
    assert!(scene.controller.calls().is_empty());
    assert_eq!(scene.dom.focused(), None);
}
