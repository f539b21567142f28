// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `trellis_router` crate.
//!
//! These exercise the full registration → raw event → delegate path: lazy
//! window binding, hook pairing, canonical-key matching per category,
//! dispatch order, and handle/window teardown.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_filter::{Action, Button, Event, KeyCode, Mods};
use trellis_router::{Backend, BindingId, NotBound, NotFound, Router};

/// Shared counter a delegate bumps on every invocation.
fn counter() -> (Rc<Cell<u32>>, impl Fn(&Event) + 'static) {
    let hits = Rc::new(Cell::new(0));
    let seen = Rc::clone(&hits);
    (hits, move |_: &Event| seen.set(seen.get() + 1))
}

/// Shared log a delegate appends `tag` to on every invocation.
fn logger(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl Fn(&Event) + 'static {
    let log = Rc::clone(log);
    move |_: &Event| log.borrow_mut().push(tag)
}

/// Hook backend that records install/remove calls per window.
#[derive(Clone, Default)]
struct CountingHooks {
    installs: Rc<RefCell<Vec<u32>>>,
    removals: Rc<RefCell<Vec<u32>>>,
}

impl Backend<u32> for CountingHooks {
    fn install_hooks(&mut self, window: u32) {
        self.installs.borrow_mut().push(window);
    }

    fn remove_hooks(&mut self, window: u32) {
        self.removals.borrow_mut().push(window);
    }
}

#[test]
fn button_press_matches_press_and_not_release() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[1;press]", delegate).unwrap();

    router.on_mouse_button(1, Button::RIGHT, Action::Press, Mods::empty());
    assert_eq!(hits.get(), 1);

    router.on_mouse_button(1, Button::RIGHT, Action::Release, Mods::empty());
    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    assert_eq!(hits.get(), 1);
}

#[test]
fn cursor_axis_filters_see_only_their_axis() {
    let mut router: Router<u32> = Router::new();
    let (x_hits, x_delegate) = counter();
    let (y_hits, y_delegate) = counter();
    router.insert(1, "[x]", x_delegate).unwrap();
    router.insert(1, "[y]", y_delegate).unwrap();

    router.on_cursor_pos(1, 5.0, 5.0); // first sample: recorded only
    router.on_cursor_pos(1, 5.0, 9.0); // y changed, x unchanged
    assert_eq!(x_hits.get(), 0);
    assert_eq!(y_hits.get(), 1);
}

#[test]
fn combined_axis_key_requires_both_axes() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    router.insert(1, "[x]", logger(&log, "x")).unwrap();
    router.insert(1, "[y]", logger(&log, "y")).unwrap();
    router.insert(1, "[xy]", logger(&log, "xy")).unwrap();

    router.on_cursor_pos(1, 0.0, 0.0);
    router.on_cursor_pos(1, 1.0, 1.0); // both axes: x, then y, then xy
    router.on_cursor_pos(1, 2.0, 1.0); // x only
    assert_eq!(*log.borrow(), ["x", "y", "xy", "x"]);
}

#[test]
fn first_cursor_sample_never_dispatches_and_seeds_deltas() {
    let mut router: Router<u32> = Router::new();
    let deltas = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&deltas);
    router
        .insert(1, "[xy]", move |event| {
            if let Event::CursorPos { dx, dy, .. } = event {
                seen.borrow_mut().push((*dx, *dy));
            }
        })
        .unwrap();

    router.on_cursor_pos(1, 10.0, 20.0);
    assert!(deltas.borrow().is_empty());

    router.on_cursor_pos(1, 13.0, 24.0);
    assert_eq!(*deltas.borrow(), [(3.0, 4.0)]);
}

#[test]
fn key_filter_requires_exact_modifier_mask() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[65;shift,ctrl;press]", delegate).unwrap();

    // Missing ctrl: no match.
    router.on_key(1, KeyCode(65), 30, Action::Press, Mods::SHIFT);
    assert_eq!(hits.get(), 0);

    // Both modifiers, wrong action: no match.
    router.on_key(
        1,
        KeyCode(65),
        30,
        Action::Release,
        Mods::SHIFT | Mods::CONTROL,
    );
    assert_eq!(hits.get(), 0);

    router.on_key(
        1,
        KeyCode(65),
        30,
        Action::Press,
        Mods::SHIFT | Mods::CONTROL,
    );
    assert_eq!(hits.get(), 1);
}

#[test]
fn scancode_does_not_participate_in_matching() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[32;;press]", delegate).unwrap();

    router.on_key(1, KeyCode(32), 57, Action::Press, Mods::empty());
    router.on_key(1, KeyCode(32), 1234, Action::Press, Mods::empty());
    assert_eq!(hits.get(), 2);
}

#[test]
fn key_repeat_is_its_own_canonical_key() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[65;;repeat]", delegate).unwrap();

    router.on_key(1, KeyCode(65), 30, Action::Press, Mods::empty());
    assert_eq!(hits.get(), 0);
    router.on_key(1, KeyCode(65), 30, Action::Repeat, Mods::empty());
    assert_eq!(hits.get(), 1);
}

#[test]
fn unicode_filter_matches_character_input() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[97;unicode;]", delegate).unwrap();

    router.on_char(1, 'a');
    router.on_char(1, 'b');
    assert_eq!(hits.get(), 1);
}

#[test]
fn enter_and_leave_are_independent_keys() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    router.insert(1, "[enter]", logger(&log, "enter")).unwrap();
    router.insert(1, "[leave]", logger(&log, "leave")).unwrap();

    router.on_cursor_enter(1, true);
    router.on_cursor_enter(1, false);
    router.on_cursor_enter(1, true);
    assert_eq!(*log.borrow(), ["enter", "leave", "enter"]);
}

#[test]
fn scroll_dispatches_only_non_zero_axes() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    router.insert(1, "[sx]", logger(&log, "sx")).unwrap();
    router.insert(1, "[sy]", logger(&log, "sy")).unwrap();
    router.insert(1, "[sxsy]", logger(&log, "sxsy")).unwrap();

    router.on_scroll(1, 0.0, -1.0);
    router.on_scroll(1, 2.0, 0.0);
    router.on_scroll(1, 1.0, 1.0);
    assert_eq!(*log.borrow(), ["sy", "sx", "sx", "sy", "sxsy"]);
}

#[test]
fn identical_filters_dispatch_in_registration_order() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    router.insert(1, "[left;press]", logger(&log, "first")).unwrap();
    router.insert(1, "[left;press]", logger(&log, "second")).unwrap();

    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    assert_eq!(*log.borrow(), ["first", "second"]);
}

#[test]
fn higher_priority_dispatches_first() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    router
        .insert_with_priority(1, "[left;press]", 0, logger(&log, "low"))
        .unwrap();
    router
        .insert_with_priority(1, "[left;press]", 10, logger(&log, "high"))
        .unwrap();
    router
        .insert_with_priority(1, "[left;press]", 10, logger(&log, "high2"))
        .unwrap();

    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    assert_eq!(*log.borrow(), ["high", "high2", "low"]);
}

#[test]
fn invalid_clause_installs_nothing() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    assert!(router.insert(1, "[x][bogus]", delegate).is_err());
    assert_eq!(router.binding_count(), 0);

    // The valid first clause must not have been installed either.
    router.on_cursor_pos(1, 0.0, 0.0);
    router.on_cursor_pos(1, 1.0, 0.0);
    assert_eq!(hits.get(), 0);
}

#[test]
fn remove_splices_exactly_one_registration() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let first = router.insert(1, "[left;press]", logger(&log, "first")).unwrap();
    let _second = router.insert(1, "[left;press]", logger(&log, "second")).unwrap();

    router.remove(first).unwrap();
    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    assert_eq!(*log.borrow(), ["second"]);
    assert_eq!(router.binding_count(), 1);
}

#[test]
fn remove_detaches_every_clause_of_the_registration() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    let id = router.insert(1, "[left;press][enter]", delegate).unwrap();

    router.remove(id).unwrap();
    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    router.on_cursor_enter(1, true);
    assert_eq!(hits.get(), 0);
}

#[test]
fn remove_unknown_handle_is_not_found() {
    let mut router: Router<u32> = Router::new();
    let id = router.insert(1, "[enter]", |_| {}).unwrap();
    router.remove(id).unwrap();
    assert_eq!(router.remove(id), Err(NotFound));
}

#[test]
fn destroy_unbound_window_is_not_bound() {
    let mut router: Router<u32> = Router::new();
    assert_eq!(router.destroy(42), Err(NotBound));
}

#[test]
fn destroy_invalidates_handles_and_later_events_rebind() {
    let hooks = CountingHooks::default();
    let mut router: Router<u32, CountingHooks> = Router::with_backend(hooks.clone());

    let (hits, delegate) = counter();
    let id = router.insert(1, "[left;press]", delegate).unwrap();
    router.destroy(1).unwrap();

    // The handle died with its window.
    assert_eq!(router.remove(id), Err(NotFound));
    assert_eq!(router.binding_count(), 0);

    // A later raw event lazily re-binds the window with fresh, empty state.
    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    assert!(router.is_bound(1));
    assert_eq!(hits.get(), 0);

    assert_eq!(*hooks.installs.borrow(), [1, 1]);
    assert_eq!(*hooks.removals.borrow(), [1]);
}

#[test]
fn hooks_install_once_per_window_lifetime() {
    let hooks = CountingHooks::default();
    let mut router: Router<u32, CountingHooks> = Router::with_backend(hooks.clone());

    router.insert(1, "[x]", |_| {}).unwrap();
    router.insert(1, "[y]", |_| {}).unwrap();
    router.on_cursor_pos(1, 0.0, 0.0);
    router.insert(2, "[x]", |_| {}).unwrap();

    assert_eq!(*hooks.installs.borrow(), [1, 2]);
    assert!(hooks.removals.borrow().is_empty());
}

#[test]
fn destroy_resets_cursor_tracking() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[x]", delegate).unwrap();

    router.on_cursor_pos(1, 0.0, 0.0);
    router.on_cursor_pos(1, 5.0, 0.0);
    assert_eq!(hits.get(), 1);

    router.destroy(1).unwrap();

    // After a re-bind the first sample is suppressed again, and the old
    // binding is gone.
    router.on_cursor_pos(1, 9.0, 0.0);
    router.on_cursor_pos(1, 12.0, 0.0);
    assert_eq!(hits.get(), 1);
    assert_eq!(router.last_cursor(1), Some((12.0, 0.0)));
}

#[test]
fn one_delegate_serves_every_clause_of_its_filter() {
    let mut router: Router<u32> = Router::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&log);
    router
        .insert(1, "[left;press][enter]", move |event| {
            let tag = match event {
                Event::MouseButton { .. } => "click",
                Event::CursorEnter { .. } => "enter",
                _ => "other",
            };
            seen.borrow_mut().push(tag);
        })
        .unwrap();

    router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
    router.on_cursor_enter(1, true);
    assert_eq!(*log.borrow(), ["click", "enter"]);
}

#[test]
fn windows_are_isolated_from_each_other() {
    let mut router: Router<u32> = Router::new();
    let (hits, delegate) = counter();
    router.insert(1, "[enter]", delegate).unwrap();

    router.on_cursor_enter(2, true);
    assert_eq!(hits.get(), 0);
    router.on_cursor_enter(1, true);
    assert_eq!(hits.get(), 1);
}

#[test]
fn binding_ids_are_never_reused() {
    let mut router: Router<u32> = Router::new();
    let first = router.insert(1, "[enter]", |_| {}).unwrap();
    router.remove(first).unwrap();
    let second = router.insert(1, "[enter]", |_| {}).unwrap();
    assert_ne!(first, second);
}

#[test]
fn handles_are_plain_copyable_ids() {
    // BindingId is Copy + Eq + Hash so embedders can keep them in maps.
    fn assert_handle<T: Copy + Eq + std::hash::Hash>(_: T) {}
    let mut router: Router<u32> = Router::new();
    let id: BindingId = router.insert(1, "[enter]", |_| {}).unwrap();
    assert_handle(id);
}
