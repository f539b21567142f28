// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The router: window state store, event routing, and the registration
//! facade.
//!
//! ## Overview
//!
//! [`Router`] is the single entry point for both sides of the system:
//!
//! - Application code registers delegates against filter strings with
//!   [`Router::insert`] and tears them down with [`Router::remove`] /
//!   [`Router::destroy`].
//! - The windowing backend feeds raw callbacks into the six `on_*` entry
//!   points, which derive the same canonical keys the compiler produces and
//!   invoke every matching delegate in dispatch order.
//!
//! The router is an ordinary caller-owned value — there is no global
//! registry. Tests and embedders can run any number of independent routers.
//!
//! ## Dispatch order
//!
//! For one derived key, delegates run sorted by descending priority, ties in
//! registration order. When one raw event derives several keys (cursor and
//! scroll events can match `x`, `y`, and the combined key), the lists run in
//! the order X, then Y, then Both. Dispatch is synchronous: each delegate
//! returns before the next is invoked, and events for one window are
//! processed strictly in delivery order.
//!
//! Delegate lists are snapshotted before iteration, so a delegate can never
//! observe a half-mutated table. Panics from delegates are not caught; an
//! unwinding delegate aborts dispatch of that event for the delegates after
//! it.

use alloc::rc::Rc;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;
use trellis_filter::{
    Action, Axes, AxisKey, BindingSpec, Button, ButtonChord, CompileError, Crossing, Event,
    KeyChord, KeyCode, Mods, compile,
};

use crate::backend::{Backend, NoHooks};
use crate::state::{BindingId, Delegate, DispatchState, Run, Slot};

/// Error from [`Router::destroy`]: the window has no dispatch state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NotBound;

impl fmt::Display for NotBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window is not bound")
    }
}

impl core::error::Error for NotBound {}

/// Error from [`Router::remove`]: the handle does not name a live
/// registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no such binding")
    }
}

impl core::error::Error for NotFound {}

struct Registration<W> {
    window: W,
    specs: SmallVec<[BindingSpec; 2]>,
}

/// The input-event demultiplexer.
///
/// Generic over the opaque window identity `W` (any cheap comparable token
/// the backend hands out) and the hook [`Backend`] `B`, which defaults to
/// [`NoHooks`].
///
/// ## Usage
///
/// - Construct with [`Router::new`] (backend from `Default`) or
///   [`Router::with_backend`].
/// - Register delegates with [`Router::insert`] /
///   [`Router::insert_with_priority`]; both compile the filter first and
///   install either every clause's binding or, on a compile error, none.
/// - Feed raw backend callbacks into [`Router::on_key`], [`Router::on_char`],
///   [`Router::on_mouse_button`], [`Router::on_cursor_pos`],
///   [`Router::on_cursor_enter`], and [`Router::on_scroll`].
/// - Tear down a single registration with [`Router::remove`], or a whole
///   window with [`Router::destroy`].
///
/// Windows bind lazily: the first registration or raw event for an unknown
/// window creates its dispatch state and asks the backend to install hooks,
/// exactly once. [`Router::destroy`] removes the hooks and drops the state;
/// a later event for the same window re-binds it from scratch.
///
/// # Examples
///
/// ```
/// use core::cell::Cell;
/// use std::rc::Rc;
///
/// use trellis_filter::{Action, KeyCode, Mods};
/// use trellis_router::Router;
///
/// let mut router: Router<u32> = Router::new();
///
/// let presses = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&presses);
/// router
///     .insert(1, "[65;shift;press]", move |_| seen.set(seen.get() + 1))
///     .unwrap();
///
/// // Matching modifiers and action: dispatched.
/// router.on_key(1, KeyCode(65), 30, Action::Press, Mods::SHIFT);
/// // Wrong action: not dispatched.
/// router.on_key(1, KeyCode(65), 30, Action::Release, Mods::SHIFT);
/// assert_eq!(presses.get(), 1);
/// ```
pub struct Router<W, B = NoHooks> {
    states: HashMap<W, DispatchState>,
    handles: HashMap<BindingId, Registration<W>>,
    backend: B,
    next_id: u64,
}

impl<W, B> fmt::Debug for Router<W, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("windows", &self.states.len())
            .field("bindings", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl<W: Copy + Eq + Hash, B: Backend<W> + Default> Router<W, B> {
    /// Create a router with a default-constructed backend.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<W: Copy + Eq + Hash, B: Backend<W> + Default> Default for Router<W, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Copy + Eq + Hash, B: Backend<W>> Router<W, B> {
    /// Create a router with an explicit backend instance.
    pub fn with_backend(backend: B) -> Self {
        Self {
            states: HashMap::new(),
            handles: HashMap::new(),
            backend,
            next_id: 1,
        }
    }

    /// Register `delegate` for every clause of `filter` on `window`, at the
    /// default priority 0.
    ///
    /// Returns a stable handle identifying the whole registration. On a
    /// compile error nothing is installed.
    pub fn insert(
        &mut self,
        window: W,
        filter: &str,
        delegate: impl Fn(&Event) + 'static,
    ) -> Result<BindingId, CompileError> {
        self.insert_with_priority(window, filter, 0, delegate)
    }

    /// Register `delegate` with an explicit dispatch priority.
    ///
    /// Higher priorities dispatch earlier; registrations sharing a priority
    /// dispatch in registration order. The delegate is shared between the
    /// filter's clauses, so a multi-clause filter invokes the same callback
    /// from each of its bindings.
    pub fn insert_with_priority(
        &mut self,
        window: W,
        filter: &str,
        priority: i32,
        delegate: impl Fn(&Event) + 'static,
    ) -> Result<BindingId, CompileError> {
        // Compile before touching any state: a bad filter must not bind the
        // window, let alone install a subset of its clauses.
        let specs = compile(filter)?;
        let delegate: Delegate = Rc::new(delegate);
        let id = BindingId(self.next_id);
        self.next_id += 1;

        let state = self.state_mut(window);
        for &spec in &specs {
            state.install(
                spec,
                Slot {
                    id,
                    priority,
                    delegate: Rc::clone(&delegate),
                },
            );
        }
        self.handles.insert(
            id,
            Registration {
                window,
                specs: specs.iter().copied().collect(),
            },
        );
        Ok(id)
    }

    /// Detach the registration behind `id`.
    ///
    /// Splices exactly the entries that registration installed; other
    /// delegates at the same keys keep their positions. Fails with
    /// [`NotFound`] if the handle was already removed or its window was
    /// destroyed.
    pub fn remove(&mut self, id: BindingId) -> Result<(), NotFound> {
        let registration = self.handles.remove(&id).ok_or(NotFound)?;
        if let Some(state) = self.states.get_mut(&registration.window) {
            for &spec in &registration.specs {
                state.remove_binding(spec, id);
            }
        }
        Ok(())
    }

    /// Unbind `window`: remove its backend hooks, drop its dispatch state,
    /// and invalidate every handle registered on it.
    ///
    /// Fails with [`NotBound`] if the window has no state. A later raw event
    /// or registration re-binds the window lazily.
    pub fn destroy(&mut self, window: W) -> Result<(), NotBound> {
        let state = self.states.remove(&window).ok_or(NotBound)?;
        self.backend.remove_hooks(window);
        for id in state.binding_ids() {
            self.handles.remove(&id);
        }
        Ok(())
    }

    /// Whether `window` currently has dispatch state.
    pub fn is_bound(&self, window: W) -> bool {
        self.states.contains_key(&window)
    }

    /// The number of live registrations across all windows.
    pub fn binding_count(&self) -> usize {
        self.handles.len()
    }

    /// The last cursor sample recorded for `window`, if any.
    pub fn last_cursor(&self, window: W) -> Option<(f64, f64)> {
        self.states.get(&window).and_then(|s| s.last_cursor)
    }

    /// Route a raw key callback.
    ///
    /// Derives the canonical key chord (key code, modifier mask, action; the
    /// scancode is carried on the event but does not participate in
    /// matching).
    pub fn on_key(&mut self, window: W, key: KeyCode, scancode: i32, action: Action, mods: Mods) {
        let state = self.state_mut(window);
        let run = state.run_for(BindingSpec::Key(KeyChord { key, mods, action }));
        let event = Event::Key {
            key,
            scancode,
            action,
            mods,
        };
        deliver(&run, &event);
    }

    /// Route a raw character callback.
    pub fn on_char(&mut self, window: W, codepoint: char) {
        let state = self.state_mut(window);
        let run = state.run_for(BindingSpec::Codepoint(codepoint));
        let event = Event::Codepoint { codepoint };
        deliver(&run, &event);
    }

    /// Route a raw mouse-button callback.
    ///
    /// The modifier mask is carried on the event but does not participate in
    /// matching.
    pub fn on_mouse_button(&mut self, window: W, button: Button, action: Action, mods: Mods) {
        let state = self.state_mut(window);
        let run = state.run_for(BindingSpec::Button(ButtonChord { button, action }));
        let event = Event::MouseButton {
            button,
            action,
            mods,
        };
        deliver(&run, &event);
    }

    /// Route a raw cursor-position callback.
    ///
    /// The very first sample after a window binds only records the position;
    /// there is nothing to compare against, so nothing is dispatched. Later
    /// samples compare per axis against the stored sample with a near-zero
    /// tolerance and dispatch to `x`, `y`, and — when both axes changed —
    /// the combined `xy` key, in that order.
    pub fn on_cursor_pos(&mut self, window: W, x: f64, y: f64) {
        let state = self.state_mut(window);
        let Some((prev_x, prev_y)) = state.last_cursor else {
            state.last_cursor = Some((x, y));
            return;
        };
        let mut moved = Axes::empty();
        if axis_changed(prev_x, x) {
            moved |= Axes::X;
        }
        if axis_changed(prev_y, y) {
            moved |= Axes::Y;
        }
        state.last_cursor = Some((x, y));
        if moved.is_empty() {
            return;
        }

        let event = Event::CursorPos {
            x,
            y,
            dx: x - prev_x,
            dy: y - prev_y,
            moved,
        };
        let x_run = run_if(state, moved.contains(Axes::X), BindingSpec::CursorPos(AxisKey::X));
        let y_run = run_if(state, moved.contains(Axes::Y), BindingSpec::CursorPos(AxisKey::Y));
        let both_run = run_if(state, moved.is_all(), BindingSpec::CursorPos(AxisKey::Both));
        deliver(&x_run, &event);
        deliver(&y_run, &event);
        deliver(&both_run, &event);
    }

    /// Route a raw cursor enter/leave callback.
    pub fn on_cursor_enter(&mut self, window: W, entered: bool) {
        let state = self.state_mut(window);
        let crossing = if entered {
            Crossing::Entered
        } else {
            Crossing::Left
        };
        let run = state.run_for(BindingSpec::CursorEnter(crossing));
        let event = Event::CursorEnter { entered };
        deliver(&run, &event);
    }

    /// Route a raw scroll callback.
    ///
    /// Dispatches to `sx` when the horizontal offset is non-zero, `sy` when
    /// the vertical one is, and additionally to the combined `sxsy` key when
    /// both are, in that order. An all-zero offset pair dispatches nothing.
    pub fn on_scroll(&mut self, window: W, dx: f64, dy: f64) {
        let state = self.state_mut(window);
        let mut scrolled = Axes::empty();
        if dx != 0.0 {
            scrolled |= Axes::X;
        }
        if dy != 0.0 {
            scrolled |= Axes::Y;
        }
        if scrolled.is_empty() {
            return;
        }

        let event = Event::Scroll { dx, dy, scrolled };
        let x_run = run_if(state, scrolled.contains(Axes::X), BindingSpec::Scroll(AxisKey::X));
        let y_run = run_if(state, scrolled.contains(Axes::Y), BindingSpec::Scroll(AxisKey::Y));
        let both_run = run_if(state, scrolled.is_all(), BindingSpec::Scroll(AxisKey::Both));
        deliver(&x_run, &event);
        deliver(&y_run, &event);
        deliver(&both_run, &event);
    }

    /// Resolve the dispatch state for `window`, binding it lazily.
    ///
    /// Hook installation happens here and only here, so it runs exactly once
    /// per window lifetime.
    fn state_mut(&mut self, window: W) -> &mut DispatchState {
        self.states.entry(window).or_insert_with(|| {
            self.backend.install_hooks(window);
            DispatchState::new()
        })
    }
}

/// Whether a coordinate moved between two samples, within a near-zero
/// tolerance.
fn axis_changed(previous: f64, current: f64) -> bool {
    let delta = if current > previous {
        current - previous
    } else {
        previous - current
    };
    delta > f64::EPSILON
}

fn run_if(state: &DispatchState, condition: bool, spec: BindingSpec) -> Run {
    if condition {
        state.run_for(spec)
    } else {
        Run::new()
    }
}

fn deliver(run: &Run, event: &Event) {
    for delegate in run {
        delegate(event);
    }
}
