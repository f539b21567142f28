// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Router: per-window dispatch tables and event routing.
//!
//! ## Overview
//!
//! This crate is the runtime half of Trellis, the input-event demultiplexer.
//! The compiler half ([`trellis_filter`]) lowers filter strings into
//! structured binding specifications; this crate owns the per-window dispatch
//! state those bindings are installed into and routes every raw backend
//! callback to the delegates whose canonical key matches.
//!
//! - [`Router`] — the caller-owned registry: window state store, the six
//!   raw-event entry points, and the registration facade
//!   (`insert`/`remove`/`destroy`). No global state; run as many independent
//!   routers as you like.
//! - [`Backend`] — the hook boundary. The router asks it to attach the raw
//!   callbacks for a window when the window binds (lazily, on first use) and
//!   to detach them when the window is destroyed. [`NoHooks`] is the no-op
//!   default.
//! - [`BindingId`] — the stable handle returned by `insert`, removing
//!   exactly the entries that call installed.
//!
//! ## Semantics
//!
//! - One dispatch state per live window, created lazily and destroyed only by
//!   [`Router::destroy`] (which fails with [`NotBound`] if there is nothing
//!   to destroy).
//! - For a fixed (window, category, key), delegates fire sorted by
//!   descending priority, ties in registration order; events are processed
//!   strictly in delivery order, synchronously, on the caller's thread.
//! - Registration is all-or-nothing per filter: a compile error installs
//!   nothing and does not bind the window.
//! - The first cursor sample after a bind is recorded but never dispatched;
//!   every later sample is compared per axis against the previous one.
//!
//! # Examples
//!
//! ```
//! use core::cell::RefCell;
//! use std::rc::Rc;
//!
//! use trellis_filter::{Action, Button, Event, Mods};
//! use trellis_router::Router;
//!
//! let mut router: Router<u32> = Router::new();
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let seen = Rc::clone(&log);
//! router
//!     .insert(1, "[left;press][x]", move |event| {
//!         let tag = match event {
//!             Event::MouseButton { .. } => "click",
//!             Event::CursorPos { .. } => "move",
//!             _ => "other",
//!         };
//!         seen.borrow_mut().push(tag);
//!     })
//!     .unwrap();
//!
//! router.on_mouse_button(1, Button::LEFT, Action::Press, Mods::empty());
//! router.on_cursor_pos(1, 0.0, 0.0); // first sample: recorded, not dispatched
//! router.on_cursor_pos(1, 4.0, 0.0); // x moved
//! assert_eq!(*log.borrow(), ["click", "move"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`. It is single-threaded by design:
//! delegates are `Rc`-shared and dispatch runs on whatever thread the
//! backend delivers callbacks from.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod router;
mod state;

pub use backend::{Backend, NoHooks};
pub use router::{NotBound, NotFound, Router};
pub use state::BindingId;
