// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Filter: the filter-string compiler and canonical input vocabulary.
//!
//! ## Overview
//!
//! Interactive applications want to subscribe to input declaratively: "call
//! this delegate when key 65 is pressed with shift and ctrl held". This crate
//! compiles that compact textual filter language into [`BindingSpec`] values
//! — structured (category, canonical key) pairs — which the router crate
//! installs into per-window dispatch tables and matches against the canonical
//! keys it derives from raw backend callbacks.
//!
//! [`compile()`] is a pure function of its input: no window, no registry, no
//! side effects. That keeps the grammar testable in isolation and guarantees
//! the all-or-nothing installation contract — a registration either installs
//! every clause of a filter or, on the first invalid clause, nothing at all.
//!
//! ## Filter language
//!
//! ```text
//! [x]                    cursor moved along x
//! [sxsy]                 scrolled on both axes at once
//! [enter]                cursor entered the window
//! [left;press]           left mouse button pressed
//! [65;shift,ctrl;press]  key 65 pressed with shift+ctrl held
//! [97;unicode;]          character input of codepoint 97 ('a')
//! [x][left;press]        one delegate, two bindings
//! ```
//!
//! See the [`compile`](mod@compile) module docs for the full grammar and
//! validation rules. The reserved `{…}` key-combination syntax is rejected with a
//! distinct error rather than silently ignored.
//!
//! ## Canonical keys
//!
//! Matching is `Eq` on structured keys ([`KeyChord`], [`ButtonChord`],
//! [`AxisKey`], [`Crossing`], `char`), never string comparison. The raw
//! integer encodings the backend uses for actions, modifiers, and buttons are
//! translated through the total tables documented in [`types`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod compile;
pub mod types;

pub use compile::{CompileError, compile};
pub use types::{
    Action, Axes, AxisKey, BindingSpec, Button, ButtonChord, Category, Crossing, Event, KeyChord,
    KeyCode, Mods,
};
