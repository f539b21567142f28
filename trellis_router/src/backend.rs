// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hook boundary between the router and the windowing backend.
//!
//! The router does not talk to a windowing library directly. When a window is
//! bound (lazily, on its first registration or first raw event) the router
//! asks its [`Backend`] to attach the six raw callbacks for that window, and
//! when the window is destroyed it asks the backend to detach them again.
//! Hook installation is therefore paired exactly with dispatch-state
//! lifetime: one install per live window, one removal per destroy.
//!
//! Embedders that already own their callback wiring — or tests — use
//! [`NoHooks`], which does nothing.

/// Attaches and detaches raw input callbacks for a window.
///
/// `install_hooks` is called exactly once when a window's dispatch state is
/// created, and `remove_hooks` exactly once when it is destroyed. A window
/// destroyed and then touched again is re-bound, so the calls always come in
/// install/remove pairs per window lifetime.
pub trait Backend<W> {
    /// Attach the raw input callbacks for `window`.
    fn install_hooks(&mut self, window: W);

    /// Detach the raw input callbacks for `window`.
    fn remove_hooks(&mut self, window: W);
}

/// A backend that installs nothing.
///
/// The default for embedders that forward raw callbacks to the router
/// themselves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoHooks;

impl<W> Backend<W> for NoHooks {
    fn install_hooks(&mut self, _window: W) {}

    fn remove_hooks(&mut self, _window: W) {}
}
