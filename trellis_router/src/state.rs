// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-window dispatch state: six canonical-key tables plus cursor tracking.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;
use trellis_filter::{AxisKey, BindingSpec, ButtonChord, Crossing, Event, KeyChord};

/// Stable identifier for one registration.
///
/// Returned by `Router::insert`; identifies every binding that call installed
/// (one per filter clause). Ids are assigned monotonically and never reused,
/// so a stale handle can never alias a newer registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub(crate) u64);

/// A registered callback, shared between the clauses of one registration.
pub(crate) type Delegate = Rc<dyn Fn(&Event)>;

/// Snapshot of the delegates to run for one derived key.
pub(crate) type Run = SmallVec<[Delegate; 4]>;

pub(crate) struct Slot {
    pub(crate) id: BindingId,
    pub(crate) priority: i32,
    pub(crate) delegate: Delegate,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Dispatch state for one window.
///
/// One table per event category, each mapping a canonical key to the ordered
/// delegate list for that key. Lists are kept sorted by descending priority;
/// within a priority, registration order is preserved, so all-default
/// registrations dispatch in the order they were made.
///
/// `last_cursor` is the most recent cursor sample; `None` means no sample has
/// been seen since this state was (re)bound, which suppresses dispatch for
/// the first cursor event.
#[derive(Debug, Default)]
pub(crate) struct DispatchState {
    keys: HashMap<KeyChord, Vec<Slot>>,
    codepoints: HashMap<char, Vec<Slot>>,
    buttons: HashMap<ButtonChord, Vec<Slot>>,
    cursor: HashMap<AxisKey, Vec<Slot>>,
    crossings: HashMap<Crossing, Vec<Slot>>,
    scroll: HashMap<AxisKey, Vec<Slot>>,
    pub(crate) last_cursor: Option<(f64, f64)>,
}

impl DispatchState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Install a slot under its canonical key.
    ///
    /// The slot lands after every entry of equal or higher priority and
    /// before the first strictly lower one, which keeps the list stable with
    /// respect to registration order.
    pub(crate) fn install(&mut self, spec: BindingSpec, slot: Slot) {
        let list = match spec {
            BindingSpec::Key(chord) => self.keys.entry(chord).or_default(),
            BindingSpec::Codepoint(codepoint) => self.codepoints.entry(codepoint).or_default(),
            BindingSpec::Button(chord) => self.buttons.entry(chord).or_default(),
            BindingSpec::CursorPos(axis) => self.cursor.entry(axis).or_default(),
            BindingSpec::CursorEnter(crossing) => self.crossings.entry(crossing).or_default(),
            BindingSpec::Scroll(axis) => self.scroll.entry(axis).or_default(),
        };
        let at = list
            .iter()
            .position(|s| s.priority < slot.priority)
            .unwrap_or(list.len());
        list.insert(at, slot);
    }

    /// Snapshot the delegates registered for one derived key.
    ///
    /// The snapshot is taken before any delegate runs, so the table can be
    /// mutated behind it without disturbing an in-flight dispatch.
    pub(crate) fn run_for(&self, spec: BindingSpec) -> Run {
        let list = match spec {
            BindingSpec::Key(chord) => self.keys.get(&chord),
            BindingSpec::Codepoint(codepoint) => self.codepoints.get(&codepoint),
            BindingSpec::Button(chord) => self.buttons.get(&chord),
            BindingSpec::CursorPos(axis) => self.cursor.get(&axis),
            BindingSpec::CursorEnter(crossing) => self.crossings.get(&crossing),
            BindingSpec::Scroll(axis) => self.scroll.get(&axis),
        };
        list.map(|slots| slots.iter().map(|s| s.delegate.clone()).collect())
            .unwrap_or_default()
    }

    /// Remove every slot installed under `spec` by the registration `id`.
    pub(crate) fn remove_binding(&mut self, spec: BindingSpec, id: BindingId) {
        match spec {
            BindingSpec::Key(chord) => remove_from(&mut self.keys, &chord, id),
            BindingSpec::Codepoint(codepoint) => remove_from(&mut self.codepoints, &codepoint, id),
            BindingSpec::Button(chord) => remove_from(&mut self.buttons, &chord, id),
            BindingSpec::CursorPos(axis) => remove_from(&mut self.cursor, &axis, id),
            BindingSpec::CursorEnter(crossing) => remove_from(&mut self.crossings, &crossing, id),
            BindingSpec::Scroll(axis) => remove_from(&mut self.scroll, &axis, id),
        }
    }

    /// Every registration id with at least one slot in this state.
    pub(crate) fn binding_ids(&self) -> impl Iterator<Item = BindingId> + '_ {
        self.keys
            .values()
            .chain(self.codepoints.values())
            .chain(self.buttons.values())
            .chain(self.cursor.values())
            .chain(self.crossings.values())
            .chain(self.scroll.values())
            .flat_map(|slots| slots.iter().map(|s| s.id))
    }
}

fn remove_from<K: Eq + Hash>(map: &mut HashMap<K, Vec<Slot>>, key: &K, id: BindingId) {
    if let Some(slots) = map.get_mut(key) {
        slots.retain(|s| s.id != id);
        if slots.is_empty() {
            map.remove(key);
        }
    }
}
