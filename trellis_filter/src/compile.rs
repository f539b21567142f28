// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The filter compiler: lower a filter string into [`BindingSpec`]s.
//!
//! ## Grammar
//!
//! A filter is one or more bracketed clauses, `[clause][clause]…`. Each
//! clause compiles independently into exactly one binding. The clause body is
//! split on `;` into one, two, or three fields, and the field count selects
//! the category:
//!
//! | Fields | Category | Form |
//! |--------|----------|------|
//! | 1 | cursor axis, scroll axis, or crossing | `x`, `y`, `xy`, `sx`, `sy`, `sxsy`, `enter`, `leave` |
//! | 2 | mouse button | `button;state` with button ∈ `left`/`middle`/`right` or an index `0..=8`, state ∈ `press`/`release` |
//! | 3 | key | `key;modifiers;state` with a decimal key code, a comma-separated modifier list, state ∈ `press`/`release`/`repeat` |
//!
//! A `unicode` token in the modifier list reroutes the clause to the
//! Codepoint category: the key field is then read as a decimal Unicode scalar
//! value and the state field is ignored.
//!
//! Compilation is all-or-nothing: any invalid clause fails the whole filter,
//! and the registration facade installs either every clause's binding or
//! none.
//!
//! A clause beginning with `{` is the reserved key-combination syntax. It is
//! not part of this grammar and is rejected with
//! [`CompileError::UnsupportedChord`] so that it can never be mistaken for a
//! successfully installed binding.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::types::{
    Action, AxisKey, BindingSpec, Button, ButtonChord, Crossing, KeyChord, KeyCode, Mods,
};

/// Why a filter string failed to compile.
///
/// `clause` indices are zero-based positions of the offending clause within
/// the filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
    /// The filter string was empty.
    Empty,
    /// The filter was not a sequence of `[...]` clauses.
    Unbracketed,
    /// The clause used the reserved key-combination (`{…}`) syntax.
    UnsupportedChord {
        /// Position of the offending clause.
        clause: usize,
    },
    /// A token was not recognized in its position.
    UnknownToken {
        /// Position of the offending clause.
        clause: usize,
        /// The token as written.
        token: String,
    },
    /// A mouse-button index was outside `0..=8`.
    ButtonOutOfRange {
        /// Position of the offending clause.
        clause: usize,
        /// The parsed index.
        index: i64,
    },
    /// The key field of a key clause was not a decimal key code.
    BadKeyCode {
        /// Position of the offending clause.
        clause: usize,
        /// The field as written.
        token: String,
    },
    /// The key field of a `unicode` clause was not a Unicode scalar value.
    BadCodepoint {
        /// Position of the offending clause.
        clause: usize,
        /// The parsed value.
        value: u64,
    },
    /// The clause had a field count outside `1..=3`.
    MalformedClause {
        /// Position of the offending clause.
        clause: usize,
        /// The number of fields found.
        fields: usize,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "filter string is empty"),
            Self::Unbracketed => write!(f, "filter is not a sequence of [..] clauses"),
            Self::UnsupportedChord { clause } => {
                write!(f, "clause {clause}: key-combination syntax is not supported")
            }
            Self::UnknownToken { clause, token } => {
                write!(f, "clause {clause}: unrecognized token {token:?}")
            }
            Self::ButtonOutOfRange { clause, index } => {
                write!(f, "clause {clause}: button index {index} is outside 0..=8")
            }
            Self::BadKeyCode { clause, token } => {
                write!(f, "clause {clause}: {token:?} is not a decimal key code")
            }
            Self::BadCodepoint { clause, value } => {
                write!(f, "clause {clause}: {value} is not a Unicode scalar value")
            }
            Self::MalformedClause { clause, fields } => {
                write!(f, "clause {clause}: expected 1 to 3 fields, found {fields}")
            }
        }
    }
}

impl core::error::Error for CompileError {}

/// Compile a filter string into its ordered binding specifications.
///
/// Pure and deterministic: the same input always yields the same ordered
/// output, and nothing is installed anywhere — installation is the
/// registration facade's job.
///
/// # Examples
///
/// ```
/// use trellis_filter::{
///     compile, Action, AxisKey, BindingSpec, KeyChord, KeyCode, Mods,
/// };
///
/// let specs = compile("[x][65;shift,ctrl;press]").unwrap();
/// assert_eq!(
///     specs,
///     vec![
///         BindingSpec::CursorPos(AxisKey::X),
///         BindingSpec::Key(KeyChord {
///             key: KeyCode(65),
///             mods: Mods::SHIFT | Mods::CONTROL,
///             action: Action::Press,
///         }),
///     ]
/// );
/// ```
///
/// Any invalid clause fails the whole filter:
///
/// ```
/// use trellis_filter::compile;
///
/// assert!(compile("[x][bogus]").is_err());
/// ```
pub fn compile(filter: &str) -> Result<Vec<BindingSpec>, CompileError> {
    if filter.is_empty() {
        return Err(CompileError::Empty);
    }
    let body = filter
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(CompileError::Unbracketed)?;

    body.split("][")
        .enumerate()
        .map(|(index, clause)| compile_clause(index, clause))
        .collect()
}

fn compile_clause(index: usize, clause: &str) -> Result<BindingSpec, CompileError> {
    if clause.starts_with('{') {
        return Err(CompileError::UnsupportedChord { clause: index });
    }
    let fields: Vec<&str> = clause.split(';').collect();
    match fields.as_slice() {
        [token] => compile_axis_or_crossing(index, token),
        [button, state] => compile_button(index, button, state),
        [key, modifiers, state] => compile_key(index, key, modifiers, state),
        _ => Err(CompileError::MalformedClause {
            clause: index,
            fields: fields.len(),
        }),
    }
}

fn compile_axis_or_crossing(index: usize, token: &str) -> Result<BindingSpec, CompileError> {
    let spec = match token {
        "x" => BindingSpec::CursorPos(AxisKey::X),
        "y" => BindingSpec::CursorPos(AxisKey::Y),
        "xy" => BindingSpec::CursorPos(AxisKey::Both),
        "sx" => BindingSpec::Scroll(AxisKey::X),
        "sy" => BindingSpec::Scroll(AxisKey::Y),
        "sxsy" => BindingSpec::Scroll(AxisKey::Both),
        "enter" => BindingSpec::CursorEnter(Crossing::Entered),
        "leave" => BindingSpec::CursorEnter(Crossing::Left),
        _ => {
            return Err(CompileError::UnknownToken {
                clause: index,
                token: token.to_string(),
            });
        }
    };
    Ok(spec)
}

fn compile_button(index: usize, button: &str, state: &str) -> Result<BindingSpec, CompileError> {
    let button = match button {
        "left" => Button::LEFT,
        "middle" => Button::MIDDLE,
        "right" => Button::RIGHT,
        literal => {
            let parsed: i64 = literal.parse().map_err(|_| CompileError::UnknownToken {
                clause: index,
                token: literal.to_string(),
            })?;
            u8::try_from(parsed)
                .ok()
                .and_then(Button::from_index)
                .ok_or(CompileError::ButtonOutOfRange {
                    clause: index,
                    index: parsed,
                })?
        }
    };
    // Buttons do not repeat; only press and release are valid here.
    let action = match state {
        "press" => Action::Press,
        "release" => Action::Release,
        _ => {
            return Err(CompileError::UnknownToken {
                clause: index,
                token: state.to_string(),
            });
        }
    };
    Ok(BindingSpec::Button(ButtonChord { button, action }))
}

fn compile_key(
    index: usize,
    key: &str,
    modifiers: &str,
    state: &str,
) -> Result<BindingSpec, CompileError> {
    let mut mods = Mods::empty();
    let mut unicode = false;
    for token in modifiers.split(',') {
        match token {
            "" => continue,
            // Reroutes the clause to the Codepoint category; the remaining
            // modifier tokens and the state field are not consulted.
            "unicode" => {
                unicode = true;
                break;
            }
            "alt" => mods |= Mods::ALT,
            "ctrl" => mods |= Mods::CONTROL,
            "shift" => mods |= Mods::SHIFT,
            "super" => mods |= Mods::SUPER,
            "capslock" => mods |= Mods::CAPS_LOCK,
            "numlock" => mods |= Mods::NUM_LOCK,
            unknown => {
                return Err(CompileError::UnknownToken {
                    clause: index,
                    token: unknown.to_string(),
                });
            }
        }
    }

    if unicode {
        let value: u64 = key.parse().map_err(|_| CompileError::BadKeyCode {
            clause: index,
            token: key.to_string(),
        })?;
        let codepoint = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .ok_or(CompileError::BadCodepoint {
                clause: index,
                value,
            })?;
        return Ok(BindingSpec::Codepoint(codepoint));
    }

    let code: i32 = key.parse().map_err(|_| CompileError::BadKeyCode {
        clause: index,
        token: key.to_string(),
    })?;
    let action = match state {
        "press" => Action::Press,
        "release" => Action::Release,
        "repeat" => Action::Repeat,
        _ => {
            return Err(CompileError::UnknownToken {
                clause: index,
                token: state.to_string(),
            });
        }
    };
    Ok(BindingSpec::Key(KeyChord {
        key: KeyCode(code),
        mods,
        action,
    }))
}
