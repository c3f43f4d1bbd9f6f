// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reasons a link cannot be made or found.

use core::fmt;

use tangle_property::ValueKind;

use crate::hook::HookAddr;
use crate::link::{LinkId, LinkState};

/// Why a link was refused.
///
/// None of these are fatal: a refused drag simply discards the link.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LinkError<K: fmt::Debug> {
    /// Outlet and inlet value types are incompatible.
    #[error("cannot link {outlet} ({outlet_kind}) to {inlet} ({inlet_kind})")]
    TypeMismatch {
        /// The outlet end.
        outlet: HookAddr<K>,
        /// Its type.
        outlet_kind: ValueKind,
        /// The inlet end.
        inlet: HookAddr<K>,
        /// Its type.
        inlet_kind: ValueKind,
    },
    /// The inlet already has an attached link.
    #[error("{inlet} is already driven by {link}")]
    Occupied {
        /// The inlet.
        inlet: HookAddr<K>,
        /// The link that holds it.
        link: LinkId,
    },
    /// Both ends belong to one widget.
    #[error("cannot link two hooks of {owner:?}")]
    SameWidget {
        /// The widget.
        owner: K,
    },
    /// Both ends are outlets, or both are inlets.
    #[error("cannot link {a} to {b}: same direction")]
    SameDirection {
        /// One end.
        a: HookAddr<K>,
        /// The other end.
        b: HookAddr<K>,
    },
    /// No such hook is registered.
    #[error("unknown hook {0}")]
    UnknownHook(HookAddr<K>),
    /// No such attached link.
    #[error("unknown {0}")]
    UnknownLink(LinkId),
    /// The link is not in a state that allows this transition.
    #[error("{link} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        /// The link.
        link: LinkId,
        /// Its current state.
        from: LinkState,
        /// The requested state.
        to: LinkState,
    },
}
