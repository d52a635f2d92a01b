//! Amida Ladder Graph
//!
//! Ghost-leg (Amidakuji) ladders as a mutable graph of nodes on two families of
//! circular doubly-linked lists.
//!
//! # Model
//!
//! - **Lanes** are vertical lists. A lane's top node is an endpoint, and the
//!   list wraps from its last node back to that top.
//! - **Rungs** are horizontal lists. A node with a horizontal partner is a rung
//!   node; one without is an endpoint.
//!
//! Nodes live in an arena owned by [`Ladder`] and refer to each other by
//! [`NodeId`], so the cyclic structure needs no shared ownership.
//!
//! # Reversible edits
//!
//! [`Ladder::solo`] detaches a node from its rung and [`Ladder::unsolo`]
//! restores it exactly. [`Ladder::solo_scoped`] wraps the pair in a guard that
//! reattaches on drop, which is what recursive analysis should use.
//!
//! # Fixing
//!
//! [`Ladder::fix`] freezes the endpoint/rung counters and caches the density
//! `r = 0.5 * d / n`. Rung topology cannot change while fixed; only scoped
//! solo/unsolo edits are allowed.

mod error;
mod ladder;
mod node;
mod straight;

pub use error::{Error, LinkDirection, Result};
pub use ladder::{Ladder, SoloGuard};
pub use node::{Node, NodeId};
pub use straight::StraightLadder;
