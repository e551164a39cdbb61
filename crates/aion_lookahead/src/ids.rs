//! Opaque ID newtypes for lookahead entities.
//!
//! [`NodeId`], [`SwitchId`], [`SegmentId`], and [`BoxId`] are thin `u32`
//! wrappers used as indices into externally-owned tables (the RRG, the
//! switch catalogue, the segment catalogue, the connection-box database).
//! They are `Copy`, `Hash`, and `Serialize`/`Deserialize`.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node in the routing-resource graph.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for a switch in the switch catalogue.
    SwitchId
);

define_id!(
    /// Opaque, copyable ID for a wire-segment type.
    SegmentId
);

define_id!(
    /// Opaque, copyable ID for a connection box.
    BoxId
);
