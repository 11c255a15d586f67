use std::fmt;

macro_rules! workspace_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            /// Wraps a raw id. Ids handed out by a workspace are never reused.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

workspace_id!(
    /// Identifies a chip within one workspace.
    ChipId,
    "chip"
);
workspace_id!(
    /// Identifies a clause within one workspace.
    ClauseId,
    "clause"
);
workspace_id!(
    /// Identifies an OR-group within one workspace.
    OrGroupId,
    "group"
);
