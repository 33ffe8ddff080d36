use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// View the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identifier of a task, standalone or inside a group.
    TaskId
);
string_id!(
    /// Identifier of a task group.
    GroupId
);
string_id!(
    /// Identifier of a sub-task, unique within its parent task.
    SubTaskId
);
string_id!(
    /// Identifier of a tag.
    TagId
);

// UUID v7 leads with a millisecond timestamp followed by random bits.
fn unique_suffix() -> Uuid {
    Uuid::now_v7()
}

impl TaskId {
    /// Generate a fresh `task-<uuid>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("task-{}", unique_suffix()))
    }
}

impl GroupId {
    /// Generate a fresh `group-<uuid>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("group-{}", unique_suffix()))
    }
}

impl SubTaskId {
    /// Generate a sub-task identifier scoped under its parent task.
    #[must_use]
    pub fn generate_for(parent: &TaskId) -> Self {
        Self(format!("{parent}-subtask-{}", unique_suffix()))
    }
}

impl TagId {
    /// Generate an identifier for a user-created tag.
    #[must_use]
    pub fn generate_custom() -> Self {
        Self(format!("custom-{}", unique_suffix()))
    }
}
