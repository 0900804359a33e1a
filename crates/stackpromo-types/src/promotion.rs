use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// One half of a promotion comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The image currently tagged for the current group.
    Current,
    /// The image about to be promoted.
    Next,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Current, Side::Next];

    /// Short tag used in progress output.
    pub fn short(self) -> &'static str {
        match self {
            Side::Current => "cur",
            Side::Next => "nxt",
        }
    }

    /// Name of the rendered env file written for this side.
    pub fn env_file_name(self) -> &'static str {
        match self {
            Side::Current => "current-image.env",
            Side::Next => "next-image.env",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Current => "current",
            Side::Next => "next",
        })
    }
}

/// A request to compare the latest image of `current_group` against the
/// latest image of `next_group` for one stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackPromotion {
    stack: String,
    current_group: String,
    next_group: String,
}

impl StackPromotion {
    pub fn new(
        stack: impl Into<String>,
        current_group: impl Into<String>,
        next_group: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let request = Self {
            stack: stack.into(),
            current_group: current_group.into(),
            next_group: next_group.into(),
        };
        if request.stack.is_empty() {
            return Err(TypeError::EmptyField("stack"));
        }
        if request.current_group.is_empty() {
            return Err(TypeError::EmptyField("current group"));
        }
        if request.next_group.is_empty() {
            return Err(TypeError::EmptyField("next group"));
        }
        Ok(request)
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }

    pub fn current_group(&self) -> &str {
        &self.current_group
    }

    pub fn next_group(&self) -> &str {
        &self.next_group
    }

    pub fn group(&self, side: Side) -> &str {
        match side {
            Side::Current => &self.current_group,
            Side::Next => &self.next_group,
        }
    }
}
