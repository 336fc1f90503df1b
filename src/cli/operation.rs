use std::{fmt, str::FromStr};

use super::CliError;

/// A single bus operation given on the `eval` command line.
///
/// | Syntax      | Operation          |
/// |-------------|--------------------|
/// | `key=value` | `set_parameter`    |
/// | `key`       | `get_parameter`    |
/// | `!key`      | `remove_parameter` |
/// | `*`         | `get_parameters`   |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Store a value.
    Set {
        /// Parameter key
        key: String,
        /// New value
        value: String,
    },
    /// Read one parameter.
    Get {
        /// Parameter key
        key: String,
    },
    /// Remove one parameter.
    Remove {
        /// Parameter key
        key: String,
    },
    /// Read every parameter.
    GetAll,
}

impl Operation {
    /// Key this operation touches, if it targets a single key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Operation::Set { key, .. } | Operation::Get { key } | Operation::Remove { key } => {
                Some(key)
            }
            Operation::GetAll => None,
        }
    }
}

impl FromStr for Operation {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s == "*" {
            return Ok(Operation::GetAll);
        }

        let operation = if let Some((key, value)) = s.split_once('=') {
            Operation::Set {
                key: key.trim().to_string(),
                value: value.to_string(),
            }
        } else if let Some(key) = s.strip_prefix('!') {
            Operation::Remove {
                key: key.trim().to_string(),
            }
        } else {
            Operation::Get { key: s.to_string() }
        };

        if operation.key().is_some_and(str::is_empty) {
            return Err(CliError::InvalidArguments(format!(
                "operation '{s}' has an empty key"
            )));
        }

        Ok(operation)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Set { key, value } => write!(f, "{key}={value}"),
            Operation::Get { key } => write!(f, "{key}"),
            Operation::Remove { key } => write!(f, "!{key}"),
            Operation::GetAll => write!(f, "*"),
        }
    }
}
