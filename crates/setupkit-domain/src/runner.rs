//! The closed set of supported test runners.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Recognized test runners. Parsing an unknown identifier fails, which is
/// what makes a bad `--runner` value a configuration error instead of a
/// deferred test-run failure.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TestRunner {
    #[default]
    Pytest,
    Nose,
    Unittest,
}

impl TestRunner {
    /// The Python module invoked via `python -m`.
    pub fn module(self) -> &'static str {
        match self {
            Self::Pytest => "pytest",
            Self::Nose => "nose",
            Self::Unittest => "unittest",
        }
    }

    pub const ALL: [Self; 3] = [Self::Pytest, Self::Nose, Self::Unittest];
}
