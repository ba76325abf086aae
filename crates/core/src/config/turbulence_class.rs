//! IEC 61400-1 turbulence categories

use crate::error::{EvoTurbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IEC turbulence class (IEC 61400-1:2005, table 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TurbulenceClass {
    /// Very high turbulence, `I_ref` = 0.18
    APlus,
    /// High turbulence, `I_ref` = 0.16
    A,
    /// Medium turbulence, `I_ref` = 0.14
    B,
    /// Low turbulence, `I_ref` = 0.12
    C,
}

impl TurbulenceClass {
    /// Expected turbulence intensity at 15 m/s
    ///
    /// Edition 2005 defines `I_ref` as the mean value, not a representative
    /// value.
    #[must_use]
    pub fn reference_intensity(self) -> f64 {
        match self {
            Self::APlus => 0.18,
            Self::A => 0.16,
            Self::B => 0.14,
            Self::C => 0.12,
        }
    }

    /// Name as written in generator input files
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl FromStr for TurbulenceClass {
    type Err = EvoTurbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A+" => Ok(Self::APlus),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            other => Err(EvoTurbError::configuration(format!(
                "unknown turbulence class '{other}', expected A+, A, B or C"
            ))),
        }
    }
}

impl TryFrom<String> for TurbulenceClass {
    type Error = EvoTurbError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TurbulenceClass> for String {
    fn from(class: TurbulenceClass) -> Self {
        class.name().to_string()
    }
}

impl fmt::Display for TurbulenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
