//! Generation options: the closed sets the backend understands for region,
//! resume structure and writing tone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed option set whose wire form is its display label.
macro_rules! option_set {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in presentation order. The first one is the default.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownOption {
                        kind: $kind,
                        value: wanted.to_string(),
                    })
            }
        }
    };
}

option_set! {
    /// Target job market. Drives formatting and content conventions server-side.
    Region, "region" {
        UnitedStates => "United States",
        Canada => "Canada",
        UnitedKingdom => "United Kingdom",
        Australia => "Australia",
        Dubai => "Dubai (UAE)",
        Singapore => "Singapore",
        HongKong => "Hong Kong",
        India => "India",
        Europe => "Europe (EU Standard CV)",
    }
}

option_set! {
    /// Structural template category for the generated resume.
    ResumeType, "resume type" {
        Chronological => "Chronological",
        Functional => "Functional",
        Combination => "Combination",
        Infographic => "Infographic",
        Profile => "Profile",
        Targeted => "Targeted",
        Nontraditional => "Nontraditional",
        MiniResume => "Mini-Resume",
    }
}

option_set! {
    Tone, "tone" {
        Formal => "Formal",
        Concise => "Concise",
        Creative => "Creative",
        Executive => "Executive",
    }
}

/// The options sent alongside every generation and optimization request.
/// Always fully populated; each field is replaced wholesale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeOptions {
    pub region: Region,
    pub resume_type: ResumeType,
    pub tone: Tone,
}
