use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// Largest realign window accepted without `nocap`.
pub const REALIGN_WINDOW_CAP: usize = 15;

/// Largest tolerance accepted without `nocap`.
pub const TOLERATE_PERCENT_CAP: u32 = 35;

/// Tolerance is a percentage; `nocap` still stops here.
const TOLERATE_PERCENT_MAX: u32 = 100;

/// Validated alignment rules for one run. Construct with [`AlignmentPolicy::new`]
/// or [`PolicySettings::into_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentPolicy {
    realign_window: usize,
    tolerate_percent: u32,
    omit_identical: bool,
}

impl AlignmentPolicy {
    /// Validate and clamp raw values.
    ///
    /// Negative values are rejected even with `nocap`. Without `nocap` the
    /// window is clamped to 15 rows and the tolerance to 35%.
    pub fn new(
        realign_window: i64,
        tolerate_percent: i64,
        omit_identical: bool,
        nocap: bool,
    ) -> Result<Self, AlignError> {
        if realign_window < 0 {
            return Err(AlignError::Config { field: "realign_window", value: realign_window });
        }
        if tolerate_percent < 0 {
            return Err(AlignError::Config { field: "tolerate_percent", value: tolerate_percent });
        }

        let window = usize::try_from(realign_window).unwrap_or(usize::MAX);
        let tolerance = u32::try_from(tolerate_percent).unwrap_or(u32::MAX);

        let (window_cap, tolerance_cap) = if nocap {
            (usize::MAX, TOLERATE_PERCENT_MAX)
        } else {
            (REALIGN_WINDOW_CAP, TOLERATE_PERCENT_CAP)
        };

        if window > window_cap {
            log::debug!("realign_window {window} clamped to {window_cap}");
        }
        if tolerance > tolerance_cap {
            log::debug!("tolerate_percent {tolerance} clamped to {tolerance_cap}");
        }

        Ok(Self {
            realign_window: window.min(window_cap),
            tolerate_percent: tolerance.min(tolerance_cap),
            omit_identical,
        })
    }

    /// Positional matching only, exact sources only.
    pub fn strict() -> Self {
        Self { realign_window: 0, tolerate_percent: 0, omit_identical: false }
    }

    pub fn realign_window(&self) -> usize {
        self.realign_window
    }

    pub fn tolerate_percent(&self) -> u32 {
        self.tolerate_percent
    }

    pub fn omit_identical(&self) -> bool {
        self.omit_identical
    }
}

impl Default for AlignmentPolicy {
    fn default() -> Self {
        Self::strict()
    }
}

/// Raw, unvalidated policy values as they arrive from a config file or
/// command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySettings {
    #[serde(default)]
    pub realign_window: i64,
    #[serde(default)]
    pub tolerate_percent: i64,
    #[serde(default)]
    pub omit_identical: bool,
    #[serde(default)]
    pub nocap: bool,
}

impl PolicySettings {
    pub fn into_policy(self) -> Result<AlignmentPolicy, AlignError> {
        AlignmentPolicy::new(self.realign_window, self.tolerate_percent, self.omit_identical, self.nocap)
    }
}
