//! Tri-state check outcome

use std::fmt;

/// Result of one drift check on one host
///
/// `Undeterminable` means the host could not be asked (transport failure,
/// unresolved upstream). It is never folded into `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckResult {
    /// The question could not be answered
    #[default]
    Undeterminable,
    /// Drift is present
    Detected,
    /// Checked and clean
    Clear,
}

impl CheckResult {
    #[must_use]
    pub fn is_detected(self) -> bool {
        matches!(self, CheckResult::Detected)
    }

    #[must_use]
    pub fn is_undeterminable(self) -> bool {
        matches!(self, CheckResult::Undeterminable)
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckResult::Undeterminable => "undeterminable",
            CheckResult::Detected => "detected",
            CheckResult::Clear => "clear",
        };
        f.write_str(label)
    }
}
