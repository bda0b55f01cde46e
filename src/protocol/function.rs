//! Function families the server can evaluate.

use std::fmt;
use std::str::FromStr;

use crate::error::CurvewireError;

/// Mathematical function a request asks the server to sample.
///
/// The wire name doubles as the display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    SineIntegral,
    CosineIntegral,
    BesselFunction,
    FresnelIntegralS,
    FresnelIntegralC,
}

impl FunctionKind {
    /// All kinds in selector order.
    pub const ALL: [FunctionKind; 5] = [
        FunctionKind::SineIntegral,
        FunctionKind::CosineIntegral,
        FunctionKind::BesselFunction,
        FunctionKind::FresnelIntegralS,
        FunctionKind::FresnelIntegralC,
    ];

    /// Exact, case-sensitive command name sent on the wire.
    pub const fn wire_name(self) -> &'static str {
        match self {
            FunctionKind::SineIntegral => "Sine integral",
            FunctionKind::CosineIntegral => "Cosine integral",
            FunctionKind::BesselFunction => "Bessel function",
            FunctionKind::FresnelIntegralS => "Fresnel integral S",
            FunctionKind::FresnelIntegralC => "Fresnel integral C",
        }
    }

    /// Human-readable label (same text as the wire name).
    #[inline]
    pub const fn label(self) -> &'static str {
        self.wire_name()
    }

    /// Whether requests for this kind carry an integer order.
    #[inline]
    pub const fn requires_order(self) -> bool {
        matches!(self, FunctionKind::BesselFunction)
    }

    /// Position in [`FunctionKind::ALL`].
    pub fn index(self) -> usize {
        FunctionKind::ALL
            .iter()
            .position(|k| *k == self)
            .unwrap_or_default()
    }

    /// Kind at `index` in selector order.
    pub fn from_index(index: usize) -> Option<Self> {
        FunctionKind::ALL.get(index).copied()
    }

    /// Look up a kind by its exact wire name.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        FunctionKind::ALL.into_iter().find(|k| k.wire_name() == name)
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FunctionKind {
    type Err = CurvewireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionKind::from_wire_name(s)
            .ok_or_else(|| CurvewireError::InvalidParameters(format!("unknown function: {:?}", s)))
    }
}
