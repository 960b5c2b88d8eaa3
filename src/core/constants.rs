// src/core/constants.rs

//! Mathematical constants used by the coherence protocol.

/// Golden-ratio constants and the angles derived from them.
pub mod golden {
    /// The golden ratio φ (Phi).
    pub const PHI: f64 = 1.618_033_988_749_895;
    /// Its inverse φ⁻¹ = φ − 1, used as the protocol's rotation angle.
    pub const PHI_CONJ: f64 = 1.0 / PHI;
    /// Factor applied to the anxiety level on every emergency recovery.
    pub const GOLDEN_REDUCTION: f64 = 0.618;
    /// Used for rotation angles
    pub const PI: f64 = std::f64::consts::PI;
}
