// src/operations/mod.rs

//! Gates and circuit operations.
//!
//! A [`Gate`] is a single-qubit unitary. An [`Operation`] places a gate on a
//! qubit, optionally conditioned on one or more control qubits, or performs a
//! non-unitary step (measurement, reset) or a scheduling barrier.

use crate::core::QubitId;
use num_complex::Complex;
use num_traits::Zero;
use std::f64::consts::FRAC_1_SQRT_2;

/// 2x2 complex matrix acting on the {|0⟩, |1⟩} basis of one qubit.
pub type Matrix2 = [[Complex<f64>; 2]; 2];

/// Single-qubit gates used by the coherence protocol.
#[derive(Debug, Clone, Copy, PartialEq)] // f64 parameters, so no Eq
pub enum Gate {
    /// Hadamard: equal superposition from a basis state.
    H,
    /// Bit flip.
    X,
    /// Rotation about the X axis by `theta` radians.
    Rx(f64),
    /// Rotation about the Y axis by `theta` radians.
    Ry(f64),
    /// Phase gate `diag(1, e^(iλ))`, the `u1` gate.
    Phase(f64),
    /// Generic single-qubit rotation `U3(θ, φ, λ)`.
    U3 { theta: f64, phi: f64, lambda: f64 },
}

impl Gate {
    /// Returns the unitary matrix for this gate.
    pub fn matrix(&self) -> Matrix2 {
        let one = Complex::new(1.0, 0.0);
        let i = Complex::i();
        match *self {
            Gate::H => {
                let h = Complex::new(FRAC_1_SQRT_2, 0.0);
                [[h, h], [h, -h]]
            }
            Gate::X => [[Complex::zero(), one], [one, Complex::zero()]],
            Gate::Rx(theta) => {
                let (sin_a, cos_a) = (theta / 2.0).sin_cos();
                // Rx(theta) = [[cos(a), -i*sin(a)], [-i*sin(a), cos(a)]] where a=theta/2
                [
                    [Complex::new(cos_a, 0.0), -i * sin_a],
                    [-i * sin_a, Complex::new(cos_a, 0.0)],
                ]
            }
            Gate::Ry(theta) => {
                let (sin_a, cos_a) = (theta / 2.0).sin_cos();
                [
                    [Complex::new(cos_a, 0.0), Complex::new(-sin_a, 0.0)],
                    [Complex::new(sin_a, 0.0), Complex::new(cos_a, 0.0)],
                ]
            }
            Gate::Phase(lambda) => [
                [one, Complex::zero()],
                [Complex::zero(), Complex::from_polar(1.0, lambda)],
            ],
            Gate::U3 { theta, phi, lambda } => {
                let (sin_a, cos_a) = (theta / 2.0).sin_cos();
                [
                    [Complex::new(cos_a, 0.0), -Complex::from_polar(sin_a, lambda)],
                    [Complex::from_polar(sin_a, phi), Complex::from_polar(cos_a, phi + lambda)],
                ]
            }
        }
    }

    /// Short label used in circuit diagrams.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::H => "H",
            Gate::X => "X",
            Gate::Rx(_) => "RX",
            Gate::Ry(_) => "RY",
            Gate::Phase(_) => "U1",
            Gate::U3 { .. } => "U3",
        }
    }
}

/// One step of a circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Apply `gate` to `target`.
    Gate {
        target: QubitId,
        gate: Gate,
    },

    /// Apply `gate` to `target` only on basis states where every control reads `1`.
    ///
    /// One control gives cx/crx/cry/cu3; two controls with [`Gate::X`] is the Toffoli gate.
    Controlled {
        controls: Vec<QubitId>,
        target: QubitId,
        gate: Gate,
    },

    /// Measure `qubit` in the computational basis and write the result to classical bit `clbit`.
    Measure {
        qubit: QubitId,
        clbit: usize,
    },

    /// Return `qubit` to |0⟩, whatever its state.
    Reset {
        qubit: QubitId,
    },

    /// Scheduling fence; has no effect on the simulated state.
    Barrier,
}

impl Operation {
    /// Returns every qubit named by this operation, controls first.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Operation::Gate { target, .. } => vec![*target],
            Operation::Controlled { controls, target, .. } => {
                let mut qubits = controls.clone();
                qubits.push(*target);
                qubits
            }
            Operation::Measure { qubit, .. } => vec![*qubit],
            Operation::Reset { qubit } => vec![*qubit],
            Operation::Barrier => Vec::new(),
        }
    }

    /// `true` for gates and controlled gates.
    pub fn is_unitary(&self) -> bool {
        matches!(self, Operation::Gate { .. } | Operation::Controlled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PI;
    use approx::assert_abs_diff_eq;

    fn assert_matrix_eq(actual: &Matrix2, expected: &Matrix2) {
        for r in 0..2 {
            for c in 0..2 {
                assert_abs_diff_eq!(actual[r][c].re, expected[r][c].re, epsilon = 1e-12);
                assert_abs_diff_eq!(actual[r][c].im, expected[r][c].im, epsilon = 1e-12);
            }
        }
    }

    fn is_unitary(m: &Matrix2) -> bool {
        // Columns orthonormal
        let c0 = m[0][0].norm_sqr() + m[1][0].norm_sqr();
        let c1 = m[0][1].norm_sqr() + m[1][1].norm_sqr();
        let dot = m[0][0].conj() * m[0][1] + m[1][0].conj() * m[1][1];
        (c0 - 1.0).abs() < 1e-12 && (c1 - 1.0).abs() < 1e-12 && dot.norm() < 1e-12
    }

    #[test]
    fn all_gates_are_unitary() {
        let gates = [
            Gate::H,
            Gate::X,
            Gate::Rx(0.618),
            Gate::Ry(1.3),
            Gate::Phase(-0.618),
            Gate::U3 { theta: PI / 4.0, phi: 0.0, lambda: PI / 2.0 },
        ];
        for gate in gates {
            assert!(is_unitary(&gate.matrix()), "{:?} is not unitary", gate);
        }
    }

    #[test]
    fn u3_reduces_to_ry_and_phase() {
        let theta = 0.9;
        assert_matrix_eq(
            &Gate::U3 { theta, phi: 0.0, lambda: 0.0 }.matrix(),
            &Gate::Ry(theta).matrix(),
        );
        let lambda = 0.4;
        assert_matrix_eq(
            &Gate::U3 { theta: 0.0, phi: 0.0, lambda }.matrix(),
            &Gate::Phase(lambda).matrix(),
        );
    }

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn rx_matches_reference_matrix() {
        let h = FRAC_1_SQRT_2;
        // RX(π/2) = 1/√2 [[1, -i], [-i, 1]]
        assert_matrix_eq(&Gate::Rx(PI / 2.0).matrix(), &[[c(h, 0.0), c(0.0, -h)], [c(0.0, -h), c(h, 0.0)]]);
        // RX(π) = -iX
        assert_matrix_eq(&Gate::Rx(PI).matrix(), &[[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, -1.0), c(0.0, 0.0)]]);
    }

    #[test]
    fn ry_and_phase_match_reference_matrices() {
        let h = FRAC_1_SQRT_2;
        assert_matrix_eq(&Gate::Ry(PI / 2.0).matrix(), &[[c(h, 0.0), c(-h, 0.0)], [c(h, 0.0), c(h, 0.0)]]);
        assert_matrix_eq(&Gate::Phase(PI / 2.0).matrix(), &[[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.0, 1.0)]]);
    }

    #[test]
    fn u3_matches_reference_matrix_with_all_angles() {
        // U3(θ, φ, λ) = [[cos(θ/2), -e^(iλ) sin(θ/2)], [e^(iφ) sin(θ/2), e^(i(φ+λ)) cos(θ/2)]]
        let h = FRAC_1_SQRT_2;
        let gate = Gate::U3 { theta: PI / 2.0, phi: PI / 2.0, lambda: PI / 4.0 };
        assert_matrix_eq(&gate.matrix(), &[[c(h, 0.0), c(-0.5, -0.5)], [c(0.0, h), c(-0.5, 0.5)]]);

        // The protocol's stabiliser, U3(π/4, 0, π/2)
        let (s, co) = (PI / 8.0).sin_cos();
        let gate = Gate::U3 { theta: PI / 4.0, phi: 0.0, lambda: PI / 2.0 };
        assert_matrix_eq(&gate.matrix(), &[[c(co, 0.0), c(0.0, -s)], [c(s, 0.0), c(0.0, co)]]);
    }

    #[test]
    fn involved_qubits_lists_controls_then_target() {
        let op = Operation::Controlled {
            controls: vec![QubitId(2), QubitId(5)],
            target: QubitId(6),
            gate: Gate::X,
        };
        assert_eq!(op.involved_qubits(), vec![QubitId(2), QubitId(5), QubitId(6)]);
        assert!(op.is_unitary());
        assert!(Operation::Barrier.involved_qubits().is_empty());
        assert!(!Operation::Reset { qubit: QubitId(0) }.is_unitary());
    }
}
