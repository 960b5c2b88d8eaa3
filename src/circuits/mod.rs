// src/circuits/mod.rs

//! Defines structures for representing and building ordered sequences of
//! operations (`qcoherence::operations::Operation`) over named registers.
//!
//! A [`Circuit`] owns its quantum and classical registers and validates every
//! operation as it is appended, so a circuit that exists is a circuit the
//! simulator can run.

use crate::core::{CoherenceError, QubitId, Result};
use crate::operations::{Gate, Operation};
use std::collections::HashSet;
use std::fmt;

/// A named, contiguous block of qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumRegister {
    name: String,
    offset: usize,
    size: usize,
}

impl QuantumRegister {
    /// A register of `size` qubits whose first qubit has global index `offset`.
    pub fn new(name: &str, offset: usize, size: usize) -> Self {
        Self { name: name.to_string(), offset, size }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Global id of the `index`-th qubit of this register.
    ///
    /// # Panics
    /// If `index` is not below the register size, like slice indexing.
    pub fn qubit(&self, index: usize) -> QubitId {
        assert!(index < self.size, "register '{}' has {} qubits, index {} requested", self.name, self.size, index);
        QubitId(self.offset + index)
    }

    /// Global id of the `index`-th qubit, or an error when the register is too small.
    pub fn try_qubit(&self, index: usize) -> Result<QubitId> {
        if index < self.size {
            Ok(QubitId(self.offset + index))
        } else {
            Err(CoherenceError::RegisterIndexOutOfRange { register: self.name.clone(), index, size: self.size })
        }
    }

    /// All qubits of the register in order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (self.offset..self.offset + self.size).map(QubitId)
    }

    fn contains(&self, qubit: QubitId) -> bool {
        (self.offset..self.offset + self.size).contains(&qubit.0)
    }
}

/// A named, contiguous block of classical bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    name: String,
    offset: usize,
    size: usize,
}

impl ClassicalRegister {
    /// A register of `size` classical bits starting at global index `offset`.
    pub fn new(name: &str, offset: usize, size: usize) -> Self {
        Self { name: name.to_string(), offset, size }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Global index of the `index`-th bit of this register.
    ///
    /// # Panics
    /// If `index` is not below the register size.
    pub fn bit(&self, index: usize) -> usize {
        assert!(index < self.size, "register '{}' has {} bits, index {} requested", self.name, self.size, index);
        self.offset + index
    }

    /// Global index of the `index`-th bit, or an error when the register is too small.
    pub fn try_bit(&self, index: usize) -> Result<usize> {
        if index < self.size {
            Ok(self.offset + index)
        } else {
            Err(CoherenceError::RegisterIndexOutOfRange { register: self.name.clone(), index, size: self.size })
        }
    }
}

/// Ordered sequence of operations over a fixed set of registers.
///
/// Analogy: similar to `qiskit.QuantumCircuit`, the sequence of gates and
/// measurements applied to qubits, with measurement results landing in
/// classical bits.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    num_qubits: usize,
    num_clbits: usize,
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a circuit over the given registers, with no operations.
    pub fn with_registers(qregs: Vec<QuantumRegister>, cregs: Vec<ClassicalRegister>) -> Self {
        let num_qubits = qregs.iter().map(|r| r.size).sum();
        let num_clbits = cregs.iter().map(|r| r.size).sum();
        Self { qregs, cregs, num_qubits, num_clbits, operations: Vec::new() }
    }

    /// Appends an operation after checking it against the registers.
    ///
    /// # Errors
    /// * `QubitOutOfRange` / `ClbitOutOfRange` for indices outside the registers.
    /// * `InvalidOperation` when a controlled gate repeats a qubit.
    pub fn add_operation(&mut self, op: Operation) -> Result<()> {
        self.check_operation(&op)?;
        self.operations.push(op);
        Ok(())
    }

    /// Appends every operation from `ops`, stopping at the first invalid one.
    pub fn add_operations<I>(&mut self, ops: I) -> Result<()>
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op)?;
        }
        Ok(())
    }

    fn check_operation(&self, op: &Operation) -> Result<()> {
        for qubit in op.involved_qubits() {
            if qubit.0 >= self.num_qubits {
                return Err(CoherenceError::QubitOutOfRange { qubit, num_qubits: self.num_qubits });
            }
        }
        match op {
            Operation::Controlled { controls, target, .. } => {
                if controls.is_empty() {
                    return Err(CoherenceError::InvalidOperation {
                        message: "Controlled gate needs at least one control qubit".to_string(),
                    });
                }
                let mut seen = HashSet::with_capacity(controls.len() + 1);
                for qubit in controls.iter().chain(std::iter::once(target)) {
                    if !seen.insert(*qubit) {
                        return Err(CoherenceError::InvalidOperation {
                            message: format!("Qubit {} appears more than once in a controlled gate", qubit),
                        });
                    }
                }
            }
            Operation::Measure { clbit, .. } if *clbit >= self.num_clbits => {
                return Err(CoherenceError::ClbitOutOfRange { clbit: *clbit, num_clbits: self.num_clbits });
            }
            _ => {}
        }
        Ok(())
    }

    // --- Gate shorthands, chained with `?` ---

    /// Applies `gate` to `target`.
    pub fn gate(&mut self, target: QubitId, gate: Gate) -> Result<&mut Self> {
        self.add_operation(Operation::Gate { target, gate })?;
        Ok(self)
    }

    /// Applies `gate` to `target`, conditioned on every qubit in `controls`.
    pub fn controlled(&mut self, controls: &[QubitId], target: QubitId, gate: Gate) -> Result<&mut Self> {
        self.add_operation(Operation::Controlled { controls: controls.to_vec(), target, gate })?;
        Ok(self)
    }

    pub fn h(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(target, Gate::H)
    }

    pub fn x(&mut self, target: QubitId) -> Result<&mut Self> {
        self.gate(target, Gate::X)
    }

    pub fn rx(&mut self, theta: f64, target: QubitId) -> Result<&mut Self> {
        self.gate(target, Gate::Rx(theta))
    }

    pub fn ry(&mut self, theta: f64, target: QubitId) -> Result<&mut Self> {
        self.gate(target, Gate::Ry(theta))
    }

    /// Phase gate `diag(1, e^(iλ))`.
    pub fn u1(&mut self, lambda: f64, target: QubitId) -> Result<&mut Self> {
        self.gate(target, Gate::Phase(lambda))
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(&[control], target, Gate::X)
    }

    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(&[control], target, Gate::Rx(theta))
    }

    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(&[control], target, Gate::Ry(theta))
    }

    pub fn cu3(&mut self, theta: f64, phi: f64, lambda: f64, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(&[control], target, Gate::U3 { theta, phi, lambda })
    }

    /// Toffoli gate: flips `target` when both controls read `1`.
    pub fn ccx(&mut self, control1: QubitId, control2: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(&[control1, control2], target, Gate::X)
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: usize) -> Result<&mut Self> {
        self.add_operation(Operation::Measure { qubit, clbit })?;
        Ok(self)
    }

    /// Measures every qubit of `qreg` into consecutive bits of `creg`, starting at `start`.
    pub fn measure_register(&mut self, qreg: &QuantumRegister, creg: &ClassicalRegister, start: usize) -> Result<&mut Self> {
        // Resolve every bit first so a short register appends nothing.
        let clbits = (0..qreg.size).map(|i| creg.try_bit(start + i)).collect::<Result<Vec<_>>>()?;
        for (qubit, clbit) in qreg.qubits().zip(clbits) {
            self.measure(qubit, clbit)?;
        }
        Ok(self)
    }

    pub fn reset(&mut self, qubit: QubitId) -> Result<&mut Self> {
        self.add_operation(Operation::Reset { qubit })?;
        Ok(self)
    }

    pub fn reset_register(&mut self, qreg: &QuantumRegister) -> Result<&mut Self> {
        for qubit in qreg.qubits() {
            self.reset(qubit)?;
        }
        Ok(self)
    }

    pub fn barrier(&mut self) -> Result<&mut Self> {
        self.add_operation(Operation::Barrier)?;
        Ok(self)
    }

    // --- Accessors ---

    /// Looks up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name == name)
    }

    /// Looks up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name == name)
    }

    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of unitary operations (plain and controlled gates).
    pub fn gate_count(&self) -> usize {
        self.operations.iter().filter(|op| op.is_unitary()).count()
    }

    /// `true` if at least one qubit is measured.
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(|op| matches!(op, Operation::Measure { .. }))
    }

    /// Longest chain of operations that must run one after another.
    /// A barrier aligns every qubit to the deepest one.
    pub fn depth(&self) -> usize {
        let mut levels = vec![0usize; self.num_qubits];
        for op in &self.operations {
            if let Operation::Barrier = op {
                let max = levels.iter().copied().max().unwrap_or(0);
                levels.iter_mut().for_each(|l| *l = max);
                continue;
            }
            let qubits = op.involved_qubits();
            let next = qubits.iter().map(|q| levels[q.0]).max().unwrap_or(0) + 1;
            for q in qubits {
                levels[q.0] = next;
            }
        }
        levels.into_iter().max().unwrap_or(0)
    }

    /// `true` if the circuit resets a qubit, or touches a qubit again after measuring it.
    ///
    /// Circuits without such effects can be evolved once and sampled many
    /// times; the rest need one trajectory per shot.
    pub fn has_mid_circuit_effects(&self) -> bool {
        let mut measured: HashSet<QubitId> = HashSet::new();
        for op in &self.operations {
            match op {
                Operation::Reset { .. } => return true,
                Operation::Measure { qubit, .. } => {
                    measured.insert(*qubit);
                }
                Operation::Barrier => {}
                _ => {
                    if op.involved_qubits().iter().any(|q| measured.contains(q)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Name and in-register index for a qubit, used for diagram labels.
    fn qubit_label(&self, qubit: QubitId) -> String {
        self.qregs
            .iter()
            .find(|r| r.contains(qubit))
            .map(|r| format!("{}_{}", r.name, qubit.0 - r.offset))
            .unwrap_or_else(|| qubit.to_string())
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Declares registers, then collects operations with method chaining.
///
/// The first invalid operation is remembered and returned from [`CircuitBuilder::build`].
#[derive(Default)]
pub struct CircuitBuilder {
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    operations: Vec<Operation>,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a quantum register of `size` qubits after the ones already declared.
    pub fn qreg(mut self, name: &str, size: usize) -> Self {
        let offset = self.qregs.iter().map(|r| r.size).sum();
        self.qregs.push(QuantumRegister::new(name, offset, size));
        self
    }

    /// Declares a classical register of `size` bits after the ones already declared.
    pub fn creg(mut self, name: &str, size: usize) -> Self {
        let offset = self.cregs.iter().map(|r| r.size).sum();
        self.cregs.push(ClassicalRegister::new(name, offset, size));
        self
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(ops);
        self
    }

    /// Validates every operation against the declared registers and returns the circuit.
    pub fn build(self) -> Result<Circuit> {
        let mut circuit = Circuit::with_registers(self.qregs, self.cregs);
        circuit.add_operations(self.operations)?;
        Ok(circuit)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "Circuit[0 operations on {} qubits]", self.num_qubits);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let num_rows = self.num_qubits;

        let labels: Vec<String> = (0..num_rows).map(|q| self.qubit_label(QubitId(q))).collect();
        let max_label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the gate or wire segment
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_rows];
        // v_connect[row][time] holds the connector drawn below this row
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_rows];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Gate { target, gate } => {
                    op_grid[target.0][t] = format_gate(gate.symbol());
                }
                Operation::Controlled { controls, target, gate } => {
                    for c in controls {
                        op_grid[c.0][t] = format_gate("■");
                    }
                    let target_symbol = match gate {
                        Gate::X => "⊕",
                        other => other.symbol(),
                    };
                    op_grid[target.0][t] = format_gate(target_symbol);

                    let rows: Vec<usize> = op.involved_qubits().iter().map(|q| q.0).collect();
                    let r_min = rows.iter().copied().min().unwrap_or(0);
                    let r_max = rows.iter().copied().max().unwrap_or(0);
                    for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                        row_vec[t] = V_WIRE;
                    }
                }
                Operation::Measure { qubit, clbit } => {
                    op_grid[qubit.0][t] = format_gate(&format!("M{}", clbit));
                }
                Operation::Reset { qubit } => {
                    op_grid[qubit.0][t] = format_gate("|0>");
                }
                Operation::Barrier => {
                    for row in op_grid.iter_mut() {
                        row[t] = format_gate("░");
                    }
                    for row_vec in v_connect.iter_mut().take(num_rows.saturating_sub(1)) {
                        row_vec[t] = '░';
                    }
                }
            }
        }

        writeln!(f, "Circuit[{} operations on {} qubits, {} clbits]", num_ops, num_rows, self.num_clbits)?;
        for r in 0..num_rows {
            let label = format!("{}: ", labels[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_rows - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
