use crate::instruction::Register;

/// A fixed bank of integer registers addressed from 1 to `size`.
///
/// Writes never mutate in place: they return a new bank, leaving the old one
/// intact for snapshot history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    values: Vec<i64>,
}

impl Registers {
    /// A bank of `size` registers, all zero.
    pub fn new(size: usize) -> Registers {
        Registers {
            values: vec![0; size],
        }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// `None` if `reg` is outside `1..=size`.
    pub fn read(&self, reg: Register) -> Option<i64> {
        if 1 <= reg && reg <= self.values.len() {
            Some(self.values[reg - 1])
        } else {
            None
        }
    }

    /// A new bank with `reg` replaced by `value`, or `None` if `reg` is
    /// outside `1..=size`.
    pub fn write(&self, reg: Register, value: i64) -> Option<Registers> {
        self.read(reg)?;
        let mut values = self.values.clone();
        values[reg - 1] = value;
        Some(Registers { values })
    }

    /// Reads `reg`, applies `f`, and writes the result back.
    pub fn update(&self, reg: Register, f: impl FnOnce(i64) -> i64) -> Option<Registers> {
        let value = self.read(reg)?;
        let mut values = self.values.clone();
        values[reg - 1] = f(value);
        Some(Registers { values })
    }

    /// Register values in ascending register order, for display.
    pub fn to_ordered_values(&self) -> &[i64] {
        &self.values
    }
}
