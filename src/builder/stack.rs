use crate::type_checker::operand::Operand;

/// The operand stack shared by all construction operations.
///
/// Callers validate arity against the enclosing block's base before
/// reading or consuming operands; see `CodeBuilder::check_args`.
#[derive(Debug, Default)]
pub struct OperandStack {
    data: Vec<Operand>,
}

impl OperandStack {
    pub fn new() -> Self {
        OperandStack { data: vec![] }
    }

    pub fn push(&mut self, operand: Operand) {
        self.data.push(operand);
    }

    pub fn pop(&mut self) -> Option<Operand> {
        self.data.pop()
    }

    /// Index from the bottom when `i >= 0`, from the top when negative
    /// (`-1` is the top).
    pub fn get(&self, i: isize) -> Option<&Operand> {
        let idx = if i < 0 {
            self.data.len().checked_sub(i.unsigned_abs())?
        } else {
            i as usize
        };
        self.data.get(idx)
    }

    /// The top `n` operands, bottom first.
    pub fn get_args(&self, n: usize) -> &[Operand] {
        &self.data[self.data.len() - n..]
    }

    pub fn pop_n(&mut self, n: usize) -> Vec<Operand> {
        self.data.split_off(self.data.len() - n)
    }

    /// Replaces the top `n` operands with `operand`.
    pub fn ret(&mut self, n: usize, operand: Operand) {
        self.data.truncate(self.data.len() - n);
        self.data.push(operand);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set_len(&mut self, len: usize) {
        self.data.truncate(len);
    }
}
