/// ## Compile-time ceilings
///
/// A formula that exceeds any of these is rejected; nothing is truncated.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_ops: usize,
    pub max_slots: usize,
    pub max_loads: usize,
    pub max_stores: usize,
    pub max_chars: usize,
    pub max_jumps: usize,
    pub max_paren_depth: usize,
    pub max_name_len: usize,
}

impl Limits {
    /// Load and store ceilings scale with the instruction ceiling.
    pub fn with_max_ops(max_ops: usize) -> Limits {
        Limits {
            max_ops,
            max_loads: max_ops * 4 / 5,
            max_stores: max_ops / 4 * 2,
            ..Limits::default()
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_ops: 2300,
            max_slots: 920,
            max_loads: 1840,
            max_stores: 1150,
            max_chars: 8190,
            max_jumps: 200,
            max_paren_depth: 64,
            max_name_len: 18,
        }
    }
}
