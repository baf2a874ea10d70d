use crate::rng::RandomSource;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

pub const OPERATORS: [RelOp; 6] = [
    RelOp::Lt,
    RelOp::Gt,
    RelOp::Le,
    RelOp::Ge,
    RelOp::Eq,
    RelOp::Ne,
];

impl RelOp {
    pub fn as_str(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Gt => ">",
            RelOp::Le => "<=",
            RelOp::Ge => ">=",
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value a condition can read: one of the function parameters or an
/// external context value such as `msg.value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Param(usize),
    External(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Param(idx) => write!(f, "p{idx}"),
            Operand::External(name) => write!(f, "uint64({name})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rhs {
    Const(u64),
    Operand(Operand),
    ConstPlus(u64, Operand),
    OperandPlus(Operand, Operand),
    ConstTimes(u64, Operand),
    OperandTimes(Operand, Operand),
}

impl Rhs {
    pub fn constant(&self) -> Option<u64> {
        match self {
            Rhs::Const(c) | Rhs::ConstPlus(c, _) | Rhs::ConstTimes(c, _) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for Rhs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rhs::Const(c) => write!(f, "uint64({c})"),
            Rhs::Operand(o) => write!(f, "{o}"),
            Rhs::ConstPlus(c, o) => write!(f, "uint64(uint64({c}) + {o})"),
            Rhs::OperandPlus(a, b) => write!(f, "uint64({a} + {b})"),
            Rhs::ConstTimes(c, o) => write!(f, "uint64(uint64({c}) * {o})"),
            Rhs::OperandTimes(a, b) => write!(f, "uint64({a} * {b})"),
        }
    }
}

/// `left OP right`, used as the guard of one generated `if`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub left: Operand,
    pub op: RelOp,
    pub right: Rhs,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// The operands and constant bound conditions are drawn from.
#[derive(Debug, Clone)]
pub struct OperandSpace<'a> {
    pub num_params: usize,
    pub max_const: u64,
    pub external_inputs: &'a [String],
}

impl OperandSpace<'_> {
    pub fn len(&self) -> usize {
        self.num_params + self.external_inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn operand(&self, rng: &mut RandomSource) -> Operand {
        let idx = rng.below(self.len());
        if idx < self.num_params {
            Operand::Param(idx)
        } else {
            Operand::External(self.external_inputs[idx - self.num_params].clone())
        }
    }

    // values above the bound are folded with a remainder rather than redrawn,
    // so the distribution over [0, max_const] is not uniform
    fn constant(&self, rng: &mut RandomSource) -> u64 {
        let c = rng.next_u64();
        if self.max_const < c {
            c % (self.max_const + 1)
        } else {
            c
        }
    }

    /// draws one random condition. The order of draws is fixed: left
    /// operand, right-hand shape, the right-hand operands from left to
    /// right, then the operator.
    pub fn random_condition(&self, rng: &mut RandomSource) -> Condition {
        let left = self.operand(rng);
        let right = match rng.below(6) {
            0 => Rhs::Const(self.constant(rng)),
            1 => Rhs::Operand(self.operand(rng)),
            2 => {
                let c = self.constant(rng);
                Rhs::ConstPlus(c, self.operand(rng))
            }
            3 => {
                let a = self.operand(rng);
                Rhs::OperandPlus(a, self.operand(rng))
            }
            4 => {
                let c = self.constant(rng);
                Rhs::ConstTimes(c, self.operand(rng))
            }
            _ => {
                let a = self.operand(rng);
                Rhs::OperandTimes(a, self.operand(rng))
            }
        };
        let op = OPERATORS[rng.below(OPERATORS.len())];
        Condition { left, op, right }
    }
}
