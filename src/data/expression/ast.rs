use crate::data::address::DataAddress;
use crate::data::filters::FilterId;
use crate::data::variant::Variant;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Lit(Variant),
    /// A data model path: `radius`, `rows[2].title`.
    Var(DataAddress),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Short-circuiting `&&` / `||`; always yields a bool.
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Filter application; `args[0]` is the piped value when there is one.
    Filter {
        id: FilterId,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogicalOp {
    And,
    Or,
}

/// Top-level item of an assignment-mode expression.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Stmt {
    Assign { target: DataAddress, value: Expr },
    Event { name: String, args: Vec<Expr> },
}
