//! Scalar expressions carried by plan nodes and executors.
//!
//! Expressions are immutable values. The compiler never evaluates them; it
//! only inspects their shape (for join keys), combines them (for condition
//! lists), and hands them to the wire compiler for push-down.

use std::fmt;

use quarry_common::types::{LogicalType, Value};
use serde::{Deserialize, Serialize};

/// A scalar expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Reference to a column of the input schema.
    Column(ColumnRef),
    /// A literal value.
    Constant(Value),
    /// A function application.
    ScalarFunction(ScalarFunction),
}

/// A reference to a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Table alias or name the column is qualified with, if any.
    #[serde(default)]
    pub qualifier: Option<String>,
    /// Column name.
    pub name: String,
    /// Offset of the column in the input schema.
    #[serde(default)]
    pub index: usize,
    /// Column type.
    pub ty: LogicalType,
}

impl ColumnRef {
    /// Creates an unqualified column reference.
    pub fn new(name: impl Into<String>, index: usize, ty: LogicalType) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
            index,
            ty,
        }
    }

    /// Sets the qualifier.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{q}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A function application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarFunction {
    /// Which function.
    pub func: FuncKind,
    /// Arguments, in order.
    pub args: Vec<Expression>,
    /// Result type.
    pub ret_type: LogicalType,
}

/// Scalar function kinds known to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuncKind {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// Logical NOT.
    Not,
    /// Equality (=).
    Eq,
    /// Inequality (<>).
    Ne,
    /// Less than (<).
    Lt,
    /// Less than or equal (<=).
    Le,
    /// Greater than (>).
    Gt,
    /// Greater than or equal (>=).
    Ge,
    /// Addition.
    Plus,
    /// Subtraction.
    Minus,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Pattern matching (LIKE).
    Like,
    /// Set membership (IN).
    In,
    /// IS NULL.
    IsNull,
    /// String concatenation.
    Concat,
    /// First non-null argument.
    Coalesce,
    /// Random number.
    Rand,
}

impl FuncKind {
    /// Returns the SQL-ish name of the function.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Like => "like",
            Self::In => "in",
            Self::IsNull => "isnull",
            Self::Concat => "concat",
            Self::Coalesce => "coalesce",
            Self::Rand => "rand",
        }
    }

    /// Returns the infix symbol for binary operators.
    #[must_use]
    pub const fn infix(&self) -> Option<&'static str> {
        match self {
            Self::And => Some("and"),
            Self::Or => Some("or"),
            Self::Eq => Some("="),
            Self::Ne => Some("<>"),
            Self::Lt => Some("<"),
            Self::Le => Some("<="),
            Self::Gt => Some(">"),
            Self::Ge => Some(">="),
            Self::Plus => Some("+"),
            Self::Minus => Some("-"),
            Self::Mul => Some("*"),
            Self::Div => Some("/"),
            Self::Like => Some("like"),
            _ => None,
        }
    }
}

impl Expression {
    /// Creates a column reference expression.
    pub fn column(name: impl Into<String>, index: usize, ty: LogicalType) -> Self {
        Self::Column(ColumnRef::new(name, index, ty))
    }

    /// Creates a constant expression.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// Creates a function application.
    pub fn function(func: FuncKind, args: Vec<Expression>, ret_type: LogicalType) -> Self {
        Self::ScalarFunction(ScalarFunction {
            func,
            args,
            ret_type,
        })
    }

    /// Creates a boolean binary function such as a comparison.
    pub fn binary(func: FuncKind, left: Expression, right: Expression) -> Self {
        Self::function(func, vec![left, right], LogicalType::Bool)
    }

    /// Creates `left AND right`.
    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary(FuncKind::And, left, right)
    }

    /// Creates `left = right`.
    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary(FuncKind::Eq, left, right)
    }

    /// Returns the column reference if this is a plain column.
    #[must_use]
    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            Self::Column(col) => Some(col),
            _ => None,
        }
    }

    /// Returns the function application if this is one.
    #[must_use]
    pub fn as_function(&self) -> Option<&ScalarFunction> {
        match self {
            Self::ScalarFunction(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the result type of the expression.
    #[must_use]
    pub fn ret_type(&self) -> LogicalType {
        match self {
            Self::Column(col) => col.ty,
            Self::Constant(value) => value.logical_type(),
            Self::ScalarFunction(f) => f.ret_type,
        }
    }

    /// Returns the depth of the AND spine: nested ANDs count, anything else is a leaf.
    #[must_use]
    pub fn and_depth(&self) -> usize {
        match self {
            Self::ScalarFunction(f) if f.func == FuncKind::And => {
                1 + f.args.iter().map(Self::and_depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Collects the non-AND leaves of the expression, left to right.
    #[must_use]
    pub fn conjuncts(&self) -> Vec<&Expression> {
        let mut out = Vec::new();
        self.collect_conjuncts(&mut out);
        out
    }

    fn collect_conjuncts<'a>(&'a self, out: &mut Vec<&'a Expression>) {
        match self {
            Self::ScalarFunction(f) if f.func == FuncKind::And => {
                for arg in &f.args {
                    arg.collect_conjuncts(out);
                }
            }
            _ => out.push(self),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(col) => write!(f, "{col}"),
            Self::Constant(value) => write!(f, "{value}"),
            Self::ScalarFunction(func) => match (func.func.infix(), func.args.as_slice()) {
                (Some(op), [left, right]) => write!(f, "({left} {op} {right})"),
                _ => {
                    write!(f, "{}(", func.func.name())?;
                    for (i, arg) in func.args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(")")
                }
            },
        }
    }
}

/// Aggregate function kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    /// Count of rows or non-null values.
    Count,
    /// Sum of values.
    Sum,
    /// Average of values.
    Avg,
    /// Minimum value.
    Min,
    /// Maximum value.
    Max,
    /// First value seen in the group.
    FirstRow,
}

/// An aggregate expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateExpr {
    /// Aggregate function.
    pub function: AggregateFunction,
    /// Arguments to the function.
    pub args: Vec<Expression>,
    /// Whether to aggregate distinct values only.
    #[serde(default)]
    pub distinct: bool,
}

impl fmt::Display for AggregateExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.function {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
            AggregateFunction::FirstRow => "firstrow",
        };
        write!(f, "{name}(")?;
        if self.distinct {
            f.write_str("distinct ")?;
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

/// A sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByItem {
    /// Expression to sort by.
    pub expr: Expression,
    /// Whether the order is descending.
    #[serde(default)]
    pub desc: bool,
}

impl fmt::Display for ByItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.desc {
            write!(f, "{} desc", self.expr)
        } else {
            write!(f, "{}", self.expr)
        }
    }
}

/// Combines `items` into a balanced binary tree using `combine`.
///
/// The list is split at `len / 2`: the left half is `[0, len/2)` and the
/// right half `[len/2, len)`, so for odd lengths the right half holds the
/// extra element. The resulting tree has depth `ceil(log2(len))`. Returns
/// `None` for an empty list and the sole element unchanged for a singleton.
pub fn compose_balanced<T, F>(items: &[T], combine: &mut F) -> Option<T>
where
    T: Clone,
    F: FnMut(T, T) -> T,
{
    match items.len() {
        0 => None,
        1 => Some(items[0].clone()),
        len => {
            let (left, right) = items.split_at(len / 2);
            let left = compose_balanced(left, combine)?;
            let right = compose_balanced(right, combine)?;
            Some(combine(left, right))
        }
    }
}
