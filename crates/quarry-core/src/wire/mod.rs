//! Wire-format expressions for predicate push-down.
//!
//! A pushed-down predicate travels to the storage layer as a [`WireExpr`]
//! tree. The binary layout of one node is
//!
//! ```text
//! [tp: u8][val_len: u32 BE][val][child_count: u32 BE][children...]
//! ```
//!
//! - [`codec`] - memcomparable value encodings
//! - [`convert`] - the expression-to-wire compiler

pub mod codec;
pub mod convert;

use std::fmt;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use quarry_common::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub use convert::{ExprToWire, ScanTarget, WireCompiler, WireConversion};

/// Deepest tree [`WireExpr::encode`] writes and [`WireExpr::decode`] accepts.
pub const MAX_WIRE_DEPTH: usize = 1024;

/// Wire expression node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExprType {
    /// NULL literal.
    Null = 0,
    /// Signed integer literal (also used for booleans).
    Int64 = 1,
    /// Unsigned integer literal.
    UInt64 = 2,
    /// Float literal.
    Float64 = 3,
    /// String literal.
    String = 4,
    /// Bytes literal.
    Bytes = 5,
    /// Column reference by column id.
    ColumnRef = 10,
    /// Less than.
    Lt = 20,
    /// Less than or equal.
    Le = 21,
    /// Equal.
    Eq = 22,
    /// Not equal.
    Ne = 23,
    /// Greater than or equal.
    Ge = 24,
    /// Greater than.
    Gt = 25,
    /// Logical AND.
    And = 30,
    /// Logical OR.
    Or = 31,
    /// Logical NOT.
    Not = 32,
    /// Addition.
    Plus = 40,
    /// Subtraction.
    Minus = 41,
    /// Multiplication.
    Mul = 42,
    /// Division.
    Div = 43,
    /// LIKE.
    Like = 50,
    /// IN.
    In = 51,
    /// IS NULL.
    IsNull = 52,
}

impl ExprType {
    /// Every expression type, in code order.
    pub const ALL: &'static [ExprType] = &[
        Self::Null,
        Self::Int64,
        Self::UInt64,
        Self::Float64,
        Self::String,
        Self::Bytes,
        Self::ColumnRef,
        Self::Lt,
        Self::Le,
        Self::Eq,
        Self::Ne,
        Self::Ge,
        Self::Gt,
        Self::And,
        Self::Or,
        Self::Not,
        Self::Plus,
        Self::Minus,
        Self::Mul,
        Self::Div,
        Self::Like,
        Self::In,
        Self::IsNull,
    ];

    /// Returns the type with this tag, if any.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|tp| tp.code() == code)
    }

    /// Returns the tag byte.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns whether nodes of this type are leaves carrying a value.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Int64
                | Self::UInt64
                | Self::Float64
                | Self::String
                | Self::Bytes
                | Self::ColumnRef
        )
    }

    /// Returns a short lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::ColumnRef => "column",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Ge => "ge",
            Self::Gt => "gt",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Like => "like",
            Self::In => "in",
            Self::IsNull => "isnull",
        }
    }
}

/// A node of a pushed-down expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireExpr {
    /// Node type.
    pub tp: ExprType,
    /// Encoded value for leaves; empty for function nodes.
    pub val: Bytes,
    /// Children, in argument order.
    pub children: Vec<WireExpr>,
}

impl WireExpr {
    /// Creates a leaf node.
    #[must_use]
    pub fn leaf(tp: ExprType, val: Bytes) -> Self {
        Self {
            tp,
            val,
            children: Vec::new(),
        }
    }

    /// Creates a function node.
    #[must_use]
    pub fn node(tp: ExprType, children: Vec<WireExpr>) -> Self {
        Self {
            tp,
            val: Bytes::new(),
            children,
        }
    }

    /// Creates `left AND right`.
    #[must_use]
    pub fn and(left: WireExpr, right: WireExpr) -> Self {
        Self::node(ExprType::And, vec![left, right])
    }

    /// Returns the depth of the tree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Returns the depth of the AND spine; a non-AND node has depth 0.
    #[must_use]
    pub fn and_depth(&self) -> usize {
        if self.tp == ExprType::And {
            1 + self.children.iter().map(Self::and_depth).max().unwrap_or(0)
        } else {
            0
        }
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Collects the non-AND nodes under the top AND spine, left to right.
    #[must_use]
    pub fn conjuncts(&self) -> Vec<&WireExpr> {
        let mut out = Vec::new();
        self.collect_conjuncts(&mut out);
        out
    }

    fn collect_conjuncts<'a>(&'a self, out: &mut Vec<&'a WireExpr>) {
        if self.tp == ExprType::And {
            for child in &self.children {
                child.collect_conjuncts(out);
            }
        } else {
            out.push(self);
        }
    }

    /// Appends the binary encoding of this tree to `buf`.
    ///
    /// Fails for trees deeper than [`MAX_WIRE_DEPTH`], which `decode` would
    /// reject.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        self.encode_node(buf, 0)
    }

    fn encode_node(&self, buf: &mut BytesMut, depth: usize) -> Result<()> {
        if depth >= MAX_WIRE_DEPTH {
            return Err(Error::Codec(format!(
                "expression nested deeper than {MAX_WIRE_DEPTH}"
            )));
        }
        buf.put_u8(self.tp.code());
        buf.put_u32(len_u32(self.val.len(), "value")?);
        buf.put_slice(&self.val);
        buf.put_u32(len_u32(self.children.len(), "child list")?);
        for child in &self.children {
            child.encode_node(buf, depth + 1)?;
        }
        Ok(())
    }

    /// Encodes this tree into a fresh buffer.
    pub fn encode_to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Decodes one tree, rejecting trailing bytes.
    pub fn decode(mut input: &[u8]) -> Result<Self> {
        let expr = Self::decode_node(&mut input, 0)?;
        if input.has_remaining() {
            return Err(Error::Codec(format!(
                "{} trailing bytes after expression",
                input.remaining()
            )));
        }
        Ok(expr)
    }

    fn decode_node(input: &mut &[u8], depth: usize) -> Result<Self> {
        if depth >= MAX_WIRE_DEPTH {
            return Err(Error::Codec(format!(
                "expression nested deeper than {MAX_WIRE_DEPTH}"
            )));
        }
        need(input, 1 + 4)?;
        let code = input.get_u8();
        let tp = ExprType::from_code(code)
            .ok_or_else(|| Error::Codec(format!("unknown expression tag {code}")))?;
        let val_len = input.get_u32() as usize;
        need(input, val_len)?;
        let val = Bytes::copy_from_slice(&input[..val_len]);
        input.advance(val_len);
        need(input, 4)?;
        let child_count = input.get_u32() as usize;
        // Every child takes at least 9 bytes; reject counts the input can't hold.
        need(input, child_count.saturating_mul(9))?;
        let mut children = Vec::with_capacity(child_count);
        for _ in 0..child_count {
            children.push(Self::decode_node(input, depth + 1)?);
        }
        Ok(Self { tp, val, children })
    }
}

fn len_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::Codec(format!("{what} too long: {len}")))
}

fn need(input: &[u8], n: usize) -> Result<()> {
    if input.len() < n {
        return Err(Error::Codec(format!(
            "truncated input: need {n} bytes, have {}",
            input.len()
        )));
    }
    Ok(())
}

impl fmt::Display for WireExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tp {
            ExprType::Null => f.write_str("NULL"),
            ExprType::Int64 => match codec::decode_int(&self.val) {
                Ok(v) => write!(f, "{v}"),
                Err(_) => f.write_str("<bad int>"),
            },
            ExprType::UInt64 => match codec::decode_uint(&self.val) {
                Ok(v) => write!(f, "{v}"),
                Err(_) => f.write_str("<bad uint>"),
            },
            ExprType::Float64 => match codec::decode_float(&self.val) {
                Ok(v) => write!(f, "{v}"),
                Err(_) => f.write_str("<bad float>"),
            },
            ExprType::String => write!(f, "'{}'", String::from_utf8_lossy(&self.val)),
            ExprType::Bytes => write!(f, "<{} bytes>", self.val.len()),
            ExprType::ColumnRef => match codec::decode_int(&self.val) {
                Ok(id) => write!(f, "#{id}"),
                Err(_) => f.write_str("#?"),
            },
            tp => {
                write!(f, "{}(", tp.name())?;
                for (i, child) in self.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WireExpr {
        WireExpr::and(
            WireExpr::node(
                ExprType::Eq,
                vec![
                    WireExpr::leaf(ExprType::ColumnRef, codec::encode_int(1)),
                    WireExpr::leaf(ExprType::Int64, codec::encode_int(-7)),
                ],
            ),
            WireExpr::node(
                ExprType::Like,
                vec![
                    WireExpr::leaf(ExprType::ColumnRef, codec::encode_int(2)),
                    WireExpr::leaf(ExprType::String, Bytes::from_static(b"ab%")),
                ],
            ),
        )
    }

    #[test]
    fn test_expr_type_codes() {
        for tp in ExprType::ALL {
            assert_eq!(ExprType::from_code(tp.code()), Some(*tp));
        }
        assert_eq!(ExprType::from_code(255), None);
    }

    #[test]
    fn test_encode_decode() {
        let expr = sample();
        let bytes = expr.encode_to_bytes().unwrap();
        assert_eq!(bytes[0], ExprType::And.code());
        assert_eq!(WireExpr::decode(&bytes).unwrap(), expr);
        assert_eq!(expr.depth(), 3);
        assert_eq!(expr.and_depth(), 1);
        assert_eq!(expr.node_count(), 7);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        let bytes = sample().encode_to_bytes().unwrap();

        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(WireExpr::decode(truncated), Err(Error::Codec(_))));

        let mut trailing = bytes.to_vec();
        trailing.push(0);
        assert!(matches!(WireExpr::decode(&trailing), Err(Error::Codec(_))));

        let mut bad_tag = bytes.to_vec();
        bad_tag[0] = 200;
        assert!(matches!(WireExpr::decode(&bad_tag), Err(Error::Codec(_))));
    }

    #[test]
    fn test_depth_limit_is_symmetric() {
        let nested = |levels: usize| {
            (1..levels).fold(
                WireExpr::leaf(ExprType::Int64, codec::encode_int(1)),
                |inner, _| WireExpr::node(ExprType::Not, vec![inner]),
            )
        };

        let deepest = nested(MAX_WIRE_DEPTH);
        let bytes = deepest.encode_to_bytes().unwrap();
        assert_eq!(WireExpr::decode(&bytes).unwrap().depth(), MAX_WIRE_DEPTH);

        let too_deep = nested(MAX_WIRE_DEPTH + 1);
        assert!(matches!(too_deep.encode_to_bytes(), Err(Error::Codec(_))));
    }

    #[test]
    fn test_conjuncts() {
        let leaf = |v| WireExpr::leaf(ExprType::Int64, codec::encode_int(v));
        let tree = WireExpr::and(leaf(1), WireExpr::and(leaf(2), leaf(3)));
        let leaves: Vec<WireExpr> = tree.conjuncts().into_iter().cloned().collect();
        assert_eq!(leaves, vec![leaf(1), leaf(2), leaf(3)]);
        assert_eq!(leaf(4).conjuncts(), vec![&leaf(4)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "and(eq(#1, -7), like(#2, 'ab%'))");
    }
}
