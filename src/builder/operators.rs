use std::{collections::HashMap, rc::Rc};

use lazy_static::lazy_static;

use crate::{
    ast::{
        symbols::{Func, Scope, Symbol, Var},
        types::{BasicKind, InterfaceType, Named, Signature, Tuple, Type, TypeParam},
    },
    errors::errors::{Error, ErrorImpl},
    MK_ERROR, MK_TRACE,
};

use super::code_builder::{symbol_operand, CodeBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    AndNot,
    Lsh,
    Rsh,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

lazy_static! {
    static ref BINARY_TOKENS: HashMap<&'static str, BinaryOperator> = {
        let mut m = HashMap::new();
        for op in BINARY_OPERATORS {
            m.insert(op.token(), op);
        }
        m
    };
}

const BINARY_OPERATORS: [BinaryOperator; 17] = [
    BinaryOperator::Add,
    BinaryOperator::Sub,
    BinaryOperator::Mul,
    BinaryOperator::Quo,
    BinaryOperator::Rem,
    BinaryOperator::And,
    BinaryOperator::Or,
    BinaryOperator::Xor,
    BinaryOperator::AndNot,
    BinaryOperator::Lsh,
    BinaryOperator::Rsh,
    BinaryOperator::Lt,
    BinaryOperator::Le,
    BinaryOperator::Gt,
    BinaryOperator::Ge,
    BinaryOperator::Eq,
    BinaryOperator::Ne,
];

impl BinaryOperator {
    /// Suffix of the callable implementing the operator.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOperator::Add => "Add",
            BinaryOperator::Sub => "Sub",
            BinaryOperator::Mul => "Mul",
            BinaryOperator::Quo => "Quo",
            BinaryOperator::Rem => "Rem",
            BinaryOperator::And => "And",
            BinaryOperator::Or => "Or",
            BinaryOperator::Xor => "Xor",
            BinaryOperator::AndNot => "AndNot",
            BinaryOperator::Lsh => "Lsh",
            BinaryOperator::Rsh => "Rsh",
            BinaryOperator::Lt => "LT",
            BinaryOperator::Le => "LE",
            BinaryOperator::Gt => "GT",
            BinaryOperator::Ge => "GE",
            BinaryOperator::Eq => "EQ",
            BinaryOperator::Ne => "NE",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Quo => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
            BinaryOperator::Xor => "^",
            BinaryOperator::AndNot => "&^",
            BinaryOperator::Lsh => "<<",
            BinaryOperator::Rsh => ">>",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
        }
    }

    pub fn from_token(token: &str) -> Option<BinaryOperator> {
        BINARY_TOKENS.get(token).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Neg,
    Not,
}

impl UnaryOperator {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOperator::Neg => "Neg",
            UnaryOperator::Not => "Not",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::Not => "^",
        }
    }

    pub fn from_token(token: &str) -> Option<UnaryOperator> {
        match token {
            "-" => Some(UnaryOperator::Neg),
            "^" => Some(UnaryOperator::Not),
            _ => None,
        }
    }
}

impl CodeBuilder {
    /// Applies `op` to the top two operands.
    pub fn binary_op(&mut self, op: BinaryOperator) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "BinaryOp {}", op.token());
        self.apply_operator(op.name(), 2)
    }

    /// Applies `op` to the top operand.
    pub fn unary_op(&mut self, op: UnaryOperator) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "UnaryOp {}", op.token());
        self.apply_operator(op.name(), 1)
    }

    fn apply_operator(&mut self, name: &str, n: usize) -> Result<&mut Self, Error> {
        self.check_args(n, "Operator")?;

        let full_name = format!("{}{}", self.config.operator_prefix, name);
        let Some(symbol) = self.pkg.builtin.lookup(&full_name) else {
            return MK_ERROR!(
                ErrorImpl::OperatorNotSupported { operator: full_name },
                "Operator"
            );
        };

        let args = self.stk.get_args(n).to_vec();
        let ret = self.check_call(&symbol_operand(&symbol), &args, false, "Operator")?;
        self.stk.ret(n, ret);
        Ok(self)
    }
}

lazy_static! {
    static ref INTEGER_KINDS: Vec<BasicKind> = vec![
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
    ];
    static ref FLOAT_KINDS: Vec<BasicKind> = vec![BasicKind::Float32, BasicKind::Float64];
    static ref COMPLEX_KINDS: Vec<BasicKind> =
        vec![BasicKind::Complex64, BasicKind::Complex128];
}

struct Constraints {
    integer: Type,
    number: Type,
    addable: Type,
    ordered: Type,
    comparable: Type,
}

impl Constraints {
    fn new() -> Self {
        let integer: Vec<&BasicKind> = INTEGER_KINDS.iter().collect();
        let float: Vec<&BasicKind> = FLOAT_KINDS.iter().collect();
        let complex: Vec<&BasicKind> = COMPLEX_KINDS.iter().collect();
        let string = [&BasicKind::String];

        let number: Vec<&BasicKind> = [&integer[..], &float[..], &complex[..]].concat();
        Constraints {
            integer: type_set("integer", &integer),
            number: type_set("number", &number),
            addable: type_set("addable", &[&number[..], &string[..]].concat()),
            ordered: type_set("ordered", &[&integer[..], &float[..], &string[..]].concat()),
            comparable: Type::Named(Named::new(
                "comparable",
                Type::Interface(Rc::new(InterfaceType {
                    comparable: true,
                    ..InterfaceType::default()
                })),
            )),
        }
    }
}

fn type_set(name: &str, kinds: &[&BasicKind]) -> Type {
    let types = kinds.iter().map(|k| Type::Basic(**k)).collect();
    Type::Named(Named::new(
        name,
        Type::Interface(Rc::new(InterfaceType::with_type_set(types))),
    ))
}

/// Declares the generic operator callables in `scope`, named `prefix`
/// followed by the operator name.
///
/// Names already declared are kept. A callable declared under an operator
/// name before registration therefore replaces the generic default for
/// every operand type: a struct-only `Op_Mul` makes `2 * 3` fail. Declare
/// an overload set under the name to serve both.
pub fn register_default_operators(scope: &Scope, prefix: &str) {
    let c = Constraints::new();

    let binary = |name: &str, constraint: &Type, returns_bool: bool| {
        let t = TypeParam::new("T", constraint.clone());
        let result = if returns_bool {
            Type::bool()
        } else {
            Type::TypeParam(t.clone())
        };
        let sig = Signature::new(
            Tuple::new(vec![
                Var::new("a", Type::TypeParam(t.clone())),
                Var::new("b", Type::TypeParam(t.clone())),
            ]),
            Tuple::from_types(vec![result]),
            false,
        )
        .with_type_params(vec![t]);
        scope.insert(Symbol::Func(Func::new(format!("{}{}", prefix, name), sig)));
    };

    binary(BinaryOperator::Add.name(), &c.addable, false);
    for op in [BinaryOperator::Sub, BinaryOperator::Mul, BinaryOperator::Quo] {
        binary(op.name(), &c.number, false);
    }
    for op in [
        BinaryOperator::Rem,
        BinaryOperator::And,
        BinaryOperator::Or,
        BinaryOperator::Xor,
        BinaryOperator::AndNot,
    ] {
        binary(op.name(), &c.integer, false);
    }
    for op in [
        BinaryOperator::Lt,
        BinaryOperator::Le,
        BinaryOperator::Gt,
        BinaryOperator::Ge,
    ] {
        binary(op.name(), &c.ordered, true);
    }
    for op in [BinaryOperator::Eq, BinaryOperator::Ne] {
        binary(op.name(), &c.comparable, true);
    }

    // Shifts take an operand and a count of independent integer types.
    for op in [BinaryOperator::Lsh, BinaryOperator::Rsh] {
        let t = TypeParam::new("T", c.integer.clone());
        let n = TypeParam::new("N", c.integer.clone());
        let sig = Signature::new(
            Tuple::new(vec![
                Var::new("a", Type::TypeParam(t.clone())),
                Var::new("n", Type::TypeParam(n.clone())),
            ]),
            Tuple::from_types(vec![Type::TypeParam(t.clone())]),
            false,
        )
        .with_type_params(vec![t, n]);
        scope.insert(Symbol::Func(Func::new(format!("{}{}", prefix, op.name()), sig)));
    }

    for (op, constraint) in [(UnaryOperator::Neg, &c.number), (UnaryOperator::Not, &c.integer)] {
        let t = TypeParam::new("T", constraint.clone());
        let sig = Signature::new(
            Tuple::new(vec![Var::new("a", Type::TypeParam(t.clone()))]),
            Tuple::from_types(vec![Type::TypeParam(t.clone())]),
            false,
        )
        .with_type_params(vec![t]);
        scope.insert(Symbol::Func(Func::new(format!("{}{}", prefix, op.name()), sig)));
    }
}
