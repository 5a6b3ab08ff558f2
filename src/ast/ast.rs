use std::fmt::{self, Display};

use super::{
    symbols::Func,
    types::{AutoType, Type},
};

/// Basic literal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// A basic literal. `value` holds the literal's source text, quotes included.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
}

/// Expression nodes.
///
/// Operators never appear here: they are emitted as calls to the operator
/// callable that implements them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(String),
    BasicLit(BasicLit),
    CompositeLit {
        ty: Type,
        elts: Vec<Expr>,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    Selector {
        x: Box<Expr>,
        sel: String,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        fun: Box<Expr>,
        args: Vec<Expr>,
        ellipsis: bool,
    },
    Type(Type),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Expr {
        Expr::Ident(name.into())
    }

    pub fn lit(kind: LitKind, value: impl Into<String>) -> Expr {
        Expr::BasicLit(BasicLit {
            kind,
            value: value.into(),
        })
    }

    pub fn selector(x: Expr, sel: impl Into<String>) -> Expr {
        Expr::Selector {
            x: Box::new(x),
            sel: sel.into(),
        }
    }

    pub fn call(fun: Expr, args: Vec<Expr>, ellipsis: bool) -> Expr {
        Expr::Call {
            fun: Box::new(fun),
            args,
            ellipsis,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::BasicLit(lit) => write!(f, "{}", lit.value),
            Expr::CompositeLit { ty, elts } => {
                write!(f, "{}{{{}}}", ty, join(elts))
            }
            Expr::KeyValue { key, value } => write!(f, "{}: {}", key, value),
            Expr::Selector { x, sel } => write!(f, "{}.{}", x, sel),
            Expr::Index { x, index } => write!(f, "{}[{}]", x, index),
            Expr::Call {
                fun,
                args,
                ellipsis,
            } => {
                write!(f, "{}({}", fun, join(args))?;
                if *ellipsis {
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
            Expr::Type(ty) => write!(f, "{}", ty),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Const,
    /// Short variable declaration, `a, b := ...`.
    Define,
}

/// A variable or constant declaration with optional initializers.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub kind: DeclKind,
    pub names: Vec<String>,
    pub ty: Option<Type>,
    pub values: Vec<Expr>,
}

impl Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names.join(", ");
        if self.kind == DeclKind::Define {
            return write!(f, "{} := {}", names, join(&self.values));
        }

        let keyword = match self.kind {
            DeclKind::Const => "const",
            _ => "var",
        };
        write!(f, "{} {}", keyword, names)?;
        if let Some(ty) = &self.ty {
            write!(f, " {}", ty)?;
        }
        if !self.values.is_empty() {
            write!(f, " = {}", join(&self.values))?;
        }
        Ok(())
    }
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Expr),
    Assign { lhs: Vec<Expr>, rhs: Vec<Expr> },
    Return { results: Vec<Expr> },
    Block(Vec<Stmt>),
    Decl(ValueSpec),
    /// Declaration of a variable whose type is filled in by its first assignment.
    AutoVar { name: String, ty: AutoType },
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => write!(f, "{}", expr),
            Stmt::Assign { lhs, rhs } => write!(f, "{} = {}", join(lhs), join(rhs)),
            Stmt::Return { results } if results.is_empty() => write!(f, "return"),
            Stmt::Return { results } => write!(f, "return {}", join(results)),
            Stmt::Block(stmts) => {
                write!(f, "{{")?;
                for stmt in stmts {
                    write!(f, " {};", stmt)?;
                }
                write!(f, " }}")
            }
            Stmt::Decl(spec) => write!(f, "{}", spec),
            Stmt::AutoVar { name, ty } => match ty.get() {
                Some(ty) => write!(f, "var {} {}", name, ty),
                None => write!(f, "var {}", name),
            },
        }
    }
}

/// Package-level declarations, in emission order.
#[derive(Debug, Clone)]
pub enum Decl {
    Func(Func),
    Value(ValueSpec),
}

fn join(exprs: &[Expr]) -> String {
    exprs
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
