use std::{mem, rc::Rc};

use crate::{
    ast::{
        ast::{Expr, LitKind, Stmt},
        symbols::{Func, Scope, Symbol, Var},
        types::{AutoType, BasicKind, Type},
    },
    errors::errors::{Error, ErrorImpl},
    type_checker::{
        operand::{Operand, OperandMode},
        oracle::TypeOracle,
        type_checker::TypeChecker,
        universe::{untyped_literal, universe_error},
    },
    Config, MK_ERROR, MK_TRACE,
};

use super::{
    context::{BlockContext, BlockGuard, BlockKind, FuncBodyContext},
    decls::{AutoVar, ValueDecl},
    operators::register_default_operators,
    package::Package,
    stack::OperandStack,
};

/// A constant or symbol pushed with [`CodeBuilder::val`].
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Rune(char),
    String(String),
    Bool(bool),
    Nil,
    Symbol(Symbol),
    Auto(AutoVar),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Rune(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Symbol> for Value {
    fn from(v: Symbol) -> Self {
        Value::Symbol(v)
    }
}

impl From<&Var> for Value {
    fn from(v: &Var) -> Self {
        Value::Symbol(Symbol::Var(v.clone()))
    }
}

impl From<&Func> for Value {
    fn from(v: &Func) -> Self {
        Value::Symbol(Symbol::Func(v.clone()))
    }
}

impl From<&AutoVar> for Value {
    fn from(v: &AutoVar) -> Self {
        Value::Auto(v.clone())
    }
}

/// An assignment target for [`CodeBuilder::var_ref`].
#[derive(Debug, Clone)]
pub enum RefTarget {
    Var(Var),
    Auto(AutoVar),
}

#[derive(Debug)]
enum Frame {
    Block(BlockContext),
    FuncBody(FuncBodyContext),
}

/// Builds a type checked syntax tree one operation at a time.
///
/// Every operation validates its operands before touching the stack or
/// the statement list, so a failed operation leaves both unchanged.
pub struct CodeBuilder {
    pub(crate) stk: OperandStack,
    pub(crate) current: BlockContext,
    pub(crate) func: Option<Func>,
    pub(crate) pkg: Package,
    pub(crate) oracle: Rc<dyn TypeOracle>,
    pub(crate) config: Config,
    pub(crate) var_decl: Option<ValueDecl>,
    frames: Vec<Frame>,
    next_block_id: usize,
}

impl CodeBuilder {
    pub fn new(pkg: Package, config: Config) -> Self {
        CodeBuilder::with_oracle(pkg, config, Rc::new(TypeChecker::new()))
    }

    pub fn with_oracle(pkg: Package, config: Config, oracle: Rc<dyn TypeOracle>) -> Self {
        if config.register_operators {
            register_default_operators(&pkg.builtin, &config.operator_prefix);
        }

        CodeBuilder {
            stk: OperandStack::new(),
            current: BlockContext::package(pkg.scope.clone()),
            func: None,
            pkg,
            oracle,
            config,
            var_decl: None,
            frames: vec![],
            next_block_id: 1,
        }
    }

    pub fn pkg(&self) -> &Package {
        &self.pkg
    }

    pub fn pkg_mut(&mut self) -> &mut Package {
        &mut self.pkg
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scope(&self) -> &Scope {
        &self.current.scope
    }

    /// Statements emitted so far into the current block.
    pub fn stmts(&self) -> &[Stmt] {
        &self.current.stmts
    }

    pub fn stack_len(&self) -> usize {
        self.stk.len()
    }

    /// Operand at `i`, counted from the top when negative.
    pub fn get(&self, i: isize) -> Option<&Operand> {
        self.stk.get(i)
    }

    /// Pops the top operand, refusing to cross the current block's base.
    pub fn pop(&mut self) -> Option<Operand> {
        if self.stk.len() > self.current.stack_base {
            self.stk.pop()
        } else {
            None
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.current.scope.lookup_parent(name).map(|(_, symbol)| symbol)
    }

    /// A fresh name that no generated variable uses yet.
    pub fn auto_name(&mut self) -> String {
        format!("{}{}", self.config.auto_prefix, self.pkg.next_auto_idx())
    }

    pub(crate) fn check_args(&self, n: usize, operation: &'static str) -> Result<(), Error> {
        let available = self.stk.len() - self.current.stack_base;
        if n > available {
            return MK_ERROR!(
                ErrorImpl::StackUnderflow {
                    requested: n,
                    available
                },
                operation
            );
        }
        Ok(())
    }

    pub(crate) fn emit(&mut self, stmt: Stmt) {
        self.current.stmts.push(stmt);
    }

    pub(crate) fn error_type(&self) -> Type {
        universe_error(&self.pkg.universe)
    }

    /// Pushes a constant, `nil` or a symbol.
    pub fn val(&mut self, v: impl Into<Value>) -> &mut Self {
        let operand = match v.into() {
            Value::Int(v) => constant(untyped_literal(LitKind::Int, v.to_string())),
            Value::Float(v) => constant(untyped_literal(LitKind::Float, format!("{:?}", v))),
            Value::Rune(v) => {
                constant(untyped_literal(LitKind::Char, quote(&v.to_string(), '\'')))
            }
            Value::String(v) => constant(untyped_literal(LitKind::String, quote(&v, '"'))),
            Value::Bool(v) => Operand::new(
                Expr::ident(v.to_string()),
                Type::Basic(BasicKind::UntypedBool),
                OperandMode::Constant,
            ),
            Value::Nil => Operand::new(
                Expr::ident("nil"),
                Type::Basic(BasicKind::UntypedNil),
                OperandMode::Nil,
            ),
            Value::Symbol(symbol) => symbol_operand(&symbol),
            Value::Auto(auto) => Operand {
                value: Expr::ident(auto.name()),
                ty: None,
                mode: OperandMode::Variable,
                auto: Some(auto.type_cell().clone()),
            },
        };

        MK_TRACE!(self.config, "Val {}", operand.value);
        self.stk.push(operand);
        self
    }

    /// Pushes a type expression, as used by conversions and `new`.
    pub fn typ(&mut self, ty: Type) -> &mut Self {
        MK_TRACE!(self.config, "Typ {}", ty);
        self.stk
            .push(Operand::new(Expr::Type(ty.clone()), ty, OperandMode::TypeExpr));
        self
    }

    /// Pushes an assignment target. `None` is the blank identifier `_`.
    pub fn var_ref(&mut self, target: Option<RefTarget>) -> &mut Self {
        let operand = match target {
            None => Operand::discard(),
            Some(RefTarget::Var(var)) => {
                Operand::new(Expr::ident(var.name()), var.ty().clone(), OperandMode::Variable)
            }
            Some(RefTarget::Auto(auto)) => Operand {
                value: Expr::ident(auto.name()),
                ty: None,
                mode: OperandMode::Variable,
                auto: Some(auto.type_cell().clone()),
            },
        };

        MK_TRACE!(self.config, "VarRef {}", operand.value);
        self.stk.push(operand);
        self
    }

    /// Replaces the receiver on top of the stack with its method or field `name`.
    pub fn member_val(&mut self, name: &str) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "MemberVal {}", name);
        self.check_args(1, "MemberVal")?;

        let arg = self.stk.get_args(1)[0].clone();
        if !arg.mode.is_value() {
            return MK_ERROR!(
                ErrorImpl::NotAValue {
                    expr: arg.value.to_string()
                },
                "MemberVal"
            );
        }

        let recv_ty = arg.ty();
        let (base, through_pointer) = match &recv_ty {
            Type::Pointer(elem) => ((**elem).clone(), true),
            ty => (ty.clone(), false),
        };
        let selector = Expr::selector(arg.value.clone(), name);

        if let Type::Named(named) = &base {
            match named.method(name) {
                Some(Symbol::Func(method)) => {
                    let ty = Type::signature(method.signature().without_recv());
                    self.stk.ret(1, Operand::new(selector, ty, OperandMode::Value));
                    return Ok(self);
                }
                Some(Symbol::Overload(overload)) => {
                    self.stk
                        .ret(1, Operand::new(selector, overload.ty(), OperandMode::Value));
                    return Ok(self);
                }
                _ => (),
            }
        }

        match base.underlying() {
            Type::Struct(st) => {
                if let Some(field) = st.field(name) {
                    let mode = if through_pointer || arg.mode == OperandMode::Variable {
                        OperandMode::Variable
                    } else {
                        OperandMode::Value
                    };
                    self.stk
                        .ret(1, Operand::new(selector, field.ty.clone(), mode));
                    return Ok(self);
                }
            }
            Type::Interface(iface) if !through_pointer => {
                if let Some(sig) = iface.method(name) {
                    let ty = Type::signature(sig.clone());
                    self.stk.ret(1, Operand::new(selector, ty, OperandMode::Value));
                    return Ok(self);
                }
            }
            _ => (),
        }

        MK_ERROR!(
            ErrorImpl::MemberNotFound {
                member: name.to_string(),
                receiver: recv_ty.to_string()
            },
            "MemberVal"
        )
    }

    /// Replaces a container and an index on top of the stack with `x[index]`.
    pub fn index(&mut self) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "Index");
        self.check_args(2, "Index")?;

        let args = self.stk.get_args(2).to_vec();
        let x = &args[0];
        let x_ty = self.single_value(x, "Index")?;
        let index_ty = self.single_value(&args[1], "Index")?;

        let (elem, mode) = match x_ty.underlying() {
            Type::Map(key, elem) => {
                if !self.oracle.assignable(&index_ty, &key) {
                    return MK_ERROR!(
                        ErrorImpl::NotAssignable {
                            value_type: index_ty.to_string(),
                            target_type: key.to_string()
                        },
                        "Index"
                    );
                }
                (*elem, OperandMode::MapIndex)
            }
            Type::Slice(elem) => (*elem, OperandMode::Variable),
            Type::Array(elem, _) if x.mode == OperandMode::Variable => {
                (*elem, OperandMode::Variable)
            }
            Type::Array(elem, _) => (*elem, OperandMode::Value),
            Type::Pointer(base) => match base.underlying() {
                Type::Array(elem, _) => (*elem, OperandMode::Variable),
                _ => return not_indexable(&x_ty),
            },
            Type::Basic(kind) if kind.is_string() => {
                (Type::Basic(BasicKind::Uint8), OperandMode::Value)
            }
            _ => return not_indexable(&x_ty),
        };

        let is_map = mode == OperandMode::MapIndex;
        if !is_map && !index_ty.basic_kind().is_some_and(BasicKind::is_integer) {
            return MK_ERROR!(
                ErrorImpl::InvalidArgument {
                    func: "index".to_string(),
                    ty: index_ty.to_string()
                },
                "Index"
            );
        }

        let value = Expr::Index {
            x: Box::new(x.value.clone()),
            index: Box::new(args[1].value.clone()),
        };
        self.stk.ret(2, Operand::new(value, elem, mode));
        Ok(self)
    }

    /// Consumes `lhs` targets followed by `rhs` sources and emits one
    /// assignment. With a single source, a multi-valued expression is
    /// spread across the targets.
    pub fn assign(&mut self, lhs: usize, rhs: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "Assign {} {}", lhs, rhs);
        if lhs == 0 {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: 1,
                    received: 0
                },
                "Assign"
            );
        }
        self.check_args(lhs + rhs, "Assign")?;

        let args = self.stk.get_args(lhs + rhs).to_vec();
        let (targets, sources) = args.split_at(lhs);
        let mut patches = vec![];

        if lhs == rhs {
            for (target, source) in targets.iter().zip(sources.iter()) {
                let ty = self.single_value(source, "Assign")?;
                self.assign_match(target, &ty, &mut patches, "Assign")?;
            }
        } else if rhs == 1 {
            let types = self.spread_types(&sources[0], lhs, "Assign")?;
            for (target, ty) in targets.iter().zip(types.iter()) {
                self.assign_match(target, ty, &mut patches, "Assign")?;
            }
        } else {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: lhs,
                    received: rhs
                },
                "Assign"
            );
        }

        for (cell, ty) in patches {
            cell.set(ty);
        }
        self.emit(Stmt::Assign {
            lhs: targets.iter().map(|t| t.value.clone()).collect(),
            rhs: sources.iter().map(|s| s.value.clone()).collect(),
        });
        self.stk.pop_n(lhs + rhs);
        Ok(self)
    }

    /// The type of `source` used as exactly one value.
    pub(crate) fn single_value(
        &self,
        source: &Operand,
        operation: &'static str,
    ) -> Result<Type, Error> {
        if !source.mode.is_value() {
            return MK_ERROR!(
                ErrorImpl::NotAValue {
                    expr: source.value.to_string()
                },
                operation
            );
        }
        match source.ty() {
            Type::Tuple(tuple) => MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: 1,
                    received: tuple.len()
                },
                operation
            ),
            ty => Ok(ty),
        }
    }

    /// The element types of a multi-valued `source` spread over `n` targets.
    pub(crate) fn spread_types(
        &self,
        source: &Operand,
        n: usize,
        operation: &'static str,
    ) -> Result<Vec<Type>, Error> {
        if !source.mode.is_value() {
            return MK_ERROR!(
                ErrorImpl::NotAValue {
                    expr: source.value.to_string()
                },
                operation
            );
        }

        let types = match (source.ty(), source.mode) {
            (Type::Tuple(tuple), _) => tuple.types(),
            (ty, OperandMode::MapIndex | OperandMode::CommaOk) if n == 2 => vec![ty, Type::bool()],
            (ty, OperandMode::CommaErr) if n == 2 => vec![ty, self.error_type()],
            (ty, _) => vec![ty],
        };
        if types.len() != n {
            return MK_ERROR!(
                ErrorImpl::ArityMismatch {
                    expected: n,
                    received: types.len()
                },
                operation
            );
        }
        Ok(types)
    }

    fn assign_match(
        &self,
        target: &Operand,
        value: &Type,
        patches: &mut Vec<(AutoType, Type)>,
        operation: &'static str,
    ) -> Result<(), Error> {
        let untyped_nil = *value == Type::Basic(BasicKind::UntypedNil);
        if target.is_discard() {
            if untyped_nil {
                return MK_ERROR!(ErrorImpl::UseOfUntypedNil, operation);
            }
            return Ok(());
        }
        if !target.mode.is_assignable_target() {
            return MK_ERROR!(
                ErrorImpl::CannotAssignTo {
                    expr: target.value.to_string()
                },
                operation
            );
        }

        if let Some(cell) = &target.auto {
            if cell.get().is_none() {
                if untyped_nil {
                    return MK_ERROR!(ErrorImpl::UseOfUntypedNil, operation);
                }
                patches.push((cell.clone(), self.oracle.default_type(value)));
                return Ok(());
            }
        }

        let target_ty = target.ty();
        if !self.oracle.assignable(value, &target_ty) {
            return MK_ERROR!(
                ErrorImpl::NotAssignable {
                    value_type: value.to_string(),
                    target_type: target_ty.to_string()
                },
                operation
            );
        }
        Ok(())
    }

    /// Consumes `n` results and emits a return statement checked against
    /// the enclosing function's results.
    pub fn return_(&mut self, n: usize) -> Result<&mut Self, Error> {
        MK_TRACE!(self.config, "Return {}", n);
        let Some(func) = self.func.clone() else {
            return MK_ERROR!(ErrorImpl::ReturnOutsideFunction, "Return");
        };
        self.check_args(n, "Return")?;

        let results = func.signature().results.clone();
        let expected = results.types();
        let args = self.stk.get_args(n).to_vec();
        let mismatch = |received: Vec<Type>| {
            Error::new(
                ErrorImpl::ResultMismatch {
                    expected: Type::Tuple(results.clone()).to_string(),
                    received: Type::tuple(received).to_string(),
                },
                "Return",
            )
        };

        let received = match args.as_slice() {
            // A bare return needs every result to be named.
            [] if results.all_named() => expected.clone(),
            [single] if expected.len() > 1 => match single.ty() {
                Type::Tuple(tuple) if single.mode.is_value() => tuple.types(),
                ty => return Err(mismatch(vec![ty])),
            },
            _ => {
                let mut types = Vec::with_capacity(args.len());
                for arg in args.iter() {
                    types.push(self.single_value(arg, "Return")?);
                }
                types
            }
        };

        if received.len() != expected.len()
            || received
                .iter()
                .zip(expected.iter())
                .any(|(value, target)| !self.oracle.assignable(value, target))
        {
            return Err(mismatch(received));
        }

        self.emit(Stmt::Return {
            results: args.iter().map(|a| a.value.clone()).collect(),
        });
        self.stk.pop_n(n);
        Ok(self)
    }

    /// Turns the operand left in the current block into an expression statement.
    pub fn end_stmt(&mut self) -> Result<&mut Self, Error> {
        let count = self.stk.len() - self.current.stack_base;
        MK_TRACE!(self.config, "EndStmt {}", count);

        if count > 1 {
            return MK_ERROR!(ErrorImpl::UnexpectedOperands { count }, "EndStmt");
        }
        if count == 1 {
            if let Some(operand) = self.stk.pop() {
                self.emit(Stmt::Expr(operand.value));
            }
        }
        Ok(self)
    }

    /// Opens a block statement, closed by [`CodeBuilder::end`].
    pub fn block(&mut self) -> &mut Self {
        MK_TRACE!(self.config, "Block");
        let saved = self.start_block_stmt("");
        self.frames.push(Frame::Block(saved));
        self
    }

    /// Opens the body of `func`, closed by [`CodeBuilder::end`].
    pub fn func_body(&mut self, func: &Func) -> &mut Self {
        MK_TRACE!(self.config, "FuncBody {}", func.name());
        let saved = self.start_func_body(func);
        self.frames.push(Frame::FuncBody(saved));
        self
    }

    /// Closes the most recently opened block or function body.
    ///
    /// # Panics
    ///
    /// Panics if nothing is open.
    pub fn end(&mut self) -> &mut Self {
        MK_TRACE!(self.config, "End");
        match self.frames.pop() {
            Some(Frame::Block(saved)) => {
                let stmts = self.end_block_stmt(saved);
                self.emit(Stmt::Block(stmts));
            }
            Some(Frame::FuncBody(saved)) => {
                let func = self.func.clone();
                let stmts = self.end_func_body(saved);
                if let Some(func) = func {
                    func.set_body(stmts);
                }
            }
            None => panic!("CodeBuilder::end called with no open block"),
        }
        self
    }

    pub(crate) fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// Closes open blocks and function bodies until `depth` remain.
    pub(crate) fn close_frames(&mut self, depth: usize) {
        while self.frames.len() > depth {
            self.end();
        }
    }

    /// Opens a block that is closed when the returned guard is dropped.
    pub fn scoped_block(&mut self, label: &str) -> BlockGuard<'_> {
        let saved = self.start_block_stmt(label);
        BlockGuard::new(self, saved)
    }

    /// Enters a new block and returns the context it replaces, which must be
    /// handed back to [`CodeBuilder::end_block_stmt`].
    pub fn start_block_stmt(&mut self, label: &str) -> BlockContext {
        let scope = Scope::new(Some(&self.current.scope), label);
        self.enter(BlockKind::Block, scope)
    }

    /// Leaves the current block, restoring `saved`, and returns the
    /// statements emitted into it. Operands left above the block's base
    /// are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `saved` is not the context the current block replaced.
    pub fn end_block_stmt(&mut self, saved: BlockContext) -> Vec<Stmt> {
        if self.current.parent != Some(saved.id) {
            panic!(
                "block contexts must be exited in reverse order: current block {} was not entered from {}",
                self.current.id, saved.id
            );
        }

        self.stk.set_len(self.current.stack_base);
        let ctx = mem::replace(&mut self.current, saved);
        ctx.stmts
    }

    /// Enters the body of `func`. Its receiver, named parameters and named
    /// results are declared in the new scope.
    pub fn start_func_body(&mut self, func: &Func) -> FuncBodyContext {
        let scope = Scope::new(Some(&self.current.scope), format!("func {}", func.name()));
        let sig = func.signature();

        let named = sig
            .recv
            .iter()
            .chain(sig.params.vars().iter())
            .chain(sig.results.vars().iter())
            .filter(|var| !var.name().is_empty() && var.name() != "_");
        for var in named {
            scope.insert(Symbol::Var(var.clone()));
        }

        let block = self.enter(BlockKind::FuncBody, scope);
        FuncBodyContext {
            block,
            func: mem::replace(&mut self.func, Some(func.clone())),
        }
    }

    pub fn end_func_body(&mut self, saved: FuncBodyContext) -> Vec<Stmt> {
        self.func = saved.func;
        self.end_block_stmt(saved.block)
    }

    fn enter(&mut self, kind: BlockKind, scope: Scope) -> BlockContext {
        let ctx = BlockContext {
            kind,
            scope,
            stack_base: self.stk.len(),
            stmts: vec![],
            id: self.next_block_id,
            parent: Some(self.current.id),
        };
        self.next_block_id += 1;
        mem::replace(&mut self.current, ctx)
    }

    pub fn defer(&mut self) -> Result<&mut Self, Error> {
        MK_ERROR!(ErrorImpl::Unsupported { feature: "defer" }, "Defer")
    }

    pub fn go(&mut self) -> Result<&mut Self, Error> {
        MK_ERROR!(ErrorImpl::Unsupported { feature: "go" }, "Go")
    }
}

/// Quotes `s` between `delim`, escaped the way the target language reads
/// its string and rune literals.
pub(crate) fn quote(s: &str, delim: char) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{b}' => out.push_str("\\v"),
            '\\' => out.push_str("\\\\"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => {
                let code = c as u32;
                if code < 0x80 {
                    out.push_str(&format!("\\x{:02x}", code));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{:04x}", code));
                } else {
                    out.push_str(&format!("\\U{:08x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Control, format and non-space whitespace characters are escaped.
fn is_printable(c: char) -> bool {
    let format = matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{feff}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
    );
    !(c.is_control() || format || (c.is_whitespace() && c != ' '))
}

fn constant((value, ty): (Expr, Type)) -> Operand {
    Operand::new(value, ty, OperandMode::Constant)
}

/// The operand that refers to `symbol`.
pub(crate) fn symbol_operand(symbol: &Symbol) -> Operand {
    let value = Expr::ident(symbol.name());
    match symbol {
        Symbol::Var(var) => Operand::new(value, var.ty().clone(), OperandMode::Variable),
        Symbol::Const(c) => Operand::new(value, c.ty.clone(), OperandMode::Constant),
        Symbol::TypeName(tn) => Operand::new(value, tn.ty.clone(), OperandMode::TypeExpr),
        Symbol::Func(func) => Operand::new(value, func.ty(), OperandMode::Value),
        Symbol::Overload(overload) => Operand::new(value, overload.ty(), OperandMode::Value),
        Symbol::Builtin(_) => Operand {
            value,
            ty: None,
            mode: OperandMode::Builtin,
            auto: None,
        },
    }
}

fn not_indexable<T>(ty: &Type) -> Result<T, Error> {
    MK_ERROR!(ErrorImpl::NotIndexable { ty: ty.to_string() }, "Index")
}
