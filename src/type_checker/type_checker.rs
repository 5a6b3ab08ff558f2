use crate::ast::{
    ast::Expr,
    symbols::Symbol,
    types::{BasicKind, InterfaceType, Signature, Type, TypeParam},
};

use super::{
    operand::Operand,
    oracle::{InferOutcome, InferRequest, TypeOracle},
};

/// The built-in type oracle.
#[derive(Debug, Default, Clone)]
pub struct TypeChecker;

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker
    }

    /// Whether `ty` has every method of `iface`.
    pub fn implements(&self, ty: &Type, iface: &InterfaceType) -> bool {
        iface.methods.iter().all(|(name, want)| {
            let want = Type::signature(want.clone());
            match method_signature(ty, name) {
                Some(have) => Type::signature(have) == want,
                None => false,
            }
        })
    }

    /// Whether `ty` satisfies the constraint `constraint`.
    pub fn satisfies(&self, ty: &Type, constraint: &Type) -> bool {
        let Type::Interface(iface) = constraint.underlying() else {
            return false;
        };

        if iface.comparable && !is_comparable(ty) {
            return false;
        }
        if let Some(types) = &iface.type_set {
            let under = ty.underlying();
            if !types.iter().any(|t| *t == under) {
                return false;
            }
        }
        self.implements(ty, &iface)
    }

    fn untyped_fits(&self, kind: BasicKind, target: &Type) -> bool {
        match target.underlying() {
            Type::Basic(target) => match kind {
                BasicKind::UntypedBool => target.is_boolean(),
                BasicKind::UntypedInt | BasicKind::UntypedRune => target.is_numeric(),
                BasicKind::UntypedFloat => target.is_float() || target.is_complex(),
                BasicKind::UntypedComplex => target.is_complex(),
                BasicKind::UntypedString => target.is_string(),
                _ => false,
            },
            Type::Pointer(_) | Type::Slice(_) | Type::Map(..) | Type::Signature(_) => {
                kind == BasicKind::UntypedNil
            }
            Type::Interface(iface) => {
                kind == BasicKind::UntypedNil
                    || iface.methods.is_empty() && iface.type_set.is_none()
            }
            _ => false,
        }
    }
}

impl TypeOracle for TypeChecker {
    fn assignable(&self, value: &Type, target: &Type) -> bool {
        if matches!(target, Type::Basic(BasicKind::Invalid))
            || matches!(value, Type::Basic(BasicKind::Invalid))
        {
            return false;
        }
        if value == target {
            return true;
        }

        if let Type::Basic(kind) = value {
            if kind.is_untyped() {
                return self.untyped_fits(*kind, target);
            }
        }

        if let Type::Interface(iface) = target.underlying() {
            if iface.type_set.is_none() && !iface.comparable {
                return self.implements(value, &iface);
            }
        }

        (!value.is_named() || !target.is_named()) && value.underlying() == target.underlying()
    }

    fn convertible(&self, value: &Type, target: &Type) -> bool {
        if self.assignable(value, target) {
            return true;
        }
        if value.is_untyped() {
            return self.assignable(value, &target.underlying());
        }

        let (from, to) = (value.underlying(), target.underlying());
        if from == to {
            return true;
        }

        match (&from, &to) {
            (Type::Basic(a), Type::Basic(b)) => {
                (a.is_numeric() && b.is_numeric()) || (a.is_integer() && b.is_string())
            }
            (Type::Basic(a), Type::Slice(elem)) | (Type::Slice(elem), Type::Basic(a)) => {
                a.is_string() && is_byte_or_rune(elem)
            }
            (Type::Pointer(a), Type::Pointer(b)) => a.underlying() == b.underlying(),
            _ => false,
        }
    }

    fn default_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Basic(BasicKind::UntypedBool) => Type::Basic(BasicKind::Bool),
            Type::Basic(BasicKind::UntypedInt) => Type::Basic(BasicKind::Int),
            Type::Basic(BasicKind::UntypedRune) => Type::Basic(BasicKind::Int32),
            Type::Basic(BasicKind::UntypedFloat) => Type::Basic(BasicKind::Float64),
            Type::Basic(BasicKind::UntypedComplex) => Type::Basic(BasicKind::Complex128),
            Type::Basic(BasicKind::UntypedString) => Type::Basic(BasicKind::String),
            _ => ty.clone(),
        }
    }

    fn infer(&self, request: &InferRequest) -> InferOutcome {
        let mut session = InferSession::new(request.type_params);

        if request.explicit.len() > request.type_params.len() {
            session.diagnostics.push(format!(
                "got {} type arguments but {} type parameters",
                request.explicit.len(),
                request.type_params.len()
            ));
            return session.finish();
        }
        if request.params.len() != request.args.len() {
            session.diagnostics.push(format!(
                "got {} arguments but {} parameters",
                request.args.len(),
                request.params.len()
            ));
            return session.finish();
        }
        for (i, ty) in request.explicit.iter().enumerate() {
            session.solved[i] = Some(ty.clone());
        }

        // Typed arguments first, so that untyped constants only fill the gaps.
        for (param, arg) in request.params.iter().zip(request.args.iter()) {
            if !param.mentions(request.type_params) || arg.is_untyped() {
                continue;
            }
            let arg_ty = arg.ty();
            if let Err(mismatch) = session.unify(param, &arg_ty) {
                session.report(mismatch, param, &arg_ty, &arg.value);
                return session.finish();
            }
        }

        for i in 0..request.type_params.len() {
            if session.solved[i].is_none() {
                session.default_untyped(self, i, request.params, request.args);
            }
        }
        if !session.diagnostics.is_empty() {
            return session.finish();
        }

        for (i, tp) in request.type_params.iter().enumerate() {
            match &session.solved[i] {
                None => session
                    .diagnostics
                    .push(format!("cannot infer {}", tp.name())),
                Some(ty) if !self.satisfies(ty, tp.constraint()) => session
                    .diagnostics
                    .push(format!("{} does not satisfy {}", ty, tp.constraint())),
                Some(_) => (),
            }
        }

        session.finish()
    }
}

enum Mismatch {
    /// The type parameter at this index is already bound to another type.
    Conflict(usize),
    Shape,
}

struct InferSession<'a> {
    type_params: &'a [TypeParam],
    solved: Vec<Option<Type>>,
    diagnostics: Vec<String>,
}

impl<'a> InferSession<'a> {
    fn new(type_params: &'a [TypeParam]) -> Self {
        InferSession {
            type_params,
            solved: vec![None; type_params.len()],
            diagnostics: vec![],
        }
    }

    fn index_of(&self, tp: &TypeParam) -> Option<usize> {
        self.type_params.iter().position(|p| p == tp)
    }

    fn unify(&mut self, param: &Type, arg: &Type) -> Result<(), Mismatch> {
        if let Type::TypeParam(tp) = param {
            if let Some(i) = self.index_of(tp) {
                return match &self.solved[i] {
                    Some(bound) if bound == arg => Ok(()),
                    Some(_) => Err(Mismatch::Conflict(i)),
                    None => {
                        self.solved[i] = Some(arg.clone());
                        Ok(())
                    }
                };
            }
        }
        if !param.mentions(self.type_params) {
            // Checked for assignability once the signature is instantiated.
            return Ok(());
        }

        let arg = match arg {
            Type::Named(named) => named.underlying(),
            _ => arg.clone(),
        };
        match (param, &arg) {
            (Type::Pointer(p), Type::Pointer(a)) | (Type::Slice(p), Type::Slice(a)) => {
                self.unify(p, a)
            }
            (Type::Array(p, n), Type::Array(a, m)) if n == m => self.unify(p, a),
            (Type::Map(pk, pv), Type::Map(ak, av)) => {
                self.unify(pk, ak)?;
                self.unify(pv, av)
            }
            (Type::Signature(p), Type::Signature(a)) => self.unify_signature(p, a),
            (Type::Tuple(p), Type::Tuple(a)) if p.len() == a.len() => {
                for (p, a) in p.types().iter().zip(a.types().iter()) {
                    self.unify(p, a)?;
                }
                Ok(())
            }
            _ => Err(Mismatch::Shape),
        }
    }

    fn unify_signature(&mut self, param: &Signature, arg: &Signature) -> Result<(), Mismatch> {
        if param.params.len() != arg.params.len()
            || param.results.len() != arg.results.len()
            || param.variadic != arg.variadic
        {
            return Err(Mismatch::Shape);
        }
        for (p, a) in param.params.types().iter().zip(arg.params.types().iter()) {
            self.unify(p, a)?;
        }
        for (p, a) in param.results.types().iter().zip(arg.results.types().iter()) {
            self.unify(p, a)?;
        }
        Ok(())
    }

    fn report(&mut self, mismatch: Mismatch, param: &Type, arg_ty: &Type, expr: &Expr) {
        let message = match mismatch {
            Mismatch::Conflict(i) => format!(
                "type {} of {} does not match inferred type {} for {}",
                arg_ty,
                expr,
                self.solved[i].as_ref().map(Type::to_string).unwrap_or_default(),
                self.type_params[i].name()
            ),
            Mismatch::Shape => format!("type {} of {} does not match {}", arg_ty, expr, param),
        };
        self.diagnostics.push(message);
    }

    /// Binds the type parameter at `index` from untyped constants passed
    /// directly for it, using the largest numeric kind among them.
    fn default_untyped(
        &mut self,
        oracle: &TypeChecker,
        index: usize,
        params: &[Type],
        args: &[Operand],
    ) {
        let target = Type::TypeParam(self.type_params[index].clone());
        let mut chosen: Option<(BasicKind, &Expr)> = None;

        for (param, arg) in params.iter().zip(args.iter()) {
            if *param != target {
                continue;
            }
            let Some(Type::Basic(kind)) = &arg.ty else {
                continue;
            };
            if !kind.is_untyped() || *kind == BasicKind::UntypedNil {
                continue;
            }

            chosen = match chosen {
                None => Some((*kind, &arg.value)),
                Some((current, _)) if current == *kind => chosen,
                Some((current, first)) => match (current.untyped_rank(), kind.untyped_rank()) {
                    (Some(a), Some(b)) if b > a => Some((*kind, &arg.value)),
                    (Some(_), Some(_)) => Some((current, first)),
                    _ => {
                        self.diagnostics.push(format!(
                            "mismatched types {} and {} (cannot infer {})",
                            current.name(),
                            kind.name(),
                            self.type_params[index].name()
                        ));
                        return;
                    }
                },
            };
        }

        if let Some((kind, _)) = chosen {
            self.solved[index] = Some(oracle.default_type(&Type::Basic(kind)));
        }
    }

    fn finish(self) -> InferOutcome {
        InferOutcome {
            inferred: self
                .solved
                .into_iter()
                .map(|ty| ty.unwrap_or_else(Type::invalid))
                .collect(),
            diagnostics: self.diagnostics,
        }
    }
}

/// The signature of method `name` in the method set of `ty`, without its receiver.
pub fn method_signature(ty: &Type, name: &str) -> Option<Signature> {
    let base = match ty {
        Type::Pointer(elem) => &**elem,
        _ => ty,
    };
    if let Type::Named(named) = base {
        if let Some(Symbol::Func(func)) = named.method(name) {
            return Some(func.signature().without_recv());
        }
    }
    match base.underlying() {
        Type::Interface(iface) => iface.method(name).cloned(),
        _ => None,
    }
}

fn is_comparable(ty: &Type) -> bool {
    match ty.underlying() {
        Type::Slice(_) | Type::Map(..) | Type::Signature(_) | Type::Overload(_) => false,
        Type::Array(elem, _) => is_comparable(&elem),
        Type::Struct(st) => st.fields.iter().all(|f| is_comparable(&f.ty)),
        _ => true,
    }
}

fn is_byte_or_rune(ty: &Type) -> bool {
    matches!(
        ty.underlying(),
        Type::Basic(BasicKind::Uint8) | Type::Basic(BasicKind::Int32)
    )
}
