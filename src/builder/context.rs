use std::ops::{Deref, DerefMut};

use crate::ast::{
    ast::Stmt,
    symbols::{Func, Scope},
};

use super::code_builder::CodeBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Package,
    FuncBody,
    Block,
}

/// A lexical construction frame: a scope, the statements emitted into it
/// and the operand stack depth when it was entered.
#[derive(Debug)]
pub struct BlockContext {
    pub kind: BlockKind,
    pub scope: Scope,
    pub stack_base: usize,
    pub stmts: Vec<Stmt>,
    pub(crate) id: usize,
    /// Id of the context that was current when this one was entered.
    pub(crate) parent: Option<usize>,
}

impl BlockContext {
    pub(crate) fn package(scope: Scope) -> Self {
        BlockContext {
            kind: BlockKind::Package,
            scope,
            stack_base: 0,
            stmts: vec![],
            id: 0,
            parent: None,
        }
    }

    pub fn label(&self) -> &str {
        self.scope.label()
    }
}

/// A saved block context together with the function it belonged to.
#[derive(Debug)]
pub struct FuncBodyContext {
    pub block: BlockContext,
    pub func: Option<Func>,
}

/// Keeps a block open for as long as it lives. Dereferences to the
/// builder, so construction continues through the guard.
///
/// Blocks and function bodies opened through the guard with
/// [`CodeBuilder::block`] or [`CodeBuilder::func_body`] and still open when
/// the guard goes away are closed first, innermost first.
pub struct BlockGuard<'a> {
    builder: &'a mut CodeBuilder,
    saved: Option<BlockContext>,
    /// Open frame count when the guard was created.
    depth: usize,
}

impl<'a> BlockGuard<'a> {
    pub(crate) fn new(builder: &'a mut CodeBuilder, saved: BlockContext) -> Self {
        let depth = builder.frame_depth();
        BlockGuard {
            builder,
            saved: Some(saved),
            depth,
        }
    }

    /// Exits the block and returns its statements.
    pub fn finish(mut self) -> Vec<Stmt> {
        self.release()
    }

    fn release(&mut self) -> Vec<Stmt> {
        match self.saved.take() {
            Some(saved) => {
                self.builder.close_frames(self.depth);
                self.builder.end_block_stmt(saved)
            }
            None => vec![],
        }
    }
}

impl Deref for BlockGuard<'_> {
    type Target = CodeBuilder;

    fn deref(&self) -> &Self::Target {
        self.builder
    }
}

impl DerefMut for BlockGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.builder
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
