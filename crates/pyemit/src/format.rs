//! The template interpreter.
//!
//! Rendering is uniform for every node shape: ask the node for its
//! template and its slot list, then walk the template, substituting
//! slots by index. The only non-mechanical part is parenthesization,
//! decided by comparing the child expression's own precedence definition
//! against the slot it occupies.

use crate::ast::{Expr, NodeRef, Program, Slot, Stmt};
use crate::op::{self, OpDef};
use crate::template::Piece;
use crate::token::{TokenAssoc, TokenKind, TokenSink};

/// Renders a whole program.
pub fn render_program(program: &Program, sink: &mut dyn TokenSink) {
    Formatter { sink }.interpret(None, program.template(), &program.slots());
}

/// Renders one statement, newline included.
pub fn render_stmt(stmt: &Stmt, sink: &mut dyn TokenSink) {
    Formatter { sink }.render(NodeRef::Stmt(stmt));
}

/// Renders one expression.
pub fn render_expr(expr: &Expr, sink: &mut dyn TokenSink) {
    Formatter { sink }.render(NodeRef::Expr(expr));
}

/// Convenience wrapper rendering straight to a string.
#[must_use]
pub fn program_to_source(program: &Program) -> String {
    let mut writer = crate::token::SourceWriter::new();
    render_program(program, &mut writer);
    writer.finish()
}

/// True when `child` must be parenthesized in a position where the
/// grammar accepts any expression except a bare comma or yield. Starred
/// expressions share the tuple's precedence level but stay bare:
/// `[*rest, b]` is legal where `[(a, b), c]` needs the parens.
fn needs_parens_loose(child: &Expr) -> bool {
    if matches!(child, Expr::Starred { .. }) {
        return false;
    }
    let def = child.op_def();
    *def == op::TUPLE_DEF || def.precedence == op::YIELD_DEF.precedence
}

struct Formatter<'s> {
    sink: &'s mut dyn TokenSink,
}

impl Formatter<'_> {
    fn render(&mut self, node: NodeRef<'_>) {
        match node {
            NodeRef::Ident(text) => self.sink.name(text),
            NodeRef::StrLit(raw) => self.sink.string(raw),
            NodeRef::Token { text, kind, assoc } => self.sink.token(text, kind, assoc),
            NodeRef::Dotted(dotted) => dotted.render_to(self.sink),
            _ => {
                let template = node
                    .aux_template()
                    .unwrap_or_else(|| unreachable!("template-less node {node:?}"));
                let pressure = match node {
                    NodeRef::Expr(e) => e.child_pressure(),
                    _ => None,
                };
                self.interpret(pressure, template, &node.aux_slots());
            }
        }
    }

    fn interpret(&mut self, pressure: Option<&'static OpDef>, template: &crate::template::Template, slots: &[Slot<'_>]) {
        // Operand positions count only the precedence-checked expression
        // slots, mirroring how the grammar counts operands.
        let operand_count = slots
            .iter()
            .filter(|s| matches!(s, Slot::One(NodeRef::Expr(_))))
            .count();
        let mut operand_index_by_slot = Vec::with_capacity(slots.len());
        let mut seen = 0usize;
        for slot in slots {
            operand_index_by_slot.push(seen);
            if matches!(slot, Slot::One(NodeRef::Expr(_))) {
                seen += 1;
            }
        }

        for piece in template.pieces() {
            match piece {
                Piece::Literal(tok) => self.sink.token(tok.text, tok.kind, tok.assoc),
                Piece::Newline => self.sink.newline(),
                Piece::Indent => self.sink.indent(),
                Piece::Dedent => self.sink.dedent(),
                Piece::Slot(i) => match &slots[*i] {
                    Slot::Empty => {}
                    Slot::Bare(node) => self.render(*node),
                    Slot::One(node) => {
                        self.render_checked(*node, pressure, operand_index_by_slot[*i], operand_count);
                    }
                    Slot::Group(_) => {
                        debug_assert!(false, "group slot referenced as a single slot");
                    }
                },
                Piece::Group { slot, separator } => {
                    let Slot::Group(items) = &slots[*slot] else {
                        debug_assert!(matches!(&slots[*slot], Slot::Empty));
                        continue;
                    };
                    let comma_separated = separator.as_ref().is_some_and(|s| s.text == ",");
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            if let Some(sep) = separator {
                                self.sink.token(sep.text, sep.kind, sep.assoc);
                            }
                        }
                        // Inside a comma-separated group, a comma-shaped
                        // child would blend into the group; wrap it.
                        let wrap = comma_separated
                            && matches!(item, NodeRef::Expr(e) if needs_parens_loose(e));
                        if wrap {
                            self.parenthesized(*item);
                        } else {
                            self.render(*item);
                        }
                    }
                }
            }
        }
    }

    fn render_checked(
        &mut self,
        node: NodeRef<'_>,
        pressure: Option<&'static OpDef>,
        operand_index: usize,
        operand_count: usize,
    ) {
        let NodeRef::Expr(expr) = node else {
            self.render(node);
            return;
        };
        let wrap = match pressure {
            Some(parent) => !parent.can_nest(expr.op_def(), operand_index, operand_count),
            None => needs_parens_loose(expr),
        };
        if wrap {
            self.parenthesized(node);
        } else {
            self.render(node);
        }
    }

    fn parenthesized(&mut self, node: NodeRef<'_>) {
        self.sink.token("(", TokenKind::Punctuation, TokenAssoc::Right);
        self.render(node);
        self.sink.token(")", TokenKind::Punctuation, TokenAssoc::Left);
    }
}
