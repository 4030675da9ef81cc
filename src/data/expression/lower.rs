use crate::data::expression::ast::{BinaryOp, Expr, LogicalOp, Stmt, UnaryOp};
use crate::data::expression::bytecode::{Instruction, Program};
use crate::data::expression::error::ExprError;
use crate::data::variant::Variant;

pub(crate) fn lower_expr_program(expr: &Expr) -> Result<Program, ExprError> {
    let mut p = Program::new();
    lower_expr(expr, &mut p)?;
    Ok(p)
}

/// Statements leave nothing on the stack.
pub(crate) fn lower_assignment_program(stmts: &[Stmt]) -> Result<Program, ExprError> {
    let mut p = Program::new();
    for stmt in stmts {
        match stmt {
            Stmt::Assign { target, value } => {
                lower_expr(value, &mut p)?;
                let idx = p.push_address(target);
                p.emit(Instruction::Store(idx));
            }
            Stmt::Event { name, args } => {
                for a in args {
                    lower_expr(a, &mut p)?;
                }
                let name = p.push_literal(Variant::String(name.clone()));
                p.emit(Instruction::CallEvent {
                    name,
                    argc: argc(args.len())?,
                });
            }
        }
    }
    Ok(p)
}

fn lower_expr(e: &Expr, out: &mut Program) -> Result<(), ExprError> {
    match e {
        Expr::Lit(v) => {
            let idx = out.push_literal(v.clone());
            out.emit(Instruction::PushLiteral(idx));
        }
        Expr::Var(address) => {
            let idx = out.push_address(address);
            out.emit(Instruction::LoadVar(idx));
        }
        Expr::Unary { op, expr } => {
            lower_expr(expr, out)?;
            out.emit(match op {
                UnaryOp::Neg => Instruction::Neg,
                UnaryOp::Not => Instruction::Not,
            });
        }
        // Short-circuit: the right side only runs when it can change the result.
        Expr::Logical { op, left, right } => {
            lower_expr(left, out)?;
            out.emit(Instruction::ToBool);
            let jump = out.emit(match op {
                LogicalOp::And => Instruction::JumpIfFalseOrPop(0),
                LogicalOp::Or => Instruction::JumpIfTrueOrPop(0),
            });
            lower_expr(right, out)?;
            out.emit(Instruction::ToBool);
            out.patch_jump(jump);
        }
        Expr::Binary { op, left, right } => {
            lower_expr(left, out)?;
            lower_expr(right, out)?;
            out.emit(match op {
                BinaryOp::Add => Instruction::Add,
                BinaryOp::Sub => Instruction::Sub,
                BinaryOp::Mul => Instruction::Mul,
                BinaryOp::Div => Instruction::Div,
                BinaryOp::Eq => Instruction::Eq,
                BinaryOp::Ne => Instruction::Ne,
                BinaryOp::Lt => Instruction::Lt,
                BinaryOp::Le => Instruction::Le,
                BinaryOp::Gt => Instruction::Gt,
                BinaryOp::Ge => Instruction::Ge,
            });
        }
        // Only the taken branch is evaluated.
        Expr::Ternary {
            cond,
            then,
            otherwise,
        } => {
            lower_expr(cond, out)?;
            let to_else = out.emit(Instruction::JumpIfFalse(0));
            lower_expr(then, out)?;
            let to_end = out.emit(Instruction::Jump(0));
            out.patch_jump(to_else);
            lower_expr(otherwise, out)?;
            out.patch_jump(to_end);
        }
        Expr::Filter { id, args } => {
            for a in args {
                lower_expr(a, out)?;
            }
            out.emit(Instruction::CallFilter {
                id: *id,
                argc: argc(args.len())?,
            });
        }
    }
    Ok(())
}

fn argc(n: usize) -> Result<u8, ExprError> {
    u8::try_from(n).map_err(|_| ExprError::new(0, format!("too many arguments ({n})")))
}
