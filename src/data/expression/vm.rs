use crate::data::expression::bytecode::{Instruction, Program};
use crate::data::filters::FilterRegistry;
use crate::data::model::DataModel;
use crate::data::variant::Variant;

#[derive(Debug, Clone)]
pub(crate) struct VmError {
    pub(crate) message: String,
}

impl VmError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for VmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "vm error: {}", self.message)
    }
}

impl std::error::Error for VmError {}

/// Runs `p` against `model`. Expression programs leave exactly one value; assignment programs
/// leave none and yield `Variant::Empty`.
pub(crate) fn eval_program(
    p: &Program,
    model: &mut dyn DataModel,
    filters: &FilterRegistry,
) -> Result<Variant, VmError> {
    let mut stack: Vec<Variant> = Vec::with_capacity(16);
    let mut pc = 0usize;

    while let Some(&op) = p.instructions.get(pc) {
        pc += 1;
        match op {
            Instruction::PushLiteral(idx) => {
                let v = p
                    .literals
                    .get(idx.0 as usize)
                    .ok_or_else(|| VmError::new("literal idx out of range"))?;
                stack.push(v.clone());
            }
            Instruction::LoadVar(idx) => {
                let address = p
                    .addresses
                    .get(idx.0 as usize)
                    .ok_or_else(|| VmError::new("address idx out of range"))?;
                let v = model.get(address).map_err(|e| VmError::new(e.to_string()))?;
                stack.push(v);
            }

            Instruction::Neg => {
                let v = pop(&mut stack)?;
                stack.push(Variant::Float(-v.to_f64()));
            }
            Instruction::Not => {
                let v = pop(&mut stack)?;
                stack.push(Variant::Bool(!v.to_bool()));
            }
            Instruction::ToBool => {
                let v = pop(&mut stack)?;
                stack.push(Variant::Bool(v.to_bool()));
            }
            Instruction::Add => {
                let (a, b) = pop2(&mut stack)?;
                stack.push(if a.is_string() || b.is_string() {
                    Variant::String(format!("{a}{b}"))
                } else {
                    Variant::Float(a.to_f64() + b.to_f64())
                });
            }
            Instruction::Sub => bin_numeric(&mut stack, |a, b| a - b)?,
            Instruction::Mul => bin_numeric(&mut stack, |a, b| a * b)?,
            Instruction::Div => bin_numeric(&mut stack, |a, b| a / b)?,

            Instruction::Eq => bin_eq(&mut stack, true)?,
            Instruction::Ne => bin_eq(&mut stack, false)?,
            Instruction::Lt => bin_cmp(&mut stack, |a, b| a < b)?,
            Instruction::Le => bin_cmp(&mut stack, |a, b| a <= b)?,
            Instruction::Gt => bin_cmp(&mut stack, |a, b| a > b)?,
            Instruction::Ge => bin_cmp(&mut stack, |a, b| a >= b)?,

            Instruction::Jump(target) => pc = target as usize,
            Instruction::JumpIfFalse(target) => {
                if !pop(&mut stack)?.to_bool() {
                    pc = target as usize;
                }
            }
            Instruction::JumpIfTrueOrPop(target) => {
                if top(&stack)?.to_bool() {
                    pc = target as usize;
                } else {
                    stack.pop();
                }
            }
            Instruction::JumpIfFalseOrPop(target) => {
                if top(&stack)?.to_bool() {
                    stack.pop();
                } else {
                    pc = target as usize;
                }
            }

            Instruction::CallFilter { id, argc } => {
                let args = pop_n(&mut stack, argc)?;
                let v = filters
                    .call(id, &args)
                    .map_err(|e| VmError::new(e.to_string()))?;
                stack.push(v);
            }
            Instruction::Store(idx) => {
                let value = pop(&mut stack)?;
                let address = p
                    .addresses
                    .get(idx.0 as usize)
                    .ok_or_else(|| VmError::new("address idx out of range"))?;
                model
                    .set(address, value)
                    .map_err(|e| VmError::new(e.to_string()))?;
            }
            Instruction::CallEvent { name, argc } => {
                let args = pop_n(&mut stack, argc)?;
                let name = p
                    .literals
                    .get(name.0 as usize)
                    .and_then(Variant::as_str)
                    .ok_or_else(|| VmError::new("event name literal missing"))?;
                model
                    .call(name, &args)
                    .map_err(|e| VmError::new(e.to_string()))?;
            }
        }
    }

    match stack.len() {
        0 => Ok(Variant::Empty),
        1 => pop(&mut stack),
        n => Err(VmError::new(format!(
            "stack has {n} values at end of program"
        ))),
    }
}

fn pop(stack: &mut Vec<Variant>) -> Result<Variant, VmError> {
    stack.pop().ok_or_else(|| VmError::new("stack underflow"))
}

fn top(stack: &[Variant]) -> Result<&Variant, VmError> {
    stack.last().ok_or_else(|| VmError::new("stack underflow"))
}

fn pop2(stack: &mut Vec<Variant>) -> Result<(Variant, Variant), VmError> {
    let b = pop(stack)?;
    let a = pop(stack)?;
    Ok((a, b))
}

fn pop_n(stack: &mut Vec<Variant>, argc: u8) -> Result<Vec<Variant>, VmError> {
    let argc = argc as usize;
    if stack.len() < argc {
        return Err(VmError::new(format!(
            "cannot pop {argc} arguments, stack holds {}",
            stack.len()
        )));
    }
    Ok(stack.split_off(stack.len() - argc))
}

fn bin_numeric(stack: &mut Vec<Variant>, f: impl FnOnce(f64, f64) -> f64) -> Result<(), VmError> {
    let (a, b) = pop2(stack)?;
    stack.push(Variant::Float(f(a.to_f64(), b.to_f64())));
    Ok(())
}

fn bin_cmp(stack: &mut Vec<Variant>, f: impl FnOnce(f64, f64) -> bool) -> Result<(), VmError> {
    let (a, b) = pop2(stack)?;
    stack.push(Variant::Bool(f(a.to_f64(), b.to_f64())));
    Ok(())
}

/// Compares as strings when either side is a string, numerically otherwise.
fn bin_eq(stack: &mut Vec<Variant>, is_eq: bool) -> Result<(), VmError> {
    let (a, b) = pop2(stack)?;
    let res = if a.is_string() || b.is_string() {
        a.to_string() == b.to_string()
    } else {
        a.to_f64() == b.to_f64()
    };
    stack.push(Variant::Bool(res == is_eq));
    Ok(())
}
