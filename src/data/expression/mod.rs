//! Data binding expressions: `radius < 10.5 ? 'small' : 'large' | to_upper`.
//!
//! Text is lexed, parsed against the filter registry, lowered to a flat [`bytecode::Program`],
//! and run by a small stack machine against any [`DataModel`].

pub(crate) mod ast;
pub(crate) mod bytecode;
pub(crate) mod error;
pub(crate) mod lexer;
pub(crate) mod lower;
pub(crate) mod parser;
pub(crate) mod vm;

use crate::data::address::DataAddress;
use crate::data::filters::FilterRegistry;
use crate::data::model::DataModel;
use crate::data::variant::Variant;
use crate::foundation::error::{StyleError, StyleResult};

use self::bytecode::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Produces a value.
    #[default]
    Expression,
    /// `name = expr` statements and event calls separated by `;`.
    Assignment,
}

/// A compiled data expression.
#[derive(Debug, Clone)]
pub struct DataExpression {
    source: String,
    mode: ParseMode,
    program: Program,
}

impl DataExpression {
    #[tracing::instrument(level = "trace", skip(filters))]
    pub fn parse(source: &str, mode: ParseMode, filters: &FilterRegistry) -> StyleResult<Self> {
        let lowered = match mode {
            ParseMode::Expression => parser::parse_expr(source, filters)
                .and_then(|ast| lower::lower_expr_program(&ast)),
            ParseMode::Assignment => parser::parse_assignment(source, filters)
                .and_then(|stmts| lower::lower_assignment_program(&stmts)),
        };
        let program = lowered
            .map_err(|e| e.into_style_error(source))
            .inspect_err(|err| tracing::warn!(%err, "data expression rejected"))?;

        Ok(Self {
            source: source.to_owned(),
            mode,
            program,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Every data path the expression reads or assigns.
    pub fn addresses(&self) -> &[DataAddress] {
        &self.program.addresses
    }

    /// Root variable names, deduplicated in first-use order.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for a in &self.program.addresses {
            let root = a.root_name();
            if !names.contains(&root) {
                names.push(root);
            }
        }
        names
    }

    /// True when any variable the expression reads has been dirtied.
    pub fn is_dirty(&self, model: &dyn DataModel) -> bool {
        self.program
            .addresses
            .iter()
            .any(|a| model.is_variable_dirty(a.root_name()))
    }

    pub fn try_run(
        &self,
        model: &mut dyn DataModel,
        filters: &FilterRegistry,
    ) -> StyleResult<Variant> {
        vm::eval_program(&self.program, model, filters).map_err(|e| {
            StyleError::evaluation(format!("{} in '{}'", e.message, self.source))
        })
    }

    /// Like [`Self::try_run`], but a failure is logged and yields `Variant::Empty`.
    pub fn run(&self, model: &mut dyn DataModel, filters: &FilterRegistry) -> Variant {
        self.try_run(model, filters).unwrap_or_else(|err| {
            tracing::warn!(%err, "data expression failed");
            Variant::Empty
        })
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/data/expression/mod.rs"]
mod tests;
