use crate::data::expression::{DataExpression, ParseMode};
use crate::data::filters::FilterRegistry;
use crate::data::model::DataModel;
use crate::foundation::error::{StyleError, StyleResult};

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Expression(DataExpression),
}

/// Text with `{{ expression }}` holes, e.g. `"{{ count }} items"`.
#[derive(Debug, Clone)]
pub struct TextBinding {
    segments: Vec<Segment>,
    last: Option<String>,
}

impl TextBinding {
    pub fn parse(text: &str, filters: &FilterRegistry) -> StyleResult<Self> {
        let mut segments = Vec::new();
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_owned()));
            }
            let after = &rest[open + 2..];
            let close = after.find("}}").ok_or_else(|| {
                StyleError::parse(format!("unclosed '{{{{' in text binding '{text}'"))
            })?;
            let source = after[..close].trim();
            segments.push(Segment::Expression(DataExpression::parse(
                source,
                ParseMode::Expression,
                filters,
            )?));
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_owned()));
        }

        Ok(Self {
            segments,
            last: None,
        })
    }

    /// Whether the text contains any binding at all.
    pub fn has_expressions(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Expression(_)))
    }

    /// Evaluates every hole; failed expressions render as empty text.
    pub fn render(&self, model: &mut dyn DataModel, filters: &FilterRegistry) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Expression(e) => out.push_str(&e.run(model, filters).to_string()),
            }
        }
        out
    }

    /// Re-renders when first called or when a referenced variable is dirty; returns the new
    /// text only if it changed.
    pub fn update(
        &mut self,
        model: &mut dyn DataModel,
        filters: &FilterRegistry,
    ) -> Option<&str> {
        let dirty = self.last.is_none()
            || self.segments.iter().any(|s| match s {
                Segment::Expression(e) => e.is_dirty(model),
                Segment::Literal(_) => false,
            });
        if !dirty {
            return None;
        }

        let text = self.render(model, filters);
        if self.last.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last = Some(text);
        self.last.as_deref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/text.rs"]
mod tests;
