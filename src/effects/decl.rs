use crate::style::specification::{SplitOption, split_property_values};

/// Box of an element an effect paints into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoxArea {
    Border,
    Padding,
    Content,
    /// Resolved by the consumer: padding box for decorators, border box for masks.
    #[default]
    Auto,
}

impl BoxArea {
    fn from_keyword(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "border-box" => Some(Self::Border),
            "padding-box" => Some(Self::Padding),
            "content-box" => Some(Self::Content),
            _ => None,
        }
    }

    pub fn resolve(self, fallback: BoxArea) -> BoxArea {
        match self {
            Self::Auto => fallback,
            other => other,
        }
    }
}

/// How entries of an effect list are separated in declaration text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectListKind {
    /// `decorator` and `mask-image`: comma separated, each entry may carry a paint area.
    Decorator,
    /// `filter` and `backdrop-filter`: whitespace separated function calls.
    Filter,
}

/// One named effect with its raw arguments, e.g. `blur(4px)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectDeclaration {
    pub name: String,
    pub args: Vec<String>,
    pub paint_area: BoxArea,
}

/// Parsed value of an effect-list property, keeping the source text for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectDeclarationList {
    pub list: Vec<EffectDeclaration>,
    pub value: String,
}

impl EffectDeclarationList {
    /// Returns `None` for malformed text; `none` and empty text give an empty list.
    pub fn parse(value: &str, kind: EffectListKind) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Some(Self {
                list: Vec::new(),
                value: trimmed.to_owned(),
            });
        }

        let split = match kind {
            EffectListKind::Decorator => SplitOption::Comma,
            EffectListKind::Filter => SplitOption::Whitespace,
        };

        let entries = split_property_values(trimmed, split);
        if entries.is_empty() {
            return None;
        }

        let mut list = Vec::new();
        for entry in entries {
            let mut tokens = split_property_values(&entry, SplitOption::Whitespace).into_iter();
            let head = tokens.next()?;
            let mut declaration = parse_call(&head)?;
            for token in tokens {
                if kind == EffectListKind::Filter {
                    return None;
                }
                declaration.paint_area = BoxArea::from_keyword(&token)?;
            }
            list.push(declaration);
        }

        Some(Self {
            list,
            value: trimmed.to_owned(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

fn parse_call(token: &str) -> Option<EffectDeclaration> {
    let (name, args) = match token.find('(') {
        Some(open) => {
            let inner = token[open + 1..].strip_suffix(')')?;
            let args = split_property_values(inner, SplitOption::Whitespace)
                .into_iter()
                .map(|a| a.trim_end_matches(',').to_owned())
                .filter(|a| !a.is_empty())
                .collect();
            (&token[..open], args)
        }
        None => (token, Vec::new()),
    };

    let valid_name = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_name {
        return None;
    }

    Some(EffectDeclaration {
        name: name.to_ascii_lowercase(),
        args,
        paint_area: BoxArea::Auto,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/decl.rs"]
mod tests;
