use std::fmt;

use smallvec::SmallVec;

use crate::foundation::error::{StyleError, StyleResult};

/// Root names with special meaning in expressions; they can never be bound as variables.
pub const RESERVED_NAMES: &[&str] = &["it", "ev", "true", "false", "size", "literal"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressEntry {
    Name(String),
    Index(usize),
}

/// Path into the data model, e.g. `rows[2].title` or `items.size`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataAddress {
    entries: SmallVec<[AddressEntry; 3]>,
}

impl DataAddress {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            entries: smallvec::smallvec![AddressEntry::Name(name.into())],
        }
    }

    pub fn parse(text: &str) -> StyleResult<Self> {
        let text = text.trim();
        let mut entries = SmallVec::new();
        let mut rest = text;

        loop {
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            let name = rest[..end].trim();
            if !is_valid_name(name) {
                return Err(StyleError::parse(format!(
                    "invalid name '{name}' in data address '{text}'"
                )));
            }
            entries.push(AddressEntry::Name(name.to_owned()));
            rest = &rest[end..];

            while let Some(inner) = rest.strip_prefix('[') {
                let close = inner.find(']').ok_or_else(|| {
                    StyleError::parse(format!("unclosed '[' in data address '{text}'"))
                })?;
                let index = inner[..close].trim().parse::<usize>().map_err(|_| {
                    StyleError::parse(format!("invalid index in data address '{text}'"))
                })?;
                entries.push(AddressEntry::Index(index));
                rest = &inner[close + 1..];
            }

            match rest.strip_prefix('.') {
                Some(next) => rest = next,
                None if rest.is_empty() => break,
                None => {
                    return Err(StyleError::parse(format!(
                        "unexpected '{rest}' in data address '{text}'"
                    )));
                }
            }
        }

        Ok(Self { entries })
    }

    pub(crate) fn from_entries(entries: impl IntoIterator<Item = AddressEntry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Name of the bound variable the address starts from.
    pub fn root_name(&self) -> &str {
        match self.entries.first() {
            Some(AddressEntry::Name(n)) => n,
            _ => "",
        }
    }

    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    pub fn push(&mut self, entry: AddressEntry) {
        self.entries.push(entry);
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for DataAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            match entry {
                AddressEntry::Name(n) if i == 0 => f.write_str(n)?,
                AddressEntry::Name(n) => write!(f, ".{n}")?,
                AddressEntry::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/address.rs"]
mod tests;
