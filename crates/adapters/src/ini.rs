//! Minimal repeated-key INI reader/writer.
//!
//! `settings/generaldata.ini` uses repeated keys inside `[playlist]`
//! (`playlist_year +` / `playlist_year -`), which the standard `ini` crate
//! model (one value per key) can't represent. This is a small, internal
//! helper — not part of the `StudyHandlePort` contract — kept private to
//! this crate (spec.md §1: "the INI-with-repeated-keys reader used to parse
//! settings" is out of scope except at the contract it backs).

/// One `[section]` of an INI document, preserving key order and repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    /// Section name without brackets.
    pub name: String,
    /// `(key, value)` pairs in file order; a key may repeat.
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    /// First value for `key`, if present.
    #[must_use]
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value.as_str())
    }

    /// All values for `key`, in file order.
    #[must_use]
    pub fn get_all<'section>(&'section self, key: &str) -> Vec<&'section str> {
        self.entries
            .iter()
            .filter(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// True if `key` appears at least once.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(entry_key, _)| entry_key == key)
    }
}

/// A parsed INI document: an ordered list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parse INI text into sections, ignoring blank lines and `;`/`#`
    /// comments. Keys before the first `[section]` header are dropped —
    /// every study file of interest here starts with `[general]` or
    /// `[antares]`.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<IniSection> = Vec::new();
        let mut current: Option<IniSection> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
                current = Some(IniSection {
                    name: name.trim().to_owned(),
                    entries: Vec::new(),
                });
                continue;
            }
            let Some(section) = current.as_mut() else {
                continue;
            };
            if let Some((key, value)) = line.split_once('=') {
                section.entries.push((key.trim().to_owned(), value.trim().to_owned()));
            }
        }
        if let Some(section) = current.take() {
            sections.push(section);
        }

        Self { sections }
    }

    /// Borrow a section by name.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Replace (or append) a section wholesale, preserving every other
    /// section's position and content.
    pub fn replace_section(&mut self, name: &str, entries: Vec<(String, String)>) {
        let replacement = IniSection {
            name: name.to_owned(),
            entries,
        };
        if let Some(existing) = self.sections.iter_mut().find(|section| section.name == name) {
            *existing = replacement;
        } else {
            self.sections.push(replacement);
        }
    }

    /// Render back to INI text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();
        for section in &self.sections {
            output.push('[');
            output.push_str(&section.name);
            output.push_str("]\n");
            for (key, value) in &section.entries {
                output.push_str(key);
                output.push_str(" = ");
                output.push_str(value);
                output.push('\n');
            }
        }
        output
    }
}
