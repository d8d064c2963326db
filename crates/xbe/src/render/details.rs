//! `Label: value` detail views for `show`.

use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Field { label: String, value: String, indent: bool },
    Section(String),
    Blank,
}

/// Ordered detail lines. Fields with empty values are skipped.
#[derive(Debug, Clone, Default)]
pub struct Details {
    lines: Vec<Line>,
    in_section: bool,
}

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field; skipped when `value` is blank.
    pub fn field(&mut self, label: &str, value: impl AsRef<str>) -> &mut Self {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.lines.push(Line::Field {
                label: label.to_string(),
                value: value.to_string(),
                indent: self.in_section,
            });
        }
        self
    }

    /// Add a boolean field rendered as `yes`/`no`; skipped when unknown.
    pub fn flag(&mut self, label: &str, value: Option<bool>) -> &mut Self {
        match value {
            Some(true) => self.field(label, "yes"),
            Some(false) => self.field(label, "no"),
            None => self,
        }
    }

    /// Start an indented section. Sections with no fields are dropped.
    pub fn section(&mut self, title: &str) -> &mut Self {
        self.lines.push(Line::Blank);
        self.lines.push(Line::Section(title.to_string()));
        self.in_section = true;
        self
    }

    fn visible_lines(&self) -> Vec<&Line> {
        let mut visible: Vec<&Line> = Vec::with_capacity(self.lines.len());
        let mut i = 0;
        while i < self.lines.len() {
            if let Line::Section(_) = self.lines[i] {
                let has_fields = matches!(self.lines.get(i + 1), Some(Line::Field { .. }));
                if !has_fields {
                    // Drop the section header and the blank line before it.
                    if matches!(visible.last(), Some(Line::Blank)) {
                        visible.pop();
                    }
                    i += 1;
                    continue;
                }
            }
            visible.push(&self.lines[i]);
            i += 1;
        }
        visible
    }

    pub fn render(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for line in self.visible_lines() {
            match line {
                Line::Field {
                    label,
                    value,
                    indent,
                } => {
                    let pad = if *indent { "  " } else { "" };
                    writeln!(out, "{}{}: {}", pad, label, value)?;
                }
                Line::Section(title) => writeln!(out, "{}:", title)?,
                Line::Blank => writeln!(out)?,
            }
        }
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        let _ = self.render(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_skipped() {
        let mut details = Details::new();
        details
            .field("ID", "12")
            .field("Name", "  ")
            .field("Status", "active")
            .flag("Admin", None);
        assert_eq!(details.to_text(), "ID: 12\nStatus: active\n");
    }

    #[test]
    fn test_sections_indent_and_empty_sections_drop() {
        let mut details = Details::new();
        details.field("ID", "5").flag("Admin", Some(false));
        details.section("User").field("ID", "9").field("Name", "Dana");
        details.section("Broker").field("Name", "");
        assert_eq!(
            details.to_text(),
            "ID: 5\nAdmin: no\n\nUser:\n  ID: 9\n  Name: Dana\n"
        );
    }

    #[test]
    fn test_consecutive_empty_sections_leave_single_gap() {
        let mut details = Details::new();
        details.field("ID", "5");
        details.section("Broker");
        details.section("Dates").field("Start", "");
        details.section("Role").field("Kind", "manager");
        let lines = details.visible_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(details.to_text(), "ID: 5\n\nRole:\n  Kind: manager\n");
    }
}
