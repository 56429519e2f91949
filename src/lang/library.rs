use super::{Column, Error, ErrorList, Formula, Limits};

/// One `name { ... }` block of a library file.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub name: String,
    /// From the first character of the name through the closing `}`.
    pub column: Column,
}

/// ## Formula library
///
/// A text file holding any number of formula entries. Text outside the
/// entries is ignored; a `;` comments out the rest of its line, inside an
/// entry or not.

#[derive(Debug, Clone)]
pub struct Library<'a> {
    source: &'a str,
    entries: Vec<Entry>,
}

impl<'a> Library<'a> {
    pub fn parse(source: &'a str) -> Library<'a> {
        let bytes = source.as_bytes();
        let mut entries = vec![];
        let mut pos = 0;
        let skip_comment = |mut pos: usize| {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            pos
        };
        while pos < bytes.len() {
            let ch = bytes[pos];
            if ch.is_ascii_whitespace() || ch == b'}' {
                pos += 1;
                continue;
            }
            if ch == b';' {
                pos = skip_comment(pos);
                continue;
            }
            let start = pos;
            while pos < bytes.len() && !b"({ \t\r\n".contains(&bytes[pos]) {
                pos += 1;
            }
            let name = source[start..pos].to_string();
            while pos < bytes.len() && bytes[pos] != b'{' && bytes[pos] != b'\n' {
                pos += 1;
            }
            if pos < bytes.len() && bytes[pos] == b'{' {
                while pos < bytes.len() && bytes[pos] != b'}' {
                    if bytes[pos] == b';' {
                        pos = skip_comment(pos);
                    } else {
                        pos += 1;
                    }
                }
                pos = (pos + 1).min(bytes.len());
            }
            entries.push(Entry {
                name,
                column: start..pos,
            });
        }
        Library { source, entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Finds an entry by name, ignoring case. The first match wins.
    pub fn find(&self, name: &str) -> Result<&Entry, Error> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| error!(FormulaNotFound))
    }

    /// Finds and normalizes a formula. Error offsets refer to the whole
    /// library text.
    pub fn formula(&self, name: &str, limits: &Limits) -> Result<Formula, ErrorList> {
        let entry = self.find(name)?;
        let text = &self.source[entry.column.start..];
        Formula::from_entry(text, entry.column.start, limits)
    }
}
