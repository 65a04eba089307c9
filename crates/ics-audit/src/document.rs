//! Line-oriented view of raw ICS text shared by every check.
//!
//! The text is split once into physical lines (for the encoding and folding
//! checks) and unfolded logical lines (for everything else). Each logical line
//! remembers the 1-based number of the physical line it starts on, so
//! diagnostics can point at the source.

use ics_codec::text::physical_lines;

/// One unfolded content line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based physical line number where this logical line starts.
    pub number: usize,
    /// Uppercased property name, e.g. `DTSTART`. Empty when the line has no
    /// value separator.
    pub name: String,
    /// `(KEY, value)` pairs with uppercased keys and quotes stripped.
    pub parameters: Vec<(String, String)>,
    /// Everything after the first unquoted `:`.
    pub value: String,
}

impl Line {
    fn parse(number: usize, raw: &str) -> Self {
        let Some(colon) = value_separator(raw) else {
            return Self {
                number,
                name: String::new(),
                parameters: Vec::new(),
                value: raw.to_string(),
            };
        };

        let mut segments = raw[..colon].split(';');
        let name = segments.next().unwrap_or_default().trim().to_ascii_uppercase();
        let parameters = segments
            .filter_map(|segment| segment.split_once('='))
            .map(|(k, v)| (k.trim().to_ascii_uppercase(), v.trim().trim_matches('"').to_string()))
            .collect();

        Self {
            number,
            name,
            parameters,
            value: raw[colon + 1..].to_string(),
        }
    }

    /// Value of parameter `key`, if present.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `BEGIN` / `END` component name, uppercased.
    pub fn component(&self, keyword: &str) -> Option<String> {
        (self.name == keyword).then(|| self.value.trim().to_ascii_uppercase())
    }
}

fn value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(i),
            _ => {}
        }
    }
    None
}

/// A component block such as one VALARM: its opening line number and the
/// property lines directly inside it.
#[derive(Debug)]
pub struct Block<'d> {
    pub begin: usize,
    pub properties: Vec<&'d Line>,
}

impl Block<'_> {
    pub fn property(&self, name: &str) -> Option<&Line> {
        self.properties.iter().copied().find(|line| line.name == name)
    }
}

/// Pre-split ICS text.
#[derive(Debug)]
pub struct Document<'a> {
    pub text: &'a str,
    pub physical: Vec<&'a str>,
    pub lines: Vec<Line>,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        let physical = physical_lines(text);

        let mut logical: Vec<(usize, String)> = Vec::new();
        for (index, line) in physical.iter().enumerate() {
            let is_continuation = line.starts_with(' ') || line.starts_with('\t');
            match logical.last_mut() {
                Some((_, previous)) if is_continuation => previous.push_str(&line[1..]),
                _ => logical.push((index + 1, line.to_string())),
            }
        }

        let lines = logical
            .iter()
            .filter(|(_, raw)| !raw.trim().is_empty())
            .map(|(number, raw)| Line::parse(*number, raw))
            .collect();

        Self {
            text,
            physical,
            lines,
        }
    }

    /// Whether the raw text contains `marker` anywhere.
    pub fn contains(&self, marker: &str) -> bool {
        self.text.contains(marker)
    }

    /// All lines whose property name is `name`.
    pub fn properties<'d>(&'d self, name: &'d str) -> impl Iterator<Item = &'d Line> + 'd {
        self.lines.iter().filter(move |line| line.name == name)
    }

    /// Whether a `BEGIN:<component>` line exists.
    pub fn has_component(&self, component: &str) -> bool {
        self.lines
            .iter()
            .any(|line| line.component("BEGIN").as_deref() == Some(component))
    }

    /// Every `component` block with the property lines directly inside it.
    /// Nested sub-components are skipped; an unterminated block runs to the
    /// end of the document.
    pub fn blocks(&self, component: &str) -> Vec<Block<'_>> {
        let mut blocks = Vec::new();
        let mut current: Option<Block<'_>> = None;
        let mut depth = 0usize;

        for line in &self.lines {
            if let Some(name) = line.component("BEGIN") {
                if current.is_some() {
                    depth += 1;
                } else if name == component {
                    current = Some(Block {
                        begin: line.number,
                        properties: Vec::new(),
                    });
                }
                continue;
            }
            if let Some(name) = line.component("END") {
                if depth > 0 {
                    depth -= 1;
                } else if name == component {
                    blocks.extend(current.take());
                }
                continue;
            }
            if depth == 0 {
                if let Some(block) = current.as_mut() {
                    block.properties.push(line);
                }
            }
        }

        blocks.extend(current);
        blocks
    }
}
