//! Line-oriented marker files. A line `# alias alias ...` opens a section,
//! every following line up to the next marker belongs to it.
//!
//! In a library the lines of a section are definitions, `NAME definition`.
//! In a help file they are the text of a topic.

/// The library bundled with the binary.
pub const PRELUDE: &str = include_str!("../data/libraries.txt");
/// The help topics bundled with the binary.
pub const HELP: &str = include_str!("../data/help.txt");

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Section<'a> {
    pub aliases: Vec<&'a str>,
    pub lines: Vec<&'a str>,
}

impl<'a> Section<'a> {
    /// The first alias.
    pub fn title(&self) -> &'a str {
        self.aliases.first().copied().unwrap_or_default()
    }

    /// `NAME definition` pairs. Blank lines and lines with a name only are skipped.
    pub fn definitions(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.lines.iter().copied().filter_map(|line| {
            let (name, definition) = line.trim().split_once(char::is_whitespace)?;
            let definition = definition.trim();
            (!definition.is_empty()).then_some((name, definition))
        })
    }

    pub fn text(&self) -> String {
        self.lines.iter().fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        })
    }
}

fn marker(line: &str) -> Option<Vec<&str>> {
    let rest = line.strip_prefix('#')?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.split_whitespace().collect())
}

/// Splits `source` into its sections. Lines before the first marker are dropped.
pub fn sections(source: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section> = vec![];
    for line in source.lines() {
        if let Some(aliases) = marker(line) {
            sections.push(Section {
                aliases,
                lines: vec![],
            });
        } else if let Some(section) = sections.last_mut() {
            section.lines.push(line);
        }
    }
    sections
}

/// The text of the first section aliased `name`, falling back to `default`.
pub fn topic(source: &str, name: &str) -> Option<String> {
    let sections = sections(source);
    let find = |name: &str| {
        sections
            .iter()
            .find(|section| section.aliases.contains(&name))
            .map(Section::text)
    };
    find(name).or_else(|| find("default"))
}
