//! The static table of driver extensions the generated code can query.
use itertools::Itertools;
use log::warn;

/// One extension and its stable index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    /// Name without the driver prefix, e.g. `ARB_texture_compression`.
    pub raw_name: String,
    /// Position in the extension list. Used both for the generated index
    /// macros and for the runtime presence set.
    pub index: usize,
}

/// Extensions in input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtensionTable {
    entries: Vec<ExtensionEntry>,
}

impl ExtensionTable {
    /// Build a table from one extension name per line.
    ///
    /// Blank lines are ignored. Duplicate names keep separate indices.
    pub fn parse(input: &str) -> Self {
        Self::from_names(input.lines().map(str::trim).filter(|l| !l.is_empty()))
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ExtensionEntry {
                raw_name: name.into(),
                index,
            })
            .collect_vec();

        for name in entries.iter().map(|e| e.raw_name.as_str()).duplicates() {
            warn!("Extension {name} is listed more than once; every occurrence gets its own index");
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[ExtensionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The name stored at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.raw_name.as_str())
    }

    /// Index of the first extension called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.raw_name == name)
            .map(|e| e.index)
    }

    /// Length of the longest name, for aligning the index macros.
    pub fn max_width(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.raw_name.len())
            .max()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_line_position() {
        let table = ExtensionTable::parse("A\nB\nC\n");
        assert_eq!(table.index_of("B"), Some(1));
        assert_eq!(table.name(2), Some("C"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn index_does_not_depend_on_table_size() {
        let small = ExtensionTable::from_names(["A", "B"]);
        let large = ExtensionTable::from_names(["A", "B", "C", "D", "E"]);
        assert_eq!(small.index_of("B"), large.index_of("B"));
    }

    #[test]
    fn duplicates_keep_distinct_indices() {
        let table = ExtensionTable::parse("EXT_a\nEXT_b\nEXT_a\n");
        let indices: Vec<_> = table
            .entries()
            .iter()
            .filter(|e| e.raw_name == "EXT_a")
            .map(|e| e.index)
            .collect();
        assert_eq!(indices, [0, 2]);
        assert_eq!(table.index_of("EXT_a"), Some(0));
    }

    #[test]
    fn names_are_trimmed_and_blank_lines_ignored() {
        let table = ExtensionTable::parse("  ARB_debug_output \r\n\r\nEXT_texture_filter_anisotropic\r\n");
        assert_eq!(table.name(0), Some("ARB_debug_output"));
        assert_eq!(table.name(1), Some("EXT_texture_filter_anisotropic"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn max_width() {
        assert_eq!(ExtensionTable::default().max_width(), 0);
        assert_eq!(ExtensionTable::from_names(["ab", "abcd", "a"]).max_width(), 4);
    }
}
