//! Text conventions of changelist output
//!
//! Changelist listings and forms are treated as text with fixed markers:
//! blank separator lines, a literal `Files:` header and tab-indented
//! continuation lines.

/// Header introducing the file section of a `change -o` form.
pub const FILES_HEADER: &str = "Files:";

/// Marker introducing the file section of `describe` output.
pub const AFFECTED_FILES_MARKER: &str = "Affected files ...";

/// Extract the filespecs listed after the last `Files:` header of a change form.
///
/// Lines are trimmed and blank lines dropped. A form without the header
/// lists no files.
pub fn default_change_filespecs<S: AsRef<str>>(form: &[S]) -> Vec<String> {
    let Some(header) = form.iter().rposition(|l| l.as_ref() == FILES_HEADER) else {
        return Vec::new();
    };
    form[header + 1..]
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Depot path of a filespec: everything before the first `#`, trimmed.
pub fn depot_path(filespec: &str) -> &str {
    filespec.split('#').next().unwrap_or_default().trim()
}

/// Changelist number of a `changes` line (`Change 105 on ... by ...`).
pub fn change_number(line: &str) -> Option<u64> {
    line.split_whitespace().nth(1)?.parse().ok()
}

/// One changelist from a long-form listing: header plus description lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBlock {
    pub header: String,
    /// Continuation lines with their leading tab removed.
    pub description: Vec<String>,
}

impl ChangeBlock {
    pub fn number(&self) -> Option<u64> {
        change_number(&self.header)
    }

    /// Header followed by description lines, each indented by `indent`.
    pub fn render(&self, indent: &str) -> String {
        let mut out = self.header.clone();
        for line in &self.description {
            out.push('\n');
            out.push_str(indent);
            out.push_str(line);
        }
        out
    }
}

/// Group listing lines into changelist blocks.
///
/// A non-indented line opens a block, tab-indented lines extend the current
/// one. Blank lines and the `describe` file marker are skipped; continuation
/// lines before any header have nowhere to go and are dropped.
pub fn group_change_blocks<S: AsRef<str>>(lines: &[S]) -> Vec<ChangeBlock> {
    let mut blocks: Vec<ChangeBlock> = Vec::new();
    for line in lines.iter().map(|l| l.as_ref()) {
        if line.trim().is_empty() || line.starts_with(AFFECTED_FILES_MARKER) {
            continue;
        }
        match line.strip_prefix('\t') {
            Some(continuation) => {
                if let Some(block) = blocks.last_mut() {
                    block.description.push(continuation.to_string());
                }
            }
            None => blocks.push(ChangeBlock {
                header: line.to_string(),
                description: Vec::new(),
            }),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_form_with_files_when_extract_then_returns_trimmed_specs() {
        let form = [
            "Change:\tnew",
            "Client:\tws",
            "Files:",
            "\t//depot/a/b#3 - edit",
            "",
            "\t//depot/c#1 - add",
        ];
        assert_eq!(
            default_change_filespecs(&form),
            vec!["//depot/a/b#3 - edit", "//depot/c#1 - add"]
        );
    }

    #[test]
    fn given_form_without_files_when_extract_then_empty() {
        let form = ["Change:\tnew", "Description:", "\t<enter description here>"];
        assert!(default_change_filespecs(&form).is_empty());
    }

    #[test]
    fn given_filespec_when_depot_path_then_truncates_at_hash() {
        assert_eq!(depot_path("//depot/a/b#3 - edit"), "//depot/a/b");
        assert_eq!(depot_path("//depot/c\t# add"), "//depot/c");
        assert_eq!(depot_path("//depot/plain"), "//depot/plain");
    }

    #[test]
    fn given_changes_line_when_change_number_then_parses_second_token() {
        assert_eq!(
            change_number("Change 105 on 2024/01/02 by bob@ws *pending* 'fix'"),
            Some(105)
        );
        assert_eq!(change_number("Change default"), None);
        assert_eq!(change_number(""), None);
    }

    #[test]
    fn given_long_listing_when_group_then_attaches_descriptions() {
        let lines = [
            "Change 110 on 2024/01/03 by bob@ws *pending*",
            "",
            "\tsecond line one",
            "\tsecond line two",
            "",
            "Change 105 on 2024/01/02 by bob@ws *pending*",
            "",
            "\tfirst",
        ];
        let blocks = group_change_blocks(&lines);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].number(), Some(110));
        assert_eq!(blocks[0].description, vec!["second line one", "second line two"]);
        assert_eq!(
            blocks[1].render("    "),
            "Change 105 on 2024/01/02 by bob@ws *pending*\n    first"
        );
    }

    #[test]
    fn given_orphan_continuation_when_group_then_dropped() {
        let blocks = group_change_blocks(&["\torphan", "Affected files ...", "Change 1 x"]);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].description.is_empty());
    }
}
