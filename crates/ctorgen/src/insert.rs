use crate::prelude::*;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// 1-based position reported after an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Caret {
    pub line: usize,
    pub column: usize,
}

/// New file contents with a generated block placed after a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    /// Position of the last character of the inserted block.
    pub caret: Caret,
}

/// Prefix every non-empty line of `block` with `indent`.
pub fn indent_block(block: &str, indent: &str) -> String {
    if indent.is_empty() {
        return block.to_string();
    }

    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Offset to insert after a declaration ending at `offset`.
///
/// Moves to the end of the line when only whitespace or a `//` comment
/// follows the declaration on it, so the comment stays with the declaration.
pub fn insertion_point(source: &str, offset: usize) -> usize {
    let line_end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    let rest = source[offset..line_end].trim();

    if rest.is_empty() || rest.starts_with("//") {
        source[..line_end].trim_end().len()
    } else {
        offset
    }
}

/// Place `block` after byte `offset` of `source`, separated by a blank line.
pub fn splice_after(source: &str, offset: usize, block: &str) -> Insertion {
    let mut text = String::with_capacity(source.len() + block.len() + 2);
    text.push_str(&source[..offset]);
    text.push_str("\n\n");
    text.push_str(block);
    let block_end = text.len();
    text.push_str(&source[offset..]);

    let last_char = text[..block_end]
        .char_indices()
        .next_back()
        .map_or(0, |(index, _)| index);

    Insertion {
        caret: caret_at(&text, last_char),
        text,
    }
}

/// Line and column of byte `offset` in `text`.
pub fn caret_at(text: &str, offset: usize) -> Caret {
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);

    Caret {
        line: before.matches('\n').count() + 1,
        column: before[line_start..].chars().count() + 1,
    }
}

/// Replace the contents of `path` in one step.
///
/// The new contents are written to a temporary file next to `path` and then
/// renamed over it, so readers see either the old file or the new one.
pub fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
    temp.write_all(contents.as_bytes())
        .context("Failed to write generated source")?;
    temp.as_file()
        .sync_all()
        .context("Failed to flush generated source")?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .context("Failed to copy file permissions")?;
    }

    temp.persist(path)
        .map_err(|e| eyre!("Failed to replace {}: {}", path.display(), e.error))?;

    Ok(())
}

/// Write `insertion` to `path` if the file still holds `original`.
pub fn apply(path: &Path, original: &str, insertion: &Insertion) -> Result<()> {
    let current = fs::read_to_string(path)
        .with_context(|| format!("Failed to re-read {}", path.display()))?;
    if current != original {
        return Err(Error::SourceChanged(path.display().to_string()).into());
    }

    write_atomically(path, &insertion.text)?;
    log::info!(
        "wrote {} bytes to {}",
        insertion.text.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const IMPL: &str = "impl S {\n    pub fn new() -> Self {\n        S {}\n    }\n}";

    // ============================================================================
    // splice_after tests
    // ============================================================================

    #[test]
    fn test_splice_after_declaration() {
        let source = "struct S{}\n\nfn main() {}\n";
        let insertion = splice_after(source, "struct S{}".len(), IMPL);

        assert_eq!(
            insertion.text,
            format!("struct S{{}}\n\n{IMPL}\n\nfn main() {{}}\n")
        );
    }

    #[test]
    fn test_splice_at_end_of_file() {
        let source = "struct Color(i32, i32, i32);";
        let insertion = splice_after(source, source.len(), IMPL);

        assert_eq!(insertion.text, format!("{source}\n\n{IMPL}"));
    }

    #[test]
    fn test_splice_caret_on_closing_brace() {
        let source = "struct S{}\n";
        let insertion = splice_after(source, "struct S{}".len(), IMPL);

        // struct, blank line, then five lines of impl
        assert_eq!(insertion.caret, Caret { line: 7, column: 1 });
    }

    #[test]
    fn test_caret_counts_characters() {
        let text = "// é\nlet x = 1;";
        assert_eq!(caret_at(text, text.len() - 1), Caret { line: 2, column: 10 });
        assert_eq!(caret_at(text, 0), Caret { line: 1, column: 1 });
    }

    #[test]
    fn test_insertion_point_skips_trailing_comment() {
        let source = "struct S; // trailing\nfn main() {}\n";
        let offset = insertion_point(source, "struct S;".len());
        assert_eq!(offset, "struct S; // trailing".len());

        let insertion = splice_after(source, offset, IMPL);
        assert_eq!(
            insertion.text,
            format!("struct S; // trailing\n\n{IMPL}\nfn main() {{}}\n")
        );
    }

    #[test]
    fn test_insertion_point_keeps_code_on_same_line() {
        let source = "mod m { struct S; }\n";
        assert_eq!(insertion_point(source, "mod m { struct S;".len()), 17);
        assert_eq!(insertion_point("struct S;", 9), 9);
        assert_eq!(insertion_point("struct S;   \n", 9), 9);
    }

    // ============================================================================
    // indent_block tests
    // ============================================================================

    #[test]
    fn test_indent_block() {
        let block = "impl S {\n\n}";
        assert_eq!(indent_block(block, "    "), "    impl S {\n\n    }");
        assert_eq!(indent_block(block, ""), block);
    }

    // ============================================================================
    // File tests
    // ============================================================================

    #[test]
    fn test_write_atomically_replaces_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lib.rs");
        fs::write(&path, "struct S;").unwrap();

        write_atomically(&path, "struct S;\n\nimpl S {}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "struct S;\n\nimpl S {}");
        let leftovers = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_apply_refuses_changed_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lib.rs");
        fs::write(&path, "struct S;\nstruct T;").unwrap();

        let insertion = splice_after("struct S;", 9, IMPL);
        let err = apply(&path, "struct S;", &insertion).unwrap_err();

        assert!(err.to_string().contains("changed"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "struct S;\nstruct T;");
    }

    #[test]
    fn test_apply_writes_insertion() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("lib.rs");
        fs::write(&path, "struct S;").unwrap();

        let insertion = splice_after("struct S;", 9, IMPL);
        apply(&path, "struct S;", &insertion).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), insertion.text);
    }
}
