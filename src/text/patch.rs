//! Text patch primitives
//!
//! Pure string-to-string operations with a success flag. "Pattern not
//! found" is a normal `false` outcome for pipeline gating logic, never an
//! error; only a malformed pattern fails.

use regex::Regex;

use crate::error::Result;

/// Replace the first match of `pattern` in `text` with `replacement`.
///
/// The replacement may reference capture groups (`$1`, `$name`) the way
/// `regex::Regex::replace` expands them. Returns whether the pattern
/// matched (and thus the text was rewritten) along with the new text; a
/// miss returns the input unchanged.
pub fn try_replace(text: &str, pattern: &str, replacement: &str) -> Result<(bool, String)> {
    let regex = Regex::new(pattern)?;
    if !regex.is_match(text) {
        return Ok((false, text.to_string()));
    }
    Ok((true, regex.replace(text, replacement).into_owned()))
}

/// Insert `content` immediately after each match of `anchor` in `text`.
///
/// The anchor's span is used only to locate the insertion offset; matched
/// text is never altered. By default only the first anchor is used;
/// `all_anchors` opts into inserting at every one. Returns whether any
/// anchor was found along with the new text.
pub fn try_insert(text: &str, anchor: &str, content: &str, all_anchors: bool) -> Result<(bool, String)> {
    let regex = Regex::new(anchor)?;
    let mut offsets: Vec<usize> = regex.find_iter(text).map(|found| found.end()).collect();
    if offsets.is_empty() {
        return Ok((false, text.to_string()));
    }
    if !all_anchors {
        offsets.truncate(1);
    }

    let mut output = String::with_capacity(text.len() + content.len() * offsets.len());
    let mut cursor = 0;
    for offset in offsets {
        output.push_str(&text[cursor..offset]);
        output.push_str(content);
        cursor = offset;
    }
    output.push_str(&text[cursor..]);
    Ok((true, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_replace_first_match_only() {
        let (matched, text) = try_replace("a a a", "a", "b").unwrap();
        assert!(matched);
        assert_eq!(text, "b a a");
    }

    #[test]
    fn test_try_replace_miss_returns_input_unchanged() {
        let (matched, text) = try_replace("class Foo { }", "// MARKER", "// MARKER").unwrap();
        assert!(!matched);
        assert_eq!(text, "class Foo { }");
    }

    #[test]
    fn test_try_replace_expands_capture_groups() {
        let (matched, text) = try_replace(
            "setStatusBarHidden(false)",
            r"setStatusBarHidden\((true|false)\)",
            "setStatusBarHidden(true) /* was $1 */",
        )
        .unwrap();
        assert!(matched);
        assert_eq!(text, "setStatusBarHidden(true) /* was false */");
    }

    #[test]
    fn test_try_insert_after_first_anchor() {
        let (anchored, text) = try_insert("class Foo {\n}\n", r"class Foo \{\n", "  // MARKER\n", false).unwrap();
        assert!(anchored);
        assert_eq!(text, "class Foo {\n  // MARKER\n}\n");
    }

    #[test]
    fn test_try_insert_does_not_alter_anchor_text() {
        let input = "import A\nimport B\n";
        let (anchored, text) = try_insert(input, r"import A\n", "import New\n", false).unwrap();
        assert!(anchored);
        assert!(text.contains("import A\nimport New\nimport B\n"));
    }

    #[test]
    fn test_try_insert_all_anchors() {
        let (anchored, text) = try_insert("fn a() {}\nfn b() {}\n", r"\{", "/*x*/", true).unwrap();
        assert!(anchored);
        assert_eq!(text, "fn a() {/*x*/}\nfn b() {/*x*/}\n");
    }

    #[test]
    fn test_try_insert_missing_anchor() {
        let (anchored, text) = try_insert("fn a() {}", "class", "x", false).unwrap();
        assert!(!anchored);
        assert_eq!(text, "fn a() {}");
    }

    #[test]
    fn test_malformed_pattern_is_an_error() {
        assert!(try_replace("text", "(unclosed", "x").is_err());
        assert!(try_insert("text", "[bad", "x", false).is_err());
    }
}
