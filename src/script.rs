//! Embedded shell script canonicalization.
//!
//! A step's `script` field is reparsed with the shell grammar and replaced
//! by its canonical rendering. Failure to parse is not an error: `script`
//! may legitimately hold another interpreter's source, so the caller gets a
//! "no change" signal (`None`) and keeps the original text.
//!
//! Two conservative guards protect information the shell grammar would
//! destroy:
//!
//! - a leading `#!` line is split off and re-attached verbatim, so
//!   interpreter selection survives canonicalization;
//! - a body containing a shell comment is left unchanged, because the
//!   grammar does not retain comments and re-rendering would drop them.

use tracing::trace;
use yash_syntax::syntax::List;

/// Returns the canonical rendering of `script`, or `None` when the text is
/// left as-is (not valid shell, empty, or holds comments that rendering
/// would lose). The rendering always ends with a single newline.
pub fn canonicalize(script: &str) -> Option<String> {
    if script.trim().is_empty() {
        return None;
    }

    let (shebang, body) = split_shebang(script);
    if has_comment(body) {
        trace!("script body contains comments, leaving as-is");
        return None;
    }

    let list: List = match body.parse() {
        Ok(list) => list,
        Err(_) => {
            trace!("script is not valid shell, leaving as-is");
            return None;
        }
    };

    let rendered = list.to_string();
    if rendered.trim().is_empty() {
        return None;
    }

    let mut out = String::new();
    if let Some(line) = shebang {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(rendered.trim_end());
    out.push('\n');
    Some(out)
}

/// Splits a leading `#!` interpreter line off the script body.
fn split_shebang(script: &str) -> (Option<&str>, &str) {
    if !script.starts_with("#!") {
        return (None, script);
    }
    match script.split_once('\n') {
        Some((line, rest)) => (Some(line), rest),
        None => (Some(script), ""),
    }
}

/// Detects shell comments: an unquoted `#` at the start of a word, meaning
/// one preceded by whitespace or an operator character that ends the previous
/// token. A closing `` ` `` does not end a word, so `#` after it stays part
/// of the word. Quote-aware but deliberately coarse; a false positive only
/// means the script keeps its original formatting.
fn has_comment(body: &str) -> bool {
    let mut in_single = false;
    let mut in_double = false;
    let mut escaped = false;
    let mut prev = '\n';
    for ch in body.chars() {
        if escaped {
            escaped = false;
            prev = ch;
            continue;
        }
        match ch {
            '\\' if !in_single => escaped = true,
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '#' if !in_single
                && !in_double
                && matches!(
                    prev,
                    ' ' | '\t' | '\n' | ';' | '&' | '|' | '(' | ')' | '<' | '>'
                ) =>
            {
                return true;
            }
            _ => {}
        }
        prev = ch;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_whitespace() {
        assert_eq!(canonicalize("echo   hi"), Some("echo hi\n".to_string()));
    }

    #[test]
    fn invalid_shell_is_left_alone() {
        assert_eq!(canonicalize("echo 'unterminated"), None);
    }

    #[test]
    fn empty_script_is_left_alone() {
        assert_eq!(canonicalize(""), None);
        assert_eq!(canonicalize("   \n"), None);
    }

    #[test]
    fn comments_are_preserved_by_skipping() {
        assert_eq!(canonicalize("echo hi # trailing"), None);
        assert_eq!(canonicalize("# leading comment\necho hi"), None);
    }

    #[test]
    fn comment_after_operator_is_detected() {
        assert_eq!(canonicalize("(echo hi)# keep me"), None);
        assert_eq!(canonicalize("echo hi;# keep me"), None);
        assert_eq!(canonicalize("echo hi >#out"), None);
    }

    #[test]
    fn hash_after_backtick_is_part_of_the_word() {
        assert!(canonicalize("echo `echo a`#suffix").is_some());
    }

    #[test]
    fn hash_inside_quotes_or_words_is_not_a_comment() {
        assert!(canonicalize("echo '#'").is_some());
        assert!(canonicalize("echo a#b").is_some());
        assert!(canonicalize("echo ${#var}").is_some());
    }

    #[test]
    fn shebang_line_survives() {
        let out = canonicalize("#!/usr/bin/env bash\necho   hi\n").unwrap();
        assert_eq!(out, "#!/usr/bin/env bash\necho hi\n");
    }

    #[test]
    fn canonical_form_is_stable() {
        let once = canonicalize("echo   a\necho  b\n").unwrap();
        let twice = canonicalize(&once).unwrap();
        assert_eq!(once, twice);
    }
}
