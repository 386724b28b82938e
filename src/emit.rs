//! Document encoding: a canonicalized [`Node`] tree is serialized back to
//! YAML text with fixed output settings: explicit `---` document start, LF
//! line breaks, 2-space indentation, and plain scalars wrapped at column 72.
//!
//! The emitter honors each scalar's style attribute as a hint, never as a
//! command: after quote-stripping every value asks for the plain style, and
//! the emitter falls back to double quotes or a literal block only where
//! plain serialization would be invalid or would change the value's resolved
//! type (a formerly quoted `"true"` must not come back as a boolean).

use saphyr_parser::ScalarStyle;

use crate::error::{Error, Result};
use crate::node::{Node, Scalar};

/// Column at which plain scalars are wrapped onto continuation lines.
pub const WRAP_WIDTH: usize = 72;

const INDENT: usize = 2;

/// Encodes every document in `docs`, each preceded by a `---` marker.
pub fn emit_documents(docs: &[Node], out: &mut String) -> Result<()> {
    for doc in docs {
        emit_document(doc, out)?;
    }
    Ok(())
}

/// Encodes a single document.
///
/// # Errors
///
/// Returns [`Error::Encode`] for trees the canonical form cannot express,
/// such as non-scalar mapping keys.
pub fn emit_document(doc: &Node, out: &mut String) -> Result<()> {
    let root = match doc {
        Node::Document(root) => root.as_ref(),
        other => other,
    };

    out.push_str("---");
    match root {
        Node::Mapping(pairs) if pairs.is_empty() => out.push_str(" {}\n"),
        Node::Sequence(items) if items.is_empty() => out.push_str(" []\n"),
        Node::Mapping(pairs) => {
            out.push('\n');
            emit_mapping(pairs, out, 0, false)?;
        }
        Node::Sequence(items) => {
            out.push('\n');
            emit_sequence(items, out, 0, false)?;
        }
        Node::Scalar(s) => emit_scalar_value(s, out, 0)?,
        Node::Document(_) => return Err(Error::encode("nested document node")),
    }
    Ok(())
}

fn emit_mapping(
    pairs: &[(Node, Node)],
    out: &mut String,
    indent: usize,
    mut inline_first: bool,
) -> Result<()> {
    for (key, value) in pairs {
        if inline_first {
            inline_first = false;
        } else {
            push_indent(out, indent);
        }
        emit_key(key, out)?;
        out.push(':');
        emit_value(value, out, indent)?;
    }
    Ok(())
}

fn emit_value(value: &Node, out: &mut String, indent: usize) -> Result<()> {
    match value {
        Node::Scalar(s) => emit_scalar_value(s, out, indent),
        Node::Mapping(pairs) if pairs.is_empty() => {
            out.push_str(" {}\n");
            Ok(())
        }
        Node::Sequence(items) if items.is_empty() => {
            out.push_str(" []\n");
            Ok(())
        }
        Node::Mapping(pairs) => {
            out.push('\n');
            emit_mapping(pairs, out, indent + INDENT, false)
        }
        Node::Sequence(items) => {
            out.push('\n');
            emit_sequence(items, out, indent + INDENT, false)
        }
        Node::Document(_) => Err(Error::encode("nested document node")),
    }
}

fn emit_sequence(
    items: &[Node],
    out: &mut String,
    indent: usize,
    mut inline_first: bool,
) -> Result<()> {
    for item in items {
        if inline_first {
            inline_first = false;
        } else {
            push_indent(out, indent);
        }
        out.push('-');
        match item {
            Node::Scalar(s) => emit_scalar_value(s, out, indent)?,
            Node::Mapping(pairs) if pairs.is_empty() => out.push_str(" {}\n"),
            Node::Sequence(nested) if nested.is_empty() => out.push_str(" []\n"),
            Node::Mapping(pairs) => {
                out.push(' ');
                emit_mapping(pairs, out, indent + INDENT, true)?;
            }
            Node::Sequence(nested) => {
                out.push(' ');
                emit_sequence(nested, out, indent + INDENT, true)?;
            }
            Node::Document(_) => return Err(Error::encode("nested document node")),
        }
    }
    Ok(())
}

fn emit_key(key: &Node, out: &mut String) -> Result<()> {
    let s = key
        .as_scalar()
        .ok_or_else(|| Error::encode(format!("unsupported {} key in mapping", key.kind())))?;
    if s.value.contains('\n') {
        return Err(Error::encode("multi-line mapping keys are not supported"));
    }
    match s.style {
        ScalarStyle::SingleQuoted if single_quotable(&s.value) => {
            out.push('\'');
            out.push_str(&s.value.replace('\'', "''"));
            out.push('\'');
        }
        ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => {
            emit_double_quoted(&s.value, out);
        }
        _ => {
            if plain_safe(&s.value) && !(s.known_string && resolves_non_string(&s.value)) {
                out.push_str(&s.value);
            } else {
                emit_double_quoted(&s.value, out);
            }
        }
    }
    Ok(())
}

/// Writes a scalar value in position after `key:` or `-`, including the
/// separating space and the trailing newline (or a literal block).
fn emit_scalar_value(s: &Scalar, out: &mut String, indent: usize) -> Result<()> {
    // An explicit null keeps its empty form: `key:` followed by nothing.
    if s.value.is_empty() && !s.known_string {
        out.push('\n');
        return Ok(());
    }

    if s.value.contains('\n') {
        if literal_block_safe(&s.value) {
            emit_literal_block(&s.value, out, indent + INDENT);
        } else {
            out.push(' ');
            emit_double_quoted(&s.value, out);
            out.push('\n');
        }
        return Ok(());
    }

    match s.style {
        ScalarStyle::SingleQuoted if single_quotable(&s.value) => {
            out.push_str(" '");
            out.push_str(&s.value.replace('\'', "''"));
            out.push_str("'\n");
        }
        ScalarStyle::SingleQuoted | ScalarStyle::DoubleQuoted => {
            out.push(' ');
            emit_double_quoted(&s.value, out);
            out.push('\n');
        }
        _ => {
            if plain_safe(&s.value) && !(s.known_string && resolves_non_string(&s.value)) {
                emit_plain_wrapped(&s.value, out, indent);
            } else {
                out.push(' ');
                emit_double_quoted(&s.value, out);
                out.push('\n');
            }
        }
    }
    Ok(())
}

/// Writes a plain scalar, folding it across lines when the current line
/// would run past [`WRAP_WIDTH`]. Folding only happens at single spaces with
/// non-space neighbors, so the value reparses byte-identically.
fn emit_plain_wrapped(value: &str, out: &mut String, indent: usize) {
    let mut col = current_column(out);
    if col + 1 + value.len() <= WRAP_WIDTH || !value.contains(' ') {
        out.push(' ');
        out.push_str(value);
        out.push('\n');
        return;
    }

    let cont_indent = indent + INDENT;
    let mut first = true;
    for chunk in foldable_chunks(value) {
        let fits = col + 1 + chunk.len() <= WRAP_WIDTH;
        if first || fits || !fold_safe_start(chunk) {
            out.push(' ');
            out.push_str(chunk);
            col += 1 + chunk.len();
            first = false;
        } else {
            out.push('\n');
            push_indent(out, cont_indent);
            out.push_str(chunk);
            col = cont_indent + chunk.len();
        }
    }
    out.push('\n');
}

/// Splits at spaces that are legal plain-scalar fold points: single spaces
/// with non-space characters on both sides. Runs of multiple spaces stay
/// inside one chunk because folding would collapse them.
fn foldable_chunks(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;
    for i in 1..bytes.len().saturating_sub(1) {
        if bytes[i] == b' ' && bytes[i - 1] != b' ' && bytes[i + 1] != b' ' && i > start {
            chunks.push(&s[start..i]);
            start = i + 1;
        }
    }
    chunks.push(&s[start..]);
    chunks
}

/// A continuation line of a plain scalar must not begin with a character
/// that could be read as an indicator at that position.
fn fold_safe_start(chunk: &str) -> bool {
    !chunk.starts_with([
        '-', '?', ':', '#', '&', '*', '!', '|', '>', '%', '@', '`', '"', '\'', '[', ']', '{',
        '}', ',',
    ])
}

fn emit_double_quoted(value: &str, out: &mut String) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn emit_literal_block(value: &str, out: &mut String, indent: usize) {
    let trailing = value.len() - value.trim_end_matches('\n').len();
    let header = match trailing {
        0 => " |-",
        1 => " |",
        _ => " |+",
    };
    out.push_str(header);
    out.push('\n');

    let body = value.strip_suffix('\n').unwrap_or(value);
    for line in body.split('\n') {
        if !line.is_empty() {
            push_indent(out, indent);
            out.push_str(line);
        }
        out.push('\n');
    }
}

/// A literal block reproduces the value exactly only when the first line is
/// non-empty and not indented (otherwise an indentation indicator would be
/// needed) and the text holds no control characters besides the line breaks.
fn literal_block_safe(value: &str) -> bool {
    let first = value.split('\n').next().unwrap_or("");
    !first.is_empty()
        && !first.starts_with([' ', '\t'])
        && !value
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\t')
}

fn plain_safe(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    if value.starts_with([' ', '\t']) || value.ends_with([' ', '\t']) {
        return false;
    }
    let first = value.chars().next().unwrap_or(' ');
    if matches!(
        first,
        '!' | '&' | '*' | '?' | '|' | '>' | '%' | '@' | '`' | '"' | '\'' | '#' | ',' | '['
            | ']' | '{' | '}'
    ) {
        return false;
    }
    if matches!(first, '-' | ':') && (value.len() == 1 || value.as_bytes()[1] == b' ') {
        return false;
    }
    if value.contains(": ") || value.ends_with(':') {
        return false;
    }
    if value.contains(" #") {
        return false;
    }
    !value.chars().any(char::is_control)
}

fn single_quotable(value: &str) -> bool {
    !value.chars().any(char::is_control)
}

/// Plain text that the YAML core schema would resolve to null, a boolean, or
/// a number instead of a string.
fn resolves_non_string(value: &str) -> bool {
    matches!(
        value,
        "" | "~"
            | "null"
            | "Null"
            | "NULL"
            | "true"
            | "True"
            | "TRUE"
            | "false"
            | "False"
            | "FALSE"
    ) || is_core_int(value)
        || is_core_float(value)
}

fn is_core_int(value: &str) -> bool {
    let t = value.strip_prefix(['-', '+']).unwrap_or(value);
    if let Some(hex) = t.strip_prefix("0x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(oct) = t.strip_prefix("0o") {
        return !oct.is_empty() && oct.chars().all(|c| ('0'..='7').contains(&c));
    }
    !t.is_empty() && t.chars().all(|c| c.is_ascii_digit())
}

fn is_core_float(value: &str) -> bool {
    let t = value.strip_prefix(['-', '+']).unwrap_or(value);
    if matches!(t, ".inf" | ".Inf" | ".INF" | ".nan" | ".NaN" | ".NAN") {
        return true;
    }
    let (mantissa, exponent) = match t.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (t, None),
    };
    if let Some(e) = exponent {
        let digits = e.strip_prefix(['-', '+']).unwrap_or(e);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
    }
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    if frac_part.is_none() && exponent.is_none() {
        return false; // a pure integer, handled by is_core_int
    }
    let all_digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
        return false;
    }
    !(int_part.is_empty() && frac_part.map_or(true, str::is_empty))
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

fn current_column(out: &str) -> usize {
    match out.rfind('\n') {
        Some(i) => out.len() - i - 1,
        None => out.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, Scalar};

    fn emit(doc: Node) -> String {
        let mut out = String::new();
        emit_document(&doc, &mut out).unwrap();
        out
    }

    fn mapping(pairs: Vec<(&str, Node)>) -> Node {
        Node::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (Node::plain(k), v))
                .collect(),
        )
    }

    #[test]
    fn block_mapping_layout() {
        let doc = mapping(vec![
            ("kind", Node::plain("Task")),
            (
                "metadata",
                mapping(vec![("name", Node::plain("build"))]),
            ),
        ]);
        assert_eq!(emit(doc), "---\nkind: Task\nmetadata:\n  name: build\n");
    }

    #[test]
    fn sequence_of_mappings_inlines_first_entry() {
        let doc = mapping(vec![(
            "steps",
            Node::Sequence(vec![mapping(vec![
                ("name", Node::plain("a")),
                ("image", Node::plain("x")),
            ])]),
        )]);
        assert_eq!(emit(doc), "---\nsteps:\n  - name: a\n    image: x\n");
    }

    #[test]
    fn empty_collections_use_flow_form() {
        let doc = mapping(vec![
            ("labels", Node::Mapping(vec![])),
            ("args", Node::Sequence(vec![])),
        ]);
        assert_eq!(emit(doc), "---\nlabels: {}\nargs: []\n");
    }

    #[test]
    fn known_string_lookalikes_stay_quoted() {
        let doc = mapping(vec![
            ("a", Node::string("true")),
            ("b", Node::string("123")),
            ("c", Node::string("1.5e3")),
            ("d", Node::plain("true")),
        ]);
        assert_eq!(
            emit(doc),
            "---\na: \"true\"\nb: \"123\"\nc: \"1.5e3\"\nd: true\n"
        );
    }

    #[test]
    fn explicit_null_stays_bare() {
        let doc = mapping(vec![
            ("a", Node::plain("")),
            ("b", Node::plain("null")),
        ]);
        assert_eq!(emit(doc), "---\na:\nb: null\n");
    }

    #[test]
    fn multiline_strings_use_literal_blocks() {
        let doc = mapping(vec![("script", Node::string("echo a\necho b\n"))]);
        assert_eq!(emit(doc), "---\nscript: |\n  echo a\n  echo b\n");
    }

    #[test]
    fn multiline_without_trailing_newline_strips_chomping() {
        let doc = mapping(vec![("script", Node::string("echo a\necho b"))]);
        assert_eq!(emit(doc), "---\nscript: |-\n  echo a\n  echo b\n");
    }

    #[test]
    fn unsafe_multiline_falls_back_to_quotes() {
        let doc = mapping(vec![("text", Node::string(" leading\nspace"))]);
        assert_eq!(emit(doc), "---\ntext: \" leading\\nspace\"\n");
    }

    #[test]
    fn long_plain_scalars_wrap_at_width() {
        let long = "a description that is long enough to run past the wrap column of seventy two characters";
        let doc = mapping(vec![("description", Node::plain(long))]);
        let text = emit(doc);
        for line in text.lines() {
            assert!(line.len() <= WRAP_WIDTH, "line too long: {line:?}");
        }
        // The folded value must reparse to the original string.
        let docs = crate::parse::parse_documents(&text).unwrap();
        assert_eq!(
            docs[0].find("description").and_then(Node::scalar_value),
            Some(long)
        );
    }

    #[test]
    fn quoted_styles_are_honored_when_present() {
        let doc = Node::Mapping(vec![(
            Node::plain("a"),
            Node::Scalar(Scalar {
                value: "plain text".into(),
                style: saphyr_parser::ScalarStyle::SingleQuoted,
                known_string: true,
            }),
        )]);
        assert_eq!(emit(doc), "---\na: 'plain text'\n");
    }

    #[test]
    fn core_schema_lookalikes() {
        assert!(resolves_non_string("0x1f"));
        assert!(resolves_non_string("-12"));
        assert!(resolves_non_string(".5"));
        assert!(resolves_non_string("1e3"));
        assert!(resolves_non_string(".inf"));
        assert!(!resolves_non_string("1.2.3"));
        assert!(!resolves_non_string("v1"));
        assert!(!resolves_non_string("e3"));
    }
}
