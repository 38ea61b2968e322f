//! Rewrites every `view! { ... }` block of a Rust source file.

use crate::builder::build_ast;
use crate::codegen::{CodegenContext, serialize};
use crate::error::CompileError;
use crate::options::CompileOptions;
use crate::parse::parse_view_block;

/// A compiled source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// The rewritten file: runtime imports and hoisted templates first,
    /// then the original source with each block replaced.
    pub code: String,
    /// Number of blocks compiled, nested ones included.
    pub templates: usize,
    /// Number of hoisted declarations after de-duplication.
    pub hoisted: usize,
}

/// Compile all template blocks in `source`.
pub fn compile_module(
    source: &str,
    options: &CompileOptions,
) -> Result<CompileOutput, CompileError> {
    let mut ctx = CodegenContext::new(options);
    let (body, templates) = expand(source, source, None, &options.macro_name, &mut ctx)?;

    let header = format!("{}{}", ctx.render_imports(), ctx.render_hoisted());
    let code = if header.is_empty() {
        body
    } else {
        let at = header_offset(&body);
        let mut code = String::with_capacity(body.len() + header.len() + 1);
        code.push_str(&body[..at]);
        code.push_str(&header);
        if !body[at..].starts_with('\n') {
            code.push('\n');
        }
        code.push_str(&body[at..]);
        code
    };

    tracing::debug!(
        templates,
        hoisted = ctx.declarations.len(),
        "compiled module"
    );
    Ok(CompileOutput {
        code,
        templates,
        hoisted: ctx.declarations.len(),
    })
}

/// Replace blocks in `source`, then rescan each compiled block for blocks
/// nested in its embedded expressions. `source` is either `file` itself or
/// compiled text whose nested blocks were copied from the `within` range of
/// `file`; error locations always refer to `file`.
fn expand(
    source: &str,
    file: &str,
    within: Option<(usize, usize)>,
    macro_name: &str,
    ctx: &mut CodegenContext,
) -> Result<(String, usize), CompileError> {
    let mut out = String::with_capacity(source.len());
    let mut count = 0;
    let mut last = 0;
    let mut pos = 0;

    while let Some(site) = next_site(source, pos, macro_name) {
        let start = match within {
            None => site.start,
            Some(region) => locate(file, region, &source[site.start..], macro_name),
        };
        let brace = start + (site.brace - site.start);
        let (line, col) = line_col(file, brace);
        let (roots, len) = match parse_view_block(&source[site.brace..]) {
            Ok(parsed) => parsed,
            Err(CompileError::UnclosedView { .. }) => {
                let (line, col) = line_col(file, start);
                return Err(CompileError::UnclosedView {
                    macro_name: macro_name.to_string(),
                    line,
                    col,
                });
            }
            Err(err) => return Err(err.offset(line, col)),
        };
        let ast = build_ast(&roots).map_err(|err| err.offset(line, col))?;
        let compiled = serialize(&ast, ctx)?;
        let (compiled, nested) =
            expand(&compiled, file, Some((brace, brace + len)), macro_name, ctx)?;
        tracing::trace!(line, col, nested, "compiled view block");

        out.push_str(&source[last..site.start]);
        out.push_str(&compiled);
        pos = site.brace + len;
        last = pos;
        count += 1 + nested;
    }
    out.push_str(&source[last..]);
    Ok((out, count))
}

/// File offset of the block `text` starts with: the site in `file[from..to]`
/// sharing the longest prefix with it.
fn locate(file: &str, (from, to): (usize, usize), text: &str, macro_name: &str) -> usize {
    let region = &file[..to];
    let mut best = (from, 0);
    let mut pos = from;
    while let Some(site) = next_site(region, pos, macro_name) {
        let shared = region[site.start..]
            .bytes()
            .zip(text.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        if shared > best.1 {
            best = (site.start, shared);
        }
        pos = site.start + 1;
    }
    best.0
}

struct Site {
    /// Offset of the macro name.
    start: usize,
    /// Offset of the opening brace.
    brace: usize,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Next `name! {` at or after `from`, outside comments and literals.
fn next_site(source: &str, from: usize, name: &str) -> Option<Site> {
    let bytes = source.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        let ident_before = i > 0 && is_ident_byte(bytes[i - 1]);
        match bytes[i] {
            b'/' if next == Some(b'/') => {
                i = source[i..].find('\n').map_or(bytes.len(), |end| i + end + 1);
            }
            b'/' if next == Some(b'*') => i = skip_block_comment(bytes, i),
            b'"' => i = skip_string(bytes, i),
            b'r' if (!ident_before || (i > 0 && bytes[i - 1] == b'b'))
                && matches!(next, Some(b'"' | b'#')) =>
            {
                i = skip_raw_string(bytes, i);
            }
            b'\'' => i = skip_char(source, i),
            _ if !ident_before && bytes[i..].starts_with(name.as_bytes()) => {
                let bang = i + name.len();
                if bytes.get(bang) == Some(&b'!') {
                    let mut j = bang + 1;
                    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                        j += 1;
                    }
                    if bytes.get(j) == Some(&b'{') {
                        return Some(Site { start: i, brace: j });
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"/*") {
            depth += 1;
            i += 2;
        } else if bytes[i..].starts_with(b"*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += 1;
        }
    }
    bytes.len()
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_raw_string(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    let mut hashes = 0;
    while bytes.get(i) == Some(&b'#') {
        hashes += 1;
        i += 1;
    }
    if bytes.get(i) != Some(&b'"') {
        // `r#ident`
        return i;
    }
    i += 1;
    while i < bytes.len() {
        let closes = bytes[i + 1..]
            .iter()
            .take(hashes)
            .take_while(|&&b| b == b'#')
            .count()
            == hashes;
        if bytes[i] == b'"' && closes {
            return i + 1 + hashes;
        }
        i += 1;
    }
    bytes.len()
}

/// Skip a char literal, or just the quote of a lifetime.
fn skip_char(source: &str, start: usize) -> usize {
    let rest = &source[start + 1..];
    if let Some(escaped) = rest.strip_prefix('\\') {
        let skip = escaped.chars().next().map_or(0, char::len_utf8);
        return escaped[skip..]
            .find('\'')
            .map_or(source.len(), |end| start + 2 + skip + end + 1);
    }
    let mut chars = rest.char_indices();
    match (chars.next(), chars.next()) {
        (Some(_), Some((end, '\''))) => start + 1 + end + 1,
        _ => start + 1,
    }
}

/// 1-based line and column (in chars) of byte `offset`.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}

/// Offset after the leading inner doc comments and inner attributes, where
/// items may be inserted.
fn header_offset(source: &str) -> usize {
    let mut offset = 0;
    let mut at = 0;
    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        at += line.len();
        if trimmed.starts_with("//!") || trimmed.starts_with("#![") {
            offset = at;
        } else if !trimmed.is_empty() {
            break;
        }
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sites_skip_comments_and_literals() {
        let source = r##"// view! { a }
/* view! { b } */ let s = "view! { c }"; let r = r#"view! { d }"#;
let l: &'static str = "x"; let c = '{'; view! { <p/> }"##;
        let site = next_site(source, 0, "view").expect("site");
        assert_eq!(&source[site.start..site.brace], "view! ");
        assert!(next_site(source, site.brace, "view").is_none());
    }

    #[test]
    fn sites_need_a_word_boundary() {
        assert!(next_site("preview! { <p/> }", 0, "view").is_none());
        assert!(next_site("view!(x)", 0, "view").is_none());
    }

    #[test]
    fn header_goes_after_inner_attributes() {
        let source = "//! docs\n#![allow(unused)]\n\nfn main() {}\n";
        assert_eq!(&source[header_offset(source)..], "\nfn main() {}\n");
        assert_eq!(header_offset("fn main() {}"), 0);
    }

    #[test]
    fn line_col_counts_chars() {
        assert_eq!(line_col("ab\nxé{", 6), (2, 3));
    }
}
