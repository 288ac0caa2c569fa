//! HTML parser for pages and fragments
//!
//! Stack-based tag scanner covering the markup the history pages use: start
//! and end tags with attributes, void elements, comments, doctype, entity
//! decoding, and opaque script/style bodies. Mis-nested end tags unwind the
//! open-element stack; stray end tags are ignored.

use log::debug;
use thiserror::Error;

use super::{Document, NodeId, is_void};

/// Errors produced while parsing markup
#[derive(Debug, Error)]
pub enum ParseError {
    /// A tag was still open when the input ended
    #[error("unclosed <{0}> at end of input")]
    UnclosedTag(String),

    /// A tag opener was never terminated with `>`
    #[error("unterminated tag at byte {0}")]
    UnterminatedTag(usize),

    /// A comment was never terminated with `-->`
    #[error("unterminated comment at byte {0}")]
    UnterminatedComment(usize),
}

pub(super) fn parse(html: &str) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let mut stack = vec![doc.root()];
    let mut i = 0;

    while i < html.len() {
        let rest = &html[i..];
        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after
                .find("-->")
                .ok_or(ParseError::UnterminatedComment(i))?;
            i += 4 + end + 3;
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // doctype or processing instruction, skipped
            let end = rest.find('>').ok_or(ParseError::UnterminatedTag(i))?;
            i += end + 1;
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').ok_or(ParseError::UnterminatedTag(i))?;
            let name = after[..end].trim().to_ascii_lowercase();
            close_tag(&doc, &mut stack, &name);
            i += 2 + end + 1;
        } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let (consumed, tag, pushed) = open_tag(&mut doc, &mut stack, rest, i)?;
            i += consumed;
            if pushed && matches!(tag.as_str(), "script" | "style") {
                i += raw_text(&mut doc, &stack, &html[i..], &tag)?;
            }
        } else {
            // text run up to the next tag opener; a lone '<' stays text
            let next = if rest.starts_with('<') {
                rest[1..].find('<').map_or(rest.len(), |p| p + 1)
            } else {
                rest.find('<').unwrap_or(rest.len())
            };
            let parent = top(&stack);
            let text = doc.push_text(decode_entities(&rest[..next]));
            doc.append_child(parent, text);
            i += next;
        }
    }

    if stack.len() > 1 {
        let tag = doc.tag_name(top(&stack)).unwrap_or_default().to_string();
        return Err(ParseError::UnclosedTag(tag));
    }

    debug!("parsed {} node(s) from {} byte(s)", doc.len(), html.len());
    Ok(doc)
}

fn top(stack: &[NodeId]) -> NodeId {
    *stack.last().expect("open-element stack keeps the root")
}

/// Parse one start tag. Returns bytes consumed, the tag name, and whether the
/// element was pushed onto the open stack.
fn open_tag(
    doc: &mut Document,
    stack: &mut Vec<NodeId>,
    rest: &str,
    at: usize,
) -> Result<(usize, String, bool), ParseError> {
    let bytes = rest.as_bytes();
    let mut j = 1;

    let name_start = j;
    while j < bytes.len() && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-') {
        j += 1;
    }
    let tag = rest[name_start..j].to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;
    loop {
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if j >= bytes.len() {
            return Err(ParseError::UnterminatedTag(at));
        }
        match bytes[j] {
            b'>' => {
                j += 1;
                break;
            }
            b'/' => {
                j += 1;
                if j < bytes.len() && bytes[j] == b'>' {
                    self_closing = true;
                    j += 1;
                    break;
                }
            }
            _ => {
                let attr_start = j;
                while j < bytes.len()
                    && !bytes[j].is_ascii_whitespace()
                    && bytes[j] != b'='
                    && bytes[j] != b'>'
                    && bytes[j] != b'/'
                {
                    j += 1;
                }
                if attr_start == j {
                    // stray '=' or the like; skip one byte to keep moving
                    j += 1;
                    continue;
                }
                let name = rest[attr_start..j].to_ascii_lowercase();
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                let value = if j < bytes.len() && bytes[j] == b'=' {
                    j += 1;
                    while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                        j += 1;
                    }
                    if j < bytes.len() && (bytes[j] == b'"' || bytes[j] == b'\'') {
                        let quote = bytes[j];
                        j += 1;
                        let value_start = j;
                        while j < bytes.len() && bytes[j] != quote {
                            j += 1;
                        }
                        if j >= bytes.len() {
                            return Err(ParseError::UnterminatedTag(at));
                        }
                        let value = decode_entities(&rest[value_start..j]);
                        j += 1;
                        value
                    } else {
                        let value_start = j;
                        while j < bytes.len() && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>'
                        {
                            j += 1;
                        }
                        decode_entities(&rest[value_start..j])
                    }
                } else {
                    String::new()
                };
                attrs.push((name, value));
            }
        }
    }

    let checked = tag == "input"
        && attrs
            .iter()
            .any(|(n, v)| n == "type" && v.eq_ignore_ascii_case("checkbox"))
        && attrs.iter().any(|(n, _)| n == "checked");
    let id = doc.push_element(tag.clone(), attrs, checked);
    doc.append_child(top(stack), id);

    let pushed = !self_closing && !is_void(&tag);
    if pushed {
        stack.push(id);
    }
    Ok((j, tag, pushed))
}

/// Capture an opaque script/style body as one raw text child. Returns bytes
/// consumed up to (not including) the closing tag.
fn raw_text(
    doc: &mut Document,
    stack: &[NodeId],
    rest: &str,
    tag: &str,
) -> Result<usize, ParseError> {
    let lower = rest.to_ascii_lowercase();
    let closer = format!("</{tag}");
    let end = lower
        .find(&closer)
        .ok_or_else(|| ParseError::UnclosedTag(tag.to_string()))?;
    if end > 0 {
        let text = doc.push_text(rest[..end].to_string());
        doc.append_child(top(stack), text);
    }
    Ok(end)
}

/// Unwind the open stack to the matching start tag. Stray end tags with no
/// open match are ignored.
fn close_tag(doc: &Document, stack: &mut Vec<NodeId>, name: &str) {
    if let Some(pos) = stack.iter().rposition(|&id| doc.tag_name(id) == Some(name)) {
        stack.truncate(pos);
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let semi = rest.find(';').filter(|&s| s <= 8);
        let decoded = semi.and_then(|s| {
            let name = &rest[1..s];
            match name {
                "amp" => Some(('&', s)),
                "lt" => Some(('<', s)),
                "gt" => Some(('>', s)),
                "quot" => Some(('"', s)),
                "nbsp" => Some(('\u{a0}', s)),
                _ => name
                    .strip_prefix('#')
                    .and_then(|digits| digits.parse::<u32>().ok())
                    .and_then(char::from_u32)
                    .map(|c| (c, s)),
            }
        });
        if let Some((c, s)) = decoded {
            out.push(c);
            rest = &rest[s + 1..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}
