//! Tests for the markup parser

use tallybox::dom::{Document, ParseError};

// =============================================================================
// WELL-FORMED INPUT
// =============================================================================

#[test]
fn test_parse_nested_elements_and_text() {
    let doc = Document::parse("<div><p>привет</p></div>").unwrap();
    let div = doc.children(doc.root())[0];
    let p = doc.children(div)[0];
    assert_eq!(doc.tag_name(div), Some("div"));
    assert_eq!(doc.tag_name(p), Some("p"));
    assert_eq!(doc.text_content(p), "привет");
}

#[test]
fn test_parse_attributes_in_every_quote_style() {
    let doc =
        Document::parse(r#"<input type="checkbox" name='log_ids' value=7 disabled>"#).unwrap();
    let input = doc.children(doc.root())[0];
    assert_eq!(doc.attr(input, "type"), Some("checkbox"));
    assert_eq!(doc.attr(input, "name"), Some("log_ids"));
    assert_eq!(doc.attr(input, "value"), Some("7"));
    assert_eq!(doc.attr(input, "disabled"), Some(""));
}

#[test]
fn test_parse_lowercases_tag_and_attribute_names() {
    let doc = Document::parse(r#"<DIV CLASS="История генераций">x</DIV>"#).unwrap();
    let div = doc.children(doc.root())[0];
    assert_eq!(doc.tag_name(div), Some("div"));
    // attribute values keep their case
    assert_eq!(doc.attr(div, "class"), Some("История генераций"));
}

#[test]
fn test_parse_void_and_self_closing_tags() {
    let doc = Document::parse(r#"<div><br><input type="text"><span/>после</div>"#).unwrap();
    let div = doc.children(doc.root())[0];
    let kids = doc.children(div);
    assert_eq!(kids.len(), 4);
    assert_eq!(doc.tag_name(kids[0]), Some("br"));
    assert_eq!(doc.tag_name(kids[1]), Some("input"));
    assert_eq!(doc.tag_name(kids[2]), Some("span"));
    assert_eq!(doc.text_content(kids[3]), "после");
}

#[test]
fn test_parse_skips_doctype_and_comments() {
    let doc = Document::parse("<!DOCTYPE html><!-- пусто --><p>x</p>").unwrap();
    assert_eq!(doc.children(doc.root()).len(), 1);
}

#[test]
fn test_parse_decodes_entities_in_text_and_attributes() {
    let doc =
        Document::parse(r#"<a title="a &amp; b">1 &lt; 2&nbsp;&#39;&unknown;</a>"#).unwrap();
    let a = doc.children(doc.root())[0];
    assert_eq!(doc.attr(a, "title"), Some("a & b"));
    assert_eq!(doc.text_content(a), "1 < 2\u{a0}'&unknown;");
}

#[test]
fn test_parse_lone_less_than_stays_text() {
    let doc = Document::parse("<p>1 < 2</p>").unwrap();
    let p = doc.children(doc.root())[0];
    assert_eq!(doc.text_content(p), "1 < 2");
}

#[test]
fn test_parse_script_body_is_opaque() {
    let doc = Document::parse("<script>if (a < b) { f(); }</script><p>x</p>").unwrap();
    let script = doc.children(doc.root())[0];
    assert_eq!(doc.tag_name(script), Some("script"));
    assert_eq!(doc.text_content(script), "if (a < b) { f(); }");
    assert_eq!(doc.children(doc.root()).len(), 2);
}

#[test]
fn test_parse_checkbox_checked_state_from_markup() {
    let doc = Document::parse(
        r#"<input type="checkbox" checked><input TYPE="CHECKBOX" checked><input type="checkbox">"#,
    )
    .unwrap();
    let kids = doc.children(doc.root());
    assert!(doc.checked(kids[0]));
    assert!(doc.checked(kids[1]), "type matching is case-insensitive");
    assert!(!doc.checked(kids[2]));
}

// =============================================================================
// RECOVERY AND ERRORS
// =============================================================================

#[test]
fn test_parse_mis_nested_end_tag_unwinds_the_stack() {
    let doc = Document::parse("<div><b>x</div>y").unwrap();
    let div = doc.children(doc.root())[0];
    let b = doc.children(div)[0];
    assert_eq!(doc.tag_name(b), Some("b"));
    assert_eq!(doc.text_content(div), "x");
    // "y" lands back at the root once </div> has closed both elements
    assert_eq!(doc.children(doc.root()).len(), 2);
}

#[test]
fn test_parse_stray_end_tag_is_ignored() {
    let doc = Document::parse("</b><p>x</p>").unwrap();
    assert_eq!(doc.children(doc.root()).len(), 1);
}

#[test]
fn test_parse_empty_input() {
    let doc = Document::parse("").unwrap();
    assert!(doc.is_empty());
}

#[test]
fn test_parse_unclosed_tag_is_an_error() {
    let err = Document::parse("<div><p>x").unwrap_err();
    assert!(matches!(err, ParseError::UnclosedTag(tag) if tag == "p"));
}

#[test]
fn test_parse_unterminated_tag_is_an_error() {
    assert!(matches!(
        Document::parse("<div class="),
        Err(ParseError::UnterminatedTag(_))
    ));
}

#[test]
fn test_parse_unterminated_quote_is_an_error() {
    assert!(matches!(
        Document::parse(r#"<div class="open>"#),
        Err(ParseError::UnterminatedTag(_))
    ));
}

#[test]
fn test_parse_unterminated_comment_is_an_error() {
    assert!(matches!(
        Document::parse("<!-- x"),
        Err(ParseError::UnterminatedComment(_))
    ));
}

#[test]
fn test_parse_unclosed_script_is_an_error() {
    assert!(matches!(
        Document::parse("<script>var x = 1;"),
        Err(ParseError::UnclosedTag(tag)) if tag == "script"
    ));
}
