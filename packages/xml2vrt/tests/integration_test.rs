//! End-to-end conversion tests.
//!
//! Runs complete documents through the parser and the engine, using the
//! TEI-style fixture in `tests/fixtures/` for the full pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use xml2vrt::config::{load_options, PolicyKey};
use xml2vrt::{convert_str, ConversionSummary, ConvertOptions, VrtError};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Convert and return the output with its summary.
fn convert(xml: &str, options: &ConvertOptions) -> (String, ConversionSummary) {
    let mut out = Vec::new();
    let summary = convert_str(xml, options, &mut out).expect("conversion failed");
    (String::from_utf8(out).expect("output is UTF-8"), summary)
}

fn lines(output: &str) -> Vec<&str> {
    output.lines().collect()
}

#[test]
fn test_sample_fixture() {
    let options = load_options(&fixture_path("sample.yaml")).expect("valid options");
    let (output, summary) = convert(&load_fixture("sample.xml"), &options);

    assert_eq!(output, load_fixture("sample.vrt"));
    assert_eq!(summary.tokens, 6);
    assert_eq!(summary.glue_marks, 1);
    assert_eq!(summary.free_text_lines, 1);
    assert_eq!(summary.suppressed_elements, 1);
    assert_eq!(summary.merged_elements, 1);
    assert_eq!(summary.open_tags, summary.close_tags);
}

#[test]
fn test_sample_header_not_extracted() {
    let options = load_options(&fixture_path("sample.yaml")).expect("valid options");
    let (output, _) = convert(&load_fixture("sample.xml"), &options);

    assert!(!output.contains("Sample"));
    assert!(!output.contains("<TEI>"));
}

#[test]
fn test_sibling_flattening_is_idempotent() {
    let options = ConvertOptions::default();
    let (output, _) = convert("<p><hi>a</hi><hi>b</hi></p>", &options);

    assert_eq!(lines(&output), vec!["<p>", "<hi>", "a", "</hi>", "<hi>", "b", "</hi>", "</p>"]);
}

#[test]
fn test_deep_nesting_collapses_to_one_pair() {
    let options = ConvertOptions::default();
    let (output, summary) = convert(
        r#"<d n="1"><d n="2"><d n="3"><d n="4"><w>x</w></d></d></d></d>"#,
        &options,
    );

    assert_eq!(
        lines(&output),
        vec![r#"<d n="1 2 3 4" flat_level="3">"#, "x", "</d>"]
    );
    assert_eq!(summary.merged_elements, 3);
}

#[test]
fn test_empty_elements_never_reach_output() {
    let options = ConvertOptions::default();
    let (output, summary) = convert(
        r#"<doc><lb/><p><pb n="1"/><w>a</w><milestone/></p><empty></empty></doc>"#,
        &options,
    );

    assert_eq!(lines(&output), vec!["<doc>", "<p>", "a", "</p>", "</doc>"]);
    assert_eq!(summary.suppressed_elements, 4);
}

#[test]
fn test_discard_empty_subset() {
    let options = ConvertOptions::default().with_discard_empty(["lb"]);
    let (output, _) = convert(r#"<p><lb/><pb n="3"/><w>a</w></p>"#, &options);

    assert_eq!(lines(&output), vec!["<p>", r#"<pb n="3"/>"#, "a", "</p>"]);
}

#[test]
fn test_glue_only_between_adjacent_tokens() {
    let options = ConvertOptions::default();
    let (output, _) = convert(
        "<s><w>I</w> <w>do</w><w>n't</w>\n<w>know</w><w>.</w></s>",
        &options,
    );

    assert_eq!(
        lines(&output),
        vec!["<s>", "I", "do", "<g/>", "n't", "know", "<g/>", ".", "</s>"]
    );
}

#[test]
fn test_custom_glue_element() {
    let options = ConvertOptions::default().with_glue(Some("join"));
    let (output, _) = convert("<s><w>a</w><w>b</w></s>", &options);

    assert_eq!(lines(&output), vec!["<s>", "a", "<join/>", "b", "</s>"]);
}

#[test]
fn test_attribute_columns() {
    let options = ConvertOptions::default().with_attributes(["pos", "lemma"]);
    let (output, _) = convert(
        r#"<s><w lemma="cat" pos="NN" attr3="x" attr4="y" attr6="z">cats</w><w>?</w></s>"#,
        &options,
    );

    assert_eq!(lines(&output), vec!["<s>", "cats\tNN\tcat\tx\ty", "<g/>", "?\t\t", "</s>"]);
}

#[test]
fn test_custom_token_element() {
    let options = ConvertOptions::default()
        .with_token_element("tok")
        .with_attributes(["lemma"]);
    let (output, _) = convert(r#"<s><tok lemma="a">A</tok> <w>b</w></s>"#, &options);

    assert_eq!(lines(&output), vec!["<s>", "A\ta", "<w>", "b", "</w>", "</s>"]);
}

#[test]
fn test_include_multiple_regions() {
    let options = ConvertOptions::default().with_include(["body"]);
    let (output, _) = convert(
        "<doc><front><p>skip</p></front><body><p><w>a</w></p></body>\
         <back><p><w>b</w></p></back><body><p><w>c</w></p></body></doc>",
        &options,
    );

    assert_eq!(
        lines(&output),
        vec!["<body>", "<p>", "a", "</p>", "</body>", "<body>", "<p>", "c", "</p>", "</body>"]
    );
}

#[test]
fn test_exclude_nested_same_name() {
    let options = ConvertOptions::default().with_exclude(["note"]);
    let (output, _) = convert(
        "<p><w>a</w> <note><w>x</w><note><w>y</w></note><w>z</w></note> <w>b</w></p>",
        &options,
    );

    assert_eq!(lines(&output), vec!["<p>", "a", "b", "</p>"]);
}

#[test]
fn test_include_nested_same_name() {
    let options = ConvertOptions::default().with_include(["div"]).with_glue(None);
    let (output, _) = convert(
        "<doc><div><div><w>a</w></div><w>b</w></div></doc>",
        &options,
    );

    assert_eq!(
        lines(&output),
        vec![r#"<div flat_level="1">"#, "a", "</div>", "<div>", "b", "</div>"]
    );
}

#[test]
fn test_include_two_names_nested() {
    let options = ConvertOptions::default()
        .with_include(["text", "body"])
        .with_glue(None);
    let (output, _) = convert(
        "<TEI><text><body><w>a</w></body><back><w>b</w></back></text></TEI>",
        &options,
    );

    assert_eq!(
        lines(&output),
        vec!["<text>", "<body>", "a", "</body>", "<back>", "b", "</back>", "</text>"]
    );
}

#[test]
fn test_include_inside_exclude() {
    let options = ConvertOptions::default()
        .with_include(["body"])
        .with_exclude(["note"]);
    let (output, summary) = convert(
        "<doc><note><body><w>x</w></body></note><front><w>leak</w></front></doc>",
        &options,
    );

    assert_eq!(output, "");
    assert_eq!(summary.tokens, 0);
}

#[test]
fn test_empty_merge_with_keep_empty() {
    let xml = r#"<p><s n="1"><s n="2"/></s></p>"#;

    let (kept, _) = convert(xml, &ConvertOptions::default().with_keep_empty(true));
    assert_eq!(
        lines(&kept),
        vec!["<p>", r#"<s n="1 2" flat_level="1"/>"#, "</p>"]
    );

    let (dropped, summary) = convert(xml, &ConvertOptions::default());
    assert_eq!(dropped, "");
    assert_eq!(summary.suppressed_elements, 2);
    assert_eq!(summary.merged_elements, 1);

    let (subset, _) = convert(xml, &ConvertOptions::default().with_discard_empty(["s"]));
    assert_eq!(lines(&subset), vec!["<p/>"]);
}

#[test]
fn test_keep_token_tags_same_name_as_ancestor() {
    let options = ConvertOptions::default().with_keep_token_tags(true);
    let (output, _) = convert("<hi><w>a<hi>b</hi></w></hi>", &options);

    assert_eq!(output, "<hi>\na<hi>b</hi>\n</hi>\n");
}

#[test]
fn test_source_word_attribute_ignored() {
    let (output, _) = convert(r#"<s><w word="x">dogs</w></s>"#, &ConvertOptions::default());
    assert_eq!(lines(&output), vec!["<s>", "dogs", "</s>"]);
}

#[test]
fn test_keep_token_tags() {
    let xml = r#"<s><w>New<lb/><hi rend="it">York</hi></w></s>"#;

    let (kept, _) = convert(xml, &ConvertOptions::default().with_keep_token_tags(true));
    assert_eq!(
        lines(&kept),
        vec!["<s>", r#"New<hi rend="it">York</hi>"#, "</s>"]
    );

    let (stripped, _) = convert(xml, &ConvertOptions::default());
    assert_eq!(lines(&stripped), vec!["<s>", "NewYork", "</s>"]);
}

#[test]
fn test_free_text_lines() {
    let options = ConvertOptions::default();
    let (output, _) = convert(
        "<p>\n   Some heading\n   text  <w>a</w>tail</p>",
        &options,
    );

    assert_eq!(lines(&output), vec!["<p>", "Some heading text", "a", "tail", "</p>"]);

    let (discarded, _) = convert(
        "<p>\n   Some heading\n   text  <w>a</w>tail</p>",
        &options.clone().with_discard_freetext(true),
    );
    assert_eq!(lines(&discarded), vec!["<p>", "a", "</p>"]);
}

#[test]
fn test_separator_and_override_policies() {
    let options = ConvertOptions::default()
        .with_flat_separator(PolicyKey::attribute("hi", "rend"), "+")
        .with_flat_override(PolicyKey::attribute("hi", "id"));
    let (output, _) = convert(
        r#"<hi rend="b" id="h1"><hi rend="i" id="h2"><w>x</w></hi></hi>"#,
        &options,
    );

    assert_eq!(
        lines(&output),
        vec![r#"<hi rend="b+i" id="h2" flat_level="1">"#, "x", "</hi>"]
    );
}

#[test]
fn test_attribute_values_escaped() {
    let options = ConvertOptions::default();
    let (output, _) = convert(r#"<s title="a &amp; &quot;b&quot; &lt;c&gt;"><w>x</w></s>"#, &options);

    assert_eq!(
        lines(&output)[0],
        r#"<s title="a &amp; &quot;b&quot; &lt;c&gt;">"#
    );
}

#[test]
fn test_nested_token_is_an_error() {
    let mut out = Vec::new();
    let err = convert_str(
        "<s><w>a<w>b</w></w></s>",
        &ConvertOptions::default(),
        &mut out,
    )
    .unwrap_err();

    assert!(matches!(err, VrtError::NestedToken(_)));
}
