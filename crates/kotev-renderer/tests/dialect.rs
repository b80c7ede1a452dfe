//! End-to-end tests for the Kotev dialect pipeline.

use kotev_renderer::{OrphanPolicy, RenderOptions, Renderer};
use pretty_assertions::assert_eq;

fn render(markdown: &str) -> String {
    Renderer::default().render(markdown).unwrap()
}

/// Drop the line breaks the engine puts between blocks.
fn squash(html: &str) -> String {
    html.replace('\n', "")
}

#[test]
fn test_hebrew_italic() {
    assert_eq!(render("/שלום/"), r#"<p><i lang="he">שלום</i></p>"#);
}

#[test]
fn test_citation() {
    assert_eq!(render("_A Citation_"), "<p><cite>A Citation</cite></p>");
}

#[test]
fn test_escaped_slash_is_literal() {
    assert_eq!(render(r"a \/b/ c"), "<p>a /b/ c</p>");
}

#[test]
fn test_blockquote_source_becomes_figure() {
    let html = render("> Who is wise? One who learns from every person.\n--Rabbi Akiva");
    assert_eq!(
        squash(&html),
        "<figure><blockquote><p>Who is wise? One who learns from every person.</p></blockquote><figcaption>Rabbi Akiva</figcaption></figure>"
    );
}

#[test]
fn test_attributes_before_sourced_quote_land_on_figure() {
    // Footers are restructured before markers are hoisted
    let html = render("{: he}\n> דברים\n--מקור");
    assert_eq!(
        squash(&html),
        r#"<figure lang="he"><blockquote><p>דברים</p></blockquote><figcaption>מקור</figcaption></figure>"#
    );
}

#[test]
fn test_multi_line_source() {
    let html = render("> quote\n\n--Part one,\n-- part two");
    assert_eq!(
        squash(&html),
        "<blockquote><p>quote</p></blockquote><figure><figcaption>Part one,part two</figcaption></figure>"
    );
}

#[test]
fn test_source_with_citation_markup() {
    let html = render("> text\n--_Pirkei Avot_ 4:1");
    assert_eq!(
        squash(&html),
        "<figure><blockquote><p>text</p></blockquote><figcaption><cite>Pirkei Avot</cite> 4:1</figcaption></figure>"
    );
}

#[test]
fn test_attribute_line_before_image() {
    let html = render("{: .bigimage}\n![Logo](/images/logo.png)");
    assert!(html.contains(r#"class="bigimage""#));
    assert!(!html.contains("<p></p>"));
    assert_eq!(
        html,
        r#"<p><img src="/images/logo.png" alt="Logo" class="bigimage" /></p>"#
    );
}

#[test]
fn test_attribute_line_before_heading() {
    assert_eq!(
        render("{: #intro .lead}\n## Introduction"),
        r#"<h2 id="intro" class="lead">Introduction</h2>"#
    );
}

#[test]
fn test_attribute_line_with_unbalanced_quote() {
    assert_eq!(render("{: .a \"b }\ntext"), r#"<p class="a">text</p>"#);
}

#[test]
fn test_trailing_marker_policies() {
    let markdown = "Some text {: .note}";
    assert_eq!(render(markdown), r#"<p class="note">Some text </p>"#);

    let renderer = Renderer::new(RenderOptions::default().with_orphan_policy(OrphanPolicy::Drop));
    assert_eq!(renderer.render(markdown).unwrap(), "<p>Some text </p>");
}

#[test]
fn test_smart_quotes() {
    assert_eq!(render(r#""hello""#), "<p>“hello”</p>");
    assert_eq!(render(r#"א"ב"#), "<p>א״ב</p>");
    assert_eq!(render(r#"הוא אמר "שלום""#), "<p>הוא אמר ”שלום“</p>");
}

#[test]
fn test_ellipsis_and_dash() {
    assert_eq!(render("wait..."), "<p>wait…</p>");
    assert_eq!(render("well--then"), "<p>well—then</p>");
}

#[test]
fn test_punctuation_never_touches_markup() {
    assert_eq!(
        render(r#"<span title="a--b...">x--y</span> ![a--b "c"](img--1.png)"#),
        r#"<p><span title="a--b...">x—y</span> <img src="img--1.png" alt="a--b &quot;c&quot;" /></p>"#
    );
}

#[test]
fn test_code_is_not_smartened() {
    assert_eq!(
        render("`a--b \"c\"` and\n\n```\nx...y\n```"),
        "<p><code>a--b \"c\"</code> and</p>\n<pre><code>x...y</code></pre>"
    );
}

#[test]
fn test_script_and_style_pass_through() {
    assert_eq!(
        render("<script>if (a<b) {}</script>"),
        "<script>if (a<b) {}</script>"
    );
    assert_eq!(
        render("<style>\np > a { content: \"--\" }\n</style>"),
        "<style>\np > a { content: \"--\" }\n</style>"
    );
}

#[test]
fn test_no_transient_output() {
    let markdown = "{: .a}\n> q\n--src\n\n-- lone\n\ntext {: #t}\n\n<div markdown>\n{: .inner}\n> nested\n--who\n</div>";
    let html = render(markdown);
    assert!(!html.contains('\u{FFFC}'), "placeholder left in {html}");
    assert!(!html.contains("x-attrs"), "marker left in {html}");
    assert!(!html.contains("<footer"), "footer left in {html}");
    assert!(!html.contains("markdown"), "flag left in {html}");
}

#[test]
fn test_nested_markdown_is_finalized_once() {
    let markdown = "\"outer\" -- text...\n\n<div markdown>\n\"inner\" don't\n</div>";
    let first = render(markdown);
    assert_eq!(
        first,
        "<p>“outer” — text…</p>\n<div><p>“inner” don’t</p></div>"
    );
    assert_eq!(render(&first), first);
}

#[test]
fn test_recursion_depth_limit() {
    let renderer = Renderer::new(RenderOptions::default().with_max_depth(1));
    let html = renderer
        .render("<div markdown>\n<div markdown>\n**deep**\n</div>\n</div>")
        .unwrap();
    assert_eq!(html, "<div><div>\n**deep**\n</div></div>");
}

#[test]
fn test_deeply_nested_quotes_render() {
    let html = render(&format!("{} /x/", ">".repeat(5000)));
    assert!(html.starts_with("<blockquote>"));
    assert!(html.ends_with("</blockquote>"));
}

#[test]
fn test_dialect_inside_lists() {
    assert_eq!(
        render("- /אחד/ one\n- _two_"),
        "<ul>\n<li><i lang=\"he\">אחד</i> one</li>\n<li><cite>two</cite></li>\n</ul>"
    );
}

#[test]
fn test_renderer_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Renderer>();

    let renderer = Renderer::default();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| renderer.render("/a/ \"b\"").unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), r#"<p><i lang="he">a</i> “b”</p>"#);
        }
    });
}
