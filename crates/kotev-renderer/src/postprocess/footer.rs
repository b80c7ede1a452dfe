//! Source footers become figure captions.

use kotev_dom::{NodeData, NodeId, SOURCE_CLASS, Tree};

/// Turn every source footer into the `figcaption` of a `figure`.
///
/// The figure wraps the nearest enclosing `blockquote`, or the footer's
/// parent when there is none. A figure already around that anchor is
/// reused. At the top level, where there is no element to wrap, the
/// footer is replaced by a figure holding only the caption.
///
/// Returns the number of footers restructured.
pub fn restructure_footers(tree: &mut Tree) -> usize {
    let footers = tree.find(|data| matches!(data, NodeData::SourceFooter(_)));
    for &footer in &footers {
        restructure(tree, footer);
    }
    footers.len()
}

fn restructure(tree: &mut Tree, footer: NodeId) {
    let Some(parent) = tree.parent(footer) else {
        return;
    };
    trim_preceding_text(tree, footer);

    let anchor = tree
        .ancestors(footer)
        .find(|&node| tree.is_element_named(node, "blockquote"))
        .unwrap_or(parent);

    let figure = if anchor == tree.root() {
        let figure = tree.create_element("figure");
        tree.insert_before(footer, figure);
        figure
    } else {
        match tree.parent(anchor) {
            Some(outer) if tree.is_element_named(outer, "figure") => outer,
            _ => {
                let figure = tree.create_element("figure");
                tree.insert_before(anchor, figure);
                tree.append(figure, anchor);
                tree.copy_attributes(anchor, figure);
                figure
            }
        }
    };

    let caption = tree.create_element("figcaption");
    tree.move_children(footer, caption);
    tree.copy_attributes(footer, caption);
    drop_source_class(tree, caption);
    tree.append(figure, caption);
    tree.detach(footer);

    tracing::debug!(anchor = tree.tag(anchor).unwrap_or_default(), "Restructured source footer");
}

/// Trim the line break left between a paragraph's text and its footer.
fn trim_preceding_text(tree: &mut Tree, footer: NodeId) {
    let Some(prev) = tree.previous_sibling(footer) else {
        return;
    };
    let NodeData::Text(text) = tree.data_mut(prev) else {
        return;
    };
    let trimmed = text.trim_end().len();
    text.truncate(trimmed);
    if text.is_empty() {
        tree.detach(prev);
    }
}

fn drop_source_class(tree: &mut Tree, node: NodeId) {
    let Some(attrs) = tree.attrs_mut(node) else {
        return;
    };
    let Some(class) = attrs.get("class") else {
        return;
    };
    let rest = class
        .split_whitespace()
        .filter(|&token| token != SOURCE_CLASS)
        .collect::<Vec<_>>()
        .join(" ");
    if rest.is_empty() {
        attrs.remove("class");
    } else {
        attrs.set("class", rest);
    }
}

#[cfg(test)]
mod tests {
    use kotev_dom::{HtmlParser, HtmlSerializer};
    use pretty_assertions::assert_eq;

    use super::*;

    fn restructure_html(html: &str) -> (usize, String) {
        let mut tree = HtmlParser::new().parse(html).unwrap();
        let count = restructure_footers(&mut tree);
        (count, HtmlSerializer::new().serialize(&tree).unwrap())
    }

    #[test]
    fn test_footer_in_blockquote_paragraph() {
        let (count, html) = restructure_html(
            "<blockquote><p>text\n<footer class=\"source\">Rabbi Akiva</footer></p></blockquote>",
        );
        assert_eq!(count, 1);
        assert_eq!(
            html,
            "<figure><blockquote><p>text</p></blockquote><figcaption>Rabbi Akiva</figcaption></figure>"
        );
    }

    #[test]
    fn test_figure_takes_blockquote_attributes() {
        let (_, html) = restructure_html(
            "<blockquote lang=\"he\"><p>x</p><footer class=\"source\">y</footer></blockquote>",
        );
        assert_eq!(
            html,
            "<figure lang=\"he\"><blockquote lang=\"he\"><p>x</p></blockquote><figcaption>y</figcaption></figure>"
        );
    }

    #[test]
    fn test_footer_without_blockquote_wraps_parent() {
        let (_, html) =
            restructure_html("<p>words\n<footer class=\"source\">Someone</footer></p>");
        assert_eq!(
            html,
            "<figure><p>words</p><figcaption>Someone</figcaption></figure>"
        );
    }

    #[test]
    fn test_top_level_footer() {
        let (_, html) = restructure_html(
            "<p>before</p>\n<footer class=\"source\">Someone</footer>",
        );
        assert_eq!(
            html,
            "<p>before</p><figure><figcaption>Someone</figcaption></figure>"
        );
    }

    #[test]
    fn test_existing_figure_is_reused() {
        let (_, html) = restructure_html(
            "<figure><blockquote><p>x</p><footer class=\"source\">y</footer></blockquote></figure>",
        );
        assert_eq!(
            html,
            "<figure><blockquote><p>x</p></blockquote><figcaption>y</figcaption></figure>"
        );
    }

    #[test]
    fn test_caption_keeps_other_classes_and_markup() {
        let (_, html) = restructure_html(
            "<blockquote><p>x</p><footer class=\"source wide\" id=\"s\"><cite>Book</cite>, p. 3</footer></blockquote>",
        );
        assert_eq!(
            html,
            "<figure><blockquote><p>x</p></blockquote><figcaption class=\"wide\" id=\"s\"><cite>Book</cite>, p. 3</figcaption></figure>"
        );
    }

    #[test]
    fn test_plain_footer_is_untouched() {
        let (count, html) = restructure_html("<footer>site</footer>");
        assert_eq!(count, 0);
        assert_eq!(html, "<footer>site</footer>");
    }
}
