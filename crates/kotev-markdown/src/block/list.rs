use super::thematic::is_thematic_break;
use super::{Block, BlockKind, BlockRule, BlockStart, BlockState, Resume};
use crate::element::{Content, Element};
use crate::engine::Engine;
use crate::line::Line;

/// A list item marker found at the start of a line.
struct ItemMarker<'a> {
    ordered: bool,
    /// `-`, `*`, `+` for bullets, `.` or `)` for ordered lists.
    marker: char,
    number: Option<u32>,
    content_indent: usize,
    first: &'a str,
}

fn parse_item(line: &Line) -> Option<ItemMarker<'_>> {
    if line.indent > 3 {
        return None;
    }
    let text = line.text.as_str();
    let digits = text.chars().take_while(char::is_ascii_digit).count();

    let (ordered, marker, number, marker_len) = if digits > 0 {
        if digits > 9 {
            return None;
        }
        let delimiter = text[digits..].chars().next()?;
        if !matches!(delimiter, '.' | ')') {
            return None;
        }
        (true, delimiter, text[..digits].parse().ok(), digits + 1)
    } else {
        let bullet = line.marker()?;
        if !matches!(bullet, '-' | '*' | '+') {
            return None;
        }
        (false, bullet, None, 1)
    };

    let rest = &text[marker_len..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    let spaces = rest.len() - rest.trim_start_matches(' ').len();
    // Five or more spaces start indented code inside the item.
    let spaces = if spaces == 0 || spaces > 4 { 1 } else { spaces };
    let first = rest.get(spaces..).unwrap_or_default();

    Some(ItemMarker {
        ordered,
        marker,
        number,
        content_indent: line.indent + marker_len + spaces,
        first,
    })
}

fn item(first: &str) -> Element {
    Element::new("li", Content::TightLines(vec![first.to_owned()]))
}

/// Bullet (`-`, `*`, `+`) and ordered (`1.`, `1)`) lists.
///
/// A list is tight unless a blank line separates its items or the blocks
/// inside an item; tight items render without paragraph wrappers.
pub struct List;

impl BlockRule for List {
    fn start(&self, line: &Line, _current: Option<&mut Block>, _engine: &Engine) -> Option<BlockStart> {
        let found = parse_item(line)?;
        let mut element = Element::new(
            if found.ordered { "ol" } else { "ul" },
            Content::Elements(vec![item(found.first)]),
        );
        if let Some(number) = found.number
            && number != 1
        {
            element.set_attr("start", number.to_string());
        }
        let block = Block::new(BlockKind::List, element).with_state(BlockState::List {
            ordered: found.ordered,
            marker: found.marker,
            content_indent: found.content_indent,
            loose: false,
        });
        Some(BlockStart::Open(block))
    }

    fn resume(&self, line: &Line, block: &mut Block) -> Resume {
        let BlockState::List {
            ordered,
            marker,
            content_indent,
            loose,
        } = &mut block.state
        else {
            return Resume::End;
        };
        let Content::Elements(items) = &mut block.element.content else {
            return Resume::End;
        };
        let Some(Element {
            content: Content::TightLines(lines),
            ..
        }) = items.last_mut()
        else {
            return Resume::End;
        };

        if line.indent >= *content_indent {
            if block.interrupted > 0 {
                lines.extend(std::iter::repeat_n(String::new(), block.interrupted));
                block.interrupted = 0;
                *loose = true;
            }
            lines.push(line.dedent(*content_indent).to_owned());
            return Resume::Continue;
        }

        let next = parse_item(line);
        if let Some(next) = &next
            && next.ordered == *ordered
            && next.marker == *marker
        {
            if block.interrupted > 0 {
                block.interrupted = 0;
                *loose = true;
            }
            *content_indent = next.content_indent;
            items.push(item(next.first));
            return Resume::Continue;
        }

        let starts_block = next.is_some()
            || is_thematic_break(line)
            || matches!(line.marker(), Some('#' | '>'))
            || line.text.starts_with("```")
            || line.text.starts_with("~~~");
        if block.interrupted > 0 || starts_block {
            return Resume::End;
        }

        // Lazy continuation of the item's last paragraph
        lines.push(line.text.clone());
        Resume::Continue
    }

    fn complete(&self, block: &mut Block) {
        let BlockState::List { loose: true, .. } = block.state else {
            return;
        };
        if let Content::Elements(items) = &mut block.element.content {
            for item in items {
                if let Content::TightLines(lines) = &mut item.content {
                    item.content = Content::Lines(std::mem::take(lines));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bullet() {
        let line = Line::new("-  item");
        let found = parse_item(&line).unwrap();
        assert!(!found.ordered);
        assert_eq!(found.content_indent, 3);
        assert_eq!(found.first, "item");
    }

    #[test]
    fn test_parse_ordered() {
        let line = Line::new("12) twelve");
        let found = parse_item(&line).unwrap();
        assert!(found.ordered);
        assert_eq!(found.marker, ')');
        assert_eq!(found.number, Some(12));
        assert_eq!(found.first, "twelve");
    }

    #[test]
    fn test_not_an_item() {
        assert!(parse_item(&Line::new("--Rabbi")).is_none());
        assert!(parse_item(&Line::new("*emphasis*")).is_none());
        assert!(parse_item(&Line::new("3.14 is pi")).is_none());
    }

    #[test]
    fn test_empty_item() {
        let line = Line::new("-");
        let found = parse_item(&line).unwrap();
        assert_eq!(found.first, "");
        assert_eq!(found.content_indent, 2);
    }
}
