use crust::markup::*;

#[test]
fn test_single_tag_applies_style() {
    for tag in Tag::ADVERTISED {
        let input = format!("<{0}>hello</{0}>", tag.name());
        assert_eq!(render(&input), tag.apply("hello"), "tag {}", tag.name());
    }
}

#[test]
fn test_plain_text_outside_tags_is_unchanged() {
    let rendered = render("Plan: <green>2 to add</green>, 0 to destroy.");
    assert_eq!(
        rendered,
        format!("Plan: {}, 0 to destroy.", Tag::Green.apply("2 to add"))
    );
}

#[test]
fn test_text_without_tags() {
    assert_eq!(render("no markup here"), "no markup here");
    assert_eq!(render(""), "");
}

#[test]
fn test_nested_tags_outer_wraps_inner() {
    let rendered = render("<bold><red>x</red></bold>");
    assert_eq!(rendered, Tag::Bold.apply(&Tag::Red.apply("x")));
}

#[test]
fn test_nested_tags_with_surrounding_text() {
    let rendered = render("<yellow>Warning: <bold>public</bold> bucket</yellow>");
    let expected = Tag::Yellow.apply(&format!("Warning: {} bucket", Tag::Bold.apply("public")));
    assert_eq!(rendered, expected);
}

#[test]
fn test_same_tag_nested() {
    let rendered = render("<red>a<red>b</red>c</red>");
    let expected = Tag::Red.apply(&format!("a{}c", Tag::Red.apply("b")));
    assert_eq!(rendered, expected);
}

#[test]
fn test_unknown_tag_passes_through() {
    assert_eq!(render("<foo>x</foo>"), "<foo>x</foo>");
    assert_eq!(render("a < b and c > d"), "a < b and c > d");
}

#[test]
fn test_known_tag_inside_unknown_tag_is_styled() {
    let rendered = render("<foo><red>x</red></foo>");
    assert_eq!(rendered, format!("<foo>{}</foo>", Tag::Red.apply("x")));
}

#[test]
fn test_tags_are_case_sensitive() {
    assert_eq!(render("<RED>x</RED>"), "<RED>x</RED>");
}

#[test]
fn test_empty_content() {
    assert_eq!(render("<cyan></cyan>"), Tag::Cyan.apply(""));
}

#[test]
fn test_purple_maps_to_magenta() {
    use colored::Colorize;
    assert_eq!(render("<purple>p</purple>"), "p".magenta().to_string());
}

#[test]
fn test_unclosed_tag_is_literal() {
    assert_eq!(render("<red>never closed"), "<red>never closed");

    let rendered = render("<red>open <bold>b</bold>");
    assert_eq!(rendered, format!("<red>open {}", Tag::Bold.apply("b")));
}

#[test]
fn test_stray_closing_tag_is_literal() {
    assert_eq!(render("done</green>"), "done</green>");
}

#[test]
fn test_closing_outer_tag_closes_over_unclosed_inner() {
    let rendered = render("<bold><red>x</bold>");
    assert_eq!(rendered, Tag::Bold.apply("<red>x"));
}

#[test]
fn test_parse_tree_shape() {
    let tree = StyledText::parse("a<bold>b<red>c</red></bold>d");
    assert_eq!(
        tree.nodes(),
        &[
            Node::Text("a".to_string()),
            Node::Tagged(
                Tag::Bold,
                StyledText(vec![
                    Node::Text("b".to_string()),
                    Node::Tagged(Tag::Red, StyledText(vec![Node::Text("c".to_string())])),
                ])
            ),
            Node::Text("d".to_string()),
        ]
    );
}

#[test]
fn test_multiline_content() {
    let rendered = render("<underline>line one\nline two</underline>");
    assert_eq!(rendered, Tag::Underline.apply("line one\nline two"));
}

#[test]
fn test_advertised_list_omits_reset() {
    let list = Tag::advertised_list();
    assert!(list.starts_with("<red>, <green>"));
    assert!(list.ends_with("<strikethrough>"));
    assert!(!list.contains("reset"));
}

#[test]
fn test_many_unclosed_tags_are_literal() {
    let input = "<red>".repeat(10_000);
    assert_eq!(render(&input), input);
}

#[test]
fn test_nesting_past_max_depth_is_literal() {
    let extra = 5_000 - MAX_DEPTH;
    let input = format!("{}x{}", "<bold>".repeat(5_000), "</bold>".repeat(5_000));

    let mut expected = format!("{}x", "<bold>".repeat(extra));
    for _ in 0..MAX_DEPTH {
        expected = Tag::Bold.apply(&expected);
    }
    expected.push_str(&"</bold>".repeat(extra));

    assert_eq!(render(&input), expected);
}

#[test]
fn test_nesting_up_to_max_depth_is_styled() {
    let input = format!("{}x{}", "<red>".repeat(MAX_DEPTH), "</red>".repeat(MAX_DEPTH));

    let mut expected = "x".to_string();
    for _ in 0..MAX_DEPTH {
        expected = Tag::Red.apply(&expected);
    }

    assert_eq!(render(&input), expected);
}
