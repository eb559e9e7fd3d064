use inline_diff_json::escape::escape_json;
use inline_diff_json::word::layout_segments;
use inline_diff_json::{
    explode_words, parse_body, word_diff, DiffRecord, DiffSink, DiffType, HighlightType,
    InlineJsonRenderer, LinkDirection, WordDiffLine, WordOp,
};

fn single_record(renderer: &InlineJsonRenderer) -> DiffRecord {
    let mut records = parse_body(renderer.body()).unwrap();
    assert_eq!(records.len(), 1);
    records.remove(0)
}

fn assert_ranges_well_formed(record: &DiffRecord) {
    let mut previous_end = 0;
    for range in &record.highlight_ranges {
        assert!(range.start >= previous_end, "ranges overlap: {:?}", record);
        assert!(range.end() <= record.text.len(), "range out of bounds: {:?}", record);
        previous_end = range.end();
    }
}

#[test]
fn test_context_scenario() {
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_context("hello", "", 1, 1);

    let record = single_record(&renderer);
    assert_eq!(record.kind, DiffType::Context);
    assert_eq!(record.line_number, 1);
    assert_eq!(record.section_title, None);
    assert_eq!(record.move_info, None);
    assert_eq!(record.text, "hello");
    assert!(record.highlight_ranges.is_empty());
}

#[test]
fn test_deleted_empty_line_scenario() {
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_deleted("", "", 5, 0);

    let record = single_record(&renderer);
    assert_eq!(record.kind, DiffType::Change);
    assert_eq!(record.text, " ");
    assert_eq!(record.highlight_ranges.len(), 1);
    let range = record.highlight_ranges[0];
    assert_eq!((range.start, range.length), (0, 1));
    assert_eq!(range.kind, HighlightType::Delete);
}

#[test]
fn test_added_line_covers_full_raw_length() {
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_added("tab\there \"quoted\" naïve", "", 0, 7);

    let record = single_record(&renderer);
    assert_eq!(record.line_number, 7);
    assert_eq!(record.highlight_ranges[0].length, record.text.len());
    assert_eq!(record.highlight_ranges[0].kind, HighlightType::Add);
    assert!(renderer.body().contains(r#"tab\there \"quoted\" naïve"#));
}

#[test]
fn test_pure_move_source_scenario() {
    let text = "A paragraph with \"quotes\" that moved.";
    let mut renderer = InlineJsonRenderer::default();
    let words = explode_words(text);
    let ops = vec![WordOp::Copy(words)];
    let line = WordDiffLine {
        show_right: false,
        src_anchor: "movedpara_3_9_lhs",
        dst_anchor: "movedpara_3_9_rhs",
        move_downward: true,
        ..WordDiffLine::change(text, text, "", 3, 2)
    };
    renderer.render_word_ops(&line, &ops);

    let record = single_record(&renderer);
    assert_eq!(record.kind, DiffType::MoveSource);
    assert_eq!(record.text, text);
    assert!(record.highlight_ranges.is_empty());
    let link = record.move_info.unwrap();
    assert_eq!(link.id, "movedpara_3_9_lhs");
    assert_eq!(link.link_id, "movedpara_3_9_rhs");
    assert_eq!(link.link_direction, LinkDirection::Down);
    assert!(renderer
        .body()
        .contains(&format!("\"text\": \"{}\"", escape_json(text))));
}

#[test]
fn test_change_scenario() {
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_word_diff(&WordDiffLine::change("cat sat", "cat ran", "", 1, 1));

    let record = single_record(&renderer);
    assert_eq!(record.kind, DiffType::Change);
    assert_eq!(record.move_info, None);
    assert_eq!(record.text, "cat satran");
    assert_eq!(record.highlight_ranges.len(), 2);

    let delete = record.highlight_ranges[0];
    assert_eq!((delete.start, delete.length, delete.kind), (4, 3, HighlightType::Delete));
    assert_eq!(&record.text[delete.start..delete.end()], "sat");

    let add = record.highlight_ranges[1];
    assert_eq!((add.start, add.length, add.kind), (7, 3, HighlightType::Add));
    assert_eq!(&record.text[add.start..add.end()], "ran");
}

#[test]
fn test_move_source_suppresses_added_words_and_highlights() {
    let src = "keep old words here";
    let dst = "keep new words here too";
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_word_diff(&WordDiffLine {
        show_right: false,
        src_anchor: "l",
        dst_anchor: "r",
        ..WordDiffLine::change(src, dst, "", 1, 0)
    });

    let record = single_record(&renderer);
    assert_eq!(record.kind, DiffType::MoveSource);
    assert_eq!(record.text, src);
    assert!(record.highlight_ranges.is_empty());
}

#[test]
fn test_move_destination_renders_like_change() {
    let src = "keep old words here";
    let dst = "keep new words here too";

    let mut change = InlineJsonRenderer::default();
    change.on_word_diff(&WordDiffLine::change(src, dst, "", 1, 1));
    let mut destination = InlineJsonRenderer::default();
    destination.on_word_diff(&WordDiffLine {
        show_left: false,
        src_anchor: "r",
        dst_anchor: "l",
        ..WordDiffLine::change(src, dst, "", 1, 1)
    });

    let change = single_record(&change);
    let destination = single_record(&destination);
    assert_eq!(destination.kind, DiffType::MoveDestination);
    assert_eq!(destination.text, change.text);
    assert_eq!(destination.highlight_ranges, change.highlight_ranges);
    assert_eq!(destination.move_info.unwrap().link_direction, LinkDirection::Up);
}

#[test]
fn test_offsets_count_raw_bytes_not_escaped_bytes() {
    let src = "say \"a\" now";
    let dst = "say \"b\" now";
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_word_diff(&WordDiffLine::change(src, dst, "", 1, 1));

    let record = single_record(&renderer);
    assert_ranges_well_formed(&record);
    let deleted: Vec<&str> = record
        .highlight_ranges
        .iter()
        .filter(|r| r.kind == HighlightType::Delete)
        .map(|r| &record.text[r.start..r.end()])
        .collect();
    assert_eq!(deleted, vec!["a"]);
}

#[test]
fn test_raw_segments_round_trip_to_text_field() {
    let cases = [
        ("plain words only", "plain words changed"),
        ("tabs\tand \"quotes\"", "tabs\tand \\backslashes\\"),
        ("ctrl \u{1} byte", "ctrl \u{2} byte"),
        ("東京 is big", "大阪 is big"),
        ("", "all new"),
        ("all gone", ""),
    ];

    for (src, dst) in cases {
        for is_move_source in [false, true] {
            let src_words = explode_words(src);
            let dst_words = explode_words(dst);
            let ops = word_diff(&src_words, &dst_words, 1_000_000);
            let raw: String = layout_segments(&ops, is_move_source)
                .iter()
                .map(|s| s.text)
                .collect();

            let mut renderer = InlineJsonRenderer::default();
            renderer.render_word_ops(
                &WordDiffLine {
                    show_right: !is_move_source,
                    ..WordDiffLine::change(src, dst, "", 1, 1)
                },
                &ops,
            );

            let expected = format!("\"text\": \"{}\", \"highlightRanges\"", escape_json(&raw));
            assert!(renderer.body().contains(&expected), "{:?} -> {:?}", src, dst);

            let record = single_record(&renderer);
            assert_eq!(record.text, raw);
            assert_ranges_well_formed(&record);
        }
    }
}

#[test]
fn test_word_diff_range_wire_shape() {
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_word_diff(&WordDiffLine::change("a b c", "a x c y", "", 1, 1));
    assert!(renderer.body().contains(r#""type": 1 },{"start": "#));
    assert!(renderer.body().ends_with(r#""type": 0 }]}"#));
}

#[test]
fn test_callbacks_append_in_order() {
    let mut renderer = InlineJsonRenderer::default();
    renderer.on_block_header(1, 1);
    renderer.on_context("one", "Intro", 1, 1);
    renderer.on_deleted("two", "Intro", 2, 1);
    renderer.on_added("deux", "Intro", 2, 2);
    renderer.on_word_diff(&WordDiffLine::change("three 3", "three III", "Intro", 3, 3));

    let records = parse_body(renderer.body()).unwrap();
    let kinds: Vec<DiffType> = records.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiffType::Context,
            DiffType::Change,
            DiffType::Change,
            DiffType::Change
        ]
    );
    assert!(records
        .iter()
        .all(|r| r.section_title.as_deref() == Some("Intro")));
    assert_eq!(
        records.iter().map(|r| r.line_number).collect::<Vec<_>>(),
        vec![1, 1, 2, 3]
    );
}
