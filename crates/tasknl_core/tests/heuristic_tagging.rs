use tasknl_core::slots::heuristic::order_and_dedup;
use chrono::NaiveDate;
use tasknl_core::{
    interpret_heuristic, Action, Category, CommandAssembler, EntityKind, HeuristicSlotTagger, Span,
};

fn labeled(spans: &[Span]) -> Vec<(EntityKind, &str)> {
    spans
        .iter()
        .map(|span| (span.label, span.text.as_str()))
        .collect()
}

#[test]
fn tags_every_kind_found_in_mixed_text() {
    let tagger = HeuristicSlotTagger::new();
    let spans = tagger.tag("添加买菜明天下午三点 高优先级");

    assert_eq!(
        labeled(&spans),
        vec![
            (EntityKind::Title, "买菜明天下午三点"),
            (EntityKind::Date, "明天"),
            (EntityKind::Time, "下午三点"),
            (EntityKind::Priority, "高优先级"),
        ]
    );
}

#[test]
fn spans_are_ordered_by_start_then_longest_first() {
    let tagger = HeuristicSlotTagger::new();
    let spans = tagger.tag("明天下午三点开会");
    for pair in spans.windows(2) {
        let (left, right) = (&pair[0], &pair[1]);
        assert!(
            left.start < right.start || (left.start == right.start && left.len() >= right.len())
        );
    }
    assert_eq!(spans[0].label, EntityKind::Title);
    assert_eq!(spans[0].text, "明天下午三点开会");
}

#[test]
fn overlapping_spans_with_different_labels_are_retained() {
    let tagger = HeuristicSlotTagger::new();
    let spans = tagger.tag("全天");
    assert_eq!(
        labeled(&spans),
        vec![(EntityKind::AllDay, "全天"), (EntityKind::Title, "全天")]
    );
}

#[test]
fn exact_duplicates_are_removed() {
    let text = "买菜明天";
    let title = Span::from_source(text, 0, 2, EntityKind::Title).unwrap();
    let date = Span::from_source(text, 2, 4, EntityKind::Date).unwrap();
    let whole = Span::from_source(text, 0, 4, EntityKind::Title).unwrap();

    let ordered = order_and_dedup(vec![
        date.clone(),
        title.clone(),
        date.clone(),
        whole.clone(),
        title.clone(),
    ]);
    assert_eq!(ordered, vec![whole, title, date]);
}

#[test]
fn english_phrases_are_tagged_case_insensitively() {
    let tagger = HeuristicSlotTagger::new();
    let spans = tagger.tag("Finish report for WORK tomorrow, all day, urgent");

    let found = labeled(&spans);
    assert!(found.contains(&(EntityKind::Category, "WORK")));
    assert!(found.contains(&(EntityKind::Date, "tomorrow")));
    assert!(found.contains(&(EntityKind::AllDay, "all day")));
    assert!(found.contains(&(EntityKind::Priority, "urgent")));
    assert!(found.contains(&(EntityKind::Title, "report for WORK tomorrow")));
}

fn title_of(text: &str) -> Option<String> {
    HeuristicSlotTagger::new()
        .tag(text)
        .into_iter()
        .find(|span| span.label == EntityKind::Title)
        .map(|span| span.text)
}

#[test]
fn english_keywords_match_whole_words_only() {
    let tagger = HeuristicSlotTagger::new();

    let found = tagger.tag("finish homework");
    assert!(labeled(&found).contains(&(EntityKind::Category, "homework")));

    let found = tagger.tag("follow up with client");
    assert!(found.iter().all(|span| span.label != EntityKind::Priority));

    let found = tagger.tag("buy a lifestyle magazine");
    assert!(found.iter().all(|span| span.label != EntityKind::Category));
}

#[test]
fn english_keyword_matches_feed_the_assembler() {
    let assembler = CommandAssembler::new(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());

    let command = interpret_heuristic("follow up with client tomorrow", Action::Add, 0.9, &assembler);
    assert_eq!(command.patch.priority, None);
    assert_eq!(command.patch.due_date.as_deref(), Some("2026-03-15"));

    let command = interpret_heuristic("finish homework", Action::Done, 0.9, &assembler);
    assert_eq!(command.patch.category, Some(Category::Study));
}

#[test]
fn multi_word_english_verbs_are_stripped_from_title() {
    assert_eq!(title_of("remind me to buy milk").as_deref(), Some("buy milk"));
    assert_eq!(title_of("Please add buy milk").as_deref(), Some("buy milk"));
    assert_eq!(title_of("mark not done, write report").as_deref(), Some("write report"));
    assert_eq!(title_of("undo done #4").as_deref(), Some("#4"));
    assert_eq!(title_of("Mark done").as_deref(), None);
}

#[test]
fn english_verbs_do_not_cut_into_words() {
    assert_eq!(
        title_of("address the letter").as_deref(),
        Some("address the letter")
    );
    assert_eq!(
        title_of("notebook shopping").as_deref(),
        Some("notebook shopping")
    );
    assert_eq!(title_of("add notebook").as_deref(), Some("notebook"));
}

#[test]
fn id_span_covers_digits_only() {
    let tagger = HeuristicSlotTagger::new();
    let spans = tagger.tag("完成任务12");
    let id = spans
        .iter()
        .find(|span| span.label == EntityKind::Id)
        .unwrap();
    assert_eq!((id.start, id.end, id.text.as_str()), (4, 6, "12"));
}

#[test]
fn empty_text_yields_no_spans() {
    let tagger = HeuristicSlotTagger::new();
    assert!(tagger.tag("").is_empty());
    assert!(tagger.tag("   ").is_empty());
}
