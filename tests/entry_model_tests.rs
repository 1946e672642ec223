use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use quill::entry::{BlockId, BlockKind, ContentBlock, DividerStyle, Entry, StoredEntry, TextSize};

fn text_size() -> impl Strategy<Value = TextSize> {
    prop_oneof![Just(TextSize::H1), Just(TextSize::H2), Just(TextSize::H3)]
}

fn divider_style() -> impl Strategy<Value = DividerStyle> {
    prop_oneof![Just(DividerStyle::Thick), Just(DividerStyle::Thin)]
}

fn content_block() -> impl Strategy<Value = ContentBlock> {
    prop_oneof![
        (text_size(), "[a-zA-Z .!?]{0,24}")
            .prop_map(|(size, content)| ContentBlock::text(size, content)),
        prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..4)
            .prop_map(ContentBlock::images),
        divider_style().prop_map(ContentBlock::divider),
    ]
}

fn empty_entry() -> Entry {
    Entry::new("Saturday", Utc.with_ymd_and_hms(2024, 5, 4, 9, 30, 0).unwrap())
}

proptest! {
    #[test]
    fn ordered_content_preserves_order(blocks in prop::collection::vec(content_block(), 0..50)) {
        let mut entry = empty_entry();
        entry.set_ordered_content(blocks.clone());

        prop_assert_eq!(entry.ordered_content(), blocks.as_slice());
        prop_assert_eq!(entry.block_count(), blocks.len());

        let kinds: Vec<BlockKind> = entry.refs().iter().map(|r| r.kind).collect();
        let expected: Vec<BlockKind> = blocks.iter().map(ContentBlock::kind).collect();
        prop_assert_eq!(kinds, expected);

        let typed = entry.text_blocks().count()
            + entry.image_blocks().count()
            + entry.divider_blocks().count();
        prop_assert_eq!(typed, blocks.len());
    }

    #[test]
    fn stored_shape_round_trips(blocks in prop::collection::vec(content_block(), 0..50)) {
        let mut entry = Entry::with_blocks("Saturday", Utc.with_ymd_and_hms(2024, 5, 4, 9, 30, 0).unwrap(), blocks);
        entry.set_mood(Some(-0.25));

        let json = serde_json::to_string(&StoredEntry::from_entry(&entry)).unwrap();
        let restored = serde_json::from_str::<StoredEntry>(&json).unwrap().into_entry();
        prop_assert_eq!(restored, entry);
    }

    #[test]
    fn append_then_remove_restores_counts(
        blocks in prop::collection::vec(content_block(), 0..20),
        extra in content_block(),
    ) {
        let mut entry = Entry::with_blocks("Saturday", Utc::now(), blocks);
        let before = entry.refs();

        prop_assert!(entry.append(extra.clone()));
        prop_assert_eq!(entry.block_count(), before.len() + 1);
        prop_assert_eq!(entry.ordered_content().last(), Some(&extra));

        prop_assert_eq!(entry.remove_by_id(extra.id()), Some(extra));
        prop_assert_eq!(entry.refs(), before);
    }
}

#[test]
fn test_duplicate_append_is_refused() {
    let mut entry = empty_entry();
    let block = ContentBlock::text(TextSize::H3, "once");
    assert!(entry.append(block.clone()));
    assert!(!entry.append(block));
    assert_eq!(entry.block_count(), 1);
}

#[test]
fn test_remove_by_index_keeps_neighbours_in_order() {
    let first = ContentBlock::text(TextSize::H1, "first");
    let middle = ContentBlock::divider(DividerStyle::Thick);
    let last = ContentBlock::images(vec![vec![7]]);
    let mut entry = empty_entry();
    entry.set_ordered_content(vec![first.clone(), middle.clone(), last.clone()]);

    assert_eq!(entry.remove_by_index(1), Some(middle));
    assert_eq!(entry.ordered_content(), &[first, last][..]);
    assert_eq!(entry.remove_by_index(5), None);
}

#[test]
fn test_get_block_checks_kind() {
    let text = ContentBlock::text(TextSize::H3, "hello");
    let mut entry = empty_entry();
    entry.append(text.clone());

    let good = text.block_ref();
    assert_eq!(entry.get_block(&good), Some(&text));

    let mut wrong_kind = good;
    wrong_kind.kind = BlockKind::Divider;
    assert_eq!(entry.get_block(&wrong_kind), None);

    let mut missing = good;
    missing.id = BlockId::new();
    assert_eq!(entry.get_block(&missing), None);
}

#[test]
fn test_update_text_block() {
    let text = ContentBlock::text(TextSize::H3, "draft");
    let divider = ContentBlock::divider(DividerStyle::Thin);
    let mut entry = empty_entry();
    entry.append_many(vec![text.clone(), divider.clone()]);

    assert!(entry.update_text_block(text.id(), Some("final".to_string()), Some(TextSize::H1)));
    let updated = entry.text_blocks().next().unwrap();
    assert_eq!(updated.content, "final");
    assert_eq!(updated.size, TextSize::H1);

    assert!(!entry.update_text_block(divider.id(), Some("nope".to_string()), None));
}

#[test]
fn test_stored_entry_skips_dangling_refs_and_orphans() {
    let kept = ContentBlock::text(TextSize::H3, "kept");
    let entry = Entry::with_blocks("Monday", Utc::now(), vec![kept.clone()]);
    let mut stored = StoredEntry::from_entry(&entry);

    // A ref with no block behind it.
    stored.order.push(ContentBlock::divider(DividerStyle::Thin).block_ref());
    // A block no ref points at.
    if let ContentBlock::Images(images) = ContentBlock::images(vec![vec![1, 2]]) {
        stored.image_blocks.push(images);
    }

    let restored = stored.into_entry();
    assert_eq!(restored.ordered_content(), &[kept][..]);
}

#[test]
fn test_mood_is_clamped() {
    let mut entry = empty_entry();
    entry.set_mood(Some(3.0));
    assert_eq!(entry.mood(), Some(1.0));
    entry.set_mood(Some(f64::NAN));
    assert_eq!(entry.mood(), None);
}

#[test]
fn test_share_text_skips_images_and_dividers() {
    let entry = Entry::with_blocks(
        "Sunday",
        Utc::now(),
        vec![
            ContentBlock::text(TextSize::H1, "Title line"),
            ContentBlock::divider(DividerStyle::Thick),
            ContentBlock::images(vec![vec![0xFF, 0xD8, 0xFF]]),
            ContentBlock::text(TextSize::H3, "Body line"),
        ],
    );
    assert_eq!(entry.share_text(), "Sunday\nTitle line\nBody line\n");
}
