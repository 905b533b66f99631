use glide_keystroke::encode_keystroke;
use pretty_assertions::assert_eq;

use super::*;

fn table_with(entries: &[(&str, &'static str)]) -> MappingTable<&'static str> {
	let mut table = MappingTable::new();
	for (seq, value) in entries {
		table.add(&encode_keystroke(seq), *value).unwrap();
	}
	table
}

#[test]
fn find_returns_exactly_what_was_registered() {
	let table = table_with(&[("j", "scroll_down"), ("gg", "scroll_top"), ("<Ctrl-6>", "last_tab")]);
	assert_eq!(table.find(&encode_keystroke("j")), Some(&"scroll_down"));
	assert_eq!(table.find(&encode_keystroke("gg")), Some(&"scroll_top"));
	assert_eq!(table.find(&encode_keystroke("<Ctrl-6>")), Some(&"last_tab"));
	assert_eq!(table.find(&encode_keystroke("k")), None);
}

#[test]
fn remove_then_find_returns_none() {
	let mut table = table_with(&[("gg", "scroll_top"), ("g$", "last_visible_tab")]);
	assert_eq!(table.remove(&encode_keystroke("gg")), Some("scroll_top"));
	assert_eq!(table.find(&encode_keystroke("gg")), None);
	// Sibling under the same prefix survives the prune.
	assert_eq!(table.find(&encode_keystroke("g$")), Some(&"last_visible_tab"));
	assert_eq!(table.len(), 1);

	// Removing an unbound sequence is a no-op.
	assert_eq!(table.remove(&encode_keystroke("zz")), None);
	assert_eq!(table.len(), 1);
}

#[test]
fn duplicate_add_keeps_original() {
	let mut table = table_with(&[("j", "scroll_down")]);
	let err = table.add(&encode_keystroke("j"), "something_else").unwrap_err();
	assert_eq!(err.sequence, "j");
	assert_eq!(table.find(&encode_keystroke("j")), Some(&"scroll_down"));
	assert_eq!(table.len(), 1);
}

#[test]
fn match_prefix_distinguishes_exact_from_ambiguous() {
	let table = table_with(&[("g", "cancel"), ("gg", "scroll_top"), ("g$", "last_visible_tab")]);

	match table.match_prefix(&encode_keystroke("g")) {
		PrefixMatch::Ambiguous(value) => assert_eq!(*value, "cancel"),
		other => panic!("expected ambiguous match, got {other:?}"),
	}
	match table.match_prefix(&encode_keystroke("gg")) {
		PrefixMatch::Complete(value) => assert_eq!(*value, "scroll_top"),
		other => panic!("expected complete match, got {other:?}"),
	}
	assert!(matches!(table.match_prefix(&encode_keystroke("x")), PrefixMatch::None));
}

#[test]
fn pending_reports_completion_count() {
	let table = table_with(&[("gg", "scroll_top"), ("g$", "last_visible_tab"), ("gu", "parent")]);
	match table.match_prefix(&encode_keystroke("g")) {
		PrefixMatch::Pending { completions } => assert_eq!(completions, 3),
		other => panic!("expected pending, got {other:?}"),
	}
}

#[test]
fn bound_sequences_are_sorted_and_complete() {
	let table = table_with(&[("gg", "a"), ("j", "b"), ("<Ctrl-6>", "c")]);
	let words: Vec<String> = table
		.bound_sequences()
		.iter()
		.map(|seq| glide_keystroke::decode_keystroke(seq))
		.collect();
	assert_eq!(words, vec!["<Ctrl-6>", "gg", "j"]);
}

#[test]
fn descriptor_annotations_listing() {
	let mut table: MappingTable<ActionDescriptor<&'static str>> = MappingTable::new();
	table
		.add(&encode_keystroke("f"), ActionDescriptor::new("open_hint", "#1Open a link"))
		.unwrap();
	table
		.add(&encode_keystroke("j"), ActionDescriptor::new("scroll_down", "Scroll down"))
		.unwrap();
	table
		.add(&encode_keystroke("zz"), ActionDescriptor::new("noop", ""))
		.unwrap();

	let entries = table.annotations();
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0].word, "f");
	assert_eq!(entries[0].feature_group, Some(1));
	assert_eq!(entries[0].annotation, "Open a link");
	assert_eq!(entries[1].word, "j");
	assert_eq!(entries[1].feature_group, None);
}

#[test]
fn remap_moves_binding_and_records_origin() {
	let mut table: MappingTable<ActionDescriptor<&'static str>> = MappingTable::new();
	table
		.add(&encode_keystroke("f"), ActionDescriptor::new("open_hint", "#1Open a link"))
		.unwrap();
	table
		.add(&encode_keystroke("t"), ActionDescriptor::new("new_tab", "Open a tab"))
		.unwrap();

	// Move `f` onto `t`, displacing the old `t` binding.
	let desc = table.remap(&encode_keystroke("t"), &encode_keystroke("f"), None).unwrap();
	assert_eq!(desc.handler, "open_hint");
	assert_eq!(desc.origin_keystroke.as_deref(), Some("f"));
	assert_eq!(desc.annotation.feature_group, Some(1));

	assert!(table.find(&encode_keystroke("f")).is_none());
	assert_eq!(table.len(), 1);
}

#[test]
fn remap_of_unbound_sequence_is_a_no_op() {
	let mut table: MappingTable<ActionDescriptor<&'static str>> = MappingTable::new();
	table
		.add(&encode_keystroke("t"), ActionDescriptor::new("new_tab", "Open a tab"))
		.unwrap();
	assert!(table.remap(&encode_keystroke("x"), &encode_keystroke("q"), None).is_none());
	assert_eq!(table.find(&encode_keystroke("t")).unwrap().handler, "new_tab");
}

#[test]
fn remap_can_reannotate() {
	let mut table: MappingTable<ActionDescriptor<&'static str>> = MappingTable::new();
	table
		.add(&encode_keystroke("f"), ActionDescriptor::new("open_hint", "#1Open a link"))
		.unwrap();
	let desc = table
		.remap(&encode_keystroke("F"), &encode_keystroke("f"), Some("#2Open in new tab"))
		.unwrap();
	assert_eq!(desc.annotation.feature_group, Some(2));
	assert_eq!(desc.annotation.text, "Open in new tab");
}
