//! Property-based tests for inspection-report
//!
//! Numbering, ordering and pagination invariants using proptest.

use inspection_report::numbering::{to_letters, to_roman};
use inspection_report::{compose_report, parse_report, RenderOptions, ReportMetadata};
use proptest::prelude::*;
use serde_json::{json, Value};

fn roman_value(numeral: &str) -> u32 {
    let digit = |c: char| match c {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => panic!("not a numeral: {}", c),
    };
    let digits: Vec<u32> = numeral.chars().map(digit).collect();
    let mut total: i64 = 0;
    for (i, d) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(next) if next > d => total -= *d as i64,
            _ => total += *d as i64,
        }
    }
    total as u32
}

fn letters_value(label: &str) -> i64 {
    label
        .bytes()
        .fold(0i64, |acc, b| acc * 26 + i64::from(b - b'A' + 1))
        - 1
}

/// One section whose line items carry `lines[i]` single-line comment rows each
fn report_with(lines: &[usize]) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let text = (0..*n).map(|l| format!("row {}", l)).collect::<Vec<_>>().join("\n");
            json!({
                "order": i,
                "name": format!("Item {}", i),
                "inspectionStatus": "I",
                "comments": [{"text": text}]
            })
        })
        .collect();
    json!({"reportId": "P-1", "sections": [{"name": "Systems", "lineItems": items}]})
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================================
    // Numbering
    // ============================================================

    #[test]
    fn roman_numerals_round_trip(n in 1u32..4000) {
        let numeral = to_roman(n);
        prop_assert!(numeral.chars().all(|c| "IVXLCDM".contains(c)));
        prop_assert_eq!(roman_value(&numeral), n);
    }

    #[test]
    fn letter_labels_are_bijective(n in 0i64..100_000) {
        let label = to_letters(n);
        prop_assert!(!label.is_empty());
        prop_assert!(label.chars().all(|c| c.is_ascii_uppercase()));
        prop_assert_eq!(letters_value(&label), n);
        prop_assert_ne!(label, to_letters(n + 1));
    }

    #[test]
    fn negative_letter_index_is_empty(n in i64::MIN..0) {
        prop_assert_eq!(to_letters(n), "");
    }

    // ============================================================
    // Ordering
    // ============================================================

    #[test]
    fn line_items_sorted_stably(orders in prop::collection::vec(0u8..5, 1..30)) {
        let items: Vec<Value> = orders
            .iter()
            .enumerate()
            .map(|(i, o)| json!({"order": o, "name": i.to_string()}))
            .collect();
        let root = json!({"sections": [{"name": "S", "lineItems": items}]});
        let input = parse_report(&root).unwrap();
        let composed = compose_report(&input.sections, &input.metadata, &RenderOptions::default()).unwrap();

        let normalized: Vec<(f64, usize)> = composed.sections[0]
            .line_items
            .iter()
            .map(|item| (item.order, item.name.parse::<usize>().unwrap()))
            .collect();
        for pair in normalized.windows(2) {
            prop_assert!(pair[0].0 <= pair[1].0);
            if pair[0].0 == pair[1].0 {
                prop_assert!(pair[0].1 < pair[1].1, "ties must keep input order");
            }
        }
    }

    #[test]
    fn comments_sorted_stably_on_the_page(orders in prop::collection::vec(0u8..4, 1..30)) {
        let comments: Vec<Value> = orders
            .iter()
            .enumerate()
            .map(|(i, o)| json!({"order": o, "text": format!("comment-{}", i)}))
            .collect();
        let root = json!({"sections": [{"name": "S", "lineItems": [{"name": "Item", "comments": comments}]}]});
        let input = parse_report(&root).unwrap();
        let composed = compose_report(&input.sections, &input.metadata, &RenderOptions::default()).unwrap();

        let mut expected: Vec<(u8, usize)> = orders.iter().copied().zip(0..).collect();
        expected.sort_by_key(|&(order, _)| order);
        let expected: Vec<String> = expected.iter().map(|(_, i)| format!("comment-{}", i)).collect();

        let normalized: Vec<String> = composed.sections[0].line_items[0]
            .comments
            .iter()
            .map(|c| c.text.clone())
            .collect();
        prop_assert_eq!(&normalized, &expected);

        let drawn: Vec<String> = composed
            .pages
            .iter()
            .flat_map(|page| page.texts())
            .filter(|text| text.starts_with("comment-"))
            .map(String::from)
            .collect();
        prop_assert_eq!(&drawn, &expected);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(25))]

    // ============================================================
    // Pagination
    // ============================================================

    #[test]
    fn pagination_never_drops_lines(lines in prop::collection::vec(1usize..90, 1..8)) {
        let input = parse_report(&report_with(&lines)).unwrap();
        let composed = compose_report(&input.sections, &input.metadata, &RenderOptions::default()).unwrap();

        // Section heading, one heading per item, every comment row
        let expected = 1 + lines.len() + lines.iter().sum::<usize>();
        let placed: usize = composed.layout.blocks().map(|(_, b)| b.lines.len()).sum();
        prop_assert_eq!(placed, expected);

        let total = composed.page_count();
        prop_assert!(total >= 1);
        for (i, page) in composed.pages.iter().enumerate() {
            let footer = format!("Page {} of {}", i + 1, total);
            prop_assert!(page.contains_text(&footer));
            prop_assert!(page.contains_text("Report Identification: P-1"));
        }
    }

    #[test]
    fn page_count_is_deterministic(lines in prop::collection::vec(1usize..60, 1..6)) {
        let input = parse_report(&report_with(&lines)).unwrap();
        let metadata = ReportMetadata::new("P-2");
        let first = compose_report(&input.sections, &metadata, &RenderOptions::default()).unwrap();
        let second = compose_report(&input.sections, &metadata, &RenderOptions::default()).unwrap();
        prop_assert_eq!(first.page_count(), second.page_count());
        prop_assert_eq!(first.pages, second.pages);
    }
}
