//! Section and line item labels
//!
//! Sections are numbered with uppercase Roman numerals (I, II, III, ...) and
//! line items with bijective base-26 letters (A ... Z, AA, AB, ...), unless
//! the input supplies an explicit section label.

const ROMAN_VALUES: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Convert a positive integer to an uppercase Roman numeral.
///
/// Zero yields an empty string. Values above 3999 keep prepending `M`.
pub fn to_roman(mut value: u32) -> String {
    let mut out = String::new();
    for &(amount, symbol) in ROMAN_VALUES.iter() {
        while value >= amount {
            out.push_str(symbol);
            value -= amount;
        }
    }
    out
}

/// Convert a zero-based index to a bijective base-26 letter label.
///
/// 0 → "A", 25 → "Z", 26 → "AA", 52 → "BA". Negative input yields "".
pub fn to_letters(index: i64) -> String {
    if index < 0 {
        return String::new();
    }
    let letter = char::from(b'A' + (index % 26) as u8);
    if index < 26 {
        return letter.to_string();
    }
    let mut prefix = to_letters(index / 26 - 1);
    prefix.push(letter);
    prefix
}

/// Label for the section at `index` (zero-based) in display order
pub fn section_label(index: usize, explicit: Option<&str>) -> String {
    match explicit.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => to_roman(index as u32 + 1),
    }
}

/// Label for the line item at `index` (zero-based) within its section
pub fn item_label(index: usize) -> String {
    to_letters(index as i64)
}
