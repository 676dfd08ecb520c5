//! Pure derivations over the cached street listing.
//!
//! Every function here takes a slice and returns a new `Vec`; the input is
//! never reordered or modified.

use std::cmp::Ordering;

use tankstellen_core::Street;

/// Keep the records whose address contains `term`, ignoring case.
///
/// The term is trimmed first; an empty term returns every record.
#[must_use]
pub fn filter(records: &[Street], term: &str) -> Vec<Street> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|street| street.address.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Direction of an address sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Records ordered by address in the given direction.
#[must_use]
pub fn sort(records: &[Street], order: SortOrder) -> Vec<Street> {
    match order {
        SortOrder::Ascending => sort_ascending(records),
        SortOrder::Descending => sort_descending(records),
    }
}

/// Records ordered by address, A before Z.
#[must_use]
pub fn sort_ascending(records: &[Street]) -> Vec<Street> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| locale_cmp(&a.address, &b.address));
    sorted
}

/// Records ordered by address, Z before A.
#[must_use]
pub fn sort_descending(records: &[Street]) -> Vec<Street> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| locale_cmp(&b.address, &a.address));
    sorted
}

/// Compare two addresses the way a German reader expects.
///
/// Case and common Latin diacritics are folded (`Ä` sorts with `a`, `ß` as
/// `ss`). Strings that fold to the same key fall back to a letter-by-letter
/// comparison where lowercase precedes uppercase, so the result is a total
/// order and `bonner` sorts before `Bonner`.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    sort_key(a)
        .cmp(&sort_key(b))
        .then_with(|| a.chars().map(case_rank).cmp(b.chars().map(case_rank)))
}

/// Tie-break rank of a character: base letter, then case, then raw value.
fn case_rank(c: char) -> (char, bool, char) {
    (c.to_lowercase().next().unwrap_or(c), c.is_uppercase(), c)
}

/// Folded comparison key for an address.
#[must_use]
pub fn sort_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for lower in text.chars().flat_map(char::to_lowercase) {
        match lower {
            'ß' => key.push_str("ss"),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            other => key.push(fold_diacritic(other)),
        }
    }
    key
}

const fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => 'i',
        'ł' | 'ľ' | 'ĺ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ŕ' | 'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use tankstellen_core::StreetId;
    use uuid::Uuid;

    use super::*;

    fn street(n: u128, address: &str) -> Street {
        Street {
            id: StreetId::from(Uuid::from_u128(n)),
            address: address.to_string(),
            coordinates: None,
        }
    }

    fn streets(addresses: &[&str]) -> Vec<Street> {
        addresses
            .iter()
            .enumerate()
            .map(|(i, a)| street(i as u128 + 1, a))
            .collect()
    }

    fn addresses(records: &[Street]) -> Vec<&str> {
        records.iter().map(|s| s.address.as_str()).collect()
    }

    #[test]
    fn test_filter_matches_substring_ignoring_case() {
        let records = streets(&[
            "Bonner Str. 98 (50677 Neustadt/Süd)",
            "Hülchrather Str. 17 (50670 Neustadt/Nord)",
            "Aachener Str. 1",
        ]);

        assert_eq!(
            addresses(&filter(&records, "neustadt")),
            vec![
                "Bonner Str. 98 (50677 Neustadt/Süd)",
                "Hülchrather Str. 17 (50670 Neustadt/Nord)",
            ]
        );
        assert_eq!(
            addresses(&filter(&records, "  HÜLCH ")),
            vec!["Hülchrather Str. 17 (50670 Neustadt/Nord)"]
        );
        assert!(filter(&records, "Berlin").is_empty());
    }

    #[test]
    fn test_blank_filter_is_identity() {
        let records = streets(&["B", "A"]);
        assert_eq!(filter(&records, ""), records);
        assert_eq!(filter(&records, "   "), records);
    }

    #[test]
    fn test_sort_folds_umlauts_and_sharp_s() {
        let records = streets(&["Zülpicher Str.", "Ährenweg", "apfelweg", "Bonner Str."]);
        assert_eq!(
            addresses(&sort_ascending(&records)),
            vec!["Ährenweg", "apfelweg", "Bonner Str.", "Zülpicher Str."]
        );

        assert_eq!(locale_cmp("Straße", "Strasse"), Ordering::Greater);
        assert_eq!(sort_key("Straße"), sort_key("STRASSE"));
        assert_eq!(locale_cmp("Strassburg", "Straße 1"), Ordering::Less);
    }

    #[test]
    fn test_sort_descending_and_cache_untouched() {
        let records = streets(&["Bonner Str.", "Aachener Str.", "Chlodwigplatz"]);
        let before = records.clone();

        assert_eq!(
            addresses(&sort_descending(&records)),
            vec!["Chlodwigplatz", "Bonner Str.", "Aachener Str."]
        );
        assert_eq!(records, before);
    }

    #[test]
    fn test_locale_cmp_is_total_on_case_variants() {
        assert_eq!(locale_cmp("bonner", "Bonner"), Ordering::Less);
        assert_eq!(locale_cmp("Bonner", "bonner"), Ordering::Greater);
        assert_eq!(locale_cmp("Bonner", "Bonner"), Ordering::Equal);
        assert_eq!(locale_cmp("bonnEr", "bonner"), Ordering::Greater);
    }

    #[test]
    fn test_lowercase_variant_sorts_first() {
        let records = streets(&["Bonner Str.", "bonner str.", "Aachener Str."]);
        assert_eq!(
            addresses(&sort_ascending(&records)),
            vec!["Aachener Str.", "bonner str.", "Bonner Str."]
        );
        assert_eq!(
            addresses(&sort(&records, SortOrder::Descending)),
            vec!["Bonner Str.", "bonner str.", "Aachener Str."]
        );
    }

    fn records_strategy() -> impl Strategy<Value = Vec<Street>> {
        prop::collection::vec("[a-zA-ZäöüÄÖÜß .0-9]{0,16}", 0..12).prop_map(|list| {
            list.iter()
                .enumerate()
                .map(|(i, a)| street(i as u128 + 1, a))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_empty_filter_is_identity(records in records_strategy()) {
            prop_assert_eq!(filter(&records, ""), records);
        }

        #[test]
        fn prop_filter_ignores_case(records in records_strategy(), term in "[a-zA-Z]{1,3}") {
            prop_assert_eq!(
                filter(&records, &term.to_uppercase()),
                filter(&records, &term.to_lowercase())
            );
        }

        #[test]
        fn prop_filter_is_idempotent(records in records_strategy(), term in "[a-zA-Zäö ]{0,3}") {
            let once = filter(&records, &term);
            prop_assert_eq!(filter(&once, &term), once);
        }

        #[test]
        fn prop_descending_reverses_ascending(records in records_strategy()) {
            let mut seen = std::collections::HashSet::new();
            let distinct: Vec<Street> = records
                .into_iter()
                .filter(|s| seen.insert(s.address.clone()))
                .collect();

            let mut ascending = sort_ascending(&distinct);
            ascending.reverse();
            prop_assert_eq!(sort_descending(&distinct), ascending);
        }

        #[test]
        fn prop_sort_keeps_input(records in records_strategy()) {
            let before = records.clone();
            let sorted = sort_ascending(&records);
            prop_assert_eq!(&records, &before);
            prop_assert_eq!(sorted.len(), records.len());
        }
    }
}
