//! Keyword-based category suggestion.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Category, TransactionType};

/// Winning category and the keyword that selected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMatch {
    pub category_id: Uuid,
    pub category_name: String,
    pub keyword: String,
}

/// Pick the category whose keyword occurs in `description`.
///
/// Matching is a case-insensitive substring test. When a transaction type is
/// given, only categories of the same kind compete (transfers may land
/// anywhere). The longest matching keyword wins; equal lengths fall back to
/// category name, then id, so the result does not depend on input order.
pub fn categorize(
    description: &str,
    transaction_type: Option<TransactionType>,
    categories: &[Category],
) -> Option<CategoryMatch> {
    let haystack = description.to_lowercase();
    if haystack.trim().is_empty() {
        return None;
    }
    let haystack = haystack.as_str();

    categories
        .iter()
        .filter(|c| match (transaction_type, c.parsed_kind()) {
            (None, _) => true,
            (Some(ty), Some(kind)) => kind.accepts(ty),
            (Some(_), None) => false,
        })
        .flat_map(|c| {
            c.keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(move |k| !k.is_empty() && haystack.contains(k.as_str()))
                .map(move |k| (c, k))
        })
        .max_by(|(ca, ka), (cb, kb)| {
            ka.chars()
                .count()
                .cmp(&kb.chars().count())
                // Reversed so that max_by prefers the alphabetically first.
                .then_with(|| cb.name.cmp(&ca.name))
                .then_with(|| cb.category_id.cmp(&ca.category_id))
        })
        .map(|(c, keyword)| CategoryMatch {
            category_id: c.category_id,
            category_name: c.name.clone(),
            keyword,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::category;
    use crate::models::CategoryKind;

    fn categories() -> Vec<Category> {
        vec![
            category("Groceries", CategoryKind::Expense, &["grocery", "market"]),
            category("Coffee", CategoryKind::Expense, &["coffee", "starbucks"]),
            category("Salary", CategoryKind::Income, &["payroll", "salary"]),
            category("Supermarket", CategoryKind::Expense, &["supermarket"]),
        ]
    }

    #[test]
    fn matches_keywords_case_insensitively() {
        let cats = categories();
        let m = categorize("STARBUCKS #1234 Seattle", None, &cats).unwrap();
        assert_eq!(m.category_name, "Coffee");
        assert_eq!(m.keyword, "starbucks");
    }

    #[test]
    fn longest_keyword_wins() {
        let cats = categories();
        // "market" (Groceries) and "supermarket" both occur.
        let m = categorize("City Supermarket", None, &cats).unwrap();
        assert_eq!(m.category_name, "Supermarket");
    }

    #[test]
    fn transaction_type_restricts_candidates() {
        let cats = vec![
            category("Refunds", CategoryKind::Income, &["amazon"]),
            category("Shopping", CategoryKind::Expense, &["amazon"]),
        ];
        let expense = categorize("AMAZON MKTPLACE", Some(TransactionType::Expense), &cats);
        assert_eq!(expense.unwrap().category_name, "Shopping");

        let income = categorize("AMAZON MKTPLACE", Some(TransactionType::Income), &cats);
        assert_eq!(income.unwrap().category_name, "Refunds");
    }

    #[test]
    fn ties_break_by_name_regardless_of_order() {
        let mut cats = vec![
            category("Zoo", CategoryKind::Expense, &["ticket"]),
            category("Arts", CategoryKind::Expense, &["ticket"]),
        ];
        assert_eq!(
            categorize("museum ticket", None, &cats).unwrap().category_name,
            "Arts"
        );
        cats.reverse();
        assert_eq!(
            categorize("museum ticket", None, &cats).unwrap().category_name,
            "Arts"
        );
    }

    #[test]
    fn no_match_or_blank_input_yields_none() {
        let cats = categories();
        assert!(categorize("rent for october", None, &cats).is_none());
        assert!(categorize("   ", None, &cats).is_none());

        let blank_keyword = vec![category("Misc", CategoryKind::Expense, &["", "  "])];
        assert!(categorize("anything", None, &blank_keyword).is_none());
    }
}
