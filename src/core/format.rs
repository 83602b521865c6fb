//! Rupee formatting for summary cards, table cells and chart labels.

pub const RUPEE: char = '₹';

const LAKH: f64 = 100_000.0;

/// Whole rupees with Indian digit grouping, e.g. `₹11,61,695`.
pub fn format_inr(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };
    format!("{RUPEE}{sign}{}", group_indian(&digits))
}

/// Y-axis tick in lakhs with one decimal, e.g. `₹11.6L`.
pub fn format_lakhs(amount: f64) -> String {
    format!("{RUPEE}{:.1}L", amount / LAKH)
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
