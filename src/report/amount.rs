/// Read a locale-formatted integer such as `8,690,366`, `1.200.000` or `-782,497`.
///
/// Both `.` and `,` are thousands separators in the reports this crate reads.
/// An empty string is 0; anything else that does not parse is also 0, since
/// callers only hand over tokens they already matched as numeric.
pub fn parse_amount(s: &str) -> i64 {
    let digits: String = s.trim().chars().filter(|c| *c != '.' && *c != ',').collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().unwrap_or(0)
}

/// Non-negative variant for unit counts.
pub fn parse_count(s: &str) -> u64 {
    u64::try_from(parse_amount(s)).unwrap_or(0)
}
