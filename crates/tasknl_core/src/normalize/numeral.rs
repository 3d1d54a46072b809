//! Chinese numeral parsing for time-of-day tokens.

/// Parses ASCII digits or a small Chinese numeral (`三`, `十一`, `二十三`).
///
/// Multi-character numerals without `十` (e.g. `一二`) are rejected.
pub fn parse_cn_number(raw: &str) -> Option<u32> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return value.parse().ok();
    }

    if let Some((tens_part, ones_part)) = value.split_once('十') {
        let tens = if tens_part.is_empty() {
            1
        } else {
            single_digit(tens_part)?
        };
        let ones = if ones_part.is_empty() {
            0
        } else {
            single_digit(ones_part)?
        };
        return Some(tens * 10 + ones);
    }

    single_digit(value)
}

fn single_digit(value: &str) -> Option<u32> {
    let mut chars = value.chars();
    let digit = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match digit {
        '零' | '〇' => Some(0),
        '一' => Some(1),
        '二' | '两' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_cn_number;

    #[test]
    fn parses_single_digits_and_ascii() {
        assert_eq!(parse_cn_number("三"), Some(3));
        assert_eq!(parse_cn_number("两"), Some(2));
        assert_eq!(parse_cn_number("〇"), Some(0));
        assert_eq!(parse_cn_number("08"), Some(8));
    }

    #[test]
    fn parses_compound_forms_split_on_ten() {
        assert_eq!(parse_cn_number("十"), Some(10));
        assert_eq!(parse_cn_number("十一"), Some(11));
        assert_eq!(parse_cn_number("二十"), Some(20));
        assert_eq!(parse_cn_number("二十三"), Some(23));
    }

    #[test]
    fn rejects_unparseable_numerals() {
        assert_eq!(parse_cn_number(""), None);
        assert_eq!(parse_cn_number("一二"), None);
        assert_eq!(parse_cn_number("十十"), None);
        assert_eq!(parse_cn_number("百"), None);
        assert_eq!(parse_cn_number("二十三四"), None);
    }
}
