//! Display formatting for tables (ru-RU conventions)

use chrono::NaiveDate;

const GROUP_SEPARATOR: char = '\u{a0}';

/// Group an integer amount by thousands: `25600` -> `25 600`
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Money rounded to whole roubles
pub fn format_money(amount: f64) -> String {
    format!("{} руб.", group_thousands(amount.round() as i64))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Bar made of `ch`, one character per 5 percent
pub fn percent_bar(percent: u32, ch: char) -> String {
    std::iter::repeat(ch).take((percent / 5) as usize).collect()
}

/// Colour band used for load percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadClass {
    Low,
    Medium,
    High,
}

impl LoadClass {
    pub fn of(load_percent: u32) -> Self {
        if load_percent < 30 {
            LoadClass::Low
        } else if load_percent < 70 {
            LoadClass::Medium
        } else {
            LoadClass::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadClass::Low => "low",
            LoadClass::Medium => "medium",
            LoadClass::High => "high",
        }
    }
}

/// Colour band used for profitability percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfitClass {
    Low,
    Medium,
    High,
}

impl ProfitClass {
    pub fn of(profitability: u32) -> Self {
        if profitability >= 30 {
            ProfitClass::High
        } else if profitability >= 10 {
            ProfitClass::Medium
        } else {
            ProfitClass::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfitClass::Low => "low",
            ProfitClass::Medium => "medium",
            ProfitClass::High => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(25600), "25\u{a0}600");
        assert_eq!(group_thousands(1234567), "1\u{a0}234\u{a0}567");
        assert_eq!(group_thousands(-4000), "-4\u{a0}000");
    }

    #[test]
    fn test_format_money_and_date() {
        assert_eq!(format_money(87500.4), "87\u{a0}500 руб.");
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(format_date(date), "09.01.2024");
    }

    #[test]
    fn test_classes() {
        assert_eq!(LoadClass::of(29), LoadClass::Low);
        assert_eq!(LoadClass::of(30), LoadClass::Medium);
        assert_eq!(LoadClass::of(70), LoadClass::High);
        assert_eq!(ProfitClass::of(40), ProfitClass::High);
        assert_eq!(ProfitClass::of(10), ProfitClass::Medium);
        assert_eq!(ProfitClass::of(9), ProfitClass::Low);
    }

    #[test]
    fn test_percent_bar() {
        assert_eq!(percent_bar(80, '#'), "################");
        assert_eq!(percent_bar(4, '#'), "");
    }
}
