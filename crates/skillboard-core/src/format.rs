//! Number and text formatting for leaderboard cells

/// Fixed to one decimal place
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

/// Fixed to one decimal place with a `%` suffix
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Group digits in threes: `1234567` -> `1,234,567`
pub fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Global rank cell text; zero or missing means unranked
pub fn global_rank(rank: Option<u64>) -> String {
    match rank {
        Some(rank) if rank > 0 => format!("#{}", grouped(rank)),
        _ => "Unranked".to_string(),
    }
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
