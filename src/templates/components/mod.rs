use maud::{html, Markup};

pub mod error;
pub mod fields;

pub use fields::{flash_error, number_field, text_field};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        section class="card" {
            h3 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

/// Unix seconds as `YYYY-MM-DD`, UTC.
pub fn date_label(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Whole currency units with thousands separators.
pub fn price_label(price: i64) -> String {
    let digits = price.abs().to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if price < 0 {
        out.insert(0, '-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_label_groups_thousands() {
        assert_eq!(price_label(0), "0");
        assert_eq!(price_label(999), "999");
        assert_eq!(price_label(4_500_000), "4,500,000");
    }

    #[test]
    fn date_label_is_utc_day() {
        assert_eq!(date_label(86_400), "1970-01-02");
    }
}
