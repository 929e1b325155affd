use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format an amount with thousands separators: 1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let parts: Vec<&str> = cents.split('.').collect();
    let int_part = parts[0];
    let dec_part = parts[1];

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

/// YYYY-MM -> "Mar 2025".
pub fn month_label(year_month: &str) -> String {
    let parts: Vec<&str> = year_month.split('-').collect();
    if parts.len() != 2 {
        return year_month.to_string();
    }
    let month: usize = match parts[1].parse() {
        Ok(m) if (1..=12).contains(&m) => m,
        _ => return year_month.to_string(),
    };
    format!("{} {}", MONTH_NAMES[month - 1], parts[0])
}

/// YYYY-MM-DD -> "15 Mar" (compact, for chart axes).
pub fn axis_date_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => format!("{} {}", d.day(), MONTH_NAMES[d.month0() as usize]),
        Err(_) => String::new(),
    }
}

/// YYYY-MM-DD -> "15 Mar 2025" (full, for tooltips).
pub fn full_date_label(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => format!("{} {} {}", d.day(), MONTH_NAMES[d.month0() as usize], d.year()),
        Err(_) => String::new(),
    }
}
