use chrono::NaiveDate;

pub fn format_birthday(birthday: Option<NaiveDate>) -> String {
    match birthday {
        Some(date) => date.format("%B %-d").to_string(),
        None => "Invalid Date".to_string(),
    }
}

pub fn results_label(count: usize) -> String {
    if count == 1 {
        "1 customer found".to_string()
    } else {
        format!("{count} customers found")
    }
}

pub const EMPTY_VIEW_TITLE: &str = "No customers found";
pub const EMPTY_VIEW_HINT: &str = "Try adjusting the search filters.";
