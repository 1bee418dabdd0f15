use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::domain::Customer;
use crate::query::params::{BirthdayMode, QueryParams, SortDirection, SortKey};
use crate::rules::is_birthday_this_week;

/// Derives the visible customer list: filter by search text and birthday
/// window, then stable-sort by the configured key.
pub fn run_query<'a>(
    records: &'a [Customer],
    params: &QueryParams,
    today: NaiveDate,
) -> Vec<&'a Customer> {
    let needle = params.search.to_lowercase();
    let mut view: Vec<&Customer> = records
        .iter()
        .filter(|customer| customer.matches_search(&needle))
        .filter(|customer| match params.birthdays {
            BirthdayMode::All => true,
            BirthdayMode::ThisWeek => is_birthday_this_week(customer.birthday, today),
        })
        .collect();

    let direction = params.sort.direction;
    match params.sort.key {
        SortKey::Name => sort_by_text(&mut view, direction, |c| c.full_name.as_str()),
        SortKey::Company => sort_by_text(&mut view, direction, |c| c.company.as_str()),
        SortKey::Birthday => {
            view.sort_by(|a, b| compare_missing_last(a.birthday, b.birthday, direction))
        }
        SortKey::LastInteraction => view.sort_by(|a, b| {
            compare_missing_last(
                a.last_interaction.occurred_at,
                b.last_interaction.occurred_at,
                direction,
            )
        }),
    }

    view
}

fn sort_by_text<F>(view: &mut [&Customer], direction: SortDirection, project: F)
where
    F: Fn(&Customer) -> &str,
{
    view.sort_by_cached_key(|customer| project(customer).to_lowercase());
    if direction == SortDirection::Desc {
        // Reversing a stable ascending sort would also reverse ties.
        reverse_keeping_ties(view, |c| project(c).to_lowercase());
    }
}

fn reverse_keeping_ties<K, F>(view: &mut [&Customer], key: F)
where
    K: Eq,
    F: Fn(&Customer) -> K,
{
    view.reverse();
    let mut start = 0;
    while start < view.len() {
        let current = key(view[start]);
        let mut end = start + 1;
        while end < view.len() && key(view[end]) == current {
            end += 1;
        }
        view[start..end].reverse();
        start = end;
    }
}

fn compare_missing_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
