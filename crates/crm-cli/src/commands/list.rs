use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args};
use crm_api::{
    load_customers, CustomerSource, FallbackPolicy, FixtureSource, HttpCustomerSource,
    LoadOrigin,
};
use crm_config::FallbackMode;
use crm_core::dto::CustomerRowDto;
use crm_core::present::{results_label, EMPTY_VIEW_HINT, EMPTY_VIEW_TITLE};
use crm_core::query::{run_query, BirthdayMode, QueryParams, SortConfig, SortDirection, SortKey};
use crm_core::rules::local_today;
use crm_core::time::{local_offset, now_utc};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against full name and company
    #[arg(long, short)]
    pub search: Option<String>,
    /// all | this-week
    #[arg(long)]
    pub birthdays: Option<String>,
    /// name | company | birthday | last-interaction
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    pub desc: bool,
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "desc")]
    pub asc: bool,
    /// Skip the network and list the built-in sample customers
    #[arg(long, action = ArgAction::SetTrue)]
    pub offline: bool,
    /// Fail instead of showing sample customers when the endpoint is down
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "offline")]
    pub no_fallback: bool,
}

pub fn list_customers(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let params = build_params(ctx, &args)?;

    let policy = if args.no_fallback || ctx.config.list.fallback == FallbackMode::Fail {
        FallbackPolicy::Fail
    } else {
        FallbackPolicy::Fixtures
    };
    let source: Box<dyn CustomerSource> = if args.offline {
        Box::new(FixtureSource)
    } else {
        Box::new(HttpCustomerSource::new(&ctx.client_options())?)
    };
    let outcome = load_customers(source.as_ref(), policy)
        .with_context(|| format!("load customers from {}", ctx.config.api.base_url))?;
    if let LoadOrigin::Fallback { reason } = &outcome.origin {
        eprintln!("note: customer endpoint unavailable ({reason}); showing sample data");
    }

    let now = now_utc();
    let today = local_today(now, local_offset())?;
    let rows: Vec<CustomerRowDto> = run_query(outcome.collection.as_slice(), &params, today)
        .into_iter()
        .map(|customer| CustomerRowDto::from_customer(customer, today, now))
        .collect();

    if ctx.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("{EMPTY_VIEW_TITLE}. {EMPTY_VIEW_HINT}");
        return Ok(());
    }
    print!("{}", render_table(&rows, params.sort));
    println!("{}", results_label(rows.len()));
    Ok(())
}

fn build_params(ctx: &Context<'_>, args: &ListArgs) -> Result<QueryParams> {
    let mut params = ctx.config.list.initial_query();
    if let Some(search) = &args.search {
        params.search = search.clone();
    }
    if let Some(raw) = &args.birthdays {
        params.birthdays = raw.parse::<BirthdayMode>()?;
    }
    if let Some(raw) = &args.sort {
        let key = raw.parse::<SortKey>()?;
        params.sort = SortConfig::new(key, SortDirection::Asc);
    }
    if args.desc {
        params.sort.direction = SortDirection::Desc;
    } else if args.asc {
        params.sort.direction = SortDirection::Asc;
    }
    if params.search.chars().any(char::is_control) {
        return Err(invalid_input("search text cannot contain control characters"));
    }
    Ok(params)
}

fn render_table(rows: &[CustomerRowDto], sort: SortConfig) -> String {
    let header: Vec<String> = SortKey::ALL
        .iter()
        .map(|key| {
            if *key == sort.key {
                let arrow = match sort.direction {
                    SortDirection::Asc => "▲",
                    SortDirection::Desc => "▼",
                };
                format!("{} {}", key.title(), arrow)
            } else {
                key.title().to_string()
            }
        })
        .collect();

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            let birthday = if row.birthday_this_week {
                format!("{} (this week)", row.birthday)
            } else {
                row.birthday.clone()
            };
            let interaction = if row.channel_label.is_empty() {
                row.last_interaction.clone()
            } else {
                format!("{} ({})", row.last_interaction, row.channel_label)
            };
            [row.full_name.clone(), row.company.clone(), birthday, interaction]
        })
        .collect();

    let mut widths = [0usize; 4];
    for (idx, title) in header.iter().enumerate() {
        widths[idx] = title.chars().count();
    }
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, header.iter().map(String::as_str), &widths);
    for row in &cells {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 4]) {
    let line = cells
        .zip(widths.iter())
        .map(|(cell, width)| pad(cell, *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let mut padded = value.to_string();
    padded.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    padded
}

#[cfg(test)]
mod tests {
    use super::render_table;
    use crm_core::dto::CustomerRowDto;
    use crm_core::fixtures::fallback_customers;
    use crm_core::query::{SortConfig, SortDirection, SortKey};
    use chrono::NaiveDate;

    #[test]
    fn table_aligns_columns_and_marks_sort() {
        let customers = fallback_customers();
        let today = NaiveDate::from_ymd_opt(2025, 6, 28).unwrap();
        let rows: Vec<CustomerRowDto> = customers
            .iter()
            .take(2)
            .map(|c| CustomerRowDto::from_customer(c, today, 1_751_112_000))
            .collect();
        let table = render_table(&rows, SortConfig::new(SortKey::Company, SortDirection::Desc));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Full name"));
        assert!(lines[0].contains("Company ▼"));
        assert!(lines[1].starts_with("Ana García"));
        assert!(lines[1].contains("February 15"));
        assert!(lines[1].contains("(Phone)"));
        assert_eq!(char_column(lines[1], "TechCorp"), char_column(lines[0], "Company"));
        assert_eq!(char_column(lines[2], "Innovate"), char_column(lines[0], "Company"));
    }

    fn char_column(line: &str, needle: &str) -> usize {
        let byte = line.find(needle).expect("needle present");
        line[..byte].chars().count()
    }
}
