//! Plain-text rendering of an [`AggregateResult`] for terminals and logs.

use crate::aggregate::{AggregateResult, PivotTable};
use crate::dataset::Domains;
use crate::models::Ranked;
use num_format::{Locale, ToFormattedString};
use std::fmt::Write;

/// Map a user-provided locale tag to a num-format Locale and decimal separator.
/// Supported tags (case-insensitive): "en", "us", "en_US", "de", "de_DE", "german", "fr", "es", "it", "pt", "nl"
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Format a number with locale thousands separators and a fixed number of decimals,
/// e.g. `1234.5` -> `"1,234.50"` (en) or `"1.234,50"` (de).
pub fn format_amount(v: f64, decimals: usize, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "NA".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let fixed = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut out = String::new();
    // No sign on values that round to zero.
    if v < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    match int_part.parse::<u128>() {
        Ok(n) => out.push_str(&n.to_formatted_string(locale)),
        Err(_) => out.push_str(int_part),
    }
    if decimals > 0 {
        out.push(dec_sep);
        out.push_str(frac_part);
    }
    out
}

fn write_ranking(out: &mut String, title: &str, rows: &[Ranked], locale_tag: &str) {
    let _ = writeln!(out, "{title}");
    if rows.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let width = rows.iter().map(|r| r.key.chars().count()).max().unwrap_or(0);
    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {:<width$}  {}",
            i + 1,
            r.key,
            format_amount(r.total, 2, locale_tag)
        );
    }
}

fn write_pivot(out: &mut String, pivot: &PivotTable, locale_tag: &str) {
    let _ = writeln!(out, "Sales by region and category");
    if pivot.is_empty() {
        let _ = writeln!(out, "  (no data)");
        return;
    }
    let formatted: Vec<Vec<String>> = pivot
        .cells
        .iter()
        .map(|row| row.iter().map(|v| format_amount(*v, 0, locale_tag)).collect())
        .collect();
    let head_w = pivot.rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let col_w: Vec<usize> = pivot
        .columns
        .iter()
        .enumerate()
        .map(|(c, name)| {
            formatted
                .iter()
                .map(|row| row[c].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let _ = write!(out, "  {:<head_w$}", "");
    for (name, w) in pivot.columns.iter().zip(&col_w) {
        let _ = write!(out, "  {name:>w$}");
    }
    let _ = writeln!(out);
    for (row, cells) in pivot.rows.iter().zip(&formatted) {
        let _ = write!(out, "  {row:<head_w$}");
        for (cell, w) in cells.iter().zip(&col_w) {
            let _ = write!(out, "  {cell:>w$}");
        }
        let _ = writeln!(out);
    }
}

/// Render KPIs, rankings, the time series and the pivot as text.
pub fn render(result: &AggregateResult, locale_tag: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Records:         {}", result.record_count);
    let _ = writeln!(
        out,
        "Total sales:     {}",
        format_amount(result.total_sales, 2, locale_tag)
    );
    let _ = writeln!(
        out,
        "Total quantity:  {}",
        format_amount(result.total_quantity, 0, locale_tag)
    );
    let avg = match result.average_price {
        Some(v) => format_amount(v, 2, locale_tag),
        None => "NA".to_string(),
    };
    let _ = writeln!(out, "Average price:   {avg}");
    let _ = writeln!(out);

    write_ranking(&mut out, "Top products", &result.top_products, locale_tag);
    let _ = writeln!(out);
    write_ranking(&mut out, "Sales by category", &result.sales_by_category, locale_tag);
    let _ = writeln!(out);
    write_ranking(&mut out, "Sales by region", &result.sales_by_region, locale_tag);
    let _ = writeln!(out);

    let _ = writeln!(out, "Sales over time");
    if result.sales_over_time.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for p in &result.sales_over_time {
        let _ = writeln!(out, "  {}  {}", p.date, format_amount(p.total, 2, locale_tag));
    }
    let _ = writeln!(out);

    write_pivot(&mut out, &result.region_category_pivot, locale_tag);
    out
}

/// Render the filter domains a caller can choose from.
pub fn render_domains(domains: &Domains) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Regions:    {}", domains.regions.join(", "));
    let _ = writeln!(out, "Categories: {}", domains.categories.join(", "));
    if domains.years.is_single_year() {
        let _ = writeln!(out, "Years:      {} (only year available)", domains.years.min);
    } else {
        let _ = writeln!(out, "Years:      {}:{}", domains.years.min, domains.years.max);
    }
    out
}
