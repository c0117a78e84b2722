//! Report command implementations

use anyhow::Result;
use tally_core::models::Granularity;
use tally_core::DateFilter;

use super::{print_json, truncate, App};

/// Filters for the category breakdown
#[derive(Debug, Clone, Default)]
pub struct CategoryQuery {
    pub filter: DateFilter,
    pub from: Option<String>,
    pub to: Option<String>,
    pub categories: Vec<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn cmd_trends(
    app: &App,
    granularity: Granularity,
    filter: DateFilter,
    from: Option<&str>,
    to: Option<&str>,
    json: bool,
) -> Result<()> {
    let trends = app.get_trends(granularity, filter, from, to)?;

    if json {
        return print_json(&trends);
    }

    println!();
    println!("📈 Spending Trends ({}, {})", granularity, filter);
    println!("   ─────────────────────────────────────────────────────────────");

    if trends.total_by_period.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    let mut header = format!("   {:9}", "Period");
    for category in &trends.categories {
        header.push_str(&format!(" │ {:>12}", truncate(category, 12)));
    }
    header.push_str(&format!(" │ {:>10}", "Total"));
    println!("{}", header);

    for point in &trends.total_by_period {
        let mut line = format!("   {:9}", point.date);
        for category in &trends.categories {
            let amount = trends
                .data
                .get(category)
                .and_then(|series| series.iter().find(|p| p.date == point.date))
                .map(|p| p.amount);
            match amount {
                Some(amount) => line.push_str(&format!(" │ {:>12.2}", amount)),
                None => line.push_str(&format!(" │ {:>12}", "-")),
            }
        }
        line.push_str(&format!(" │ {:>10.2}", point.amount));
        println!("{}", line);
    }

    Ok(())
}

pub fn cmd_forecast(app: &App, json: bool) -> Result<()> {
    let forecast = app.get_forecast()?;

    if json {
        return print_json(&forecast);
    }

    println!();
    println!("🔮 Next Month Forecast");
    println!("   ─────────────────────────────────────────────────────────────");

    if forecast.forecasts.is_empty() {
        println!("   Not enough recent spending to forecast.");
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>6}",
        "Category", "Forecast", "%", "Months"
    );
    println!("   ──────────────────────────┼────────────┼────────┼────────");
    for entry in &forecast.forecasts {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>6}",
            truncate(&entry.category, 25),
            entry.total,
            entry.percentage,
            entry.count
        );
    }
    println!();
    println!("   Total: ${:.2}", forecast.total_forecast);
    println!(
        "   Confidence: {:.0}% (based on {} months)",
        forecast.confidence * 100.0,
        forecast.based_on_months
    );

    Ok(())
}

pub fn cmd_categories(app: &App, query: CategoryQuery, json: bool) -> Result<()> {
    let analysis = app.get_category_analysis(
        query.filter,
        query.from.as_deref(),
        query.to.as_deref(),
        query.categories,
        query.min,
        query.max,
    )?;

    if json {
        return print_json(&analysis);
    }

    println!();
    println!("📊 Spending by Category ({})", analysis.period);
    println!("   ─────────────────────────────────────────────────────────────");

    if analysis.categories.is_empty() {
        println!("   No spending found in this period.");
        return Ok(());
    }

    println!("   Total: ${:.2}", analysis.total_spending);
    println!("   Top category: {}", analysis.top_category);
    println!();
    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5} │ {:>9}",
        "Category", "Amount", "%", "Count", "Average"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────┼───────────");
    for category in &analysis.categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5} │ {:>9.2}",
            truncate(&category.category, 25),
            category.total,
            category.percentage,
            category.count,
            category.average
        );
    }

    Ok(())
}
