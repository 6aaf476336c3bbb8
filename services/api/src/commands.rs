use crate::infra::inventory_service;
use clap::Args;
use std::path::PathBuf;
use tariff_risk::config::AppConfig;
use tariff_risk::error::AppError;
use tariff_risk::telemetry;
use tariff_risk::workflows::advisory::AdvisoryReport;
use tariff_risk::workflows::inventory::{
    ImportSummary, InventoryItem, InventorySummary, LineItemCandidate,
};
use tariff_risk::workflows::risk::{QuantityUnit, SignalResult};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Item name, e.g. "Steel"
    #[arg(long)]
    pub(crate) item: String,
    /// Industry the item belongs to
    #[arg(long)]
    pub(crate) industry: String,
    /// Country the item is imported from
    #[arg(long)]
    pub(crate) country: String,
    /// Quantity; thousands separators are accepted
    #[arg(long)]
    pub(crate) quantity: String,
    /// Quantity unit (defaults to kg)
    #[arg(long)]
    pub(crate) unit: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file with Item Name, Industry, Origin Country, Quantity and optional Unit columns
    pub(crate) path: PathBuf,
    /// Unit applied to rows without one
    #[arg(long, default_value = "kg")]
    pub(crate) default_unit: String,
    /// Print the import summary as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = inventory_service(&config)?;

    let mut candidate = LineItemCandidate::new(args.item, args.industry, args.country, args.quantity);
    if let Some(unit) = args.unit {
        candidate = candidate.with_unit(unit);
    }

    let item = service.submit(candidate).await?;
    render_item(&item);
    Ok(())
}

pub(crate) async fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = inventory_service(&config)?;

    let file = std::fs::File::open(&args.path)?;
    let default_unit = QuantityUnit::parse(&args.default_unit);
    let summary = service.import(file, &default_unit).await?;

    if args.json {
        let inventory = InventorySummary::from_items(&summary.items);
        let payload = serde_json::json!({
            "imported": summary.imported,
            "skipped": summary.skipped,
            "items": summary.items,
            "summary": inventory,
        });
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        render_import(&args.path, &summary);
    }
    Ok(())
}

fn signal_line(label: &str, signal: &SignalResult) -> String {
    if signal.is_unavailable() {
        format!("- {label}: 0 (signal data unavailable)")
    } else {
        format!(
            "- {label}: {} ({} of {} articles flagged)",
            signal.score(),
            signal.flagged_count(),
            signal.evidence().len()
        )
    }
}

pub(crate) fn render_item(item: &InventoryItem) {
    let breakdown = &item.risk_breakdown;
    let report = AdvisoryReport::for_item(item);

    println!("Tariff risk for {} ({})", item.item_name, item.id);
    println!(
        "{} from {}, {} {}",
        item.industry, item.origin_country, item.quantity, item.unit
    );

    println!("\nSignals");
    println!("{}", signal_line("Country", &breakdown.country));
    println!("{}", signal_line("Item", &breakdown.item));
    println!("{}", signal_line("Industry", &breakdown.industry));
    println!("- Quantity: {}", breakdown.quantity.score());

    println!(
        "\nFinal score: {}/100 ({})",
        breakdown.final_score, breakdown.final_level
    );

    let flagged: Vec<_> = breakdown
        .country
        .flagged_evidence()
        .chain(breakdown.item.flagged_evidence())
        .chain(breakdown.industry.flagged_evidence())
        .collect();
    if !flagged.is_empty() {
        println!("\nFlagged news");
        for evidence in flagged {
            println!("- {} <{}>", evidence.title, evidence.url);
        }
    }

    println!("\nAdvice");
    println!("{}", report.advice);
    println!("\nAlternative sourcing: {}", report.alternatives.join(", "));

    println!("\nNews summaries");
    println!("- Country: {}", report.signal_summaries.country);
    println!("- Item: {}", report.signal_summaries.item);
    println!("- Industry: {}", report.signal_summaries.industry);
}

pub(crate) fn render_import(path: &std::path::Path, summary: &ImportSummary) {
    println!("Inventory import: {}", path.display());
    println!(
        "Imported {} rows, skipped {}",
        summary.imported, summary.skipped
    );

    if summary.items.is_empty() {
        println!("\nNo rows were scored.");
        return;
    }

    println!(
        "\n{:<24} {:<18} {:<16} {:>12} {:>6}  {}",
        "Item", "Industry", "Origin", "Quantity", "Score", "Level"
    );
    for item in &summary.items {
        println!(
            "{:<24} {:<18} {:<16} {:>12} {:>6}  {}",
            truncate(&item.item_name, 24),
            truncate(&item.industry, 18),
            truncate(&item.origin_country, 16),
            format!("{} {}", item.quantity, item.unit),
            item.final_score(),
            item.level()
        );
    }

    let inventory = InventorySummary::from_items(&summary.items);
    println!(
        "\nLevels: {} high, {} medium, {} low | average score {:.1}",
        inventory.high, inventory.medium, inventory.low, inventory.average_score
    );
    if inventory.items_with_unavailable_signals > 0 {
        println!(
            "{} items scored with unavailable signal data",
            inventory.items_with_unavailable_signals
        );
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_character_width() {
        assert_eq!(truncate("Steel", 24), "Steel");
        assert_eq!(truncate("Telecommunications", 8), "Telecom~");
        assert_eq!(truncate("Café au lait", 5), "Café~");
    }

    #[test]
    fn unavailable_signals_are_called_out() {
        assert_eq!(
            signal_line("Country", &SignalResult::unavailable()),
            "- Country: 0 (signal data unavailable)"
        );
        assert_eq!(
            signal_line("Item", &SignalResult::from_flags(Vec::new(), [])),
            "- Item: 0 (0 of 0 articles flagged)"
        );
    }
}
