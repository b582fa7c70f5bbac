use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::scoring::{CompositeScore, IndexTier, RubricTable};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Index tier label, colored by band when `use_colors` is set
pub fn format_index_tier(tier: IndexTier, use_colors: bool) -> String {
    let label = tier.as_str();
    if !use_colors {
        return label.to_string();
    }
    match tier {
        IndexTier::Exceptional => label.bold().green().to_string(),
        IndexTier::Distinguished => label.green().to_string(),
        IndexTier::Notable => label.yellow().to_string(),
        IndexTier::Curated => label.dimmed().to_string(),
    }
}

/// Format a score record with its per-dimension breakdown (multi-line)
pub fn format_score_detail(record: &CompositeScore, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let header = format!(
        "{}  {} ({})  rubric v{}",
        record.property_id,
        record.tier,
        record.tier.label(),
        record.rubric_version
    );
    lines.push(if use_colors { header.bold().to_string() } else { header });

    let name_width = record
        .contributions
        .iter()
        .map(|c| c.dimension.len())
        .max()
        .unwrap_or(0);

    for c in &record.contributions {
        lines.push(format!(
            "  {:<name_width$}  raw {:>6}  weight {:>6}  -> {:>6.2}",
            c.dimension,
            c.raw,
            c.weight,
            c.contribution,
            name_width = name_width
        ));
    }

    let value = format!("{:.1}", record.composite_value);
    lines.push(format!(
        "  Clarus Index: {}  {}",
        if use_colors { value.bold().to_string() } else { value },
        format_index_tier(record.index_tier, use_colors)
    ));

    if let Some(ref editorial) = record.editorial_override {
        if record.is_overridden() {
            lines.push(format!(
                "  Capped at {} by editorial override (computed {}): {}",
                editorial.max_tier, record.computed_tier, editorial.reason
            ));
        } else {
            lines.push(format!(
                "  Editorial cap {} not applied: {}",
                editorial.max_tier, editorial.reason
            ));
        }
    }

    lines.push(format!("  Computed at {}", record.computed_at.to_rfc3339()));
    lines.join("\n")
}

/// Format stored records one per line: index, timestamp, version, value, tier
pub fn format_history_table(records: &[CompositeScore], use_colors: bool) -> String {
    if records.is_empty() {
        return "No scores recorded.".to_string();
    }

    records
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            let index_str = format!("{:>2}.", idx + 1);
            let marker = if r.is_overridden() { "*" } else { "" };
            format!(
                "{} {}  v{:<3} {:>5.1}  {}{}",
                if use_colors { index_str.dimmed().to_string() } else { index_str },
                r.computed_at.format("%Y-%m-%d %H:%M"),
                r.rubric_version,
                r.composite_value,
                format_index_tier(r.index_tier, use_colors),
                marker
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format every registered rubric: dimensions, weights, ranges, thresholds
pub fn format_rubrics(table: &RubricTable, use_colors: bool) -> String {
    let tiers = table.tiers();
    if tiers.is_empty() {
        return "No rubrics registered.".to_string();
    }

    let mut sections = Vec::new();
    for tier in tiers {
        for version in table.versions(tier) {
            let Ok(rubric) = table.get_rubric_version(tier, version) else {
                continue;
            };
            let mut lines = Vec::new();
            let header = format!("{} ({}) v{}", tier, tier.label(), version);
            lines.push(if use_colors { header.bold().to_string() } else { header });
            for dim in &rubric.dimensions {
                lines.push(format!(
                    "  {:<24} weight {:>6}  range [{}, {}]",
                    dim.name, dim.weight, dim.range.min, dim.range.max
                ));
            }
            let t = &rubric.thresholds;
            lines.push(format!(
                "  thresholds: EXCEPTIONAL >= {}, DISTINGUISHED >= {}, NOTABLE >= {} (total weight {})",
                t.exceptional, t.distinguished, t.notable, rubric.total_weight
            ));
            sections.push(lines.join("\n"));
        }
    }
    sections.join("\n\n")
}

/// One verification line per stored record
pub fn format_verification(record: &CompositeScore, reproduced: bool, use_colors: bool) -> String {
    let status = if reproduced { "ok" } else { "MISMATCH" };
    let status = match (use_colors, reproduced) {
        (true, true) => status.green().to_string(),
        (true, false) => status.red().bold().to_string(),
        (false, _) => status.to_string(),
    };
    format!(
        "{} {}  v{}  {:.1} {}",
        status,
        record.computed_at.format("%Y-%m-%d %H:%M"),
        record.rubric_version,
        record.composite_value,
        record.index_tier
    )
}
