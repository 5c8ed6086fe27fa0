//! Cost delta between the resources a plan removes or replaces and the ones
//! it creates.

use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

use crate::change_set::{ChangeSet, CloudProvider, ResourceDescriptor, DEFAULT_REGION};
use crate::error::Result;
use crate::llm::{CompletionRequest, LanguageModel};
use crate::pricing::{PriceCatalog, PricingLookup};
use crate::prompts::{PromptKind, PromptLibrary};

#[derive(Debug, Clone, PartialEq)]
pub struct PricedResource {
    pub resource: ResourceDescriptor,
    /// Monthly USD
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostReport {
    pub old_total: f64,
    pub new_total: f64,
    pub delta: f64,
    /// `None` when there was nothing to compare against
    pub delta_percent: Option<f64>,
    pub old_priced: Vec<PricedResource>,
    pub new_priced: Vec<PricedResource>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CostOutcome {
    Report(CostReport),
    UnsupportedProvider(CloudProvider),
}

pub const UNSUPPORTED_PROVIDER_NOTICE: &str = "Cloud provider not supported yet. You can contribute to the project by adding support for your cloud provider.";

/// Prices both resource lists in order, one lookup at a time.
pub async fn aggregate<C: PriceCatalog>(
    lookup: &PricingLookup<C>,
    old_resources: &[ResourceDescriptor],
    new_resources: &[ResourceDescriptor],
) -> CostReport {
    tracing::info!("Calculating old resources cost...");
    let (old_priced, old_total) = price_all(lookup, old_resources).await;

    tracing::info!("Calculating new resources cost...");
    let (new_priced, new_total) = price_all(lookup, new_resources).await;

    let delta = new_total - old_total;

    CostReport {
        old_total,
        new_total,
        delta,
        delta_percent: delta_percent(delta, old_total),
        old_priced,
        new_priced,
    }
}

async fn price_all<C: PriceCatalog>(
    lookup: &PricingLookup<C>,
    resources: &[ResourceDescriptor],
) -> (Vec<PricedResource>, f64) {
    let mut priced = Vec::with_capacity(resources.len());
    let mut total = 0.0;

    for resource in resources {
        let cost = lookup.monthly_cost(resource).await;
        total += cost;
        priced.push(PricedResource {
            resource: resource.clone(),
            cost,
        });
    }

    (priced, total)
}

/// Percentage change rounded to two decimals, or `None` if `old_total` is zero.
pub fn delta_percent(delta: f64, old_total: f64) -> Option<f64> {
    if old_total == 0.0 {
        return None;
    }
    let percent = delta / old_total * 100.0;
    percent.is_finite().then(|| (percent * 100.0).round() / 100.0)
}

/// Asks the model for the change set of a plan and prices it.
pub async fn analyze_cost<M, C>(
    model: &M,
    prompts: &PromptLibrary,
    lookup: &PricingLookup<C>,
    plan: &str,
) -> Result<CostOutcome>
where
    M: LanguageModel + ?Sized,
    C: PriceCatalog,
{
    let change_set = extract_change_set(model, prompts, plan).await?;

    if !change_set.is_supported() {
        return Ok(CostOutcome::UnsupportedProvider(change_set.cloud_provider));
    }

    let report = aggregate(lookup, &change_set.old_resources, &change_set.new_resources).await;
    Ok(CostOutcome::Report(report))
}

pub async fn extract_change_set<M>(model: &M, prompts: &PromptLibrary, plan: &str) -> Result<ChangeSet>
where
    M: LanguageModel + ?Sized,
{
    let request = CompletionRequest::new(prompts.render(PromptKind::Cost)?, plan)
        .with_schema("changes", ChangeSet::json_schema());

    let content = model.complete(&request).await?.unwrap_or_default();
    ChangeSet::from_model_output(&content)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostRow {
    pub resource: String,
    pub instance_type: String,
    pub cost: String,
    pub quantity: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostTable {
    pub rows: Vec<CostRow>,
}

impl CostTable {
    pub const HEADERS: [&'static str; 5] = ["Resource", "Instance Type", "Cost", "Quantity", "Region"];

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BOX_CHARS);
        table.set_titles(Row::new(
            Self::HEADERS
                .iter()
                .map(|header| Cell::new(header).style_spec("b"))
                .collect(),
        ));

        for row in &self.rows {
            table.add_row(Row::new(vec![
                Cell::new(&row.resource),
                Cell::new(&row.instance_type),
                Cell::new(&row.cost).style_spec("Fy"),
                Cell::new(&row.quantity),
                Cell::new(&row.region),
            ]));
        }

        table
    }
}

impl CostReport {
    /// Rows for the resources the plan leaves in place, in plan order.
    pub fn table(&self) -> CostTable {
        CostTable {
            rows: self
                .new_priced
                .iter()
                .map(|priced| CostRow {
                    resource: priced.resource.friendly_name.clone(),
                    instance_type: priced
                        .resource
                        .instance_type
                        .clone()
                        .unwrap_or_else(|| "N/A".to_string()),
                    cost: format_usd(priced.cost),
                    quantity: priced
                        .resource
                        .quantity
                        .map(format_quantity)
                        .unwrap_or_else(|| "1".to_string()),
                    region: priced
                        .resource
                        .region
                        .clone()
                        .unwrap_or_else(|| DEFAULT_REGION.to_string()),
                })
                .collect(),
        }
    }

    pub fn is_increase(&self) -> bool {
        self.delta > 0.0
    }

    /// `↑ $50.00 (50%)`, `↓ $12.00 (N/A)`
    pub fn difference_label(&self) -> String {
        let symbol = if self.is_increase() { "↑" } else { "↓" };
        let percent = match self.delta_percent {
            Some(percent) => format!("{}%", format_percent(percent.abs())),
            None => "N/A".to_string(),
        };
        format!("{} {} ({})", symbol, format_usd(self.delta.abs()), percent)
    }

    pub fn summary(&self) -> String {
        let difference = self.difference_label();
        let difference = if self.is_increase() {
            difference.red()
        } else {
            difference.green()
        };

        format!(
            "{}\n- Current total cost: {}\n- New total cost: {}\n- Difference: {}",
            "Summary:".bold(),
            format_usd(self.old_total).yellow(),
            format_usd(self.new_total).yellow(),
            difference
        )
    }
}

pub fn format_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

// 50.0 -> "50", 33.33 -> "33.33"
fn format_percent(percent: f64) -> String {
    let rounded = format!("{:.2}", percent);
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{}", quantity)
    }
}
