//! Monthly on-demand prices from the AWS Price List service.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_pricing as pricing;
use aws_sdk_pricing::types::{Filter as PricingFilter, FilterType as PricingFilterType};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::change_set::{ResourceDescriptor, ServiceCode};
use crate::error::{CrustError, Result};

pub const HOURS_PER_MONTH: f64 = 730.0;
pub const MAX_RESULTS: i32 = 100;

/// The Price List API is only served from a handful of regions.
const PRICING_API_REGION: &str = "us-east-1";

/// A single TERM_MATCH constraint of a product query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFilter {
    pub field: &'static str,
    pub value: String,
}

impl PriceFilter {
    fn term_match(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Builds the ordered filter set for one resource.
    pub fn for_resource(resource: &ResourceDescriptor) -> Vec<PriceFilter> {
        let mut filters = vec![PriceFilter::term_match(
            "regionCode",
            resource.region_or_default(),
        )];

        if let Some(instance_type) = &resource.instance_type {
            filters.push(PriceFilter::term_match("instanceType", instance_type.as_str()));
        }

        if resource.service_code == ServiceCode::Ec2 {
            let instance_type = resource.instance_type.as_deref().unwrap_or_default();
            filters.push(PriceFilter::term_match("operatingSystem", "Linux"));
            filters.push(PriceFilter::term_match("tenancy", "Shared"));
            filters.push(PriceFilter::term_match(
                "usagetype",
                format!("BoxUsage:{}", instance_type),
            ));
            filters.push(PriceFilter::term_match("preInstalledSw", "NA"));
        }

        filters
    }

    fn to_sdk(&self) -> Result<PricingFilter> {
        PricingFilter::builder()
            .field(self.field)
            .value(self.value.clone())
            .r#type(PricingFilterType::TermMatch)
            .build()
            .map_err(|e| CrustError::Pricing(format!("failed to build {} filter: {}", self.field, e)))
    }
}

/// Source of serialized price list products.
#[async_trait]
pub trait PriceCatalog: Send + Sync {
    /// Returns at most `max_results` product documents, as JSON strings.
    async fn get_products(
        &self,
        service_code: ServiceCode,
        filters: &[PriceFilter],
        max_results: i32,
    ) -> Result<Vec<String>>;
}

/// Client for the AWS Price List `GetProducts` API
pub struct AwsPriceCatalog {
    client: pricing::Client,
}

impl AwsPriceCatalog {
    /// Uses the default AWS credential chain. No request is made until the
    /// first lookup.
    pub async fn from_env() -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(pricing::config::Region::new(PRICING_API_REGION))
            .load()
            .await;

        Self {
            client: pricing::Client::new(&config),
        }
    }
}

#[async_trait]
impl PriceCatalog for AwsPriceCatalog {
    async fn get_products(
        &self,
        service_code: ServiceCode,
        filters: &[PriceFilter],
        max_results: i32,
    ) -> Result<Vec<String>> {
        let filters = filters
            .iter()
            .map(PriceFilter::to_sdk)
            .collect::<Result<Vec<_>>>()?;

        let output = self
            .client
            .get_products()
            .service_code(service_code.as_str())
            .set_filters(Some(filters))
            .max_results(max_results)
            .send()
            .await
            .map_err(|e| CrustError::Pricing(format!("{}", pricing::error::DisplayErrorContext(e))))?;

        Ok(output.price_list().to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct PriceListProduct {
    terms: ProductTerms,
}

#[derive(Debug, Deserialize)]
struct ProductTerms {
    #[serde(rename = "OnDemand")]
    on_demand: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct OnDemandTerm {
    #[serde(rename = "priceDimensions")]
    price_dimensions: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PriceDimension {
    #[serde(rename = "pricePerUnit")]
    price_per_unit: PricePerUnit,
}

#[derive(Debug, Deserialize)]
struct PricePerUnit {
    #[serde(rename = "USD")]
    usd: String,
}

/// Hourly USD price of a product document.
///
/// Takes the first on-demand term and its first price dimension, in document
/// order. There is no ranking between several matching products or terms.
pub fn unit_price(product: &str) -> Result<f64> {
    let product: PriceListProduct = serde_json::from_str(product)
        .map_err(|e| CrustError::Pricing(format!("malformed product: {}", e)))?;

    let term = product
        .terms
        .on_demand
        .into_iter()
        .next()
        .map(|(_, term)| term)
        .ok_or_else(|| CrustError::Pricing("product has no on-demand terms".to_string()))?;
    let term: OnDemandTerm = serde_json::from_value(term)
        .map_err(|e| CrustError::Pricing(format!("malformed on-demand term: {}", e)))?;

    let dimension = term
        .price_dimensions
        .into_iter()
        .next()
        .map(|(_, dimension)| dimension)
        .ok_or_else(|| CrustError::Pricing("term has no price dimensions".to_string()))?;
    let dimension: PriceDimension = serde_json::from_value(dimension)
        .map_err(|e| CrustError::Pricing(format!("malformed price dimension: {}", e)))?;

    dimension
        .price_per_unit
        .usd
        .trim()
        .parse::<f64>()
        .map_err(|e| CrustError::Pricing(format!("invalid USD price {:?}: {}", dimension.price_per_unit.usd, e)))
}

pub struct PricingLookup<C> {
    catalog: C,
}

impl<C: PriceCatalog> PricingLookup<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Estimated monthly cost of one resource. Failures are logged and
    /// priced at zero so one bad lookup never stops the others.
    pub async fn monthly_cost(&self, resource: &ResourceDescriptor) -> f64 {
        match self.try_monthly_cost(resource).await {
            Ok(cost) => cost,
            Err(e) => {
                tracing::error!(
                    service_code = %resource.service_code,
                    instance_type = resource.instance_type.as_deref().unwrap_or("N/A"),
                    region = resource.region_or_default(),
                    "Error getting price for {}: {}",
                    resource.friendly_name,
                    e
                );
                0.0
            }
        }
    }

    pub async fn try_monthly_cost(&self, resource: &ResourceDescriptor) -> Result<f64> {
        let filters = PriceFilter::for_resource(resource);
        tracing::debug!(
            service_code = %resource.service_code,
            filters = filters.len(),
            "querying price list for {}",
            resource.friendly_name
        );

        let products = self
            .catalog
            .get_products(resource.service_code, &filters, MAX_RESULTS)
            .await?;

        let Some(first) = products.first() else {
            tracing::debug!("no priced products for {}", resource.friendly_name);
            return Ok(0.0);
        };

        let hourly = unit_price(first)?;
        Ok(hourly * resource.quantity_or_default() * HOURS_PER_MONTH)
    }
}
