use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::LazyLock;

use crate::error::{CrustError, Result};

pub const DEFAULT_REGION: &str = "us-east-1";

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("fence pattern is valid"));

/// AWS Price List service codes the model may assign to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceCode {
    #[serde(rename = "AmazonEC2")]
    Ec2,
    #[serde(rename = "AmazonS3")]
    S3,
    #[serde(rename = "AmazonRDS")]
    Rds,
    #[serde(rename = "AmazonLambda")]
    Lambda,
    #[serde(rename = "AmazonRoute53")]
    Route53,
    #[serde(rename = "AmazonCloudFront")]
    CloudFront,
    #[serde(rename = "AmazonRedshift")]
    Redshift,
    #[serde(rename = "AmazonSQS")]
    Sqs,
}

impl ServiceCode {
    pub const ALL: [ServiceCode; 8] = [
        ServiceCode::Ec2,
        ServiceCode::S3,
        ServiceCode::Rds,
        ServiceCode::Lambda,
        ServiceCode::Route53,
        ServiceCode::CloudFront,
        ServiceCode::Redshift,
        ServiceCode::Sqs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCode::Ec2 => "AmazonEC2",
            ServiceCode::S3 => "AmazonS3",
            ServiceCode::Rds => "AmazonRDS",
            ServiceCode::Lambda => "AmazonLambda",
            ServiceCode::Route53 => "AmazonRoute53",
            ServiceCode::CloudFront => "AmazonCloudFront",
            ServiceCode::Redshift => "AmazonRedshift",
            ServiceCode::Sqs => "AmazonSQS",
        }
    }
}

impl fmt::Display for ServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Azure,
    Gcp,
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudProvider::Aws => write!(f, "aws"),
            CloudProvider::Azure => write!(f, "azure"),
            CloudProvider::Gcp => write!(f, "gcp"),
        }
    }
}

/// One infrastructure resource, normalized for a price lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResourceDescriptor {
    pub service_code: ServiceCode,
    pub friendly_name: String,
    #[serde(deserialize_with = "nullable")]
    pub instance_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub region: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub quantity: Option<f64>,
}

// Present-but-null is fine, absent is not.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl ResourceDescriptor {
    pub fn region_or_default(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn quantity_or_default(&self) -> f64 {
        self.quantity.unwrap_or(1.0)
    }
}

/// Resources before and after the plan, as extracted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChangeSet {
    pub old_resources: Vec<ResourceDescriptor>,
    pub new_resources: Vec<ResourceDescriptor>,
    pub cloud_provider: CloudProvider,
}

impl ChangeSet {
    pub fn is_supported(&self) -> bool {
        self.cloud_provider == CloudProvider::Aws
    }

    /// Parses a model answer, rejecting anything that deviates from the schema.
    pub fn from_model_output(content: &str) -> Result<Self> {
        let json = extract_json(content);
        if json.is_empty() {
            return Err(CrustError::ModelResponseInvalid(
                "empty change set".to_string(),
            ));
        }

        serde_json::from_str(json).map_err(|e| {
            CrustError::ModelResponseInvalid(format!("change set does not match schema: {}", e))
        })
    }

    /// Strict JSON schema sent with the extraction request.
    pub fn json_schema() -> Value {
        let service_codes: Vec<&str> = ServiceCode::ALL.iter().map(|c| c.as_str()).collect();

        let resource = json!({
            "type": "object",
            "properties": {
                "serviceCode": { "type": "string", "enum": service_codes },
                "friendlyName": { "type": "string" },
                "instanceType": { "type": ["string", "null"] },
                "region": { "type": ["string", "null"] },
                "quantity": { "type": ["number", "null"] }
            },
            "required": ["serviceCode", "friendlyName", "instanceType", "region", "quantity"],
            "additionalProperties": false
        });

        json!({
            "type": "object",
            "properties": {
                "oldResources": { "type": "array", "items": resource.clone() },
                "newResources": { "type": "array", "items": resource },
                "cloudProvider": { "type": "string", "enum": ["aws", "azure", "gcp"] }
            },
            "required": ["oldResources", "newResources", "cloudProvider"],
            "additionalProperties": false
        })
    }
}

/// Strips a Markdown code fence around a JSON answer, if there is one.
pub fn extract_json(content: &str) -> &str {
    match CODE_FENCE.captures(content).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => content.trim(),
    }
}
