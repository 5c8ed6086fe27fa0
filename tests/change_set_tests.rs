use crust::change_set::*;
use crust::error::CrustError;

const ANSWER: &str = r#"{
    "oldResources": [
        {"serviceCode": "AmazonEC2", "friendlyName": "web", "instanceType": "t3.micro", "region": null, "quantity": null}
    ],
    "newResources": [
        {"serviceCode": "AmazonEC2", "friendlyName": "web", "instanceType": "t3.large", "region": "eu-west-1", "quantity": 2},
        {"serviceCode": "AmazonS3", "friendlyName": "assets", "instanceType": null, "region": null, "quantity": null}
    ],
    "cloudProvider": "aws"
}"#;

#[test]
fn test_parse_valid_change_set() {
    let change_set = ChangeSet::from_model_output(ANSWER).unwrap();

    assert!(change_set.is_supported());
    assert_eq!(change_set.old_resources.len(), 1);
    assert_eq!(change_set.new_resources.len(), 2);

    let web = &change_set.new_resources[0];
    assert_eq!(web.service_code, ServiceCode::Ec2);
    assert_eq!(web.instance_type.as_deref(), Some("t3.large"));
    assert_eq!(web.region_or_default(), "eu-west-1");
    assert_eq!(web.quantity_or_default(), 2.0);

    let assets = &change_set.new_resources[1];
    assert_eq!(assets.service_code, ServiceCode::S3);
    assert_eq!(assets.region_or_default(), DEFAULT_REGION);
    assert_eq!(assets.quantity_or_default(), 1.0);
}

#[test]
fn test_zero_quantity_is_kept() {
    let answer = ANSWER.replace("\"quantity\": 2", "\"quantity\": 0");
    let change_set = ChangeSet::from_model_output(&answer).unwrap();
    assert_eq!(change_set.new_resources[0].quantity_or_default(), 0.0);
}

#[test]
fn test_fenced_answer() {
    let fenced = format!("Here you go:\n```json\n{}\n```\n", ANSWER);
    let change_set = ChangeSet::from_model_output(&fenced).unwrap();
    assert_eq!(change_set, ChangeSet::from_model_output(ANSWER).unwrap());
}

#[test]
fn test_extract_json_without_fence() {
    assert_eq!(extract_json("  {\"a\": 1}\n"), "{\"a\": 1}");
    assert_eq!(extract_json("```\n[1]\n```"), "[1]");
}

#[test]
fn test_other_providers_are_unsupported() {
    for (name, provider) in [("azure", CloudProvider::Azure), ("gcp", CloudProvider::Gcp)] {
        let answer = ANSWER.replace("\"aws\"", &format!("\"{}\"", name));
        let change_set = ChangeSet::from_model_output(&answer).unwrap();
        assert_eq!(change_set.cloud_provider, provider);
        assert!(!change_set.is_supported());
    }
}

#[test]
fn test_rejects_unknown_service_code() {
    let answer = ANSWER.replace("AmazonS3", "AmazonDynamoDB");
    assert!(matches!(
        ChangeSet::from_model_output(&answer),
        Err(CrustError::ModelResponseInvalid(_))
    ));
}

#[test]
fn test_rejects_unknown_provider() {
    let answer = ANSWER.replace("\"aws\"", "\"oracle\"");
    assert!(ChangeSet::from_model_output(&answer).is_err());
}

#[test]
fn test_rejects_extra_fields() {
    let answer = ANSWER.replace("\"friendlyName\": \"assets\"", "\"friendlyName\": \"assets\", \"tier\": \"std\"");
    assert!(ChangeSet::from_model_output(&answer).is_err());
}

#[test]
fn test_rejects_missing_nullable_field() {
    let answer = ANSWER.replace(", \"region\": \"eu-west-1\"", "");
    assert!(ChangeSet::from_model_output(&answer).is_err());
}

#[test]
fn test_rejects_empty_and_missing_lists() {
    assert!(matches!(
        ChangeSet::from_model_output("   "),
        Err(CrustError::ModelResponseInvalid(_))
    ));
    assert!(ChangeSet::from_model_output(r#"{"newResources": [], "cloudProvider": "aws"}"#).is_err());
}

#[test]
fn test_schema_shape() {
    let schema = ChangeSet::json_schema();

    assert_eq!(schema["additionalProperties"], false);
    assert_eq!(
        schema["required"],
        serde_json::json!(["oldResources", "newResources", "cloudProvider"])
    );

    let resource = &schema["properties"]["newResources"]["items"];
    assert_eq!(resource["additionalProperties"], false);
    assert_eq!(resource["required"].as_array().unwrap().len(), 5);
    assert_eq!(
        resource["properties"]["serviceCode"]["enum"].as_array().unwrap().len(),
        ServiceCode::ALL.len()
    );
    assert_eq!(
        schema["properties"]["cloudProvider"]["enum"],
        serde_json::json!(["aws", "azure", "gcp"])
    );
}

#[test]
fn test_service_code_names() {
    let names: Vec<String> = ServiceCode::ALL.iter().map(|c| c.to_string()).collect();
    assert_eq!(
        names,
        vec![
            "AmazonEC2",
            "AmazonS3",
            "AmazonRDS",
            "AmazonLambda",
            "AmazonRoute53",
            "AmazonCloudFront",
            "AmazonRedshift",
            "AmazonSQS",
        ]
    );
}
