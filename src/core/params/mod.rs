use anyhow::Context;
use serde_json::{Map, Value};

/// Values substituted into a run-parameter template.
#[derive(Debug, Clone)]
pub struct TemplateInputs {
    pub region: String,
    pub staging_uri: String,
    pub account_id: String,
    /// Container registry host injected as `ecr_registry`.
    pub registry_host: String,
}

impl TemplateInputs {
    /// Standard registry host for an account/region pair.
    pub fn registry_host_for(account_id: &str, region: &str) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", account_id, region)
    }
}

/// Resolve a run-parameter template: literal substitution of the recognized
/// `{{region}}`, `{{staging_uri}}`, `{{account_id}}` tokens in that order,
/// JSON parse, then merge of the `aws_region` and `ecr_registry` keys.
///
/// Unrecognized `{{...}}` tokens are left in place; they either break the
/// parse or propagate as literal text into the run parameters. A warning is
/// logged when any survive substitution.
pub fn resolve_parameters(
    template_text: &str,
    inputs: &TemplateInputs,
) -> crate::Result<Map<String, Value>> {
    let substituted = template_text
        .replace("{{region}}", &inputs.region)
        .replace("{{staging_uri}}", &inputs.staging_uri)
        .replace("{{account_id}}", &inputs.account_id);

    if substituted.contains("{{") {
        tracing::warn!("run-parameter template still contains unresolved {{{{...}}}} tokens");
    }

    let parsed: Value = serde_json::from_str(&substituted)
        .context("failed to parse substituted run-parameter template as JSON")?;
    let mut parameters = match parsed {
        Value::Object(map) => map,
        other => anyhow::bail!(
            "run-parameter template must be a JSON object, got {}",
            type_name(&other)
        ),
    };

    parameters.insert(
        "aws_region".to_string(),
        Value::String(inputs.region.clone()),
    );
    parameters.insert(
        "ecr_registry".to_string(),
        Value::String(inputs.registry_host.clone()),
    );

    Ok(parameters)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
