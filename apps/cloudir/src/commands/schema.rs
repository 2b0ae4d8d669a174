//! Print the provider schema

use clap::Args;
use cloudir_provider::Provider;

use crate::error::CliResult;

/// Print the provider, resource and data source schemas as JSON
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Only print the schema of this resource or data source type
    #[arg(long = "type")]
    pub type_name: Option<String>,
}

/// Execute the schema command
pub async fn execute(args: SchemaArgs) -> CliResult<()> {
    let provider = Provider::new();
    println!("{}", render(&provider, args.type_name.as_deref())?);
    Ok(())
}

/// Schema JSON, optionally narrowed to one type.
pub fn render(provider: &Provider, type_name: Option<&str>) -> CliResult<String> {
    let schema = provider.schema();

    let Some(type_name) = type_name else {
        return Ok(serde_json::to_string_pretty(&schema)?);
    };

    let mut selected = serde_json::Map::new();
    if let Some(resource) = schema.resources.get(type_name) {
        selected.insert("resource".to_string(), serde_json::to_value(resource)?);
    }
    if let Some(data_source) = schema.data_sources.get(type_name) {
        selected.insert("data_source".to_string(), serde_json::to_value(data_source)?);
    }
    if selected.is_empty() {
        return Err(crate::error::CliError::Validation(format!(
            "Unknown resource or data source type '{type_name}'"
        )));
    }

    Ok(serde_json::to_string_pretty(&selected)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_schema_lists_every_type() {
        let out = render(&Provider::new(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["resources"].as_object().unwrap().len(), 18);
        assert_eq!(value["data_sources"].as_object().unwrap().len(), 7);
        assert!(value["provider"]["attributes"].is_array());
    }

    #[test]
    fn test_single_type_has_both_kinds() {
        let out = render(&Provider::new(), Some("cloudir_user_group")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert!(value.get("resource").is_some());
        assert!(value.get("data_source").is_some());
    }

    #[test]
    fn test_unknown_type() {
        let err = render(&Provider::new(), Some("cloudir_printer")).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
