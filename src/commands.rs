//! Resource subcommands and how their results are printed.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use serde_json::Value;

use crate::auth::Kwargs;
use crate::error::ClientError;
use crate::http::Transport;
use crate::resource::{Resource, ResourceManager};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ResourceAction {
    /// List all resources in the collection
    List,

    /// Show a single resource
    Get {
        /// Resource name
        name: String,
    },

    /// Create a resource from a JSON file
    Create {
        /// Path to the JSON definition
        file: PathBuf,
    },

    /// Replace a resource with the contents of a JSON file
    Update {
        /// Name of the resource to update
        name: String,

        /// Path to the JSON definition
        file: PathBuf,
    },

    /// Delete a resource
    Delete {
        /// Resource name
        name: String,
    },
}

impl ResourceAction {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceAction::List => "list",
            ResourceAction::Get { .. } => "get",
            ResourceAction::Create { .. } => "create",
            ResourceAction::Update { .. } => "update",
            ResourceAction::Delete { .. } => "delete",
        }
    }

    /// Run the action. The token, if any, is read from `kwargs`.
    pub fn run<T, W>(
        &self,
        manager: &ResourceManager<'_, T>,
        kwargs: &Kwargs,
        format: OutputFormat,
        out: &mut W,
    ) -> Result<(), ClientError>
    where
        T: Transport,
        W: Write,
    {
        let token = kwargs.token();
        let token = token.as_ref();

        match self {
            ResourceAction::List => {
                let resources = manager.list(token)?;
                print_list(&resources, format, out)
            }
            ResourceAction::Get { name } => {
                let resource = manager.get_by_name(name, token)?;
                print_resource(&resource, format, out)
            }
            ResourceAction::Create { file } => {
                let resource = Resource::from_file(file)?;
                let created = manager.create(&resource, token)?;
                print_resource(&created, format, out)
            }
            ResourceAction::Update { name, file } => {
                let resource = Resource::from_file(file)?;
                let updated = manager.update(name, resource, token)?;
                print_resource(&updated, format, out)
            }
            ResourceAction::Delete { name } => {
                manager.delete(name, token)?;
                if format == OutputFormat::Table {
                    writeln!(out, "Resource with id \"{}\" has been successfully deleted.", name)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

fn print_list<W: Write>(
    resources: &[Resource],
    format: OutputFormat,
    out: &mut W,
) -> Result<(), ClientError> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(resources)?)?;
        return Ok(());
    }

    if resources.is_empty() {
        writeln!(out, "No matching items found.")?;
        return Ok(());
    }

    writeln!(out, "{:<34} {:<24} {}", "ID", "NAME", "DESCRIPTION")?;
    for r in resources {
        writeln!(
            out,
            "{:<34} {:<24} {}",
            r.id().unwrap_or("-"),
            r.name().unwrap_or("-"),
            r.str_field("description").unwrap_or("")
        )?;
    }
    Ok(())
}

fn print_resource<W: Write>(
    resource: &Resource,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), ClientError> {
    if format == OutputFormat::Json {
        writeln!(out, "{}", serde_json::to_string_pretty(resource)?)?;
        return Ok(());
    }

    writeln!(out, "{:<16} {}", "ATTRIBUTE", "VALUE")?;
    for (key, value) in resource.fields() {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        writeln!(out, "{:<16} {}", key, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn rule() -> Resource {
        let mut fields = Map::new();
        fields.insert("id".into(), json!("abc"));
        fields.insert("name".into(), json!("drule"));
        fields.insert("description".into(), json!("i am THE rule."));
        fields.insert("enabled".into(), json!(true));
        Resource::from_map(fields)
    }

    #[test]
    fn list_table_has_header_and_rows() {
        let mut out = Vec::new();
        print_list(&[rule()], OutputFormat::Table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("drule"));
        assert!(lines[1].ends_with("i am THE rule."));
    }

    #[test]
    fn empty_list_says_so() {
        let mut out = Vec::new();
        print_list(&[], OutputFormat::Table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No matching items found.\n");
    }

    #[test]
    fn resource_json_is_parseable() {
        let mut out = Vec::new();
        print_resource(&rule(), OutputFormat::Json, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["name"], "drule");
    }

    #[test]
    fn resource_table_renders_non_strings_as_json() {
        let mut out = Vec::new();
        print_resource(&rule(), OutputFormat::Table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().any(|l| l.starts_with("enabled") && l.ends_with("true")));
    }
}
