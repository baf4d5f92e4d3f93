use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::User;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "message": message });

            if let (Some(Value::Object(extra)), Some(object)) = (data, response.as_object_mut()) {
                object.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output user accounts; password hashes are never part of the serialized form
pub fn output_users(output_format: &OutputFormat, users: &[User]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "users": users }))?);
        }
        OutputFormat::Text => {
            if users.is_empty() {
                println!("No users");
                return Ok(());
            }

            println!("{:<6} {:<30} {}", "ID", "USERNAME", "ROLE");
            for user in users {
                println!("{:<6} {:<30} {}", user.id, user.username, user.role);
            }
        }
    }
    Ok(())
}
