//! Entity subcommands (list/get/create/update/delete) for every collection.

use crate::console::render_table;
use crate::{App, OutputFormat};
use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;
use tablekeeper_core::{
    Customer, Entity, RecordId, Reservation, Resource, Restaurant, Route, Table,
};

#[derive(Subcommand)]
pub enum RecordAction {
    /// List every record
    List,

    /// Show one record
    Get { id: RecordId },

    /// Create a record from JSON
    Create {
        /// JSON object, or @path to read it from a file
        #[arg(short, long)]
        data: String,
    },

    /// Replace a record with JSON
    Update {
        id: RecordId,

        /// JSON object, or @path to read it from a file
        #[arg(short, long)]
        data: String,
    },

    /// Delete a record
    Delete { id: RecordId },
}

/// One line of the text listing.
trait Row {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn id_cell(id: Option<RecordId>) -> String {
    id.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string())
}

fn opt_cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl Row for Customer {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "EMAIL", "PHONE"];

    fn cells(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
        ]
    }
}

impl Row for Restaurant {
    const HEADER: &'static [&'static str] = &["ID", "NAME", "ADDRESS", "PHONE"];

    fn cells(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            self.name.clone(),
            self.address.clone(),
            self.phone.clone(),
        ]
    }
}

impl Row for Table {
    const HEADER: &'static [&'static str] = &["ID", "RESTAURANT", "NUMBER", "CAPACITY", "AVAILABLE"];

    fn cells(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            opt_cell(&self.restaurant_id),
            self.table_number.to_string(),
            self.capacity.to_string(),
            if self.available { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl Row for Reservation {
    const HEADER: &'static [&'static str] =
        &["ID", "CUSTOMER", "TABLE", "TIME", "MINUTES", "GUESTS", "STATUS"];

    fn cells(&self) -> Vec<String> {
        vec![
            id_cell(self.id),
            opt_cell(&self.customer_id),
            opt_cell(&self.table_id),
            self.reservation_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.duration_minutes.to_string(),
            self.num_guests.to_string(),
            opt_cell(&self.status),
        ]
    }
}

/// Parse `--data`: inline JSON, or `@path` to a JSON file.
fn parse_data(raw: &str) -> Result<Value> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read data file {}", path))?,
        None => raw.to_string(),
    };
    let value: Value = serde_json::from_str(&text).context("--data must be valid JSON")?;
    if !value.is_object() {
        anyhow::bail!("--data must be a JSON object");
    }
    Ok(value)
}

pub async fn run(app: &App, entity: Entity, action: RecordAction) -> Result<()> {
    // Same gate as opening the screen in the browser
    let outcome = app.router.navigate_to(Route::for_entity(entity));
    if outcome.redirected_to_login {
        match app.format {
            OutputFormat::Text => {
                eprintln!("Not signed in. Run 'tablekeeper login' first.");
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "login_required",
                        "route": outcome.landed,
                    })
                );
            }
        }
        std::process::exit(1);
    }

    match action {
        RecordAction::List => list(app, entity).await,
        RecordAction::Get { id } => {
            let value = app.client.get(entity, id).await.unwrap_or_else(|e| app.fail(e));
            print_value(app, &value)
        }
        RecordAction::Create { data } => {
            let body = parse_data(&data)?;
            let value = app
                .client
                .create(entity, &body)
                .await
                .unwrap_or_else(|e| app.fail(e));
            if app.format == OutputFormat::Text {
                println!("Created {} record{}", entity, describe_id(&value));
            }
            print_value(app, &value)
        }
        RecordAction::Update { id, data } => {
            let body = parse_data(&data)?;
            let value = app
                .client
                .update(entity, id, &body)
                .await
                .unwrap_or_else(|e| app.fail(e));
            if app.format == OutputFormat::Text {
                println!("Updated {} #{}", entity, id);
            }
            print_value(app, &value)
        }
        RecordAction::Delete { id } => {
            app.client
                .delete(entity, id)
                .await
                .unwrap_or_else(|e| app.fail(e));
            match app.format {
                OutputFormat::Text => println!("Deleted {} #{}", entity, id),
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({ "status": "deleted", "entity": entity, "id": id })
                ),
            }
            Ok(())
        }
    }
}

fn describe_id(value: &Value) -> String {
    value
        .get("id")
        .and_then(Value::as_i64)
        .map(|id| format!(" #{}", id))
        .unwrap_or_default()
}

fn print_value(app: &App, value: &Value) -> Result<()> {
    match app.format {
        OutputFormat::Text => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}

async fn list(app: &App, entity: Entity) -> Result<()> {
    if app.format == OutputFormat::Json {
        let value = app.client.list(entity).await.unwrap_or_else(|e| app.fail(e));
        return print_value(app, &value);
    }

    match entity {
        Entity::Customers => print_rows::<Customer>(app).await,
        Entity::Restaurants => print_rows::<Restaurant>(app).await,
        Entity::Tables => print_rows::<Table>(app).await,
        Entity::Reservations => print_rows::<Reservation>(app).await,
    }
}

async fn print_rows<T: Resource + Row>(app: &App) -> Result<()> {
    let records: Vec<T> = app.client.list_all().await.unwrap_or_else(|e| app.fail(e));

    if records.is_empty() {
        println!("No {} yet.", T::ENTITY);
        return Ok(());
    }

    let rows: Vec<Vec<String>> = records.iter().map(|r| r.cells()).collect();
    println!("{}", render_table(T::HEADER, &rows));
    println!();
    println!("{} {}", records.len(), T::ENTITY);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inline_data() {
        let value = parse_data(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(value["name"], "Ada");
    }

    #[test]
    fn test_parse_data_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("booking.json");
        std::fs::write(&path, r#"{"tableId":3,"numGuests":2}"#).unwrap();

        let value = parse_data(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["numGuests"], 2);
    }

    #[test]
    fn test_parse_data_rejects_non_objects() {
        assert!(parse_data("[1,2]").is_err());
        assert!(parse_data("not json").is_err());
    }

    #[test]
    fn test_reservation_row() {
        let reservation: Reservation = serde_json::from_value(serde_json::json!({
            "id": 4,
            "customerId": 1,
            "tableId": 2,
            "reservationTime": "2024-05-01T19:30:00",
            "durationMinutes": 90,
            "status": "CONFIRMED",
            "numGuests": 4
        }))
        .unwrap();
        assert_eq!(
            reservation.cells(),
            vec!["4", "1", "2", "2024-05-01 19:30", "90", "4", "CONFIRMED"]
        );
    }

    #[test]
    fn test_describe_id() {
        assert_eq!(describe_id(&serde_json::json!({"id": 9})), " #9");
        assert_eq!(describe_id(&Value::Null), "");
    }
}
