use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use lightbnb_db_postgres::{NewProperty, PostgresLightbnbStorage};
use lightbnb_search::SearchCriteria;

use super::Outcome;
use crate::cli::{AddPropertyArgs, OutputFormat, SearchArgs};
use crate::output::{listings_table, print_json, print_success, property_table};

fn read_property(file: &Option<PathBuf>) -> Result<NewProperty> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid property JSON")
}

pub async fn search(
    storage: &PostgresLightbnbStorage,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<Outcome> {
    let criteria = SearchCriteria::from(args);
    let listings = storage.properties().search(&criteria, args.limit).await?;

    match format {
        OutputFormat::Json => print_json(&listings)?,
        OutputFormat::Table => println!("{}", listings_table(&listings)),
    }
    Ok(Outcome::Done)
}

pub async fn add(
    storage: &PostgresLightbnbStorage,
    args: &AddPropertyArgs,
    format: OutputFormat,
) -> Result<Outcome> {
    let new_property = read_property(&args.file)?;
    let property = storage
        .properties()
        .create(&new_property)
        .await
        .context("Failed to add property")?;

    print_success(&format!(
        "Created property {} in {}",
        property.id.to_string().cyan(),
        property.city.cyan()
    ));
    match format {
        OutputFormat::Json => print_json(&property)?,
        OutputFormat::Table => println!("{}", property_table(&property)),
    }
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_property_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"owner_id": 3, "title": "Cabin", "cost_per_night": 9900,
                "street": "1 Lake Rd", "city": "Banff", "province": "Alberta",
                "post_code": "T1L", "country": "Canada"}}"#
        )
        .unwrap();

        let property = read_property(&Some(file.path().to_path_buf())).unwrap();
        assert_eq!(property.owner_id, 3);
        assert_eq!(property.cost_per_night, 9900);
        assert_eq!(property.number_of_bedrooms, 0);
    }

    #[test]
    fn test_read_property_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"title": "No owner"}}"#).unwrap();

        let err = read_property(&Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("Invalid property JSON"));
    }
}
