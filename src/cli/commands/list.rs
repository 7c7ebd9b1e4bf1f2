//! Lists the registered config models and validators.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::CrossconfError;

#[derive(Debug, Serialize)]
struct ModelListing<'a> {
    file: &'a str,
    config_type: &'a str,
}

#[derive(Debug, Serialize)]
struct ValidatorListing<'a> {
    name: &'a str,
    requires: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    models: Vec<ModelListing<'a>>,
    validators: Vec<ValidatorListing<'a>>,
}

fn listing(catalog: &Catalog) -> Listing<'_> {
    Listing {
        models: catalog
            .models()
            .entries()
            .map(|entry| ModelListing {
                file: entry.file_name,
                config_type: entry.tag.name,
            })
            .collect(),
        validators: catalog
            .validators()
            .iter()
            .map(|validator| ValidatorListing {
                name: validator.name(),
                requires: validator.params().iter().map(|p| p.type_name).collect(),
            })
            .collect(),
    }
}

fn render_human(listing: &Listing<'_>) -> String {
    let mut out = String::from("Config models:\n");
    for model in &listing.models {
        out.push_str(&format!("  {} -> {}\n", model.file, model.config_type));
    }
    out.push_str("Validators:\n");
    for validator in &listing.validators {
        out.push_str(&format!(
            "  {} ({})\n",
            validator.name,
            validator.requires.join(", ")
        ));
    }
    out
}

/// Print the built-in catalog in registration order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be built or JSON output fails.
pub fn run(args: &ListArgs) -> Result<(), CrossconfError> {
    let catalog = Catalog::builtin().map_err(CrossconfError::Registry)?;
    let listing = listing(&catalog);

    match args.format {
        OutputFormat::Human => print!("{}", render_human(&listing)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&listing)?),
    }
    Ok(())
}
