//! Schema generator for the adapter's wire contract.
//!
//! This binary writes one standalone JSON Schema per model into `schemas/`:
//! `inbound_event.schema.json` and `adapter_response.schema.json`.

use std::fs;
use std::path::Path;

const OUTPUT_DIR: &str = "schemas";

fn main() {
    let models = github2rundeck::schema::model_schemas().unwrap_or_else(|e| {
        eprintln!("Failed to generate schemas: {e}");
        std::process::exit(1);
    });

    fs::create_dir_all(OUTPUT_DIR).unwrap_or_else(|e| {
        eprintln!("Failed to create {OUTPUT_DIR}/: {e}");
        std::process::exit(1);
    });

    for model in &models {
        let path = Path::new(OUTPUT_DIR).join(model.file_name);
        let json = serde_json::to_string_pretty(&model.schema).unwrap_or_else(|e| {
            eprintln!("Failed to serialize {}: {e}", model.file_name);
            std::process::exit(1);
        });

        fs::write(&path, json).unwrap_or_else(|e| {
            eprintln!("Failed to write {}: {e}", path.display());
            std::process::exit(1);
        });
    }
    println!("✅ Generated {} schema(s) in {OUTPUT_DIR}/", models.len());
}
