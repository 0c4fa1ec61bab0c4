//! Developer tasks (schema generation, fixture checks).
//!
//! Kept out of the end-user binary.

use anyhow::{bail, Context};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(PathBuf::from)
            .context("xtask has no parent directory")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn webhook_fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("tests").join("fixtures").join("webhooks"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(repolockr_settings::RepolockrConfigV1)
}

fn generate_verdict_schema() -> schemars::Schema {
    schema_for!(repolockr_types::VerdictReportV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "repolockr.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "repolockr.verdict.v1.json",
            generate: generate_verdict_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Fail if any checked-in schema differs from what the types generate.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Every webhook fixture must parse into a handled event.
///
/// The event name is the filename prefix up to the first action word
/// (`check_run_created.json` is a `check_run` delivery).
fn check_fixtures() -> anyhow::Result<()> {
    let dir = webhook_fixtures_dir()?;
    let mut count = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let event_name = if filename.starts_with("check_run") {
            "check_run"
        } else if filename.starts_with("pull_request") {
            "pull_request"
        } else {
            errors.push(format!("{filename}: cannot infer event name"));
            continue;
        };

        let body = fs::read(&path).with_context(|| format!("read {filename}"))?;
        match repolockr_app::parse_webhook(event_name, &body) {
            Ok(Some(event)) => println!("  ✓ {filename} parses as {}", event.name()),
            Ok(None) => errors.push(format!("{filename}: not a handled {event_name} action")),
            Err(err) => errors.push(format!("{filename}: {err}")),
        }
        count += 1;
    }

    if count == 0 {
        bail!("No JSON fixtures found in {}", dir.display());
    }
    if !errors.is_empty() {
        eprintln!("\nFixture errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Fixture check failed with {} errors", errors.len());
    }

    println!("\n✓ All {count} webhook fixtures parse");
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  check-fixtures    Parse every webhook fixture under tests/fixtures/webhooks");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "check-fixtures" => check_fixtures(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
