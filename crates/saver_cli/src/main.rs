use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use saver_core::core_api::{
    DecodedSave, SaveFormat, SaveValue, decode_hex_or_json, decode_save, encode_as_hex,
    encode_save_as, merge_into_template,
};

#[derive(Debug, Parser)]
#[command(version, about = "Decode, edit, and re-encode idle-game save files")]
struct Cli {
    #[arg(value_name = "SAVE_FILE")]
    path: PathBuf,
    /// Print `path=value` for a dot-separated path; repeatable.
    #[arg(long, value_name = "PATH")]
    get: Vec<String>,
    /// Assign a value (parsed as JSON, else taken as a string); repeatable.
    #[arg(long, value_name = "PATH=VALUE")]
    set: Vec<String>,
    /// Remove the value at a path; repeatable.
    #[arg(long, value_name = "PATH")]
    delete: Vec<String>,
    /// Compact instead of pretty-printed document output.
    #[arg(long)]
    compact: bool,
    /// Emit --get results as a JSON object.
    #[arg(long)]
    json: bool,
    #[arg(
        long,
        value_name = "antimatter|atom",
        value_parser = parse_format
    )]
    format: Option<SaveFormat>,
    /// Convert: merge the input (hex or JSON) into this template's shape.
    #[arg(long, value_name = "TEMPLATE_FILE")]
    template: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let has_edits = !cli.set.is_empty() || !cli.delete.is_empty();

    if cli.template.is_some() && (has_edits || !cli.get.is_empty()) {
        eprintln!("--template cannot be combined with --get/--set/--delete");
        process::exit(2);
    }
    if has_edits && cli.output.is_none() {
        eprintln!("--set/--delete require --output <PATH>");
        process::exit(2);
    }

    let raw = fs::read_to_string(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", cli.path.display());
        process::exit(1);
    });

    if let Some(template_path) = cli.template.as_ref() {
        run_converter(&cli, &raw, template_path);
        return;
    }

    let DecodedSave { format, document } = decode_save(&raw).unwrap_or_else(|e| {
        eprintln!("Error decoding {}: {e}", cli.path.display());
        process::exit(1);
    });
    let mut document = document;

    for assignment in &cli.set {
        let Some((path, raw_value)) = assignment.split_once('=') else {
            eprintln!("--set expects PATH=VALUE, got '{assignment}'");
            process::exit(2);
        };
        let value = parse_set_value(raw_value);
        if !document.set_path(path, value) {
            eprintln!("Error: cannot set '{path}': blocked by a non-container value");
            process::exit(1);
        }
    }
    for path in &cli.delete {
        if !document.remove_path(path) {
            eprintln!("Error: no value at '{path}' to delete");
            process::exit(1);
        }
    }

    if has_edits {
        let out_path = cli.output.as_ref().expect("checked above");
        let encoded = encode_save_as(&document, cli.format.unwrap_or(format))
            .unwrap_or_else(|e| {
                eprintln!("Error encoding save: {e}");
                process::exit(1);
            });
        fs::write(out_path, encoded).unwrap_or_else(|e| {
            eprintln!("Error writing {}: {e}", out_path.display());
            process::exit(1);
        });
        println!("Wrote edited save to {}", out_path.display());
        return;
    }

    if !cli.get.is_empty() {
        print_fields(&cli, &document);
        return;
    }

    let rendered = render_document(&document, cli.compact).unwrap_or_else(|e| {
        eprintln!("Error rendering document: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn run_converter(cli: &Cli, raw: &str, template_path: &PathBuf) {
    let template_raw = fs::read_to_string(template_path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", template_path.display());
        process::exit(1);
    });

    let old = decode_hex_or_json(raw).unwrap_or_else(|e| {
        eprintln!("Error decoding {}: {e}", cli.path.display());
        process::exit(1);
    });
    let template = decode_hex_or_json(&template_raw).unwrap_or_else(|e| {
        eprintln!("Error decoding {}: {e}", template_path.display());
        process::exit(1);
    });

    let merged = merge_into_template(&old, &template);
    let encoded = encode_as_hex(&merged).unwrap_or_else(|e| {
        eprintln!("Error encoding converted save: {e}");
        process::exit(1);
    });

    match cli.output.as_ref() {
        Some(out_path) => {
            fs::write(out_path, encoded).unwrap_or_else(|e| {
                eprintln!("Error writing {}: {e}", out_path.display());
                process::exit(1);
            });
            println!("Wrote converted save to {}", out_path.display());
        }
        None => println!("{encoded}"),
    }
}

fn print_fields(cli: &Cli, document: &SaveValue) {
    if cli.json {
        let mut out = serde_json::Map::new();
        for path in &cli.get {
            let value = document
                .get_path(path)
                .map(SaveValue::to_json)
                .unwrap_or(serde_json::Value::Null);
            out.insert(path.clone(), value);
        }
        let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(out))
            .unwrap_or_else(|e| {
                eprintln!("Error rendering JSON output: {e}");
                process::exit(1);
            });
        println!("{rendered}");
        return;
    }

    for path in &cli.get {
        match document.get_path(path) {
            Some(value) => println!("{path}={}", display_value(value)),
            None => println!("{path}=<missing>"),
        }
    }
}

fn display_value(value: &SaveValue) -> String {
    match value {
        SaveValue::Null => "null".to_string(),
        SaveValue::Bool(b) => b.to_string(),
        SaveValue::Number(n) => n.to_string(),
        SaveValue::Text(s) => s.clone(),
        other => other
            .to_json_text()
            .unwrap_or_else(|_| "<unrepresentable>".to_string()),
    }
}

fn parse_set_value(raw: &str) -> SaveValue {
    match SaveValue::from_json_text(raw) {
        Ok(value) => value,
        Err(_) => SaveValue::Text(raw.to_string()),
    }
}

fn render_document(document: &SaveValue, compact: bool) -> Result<String, serde_json::Error> {
    if compact {
        document.to_json_text()
    } else {
        document.to_json_text_pretty()
    }
}

fn parse_format(value: &str) -> Result<SaveFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "ad" | "antimatter" | "framed" => Ok(SaveFormat::Antimatter),
        "atom" | "atom-idle" | "atomidle" | "unframed" => Ok(SaveFormat::AtomIdle),
        _ => Err(format!(
            "invalid format '{value}', expected one of: antimatter, atom"
        )),
    }
}
