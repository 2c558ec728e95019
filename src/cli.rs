use clap::{Parser, Subcommand};
use tabled::builder::Builder;

use crate::{LayoutRegistry, Selected};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the layouts of optionals of built-in payloads
    Layouts {
        /// Only show layouts whose name contains this string
        #[arg()]
        filter: Option<String>,
    },
    /// Print the rules used to select an emptiness encoding
    Rules,
}

/// Run the `tinyopt` command line tool
///
/// This CLI provides the following subcommands:
///  - `layouts`: sizes of optionals compared to their payloads
///  - `rules`: the selection rules in order, with their diagnostics
pub fn cli() {
    match cli_inner() {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn cli_inner() -> Result<(), String> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Layouts { filter } => {
            let registry = LayoutRegistry::builtin();
            println!("{}", layouts_table(&registry, filter.as_deref())?);
        }
        Command::Rules => {
            println!("{}", rules_table());
        }
    }
    Ok(())
}

fn layouts_table(
    registry: &LayoutRegistry,
    filter: Option<&str>,
) -> Result<String, String> {
    let mut builder = Builder::default();
    builder.push_record(["payload", "rule", "size", "payload size", "Option size"]);

    let mut count = 0;
    for info in registry.iter() {
        if filter.is_some_and(|f| !info.name.contains(f)) {
            continue;
        }
        log::debug!("{} resolved with {}", info.payload, info.config);
        count += 1;
        builder.push_record([
            info.name.clone(),
            info.selected.to_string(),
            info.size.to_string(),
            info.payload_size.to_string(),
            info.option_size.to_string(),
        ]);
    }

    if count == 0 {
        return Err(format!(
            "no layout matches `{}`",
            filter.unwrap_or_default()
        ));
    }

    Ok(builder.build().to_string())
}

fn rules_table() -> String {
    let mut builder = Builder::default();
    builder.push_record(["rule", "encoding", "in place", "diagnostics"]);
    for rule in Selected::ALL {
        builder.push_record([
            rule.to_string(),
            rule.summary().to_string(),
            rule.is_in_place().to_string(),
            rule.diagnostics().join("\n"),
        ]);
    }
    builder.build().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtered_layouts() {
        let registry = LayoutRegistry::builtin();
        let table = layouts_table(&registry, Some("sentinel")).unwrap();
        assert!(table.contains("u8, sentinel 255"));
        assert!(!table.contains("Vec<u8>"));

        let err = layouts_table(&registry, Some("nothing")).unwrap_err();
        assert_eq!(err, "no layout matches `nothing`");
    }

    #[test]
    fn rules_are_listed_in_order() {
        let table = rules_table();
        let first = table.find("rule 1").unwrap();
        let last = table.find("rule 6").unwrap();
        assert!(first < last);
    }
}
