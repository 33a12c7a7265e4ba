use clap::Parser;
use mcd_target_hunter::cli::{self, Cli, Commands, ConfigAction};
use mcd_target_hunter::commands::{self, ScanOverrides};
use mcd_target_hunter::config::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli::setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Commands::Scan {
            input,
            outdir,
            target,
            parent,
            no_parent,
            opno,
            toolchg,
            case_sensitive,
            print_report_path,
            json,
            save,
        }) => {
            let overrides = cli::scan_overrides(
                input,
                outdir,
                target,
                parent,
                no_parent,
                opno,
                toolchg,
                case_sensitive,
            );
            let summary = commands::run_scan(&overrides, save)?;

            if json {
                let output = serde_json::json!({
                    "input": summary.input.display().to_string(),
                    "report_path": summary.report_path.display().to_string(),
                    "total_hits": summary.total_hits,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(());
            }

            if print_report_path {
                println!("{}", summary.report_path.display());
            }
            println!("Complete. Report created: {}", summary.report_path.display());
            println!("Total hits: {}", summary.total_hits);
            Ok(())
        }
        Some(Commands::Config { action }) => run_config(action),
        #[cfg(feature = "mcp")]
        Some(Commands::Serve) => {
            tokio::runtime::Runtime::new()?.block_on(mcd_target_hunter::mcp::serve())
        }
        None => {
            Cli::parse_from(["mcdtargethunter", "--help"]);
            Ok(())
        }
    }
}

fn run_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show { json } => {
            let config = AppConfig::load();
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Path => {
            let path = AppConfig::config_path()
                .ok_or_else(|| anyhow::anyhow!("No config location available on this platform"))?;
            println!("{}", path.display());
        }
        ConfigAction::Set {
            target,
            parent,
            use_parent,
            opno,
            toolchg,
            case_sensitive,
            input,
            outdir,
        } => {
            let update = ScanOverrides {
                input,
                output_dir: outdir,
                target_text: target,
                parent_text: parent,
                use_parent,
                op_no_text: opno,
                tool_change_text: toolchg,
                case_sensitive,
            };
            let (_, path) = commands::update_config(&update)?;
            println!("Saved config: {}", path.display());
        }
        ConfigAction::Reset => {
            let path = commands::reset_config()?;
            println!("Restored defaults: {}", path.display());
        }
    }
    Ok(())
}
