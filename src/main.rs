//! swr-cutlist - CLI tool to generate SWR glass and aluminum cutlists.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use swr_cutlist::{
    generate_reports, parse_unit_file, template_csv, validate_units, write_reports, ConfigInput,
    Configuration, Finish, Measurement, OutputFormat, SystemType,
};

/// Generate glass and aluminum cutlists for SWR glazing units.
#[derive(Parser, Debug)]
#[command(name = "swr-cutlist")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate reports from a unit table
    Generate(GenerateArgs),
    /// Write the input table template
    Template {
        /// Output path
        #[arg(short, long, default_value = "SWR_template.csv")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Input unit table (CSV)
    #[arg(short, long)]
    input: PathBuf,

    /// Project settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output format (xlsx or csv)
    #[arg(short, long, default_value = "xlsx")]
    format: OutputFormat,

    /// Validate only, don't generate output
    #[arg(long)]
    validate: bool,

    /// Output the reports as JSON instead of writing files
    #[arg(long)]
    debug: bool,

    #[command(flatten)]
    overrides: Overrides,
}

/// Settings that override the config file. Lengths accept `in` or `mm` suffixes.
#[derive(Args, Debug)]
struct Overrides {
    #[arg(long)]
    project_name: Option<String>,

    #[arg(long)]
    project_number: Option<String>,

    #[arg(long)]
    prepared_by: Option<String>,

    /// Mil Finish, Clear Anodized, Black Anodized or Painted
    #[arg(long)]
    finish: Option<Finish>,

    /// SWR-IG, SWR-VIG, SWR or Custom
    #[arg(long)]
    system_type: Option<SystemType>,

    /// Glass offset (Custom system type only)
    #[arg(long)]
    glass_offset: Option<Measurement>,

    /// Profile number (Custom system type only)
    #[arg(long)]
    profile_number: Option<String>,

    #[arg(long)]
    joint_top: Option<Measurement>,

    #[arg(long)]
    joint_bottom: Option<Measurement>,

    #[arg(long)]
    joint_left: Option<Measurement>,

    #[arg(long)]
    joint_right: Option<Measurement>,

    #[arg(long)]
    glass_cutting_tolerance: Option<Measurement>,

    /// Glass rounding increment
    #[arg(long)]
    rounding_increment: Option<Measurement>,

    /// Report raw glass sizes instead of rounded ones
    #[arg(long)]
    no_round_glass: bool,
}

impl Overrides {
    fn apply(self, input: &mut ConfigInput) {
        if let Some(v) = self.project_name {
            input.project_name = v;
        }
        if let Some(v) = self.project_number {
            input.project_number = v;
        }
        if let Some(v) = self.prepared_by {
            input.prepared_by = v;
        }
        if let Some(v) = self.finish {
            input.finish = v;
        }
        if let Some(v) = self.system_type {
            input.system_type = v;
        }
        if self.glass_offset.is_some() {
            input.glass_offset = self.glass_offset;
        }
        if self.profile_number.is_some() {
            input.profile_number = self.profile_number;
        }
        if let Some(v) = self.joint_top {
            input.joint_top = v;
        }
        if let Some(v) = self.joint_bottom {
            input.joint_bottom = v;
        }
        if let Some(v) = self.joint_left {
            input.joint_left = v;
        }
        if let Some(v) = self.joint_right {
            input.joint_right = v;
        }
        if let Some(v) = self.glass_cutting_tolerance {
            input.glass_cutting_tolerance = v;
        }
        if let Some(v) = self.rounding_increment {
            input.rounding_increment = v;
        }
        if self.no_round_glass {
            input.round_glass = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Template { output } => {
            std::fs::write(&output, template_csv())
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Generated: {}", output.display());
            Ok(())
        }
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    let mut input = match &args.config {
        Some(path) => ConfigInput::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ConfigInput::default(),
    };
    args.overrides.apply(&mut input);

    let config = Configuration::resolve(&input).context("Invalid configuration")?;
    info!(
        "Part {} with glass offset {} mm",
        config.part_number, config.glass_offset_mm
    );

    info!("Processing: {}", args.input.display());

    let rows = parse_unit_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    info!("Parsed {} unit row(s)", rows.len());

    // Validate
    let validation = validate_units(&rows, &config)?;

    for warning in &validation.warnings {
        warn!("{}", warning);
    }

    for err in &validation.errors {
        error!("{}", err);
    }

    if !validation.passed {
        anyhow::bail!("Validation failed");
    }

    // Validate-only mode
    if args.validate {
        info!("Validation passed");
        return Ok(());
    }

    let reports = generate_reports(&rows, &config)?;

    // Debug output
    if args.debug {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "configuration": &config,
            "reports": &reports,
        }))?;
        println!("{}", json);
        return Ok(());
    }

    let written = write_reports(
        &reports,
        &config.project.project_number,
        &args.output_dir,
        args.format,
    )
    .with_context(|| format!("Failed to write reports to {}", args.output_dir.display()))?;

    info!("Wrote {} report file(s)", written.len());

    Ok(())
}
