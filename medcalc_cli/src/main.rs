use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use medcalc_core::calories::{CalorieResult, MacroSplit};
use medcalc_core::dispatch::calculate;
use medcalc_core::ovulation::OvulationResult;
use medcalc_core::pregnancy::PregnancyResult;
use medcalc_core::report::{format_date, format_thousands};
use medcalc_core::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "medcalc")]
#[command(
    about = "Medical self-service calculators: calorie needs, ovulation window and due date",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily calorie needs, BMI and macros
    Calories {
        /// male or female
        #[arg(long)]
        gender: String,

        /// Age in years
        #[arg(long)]
        age: i64,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// sedentary, light, moderate, active or very_active
        #[arg(long)]
        activity: String,

        /// maintain, lose, lose_10 or gain
        #[arg(long)]
        goal: Option<String>,
    },

    /// Ovulation date and fertile window
    Ovulation {
        /// First day of the last period (YYYY-MM-DD)
        #[arg(long)]
        lmp: String,

        /// Cycle length in days (defaults to the configured value)
        #[arg(long)]
        cycle_length: Option<i64>,
    },

    /// Pregnancy due date and progress
    Pregnancy {
        /// First day of the last period (YYYY-MM-DD)
        #[arg(long)]
        lmp: String,
    },

    /// Answer a JSON request from a file ('-' reads stdin)
    ///
    /// Numeric fields may be JSON numbers or numeric strings.
    Request { path: String },

    /// Run every row of a CSV file and write a results CSV
    Batch {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    medcalc_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loaded configuration plus the clock calculations run against
struct Env {
    config: Config,
    clock: Box<dyn Clock>,
}

impl Env {
    fn load(config_path: Option<&Path>, today: Option<NaiveDate>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let clock: Box<dyn Clock> = match today {
            Some(today) => Box::new(FixedClock(today)),
            None => Box::new(SystemClock),
        };
        tracing::debug!("Calculating as of {}", clock.today());

        Ok(Self { config, clock })
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        command,
        config: config_path,
        today,
        json,
        ..
    } = cli;
    let config_path = config_path.as_deref();

    match command {
        Commands::Calories {
            gender,
            age,
            weight,
            height,
            activity,
            goal,
        } => {
            let fields = FormFields {
                gender: Some(gender),
                age: Some(age),
                weight: Some(weight),
                height: Some(height),
                activity: Some(activity),
                goal,
                ..FormFields::default()
            };
            let env = Env::load(config_path, today)?;
            cmd_calculate(CalculatorKind::Calories, &fields, &env, json)
        }
        Commands::Ovulation { lmp, cycle_length } => {
            let fields = FormFields {
                lmp: Some(lmp),
                cycle_length,
                ..FormFields::default()
            };
            let env = Env::load(config_path, today)?;
            cmd_calculate(CalculatorKind::Ovulation, &fields, &env, json)
        }
        Commands::Pregnancy { lmp } => {
            let fields = FormFields {
                lmp: Some(lmp),
                ..FormFields::default()
            };
            let env = Env::load(config_path, today)?;
            cmd_calculate(CalculatorKind::Pregnancy, &fields, &env, json)
        }
        Commands::Request { path } => {
            let env = Env::load(config_path, today)?;
            cmd_request(&path, &env, json)
        }
        Commands::Batch { input, output } => {
            let env = Env::load(config_path, today)?;
            let summary = batch::run_file(&input, &output, env.clock.as_ref(), &env.config)?;
            println!(
                "✓ Processed {} rows ({} ok, {} failed)",
                summary.processed, summary.succeeded, summary.failed
            );
            println!("  Results: {}", output.display());
            Ok(())
        }
        Commands::Config { action } => {
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_config_path);
            cmd_config(&action, &path, json)
        }
    }
}

fn cmd_calculate(kind: CalculatorKind, fields: &FormFields, env: &Env, json: bool) -> Result<()> {
    let result = calculate(kind, fields, env.clock.as_ref(), &env.config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_result(&result, &env.config);
    }
    Ok(())
}

fn cmd_request(path: &str, env: &Env, json: bool) -> Result<()> {
    let contents = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    let request: CalculationRequest = serde_json::from_str(&contents)?;
    let response = dispatch(&request, env.clock.as_ref(), &env.config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.show_result {
        display_result(&response.result, &env.config);
    }
    if let Some(ref message) = response.message {
        println!("{}", message);
    }
    Ok(())
}

fn cmd_config(action: &ConfigAction, path: &Path, json: bool) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(Error::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save_to(path)?;
            println!("✓ Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let config = if path.exists() {
                Config::load_from(path)?
            } else {
                Config::default()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", config.to_toml()?);
            }
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}

fn display_result(result: &CalculationResult, config: &Config) {
    let date_format = config.display.date_format.as_str();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} CALCULATOR", result.kind().as_str().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", result.headline(date_format));
    println!();

    match result {
        CalculationResult::Calories(r) => display_calories(r),
        CalculationResult::Ovulation(r) => display_ovulation(r, date_format),
        CalculationResult::Pregnancy(r) => display_pregnancy(r, date_format),
    }

    println!();
}

fn display_calories(r: &CalorieResult) {
    println!("  BMR:       {} kcal", format_thousands(r.bmr.round() as u64));
    println!("  TDEE:      {} kcal", format_thousands(u64::from(r.tdee)));
    println!("  Activity:  {}", r.activity_level.label());
    println!("  BMI:       {:.1} ({})", r.bmi, r.bmi_category.label());
    println!();
    println!(
        "  Goal:      {} → {} kcal",
        r.goal.label(),
        format_thousands(u64::from(r.goal_calories))
    );
    display_macros(&r.goal_macros);
    println!();
    println!("  Other targets:");
    for option in &r.goals {
        println!(
            "    → {:<20} {} kcal",
            option.label,
            format_thousands(u64::from(option.calories))
        );
    }
}

fn display_macros(split: &MacroSplit) {
    for (name, m) in [
        ("Protein", &split.protein),
        ("Carbs", &split.carbs),
        ("Fat", &split.fat),
    ] {
        println!(
            "    → {:<8} {:>4} g  ({} kcal, {}%)",
            name, m.grams, m.calories, m.percent
        );
    }
}

fn display_ovulation(r: &OvulationResult, date_format: &str) {
    println!(
        "  Fertile window:  {} to {}",
        format_date(r.fertile_start, date_format),
        format_date(r.fertile_end, date_format)
    );
    println!(
        "  Peak fertility:  {} to {}",
        format_date(r.peak_start, date_format),
        format_date(r.ovulation_date, date_format)
    );
    println!("  Next period:     {}", format_date(r.next_period, date_format));
    println!("  Cycle length:    {} days", r.cycle_length);
    println!();
    for day in &r.fertile_days {
        let marker = if day.is_ovulation { "  ← ovulation" } else { "" };
        println!(
            "    {}  {:?}{}",
            format_date(day.date, date_format),
            day.level,
            marker
        );
    }
    println!();
    println!("  ℹ {}", r.fertility_status.message());
}

fn display_pregnancy(r: &PregnancyResult, date_format: &str) {
    println!(
        "  Conception (est.):  {}",
        format_date(r.conception_date, date_format)
    );
    println!("  Current week:       {}", r.current_week);
    println!("  Trimester:          {}", r.trimester);
    println!(
        "  Remaining:          {} days ({} weeks)",
        r.days_remaining, r.weeks_remaining
    );
}
