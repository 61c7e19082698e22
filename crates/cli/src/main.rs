use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use pathway_core::{
    check_date_of_birth, classify, insurers, screen, Clock, Contraindications, CoreConfig,
    EligibilityInput, InsuranceModel, ReferralVerifier, RiskFactorSelection, SymptomSelection,
    SystemClock, EMERGENCY_PHONE,
};

#[derive(Parser)]
#[command(name = "pathway")]
#[command(about = "Cardiac monitoring eligibility pathway CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a questionnaire
    Classify {
        /// Symptom (repeatable), e.g. palpitations, chest-pain
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
        /// Risk factor (repeatable), e.g. hypertension, age-over-50
        #[arg(long = "risk")]
        risk_factors: Vec<String>,
        /// Insurance model: standard, gp-model, hmo, telmed or unsure
        #[arg(long, default_value = "unsure")]
        model: String,
        /// Locale for the next steps (defaults to PATHWAY_DEFAULT_LOCALE)
        #[arg(long)]
        locale: Option<String>,
        /// Patient has no Swiss basic insurance
        #[arg(long)]
        uninsured: bool,
    },
    /// Check a date of birth (YYYY-MM-DD)
    CheckDob {
        date_of_birth: String,
        /// Evaluate as of this date instead of today
        #[arg(long)]
        today: Option<String>,
    },
    /// List insurers
    Insurers,
    /// Print a locale table as YAML
    Locale {
        /// Locale code: en, de, fr or it
        code: String,
    },
    /// Verify a referral code against the seed file in PATHWAY_REFERRAL_SEED
    VerifyReferral { code: String },
}

/// Log filter for the CLI. Command output owns stdout, so only warnings are shown unless
/// `RUST_LOG` asks for more.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env().add_directive("pathway=warn".parse()?))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = CoreConfig::from_env()?;

    match cli.command {
        Some(Commands::Classify {
            symptoms,
            risk_factors,
            model,
            locale,
            uninsured,
        }) => {
            let input = EligibilityInput::new(
                SymptomSelection::parse_all(&symptoms)?,
                RiskFactorSelection::parse_all(&risk_factors)?,
                model.parse::<InsuranceModel>()?,
            );
            let catalogue = cfg.load_catalogue()?;
            let locale = catalogue.resolve(locale.as_deref());
            let result = classify(&input, catalogue.table(locale));
            let pathway = screen(!uninsured, &Contraindications::default(), Some(&result));

            println!("{} ({})", result.title, result.outcome);
            println!("{}", result.badge);
            for (i, step) in result.next_steps.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            if let Some(info) = &result.insurance_info {
                println!("  {}", info);
            }
            println!("Pathway: {}", pathway);
            if let Some(symptom) = result.emergency {
                println!("Emergency symptom: {} - call {}", symptom, EMERGENCY_PHONE);
            }
        }
        Some(Commands::CheckDob {
            date_of_birth,
            today,
        }) => {
            let today = match today {
                Some(day) => chrono::NaiveDate::parse_from_str(&day, "%Y-%m-%d")?,
                None => SystemClock.today(),
            };
            match check_date_of_birth(&date_of_birth, today) {
                Ok(age) => println!("Valid: {} years old on {}", age.years, today),
                Err(e) => eprintln!("Invalid date of birth: {}", e),
            }
        }
        Some(Commands::Insurers) => {
            for insurer in insurers::INSURERS.iter() {
                println!("{:<15} {}", insurer.code, insurer.label);
            }
        }
        Some(Commands::Locale { code }) => {
            let locale = code.parse::<pathway_locale::Locale>()?;
            let catalogue = cfg.load_catalogue()?;
            print!("{}", catalogue.table(locale).render()?);
        }
        Some(Commands::VerifyReferral { code }) => {
            if cfg.referral_seed().is_none() {
                eprintln!("PATHWAY_REFERRAL_SEED is not set");
                return Ok(());
            }
            let verifier = ReferralVerifier::new(cfg.load_referral_store()?);
            match verifier.verify(&code, SystemClock.now()).await {
                Ok(verified) => println!(
                    "Valid referral for {} (pathway: {}, expires {})",
                    verified.patient_name,
                    verified
                        .eligibility_pathway
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "unknown".into()),
                    verified.expires_at
                ),
                Err(e) => eprintln!("Referral rejected: {}", e),
            }
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
