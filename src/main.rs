use clap::Parser;
use contract_pricing::utils::error::{ErrorSeverity, PricingError};
use contract_pricing::utils::{logger, validation::Validate};
use contract_pricing::{
    payment_plan_csv, render_preview, CliConfig, ContractPricingSnapshot, OutputFormat,
    PricingEngine, QuoteConfig, TierTableDefaultPricer,
};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting contract-pricing");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli) {
        tracing::error!(
            "❌ Pricing failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run(cli: &CliConfig) -> Result<(), PricingError> {
    tracing::info!("📁 Loading quote from: {}", cli.config);
    let mut config = QuoteConfig::from_file(&cli.config)?;

    // 套用命令列覆蓋設定
    if let Some(applicants) = cli.applicants {
        config.request.applicant_count = applicants;
        tracing::info!("🔧 Applicant count overridden to: {}", applicants);
    }
    if let Some(start_date) = cli.start_date {
        config.request.start_date = Some(start_date);
    }

    if cli.lenient {
        config.validate()?;
    } else {
        config.validate_for_contract()?;
    }
    tracing::info!("✅ Quote configuration loaded and validated");

    let pricer = TierTableDefaultPricer::new(config.default_tiers.clone(), &config.policy);
    let engine = PricingEngine::new(config.policy.clone(), pricer);
    let inputs = config.to_inputs(chrono::Local::now().date_naive());

    let snapshot = if cli.lenient {
        engine.preview(&inputs)
    } else {
        engine.price_contract(&inputs)?
    };

    let rendered = render(&snapshot, cli.format)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn render(snapshot: &ContractPricingSnapshot, format: OutputFormat) -> Result<String, PricingError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(snapshot)? + "\n"),
        OutputFormat::Csv => payment_plan_csv(snapshot),
        OutputFormat::Preview => Ok(render_preview(snapshot)),
    }
}
