use clap::{Arg, Command};
use log::LevelFilter;
use phishlint::analyzer::{EmailInput, RiskAnalyzer, RiskReport};
use phishlint::config::AnalyzerConfig;
use phishlint::password::PasswordAnalyzer;
use phishlint::quiz::{QuestionBank, QuizSession};
use phishlint::website::WebsiteChecker;
use std::io::{BufRead, Write};
use std::path::Path;
use std::process;

fn main() {
    let matches = Command::new("phishlint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Offline phishing-awareness toolkit: email risk scoring, password strength, URL checks, and quizzes")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path (defaults are used when absent)")
                .default_value("phishlint.yaml"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Generate a default configuration file")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Test configuration validity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("analyze")
                .short('a')
                .long("analyze")
                .value_name("FILE")
                .help("Analyze an email sample file (YAML: subject, body, from_addr, ...)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("check-password")
                .long("check-password")
                .value_name("PASSWORD")
                .help("Rate the strength of a password")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("check-url")
                .long("check-url")
                .value_name("URL")
                .help("Run validity heuristics against a URL")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("quiz")
                .long("quiz")
                .value_name("FILE")
                .help("Run an awareness quiz from a YAML question bank")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Emit reports as JSON instead of text")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with per-rule detail")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(generate_path) = matches.get_one::<String>("generate-config") {
        generate_default_config(generate_path);
        return;
    }

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            process::exit(1);
        }
    };

    if matches.get_flag("test-config") {
        println!("Configuration OK");
        println!("  risk threshold: {}", config.risk_threshold);
        println!("  brands: {}", config.brands.len());
        println!("  urgent keyword patterns: {}", config.urgent_keywords.len());
        match RiskAnalyzer::new(config) {
            Ok(_) => println!("  all keyword patterns compile"),
            Err(e) => {
                eprintln!("Configuration error: {e}");
                process::exit(1);
            }
        }
        return;
    }

    let as_json = matches.get_flag("json");

    if let Some(email_file) = matches.get_one::<String>("analyze") {
        if let Err(e) = analyze_email_file(config, email_file, as_json) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }

    if let Some(password) = matches.get_one::<String>("check-password") {
        check_password(password, as_json);
        return;
    }

    if let Some(url) = matches.get_one::<String>("check-url") {
        if let Err(e) = check_url(config, url, as_json) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }

    if let Some(quiz_file) = matches.get_one::<String>("quiz") {
        if let Err(e) = run_quiz(quiz_file) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        return;
    }

    eprintln!("Nothing to do. Try --analyze, --check-password, --check-url or --quiz (see --help).");
    process::exit(1);
}

fn load_config(path: &str) -> anyhow::Result<AnalyzerConfig> {
    if Path::new(path).exists() {
        log::info!("Loading configuration from: {path}");
        AnalyzerConfig::from_file(path)
    } else {
        log::info!("No configuration file at {path}, using defaults");
        Ok(AnalyzerConfig::default())
    }
}

fn generate_default_config(path: &str) {
    let config = AnalyzerConfig::default();
    match config.to_file(path) {
        Ok(()) => println!("Default configuration written to: {path}"),
        Err(e) => {
            eprintln!("Error writing configuration: {e}");
            process::exit(1);
        }
    }
}

fn analyze_email_file(config: AnalyzerConfig, path: &str, as_json: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let input: EmailInput = serde_yaml::from_str(&content)?;
    let analyzer = RiskAnalyzer::new(config)?;
    let report = analyzer.evaluate(&input);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_risk_report(&report);
    }
    Ok(())
}

fn print_risk_report(report: &RiskReport) {
    println!("Score:    {}", report.score);
    println!("Category: {}", report.category.label());
    if report.hits.is_empty() {
        println!("No heuristics triggered.");
    } else {
        println!("Reasons:");
        for hit in &report.hits {
            println!("  [+{}] {}", hit.weight, hit.reason);
        }
    }
}

fn check_password(password: &str, as_json: bool) {
    let report = PasswordAnalyzer::new().evaluate(password);
    if as_json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        return;
    }
    println!("Score:      {}/100", report.score);
    println!("Strength:   {}", report.strength.label());
    println!("Crack time: {}", report.crack_time);
    for observation in &report.observations {
        println!("  - {observation}");
    }
}

fn check_url(config: AnalyzerConfig, url: &str, as_json: bool) -> anyhow::Result<()> {
    let checker = WebsiteChecker::new(config);
    let report = checker.check(url)?;
    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!("URL:      {}", report.url);
    println!("Domain:   {}", report.registered_domain);
    println!("Score:    {}", report.score);
    println!("Category: {}", report.category.label());
    for hit in &report.hits {
        println!("  [+{}] {}", hit.weight, hit.reason);
    }
    Ok(())
}

fn run_quiz(path: &str) -> anyhow::Result<()> {
    let bank = QuestionBank::load_from_file(Path::new(path))?;
    let mut session = QuizSession::new(bank);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Quiz: {} ({} questions)", session.bank_name(), session.total());
    while let Some(question) = session.current().cloned() {
        println!();
        println!("{}. {}", session.position() + 1, question.prompt);
        for (i, choice) in question.choices.iter().enumerate() {
            println!("   {}) {}", i + 1, choice);
        }
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let choice = match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                println!("Enter a number between 1 and {}", question.choices.len());
                continue;
            }
        };

        match session.answer(choice) {
            Ok(outcome) => {
                if outcome.correct {
                    println!("Correct.");
                } else {
                    println!("Not quite — the answer is: {}", outcome.correct_choice);
                }
                if let Some(explanation) = outcome.explanation {
                    println!("{explanation}");
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    let summary = session.summary();
    println!();
    println!(
        "Finished: {}/{} correct ({}%)",
        summary.correct, summary.total, summary.percent
    );
    Ok(())
}
