use clap::Parser;
use pathplan::app::views;
use pathplan::config::{Command, LogFormat};
use pathplan::domain::model::ResumeDocument;
use pathplan::utils::error::ErrorSeverity;
use pathplan::utils::{logger, validation::Validate};
use pathplan::{
    CliConfig, FileSessionStore, HttpAnalysisClient, IntakeRequest, Orchestrator, PathplanError,
    Result,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let settings = match cli.resolve() {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    match settings.log_format {
        LogFormat::Text => logger::init_cli_logger(settings.verbose),
        LogFormat::Json => logger::init_json_logger(settings.verbose),
    }
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = cli.validate().and_then(|_| settings.validate()) {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let client = HttpAnalysisClient::from_config(&settings);
    let store = FileSessionStore::from_config(&settings);

    let mut orchestrator = match Orchestrator::resume(client, store) {
        Ok(orchestrator) => orchestrator,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = run(&mut orchestrator, cli.command).await {
        tracing::error!(
            "{} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }
}

async fn run(
    orchestrator: &mut Orchestrator<HttpAnalysisClient, FileSessionStore>,
    command: Command,
) -> Result<()> {
    match command {
        Command::Analyze {
            resume,
            target_role,
            github,
            linkedin,
        } => {
            let resume = resume.map(ResumeDocument::from_path).transpose()?;
            let report = orchestrator
                .analyze(IntakeRequest {
                    resume,
                    target_role,
                    github_url: github,
                    linkedin_url: linkedin,
                })
                .await?;
            print!("{}", views::render_capabilities(&report));
        }
        Command::Opportunities => {
            let report = orchestrator.discover_opportunities().await?;
            print!("{}", views::render_opportunities(&report));
        }
        Command::Select { role } => {
            orchestrator.select_role(&role)?;
            println!("Selected {}. Next: pathplan roadmap", role.trim());
        }
        Command::Plan { goal } => {
            orchestrator.plan_roadmap(goal.as_deref()).await?;
            print!("{}", views::render_roadmap(&orchestrator.load_roadmap()?));
        }
        Command::Roadmap => {
            print!("{}", views::render_roadmap(&orchestrator.load_roadmap()?));
        }
        Command::Insight {
            github,
            linkedin,
            target_role,
        } => {
            let insight = orchestrator
                .professional_insight(&github, &linkedin, &target_role)
                .await?;
            println!("{}", serde_json::to_string_pretty(&insight)?);
        }
        Command::Status => {
            print!("{}", views::render_summary(&orchestrator.summary()?));
            if let Some(created) = orchestrator.store().created_at()? {
                println!("Session started {}", created.to_rfc3339());
            }
        }
        Command::Restart { clear } => {
            orchestrator.restart(clear)?;
            if clear {
                println!("Session cleared. Start again with: pathplan analyze --resume <file>");
            } else {
                println!("Back at intake. Stored results are kept until the session is cleared.");
            }
        }
    }
    Ok(())
}

fn exit_with(e: &PathplanError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
