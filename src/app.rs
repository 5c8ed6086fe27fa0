use anyhow::{anyhow, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::{AnalysisArgs, Commands};
use crate::config::{Config, Settings};
use crate::cost::{self, CostOutcome, UNSUPPORTED_PROVIDER_NOTICE};
use crate::error::CrustError;
use crate::llm::{CompletionRequest, LanguageModel, OpenAiClient};
use crate::markup;
use crate::plan::PlanSource;
use crate::pricing::{AwsPriceCatalog, PricingLookup};
use crate::progress::{self, Spinner};
use crate::prompts::{PromptKind, PromptLibrary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    Security,
    Cost,
    Explain,
}

impl Analysis {
    fn heading(self) -> &'static str {
        match self {
            Analysis::Security => "🔍 Analyzing security issues...",
            Analysis::Cost => "💰 Analyzing costs...",
            Analysis::Explain => "🔍 Explaining Terraform changes...",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Analysis::Security => "Error analyzing security issues",
            Analysis::Cost => "Error analyzing costs",
            Analysis::Explain => "Error explaining terraform changes",
        }
    }
}

pub struct App {
    quiet: bool,
    config_path: PathBuf,
}

impl App {
    pub fn new(quiet: bool) -> Result<Self> {
        Ok(Self::with_config_path(quiet, Config::config_path()?))
    }

    pub fn with_config_path(quiet: bool, config_path: PathBuf) -> Self {
        Self { quiet, config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub async fn run_command(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Init => self.run_init().await,
            Commands::Security(args) => self.run_analyses(&args, &[Analysis::Security]).await,
            Commands::Cost(args) => self.run_analyses(&args, &[Analysis::Cost]).await,
            Commands::Explain(args) => self.run_analyses(&args, &[Analysis::Explain]).await,
            Commands::All(args) => {
                eprintln!("{}", "🔍 Running all checks...".blue());
                self.run_analyses(&args, &[Analysis::Security, Analysis::Cost, Analysis::Explain])
                    .await
            }
        }
    }

    /// Resolves settings, obtains the plan once, then runs each analysis in
    /// order. A failing analysis is logged and does not stop the next one.
    async fn run_analyses(&self, args: &AnalysisArgs, analyses: &[Analysis]) -> Result<()> {
        progress::note(!self.quiet, "Getting configuration...");

        let settings = match self.load_settings(args).await {
            Ok(settings) => settings,
            Err(CrustError::ConfigMissing { path }) => {
                print_config_missing(&path);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let source = match (&args.input, &settings.plan_command) {
            (Some(path), _) => PlanSource::File(path.clone()),
            (None, Some(command)) => PlanSource::Command(command.clone()),
            (None, None) => return Err(anyhow!("no plan command or plan input given")),
        };

        let spinner = Spinner::new(!self.quiet, &format!("Executing terraform plan ({})", source.describe()));
        let plan = match source.read().await {
            Ok(plan) => {
                spinner.succeed();
                plan
            }
            Err(e) => {
                spinner.fail();
                return Err(e.into());
            }
        };

        let model = OpenAiClient::from_settings(&settings)?;
        let prompts = PromptLibrary::new(&settings.language)?;

        let mut failures = 0;
        for &analysis in analyses {
            if !self.quiet {
                eprintln!("{}", analysis.heading().blue());
            }
            if let Err(e) = self.run_analysis(analysis, &model, &prompts, &plan).await {
                tracing::error!("{}: {}", analysis.failure_message(), e);
                failures += 1;
            }
        }

        if failures > 0 {
            return Err(anyhow!("{} of {} analyses failed", failures, analyses.len()));
        }
        Ok(())
    }

    async fn load_settings(&self, args: &AnalysisArgs) -> Result<Settings, CrustError> {
        let file = Config::load_from(&self.config_path).await?;
        Settings::resolve(file, &args.overrides(), &self.config_path)
    }

    async fn run_analysis(
        &self,
        analysis: Analysis,
        model: &OpenAiClient,
        prompts: &PromptLibrary,
        plan: &str,
    ) -> Result<()> {
        match analysis {
            Analysis::Security => {
                self.run_tagged_analysis(model, prompts, PromptKind::Security, plan, "No security issues found")
                    .await
            }
            Analysis::Explain => {
                self.run_tagged_analysis(model, prompts, PromptKind::Explain, plan, "No explanation found")
                    .await
            }
            Analysis::Cost => self.run_cost(model, prompts, plan).await,
        }
    }

    async fn run_tagged_analysis<M: LanguageModel>(
        &self,
        model: &M,
        prompts: &PromptLibrary,
        kind: PromptKind,
        plan: &str,
        empty_message: &str,
    ) -> Result<()> {
        let request = CompletionRequest::new(prompts.render(kind)?, plan);

        let spinner = Spinner::new(!self.quiet, "Waiting for the model");
        let answer = match model.complete(&request).await {
            Ok(answer) => {
                spinner.succeed();
                answer
            }
            Err(e) => {
                spinner.fail();
                return Err(e.into());
            }
        };

        match answer {
            Some(text) => println!("{}", markup::render(&text)),
            None => eprintln!("{}", empty_message.red()),
        }
        Ok(())
    }

    async fn run_cost(&self, model: &OpenAiClient, prompts: &PromptLibrary, plan: &str) -> Result<()> {
        let lookup = PricingLookup::new(AwsPriceCatalog::from_env().await);

        let spinner = Spinner::new(!self.quiet, "Mapping changes and pricing resources");
        let outcome = match cost::analyze_cost(model, prompts, &lookup, plan).await {
            Ok(outcome) => {
                spinner.succeed();
                outcome
            }
            Err(e) => {
                spinner.fail();
                return Err(e.into());
            }
        };

        match outcome {
            CostOutcome::UnsupportedProvider(provider) => {
                tracing::info!(%provider, "skipping cost analysis");
                eprintln!("{}", UNSUPPORTED_PROVIDER_NOTICE.yellow());
            }
            CostOutcome::Report(report) => {
                println!("\n{}", report.summary());
                report.table().to_table().printstd();
            }
        }
        Ok(())
    }

    async fn run_init(&self) -> Result<()> {
        if self.config_path.exists() {
            println!("{}", "⚠️  Configuration file already exists!".yellow());
            let answer = ask("Do you want to overwrite the configuration? (y/n): ")?;
            if answer.to_lowercase() != "y" {
                println!("{}", "Operation cancelled.".green());
                return Ok(());
            }
        }

        println!("{}", "📝 Crust Initial Configuration".blue());
        println!("{}", "Let's set up your environment...\n".bright_black());

        let openai_key = ask("🔑 Enter your OpenAI API key: ")?;
        if openai_key.is_empty() {
            println!("{}", "❌ API key cannot be empty. Configuration cancelled.".red());
            return Ok(());
        }
        let plan_command = ask("🔄 Command to execute terraform plan (e.g. terraform plan): ")?;
        let language = ask("🌐 Language (e.g. en, pt-br): ")?;

        Config::new(openai_key, plan_command, language)
            .save_to(&self.config_path)
            .await?;

        println!("{}", "\n✅ Configuration saved successfully!".green());
        Ok(())
    }
}

fn ask(question: &str) -> io::Result<String> {
    print!("{}", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn print_config_missing(path: &Path) {
    eprintln!("{}", "\n❌ Configuration file not found!".red());
    eprintln!("{}", "\nTo initialize the configuration, run:".yellow());
    eprintln!("{}", "  crust init".cyan());
    eprintln!(
        "{}",
        format!(
            "\nThis will create {} with default settings, or pass --api-key and --plan-command.",
            path.display()
        )
        .yellow()
    );
}
