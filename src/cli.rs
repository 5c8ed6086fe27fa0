use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ConfigOverrides;

#[derive(Parser)]
#[command(name = "crust")]
#[command(about = "🔍 CRUST - AI-assisted Terraform plan analysis")]
#[command(long_about = "CRUST runs your terraform/terragrunt plan and asks an AI model to review it.

QUICK START:
  crust init                                  # Save API key, plan command and language
  crust security                              # Review security issues in the plan
  crust cost                                  # Estimate the monthly cost delta (AWS)
  crust explain                               # Explain the changes in plain language
  crust all                                   # Run all three on a single plan

EXAMPLES:
  crust cost --plan-command \"terragrunt plan\"
  crust explain --language pt-br
  terraform plan -no-color > plan.txt && crust security --input plan.txt

CONFIGURATION FILE: ~/.crust.json")]
#[command(version = "1.0.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only print results and errors")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Initialize Crust")]
    #[command(long_about = "Interactively create ~/.crust.json with your OpenAI API key, the command that produces
the terraform plan, and the language for AI answers. Asks before overwriting an existing file.")]
    Init,

    #[command(about = "Analyzes security issues in terraform plan/apply output")]
    Security(AnalysisArgs),

    #[command(about = "Analyzes the cost of terraform changes")]
    #[command(long_about = "Extract the resources a plan replaces and creates, price them with the AWS Price List API
(on-demand, Linux, shared tenancy, 730 hours/month) and show the monthly difference.

Only AWS plans are supported. AWS credentials are taken from the default provider chain.")]
    Cost(AnalysisArgs),

    #[command(about = "Explains terraform/terragrunt plan output")]
    Explain(AnalysisArgs),

    #[command(about = "Analyzes security, cost, and explains terraform/terragrunt plan output")]
    All(AnalysisArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct AnalysisArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, help = "OpenAI API key (overrides the config file)")]
    pub api_key: Option<String>,

    #[arg(short, long, help = "Language for the AI answer, e.g. en, pt-br")]
    pub language: Option<String>,

    #[arg(short, long, help = "Command that prints the terraform plan")]
    pub plan_command: Option<String>,

    #[arg(short, long, help = "Read the plan from a file instead of running the plan command (- for stdin)")]
    pub input: Option<PathBuf>,

    #[arg(short, long, help = "Model name (default gpt-4o)")]
    pub model: Option<String>,
}

impl AnalysisArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.api_key.clone(),
            language: self.language.clone(),
            plan_command: self.plan_command.clone(),
            model: self.model.clone(),
            has_plan_input: self.input.is_some(),
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level. `RUST_LOG` wins when set.
    pub fn init_logging(&self) {
        let level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("crust={}", level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}
