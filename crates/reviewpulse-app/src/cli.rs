use clap::Parser;
use reviewpulse_classifiers::ProviderKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewpulse")]
#[command(
    author,
    version,
    about = "Classify random product reviews as positive, negative or neutral"
)]
pub struct Cli {
    /// Config file path (defaults to ./reviewpulse.yaml when present)
    #[arg(short, long, env = "REVIEWPULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Review source: URL, file:// URI or path to a tab-separated file
    #[arg(short, long)]
    pub source: Option<String>,

    /// Model provider: lexicon or distilbert
    #[arg(short, long, value_parser = parse_provider)]
    pub provider: Option<ProviderKind>,

    /// Telemetry beacon endpoint
    #[arg(long, env = "REVIEWPULSE_TELEMETRY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Disable telemetry entirely
    #[arg(long)]
    pub no_telemetry: bool,

    /// Number of random reviews to analyze
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u32,

    /// Seed for review sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_provider(s: &str) -> Result<ProviderKind, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["reviewpulse"]);
        assert_eq!(cli.count, 1);
        assert!(cli.provider.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["reviewpulse", "--provider", "gpt"]).is_err());
    }
}
