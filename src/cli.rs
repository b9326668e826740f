use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "osintfinder",
    version,
    about = "OSINT lookup for usernames, emails, phones, domains and wallets",
    long_about = "OsintFinder classifies each query and runs a fixed set of public probes against it:\nprofile pages and APIs for usernames, DNS for emails and domains, offline checks for phones and wallets.\nRun once from the command line or serve the same lookups over HTTP with --serve."
)]
pub struct Args {
    /// Query to look up (username, email, phone, domain or wallet)
    #[arg(short = 'q', long = "query", value_name = "QUERY")]
    pub query: Vec<String>,

    /// File containing one query per line
    #[arg(short = 'l', long = "list", value_name = "FILE")]
    pub queries_file: Option<PathBuf>,

    /// Force the query type instead of detecting it
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub query_type: Option<String>,

    /// Output file
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_file: Option<String>,

    /// Output in JSON format
    #[arg(long = "json", conflicts_with = "html")]
    pub json: bool,

    /// Output as an HTML page
    #[arg(long = "html")]
    pub html: bool,

    /// Start the HTTP server
    #[arg(long = "serve")]
    pub serve: bool,

    /// Address for the HTTP server
    #[arg(long = "bind", value_name = "ADDR")]
    pub bind: Option<String>,

    /// Silent mode (no banner)
    #[arg(long = "silent")]
    pub silent: bool,

    /// Verbose mode (debug logs, failed probes in text output)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// List the probes run for each query type
    #[arg(long = "list-probes")]
    pub list_probes: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

impl Args {
    /// Check if we should read queries from stdin
    pub fn use_stdin(&self) -> bool {
        self.query.is_empty() && self.queries_file.is_none() && !atty::is(atty::Stream::Stdin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["osintfinder", "-q", "johndoe", "-q", "example.com", "--json", "-t", "social"]);
        assert_eq!(args.query, vec!["johndoe", "example.com"]);
        assert!(args.json);
        assert_eq!(args.query_type.as_deref(), Some("social"));
        assert!(!args.serve);
    }

    #[test]
    fn test_json_and_html_conflict() {
        assert!(Args::try_parse_from(["osintfinder", "--json", "--html"]).is_err());
    }

    #[test]
    fn test_serve_flags() {
        let args = Args::parse_from(["osintfinder", "--serve", "--bind", "0.0.0.0:8080"]);
        assert!(args.serve);
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
    }
}
