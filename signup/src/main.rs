//! Command-line front-end: subscribe one address to the configured account.
//!
//! Exit codes: 0 subscribed, 1 the API rejected the request, 2 bad
//! configuration or input.

use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mailrelay_core::DEFAULT_TIMEOUT_SECS;
use mailrelay_signup::telemetry::{get_subscriber, init_subscriber};
use mailrelay_signup::{Settings, Signup, SignupForm};
use serde_json::Value;

/// Sign up a new person to a MailRelay mailing list.
#[derive(Parser, Debug)]
#[command(name = "mailrelay-signup", version, about)]
struct Cli {
    /// Email address to subscribe
    #[arg(short, long)]
    email: String,

    /// Merge field as KEY=VALUE (repeatable)
    #[arg(short, long = "merge", value_name = "KEY=VALUE", value_parser = parse_merge)]
    merge: Vec<(String, String)>,

    /// Request timeout in seconds; 0 disables it
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "MAILRELAY_LOG", default_value = "info")]
    log: String,
}

fn parse_merge(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut settings = Settings::from_env().context("reading MailRelay settings")?;
    if cli.insecure {
        settings.verify_tls = false;
    }

    let form = SignupForm {
        email: cli.email,
        merge: cli
            .merge
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect::<BTreeMap<_, _>>(),
    };

    let outcome = Signup::new(settings)
        .timeout_secs(cli.timeout)
        .subscribe(&form)?;

    match outcome.error {
        None => println!("Subscribed {}", form.email),
        Some(error) => eprintln!("{error}"),
    }
    Ok(outcome.success)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_subscriber(get_subscriber(&cli.log)) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_pairs_are_split_on_first_equals() {
        assert_eq!(
            parse_merge("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_merge("novalue").is_err());
        assert!(parse_merge("=x").is_err());
    }

    #[test]
    fn cli_accepts_repeated_merge_fields() {
        let cli = Cli::try_parse_from([
            "mailrelay-signup",
            "--email",
            "ana@example.com",
            "-m",
            "name=Ana",
            "-m",
            "city=Oslo",
            "--insecure",
        ])
        .unwrap();
        assert_eq!(cli.merge.len(), 2);
        assert!(cli.insecure);
        assert_eq!(cli.timeout, DEFAULT_TIMEOUT_SECS);
    }
}
