use clap::{App, AppSettings, Arg, SubCommand};
use commit_reveal::Config;

mod command_ballot;
mod command_post_transaction;
mod command_query;
mod command_vote;
mod state;

pub use command_ballot::*;
pub use command_post_transaction::*;
pub use command_query::*;
pub use command_vote::*;
pub use state::*;

fn main() {
    let matches = App::new("Commit-Reveal CLI")
        .version("0.1")
        .author("Patrick Hayes <patrick.d.hayes@gmail.com>")
        .about("Commit and reveal votes against a local commit-reveal ledger")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("state")
                .long("state")
                .takes_value(true)
                .help("Set the state file - can also be set with COMMIT_REVEAL_STATE"),
        )
        .arg(
            Arg::with_name("delay")
                .long("delay")
                .takes_value(true)
                .help("Reveal delay in seconds for a new state file - can also be set with COMMIT_REVEAL_DELAY"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            SubCommand::with_name("ballot")
                .about("Generate a ballot and its commitment")
                .arg(
                    Arg::with_name("CHOICE")
                        .index(1)
                        .required(true)
                        .possible_values(&["1", "2"])
                        .help("1 for YES, 2 for NO"),
                )
                .arg(
                    Arg::with_name("secret")
                        .long("secret")
                        .takes_value(true)
                        .help("Secret to use instead of a random one"),
                ),
        )
        .subcommand(
            SubCommand::with_name("hash")
                .about("Print the commitment for a ballot")
                .arg(
                    Arg::with_name("BALLOT")
                        .index(1)
                        .required(true)
                        .help("Ballot in the form <choice>~<secret>"),
                ),
        )
        .subcommand(
            SubCommand::with_name("commit")
                .about("Submit a commitment")
                .arg(
                    Arg::with_name("COMMITMENT")
                        .index(1)
                        .required(true)
                        .help("Hex encoded commitment"),
                ),
        )
        .subcommand(
            SubCommand::with_name("reveal")
                .about("Reveal the ballot behind a commitment")
                .arg(
                    Arg::with_name("BALLOT")
                        .index(1)
                        .required(true)
                        .help("Ballot in the form <choice>~<secret>"),
                )
                .arg(
                    Arg::with_name("COMMITMENT")
                        .index(2)
                        .required(true)
                        .help("Hex encoded commitment"),
                ),
        )
        .subcommand(
            SubCommand::with_name("status")
                .about("Print the status of a commitment")
                .arg(
                    Arg::with_name("COMMITMENT")
                        .index(1)
                        .required(true)
                        .help("Hex encoded commitment"),
                ),
        )
        .subcommand(SubCommand::with_name("commits").about("List commitments in submission order"))
        .subcommand(
            SubCommand::with_name("tally")
                .about("Print the vote counts")
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .help("Print the tally as JSON"),
                ),
        )
        .subcommand(SubCommand::with_name("winner").about("Print the current leader"))
        .subcommand(
            SubCommand::with_name("post")
                .about("Apply transaction(s)")
                .arg(
                    Arg::with_name("INPUT")
                        .index(1)
                        .required(true)
                        .multiple(true)
                        .help("Transaction file in JSON or CBOR format"),
                )
                .arg(
                    Arg::with_name("dry-run")
                        .long("dry-run")
                        .help("Validate without applying"),
                ),
        )
        .get_matches();

    let level = match matches.occurrences_of("v") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Gets a value for state if supplied by user, or falls back to the environment, then the default
    let env_var = std::env::var(STATE_ENV);
    let state_path = match matches.value_of("state") {
        Some(path) => path,
        None => env_var.as_deref().unwrap_or(DEFAULT_STATE_PATH),
    };
    let state = StateFile::new(expand(state_path));
    log::info!("state file: {}", state.path().display());

    let config = match matches.value_of("delay") {
        Some(delay) => commit_reveal::parse_reveal_delay(delay).map(Config::with_reveal_delay),
        None => Config::from_env(),
    };
    let config = config.unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    // Subcommands
    match matches.subcommand() {
        ("ballot", Some(matches)) => command_ballot(matches),
        ("hash", Some(matches)) => command_hash(matches),
        ("commit", Some(matches)) => command_commit(matches, &state, config),
        ("reveal", Some(matches)) => command_reveal(matches, &state, config),
        ("status", Some(matches)) => command_status(matches, &state, config),
        ("commits", Some(_)) => command_commits(&state, config),
        ("tally", Some(matches)) => command_tally(matches, &state, config),
        ("winner", Some(_)) => command_winner(&state, config),
        ("post", Some(matches)) => command_post_transaction(matches, &state, config),
        _ => unreachable!("clap requires a subcommand"),
    }
}

/// Expand `~` and environment variables in a path
pub fn expand(input: &str) -> String {
    match shellexpand::full(input) {
        Ok(expanded) => expanded.into_owned(),
        Err(_) => input.to_owned(),
    }
}

/// Parse a commitment argument, exiting with an error message if it is invalid
pub fn parse_commitment(command: &str, input: &str) -> commit_reveal::Commitment {
    input.parse().unwrap_or_else(|e| {
        eprintln!("commit-reveal {}: {}", command, e);
        std::process::exit(1);
    })
}
