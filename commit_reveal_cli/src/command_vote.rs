use crate::{parse_commitment, StateFile};
use commit_reveal::Config;

pub fn command_commit(matches: &clap::ArgMatches, state: &StateFile, config: Config) {
    let commitment = parse_commitment("commit", matches.value_of("COMMITMENT").unwrap_or(""));

    let mut engine = state.open("commit", config);
    if let Err(e) = engine.commit_vote(commitment) {
        eprintln!("commit-reveal commit: {}", e);
        std::process::exit(1);
    }
    state.persist("commit", &engine);

    println!("committed: {}", commitment);
    if let Ok(ready_at) = engine.reveal_ready_at(&commitment) {
        println!("reveal-after: {}", ready_at);
    }
}

pub fn command_reveal(matches: &clap::ArgMatches, state: &StateFile, config: Config) {
    let ballot = matches.value_of("BALLOT").unwrap_or("");
    let commitment = parse_commitment("reveal", matches.value_of("COMMITMENT").unwrap_or(""));

    let mut engine = state.open("reveal", config);
    let choice = match engine.reveal_vote(ballot, &commitment) {
        Ok(choice) => choice,
        Err(e) => {
            eprintln!("commit-reveal reveal: {}", e);
            std::process::exit(1);
        }
    };
    state.persist("reveal", &engine);

    println!("revealed: {} ({})", commitment, choice);
}
