use crate::{parse_commitment, StateFile};
use commit_reveal::Config;

pub fn command_status(matches: &clap::ArgMatches, state: &StateFile, config: Config) {
    let commitment = parse_commitment("status", matches.value_of("COMMITMENT").unwrap_or(""));

    let engine = state.open("status", config);
    match engine.vote_statuses(&commitment) {
        Ok(status) => println!("{}", status),
        Err(e) => {
            eprintln!("commit-reveal status: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn command_commits(state: &StateFile, config: Config) {
    let engine = state.open("commits", config);
    for commitment in engine.get_vote_commits_array() {
        println!("{}", commitment);
    }
}

pub fn command_tally(matches: &clap::ArgMatches, state: &StateFile, config: Config) {
    let engine = state.open("tally", config);
    let tally = engine.tally();

    if matches.is_present("json") {
        match serde_json::to_string_pretty(&tally) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("commit-reveal tally: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("votes-cast: {}", engine.number_of_votes_cast());
    println!("votes-for-choice-1: {}", tally.votes_for_choice_1);
    println!("votes-for-choice-2: {}", tally.votes_for_choice_2);
    println!("winner: {}", tally.winner);
}

pub fn command_winner(state: &StateFile, config: Config) {
    let engine = state.open("winner", config);
    println!("{}", engine.get_winner());
}
