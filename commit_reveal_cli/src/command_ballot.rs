use commit_reveal::{Ballot, Choice, Commitment};

pub fn command_ballot(matches: &clap::ArgMatches) {
    let choice = match matches.value_of("CHOICE") {
        Some("1") => Choice::Yes,
        Some("2") => Choice::No,
        _ => {
            eprintln!("commit-reveal ballot: choice must be 1 or 2");
            std::process::exit(1);
        }
    };

    let ballot = match matches.value_of("secret") {
        Some(secret) => Ballot::new(choice, secret),
        None => Ballot::generate(choice),
    };

    // Keep the ballot line private until it is time to reveal
    println!("ballot: {}", ballot);
    println!("commitment: {}", ballot.commitment());
}

pub fn command_hash(matches: &clap::ArgMatches) {
    let ballot = matches.value_of("BALLOT").unwrap_or("");

    // Hash whatever was given, a reveal only needs the bytes to match
    if let Err(e) = ballot.parse::<Ballot>() {
        eprintln!("commit-reveal hash: WARNING: {}", e);
    }

    println!("{}", Commitment::of_str(ballot));
}
