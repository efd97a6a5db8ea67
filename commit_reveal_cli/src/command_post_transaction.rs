use crate::{expand, StateFile};
use commit_reveal::{Config, Transaction};
use content_inspector::ContentType;

pub fn command_post_transaction(matches: &clap::ArgMatches, state: &StateFile, config: Config) {
    let dry_run = matches.is_present("dry-run");
    let filenames: Vec<String> = match matches.values_of("INPUT") {
        Some(values) => values.map(expand).collect(),
        None => {
            eprintln!("commit-reveal post: input filename required");
            std::process::exit(1);
        }
    };

    // Read everything up front so a bad file doesn't leave a half-applied batch
    let transactions: Vec<Transaction> = filenames.iter().map(|f| read_transaction(f)).collect();

    let mut engine = state.open("post", config);
    for (filename, tx) in filenames.iter().zip(transactions.iter()) {
        let result = if dry_run {
            engine.validate(tx)
        } else {
            engine.apply(tx)
        };

        match result {
            Ok(()) => println!("{}: {} {} OK", filename, tx.transaction_type(), tx.commitment()),
            Err(e) => {
                eprintln!("commit-reveal post: {}: {}", filename, e);
                if !dry_run {
                    // Keep what was already applied
                    state.persist("post", &engine);
                }
                std::process::exit(1);
            }
        }
    }

    if !dry_run {
        state.persist("post", &engine);
    }
}

fn read_transaction(filename: &str) -> Transaction {
    let file_bytes = match std::fs::read(filename) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("commit-reveal post: unable to read {}: {}, ", filename, e);
            std::process::exit(1);
        }
    };

    decode_transaction(&file_bytes).unwrap_or_else(|e| {
        eprintln!("commit-reveal post: unable to read {}: {}", filename, e);
        std::process::exit(1);
    })
}

/// Decode a transaction file holding either JSON text or CBOR bytes
///
/// CBOR without a NUL byte looks like UTF-8 text, so the inspector only strips a UTF-8 BOM
/// and turns away other text encodings. The first significant byte picks the format.
pub fn decode_transaction(file_bytes: &[u8]) -> Result<Transaction, String> {
    let bytes = match content_inspector::inspect(file_bytes) {
        ContentType::UTF_8_BOM => &file_bytes[UTF_8_BOM_LEN..],
        ContentType::UTF_8 | ContentType::BINARY => file_bytes,
        other => return Err(format!("invalid file format: {:?}", other)),
    };
    Transaction::from_bytes(bytes).map_err(|e| e.to_string())
}

const UTF_8_BOM_LEN: usize = 3;
