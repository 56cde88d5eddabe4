use clap::{Parser, Subcommand};
use segscan::digit::{AccountNumber, Digit, ACCOUNT_LEN};
use segscan::io_stream::AccountScanner;
use segscan::repair::repair_decoded;
use std::io::{BufReader, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "segscan", about = "Seven-segment account scanner CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file of 4-line glyph blocks; one result line per account
    Scan {
        input: PathBuf,
        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Attempt repair of checksum failures and illegible digits
        #[arg(short, long)]
        repair: bool,
        /// Emit the full record list as JSON instead of report lines
        #[arg(long)]
        json: bool,
        /// Placeholder for illegible digits
        #[arg(long, default_value_t = '?')]
        placeholder: char,
    },
    /// Checksum a bare 9-digit account number
    Check {
        /// Nine characters, digits or `?` for an illegible position
        digits: String,
        /// List valid repair candidates when the checksum fails
        #[arg(short, long)]
        repair: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        // ── Scan ─────────────────────────────────────────────────────────────
        Commands::Scan { input, output, repair, json, placeholder } => {
            let scanner = AccountScanner { repair, placeholder };
            let reader = BufReader::new(std::fs::File::open(&input)?);
            let records = scanner.scan(reader)?;

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(std::fs::File::create(path)?),
                None => Box::new(std::io::stdout()),
            };
            if json {
                scanner.write_json(&records, &mut writer)?;
            } else {
                scanner.write_report(&records, &mut writer)?;
            }
            if let Some(path) = &output {
                eprintln!("Processed {} record(s) → {}", records.len(), path.display());
            }
        }

        // ── Check ────────────────────────────────────────────────────────────
        Commands::Check { digits, repair } => {
            let number = parse_digits(&digits)?;
            println!("checksum: {}", number.checksum());
            if number.is_legible() && number.is_valid() {
                println!("status:   valid");
            } else if number.is_legible() {
                println!("status:   INVALID");
                if repair {
                    let candidates = repair_decoded(&number);
                    println!("{} valid candidate(s):", candidates.len());
                    for c in &candidates {
                        println!("  {}", c);
                    }
                }
            } else {
                println!("status:   illegible digits present (checksum is partial)");
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse_digits(s: &str) -> Result<AccountNumber, String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != ACCOUNT_LEN {
        return Err(format!("expected {} characters, got {}", ACCOUNT_LEN, chars.len()));
    }
    let mut digits = [Digit::Illegible; ACCOUNT_LEN];
    for (slot, ch) in digits.iter_mut().zip(chars) {
        *slot = match ch {
            '0'..='9' => Digit::Known(ch as u8 - b'0'),
            '?' => Digit::Illegible,
            other => return Err(format!("unexpected character '{other}'")),
        };
    }
    Ok(AccountNumber::new(digits))
}
