//! Codes CLI subcommand.
//!
//! This subcommand lists the LDPC codes of the IEEE 802.11 table, with their
//! dimensions, circulant size and number of edges of the Tanner graph.
//!
//! # Examples
//! ```shell
//! $ ldpc802 codes
//! rate  n     k     m    Z   edges
//! 1/2   648   324   324  27  2376
//! ...
//! ```

use crate::{cli::*, codes::CodeTable};

/// Codes CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Lists the IEEE 802.11 LDPC codes")]
pub struct Args {}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        print!("{}", table()?);
        Ok(())
    }
}

fn table() -> Result<String, Box<dyn Error>> {
    let mut out = format!(
        "{:<5} {:<5} {:<5} {:<4} {:<3} {}\n",
        "rate", "n", "k", "m", "Z", "edges"
    );
    for (rate, _, code) in CodeTable::global()?.iter() {
        let z = code
            .circulant_size()
            .map_or_else(|| "-".to_string(), |z| z.to_string());
        out.push_str(&format!(
            "{:<5} {:<5} {:<5} {:<4} {:<3} {}\n",
            rate.to_string(),
            code.n(),
            code.k(),
            code.m(),
            z,
            code.h().num_ones()
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn listing() {
        let table = table().unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("rate"));
        assert_eq!(
            lines[1].split_whitespace().collect::<Vec<_>>(),
            ["1/2", "648", "324", "324", "27", "2376"]
        );
    }
}
