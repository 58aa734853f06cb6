//! Human-readable console output: the configuration banner before a run
//! and the summary block after it.

use fanout::{RunConfig, RunSummary};

const RULE: &str = "============================================================";

pub fn print_banner(config: &RunConfig, total_batches: usize) {
    println!("\n{RULE}");
    println!("Batch Processing Configuration");
    println!("{RULE}");
    println!("Total records:  {}", group_thousands(config.total));
    println!("Batch size:     {}", group_thousands(config.batch_size));
    println!("Total batches:  {}", group_thousands(total_batches as u64));
    println!("Parallelism:    {}", config.parallelism);
    println!("Start offset:   {}", group_thousands(config.start_offset));
    println!("{RULE}\n");

    if config.dry_run {
        println!("[DRY RUN MODE - No actual triggers]\n");
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n{RULE}");
    println!("Summary: {summary}");
    println!("{RULE}\n");
}

/// Formats `n` with comma thousands separators (`5000000` -> `5,000,000`).
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(100_000), "100,000");
        assert_eq!(group_thousands(5_000_000), "5,000,000");
    }
}
