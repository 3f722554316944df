//! Noise filter behavior over realistic release text.

use earnings_corpus::{NoiseFilter, NoiseRule};

const RELEASE_BLOCKS: &[&str] = &[
    "ACME Corp today reports results for the third quarter, with revenue ahead of plan.",
    "Operating margin expanded as the company benefited from lower freight costs.",
    "This press release contains forward-looking statements within the meaning of the Private Securities Litigation Reform Act.",
    "A conference call to discuss these results will be held tomorrow at noon.",
    "For more information visit the investor relations site.",
    "(1)  Excludes restructuring charges.",
    "ACME is a registered trademark of ACME Corp.",
    "\u{a9} Copyright ACME Corp. All rights reserved.",
];

fn join(blocks: &[&str]) -> String {
    blocks.join("\n\n")
}

#[test]
fn test_release_boilerplate_removed() {
    let report = NoiseFilter::default().filter_detailed(&join(RELEASE_BLOCKS));

    assert!(!report.reverted);
    assert_eq!(
        report.text,
        "ACME Corp today reports results for the third quarter, with revenue ahead of plan.\n\n\
         Operating margin expanded as the company benefited from lower freight costs."
    );
    let rules: Vec<&str> = report.dropped.iter().map(|d| d.rule.as_str()).collect();
    assert_eq!(
        rules,
        vec![
            "FORWARD-LOOKING",
            "CONFERENCE CALL",
            "COMPANY INFO4",
            "FOOTNOTES",
            "TRADEMARKS1",
            "COPYRIGHTS",
        ]
    );
}

#[test]
fn test_trim_limit_invariant_holds() {
    let inputs = [
        join(RELEASE_BLOCKS),
        join(&RELEASE_BLOCKS[2..]),
        join(&RELEASE_BLOCKS[..2]),
        "Short.\n\nA conference call will follow.".to_string(),
        "A conference call will follow.".to_string(),
        "x".to_string(),
    ];

    for limit in [0.0, 0.05, 0.5, 0.9, 1.0] {
        let filter = NoiseFilter::new(limit);
        for input in &inputs {
            let out = filter.filter(input);
            let kept = out.chars().count() as f64 / input.chars().count() as f64;
            assert!(
                out == *input || kept >= limit,
                "limit {limit} violated for {input:?}: kept {kept}"
            );
        }
    }
}

#[test]
fn test_all_noise_reverts_to_original() {
    let text = join(&RELEASE_BLOCKS[2..]);
    let report = NoiseFilter::default().filter_detailed(&text);
    assert!(report.reverted);
    assert_eq!(report.text, text);
}

#[test]
fn test_empty_input_is_empty() {
    assert_eq!(NoiseFilter::default().filter(""), "");
}

#[test]
fn test_custom_rule_is_applied() {
    let mut filter = NoiseFilter::new(0.0);
    filter.push_rule(NoiseRule::new("SAFE HARBOR", "safe harbor legend", r"(?i)safe harbor").unwrap());

    let out = filter.filter("Revenue rose strongly in every segment.\n\nSafe Harbor legend applies here.");
    assert_eq!(out, "Revenue rose strongly in every segment.");
}

#[test]
fn test_invalid_rule_pattern() {
    let err = NoiseRule::new("BROKEN", "unbalanced", r"(unclosed").unwrap_err();
    assert!(err.to_string().contains("BROKEN"));
}
