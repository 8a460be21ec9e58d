//! CLI output formatting for runs.
//!
//! # Information-First Display
//!
//! The primary display for every category is its semantic identity, the
//! label the generated module declares, together with its positional index in
//! stacking order. Directories are secondary context on indented `Source:`
//! lines, so the output reads as an inventory of the generated `PARTS` table
//! while still pointing back at the files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! parts
//!     Source: sets/set1/green
//!     Order: layered
//!     Width: 3
//! 001 BODY (2 parts)
//!     Source: green/000#00Body
//! 002 EYES (3 parts)
//!     Source: green/003#01Eyes
//! ```
//!
//! ## Collect
//!
//! ```text
//! 002 EYES (3 parts)
//! 001 BODY (2 parts, 1 padded)
//! Wrote src/robot_parts.rs: 2 categories, 5 parts, 3 wide (48213 bytes)
//! ```
//!
//! Progress lines arrive in completion order; the index still reflects the
//! category's position in the table.
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::assemble::CategoryEncoded;
use crate::collect::{CollectReport, Plan};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn parts(n: usize) -> String {
    if n == 1 {
        "1 part".to_string()
    } else {
        format!("{n} parts")
    }
}

/// Category header: positional index, label and part count.
///
/// ```text
/// 001 BODY (2 parts)
/// 001 BODY (2 parts, 1 padded)
/// ```
fn category_header(index: usize, label: &str, count: usize, padding: usize) -> String {
    if padding == 0 {
        format!("{} {} ({})", format_index(index), label, parts(count))
    } else {
        format!(
            "{} {} ({}, {} padded)",
            format_index(index),
            label,
            parts(count),
            padding
        )
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Format the plan of one run: run header, then every category in stacking
/// order.
pub fn format_plan(run: &str, plan: &Plan) -> Vec<String> {
    let mut lines = vec![
        run.to_string(),
        format!("{}Source: {}", indent(1), plan.source.display()),
        format!("{}Order: {}", indent(1), plan.order),
        format!("{}Width: {}", indent(1), plan.width),
    ];

    if plan.categories.is_empty() {
        lines.push(format!("{}(no categories)", indent(1)));
        return lines;
    }

    for (i, category) in plan.categories.iter().enumerate() {
        lines.push(category_header(
            i + 1,
            &category.label,
            category.true_count(),
            0,
        ));
        lines.push(format!("{}Source: {}", indent(1), category.display_path));
    }
    lines
}

pub fn print_plan(run: &str, plan: &Plan) {
    for line in format_plan(run, plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Collect
// ============================================================================

/// Format a single progress event.
pub fn format_category_event(event: &CategoryEncoded) -> Vec<String> {
    vec![category_header(
        event.position,
        &event.label,
        event.count,
        event.padding,
    )]
}

/// Format the summary of a finished run.
pub fn format_report(report: &CollectReport) -> Vec<String> {
    let categories = match report.categories.len() {
        1 => "1 category".to_string(),
        n => format!("{n} categories"),
    };
    vec![format!(
        "Wrote {}: {}, {}, {} wide ({} bytes)",
        report.output.display(),
        categories,
        parts(report.image_count()),
        report.width,
        report.bytes
    )]
}

pub fn print_report(report: &CollectReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::ReportedCategory;
    use crate::stacking::StackingOrder;
    use crate::test_helpers::category;
    use std::path::PathBuf;

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(999), "999");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn parts_singular_and_plural() {
        assert_eq!(parts(1), "1 part");
        assert_eq!(parts(0), "0 parts");
        assert_eq!(parts(3), "3 parts");
    }

    #[test]
    fn category_header_with_and_without_padding() {
        assert_eq!(category_header(1, "BODY", 2, 0), "001 BODY (2 parts)");
        assert_eq!(
            category_header(2, "EYES", 1, 2),
            "002 EYES (1 part, 2 padded)"
        );
    }

    // =========================================================================
    // Scan
    // =========================================================================

    #[test]
    fn format_plan_lists_categories_in_order() {
        let plan = Plan {
            source: PathBuf::from("sets/set1/green"),
            order: StackingOrder::Layered,
            width: 3,
            categories: vec![
                category("green/000#00Body", 2),
                category("green/003#01Eyes", 3),
            ],
        };

        let lines = format_plan("parts", &plan);

        assert_eq!(
            lines,
            vec![
                "parts",
                "    Source: sets/set1/green",
                "    Order: layered",
                "    Width: 3",
                "001 BODY (2 parts)",
                "    Source: green/000#00Body",
                "002 EYES (3 parts)",
                "    Source: green/003#01Eyes",
            ]
        );
    }

    #[test]
    fn format_plan_empty() {
        let plan = Plan {
            source: PathBuf::from("backgrounds"),
            order: StackingOrder::Layered,
            width: 0,
            categories: Vec::new(),
        };

        let lines = format_plan("backgrounds", &plan);

        assert_eq!(lines.last().unwrap(), "    (no categories)");
    }

    #[test]
    fn format_plan_shows_discovery_order() {
        let plan = Plan {
            source: PathBuf::from("backgrounds"),
            order: StackingOrder::Discovery,
            width: 2,
            categories: vec![category("backgrounds", 2)],
        };

        let lines = format_plan("backgrounds", &plan);

        assert!(lines.contains(&"    Order: discovery".to_string()));
        assert!(lines.contains(&"001 BACKGROUND (2 parts)".to_string()));
    }

    // =========================================================================
    // Collect
    // =========================================================================

    #[test]
    fn format_category_event_uses_table_position() {
        let event = CategoryEncoded {
            position: 7,
            label: "HAT".to_string(),
            display_path: "green/010#07Hat".to_string(),
            count: 4,
            padding: 1,
        };
        assert_eq!(
            format_category_event(&event),
            vec!["007 HAT (4 parts, 1 padded)"]
        );
    }

    #[test]
    fn format_report_summarizes_run() {
        let report = CollectReport {
            run: "parts".to_string(),
            output: PathBuf::from("src/robot_parts.rs"),
            order: StackingOrder::Layered,
            width: 3,
            categories: vec![
                ReportedCategory {
                    label: "BODY".to_string(),
                    display_path: "green/000#00Body".to_string(),
                    count: 2,
                    padding: 1,
                },
                ReportedCategory {
                    label: "EYES".to_string(),
                    display_path: "green/003#01Eyes".to_string(),
                    count: 3,
                    padding: 0,
                },
            ],
            bytes: 48213,
        };

        assert_eq!(
            format_report(&report),
            vec!["Wrote src/robot_parts.rs: 2 categories, 5 parts, 3 wide (48213 bytes)"]
        );
    }

    #[test]
    fn format_report_single_category() {
        let report = CollectReport {
            run: "backgrounds".to_string(),
            output: PathBuf::from("src/backgrounds.rs"),
            order: StackingOrder::Discovery,
            width: 1,
            categories: vec![ReportedCategory {
                label: "BACKGROUND".to_string(),
                display_path: "backgrounds".to_string(),
                count: 1,
                padding: 0,
            }],
            bytes: 10,
        };

        assert_eq!(
            format_report(&report),
            vec!["Wrote src/backgrounds.rs: 1 category, 1 part, 1 wide (10 bytes)"]
        );
    }
}
