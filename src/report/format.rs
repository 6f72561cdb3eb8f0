//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the search code stays clean and testable
//! - output changes are localized

use crate::domain::{MatrixSetStats, RunConfig};
use crate::math::{Transform, decompose};
use crate::search::SearchOutcome;

/// Format the run summary (inputs + settings + accepted offsets).
pub fn format_search_summary(outcome: &SearchOutcome, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== offsets - transform offset search ===\n");
    out.push_str(&format!(
        "Model: {} ({} transforms)\n",
        config.model_path.display(),
        outcome.model_count
    ));
    out.push_str(&format!(
        "Space: {} ({} transforms)\n",
        config.space_path.display(),
        outcome.space_count
    ));
    out.push_str(&format!(
        "Policy: {} | epsilon={} | work items={} | elapsed={:.1?}\n",
        outcome.policy.display_name(),
        outcome.epsilon,
        outcome.work_items,
        outcome.elapsed
    ));

    out.push_str(&format!("\nAccepted offsets: {}\n", outcome.matches.len()));
    for m in outcome.matches.iter().take(config.print_limit) {
        out.push_str(&format!("- model[{}] -> space[{}]\n", m.model_index, m.space_index));
        out.push_str(&format_matrix(&m.offset, "    "));
    }
    let hidden = outcome.matches.len().saturating_sub(config.print_limit);
    if hidden > 0 {
        out.push_str(&format!("  ({hidden} more not shown)\n"));
    }

    out
}

/// Format a 4×4 transform, one row per line.
pub fn format_matrix(t: &Transform, indent: &str) -> String {
    let mut out = String::new();
    for r in 0..4 {
        out.push_str(indent);
        out.push_str(
            format!(
                "[{:>11.5} {:>11.5} {:>11.5} {:>11.5}]",
                t[(r, 0)],
                t[(r, 1)],
                t[(r, 2)],
                t[(r, 3)]
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Format a table of decomposed poses (position, orientation, scale).
pub fn format_pose_table(label: &str, transforms: &[Transform]) -> String {
    let mut out = String::new();

    out.push_str(&format!("{label}: {} transforms\n", transforms.len()));
    out.push_str(
        format!(
            "{:>5} {:<30} {:<38} {:<30}\n",
            "#", "position", "orientation (x, y, z, w)", "scale"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<5} {:-<30} {:-<38} {:-<30}\n", "", "", "", "").trim_end());
    out.push('\n');

    for (i, t) in transforms.iter().enumerate() {
        let pose = decompose(t);
        let q = pose.orientation.quaternion();
        out.push_str(
            format!(
                "{:>5} {:<30} {:<38} {:<30}\n",
                i,
                fmt_vec(&[pose.position.x, pose.position.y, pose.position.z]),
                fmt_vec(&[q.i, q.j, q.k, q.w]),
                fmt_vec(&[pose.scale.x, pose.scale.y, pose.scale.z]),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format matrix-set counts and translation extents.
pub fn format_set_stats(stats: &MatrixSetStats) -> String {
    let mut out = format!(
        "Transforms: {} | position min={} max={}\n",
        stats.count,
        fmt_vec(stats.position_min.as_slice()),
        fmt_vec(stats.position_max.as_slice()),
    );
    if stats.non_affine > 0 {
        out.push_str(&format!(
            "Warning: {} transforms have a bottom row other than [0, 0, 0, 1]\n",
            stats.non_affine
        ));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.3}")).collect();
    format!("[{}]", parts.join(", "))
}
