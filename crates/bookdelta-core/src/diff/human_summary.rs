//! Human-readable change report.

use crate::diff::model::{ChangeSet, DiffOutcome};
use crate::model::{RecordId, Snapshot};

/// Column used for the `Name` cell when the snapshot has one.
const NAME_COLUMN: &str = "name";

/// Render a Markdown report of a diff outcome.
///
/// Rows are ordered by record id; added records come with `N/A` details,
/// changed records list `field: old → new` pairs.
pub fn render_change_summary(outcome: &DiffOutcome, new: &Snapshot) -> String {
    let mut out = String::from("## Change Report\n\n");

    let set = match outcome {
        DiffOutcome::NoOp => {
            out.push_str("_No new or changed records._\n");
            return out;
        }
        DiffOutcome::Changes(set) => set,
    };

    out.push_str(&format!(
        "**Added**: {}  \n**Changed**: {}\n\n",
        set.added.len(),
        set.changed.len()
    ));
    out.push_str("| ID | Name | Status | Change Details |\n|---|---|---|---|\n");

    for id in set.affected_ids() {
        let name = new
            .get(&id)
            .and_then(|r| new.value(r, NAME_COLUMN))
            .filter(|v| !v.is_missing())
            .map(|v| v.to_cell())
            .unwrap_or_else(|| "N/A".to_string());
        let (status, details) = if set.is_added(&id) {
            ("Added", "N/A".to_string())
        } else {
            ("Changed", change_details(set, &id))
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape(id.as_str()),
            escape(&name),
            status,
            escape(&details)
        ));
    }

    out
}

fn change_details(set: &ChangeSet, id: &RecordId) -> String {
    set.changed
        .get(id)
        .map(|fields| {
            fields
                .iter()
                .map(|(col, c)| format!("{}: {} → {}", col, c.old, c.new))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

/// Keep cell text from breaking the table.
fn escape(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}
