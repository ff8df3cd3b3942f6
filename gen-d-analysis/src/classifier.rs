//! Drift classifier (§4.4): a pure, total function over
//! `(current, snapshot?)` applying five ordered rules, plus the fold into a
//! `DriftReport` (§4.4, §8 property 7).
//!
//! Reason and suggestion text follow the original `gen-d` Python
//! implementation's `DriftDetector.explain` wording verbatim (see
//! SPEC_FULL.md §4.4), not invented strings.

use gen_d_core::types::{CallableRecord, DriftExplanation, DriftReport, DriftStatus, Snapshot};

/// Apply the five ordered rules (first match wins) and return the status.
pub fn classify(current: &CallableRecord, snapshot: Option<&Snapshot>) -> DriftStatus {
    if !current.has_docstring() {
        return DriftStatus::Undocumented;
    }
    let Some(snap) = snapshot else {
        return DriftStatus::Fresh;
    };
    if current.semantic_fingerprint == snap.semantic_fingerprint {
        return DriftStatus::Fresh;
    }
    if current.doc_fingerprint != snap.doc_fingerprint {
        return DriftStatus::Fresh;
    }
    DriftStatus::Stale
}

/// Produce the structured explanation alongside the status (§4.4).
pub fn explain(current: &CallableRecord, snapshot: Option<&Snapshot>) -> DriftExplanation {
    let status = classify(current, snapshot);
    let (reason, suggestions) = match status {
        DriftStatus::Undocumented => (
            "This function has no docstring.".to_string(),
            vec!["Add a docstring describing what this function does.".to_string()],
        ),
        DriftStatus::Fresh if snapshot.is_none() => (
            "Newly introduced and already documented.".to_string(),
            vec!["No action needed — this is a new, documented function.".to_string()],
        ),
        DriftStatus::Fresh => {
            let snap = snapshot.unwrap();
            if current.semantic_fingerprint == snap.semantic_fingerprint {
                (
                    "Code logic is unchanged since the docstring was last reviewed.".to_string(),
                    vec!["No action needed.".to_string()],
                )
            } else {
                (
                    "Documentation was updated alongside a code change.".to_string(),
                    vec!["No action needed — the docstring was revised.".to_string()],
                )
            }
        }
        DriftStatus::Stale => {
            let snap = snapshot.unwrap();
            (
                format!(
                    "Code logic changed (hash differs) but docstring unchanged.\n  - Old code hash: {}...\n  - New code hash: {}...",
                    &snap.semantic_fingerprint[..16],
                    &current.semantic_fingerprint[..16],
                ),
                vec![
                    format!("Review whether the docstring at {} still describes the current behavior.", current.id),
                    "Update the docstring, then run `gdg scan` again.".to_string(),
                ],
            )
        }
    };

    DriftExplanation {
        callable_id: current.id.clone(),
        status,
        reason,
        current_semantic_fingerprint: current.semantic_fingerprint.clone(),
        stored_semantic_fingerprint: snapshot.map(|s| s.semantic_fingerprint.clone()),
        current_doc_fingerprint: current.doc_fingerprint.clone(),
        stored_doc_fingerprint: snapshot.and_then(|s| s.doc_fingerprint.clone()),
        suggestions,
    }
}

/// Fold `classify` over every callable of a scan, in input order (§4.4, §8 property 7).
pub fn build_report<'a>(
    callables: impl IntoIterator<Item = &'a CallableRecord>,
    snapshots: &std::collections::BTreeMap<String, Snapshot>,
) -> DriftReport {
    let mut report = DriftReport::default();
    for callable in callables {
        let status = classify(callable, snapshots.get(&callable.id));
        match status {
            DriftStatus::Fresh => report.fresh_count += 1,
            DriftStatus::Stale => {
                report.stale_count += 1;
                report.stale_ids.push(callable.id.clone());
            }
            DriftStatus::Undocumented => {
                report.undocumented_count += 1;
                report.undocumented_ids.push(callable.id.clone());
            }
        }
    }
    report
}
