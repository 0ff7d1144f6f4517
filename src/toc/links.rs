//! Link-chain resolution for highlighting.
//!
//! Given a selected slot, collects the payload-list slots that participate
//! in its chain: everything it transitively points to (forward along `link`)
//! and everything that transitively points to it (backward). Both passes are
//! iterative with visited-set guards, and the forward walk carries an
//! explicit step bound so a malformed ToC with a link cycle cannot hang the
//! resolver.

use crate::toc::models::{SLOT_COUNT, Selection, Toc, TocTable, link_target};
use std::collections::BTreeSet;

/// Upper bound on forward-walk steps; a well-formed chain terminates within
/// the list size.
const MAX_CHAIN_STEPS: usize = SLOT_COUNT;

pub fn resolve_chain(toc: &Toc, table: TocTable, selection: Selection) -> BTreeSet<usize> {
    let mut chain = BTreeSet::new();

    // Sentinel selection: nothing to highlight, never expand from slot 0.
    let Some(start) = selection.resolve(toc, table) else {
        return chain;
    };

    // Forward: follow links until the sentinel, a revisit or the bound.
    let mut current = Some(start);
    let mut steps = 0;
    while let Some(index) = current {
        if !chain.insert(index) {
            break;
        }
        steps += 1;
        if steps >= MAX_CHAIN_STEPS {
            break;
        }
        current = toc.record_link(table, index).and_then(link_target);
    }

    // Backward: worklist of targets whose predecessors still need
    // collecting. A slot already seen is never enqueued twice.
    let mut seen: BTreeSet<usize> = BTreeSet::from([start]);
    let mut work = vec![start];
    while let Some(target) = work.pop() {
        for index in 1..toc.list_len(table).min(SLOT_COUNT) {
            if seen.contains(&index) {
                continue;
            }
            let points_here = toc.record_link(table, index).and_then(link_target) == Some(target);
            if points_here {
                seen.insert(index);
                chain.insert(index);
                work.push(index);
            }
        }
    }

    chain
}
