//! Human-readable import summary

use crate::database::EntityCounts;

/// Format `count noun` with a plural `s` when needed
pub fn pluralize(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Join items as an English list: "a", "a and b", "a, b, and c"
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

/// Summary line comparing entity counts before and after an import
pub fn added_summary(before: EntityCounts, after: EntityCounts) -> String {
    let parts = [
        pluralize(after.sets - before.sets, "new set"),
        pluralize(after.cards - before.cards, "new card"),
        pluralize(after.printings - before.printings, "new printing"),
    ];
    format!("Added {}.", join_list(&parts))
}
