use subtext_core::RuleStore;

const RULER: &str = "------------------------------------------------------------";

/// Tabular summary of every rule, in insertion order.
pub fn render_rules(store: &RuleStore) -> String {
    if store.is_empty() {
        return "No replacement rules defined".to_string();
    }

    let mut out = String::new();
    out.push_str("\nCurrent replacement rules:\n");
    out.push_str(RULER);
    out.push('\n');
    out.push_str(&format!(
        "{:<15} {:<20} {:<8} {}\n",
        "Trigger", "Replacement", "Uses", "Last Used"
    ));
    out.push_str(RULER);
    out.push('\n');
    for entry in store.entries() {
        out.push_str(&format!(
            "{:<15} {:<20} {:<8} {}\n",
            entry.trigger,
            entry.preview(),
            entry.usage_count,
            entry.last_used_date()
        ));
    }
    out.push_str(RULER);
    out
}

/// Usage statistics: the five most-used rules, the total across all rules,
/// and the three most recently fired.
pub fn render_stats(store: &RuleStore) -> String {
    if store.is_empty() {
        return "No statistics available - no replacements defined".to_string();
    }

    let mut out = String::new();
    out.push_str("\nReplacement Statistics:\n");
    out.push_str(RULER);
    out.push('\n');

    out.push_str("Most Used Replacements:\n");
    for entry in store.top_by_usage(5) {
        out.push_str(&format!("  {}: {} uses\n", entry.trigger, entry.usage_count));
    }

    out.push_str(&format!("\nTotal Replacements Made: {}\n", store.total_uses()));

    let recent = store.recently_used(3);
    if !recent.is_empty() {
        out.push_str("\nRecently Used:\n");
        for entry in recent {
            if let Some(when) = entry.last_used_display() {
                out.push_str(&format!("  {}: {}\n", entry.trigger, when));
            }
        }
    }

    out.push_str(RULER);
    out
}

pub fn print_rules(store: &RuleStore) {
    println!("{}", render_rules(store));
}

pub fn print_stats(store: &RuleStore) {
    println!("{}", render_stats(store));
}
