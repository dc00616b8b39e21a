use crate::interview::summary::{topic_of, Topic};

/// Picks a follow-up question keyed off the topic of the main question and
/// how well it was answered. Advisory only: follow-ups are shown to the
/// candidate but never recorded, so session records stay 1:1 with the bank.
pub fn suggest(question: &str, score: u8) -> String {
    let strong = score >= 4;
    let text = match topic_of(question) {
        Topic::Lookups => {
            if strong {
                "Great. As a follow-up, when would you prefer INDEX/MATCH or XLOOKUP over VLOOKUP, \
                 and how do you handle approximate vs. exact matches?"
            } else {
                "As a follow-up, clarify the role of the last argument (range_lookup/exact match) \
                 in VLOOKUP and why it matters."
            }
        }
        Topic::PivotTables => {
            if strong {
                "Nice. Follow-up: how would you add a slicer and sort top 5 products by sales?"
            } else {
                "Follow-up: explain how to change aggregation from SUM to AVERAGE and add a value filter."
            }
        }
        Topic::ConditionalFormatting => {
            if strong {
                "Good. Follow-up: how would you use formula-based rules to highlight rows based on \
                 multiple conditions?"
            } else {
                "Follow-up: explain duplicate vs. unique highlighting and managing rule precedence."
            }
        }
        Topic::Macros => {
            if strong {
                "Good. Follow-up: outline steps to create a parameterized macro and assign it to a button."
            } else {
                "Follow-up: describe how to record a macro and edit its VBA to fix an absolute reference."
            }
        }
        Topic::PowerQuery => {
            if score >= 3 {
                "Follow-up: how would you merge two queries with mismatched keys and handle nulls?"
            } else {
                "Follow-up: what is the difference between merge vs. append in Power Query?"
            }
        }
        Topic::General => "Follow-up: provide a concrete example and common pitfalls.",
    };
    text.to_string()
}
