/// A catalog entry describing how many days before a document's expiration
/// date a reminder should fire. The catalog is seeded once and is read-only
/// to the rest of the system; `code` is the stable identifier exposed to
/// clients ("7d"), `id` is internal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderInterval {
    pub id: i64,
    pub label: String,
    pub days_before: u32,
    pub code: String,
}

/// The supported lead times. Requested codes outside this set are ignored,
/// the catalog acts as a whitelist.
pub fn default_catalog() -> Vec<ReminderInterval> {
    let entries = [
        (1, "30 days before", 30, "30d"),
        (2, "14 days before", 14, "14d"),
        (3, "7 days before", 7, "7d"),
        (4, "3 days before", 3, "3d"),
        (5, "1 day before", 1, "1d"),
        (6, "On the day", 0, "0d"),
    ];
    entries
        .iter()
        .map(|(id, label, days_before, code)| ReminderInterval {
            id: *id,
            label: (*label).into(),
            days_before: *days_before,
            code: (*code).into(),
        })
        .collect()
}
