//! Plain-text rendering of directory data.

use std::fmt::Write;

use raildir_client::types::{
    AnalyticsOverview, Contact, Distribution, Document, GrowthData, PaginationMeta,
    RecentContacts, VisitHistory,
};

/// Shown for absent fields.
pub const PLACEHOLDER: &str = "-";

/// Groups an Indian phone number for reading.
///
/// `+919398263414` becomes `+91 93 98 263 414` and `9398263414` becomes
/// `93 98 263 414`. Numbers in any other shape are returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if let Some(rest) = cleaned.strip_prefix("+91") {
        return match group_ten(rest) {
            Some(grouped) => format!("+91 {grouped}"),
            None => format!("+91 {rest}"),
        };
    }

    if cleaned.len() == 12 {
        if let Some(grouped) = cleaned.strip_prefix("91").and_then(group_ten) {
            return format!("91 {grouped}");
        }
    }

    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        if let Some(grouped) = group_ten(&cleaned) {
            return grouped;
        }
    }

    phone.to_string()
}

/// `XX XX XXX XXX` for exactly ten characters.
fn group_ten(digits: &str) -> Option<String> {
    if digits.len() != 10 || !digits.is_ascii() {
        return None;
    }
    Some(format!(
        "{} {} {} {}",
        &digits[..2],
        &digits[2..4],
        &digits[4..7],
        &digits[7..]
    ))
}

fn field(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(PLACEHOLDER)
}

fn phone_field(value: Option<&str>) -> String {
    match value.filter(|v| !v.trim().is_empty()) {
        Some(phone) => format_phone(phone),
        None => PLACEHOLDER.to_string(),
    }
}

/// One line per contact.
pub fn contacts(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts found.\n".to_string();
    }

    let mut out = String::new();
    for contact in contacts {
        let _ = writeln!(
            out,
            "{:<28} {:<18} {:<14} {:<8} {}",
            contact.name,
            phone_field(contact.phone.as_deref()),
            field(contact.designation.as_deref()),
            field(contact.lobby.as_deref()),
            field(contact.blood_group.as_deref()),
        );
    }
    out
}

pub fn contact_detail(contact: &Contact) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", contact.name);
    let _ = writeln!(out, "  ID:          {}", contact.id);
    let _ = writeln!(out, "  Phone:       {}", phone_field(contact.phone.as_deref()));
    let _ = writeln!(out, "  Designation: {}", field(contact.designation.as_deref()));
    let _ = writeln!(out, "  Lobby:       {}", field(contact.lobby.as_deref()));
    let _ = writeln!(out, "  Blood group: {}", field(contact.blood_group.as_deref()));
    let _ = writeln!(out, "  Address:     {}", field(contact.address.as_deref()));
    let _ = writeln!(out, "  Notes:       {}", field(contact.notes.as_deref()));
    out
}

/// `Page N of M`, or nothing when everything fits on one page.
pub fn page_footer(pagination: &PaginationMeta) -> Option<String> {
    pagination.shows_controls().then(|| {
        format!(
            "Page {} of {} ({} total)",
            pagination.page, pagination.total_pages, pagination.total
        )
    })
}

pub fn list(items: &[String]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{item}");
    }
    out
}

pub fn overview(overview: &AnalyticsOverview) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total contacts:        {}", overview.total_contacts);
    let _ = writeln!(
        out,
        "With blood group:      {} ({})",
        overview.contacts_with_blood_group, overview.blood_group_coverage
    );
    let _ = writeln!(
        out,
        "With lobby:            {} ({})",
        overview.contacts_with_lobby, overview.lobby_coverage
    );
    let _ = writeln!(out, "Added last 7 days:     {}", overview.recent_contacts_7_days);
    let _ = writeln!(out, "Added last 30 days:    {}", overview.recent_contacts_30_days);
    let _ = writeln!(out, "Visits:                {}", overview.visit_count);
    out
}

pub fn distribution(title: &str, distribution: &Distribution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{title:<16} {:>6} {:>8}", "Count", "Share");
    for item in &distribution.distribution {
        let _ = writeln!(
            out,
            "{:<16} {:>6} {:>8}",
            field(Some(item.label())),
            item.count,
            item.percentage
        );
    }
    let _ = writeln!(out, "{:<16} {:>6}", "Total", distribution.total);
    out
}

pub fn growth(growth: &GrowthData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} added over {}", growth.total_added, growth.period);
    for day in &growth.daily_growth {
        let _ = writeln!(out, "{}  +{:<4} {}", day.date, day.count, day.cumulative);
    }
    out
}

pub fn recent(recent: &RecentContacts) -> String {
    let mut out = String::new();
    for contact in &recent.contacts {
        let _ = writeln!(
            out,
            "{:<28} {:<18} {}",
            contact.name,
            phone_field(contact.phone.as_deref()),
            contact.created_at
        );
    }
    if recent.contacts.is_empty() {
        out.push_str("No recent contacts.\n");
    }
    out
}

pub fn history(history: &VisitHistory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} visits over {}", history.total_visits, history.period);
    for day in &history.data {
        let _ = writeln!(out, "{}  {}", day.date, day.count);
    }
    out
}

pub fn documents(documents: &[&Document]) -> String {
    if documents.is_empty() {
        return "No documents found.\n".to_string();
    }

    let mut out = String::new();
    for doc in documents {
        let _ = writeln!(out, "{}", field(Some(&doc.title)));
        if !doc.description.is_empty() {
            let _ = writeln!(out, "  {}", doc.description);
        }
        let _ = writeln!(out, "  {}", field(Some(&doc.link)));
        let _ = writeln!(
            out,
            "  Uploaded by {} on {}",
            field(Some(&doc.uploaded_by)),
            field(Some(&doc.created_at))
        );
    }
    out
}
