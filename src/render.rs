//! Plain-text views for the command line.
use std::fmt::Write;

use crate::model::Item;
use crate::section::Section;
use crate::stats::Stats;

const PREVIEW_CHARS: usize = 150;

/// One item as a short multi-line card.
pub fn item_card(section: Section, item: &Item) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}]", item.display_title(), item.id);
    if let Some(stars) = item.stars.filter(|s| *s > 0) {
        let _ = writeln!(out, "  ⭐ {} / 5 stars", stars);
    }
    if let Some(preview) = item.preview(PREVIEW_CHARS) {
        let _ = writeln!(out, "  {}", preview);
    }
    if section == Section::Social {
        if let Some(link) = item.link.as_deref().filter(|l| !l.is_empty()) {
            let _ = writeln!(out, "  🔗 {}", link);
        }
    }
    if let Some(url) = item.media_url() {
        let kind = if item.is_video() { "video" } else { "media" };
        let _ = writeln!(out, "  {}: {}", kind, url);
    }
    if let Some(date) = item.date() {
        let _ = writeln!(out, "  date: {}", date);
    }
    out
}

/// Heading plus every card, or the empty-section notice.
pub fn item_list(section: Section, items: &[Item]) -> String {
    let mut out = format!("{} Items ({})\n", section.title(), items.len());
    if items.is_empty() {
        let _ = writeln!(
            out,
            "No items uploaded yet in \"{}\" section.",
            section.title()
        );
        return out;
    }
    for item in items {
        out.push('\n');
        out.push_str(&item_card(section, item));
    }
    out
}

pub fn stats_summary(stats: &Stats) -> String {
    if stats.is_empty() {
        return "Statistics not available. Try uploading content!\n".to_string();
    }
    let mut out = String::from("Items Count:\n");
    for (section, count) in stats.iter() {
        let _ = writeln!(out, "  {}: {} item(s)", section.title(), count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_shows_stars_link_and_preview() {
        let item = Item {
            id: "s1".into(),
            name: Some("Instagram".into()),
            link: Some("https://instagram.com/nurse".into()),
            stars: Some(0),
            ..Default::default()
        };
        let card = item_card(Section::Social, &item);
        assert!(card.starts_with("Instagram  [s1]"));
        assert!(card.contains("🔗 https://instagram.com/nurse"));
        assert!(!card.contains("stars"));

        let item = Item {
            id: "t1".into(),
            name: Some("Jane".into()),
            testimonial: Some("x".repeat(160)),
            stars: Some(4),
            ..Default::default()
        };
        let card = item_card(Section::Testimonials, &item);
        assert!(card.contains("⭐ 4 / 5 stars"));
        assert!(card.contains(&format!("{}...", "x".repeat(150))));
    }

    #[test]
    fn empty_list_notice() {
        let out = item_list(Section::Pdf, &[]);
        assert!(out.contains("PDF Resources Items (0)"));
        assert!(out.contains("No items uploaded yet"));
    }

    #[test]
    fn empty_stats_notice() {
        assert!(stats_summary(&Stats::default()).contains("not available"));
    }
}
