// src/report.rs
use std::fmt;
use std::fmt::Write as _;

use crate::listing::NormalizedListing;

pub const SEPARATOR_WIDTH: usize = 50;
pub const NO_LISTINGS: &str = "No new listings found.";

/// Render one location: separator, label, then one entry per listing, closed
/// by one extra blank line. An empty list renders `NO_LISTINGS` instead of an
/// empty body.
pub fn format_section(label: &str, listings: &[NormalizedListing]) -> String {
    let mut out = String::new();
    out.push_str(&"=".repeat(SEPARATOR_WIDTH));
    let _ = write!(out, "\n\n{label}:\n\n");

    if listings.is_empty() {
        out.push_str(NO_LISTINGS);
        out.push_str("\n\n\n");
        return out;
    }

    for l in listings {
        let _ = write!(
            out,
            " - {}, {}, {} {}: {}\n   {} beds, {} baths, {} sqft\n   {}\n\n",
            l.street,
            l.city,
            l.state,
            l.postal_code,
            l.price,
            l.beds_label(),
            l.baths_label(),
            l.sqft_label(),
            l.url,
        );
    }
    out.push('\n');
    out
}

/// Ordered per-location sections for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub label: String,
    pub listing_count: usize,
    pub text: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_section(&mut self, label: &str, listings: &[NormalizedListing]) {
        self.sections.push(Section {
            label: label.to_string(),
            listing_count: listings.len(),
            text: format_section(label, listings),
        });
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn listing_count(&self) -> usize {
        self.sections.iter().map(|s| s.listing_count).sum()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.sections {
            f.write_str(&s.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Number;
    use chrono::Utc;

    fn listing() -> NormalizedListing {
        NormalizedListing {
            street: "1 Main St".into(),
            city: "Duluth".into(),
            state: "MN".into(),
            postal_code: "55802".into(),
            price: "$425,000".into(),
            sqft: Some(Number::Int(1450)),
            beds: Some(Number::Int(3)),
            baths: Number::Float(2.5),
            url: "https://www.realtor.com/x".into(),
            listed: Utc::now(),
        }
    }

    #[test]
    fn section_layout() {
        let s = format_section("Zip Code 55802", &[listing()]);
        let expected = format!(
            "{}\n\nZip Code 55802:\n\n - 1 Main St, Duluth, MN 55802: $425,000\n   3 beds, 2.5 baths, 1450 sqft\n   https://www.realtor.com/x\n\n\n",
            "=".repeat(50)
        );
        assert_eq!(s, expected);
    }

    #[test]
    fn empty_section_says_so() {
        let s = format_section("Duluth, MN", &[]);
        assert!(s.ends_with("Duluth, MN:\n\nNo new listings found.\n\n\n"));
    }

    #[test]
    fn report_keeps_order() {
        let mut r = Report::new();
        r.push_section("A", &[]);
        r.push_section("B", &[listing()]);
        let text = r.to_string();
        assert!(text.find("A:").unwrap() < text.find("B:").unwrap());
        assert_eq!(r.listing_count(), 1);
        assert_eq!(r.sections().len(), 2);
    }
}
