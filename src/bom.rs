use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{BomLine, PanelRow};
use crate::specs::atm::AtmSpecs;

pub const VARIOUS: &str = "Various";

static TEXT_PANEL_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)PROJECT\s+ATCMTD\s+PANEL\s+SCHEDULE(.*?)PROJECT")
        .expect("hardcoded panel section regex is valid")
});
static PANEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PNL-\d+").expect("hardcoded panel id regex is valid"));
static TYPE_1_SIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ATM\s+TYPE\s+1\s+SIGN").expect("hardcoded type 1 sign regex is valid")
});
static TYPE_2_SIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ATM\s+TYPE\s+2\s+SIGN").expect("hardcoded type 2 sign regex is valid")
});
static TYPE_3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ATM\s+TYPE\s+3").expect("hardcoded type 3 regex is valid"));

#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Literal substring, counted without overlaps.
    Phrase(&'static str),
    /// Regular expression, counted by non-overlapping matches.
    Pattern(&'static LazyLock<Regex>),
}

impl Matcher {
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        match self {
            Self::Phrase(phrase) => text.matches(phrase).count(),
            Self::Pattern(regex) => regex.find_iter(text).count(),
        }
    }
}

/// A counted vocabulary entry and the BOM line it produces.
#[derive(Debug, Clone, Copy)]
pub struct Recognizer {
    pub matcher: Matcher,
    pub item: &'static str,
    pub description: &'static str,
}

impl Recognizer {
    const fn phrase(phrase: &'static str, item: &'static str, description: &'static str) -> Self {
        Self {
            matcher: Matcher::Phrase(phrase),
            item,
            description,
        }
    }

    const fn pattern(
        regex: &'static LazyLock<Regex>,
        item: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            matcher: Matcher::Pattern(regex),
            item,
            description,
        }
    }

    /// A line carrying the match count, or `None` when nothing matched.
    #[must_use]
    pub fn line(&self, text: &str, location: &str) -> Option<BomLine> {
        let quantity = self.matcher.count(text);
        (quantity > 0).then(|| BomLine::new(self.item, location, quantity, self.description))
    }
}

/// Counted inside each site's joined sign-type field.
pub const ATM_SIGN_TYPES: [Recognizer; 3] = [
    Recognizer::phrase(
        "TYPE 1",
        "ATM Sign Type 1",
        "Active Traffic Management Sign (Type 1)",
    ),
    Recognizer::phrase(
        "TYPE 2",
        "ATM Sign Type 2",
        "Active Traffic Management Sign (Type 2)",
    ),
    Recognizer::phrase(
        "TYPE 3",
        "ATM Sign Type 3",
        "Active Traffic Management Sign (Type 3)",
    ),
];

/// Counted once over the whole document text, in this order.
pub const EQUIPMENT: [Recognizer; 6] = [
    Recognizer::phrase("ITS POLE (80 FEET)", "ITS Pole", "ITS Pole (80 Feet)"),
    Recognizer::phrase(
        "CCTV CAMERA (PTZ)",
        "CCTV Camera (PTZ)",
        "CCTV Camera with Pan/Tilt/Zoom Capability",
    ),
    Recognizer::phrase(
        "CCTV CAMERA (FIXED)",
        "CCTV Camera (Fixed)",
        "Fixed CCTV Camera",
    ),
    Recognizer::phrase(
        "RADAR DETECTOR SYSTEM",
        "Radar Detector System",
        "Radar Detector System",
    ),
    Recognizer::phrase(
        "COMMUNICATION CABINET",
        "Communication Cabinet",
        "Communication Cabinet for ITS Equipment",
    ),
    Recognizer::phrase(
        "ACTIVE TRAFFIC MANAGEMENT SIGN CONTROLLER",
        "ATM Sign Controller",
        "Controller for Active Traffic Management Signs",
    ),
];

/// Sign counts for the text-only BOM. Type 3 does not require the `SIGN` suffix.
pub static TEXT_SIGN_TYPES: [Recognizer; 3] = [
    Recognizer::pattern(
        &TYPE_1_SIGN_RE,
        "ATM Sign Type 1",
        "Active Traffic Management Sign (Type 1)",
    ),
    Recognizer::pattern(
        &TYPE_2_SIGN_RE,
        "ATM Sign Type 2",
        "Active Traffic Management Sign (Type 2)",
    ),
    Recognizer::pattern(
        &TYPE_3_RE,
        "ATM Sign Type 3",
        "Active Traffic Management Sign (Type 3)",
    ),
];

/// The text-only BOM skips the sign controller.
pub const TEXT_EQUIPMENT_COUNT: usize = 5;

pub const PANEL_BOARD_ITEM: &str = "Panel Board";
pub const PANEL_BOARD_DESCRIPTION: &str = "Electrical Panel Board for ATM Signs";

#[must_use]
pub fn atm_lines(specs: &AtmSpecs) -> Vec<BomLine> {
    specs
        .site_sign_types()
        .iter()
        .flat_map(|(site, sign_types)| {
            ATM_SIGN_TYPES
                .iter()
                .filter_map(|recognizer| recognizer.line(sign_types, site))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[must_use]
pub fn panel_line(schedule: &[PanelRow]) -> BomLine {
    BomLine::new(
        PANEL_BOARD_ITEM,
        VARIOUS,
        schedule.len(),
        PANEL_BOARD_DESCRIPTION,
    )
}

#[must_use]
pub fn equipment_lines(text: &str) -> Vec<BomLine> {
    EQUIPMENT
        .iter()
        .filter_map(|recognizer| recognizer.line(text, VARIOUS))
        .collect()
}

/// ATM lines, then the panel line, then equipment lines. The equipment pass
/// runs whenever text is present, whatever the structured extractors found.
#[must_use]
pub fn generate_bom(
    atm: Option<&AtmSpecs>,
    panel: Option<&[PanelRow]>,
    full_text: Option<&str>,
) -> Vec<BomLine> {
    let mut lines = Vec::new();
    if let Some(specs) = atm {
        lines.extend(atm_lines(specs));
    }
    if let Some(schedule) = panel {
        lines.push(panel_line(schedule));
    }
    if let Some(text) = full_text {
        lines.extend(equipment_lines(text));
    }
    lines
}

/// BOM derived from raw text alone, with an empty location on every line.
#[must_use]
pub fn text_bom(text: &str) -> Vec<BomLine> {
    let mut lines = TEXT_SIGN_TYPES
        .iter()
        .chain(&EQUIPMENT[..TEXT_EQUIPMENT_COUNT])
        .filter_map(|recognizer| recognizer.line(text, ""))
        .collect::<Vec<_>>();

    let panel_count = TEXT_PANEL_SECTION_RE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or(0, |section| PANEL_ID_RE.find_iter(section.as_str()).count());
    if panel_count > 0 {
        lines.push(BomLine::new(
            PANEL_BOARD_ITEM,
            "",
            panel_count,
            PANEL_BOARD_DESCRIPTION,
        ));
    }

    lines
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomSummary {
    pub line_count: usize,
    pub total_quantity: usize,
    pub item_kinds: usize,
}

#[must_use]
pub fn summarize(lines: &[BomLine]) -> BomSummary {
    BomSummary {
        line_count: lines.len(),
        total_quantity: lines.iter().map(|line| line.quantity).sum(),
        item_kinds: lines
            .iter()
            .map(|line| line.item.as_str())
            .collect::<BTreeSet<_>>()
            .len(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        BomSummary, Matcher, TEXT_SIGN_TYPES, TYPE_3_RE, equipment_lines, generate_bom, summarize,
        text_bom,
    };
    use crate::model::{AtmRecord, BomLine, PanelRow};
    use crate::specs::atm::AtmSpecs;

    fn record(site: &str, sign_types: &str) -> AtmRecord {
        AtmRecord {
            site: site.to_string(),
            location: String::new(),
            sign_types: sign_types.to_string(),
            dimensions: "5'-6\"".to_string(),
        }
    }

    fn panel(id: &str) -> PanelRow {
        PanelRow {
            panel: id.to_string(),
            station: "1012+50".to_string(),
            offset: "45.5".to_string(),
            direction: "RT".to_string(),
            sheet: "ITS12".to_string(),
        }
    }

    #[test]
    fn ptz_camera_phrase_counted_once_per_occurrence() {
        let text = "CCTV CAMERA (PTZ)\nfoo CCTV CAMERA (PTZ) bar\nCCTV CAMERA (PTZ)";
        assert_eq!(
            equipment_lines(text),
            vec![BomLine::new(
                "CCTV Camera (PTZ)",
                "Various",
                3,
                "CCTV Camera with Pan/Tilt/Zoom Capability"
            )]
        );
    }

    #[test]
    fn empty_text_gives_empty_bom() {
        assert!(generate_bom(None, None, Some("")).is_empty());
        assert!(generate_bom(None, None, None).is_empty());
        assert!(text_bom("").is_empty());
    }

    #[test]
    fn orders_atm_then_panel_then_equipment() {
        let specs = AtmSpecs::Records(vec![
            record("Site 1", "ATM TYPE 1 SIGN, ATM TYPE 3, ATM TYPE 1 SIGN"),
            record("Site 2", "ATM TYPE 2 SIGN"),
        ]);
        let schedule = vec![panel("PNL-1"), panel("PNL-2")];
        let text = "COMMUNICATION CABINET ITS POLE (80 FEET) COMMUNICATION CABINET";

        let lines = generate_bom(Some(&specs), Some(&schedule), Some(text));
        let summary = lines
            .iter()
            .map(|line| (line.item.as_str(), line.location.as_str(), line.quantity))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("ATM Sign Type 1", "Site 1", 2),
                ("ATM Sign Type 3", "Site 1", 1),
                ("ATM Sign Type 2", "Site 2", 1),
                ("Panel Board", "Various", 2),
                ("ITS Pole", "Various", 1),
                ("Communication Cabinet", "Various", 2),
            ]
        );
    }

    #[test]
    fn equipment_pass_runs_without_structured_findings() {
        let lines = generate_bom(None, None, Some("RADAR DETECTOR SYSTEM"));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item, "Radar Detector System");
    }

    #[test]
    fn empty_schedule_still_yields_panel_line() {
        let lines = generate_bom(None, Some(&[]), None);
        assert_eq!(
            lines,
            vec![BomLine::new(
                "Panel Board",
                "Various",
                0,
                "Electrical Panel Board for ATM Signs"
            )]
        );
    }

    #[test]
    fn text_sign_patterns_count_whitespace_variants() {
        let text = "ATM TYPE 1 SIGN ATM\tTYPE  1\nSIGN ATM TYPE 2 ATM TYPE 3 SIGN ATM TYPE 3";
        let counts = TEXT_SIGN_TYPES
            .iter()
            .map(|recognizer| {
                assert!(matches!(recognizer.matcher, Matcher::Pattern(_)));
                recognizer.matcher.count(text)
            })
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![2, 0, 2]);
        assert_eq!(Matcher::Pattern(&TYPE_3_RE).count(""), 0);
    }

    #[test]
    fn text_bom_counts_patterns_and_panels() {
        let text = "\
ATM TYPE 1 SIGN ATM  TYPE 1\nSIGN ATM TYPE 1
ATM TYPE 3 ATM TYPE 3 SIGN
ACTIVE TRAFFIC MANAGEMENT SIGN CONTROLLER
PROJECT ATCMTD PANEL SCHEDULE
PNL-1 PNL-2 PNL-3
PROJECT ATCMTD METER
";
        let lines = text_bom(text);
        let summary = lines
            .iter()
            .map(|line| (line.item.as_str(), line.quantity))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("ATM Sign Type 1", 2),
                ("ATM Sign Type 3", 2),
                ("Panel Board", 3),
            ]
        );
        assert!(lines.iter().all(|line| line.location.is_empty()));
    }

    #[test]
    fn summary_counts_quantities_and_kinds() {
        let lines = vec![
            BomLine::new("ATM Sign Type 1", "Site 1", 2, "d"),
            BomLine::new("ATM Sign Type 1", "Site 2", 1, "d"),
            BomLine::new("ITS Pole", "Various", 4, "d"),
        ];
        assert_eq!(
            summarize(&lines),
            BomSummary {
                line_count: 3,
                total_quantity: 7,
                item_kinds: 2,
            }
        );
    }
}
