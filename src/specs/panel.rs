use std::sync::LazyLock;

use regex::Regex;

use crate::model::PanelRow;
use crate::specs::span_until;

static SCHEDULE_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PROJECT\s+ATCMTD\s+PANEL\s+SCHEDULE")
        .expect("hardcoded schedule start regex is valid")
});
static SCHEDULE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"PROJECT\s+ATCMTD\s+METER").expect("hardcoded schedule end regex is valid")
});
static PANEL_ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(PNL-\d+)\s+L\s+STA\s+(\d+\+\d+)\s+([\d.]+)\s+([LR]T)\s+(ITS\d+)")
        .expect("hardcoded panel row regex is valid")
});

/// Text between the panel schedule heading and the meter schedule heading.
pub(crate) fn schedule_section(text: &str) -> Option<&str> {
    let head = SCHEDULE_START_RE.find(text)?;
    span_until(text, head, &SCHEDULE_END_RE)
}

fn parse_panel_line(line: &str) -> Option<PanelRow> {
    let captures = PANEL_ROW_RE.captures(line)?;
    let field = |index: usize| {
        captures
            .get(index)
            .map_or_else(String::new, |found| found.as_str().to_string())
    };

    Some(PanelRow {
        panel: field(1),
        station: field(2),
        offset: field(3),
        direction: field(4),
        sheet: field(5),
    })
}

/// One row per matching schedule line. `None` when the schedule is absent
/// or none of its lines match.
pub fn panel_schedule_from_text(text: &str) -> Option<Vec<PanelRow>> {
    let section = schedule_section(text)?;
    let rows = section
        .split('\n')
        .filter_map(parse_panel_line)
        .collect::<Vec<_>>();

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{panel_schedule_from_text, schedule_section};
    use crate::model::PanelRow;

    const SCHEDULE: &str = "\
--- PAGE 12 ---
PROJECT ATCMTD PANEL SCHEDULE
PANEL LOCATION OFFSET SIDE SHEET
PNL-1 L STA 1012+50 45.5 RT ITS12
PNL-2 L STA 1030+00 60 LT ITS14
PNL-3 STA 1040+00 60 LT ITS14
notes: see sheet ITS15
PROJECT ATCMTD METER SCHEDULE
PNL-9 L STA 2000+00 10 RT ITS20
";

    #[test]
    fn parses_matching_lines_between_markers() {
        let rows = panel_schedule_from_text(SCHEDULE).expect("schedule should be found");
        assert_eq!(
            rows,
            vec![
                PanelRow {
                    panel: "PNL-1".to_string(),
                    station: "1012+50".to_string(),
                    offset: "45.5".to_string(),
                    direction: "RT".to_string(),
                    sheet: "ITS12".to_string(),
                },
                PanelRow {
                    panel: "PNL-2".to_string(),
                    station: "1030+00".to_string(),
                    offset: "60".to_string(),
                    direction: "LT".to_string(),
                    sheet: "ITS14".to_string(),
                },
            ]
        );
    }

    #[test]
    fn missing_end_marker_means_no_schedule() {
        let text = "PROJECT ATCMTD PANEL SCHEDULE\nPNL-1 L STA 1012+50 45.5 RT ITS12\n";
        assert!(schedule_section(text).is_none());
        assert!(panel_schedule_from_text(text).is_none());
    }

    #[test]
    fn schedule_without_matching_lines_is_absent() {
        let text = "PROJECT ATCMTD PANEL SCHEDULE\nnothing here\nPROJECT ATCMTD METER";
        assert!(panel_schedule_from_text(text).is_none());
    }
}
