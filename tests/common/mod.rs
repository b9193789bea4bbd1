use std::fs;
use std::path::Path;

use plan_bom::Token;
use plan_bom::position_log::format_position_log;

pub fn token(text: &str, x: i64, y: i64) -> Token {
    Token::new(text, (x, y), (90, 14), 93.0)
}

/// Writes an extracted-data directory: one position log per listed page and,
/// when given, the whole-document text.
pub fn create_data_dir(
    root: &Path,
    pages: &[(u32, Vec<Token>)],
    full_text: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let texts = root.join("texts");
    fs::create_dir_all(&texts)?;

    for (page, tokens) in pages {
        fs::write(
            texts.join(format!("page_{page}_text_positions.txt")),
            format_position_log(tokens),
        )?;
    }
    if let Some(text) = full_text {
        fs::write(texts.join("plans_text_optimized.txt"), text)?;
    }

    Ok(())
}

/// A three-column sign table with an `ATM` header label, preceded by a title row.
pub fn atm_table_tokens() -> Vec<Token> {
    vec![
        token("SIGN SUMMARY", 700, 0),
        token("Site", 0, 100),
        token("Sign Types", 200, 100),
        token("ATM Size", 400, 100),
        token("Site 1", 0, 130),
        token("ATM TYPE 1 SIGN, ATM TYPE 2 SIGN", 200, 130),
        token("6'-0\"", 400, 130),
        token("Site 2", 0, 160),
        token("ATM TYPE 3 SIGN, ATM TYPE 3 SIGN", 200, 160),
        token("7'-6\"", 400, 160),
    ]
}

pub const PLAN_TEXT: &str = "\n\n--- PAGE 1 ---\n\n\
PROJECT ATCMTD PANEL SCHEDULE
PNL-1 L STA 1012+50 45.5 RT ITS12
PNL-2 L STA 1030+00 60 LT ITS14
PROJECT ATCMTD METER SCHEDULE
CCTV CAMERA (PTZ) MOUNTED ON POLE, SEE CCTV CAMERA (PTZ) DETAIL
ATM SITE 7 ATM TYPE 1 SIGN 5'-0\"
\n\n--- PAGE 2 ---\n\n";

pub const SITES_TEXT: &str = "\
ATM SITE 1 \"L\" 1234+50
ATM TYPE 1 SIGN 5'-6\" x 3'-0\"
ATM SITE 2
ATM TYPE 2 SIGN 7'-0\" RADAR DETECTOR SYSTEM
--- PAGE 4 ---
";
