use std::io::{self, Write};

use common::{PairData, PairGroup, PairSnapshot};
use crossterm::{
    cursor::{Hide, MoveDown, MoveUp, Show},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

/// Blank line, title and header per section, plus blank line and countdown.
pub const FRAME_CHROME_LINES: usize = PairGroup::ALL.len() * 3 + 2;

const UNAVAILABLE: &str = "N/A";

/// Redraws the monitor table in place: every frame ends by moving the cursor
/// back to the frame origin so the next one overwrites it.
#[derive(Debug, Default)]
pub struct Renderer {
    last_height: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, Hide)?;
        out.flush()
    }

    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        data: Option<&PairData>,
        countdown: &str,
    ) -> io::Result<()> {
        for group in PairGroup::ALL {
            let rows = data.map(|data| data.group(group)).unwrap_or(&[]);
            write_section(out, group.title(), rows)?;
        }
        write_line(out, "")?;
        write_line(out, &format!("Funding countdown: {countdown}"))?;
        queue!(out, Clear(ClearType::FromCursorDown))?;

        let height = frame_height(data);
        queue!(out, MoveUp(height))?;
        self.last_height = height;
        out.flush()
    }

    /// Parks the cursor below the last frame and restores it.
    pub fn finish<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.last_height > 0 {
            queue!(out, MoveDown(self.last_height))?;
            self.last_height = 0;
        }
        queue!(out, Print("\nExiting...\n"), Show)?;
        out.flush()
    }
}

/// Lines a frame occupies; the row count comes from the fetch bookkeeping.
pub fn frame_height(data: Option<&PairData>) -> u16 {
    let rows = data.map_or(0, PairData::total_pairs);
    u16::try_from(rows + FRAME_CHROME_LINES).unwrap_or(u16::MAX)
}

pub fn format_header() -> String {
    format!(
        "  {:<8} | {:<10} | {:<10} | {:<10}",
        "Pair", "Price", "% Funding", "% 24h Change"
    )
}

pub fn format_row(row: &PairSnapshot) -> String {
    let price = row.price.as_deref().unwrap_or(UNAVAILABLE);
    let funding = row
        .funding_rate_pct
        .map(|rate| format!("{rate:.4}"))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    let change = row
        .change_24h_pct
        .map(|change| format!("{change:.3}"))
        .unwrap_or_else(|| UNAVAILABLE.to_string());
    format!(
        "{:<10} | {:<10} | {:<10} | {:<10}",
        row.symbol, price, funding, change
    )
}

/// Green for a non-negative 24h change, red for a negative one.
fn row_color(row: &PairSnapshot) -> Option<Color> {
    row.change_24h_pct.map(|change| {
        if change >= 0.0 {
            Color::Green
        } else {
            Color::Red
        }
    })
}

fn write_section<W: Write>(out: &mut W, title: &str, rows: &[PairSnapshot]) -> io::Result<()> {
    write_line(out, "")?;
    write_line(out, &format!("--- {title} ---"))?;
    write_line(out, &format_header())?;
    for row in rows {
        match row_color(row) {
            Some(color) => queue!(
                out,
                SetForegroundColor(color),
                Print(format_row(row)),
                ResetColor,
                Clear(ClearType::UntilNewLine),
                Print("\n")
            )?,
            None => write_line(out, &format_row(row))?,
        }
    }
    Ok(())
}

fn write_line<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    queue!(out, Print(text), Clear(ClearType::UntilNewLine), Print("\n"))
}
