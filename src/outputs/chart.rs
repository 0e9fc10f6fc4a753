//! Stacked bar chart and checkbox panel as terminal text.
//!
//! Each ranked word gets one row. The bar is split into one segment per
//! active site, in configured site order, with a length proportional to that
//! site's count. Segments use the site's display color as a 24-bit ANSI
//! foreground; without color each site gets its own fill glyph instead.

use crate::config::{Rgb, Site};
use crate::models::{RankedView, SelectionState};
use std::fmt::Write;

pub const TITLE: &str = "웹사이트별 한국 트렌드 분석";
pub const PLACEHOLDER: &str = "웹사이트를 선택하세요";
const X_CAPTION: &str = "키워드";
const Y_CAPTION: &str = "빈도";

/// Columns used by the longest bar.
pub const BAR_WIDTH: usize = 50;

const GLYPHS: &[char] = &['█', '▓', '▒', '░', '#', '=', '+', '*'];
const RESET: &str = "\x1b[0m";

/// How a site's segment is drawn.
#[derive(Debug, Clone, Copy)]
struct Swatch {
    glyph: char,
    color: Option<Rgb>,
}

impl Swatch {
    fn for_site(sites: &[Site], name: &str, color: bool) -> Self {
        let index = sites.iter().position(|s| s.name == name).unwrap_or(0);
        if color {
            Swatch {
                glyph: GLYPHS[0],
                color: sites.get(index).map(|s| s.color),
            }
        } else {
            Swatch {
                glyph: GLYPHS[index % GLYPHS.len()],
                color: None,
            }
        }
    }

    fn paint(&self, out: &mut String, len: usize) {
        if len == 0 {
            return;
        }
        if let Some(Rgb(r, g, b)) = self.color {
            let _ = write!(out, "\x1b[38;2;{r};{g};{b}m");
        }
        out.extend(std::iter::repeat_n(self.glyph, len));
        if self.color.is_some() {
            out.push_str(RESET);
        }
    }
}

/// Terminal column width: Hangul and other wide characters take two columns.
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFF60 => 2,
            _ => 1,
        })
        .sum()
}

fn pad_to(out: &mut String, s: &str, width: usize) {
    out.push_str(s);
    let used = display_width(s);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
}

/// One line per site: `[x] 1 █ name`.
pub fn render_checkboxes(sites: &[Site], selection: &SelectionState, color: bool) -> String {
    let mut out = String::new();
    for (i, site) in sites.iter().enumerate() {
        let mark = if selection.is_active(i) { 'x' } else { ' ' };
        let _ = write!(out, " [{mark}] {} ", i + 1);
        Swatch::for_site(sites, &site.name, color).paint(&mut out, 1);
        let _ = writeln!(out, " {}", site.name);
    }
    out
}

/// The chart for `view`, or the placeholder when nothing is selected.
pub fn render_chart(view: &RankedView, sites: &[Site], color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}\n");

    let (active, words) = match view {
        RankedView::NoSelection => {
            let _ = writeln!(out, "    {PLACEHOLDER}");
            return out;
        }
        RankedView::Ranked { sites: active, words } => (active, words),
    };
    if words.is_empty() {
        let _ = writeln!(out, "    (no words)");
        return out;
    }

    let swatches: Vec<Swatch> = active
        .iter()
        .map(|name| Swatch::for_site(sites, name, color))
        .collect();
    let label_width = words
        .iter()
        .map(|w| display_width(&w.word))
        .max()
        .unwrap_or(0)
        .max(display_width(X_CAPTION))
        + 2;
    let max_total = words.iter().map(|w| w.total).max().unwrap_or(0);

    pad_to(&mut out, X_CAPTION, label_width);
    let _ = writeln!(out, "{Y_CAPTION}");

    for word in words {
        pad_to(&mut out, &word.word, label_width);
        for (swatch, len) in swatches.iter().zip(segment_lengths(&word.counts, max_total)) {
            swatch.paint(&mut out, len);
        }
        let _ = writeln!(out, " {}", word.total);
    }

    out.push('\n');
    for (name, swatch) in active.iter().zip(&swatches) {
        out.push(' ');
        swatch.paint(&mut out, 1);
        let _ = write!(out, " {name}  ");
    }
    out.push('\n');
    out
}

/// Column lengths for stacked counts, scaled so `max_total` spans
/// [`BAR_WIDTH`]. Rounding is applied to running sums so the segments of a
/// row add up to that row's rounded total.
pub fn segment_lengths(counts: &[u64], max_total: u64) -> Vec<usize> {
    if max_total == 0 {
        return vec![0; counts.len()];
    }
    let scale = BAR_WIDTH as f64 / max_total as f64;
    let mut running = 0u64;
    let mut drawn = 0usize;
    counts
        .iter()
        .map(|c| {
            running += c;
            let end = (running as f64 * scale).round() as usize;
            let len = end - drawn;
            drawn = end;
            len
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankedWord;
    use url::Url;

    fn sites() -> Vec<Site> {
        ["A", "B"]
            .iter()
            .map(|n| Site {
                name: n.to_string(),
                url: Url::parse("https://example.com/").unwrap(),
                color: Rgb(10, 20, 30),
            })
            .collect()
    }

    fn ranked() -> RankedView {
        let row = |word: &str, counts: Vec<u64>| RankedWord {
            word: word.to_string(),
            total: counts.iter().sum(),
            counts,
        };
        RankedView::Ranked {
            sites: vec!["A".to_string(), "B".to_string()],
            words: vec![row("정치", vec![5, 2]), row("스포츠", vec![0, 4]), row("경제", vec![3, 0])],
        }
    }

    #[test]
    fn test_placeholder_for_no_selection() {
        let text = render_chart(&RankedView::NoSelection, &sites(), false);
        assert!(text.contains(PLACEHOLDER));
        assert!(!text.contains(Y_CAPTION));
    }

    #[test]
    fn test_rows_in_rank_order_with_totals() {
        let text = render_chart(&ranked(), &sites(), false);
        let lines: Vec<&str> = text.lines().collect();
        let row = |w: &str| lines.iter().position(|l| l.starts_with(w)).unwrap();
        assert!(row("정치") < row("스포츠"));
        assert!(row("스포츠") < row("경제"));
        assert!(lines[row("정치")].ends_with(" 7"));
        assert!(lines[row("경제")].ends_with(" 3"));
    }

    #[test]
    fn test_plain_render_uses_site_glyphs() {
        let text = render_chart(&ranked(), &sites(), false);
        let top = text.lines().find(|l| l.starts_with("정치")).unwrap();
        assert_eq!(top.matches('█').count() + top.matches('▓').count(), BAR_WIDTH);
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_color_render_uses_ansi() {
        let text = render_chart(&ranked(), &sites(), true);
        assert!(text.contains("\x1b[38;2;10;20;30m"));
        assert!(text.contains(RESET));
    }

    #[test]
    fn test_segment_lengths_sum_to_scaled_total() {
        assert_eq!(segment_lengths(&[5, 2], 7), vec![36, 14]);
        assert_eq!(segment_lengths(&[0, 4], 7), vec![0, 29]);
        assert_eq!(segment_lengths(&[1, 1, 1], 3).iter().sum::<usize>(), BAR_WIDTH);
        assert_eq!(segment_lengths(&[0, 0], 0), vec![0, 0]);
    }

    #[test]
    fn test_checkboxes_reflect_selection() {
        let mut selection = SelectionState::all_active(2);
        selection.toggle(1);
        let text = render_checkboxes(&sites(), &selection, false);
        assert!(text.contains("[x] 1 █ A"));
        assert!(text.contains("[ ] 2 ▓ B"));
    }

    #[test]
    fn test_display_width_counts_hangul_double() {
        assert_eq!(display_width("KBS"), 3);
        assert_eq!(display_width("정치"), 4);
    }
}
