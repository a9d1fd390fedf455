//! Duplicate text fragment removal.
//!
//! Some PDFs paint the same run twice (justification tricks, doubled numeric
//! columns). Boxes that sit at nearly the same position, or overlap heavily,
//! are collapsed into the more informative one.

use lazy_static::lazy_static;
use regex::Regex;

use super::text_boxes::sanitize_text;
use crate::config::DedupConfig;
use crate::model::TextBox;

lazy_static! {
    static ref RE_CURRENCY_PREFIX: Regex = Regex::new(r"^[\s\u{00a0}]*[$€£¥]").unwrap();
}

/// Whether two boxes are duplicates of each other.
///
/// True when both `|Δleft|` and `|Δtop|` are under the position epsilon, or
/// their intersection-over-union exceeds the threshold.
pub fn collides(a: &TextBox, b: &TextBox, config: &DedupConfig) -> bool {
    let close = (a.left - b.left).abs() < config.position_epsilon
        && (a.top - b.top).abs() < config.position_epsilon;
    close || a.rect().iou(&b.rect()) > config.iou_threshold
}

/// Informativeness of a text: (currency prefix, non-space chars, digits).
///
/// # Examples
///
/// ```
/// use pdf_overlay::layout::informativeness;
///
/// assert_eq!(informativeness(" $1 000"), (true, 5, 4));
/// assert_eq!(informativeness("100"), (false, 3, 3));
/// ```
pub fn informativeness(text: &str) -> (bool, usize, usize) {
    let sanitized = sanitize_text(Some(text));
    let s = sanitized.trim();
    let currency = RE_CURRENCY_PREFIX.is_match(s);
    let non_space = s.chars().filter(|c| !c.is_whitespace()).count();
    let digits = s.chars().filter(|c| c.is_ascii_digit()).count();
    (currency, non_space, digits)
}

/// Whether `incoming` should replace `existing`.
///
/// Scores compare lexicographically; on a tie the longer (or equally long)
/// incoming text wins.
pub fn prefers_incoming(incoming: &TextBox, existing: &TextBox) -> bool {
    let a = informativeness(&incoming.text);
    let b = informativeness(&existing.text);
    if a != b {
        return a > b;
    }
    incoming.text.chars().count() >= existing.text.chars().count()
}

/// One nearest-match pass.
///
/// Each box is tested against the boxes accepted so far, in order; it is
/// merged into the first collision or appended. Returns the accepted boxes
/// and the number of merges.
pub fn dedup_pass(boxes: Vec<TextBox>, config: &DedupConfig) -> (Vec<TextBox>, usize) {
    let mut accepted: Vec<TextBox> = Vec::with_capacity(boxes.len());
    let mut merges = 0;
    for candidate in boxes {
        match accepted.iter().position(|b| collides(&candidate, b, config)) {
            Some(hit) => {
                merges += 1;
                if prefers_incoming(&candidate, &accepted[hit]) {
                    accepted[hit] = candidate;
                }
            },
            None => accepted.push(candidate),
        }
    }
    (accepted, merges)
}

/// Run [`dedup_pass`] until it merges nothing.
///
/// A single pass can leave collisions behind when a replacement box moves
/// the accepted geometry; repeating to a fixpoint makes the result stable
/// under another run.
pub fn dedup_text_boxes(boxes: Vec<TextBox>, config: &DedupConfig) -> Vec<TextBox> {
    let mut current = boxes;
    loop {
        let (next, merges) = dedup_pass(current, config);
        if merges == 0 {
            return next;
        }
        log::debug!("Dedup pass merged {} text fragments", merges);
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(id: &str, text: &str, left: f32, top: f32, width: f32) -> TextBox {
        TextBox {
            id: id.to_string(),
            text: text.to_string(),
            left,
            top,
            width,
            height: 14.4,
            font_size: 12.0,
            font_weight: None,
            font_style: None,
            font_id: None,
            base_font: None,
            color: None,
            group_id: None,
        }
    }

    #[test]
    fn test_collides_by_position() {
        let config = DedupConfig::default();
        let a = text_box("a", "100", 10.0, 92.0, 20.0);
        let b = text_box("b", "$100", 11.0, 92.5, 200.0);
        assert!(collides(&a, &b, &config));
        let c = text_box("c", "$100", 11.6, 92.0, 200.0);
        assert!(!collides(&a, &c, &config));
    }

    #[test]
    fn test_collides_by_iou() {
        let config = DedupConfig::default();
        let a = text_box("a", "x", 10.0, 10.0, 100.0);
        let b = text_box("b", "x", 15.0, 10.0, 100.0);
        assert!(collides(&a, &b, &config));
        let c = text_box("c", "x", 40.0, 10.0, 100.0);
        assert!(!collides(&a, &c, &config));
    }

    #[test]
    fn test_currency_prefix_wins() {
        let plain = text_box("a", "100", 0.0, 0.0, 10.0);
        let money = text_box("b", "\u{00a0}€100", 0.0, 0.0, 10.0);
        assert!(prefers_incoming(&money, &plain));
        assert!(!prefers_incoming(&plain, &money));
    }

    #[test]
    fn test_tie_prefers_incoming_when_not_shorter() {
        let a = text_box("a", "ab ", 0.0, 0.0, 10.0);
        let b = text_box("b", "ab", 0.0, 0.0, 10.0);
        assert!(prefers_incoming(&a, &b));
        assert!(!prefers_incoming(&b, &a));
        assert!(prefers_incoming(&b, &b.clone()));
    }

    #[test]
    fn test_pass_keeps_first_position() {
        let config = DedupConfig::default();
        let boxes = vec![
            text_box("a", "100", 10.0, 92.0, 19.8),
            text_box("b", "$100", 10.0, 92.0, 26.4),
            text_box("c", "other", 300.0, 92.0, 50.0),
        ];
        let (out, merges) = dedup_pass(boxes, &config);
        assert_eq!(merges, 1);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "b");
        assert_eq!(out[1].id, "c");
    }

    #[test]
    fn test_fixpoint_is_idempotent() {
        let config = DedupConfig::default();
        let boxes = vec![
            text_box("a", "1", 0.0, 0.0, 10.0),
            text_box("b", "22", 100.0, 0.0, 10.0),
            // Collides with "a" only; wins and moves the accepted box next to "b"
            text_box("c", "333", 1.0, 0.0, 10.0),
            text_box("d", "4444", 101.0, 0.0, 10.0),
        ];
        let once = dedup_text_boxes(boxes, &config);
        let twice = dedup_text_boxes(once.clone(), &config);
        assert_eq!(once, twice);
    }
}
