pub mod form_dialog;

use ratatui::layout::Rect;

/// A `width`×`height` rect centered in `area`, shrunk to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(60, 20, area), Rect::new(20, 10, 60, 20));
    }

    #[test]
    fn shrinks_to_small_area() {
        let area = Rect::new(5, 2, 30, 10);
        assert_eq!(centered_rect(60, 20, area), area);
    }
}
