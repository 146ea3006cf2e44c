use ratatui::layout::{Constraint, Direction, Layout, Rect};

const MIN_WIDTH: u16 = 30;
const MIN_HEIGHT: u16 = 5;

/// Creates a centered rectangle within `r`, sized as a percentage of it.
///
/// Small containers still get a usable popup: the result is widened to
/// `MIN_WIDTH` x `MIN_HEIGHT` when the container allows it.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let middle = rows.get(1).copied().unwrap_or(r);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(middle);
    let mut result = columns.get(1).copied().unwrap_or(middle);

    if result.width < MIN_WIDTH && r.width >= MIN_WIDTH {
        result.width = MIN_WIDTH;
        result.x = r.x + (r.width - MIN_WIDTH) / 2;
    }
    if result.height < MIN_HEIGHT && r.height >= MIN_HEIGHT {
        result.height = MIN_HEIGHT;
        result.y = r.y + (r.height - MIN_HEIGHT) / 2;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside_container() {
        let container = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(40, 30, container);
        assert!(popup.x >= container.x && popup.right() <= container.right());
        assert!(popup.y >= container.y && popup.bottom() <= container.bottom());
        assert_eq!(popup.width, 40);
    }

    #[test]
    fn test_small_popup_is_widened() {
        let container = Rect::new(10, 5, 40, 10);
        let popup = centered_rect(10, 10, container);
        assert_eq!(popup.width, MIN_WIDTH);
        assert_eq!(popup.height, MIN_HEIGHT);
        assert_eq!(popup.x, 15);
        assert_eq!(popup.y, 7);
    }
}
