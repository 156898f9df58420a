/// Unicode partial block characters for smooth progress bars
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Percentage of `done` out of `total`, 0 when there is nothing to do
pub fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

/// Bar of exactly `width` cells using partial block characters
pub fn render_bar(percentage: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let percentage = percentage.clamp(0.0, 100.0);
    let filled_width = (percentage / 100.0) * width as f64;
    let full_blocks = filled_width.floor() as usize;
    let partial = ((filled_width - full_blocks as f64) * 8.0).round() as usize;

    let mut bar: String = std::iter::repeat_n(BLOCKS[8], full_blocks.min(width)).collect();
    if full_blocks < width && partial > 0 {
        bar.push(BLOCKS[partial.min(8)]);
    }

    let current_len = bar.chars().count();
    bar.extend(std::iter::repeat_n(' ', width.saturating_sub(current_len)));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_empty() {
        let bar = render_bar(0.0, 10);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.chars().all(|c| c == ' '));
    }

    #[test]
    fn test_render_bar_full() {
        let bar = render_bar(100.0, 10);
        assert!(bar.chars().all(|c| c == '█'));
    }

    #[test]
    fn test_render_bar_partial_keeps_width() {
        assert_eq!(render_bar(percent(1, 3), 10).chars().count(), 10);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(2, 4), 50.0);
    }
}
