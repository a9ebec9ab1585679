//! Console summary of a finished run.

use std::fmt::Write;

use ytscout_core::Video;

const SHOWN: usize = 10;
const TITLE_CHARS: usize = 60;

/// Banner plus the top videos with their headline numbers.
pub(crate) fn render_summary(videos: &[Video]) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "Results: {} high-engagement videos found", videos.len());
    let _ = writeln!(out, "{rule}\n");

    for (i, video) in videos.iter().take(SHOWN).enumerate() {
        let title: String = video.title().chars().take(TITLE_CHARS).collect();
        let _ = writeln!(out, "{}. {title}...", i + 1);
        let _ = writeln!(
            out,
            "   Views: {} | Likes: {} | Comments: {}",
            thousands(video.details.views),
            video.engagement.like_ratio_percent,
            video.engagement.comment_ratio_percent
        );
        let _ = writeln!(out, "   URL: {}\n", video.details.url);
    }

    if videos.len() > SHOWN {
        let _ = writeln!(out, "... and {} more videos", videos.len() - SHOWN);
    }

    out
}

/// `1234567` -> `"1,234,567"`
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
