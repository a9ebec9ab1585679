use std::io::Cursor;
use std::path::PathBuf;

use super::*;

fn config() -> AppConfig {
    AppConfig {
        youtube_api_key: "yt-key".to_string(),
        openrouter_api_key: None,
        openrouter_model: "deepseek/deepseek-chat".to_string(),
        openrouter_base_url: "https://openrouter.ai/api/v1".to_string(),
        sheets_credentials_file: PathBuf::from("credentials.json"),
        sheets_spreadsheet_id: String::new(),
        sheets_sheet_name: "Sheet1".to_string(),
        search_days: 7,
        max_results: 50,
        thresholds: EngagementThresholds::default(),
        request_timeout_secs: 30,
        log_level: "info".to_string(),
    }
}

fn prompt_with(cli: &Cli, input: &str) -> (Option<String>, String) {
    let mut shown = Vec::new();
    let topic = resolve_topic(cli, Cursor::new(input.as_bytes()), &mut shown).unwrap();
    (topic, String::from_utf8(shown).unwrap())
}

#[test]
fn parses_positional_topic() {
    let cli = Cli::try_parse_from(["ytscout", "Best SaaS Business"]).expect("expected valid cli args");
    assert_eq!(cli.topic.as_deref(), Some("Best SaaS Business"));
    assert!(cli.topic_flag.is_none());
    assert_eq!(cli.sort_by, SortArg::LikeRatio);
    assert!(!cli.no_language_check);
    assert!(!cli.no_sheets);
}

#[test]
fn parses_topic_flag_and_thresholds() {
    let cli = Cli::try_parse_from([
        "ytscout",
        "--topic",
        "AI Tools",
        "--days",
        "14",
        "--min-views",
        "5000",
        "--min-likes",
        "3.5",
        "--min-comments",
        "0.5",
        "--no-language-check",
        "--no-sheets",
        "--output",
        "out.json",
        "--sort-by",
        "comment-ratio",
    ])
    .expect("expected valid cli args");

    assert_eq!(cli.topic_flag.as_deref(), Some("AI Tools"));
    assert_eq!(cli.days, Some(14));
    assert_eq!(cli.min_views, Some(5000));
    assert_eq!(cli.min_likes, Some(3.5));
    assert_eq!(cli.min_comments, Some(0.5));
    assert!(cli.no_language_check);
    assert!(cli.no_sheets);
    assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    assert_eq!(cli.sort_by, SortArg::CommentRatio);
}

#[test]
fn parses_short_flags() {
    let cli = Cli::try_parse_from([
        "ytscout", "-t", "rust", "-d", "3", "-v", "200", "-l", "1", "-c", "0.1", "-o", "r.json", "-i",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.topic_flag.as_deref(), Some("rust"));
    assert_eq!(cli.days, Some(3));
    assert_eq!(cli.min_views, Some(200));
    assert!(cli.interactive);
}

#[test]
fn rejects_unknown_sort_key() {
    let result = Cli::try_parse_from(["ytscout", "topic", "--sort-by", "dislikes"]);
    assert!(result.is_err());
}

#[test]
fn research_options_convert_percent_flags_to_fractions() {
    let cli = Cli::try_parse_from(["ytscout", "saas", "--min-likes", "2.5", "--min-comments", "0.4"])
        .unwrap();
    let opts = cli.research_options(&config(), "saas".to_string());
    assert!((opts.thresholds.min_like_ratio - 0.025).abs() < 1e-12);
    assert!((opts.thresholds.min_comment_ratio - 0.004).abs() < 1e-12);
    assert_eq!(opts.thresholds.min_views, 1000);
    assert_eq!(opts.days_back, 7);
    assert_eq!(opts.max_results, 50);
    assert_eq!(opts.sort_key, SortKey::LikeRatio);
}

#[test]
fn research_options_fall_back_to_config() {
    let mut cfg = config();
    cfg.search_days = 21;
    cfg.thresholds.min_views = 777;
    let cli = Cli::try_parse_from(["ytscout", "saas"]).unwrap();
    let opts = cli.research_options(&cfg, "saas".to_string());
    assert_eq!(opts.days_back, 21);
    assert_eq!(opts.thresholds.min_views, 777);
    assert_eq!(opts.thresholds, EngagementThresholds { min_views: 777, ..EngagementThresholds::default() });
}

#[test]
fn topic_argument_skips_prompt() {
    let cli = Cli::try_parse_from(["ytscout", "saas"]).unwrap();
    let (topic, shown) = prompt_with(&cli, "ignored\n");
    assert_eq!(topic.as_deref(), Some("saas"));
    assert!(shown.is_empty());
}

#[test]
fn missing_topic_prompts() {
    let cli = Cli::try_parse_from(["ytscout"]).unwrap();
    let (topic, shown) = prompt_with(&cli, "  Indie Hacking  \n");
    assert_eq!(topic.as_deref(), Some("Indie Hacking"));
    assert_eq!(shown, "Enter search topic: ");
}

#[test]
fn interactive_flag_prompts_even_with_topic() {
    let cli = Cli::try_parse_from(["ytscout", "saas", "--interactive"]).unwrap();
    let (topic, _) = prompt_with(&cli, "AI agents\n");
    assert_eq!(topic.as_deref(), Some("AI agents"));
}

#[test]
fn empty_prompt_input_is_none() {
    let cli = Cli::try_parse_from(["ytscout", "-i"]).unwrap();
    assert_eq!(prompt_with(&cli, "   \n").0, None);
    assert_eq!(prompt_with(&cli, "").0, None);
}
