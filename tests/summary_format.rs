use chrono::TimeZone;
use chrono_tz::Asia::Taipei;

use tw_trends_bot::models::{NewsRef, TrendItem};
use tw_trends_bot::service::notify::discord::{build_messages, is_discord_webhook};
use tw_trends_bot::service::notify::slack::build_payload;
use tw_trends_bot::service::notify::summary::{
    render_sections, render_topic, Markup, NO_TOPICS,
};
use tw_trends_bot::service::notify::REPORT_HEADER;

fn cat_a() -> TrendItem {
    TrendItem {
        title: Some("Cat A".into()),
        traffic: Some("50,000+".into()),
        news: vec![NewsRef {
            title: Some("Story 1".into()),
            source: Some("CNA".into()),
            url: Some("http://x/1".into()),
        }],
    }
}

fn cat_b() -> TrendItem {
    TrendItem {
        title: Some("Cat B".into()),
        traffic: None,
        news: vec![],
    }
}

#[test]
fn slack_topic_has_header_and_linked_bullets() {
    assert_eq!(
        render_topic(1, &cat_a(), Markup::Slack),
        "# 1 Cat A (50,000+)\n- <http://x/1|Story 1> · CNA\n"
    );
}

#[test]
fn discord_topic_uses_markdown_links() {
    assert_eq!(
        render_topic(3, &cat_a(), Markup::Discord),
        "**3. Cat A** (50,000+)\n- [Story 1](http://x/1) · CNA\n"
    );
}

#[test]
fn topic_without_news_is_marked_na_and_omits_missing_traffic() {
    assert_eq!(render_topic(2, &cat_b(), Markup::Slack), "# 2 Cat B - N/A\n");
}

#[test]
fn untitled_topic_gets_placeholder() {
    let item = TrendItem {
        title: None,
        traffic: None,
        news: vec![],
    };
    assert_eq!(render_topic(1, &item, Markup::Slack), "# 1 (untitled) - N/A\n");
}

#[test]
fn slack_text_is_escaped() {
    let item = TrendItem {
        title: Some("A&B <tag>".into()),
        traffic: None,
        news: vec![],
    };
    assert_eq!(
        render_topic(1, &item, Markup::Slack),
        "# 1 A&amp;B &lt;tag&gt; - N/A\n"
    );
}

#[test]
fn empty_list_renders_fallback_message() {
    assert_eq!(render_sections(&[], Markup::Slack), vec![NO_TOPICS.to_string()]);
}

#[test]
fn sections_join_topics_with_blank_line() {
    let sections = render_sections(&[cat_a(), cat_b()], Markup::Slack);
    assert_eq!(
        sections,
        vec!["# 1 Cat A (50,000+)\n- <http://x/1|Story 1> · CNA\n\n# 2 Cat B - N/A\n".to_string()]
    );
}

#[test]
fn sections_split_at_topic_boundaries_within_limit() {
    let items: Vec<TrendItem> = (0..40)
        .map(|i| TrendItem {
            title: Some(format!("topic {i} {}", "x".repeat(150))),
            traffic: Some("1,000+".into()),
            news: vec![],
        })
        .collect();

    let sections = render_sections(&items, Markup::Slack);
    assert!(sections.len() > 1);
    for section in &sections {
        assert!(section.chars().count() <= Markup::Slack.block_limit());
        assert!(section.starts_with("# "));
    }
    let headers: usize = sections.iter().map(|s| s.matches("# ").count()).sum();
    assert_eq!(headers, 40);
}

#[test]
fn slack_payload_has_header_context_divider_and_sections() {
    let now = Taipei.with_ymd_and_hms(2025, 3, 14, 9, 5, 0).unwrap();
    let payload = build_payload(&[cat_a()], now);
    let blocks = payload["blocks"].as_array().unwrap();

    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0]["type"], "header");
    assert_eq!(blocks[0]["text"]["text"], "🔥 Taiwan Google Trends");
    assert_eq!(
        blocks[1]["elements"][0]["text"],
        "📅 2025-03-14 09:05 (in 24 hours)"
    );
    assert_eq!(blocks[2]["type"], "divider");
    assert_eq!(blocks[3]["elements"][0]["type"], "mrkdwn");
    assert!(blocks[3]["elements"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("# 1 Cat A"));
}

#[test]
fn detects_discord_webhooks() {
    assert!(is_discord_webhook("https://discord.com/api/webhooks/1/abc"));
    assert!(is_discord_webhook("https://discordapp.com/api/webhooks/1/abc"));
    assert!(!is_discord_webhook("https://hooks.slack.com/services/T/B/x"));
    assert!(!is_discord_webhook("https://evil.example/discord.com/api/webhooks/1"));
}

#[test]
fn discord_messages_carry_one_embed_per_section() {
    let items: Vec<TrendItem> = (0..40)
        .map(|i| TrendItem {
            title: Some(format!("topic {i} {}", "x".repeat(300))),
            traffic: Some("1,000+".into()),
            news: vec![],
        })
        .collect();
    let sections = render_sections(&items, Markup::Discord);
    assert!(sections.len() > 1);

    let messages = build_messages(&items, "2025-03-14 09:05");
    assert_eq!(messages.len(), sections.len());

    for (idx, (message, section)) in messages.iter().zip(&sections).enumerate() {
        let json = serde_json::to_value(message).unwrap();
        let embeds = json["embeds"].as_array().unwrap();
        assert_eq!(embeds.len(), 1);
        assert_eq!(embeds[0]["description"], section.as_str());
        if idx == 0 {
            let content = json["content"].as_str().unwrap();
            assert!(content.contains(REPORT_HEADER));
            assert!(content.contains("2025-03-14 09:05 (in 24 hours)"));
        } else {
            assert!(json.get("content").map_or(true, |c| c.is_null()));
        }
    }
}

#[test]
fn discord_empty_report_is_the_fallback_embed() {
    let messages = build_messages(&[], "2025-03-14 09:05");
    assert_eq!(messages.len(), 1);
    let json = serde_json::to_value(&messages[0]).unwrap();
    assert_eq!(json["embeds"][0]["description"], NO_TOPICS);
}
